//! Prompt templates and the per-run transcript.

use crate::tools::ToolInfo;

/// Build the system prompt for the given catalog, listing tools in `order`.
pub fn build_system_prompt(tools: &[ToolInfo], order: &[String]) -> String {
    let mandatory = order
        .iter()
        .enumerate()
        .map(|(i, name)| {
            let description = tools
                .iter()
                .find(|t| &t.name == name)
                .map(|t| short_description(&t.description))
                .unwrap_or_default();
            format!("{}. {} - {}", i + 1, name, description)
        })
        .collect::<Vec<_>>()
        .join("\n");
    let count = order.len();

    format!(
        r#"You are a travel planning agent that MUST use ALL AVAILABLE TOOLS for every request.

MANDATORY: You MUST call ALL {count} tools before providing your final answer:
{mandatory}

TOOL USAGE FORMAT (EXACT format required):
ACTION: tool_name
INPUT: tool_input

Call exactly one tool per reply and wait for its result before calling the next one.
Each tool may be called only once.

When every tool has been called, reply with:
FINAL ANSWER: [Complete plan using ALL tool results]

REMEMBER: You MUST use ALL {count} tools. Do not skip any tool."#
    )
}

/// Text of a description up to its input hint.
fn short_description(description: &str) -> &str {
    description
        .split(". Input:")
        .next()
        .unwrap_or(description)
        .trim_end_matches('.')
}

fn ordinal(n: usize) -> String {
    match n {
        1 => "First".to_string(),
        2 => "Second".to_string(),
        3 => "Third".to_string(),
        4 => "Fourth".to_string(),
        5 => "Fifth".to_string(),
        n => format!("Step {}", n),
    }
}

/// Growing prompt of one run.
///
/// The rendered text is the header (system prompt, tool catalog, user request,
/// call sequence) followed by every appended segment in order. Nothing is ever
/// dropped.
#[derive(Debug, Clone)]
pub struct Transcript {
    header: String,
    history: Vec<String>,
}

impl Transcript {
    pub fn new(system_prompt: &str, tools: &[ToolInfo], request: &str, order: &[String]) -> Self {
        let catalog = tools
            .iter()
            .map(|t| format!("- {}: {}", t.name, t.description))
            .collect::<Vec<_>>()
            .join("\n");

        let opening = match order.first() {
            Some(first) => {
                let last = order.len();
                let sequence = order
                    .iter()
                    .enumerate()
                    .map(|(i, name)| {
                        let suffix = if i + 1 == last { " (then FINAL ANSWER)" } else { "" };
                        format!("{}. {} - {}{}", i + 1, name, ordinal(i + 1), suffix)
                    })
                    .collect::<Vec<_>>()
                    .join("\n");
                format!(
                    "MANDATORY SEQUENCE - Call tools in this order:\n{sequence}\n\nStart NOW with {first}:\nACTION: {first}\nINPUT:"
                )
            }
            None => "No tools are available. Answer directly.\n\nFINAL ANSWER:".to_string(),
        };

        let header = format!(
            "{system_prompt}\n\nAvailable tools:\n{catalog}\n\nUser question: {request}\n\n{opening}"
        );
        Self::from_parts(header, Vec::new())
    }

    pub fn from_parts(header: impl Into<String>, history: Vec<String>) -> Self {
        Self {
            header: header.into(),
            history,
        }
    }

    /// Append one segment to the history.
    pub fn push(&mut self, segment: impl Into<String>) {
        self.history.push(segment.into());
    }

    /// Full prompt text for the next completion.
    pub fn render(&self) -> String {
        let mut text = self.header.clone();
        for segment in &self.history {
            text.push_str("\n\n");
            text.push_str(segment);
        }
        text
    }
}

/// Observation after a successful call, with tools still missing.
pub fn observation_with_next(result: &str, remaining: &[String], next: &str) -> String {
    format!(
        "Observation: {result}\n\nGood! Remaining tools: {}\n\nNow call '{next}' next:\nACTION: {next}\nINPUT:",
        remaining.join(", ")
    )
}

/// Observation after the last required call; asks for the answer.
pub fn observation_all_done(result: &str, results: &[(String, String)]) -> String {
    let summary = results
        .iter()
        .map(|(tool, result)| format!("{}: {}", tool, result))
        .collect::<Vec<_>>()
        .join("\n");
    format!(
        "Observation: {result}\n\nEXCELLENT! You have used ALL {} required tools.\n\nALL TOOL RESULTS:\n{summary}\n\nNow you MUST provide your FINAL ANSWER using ONLY the actual data above. DO NOT use placeholders.\n\n{}",
        results.len(),
        super::parser::FINAL_ANSWER_MARKER
    )
}

pub fn unknown_tool(token: &str, available: &[String]) -> String {
    format!(
        "Error: Unknown tool '{token}'. Available: {}\nTry again with a valid tool.",
        available.join(", ")
    )
}

pub fn duplicate_call(tool: &str, remaining: &[String]) -> String {
    format!(
        "Error: You already called '{tool}'. You cannot call the same tool twice.\nRemaining tools: {}\n\nCall a DIFFERENT tool now:",
        remaining.join(", ")
    )
}

/// Correction after an adapter failure. `usage` is the tool description.
pub fn tool_failed(tool: &str, usage: &str) -> String {
    format!(
        "Error calling '{tool}'. Check the input ({usage}) and use this exact format:\nACTION: tool_name\nINPUT: value\n\nTry again."
    )
}

/// Correction for a reply that is neither an action nor an answer.
pub fn missing_tools(response: &str, remaining: &[String], next: &str) -> String {
    format!(
        "Your response: {response}\n\nERROR: You have NOT called all tools yet. Missing: {}\n\nYou MUST call a tool using:\nACTION: tool_name\nINPUT: value\n\nCall the next required tool now:\nACTION: {next}\nINPUT:",
        remaining.join(", ")
    )
}

/// Correction for a final answer given too early in strict mode.
pub fn premature_answer(remaining: &[String], next: &str) -> String {
    format!(
        "ERROR: FINAL ANSWER is not accepted yet. Missing: {}\n\nCall the next required tool now:\nACTION: {next}\nINPUT:",
        remaining.join(", ")
    )
}

pub const INCOMPLETE_ANSWER: &str = "Could not complete within iteration limit.";

/// Best-effort answer when the iteration budget runs out.
pub fn fallback_answer(results: &[(String, String)]) -> String {
    if results.is_empty() {
        return INCOMPLETE_ANSWER.to_string();
    }
    let mut summary = String::from("Based on the tools used:\n");
    for (tool, result) in results {
        summary.push_str(&format!("\n{}: {}\n", tool, result));
    }
    format!("Could not generate complete answer in time, but gathered:\n{}", summary)
}
