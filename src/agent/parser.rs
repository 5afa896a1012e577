//! Extraction of directives from raw model output.
//!
//! The model talks in free text. A turn is one of:
//!
//! ```text
//! FINAL ANSWER: <text>
//! ```
//!
//! or
//!
//! ```text
//! ACTION: <tool_name>
//! INPUT: <input>
//! ```
//!
//! surrounded by any amount of commentary. `FINAL ANSWER:` is matched
//! case-sensitively and wins when both shapes appear. `ACTION:` and `INPUT:`
//! are matched case-insensitively.

use std::sync::LazyLock;

use regex::Regex;

pub const FINAL_ANSWER_MARKER: &str = "FINAL ANSWER:";

/// Parsed intent of one completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Directive {
    /// Call `tool` with `input`. `tool` is the token as written by the model.
    Action { tool: String, input: String },
    /// Stop and report `text`.
    FinalAnswer { text: String },
    /// Neither shape was found.
    Unparseable,
}

static ACTION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)ACTION:\s*(\w+)").expect("action regex is valid"));

// \s* may run over blank lines; the captured input is the rest of one line.
static INPUT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)INPUT:\s*([^\n]*)").expect("input regex is valid"));

/// Parse one completion.
pub fn parse_directive(text: &str) -> Directive {
    if let Some(idx) = text.find(FINAL_ANSWER_MARKER) {
        let answer = text[idx + FINAL_ANSWER_MARKER.len()..].trim();
        return Directive::FinalAnswer {
            text: answer.to_string(),
        };
    }

    let Some(action) = ACTION_RE.captures(text) else {
        return Directive::Unparseable;
    };
    let tool = action[1].to_string();

    // The input marker has to come after the action marker.
    let action_end = action.get(0).map(|m| m.end()).unwrap_or(0);
    let Some(input) = INPUT_RE.captures(&text[action_end..]) else {
        return Directive::Unparseable;
    };

    Directive::Action {
        tool,
        input: clean_input(&input[1]),
    }
}

/// Cut the input at a trailing "final ..." and strip quoting noise.
fn clean_input(raw: &str) -> String {
    let line = match raw.to_ascii_lowercase().find("final") {
        Some(idx) => &raw[..idx],
        None => raw,
    };
    line.trim()
        .trim_matches(|c: char| c == '`' || c == '\'' || c == '"' || c.is_whitespace())
        .to_string()
}
