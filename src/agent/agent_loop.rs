//! Core agent loop implementation.

use std::sync::Arc;

use thiserror::Error;
use tracing::Instrument;
use uuid::Uuid;

use crate::config::Config;
use crate::llm::LlmClient;
use crate::tools::ToolRegistry;

use super::parser::{parse_directive, Directive};
use super::prompt::{self, build_system_prompt, Transcript};
use super::state::{suggestion_order, Outcome, RunOutcome, RunState};

/// Errors that end a run early.
///
/// Everything else that goes wrong inside a run is fed back to the model.
#[derive(Debug, Error)]
pub enum AgentError {
    #[error("completion failed on iteration {iteration}: {cause:#}")]
    Completion {
        iteration: usize,
        cause: anyhow::Error,
    },
}

/// The travel planning agent.
pub struct Agent {
    llm: Arc<dyn LlmClient>,
    tools: ToolRegistry,
    max_iterations: usize,
    tool_order: Vec<String>,
    strict_completion: bool,
}

impl Agent {
    /// Create an agent with the loop settings from `config`.
    pub fn new(config: &Config, llm: Arc<dyn LlmClient>, tools: ToolRegistry) -> Self {
        Self {
            llm,
            tools,
            max_iterations: config.max_iterations,
            tool_order: config.tool_order.clone(),
            strict_completion: config.strict_completion,
        }
    }

    /// Agent with default loop settings.
    pub fn with_defaults(llm: Arc<dyn LlmClient>, tools: ToolRegistry) -> Self {
        Self {
            llm,
            tools,
            max_iterations: 15,
            tool_order: crate::config::default_tool_order(),
            strict_completion: false,
        }
    }

    pub fn max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    pub fn tool_order(mut self, order: Vec<String>) -> Self {
        self.tool_order = order;
        self
    }

    pub fn strict_completion(mut self, strict: bool) -> Self {
        self.strict_completion = strict;
        self
    }

    pub fn tools(&self) -> &ToolRegistry {
        &self.tools
    }

    /// Run one request to completion.
    ///
    /// Only a failing completion call is an error. Every other failure is
    /// corrected in the transcript or ends in a fallback answer.
    pub async fn run(&self, request: &str) -> Result<RunOutcome, AgentError> {
        let run_id = Uuid::new_v4();
        let span = tracing::info_span!("run", %run_id);
        self.run_inner(run_id, request).instrument(span).await
    }

    async fn run_inner(&self, run_id: Uuid, request: &str) -> Result<RunOutcome, AgentError> {
        tracing::info!(request = %request, tools = self.tools.len(), "Starting run");

        let order = suggestion_order(&self.tool_order, self.tools.names());
        let catalog = self.tools.list_tools();
        let system_prompt = build_system_prompt(&catalog, &order);
        let transcript = Transcript::new(&system_prompt, &catalog, request, &order);
        let mut state = RunState::new(self.tools.names(), transcript);

        while state.iteration() < self.max_iterations {
            let iteration = state.begin_iteration();
            tracing::debug!("Agent iteration {}", iteration);

            let prompt = state.transcript().render();
            let response = self
                .llm
                .complete(&prompt)
                .await
                .map_err(|cause| AgentError::Completion { iteration, cause })?;
            tracing::debug!(response = %preview(&response, 200), "Model replied");

            match parse_directive(&response) {
                Directive::FinalAnswer { text } => {
                    if self.strict_completion && !state.all_called() {
                        tracing::info!("Rejecting final answer, tools still missing");
                        let remaining = state.remaining(&order);
                        let next = state.next_suggested(&order).unwrap_or_default();
                        state
                            .transcript_mut()
                            .push(prompt::premature_answer(&remaining, &next));
                        continue;
                    }
                    tracing::info!(iteration, "Agent reached final answer");
                    return Ok(state.into_outcome(run_id, text, Outcome::Answered));
                }
                Directive::Action { tool, input } => {
                    self.dispatch(&mut state, &order, &tool, &input).await;
                }
                Directive::Unparseable => {
                    if state.all_called() {
                        tracing::info!(iteration, "Accepting reply as answer, all tools used");
                        return Ok(state.into_outcome(run_id, response, Outcome::ImplicitAnswer));
                    }
                    tracing::debug!("Reply has no directive");
                    let remaining = state.remaining(&order);
                    let next = state.next_suggested(&order).unwrap_or_default();
                    state
                        .transcript_mut()
                        .push(prompt::missing_tools(&response, &remaining, &next));
                }
            }
        }

        tracing::warn!(
            max_iterations = self.max_iterations,
            gathered = state.results().len(),
            "Iteration budget exhausted"
        );
        let answer = prompt::fallback_answer(state.results());
        Ok(state.into_outcome(run_id, answer, Outcome::Exhausted))
    }

    /// Handle one `ACTION`/`INPUT` pair.
    async fn dispatch(&self, state: &mut RunState, order: &[String], token: &str, input: &str) {
        let Some(tool) = self.tools.resolve(token) else {
            tracing::warn!(tool = %token, "Model asked for unknown tool");
            state
                .transcript_mut()
                .push(prompt::unknown_tool(token, &self.tools.names()));
            return;
        };
        let name = tool.name();

        if !state.is_required(name) {
            tracing::warn!(tool = %name, "Refusing duplicate tool call");
            let remaining = state.remaining(order);
            state
                .transcript_mut()
                .push(prompt::duplicate_call(name, &remaining));
            return;
        }

        tracing::info!(tool = %name, input = %input, "Calling tool");
        match tool.invoke(input).await {
            Ok(result) => {
                tracing::info!(tool = %name, result = %preview(&result, 200), "Tool returned");
                state.record_success(name, input, &result);

                let segment = match state.next_suggested(order) {
                    None => prompt::observation_all_done(&result, state.results()),
                    Some(next) => {
                        prompt::observation_with_next(&result, &state.remaining(order), &next)
                    }
                };
                state.transcript_mut().push(segment);
            }
            Err(e) => {
                tracing::warn!(tool = %name, error = %e, "Tool call failed");
                state
                    .transcript_mut()
                    .push(prompt::tool_failed(name, tool.description()));
            }
        }
    }
}

/// First `max_chars` characters of `s`, for logging.
fn preview(s: &str, max_chars: usize) -> String {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}...", &s[..idx]),
        None => s.to_string(),
    }
}
