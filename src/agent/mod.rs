//! Agent module - the tool-orchestration loop.
//!
//! The agent follows a "tools in a loop" pattern:
//! 1. Build a transcript with the system prompt, tool catalog and user request
//! 2. Ask the model for the next step
//! 3. If the model names a tool, run it once and append the observation
//! 4. Repeat until every tool was used and the model answers, or the
//!    iteration budget runs out

mod agent_loop;
mod parser;
mod prompt;
mod state;

pub use agent_loop::{Agent, AgentError};
pub use parser::{parse_directive, Directive, FINAL_ANSWER_MARKER};
pub use prompt::{build_system_prompt, Transcript};
pub use state::{suggestion_order, CallRecord, Outcome, Phase, RunOutcome, RunState};
