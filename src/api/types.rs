//! API request and response types.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::agent::{CallRecord, Outcome, RunOutcome};

/// Request to plan a trip.
#[derive(Debug, Clone, Deserialize)]
pub struct PlanRequest {
    /// The user's travel request
    pub input: String,
}

/// Result of one agent run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanResponse {
    /// Run identifier, also recorded on the run's log span
    pub run_id: Uuid,

    /// Request as received
    pub input: String,

    /// Final answer shown to the user
    pub output: String,

    /// Successful tool calls, in order
    pub tool_calls: Vec<CallRecord>,

    /// Loop iterations used
    pub iterations: usize,

    pub outcome: Outcome,
}

impl PlanResponse {
    pub fn from_outcome(input: String, outcome: RunOutcome) -> Self {
        Self {
            run_id: outcome.run_id,
            input,
            output: outcome.answer,
            tool_calls: outcome.call_log,
            iterations: outcome.iterations,
            outcome: outcome.outcome,
        }
    }
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}
