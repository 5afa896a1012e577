//! Per-run bookkeeping for the agent loop.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::prompt::Transcript;

/// One successful tool dispatch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallRecord {
    /// 1-based loop iteration in which the call happened
    pub iteration: usize,
    pub tool: String,
    pub input: String,
    pub result: String,
}

/// How a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    /// The model gave an explicit `FINAL ANSWER:`
    Answered,
    /// Every tool was called and the model answered without the marker
    ImplicitAnswer,
    /// The iteration budget ran out
    Exhausted,
}

/// Where a run stands while it is still going.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Some tools have not been called yet
    Collecting,
    /// Every tool has been called; waiting for the answer
    AllToolsCalled,
}

/// Final result of a run, handed to whoever displays it.
#[derive(Debug, Clone, Serialize)]
pub struct RunOutcome {
    pub run_id: Uuid,
    pub answer: String,
    pub call_log: Vec<CallRecord>,
    pub outcome: Outcome,
    /// Number of loop iterations used
    pub iterations: usize,
}

/// Full suggestion order for `registered` tools: everything named in
/// `priority` first (in that order), then the rest lexicographically.
pub fn suggestion_order<I, S>(priority: &[String], registered: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut rest: BTreeSet<String> = registered.into_iter().map(Into::into).collect();
    let mut order = Vec::with_capacity(rest.len());
    for name in priority {
        if rest.remove(name) {
            order.push(name.clone());
        }
    }
    order.extend(rest);
    order
}

/// State owned by exactly one run.
///
/// `required` only ever shrinks, and a name is in `results` iff it has left
/// `required`.
pub struct RunState {
    required: BTreeSet<String>,
    results: Vec<(String, String)>,
    call_log: Vec<CallRecord>,
    transcript: Transcript,
    iteration: usize,
}

impl RunState {
    pub fn new<I, S>(tool_names: I, transcript: Transcript) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            required: tool_names.into_iter().map(Into::into).collect(),
            results: Vec::new(),
            call_log: Vec::new(),
            transcript,
            iteration: 0,
        }
    }

    /// Advance the counter and return the new (1-based) iteration number.
    pub fn begin_iteration(&mut self) -> usize {
        self.iteration += 1;
        self.iteration
    }

    pub fn iteration(&self) -> usize {
        self.iteration
    }

    pub fn phase(&self) -> Phase {
        if self.required.is_empty() {
            Phase::AllToolsCalled
        } else {
            Phase::Collecting
        }
    }

    pub fn all_called(&self) -> bool {
        self.phase() == Phase::AllToolsCalled
    }

    pub fn is_required(&self, tool: &str) -> bool {
        self.required.contains(tool)
    }

    /// Tools still missing, in suggestion order.
    pub fn remaining(&self, order: &[String]) -> Vec<String> {
        order
            .iter()
            .filter(|name| self.required.contains(name.as_str()))
            .cloned()
            .collect()
    }

    /// Highest-priority tool still missing.
    pub fn next_suggested(&self, order: &[String]) -> Option<String> {
        order
            .iter()
            .find(|name| self.required.contains(name.as_str()))
            .cloned()
            .or_else(|| self.required.iter().next().cloned())
    }

    /// Record a successful dispatch of a still-required tool.
    ///
    /// Returns `false`, and changes nothing, if `tool` is not required.
    pub fn record_success(&mut self, tool: &str, input: &str, result: &str) -> bool {
        if !self.required.remove(tool) {
            return false;
        }
        self.results.push((tool.to_string(), result.to_string()));
        self.call_log.push(CallRecord {
            iteration: self.iteration,
            tool: tool.to_string(),
            input: input.to_string(),
            result: result.to_string(),
        });
        true
    }

    /// Observations gathered so far, in call order.
    pub fn results(&self) -> &[(String, String)] {
        &self.results
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn transcript_mut(&mut self) -> &mut Transcript {
        &mut self.transcript
    }

    pub fn into_outcome(self, run_id: Uuid, answer: String, outcome: Outcome) -> RunOutcome {
        RunOutcome {
            run_id,
            answer,
            call_log: self.call_log,
            outcome,
            iterations: self.iteration,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn order() -> Vec<String> {
        crate::config::default_tool_order()
    }

    fn state() -> RunState {
        RunState::new(
            ["calculate", "get_weather", "search_destination"],
            Transcript::from_parts("header", Vec::new()),
        )
    }

    #[test]
    fn suggestion_order_puts_priority_first_then_lexicographic() {
        let order = suggestion_order(
            &order(),
            ["zeta", "calculate", "alpha", "search_destination"],
        );
        assert_eq!(order, vec!["search_destination", "calculate", "alpha", "zeta"]);
    }

    #[test]
    fn suggestion_ignores_priority_names_that_are_not_registered() {
        let order = suggestion_order(&order(), ["get_weather"]);
        assert_eq!(order, vec!["get_weather"]);
    }

    #[test]
    fn next_suggested_follows_priority() {
        let mut state = state();
        assert_eq!(state.next_suggested(&order()).as_deref(), Some("search_destination"));
        state.record_success("search_destination", "Paris", "ok");
        assert_eq!(state.next_suggested(&order()).as_deref(), Some("get_weather"));
    }

    #[test]
    fn next_suggested_falls_back_to_smallest_name() {
        let state = RunState::new(["weather_radar", "hotel_search"], Transcript::from_parts("", Vec::new()));
        assert_eq!(state.next_suggested(&order()).as_deref(), Some("hotel_search"));
    }

    #[test]
    fn required_set_only_shrinks() {
        let mut state = state();
        state.begin_iteration();
        assert!(state.record_success("calculate", "1+1", "2"));
        assert_eq!(state.remaining(&order()).len(), 2);

        assert!(!state.record_success("calculate", "2+2", "4"));
        assert!(!state.record_success("unknown", "x", "y"));
        assert_eq!(state.remaining(&order()).len(), 2);
        assert!(!state.is_required("calculate"));
        assert_eq!(state.results(), &[("calculate".to_string(), "2".to_string())]);
        let outcome = state.into_outcome(Uuid::nil(), String::new(), Outcome::Exhausted);
        assert_eq!(outcome.call_log.len(), 1);
    }

    #[test]
    fn phase_flips_when_last_tool_is_recorded() {
        let mut state = state();
        assert_eq!(state.phase(), Phase::Collecting);
        for tool in ["calculate", "get_weather", "search_destination"] {
            state.record_success(tool, "", "done");
        }
        assert_eq!(state.phase(), Phase::AllToolsCalled);
        assert_eq!(state.next_suggested(&order()), None);
    }

    #[test]
    fn remaining_is_listed_in_suggestion_order() {
        let state = state();
        assert_eq!(
            state.remaining(&order()),
            vec!["search_destination", "get_weather", "calculate"]
        );
    }

    #[test]
    fn call_log_records_iteration() {
        let mut state = state();
        state.begin_iteration();
        state.begin_iteration();
        state.record_success("get_weather", "Tokyo", "sunny");
        let outcome = state.into_outcome(Uuid::nil(), "done".to_string(), Outcome::Answered);
        assert_eq!(outcome.iterations, 2);
        assert_eq!(
            outcome.call_log,
            vec![CallRecord {
                iteration: 2,
                tool: "get_weather".to_string(),
                input: "Tokyo".to_string(),
                result: "sunny".to_string(),
            }]
        );
    }
}
