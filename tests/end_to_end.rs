//! Full agent runs against the mock back-ends over real HTTP.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::routing::post;
use axum::{Json, Router};
use tokio::net::TcpListener;
use tokio_test::{assert_err, assert_ok};
use url::Url;

use travel_agent::agent::{Agent, Outcome};
use travel_agent::config::{Config, ToolServers};
use travel_agent::llm::LlmClient;
use travel_agent::servers::{self, budget, calculator, currency, destination, weather};
use travel_agent::tools::ToolRegistry;

struct ScriptedLlm {
    replies: Mutex<VecDeque<String>>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedLlm {
    fn new(replies: &[&str]) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(replies.iter().map(|r| r.to_string()).collect()),
            prompts: Mutex::new(Vec::new()),
        })
    }

    fn last_prompt(&self) -> String {
        self.prompts.lock().unwrap().last().cloned().unwrap_or_default()
    }
}

#[async_trait]
impl LlmClient for ScriptedLlm {
    async fn complete(&self, prompt: &str) -> anyhow::Result<String> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        Ok(self
            .replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| "I have nothing more to add.".to_string()))
    }
}

/// Bind `router` on an ephemeral port and return its base URL.
async fn spawn(router: Router) -> Url {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(servers::serve(listener, router));
    Url::parse(&format!("http://{}", addr)).unwrap()
}

async fn spawn_backends() -> ToolServers {
    ToolServers {
        budget: spawn(budget::router()).await,
        search: spawn(destination::router()).await,
        weather: spawn(weather::router()).await,
        currency: spawn(currency::router()).await,
        calculator: spawn(calculator::router()).await,
    }
}

fn config(servers: ToolServers) -> Config {
    Config::new(
        Url::parse("http://127.0.0.1:11434").unwrap(),
        "test-model".to_string(),
        servers,
    )
}

#[tokio::test]
async fn plans_a_trip_with_every_tool() {
    let config = config(spawn_backends().await);
    let tools = assert_ok!(ToolRegistry::from_config(&config));
    assert!(tools.probe_health().await.is_empty());

    let llm = ScriptedLlm::new(&[
        "Let me start.\nACTION: search_destination\nINPUT: Barcelona",
        "ACTION: estimate_budget\nINPUT: Barcelona,5",
        "ACTION: get_weather\nINPUT: Barcelona,2025-07-10",
        "ACTION: convert_currency\nINPUT: 1000,USD,EUR",
        "ACTION: calculate\nINPUT: 1000/5",
        "FINAL ANSWER: Five sunny days in Barcelona for about 920 EUR.",
    ]);
    let agent = Agent::new(&config, llm.clone(), tools);

    let outcome = assert_ok!(agent.run("Plan a 5-day trip to Barcelona").await);
    assert_eq!(outcome.outcome, Outcome::Answered);
    assert_eq!(outcome.answer, "Five sunny days in Barcelona for about 920 EUR.");
    assert_eq!(outcome.call_log.len(), 5);

    let results: Vec<&str> = outcome.call_log.iter().map(|c| c.result.as_str()).collect();
    assert!(results[0].contains("Sagrada Familia"));
    assert_eq!(results[1], "Budget: $1000.00 USD for 5 days in Barcelona");
    assert!(results[2].starts_with("Weather for Barcelona:"));
    assert_eq!(results[3], "1000 USD = 920 EUR (rate: 0.92)");
    assert_eq!(results[4], "1000/5 = 200");

    let prompt = llm.last_prompt();
    assert!(prompt.contains("ALL TOOL RESULTS:"));
    assert!(prompt.contains("calculate: 1000/5 = 200"));
}

#[tokio::test]
async fn bad_input_is_corrected_without_losing_the_tool() {
    let config = config(spawn_backends().await);
    let tools = assert_ok!(ToolRegistry::from_config(&config));
    let llm = ScriptedLlm::new(&[
        "ACTION: estimate_budget\nINPUT: Barcelona",
        "ACTION: estimate_budget\nINPUT: Barcelona,3",
        "FINAL ANSWER: ok",
    ]);
    let agent = Agent::new(&config, llm.clone(), tools);

    let outcome = assert_ok!(agent.run("Budget for Barcelona").await);
    assert_eq!(outcome.call_log.len(), 1);
    assert_eq!(outcome.call_log[0].iteration, 2);
    assert_eq!(outcome.call_log[0].result, "Budget: $600.00 USD for 3 days in Barcelona");
}

#[tokio::test]
async fn calculator_error_is_a_valid_observation() {
    let config = config(spawn_backends().await);
    let tools = assert_ok!(ToolRegistry::from_config(&config));
    let llm = ScriptedLlm::new(&["ACTION: calculate\nINPUT: 1/0", "FINAL ANSWER: ok"]);
    let agent = Agent::new(&config, llm, tools);

    let outcome = assert_ok!(agent.run("Divide").await);
    assert_eq!(outcome.call_log.len(), 1);
    assert_eq!(outcome.call_log[0].result, "Error: Division by zero");
}

#[tokio::test]
async fn unreachable_backend_is_an_adapter_failure() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let dead = Url::parse(&format!("http://{}", listener.local_addr().unwrap())).unwrap();
    drop(listener);

    let mut servers = spawn_backends().await;
    servers.weather = dead;
    let mut config = config(servers);
    config.max_iterations = 3;
    let tools = assert_ok!(ToolRegistry::from_config(&config));
    assert_eq!(tools.probe_health().await, vec!["get_weather".to_string()]);

    let llm = ScriptedLlm::new(&["ACTION: get_weather\nINPUT: Paris"]);
    let agent = Agent::new(&config, llm, tools);

    let outcome = assert_ok!(agent.run("Weather in Paris").await);
    assert!(outcome.call_log.is_empty());
    assert_eq!(outcome.outcome, Outcome::Exhausted);
    assert_eq!(outcome.answer, "Could not complete within iteration limit.");
}

#[tokio::test]
async fn slow_backend_times_out_and_stays_required() {
    let slow_weather = Router::new().route(
        "/tools/get_weather",
        post(|| async {
            tokio::time::sleep(Duration::from_secs(3)).await;
            Json(serde_json::json!({
                "destination": "Paris",
                "date": null,
                "temperature": "20C",
                "conditions": "Late",
                "recommendation": "None"
            }))
        }),
    );

    let mut servers = spawn_backends().await;
    servers.weather = spawn(slow_weather).await;
    let mut config = config(servers);
    config.tool_timeout = Duration::from_secs(1);
    config.max_iterations = 3;
    let tools = assert_ok!(ToolRegistry::from_config(&config));

    let llm = ScriptedLlm::new(&["ACTION: get_weather\nINPUT: Paris"]);
    let agent = Agent::new(&config, llm.clone(), tools);

    let outcome = assert_ok!(agent.run("Weather in Paris").await);
    assert!(outcome.call_log.is_empty());
    assert_eq!(outcome.outcome, Outcome::Exhausted);

    let prompt = llm.last_prompt();
    assert!(prompt.contains("Error calling 'get_weather'"));
    assert!(prompt.contains(
        "Missing: search_destination, estimate_budget, get_weather, convert_currency, calculate"
    ));
}

#[tokio::test]
async fn completion_failure_surfaces_to_the_caller() {
    struct Offline;

    #[async_trait]
    impl LlmClient for Offline {
        async fn complete(&self, _prompt: &str) -> anyhow::Result<String> {
            Err(anyhow::anyhow!("model is offline"))
        }
    }

    let config = config(spawn_backends().await);
    let tools = assert_ok!(ToolRegistry::from_config(&config));
    let agent = Agent::new(&config, Arc::new(Offline), tools);
    assert_err!(agent.run("anything").await);
}
