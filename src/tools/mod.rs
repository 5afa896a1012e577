//! Tool adapters.
//!
//! Every tool takes a raw string argument (whatever followed `INPUT:` in the
//! model output), talks to its back-end, and returns a human-readable string
//! that goes straight into the transcript. Input-shape validation is the
//! adapter's job; any error it returns is turned into a transcript correction
//! by the agent loop.

mod budget;
mod calculator;
mod currency;
mod search;
mod weather;

pub use budget::EstimateBudget;
pub use calculator::Calculate;
pub use currency::ConvertCurrency;
pub use search::SearchDestination;
pub use weather::GetWeather;

use std::collections::HashMap;
use std::sync::Arc;

use anyhow::Context;
use async_trait::async_trait;
use reqwest::Client;
use serde::{de::DeserializeOwned, Serialize};
use url::Url;

use crate::config::{self, Config};

/// A tool the agent can call.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Canonical, case-sensitive name used for dispatch.
    fn name(&self) -> &str;

    /// Free-text description shown to the model, including the input format.
    fn description(&self) -> &str;

    /// Run the tool on the raw input string.
    async fn invoke(&self, input: &str) -> anyhow::Result<String>;

    /// Check that the tool's back-end is reachable.
    async fn health_check(&self) -> anyhow::Result<()> {
        Ok(())
    }
}

/// Name and description of a registered tool.
#[derive(Debug, Clone, serde::Serialize)]
pub struct ToolInfo {
    pub name: String,
    pub description: String,
}

/// Registry of available tools, in registration order.
#[derive(Default, Clone)]
pub struct ToolRegistry {
    tools: Vec<Arc<dyn Tool>>,
    index: HashMap<String, usize>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the five HTTP-backed travel tools.
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(config.tool_timeout)
            .build()
            .context("failed to build tool http client")?;
        let servers = &config.servers;

        let mut registry = Self::new();
        registry.register(Arc::new(SearchDestination::new(Backend::new(
            client.clone(),
            servers.search.clone(),
        ))));
        registry.register(Arc::new(EstimateBudget::new(Backend::new(
            client.clone(),
            servers.budget.clone(),
        ))));
        registry.register(Arc::new(GetWeather::new(Backend::new(
            client.clone(),
            servers.weather.clone(),
        ))));
        registry.register(Arc::new(ConvertCurrency::new(Backend::new(
            client.clone(),
            servers.currency.clone(),
        ))));
        registry.register(Arc::new(Calculate::new(Backend::new(
            client,
            servers.calculator.clone(),
        ))));
        Ok(registry)
    }

    /// Register a tool. A tool with the same name replaces the earlier one.
    pub fn register(&mut self, tool: Arc<dyn Tool>) {
        let name = tool.name().to_string();
        match self.index.get(&name) {
            Some(&slot) => {
                tracing::warn!(tool = %name, "Replacing already registered tool");
                self.tools[slot] = tool;
            }
            None => {
                self.index.insert(name, self.tools.len());
                self.tools.push(tool);
            }
        }
    }

    /// Look up a tool by its exact name.
    pub fn get(&self, name: &str) -> Option<&Arc<dyn Tool>> {
        self.index.get(name).map(|&slot| &self.tools[slot])
    }

    /// Find the tool a model-supplied name refers to, ignoring case.
    /// An exact match wins over a case-insensitive one.
    pub fn resolve(&self, token: &str) -> Option<&Arc<dyn Tool>> {
        self.get(token).or_else(|| {
            self.tools
                .iter()
                .find(|tool| tool.name().eq_ignore_ascii_case(token))
        })
    }

    /// Names in registration order.
    pub fn names(&self) -> Vec<String> {
        self.tools.iter().map(|t| t.name().to_string()).collect()
    }

    pub fn list_tools(&self) -> Vec<ToolInfo> {
        self.tools
            .iter()
            .map(|t| ToolInfo {
                name: t.name().to_string(),
                description: t.description().to_string(),
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Probe every tool's back-end concurrently and log the outcome.
    ///
    /// Unhealthy tools stay registered; a back-end may come up after the agent.
    /// Returns the names of tools whose probe failed.
    pub async fn probe_health(&self) -> Vec<String> {
        let probes = self.tools.iter().map(|tool| {
            let tool = Arc::clone(tool);
            async move {
                let outcome = tool.health_check().await;
                (tool.name().to_string(), outcome)
            }
        });

        let mut unhealthy = Vec::new();
        for (name, outcome) in futures::future::join_all(probes).await {
            match outcome {
                Ok(()) => tracing::info!(tool = %name, "Tool back-end is healthy"),
                Err(e) => {
                    tracing::warn!(tool = %name, error = %e, "Tool back-end is not reachable");
                    unhealthy.push(name);
                }
            }
        }
        unhealthy
    }
}

/// HTTP connection to one tool back-end.
#[derive(Clone)]
pub struct Backend {
    client: Client,
    base_url: Url,
}

impl Backend {
    /// `base_url` may carry a path prefix; endpoints are resolved below it.
    pub fn new(client: Client, base_url: Url) -> Self {
        Self {
            client,
            base_url: config::base_url(&base_url),
        }
    }

    fn url(&self, path: &str) -> anyhow::Result<Url> {
        self.base_url
            .join(path)
            .with_context(|| format!("invalid endpoint path: {}", path))
    }

    /// POST a JSON body and decode the JSON response.
    pub async fn post<Req, Res>(&self, path: &str, body: &Req) -> anyhow::Result<Res>
    where
        Req: Serialize + ?Sized,
        Res: DeserializeOwned,
    {
        let url = self.url(path)?;
        let response = self.client.post(url).json(body).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(anyhow::anyhow!("Error: Status {}", status.as_u16()));
        }
        Ok(response.json::<Res>().await?)
    }

    /// `GET /health` must answer 2xx.
    pub async fn health(&self) -> anyhow::Result<()> {
        let url = self.url("health")?;
        let response = self.client.get(url).send().await?;
        if !response.status().is_success() {
            return Err(anyhow::anyhow!("health check returned {}", response.status()));
        }
        Ok(())
    }
}

/// Split a comma-separated input into exactly `expected` trimmed fields.
fn split_fields<'a>(input: &'a str, expected: usize, usage: &str) -> anyhow::Result<Vec<&'a str>> {
    let fields: Vec<&str> = input.split(',').map(str::trim).collect();
    if fields.len() != expected {
        return Err(anyhow::anyhow!("Use format '{}'", usage));
    }
    Ok(fields)
}
