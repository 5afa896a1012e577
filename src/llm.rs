//! Text-completion client.
//!
//! The agent only needs one capability from a model: turn a prompt string
//! into a completion string. [`LlmClient`] is that seam; [`OllamaClient`]
//! implements it against an Ollama-style `POST /api/generate` endpoint.

use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use url::Url;

/// Prompt in, completion out. No streaming, no structured output.
#[async_trait]
pub trait LlmClient: Send + Sync {
    async fn complete(&self, prompt: &str) -> anyhow::Result<String>;
}

/// Client for an Ollama server.
pub struct OllamaClient {
    client: Client,
    endpoint: Url,
    model: String,
    temperature: f32,
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    options: GenerateOptions,
}

#[derive(Serialize)]
struct GenerateOptions {
    temperature: f32,
}

#[derive(Deserialize)]
struct GenerateResponse {
    response: String,
}

impl OllamaClient {
    /// Create a client for the server at `base_url`.
    pub fn new(
        base_url: &Url,
        model: impl Into<String>,
        temperature: f32,
        timeout: Duration,
    ) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("failed to build ollama http client")?;
        let endpoint = crate::config::base_url(base_url)
            .join("api/generate")
            .context("invalid ollama base url")?;

        Ok(Self {
            client,
            endpoint,
            model: model.into(),
            temperature,
        })
    }
}

#[async_trait]
impl LlmClient for OllamaClient {
    async fn complete(&self, prompt: &str) -> anyhow::Result<String> {
        let request = GenerateRequest {
            model: &self.model,
            prompt,
            stream: false,
            options: GenerateOptions {
                temperature: self.temperature,
            },
        };

        let res = self
            .client
            .post(self.endpoint.clone())
            .json(&request)
            .send()
            .await
            .context("ollama request failed")?
            .error_for_status()
            .context("ollama non-2xx response")?
            .json::<GenerateResponse>()
            .await
            .context("ollama response decode failed")?;

        Ok(res.response)
    }
}
