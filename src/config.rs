//! Configuration management for the travel agent.
//!
//! Configuration can be set via environment variables:
//! - `OLLAMA_URL` - Optional. Base URL of the Ollama server. Defaults to `http://localhost:11434`.
//! - `DEFAULT_MODEL` - Optional. The model to use. Defaults to `gemma2:9b`.
//! - `LLM_TEMPERATURE` - Optional. Sampling temperature. Defaults to `0.7`.
//! - `LLM_TIMEOUT_SECS` - Optional. Timeout for one completion call. Defaults to `120`.
//! - `HOST` - Optional. Server host. Defaults to `127.0.0.1`.
//! - `PORT` - Optional. Server port. Defaults to `3000`.
//! - `MAX_ITERATIONS` - Optional. Maximum agent loop iterations. Defaults to `15`.
//! - `TOOL_TIMEOUT_SECS` - Optional. Timeout for one tool back-end call. Defaults to `5`.
//! - `TOOL_ORDER` - Optional. Comma-separated priority order used to suggest the next tool.
//! - `STRICT_COMPLETION` - Optional. Reject final answers given before every tool was called.
//! - `BUDGET_SERVER_URL`, `SEARCH_SERVER_URL`, `WEATHER_SERVER_URL`,
//!   `CURRENCY_SERVER_URL`, `CALCULATOR_SERVER_URL` - Optional. Tool back-end base URLs.
//!   Default to `http://localhost:3333` through `http://localhost:3337`.

use std::time::Duration;

use thiserror::Error;
use url::Url;

/// Priority order used to suggest the next tool when nothing else is configured.
pub const CANONICAL_TOOL_ORDER: [&str; 5] = [
    "search_destination",
    "estimate_budget",
    "get_weather",
    "convert_currency",
    "calculate",
];

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),
}

/// Base URLs of the five tool back-ends.
#[derive(Debug, Clone)]
pub struct ToolServers {
    pub budget: Url,
    pub search: Url,
    pub weather: Url,
    pub currency: Url,
    pub calculator: Url,
}

impl ToolServers {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            budget: url_var("BUDGET_SERVER_URL", "http://localhost:3333")?,
            search: url_var("SEARCH_SERVER_URL", "http://localhost:3334")?,
            weather: url_var("WEATHER_SERVER_URL", "http://localhost:3335")?,
            currency: url_var("CURRENCY_SERVER_URL", "http://localhost:3336")?,
            calculator: url_var("CALCULATOR_SERVER_URL", "http://localhost:3337")?,
        })
    }
}

/// Agent configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Ollama server base URL
    pub ollama_url: Url,

    /// Model identifier passed to Ollama
    pub default_model: String,

    /// Sampling temperature
    pub temperature: f32,

    /// Timeout for a single completion call
    pub llm_timeout: Duration,

    /// Server host
    pub host: String,

    /// Server port
    pub port: u16,

    /// Maximum iterations for the agent loop
    pub max_iterations: usize,

    /// Timeout for a single tool back-end call
    pub tool_timeout: Duration,

    /// Priority order for suggesting the next required tool
    pub tool_order: Vec<String>,

    /// Refuse a final answer while tools are still missing
    pub strict_completion: bool,

    /// Tool back-end locations
    pub servers: ToolServers,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if any variable is set but cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        let ollama_url = url_var("OLLAMA_URL", "http://localhost:11434")?;

        let default_model =
            std::env::var("DEFAULT_MODEL").unwrap_or_else(|_| "gemma2:9b".to_string());

        let temperature = parsed_var("LLM_TEMPERATURE", 0.7_f32)?;
        let llm_timeout = Duration::from_secs(parsed_var("LLM_TIMEOUT_SECS", 120_u64)?);

        let host = std::env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = parsed_var("PORT", 3000_u16)?;

        let max_iterations = parsed_var("MAX_ITERATIONS", 15_usize)?;
        if max_iterations == 0 {
            return Err(ConfigError::InvalidValue(
                "MAX_ITERATIONS".to_string(),
                "must be at least 1".to_string(),
            ));
        }

        let tool_timeout = Duration::from_secs(parsed_var("TOOL_TIMEOUT_SECS", 5_u64)?);

        let tool_order = match std::env::var("TOOL_ORDER") {
            Ok(raw) => parse_tool_order(&raw),
            Err(_) => default_tool_order(),
        };

        let strict_completion = std::env::var("STRICT_COMPLETION")
            .ok()
            .map(|v| {
                parse_bool(&v)
                    .map_err(|e| ConfigError::InvalidValue("STRICT_COMPLETION".to_string(), e))
            })
            .transpose()?
            .unwrap_or(false);

        Ok(Self {
            ollama_url,
            default_model,
            temperature,
            llm_timeout,
            host,
            port,
            max_iterations,
            tool_timeout,
            tool_order,
            strict_completion,
            servers: ToolServers::from_env()?,
        })
    }

    /// Create a config with custom values (useful for testing).
    pub fn new(ollama_url: Url, default_model: String, servers: ToolServers) -> Self {
        Self {
            ollama_url,
            default_model,
            temperature: 0.7,
            llm_timeout: Duration::from_secs(120),
            host: "127.0.0.1".to_string(),
            port: 3000,
            max_iterations: 15,
            tool_timeout: Duration::from_secs(5),
            tool_order: default_tool_order(),
            strict_completion: false,
            servers,
        }
    }
}

pub fn default_tool_order() -> Vec<String> {
    CANONICAL_TOOL_ORDER.iter().map(|s| s.to_string()).collect()
}

fn parse_tool_order(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn url_var(name: &str, default: &str) -> Result<Url, ConfigError> {
    let raw = std::env::var(name).unwrap_or_else(|_| default.to_string());
    Url::parse(raw.trim()).map_err(|e| ConfigError::InvalidValue(name.to_string(), e.to_string()))
}

/// `url` with a path ending in `/`, so `Url::join` appends to it instead of
/// replacing the last segment.
pub fn base_url(url: &Url) -> Url {
    let mut base = url.clone();
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }
    base
}

fn parsed_var<T>(name: &str, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|e: T::Err| ConfigError::InvalidValue(name.to_string(), format!("{}", e))),
        Err(_) => Ok(default),
    }
}

fn parse_bool(value: &str) -> Result<bool, String> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "t" | "yes" | "y" | "on" => Ok(true),
        "0" | "false" | "f" | "no" | "n" | "off" => Ok(false),
        other => Err(format!("expected boolean-like value, got: {}", other)),
    }
}
