//! # Travel Agent
//!
//! A travel planning agent that drives a language model through a fixed set
//! of tools before it is allowed to answer.
//!
//! This library provides:
//! - The tool-orchestration loop and its free-text directive protocol
//! - HTTP adapters for the five travel tools
//! - Mock tool back-ends (budget, destination search, weather, currency, calculator)
//! - An HTTP API that runs the agent and reports the call log
//!
//! ## Architecture
//!
//! The agent follows the "tools in a loop" pattern:
//! 1. Receive a request via the API
//! 2. Build a transcript with system prompt, tool catalog and request
//! 3. Call the model, parse its reply, run at most one tool
//! 4. Append the observation or a correction, repeat until answered
//!
//! ## Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use travel_agent::{agent::Agent, config::Config, llm::OllamaClient, tools::ToolRegistry};
//!
//! let config = Config::from_env()?;
//! let llm = OllamaClient::new(&config.ollama_url, config.default_model.clone(), config.temperature, config.llm_timeout)?;
//! let agent = Agent::new(&config, Arc::new(llm), ToolRegistry::from_config(&config)?);
//! let outcome = agent.run("Plan a 5-day trip to Barcelona").await?;
//! ```

pub mod agent;
pub mod api;
pub mod config;
pub mod llm;
pub mod servers;
pub mod tools;

pub use config::Config;
