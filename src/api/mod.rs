//! HTTP API for the travel agent.
//!
//! ## Endpoints
//!
//! - `POST /api/plan` - Run the agent on a travel request
//! - `GET /api/tools` - List the tool catalog
//! - `GET /api/health` - Health check

mod routes;
pub mod types;

pub use routes::{router, AppState};

use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;
use tracing::{info, warn};

use crate::agent::Agent;
use crate::config::Config;
use crate::llm::OllamaClient;
use crate::tools::ToolRegistry;

/// Wire up the agent from `config` and serve the API until shutdown.
pub async fn serve(config: Config) -> anyhow::Result<()> {
    let llm = OllamaClient::new(
        &config.ollama_url,
        config.default_model.clone(),
        config.temperature,
        config.llm_timeout,
    )?;
    let tools = ToolRegistry::from_config(&config)?;

    let unhealthy = tools.probe_health().await;
    if !unhealthy.is_empty() {
        warn!(
            "{} of {} tool back-ends are not reachable: {}",
            unhealthy.len(),
            tools.len(),
            unhealthy.join(", ")
        );
    }

    let agent = Agent::new(&config, Arc::new(llm), tools);
    let app = router(Arc::new(AppState { agent }));

    let addr = format!("{}:{}", config.host, config.port);
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    info!("Travel agent listening on {}", addr);

    axum::serve(listener, app).await?;
    Ok(())
}
