//! Mock MCP tool back-ends.
//!
//! Each back-end is a small axum service exposing one `POST /tools/<name>`
//! endpoint plus `GET /health` and `GET /`. The lookup logic is kept in plain
//! functions so it can be exercised without a socket.

pub mod budget;
pub mod calculator;
pub mod currency;
pub mod destination;
pub mod weather;

use axum::{routing::get, Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Root endpoint payload describing a back-end.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceInfo {
    pub service: String,
    pub version: String,
    pub endpoints: Vec<String>,
}

/// `GET /health` and `GET /` for a back-end named `service`.
pub(crate) fn common_routes(service: &'static str, endpoints: &'static [&'static str]) -> Router {
    Router::new()
        .route(
            "/health",
            get(move || async move { Json(health_payload(service)) }),
        )
        .route(
            "/",
            get(move || async move {
                Json(ServiceInfo {
                    service: service.to_string(),
                    version: "1.0".to_string(),
                    endpoints: endpoints.iter().map(|e| e.to_string()).collect(),
                })
            }),
        )
}

fn health_payload(service: &str) -> Value {
    json!({ "status": "healthy", "service": service })
}

/// Serve `router` on an already-bound listener until the process exits.
pub async fn serve(listener: TcpListener, router: Router) -> anyhow::Result<()> {
    let app = router.layer(TraceLayer::new_for_http());
    axum::serve(listener, app).await?;
    Ok(())
}

/// Entry point shared by the back-end binaries.
///
/// Installs logging, binds `HOST:PORT` (port defaults to `default_port`) and serves.
pub async fn run_standalone(service: &str, default_port: u16, router: Router) -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "travel_agent=debug,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port: u16 = match std::env::var("PORT") {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|e| anyhow::anyhow!("Invalid value for PORT: {}", e))?,
        Err(_) => default_port,
    };

    let addr = format!("{}:{}", host, port);
    let listener = TcpListener::bind(&addr).await?;
    info!(service, %addr, "Starting tool server");

    serve(listener, router).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn health_payload_names_service() {
        let payload = health_payload("budget-tools");
        assert_eq!(payload["status"], "healthy");
        assert_eq!(payload["service"], "budget-tools");
    }
}
