//! HTTP route handlers.

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::agent::Agent;
use crate::tools::ToolInfo;

use super::types::{HealthResponse, PlanRequest, PlanResponse};

/// Shared application state.
pub struct AppState {
    pub agent: Agent,
}

/// Build the API router.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/health", get(health))
        .route("/api/tools", get(list_tools))
        .route("/api/plan", post(plan))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Tool catalog the agent works with.
async fn list_tools(State(state): State<Arc<AppState>>) -> Json<Vec<ToolInfo>> {
    Json(state.agent.tools().list_tools())
}

/// Run the agent on one request and wait for the result.
async fn plan(
    State(state): State<Arc<AppState>>,
    Json(req): Json<PlanRequest>,
) -> Result<Json<PlanResponse>, (StatusCode, String)> {
    let input = req.input.trim().to_string();
    if input.is_empty() {
        return Err((StatusCode::BAD_REQUEST, "input must not be empty".to_string()));
    }

    let outcome = state.agent.run(&input).await.map_err(|e| {
        tracing::error!(error = %e, "Agent run failed");
        (StatusCode::BAD_GATEWAY, e.to_string())
    })?;

    Ok(Json(PlanResponse::from_outcome(input, outcome)))
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::Request;
    use tower::ServiceExt;

    use super::*;
    use crate::llm::LlmClient;
    use crate::tools::tests::StaticTool;
    use crate::tools::ToolRegistry;

    struct FixedLlm(Result<&'static str, &'static str>);

    #[async_trait]
    impl LlmClient for FixedLlm {
        async fn complete(&self, _prompt: &str) -> anyhow::Result<String> {
            self.0
                .map(str::to_string)
                .map_err(|e| anyhow::anyhow!(e))
        }
    }

    fn app(llm: FixedLlm) -> Router {
        let mut tools = ToolRegistry::new();
        tools.register(Arc::new(StaticTool {
            name: "get_weather",
            reply: "sunny",
        }));
        let agent = Agent::with_defaults(Arc::new(llm), tools);
        router(Arc::new(AppState { agent }))
    }

    fn plan_request(body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/api/plan")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn plan_returns_answer_and_call_log() {
        let app = app(FixedLlm(Ok("FINAL ANSWER: Pack an umbrella.")));
        let response = app
            .oneshot(plan_request(serde_json::json!({ "input": "Paris in May" })))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        assert_eq!(body["input"], "Paris in May");
        assert_eq!(body["output"], "Pack an umbrella.");
        assert_eq!(body["outcome"], "answered");
        assert_eq!(body["iterations"], 1);
        assert_eq!(body["tool_calls"], serde_json::json!([]));
    }

    #[tokio::test]
    async fn empty_input_is_rejected() {
        let app = app(FixedLlm(Ok("FINAL ANSWER: x")));
        let response = app
            .oneshot(plan_request(serde_json::json!({ "input": "   " })))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn completion_failure_maps_to_bad_gateway() {
        let app = app(FixedLlm(Err("model offline")));
        let response = app
            .oneshot(plan_request(serde_json::json!({ "input": "Tokyo" })))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    }

    #[tokio::test]
    async fn tools_endpoint_lists_catalog() {
        let app = app(FixedLlm(Ok("")));
        let response = app
            .oneshot(Request::get("/api/tools").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let body = body_json(response).await;
        assert_eq!(body[0]["name"], "get_weather");
        assert_eq!(body[0]["description"], "Returns a canned reply.");
    }
}
