//! Budget estimator back-end.

use axum::{routing::post, Json, Router};
use serde::{Deserialize, Serialize};

/// Flat daily cost in USD.
pub const BASE_DAILY_COST: f64 = 200.0;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BudgetRequest {
    pub destination: String,
    pub days: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BudgetResponse {
    pub destination: String,
    pub days: u32,
    pub estimated_budget: f64,
}

pub fn estimate(request: &BudgetRequest) -> BudgetResponse {
    BudgetResponse {
        destination: request.destination.clone(),
        days: request.days,
        estimated_budget: BASE_DAILY_COST * f64::from(request.days),
    }
}

async fn estimate_budget(Json(request): Json<BudgetRequest>) -> Json<BudgetResponse> {
    tracing::debug!(destination = %request.destination, days = request.days, "Estimating budget");
    Json(estimate(&request))
}

pub fn router() -> Router {
    Router::new()
        .route("/tools/estimate_budget", post(estimate_budget))
        .merge(super::common_routes(
            "budget-tools",
            &["/tools/estimate_budget", "/health"],
        ))
}
