//! Budget estimation tool.

use anyhow::Context;
use async_trait::async_trait;

use super::{split_fields, Backend, Tool};
use crate::servers::budget::{BudgetRequest, BudgetResponse};

/// Estimate the cost of a trip.
pub struct EstimateBudget {
    backend: Backend,
}

impl EstimateBudget {
    pub fn new(backend: Backend) -> Self {
        Self { backend }
    }
}

fn parse_input(input: &str) -> anyhow::Result<BudgetRequest> {
    let fields = split_fields(input, 2, "destination,days")?;
    let days = fields[1]
        .parse::<u32>()
        .with_context(|| format!("days must be a whole number, got '{}'", fields[1]))?;

    Ok(BudgetRequest {
        destination: fields[0].to_string(),
        days,
    })
}

fn render(response: &BudgetResponse) -> String {
    format!(
        "Budget: ${:.2} USD for {} days in {}",
        response.estimated_budget, response.days, response.destination
    )
}

#[async_trait]
impl Tool for EstimateBudget {
    fn name(&self) -> &str {
        "estimate_budget"
    }

    fn description(&self) -> &str {
        "Estimates travel budget. Input: 'destination,days' (e.g., 'Barcelona,5')"
    }

    async fn invoke(&self, input: &str) -> anyhow::Result<String> {
        let request = parse_input(input)?;
        let response: BudgetResponse = self
            .backend
            .post("tools/estimate_budget", &request)
            .await?;
        Ok(render(&response))
    }

    async fn health_check(&self) -> anyhow::Result<()> {
        self.backend.health().await
    }
}
