//! Arithmetic tool.

use async_trait::async_trait;

use super::{Backend, Tool};
use crate::servers::calculator::{CalculatorRequest, CalculatorResponse};

/// Evaluate an arithmetic expression on the calculator back-end.
pub struct Calculate {
    backend: Backend,
}

impl Calculate {
    pub fn new(backend: Backend) -> Self {
        Self { backend }
    }
}

/// An evaluation error reported by the back-end is still a valid observation.
fn render(response: &CalculatorResponse) -> String {
    if response.success {
        format!("{} = {}", response.expression, response.result)
    } else {
        format!(
            "Error: {}",
            response.error.as_deref().unwrap_or("calculation failed")
        )
    }
}

#[async_trait]
impl Tool for Calculate {
    fn name(&self) -> &str {
        "calculate"
    }

    fn description(&self) -> &str {
        "Perform arithmetic calculation. Input: mathematical expression (e.g., '100*5+200')"
    }

    async fn invoke(&self, input: &str) -> anyhow::Result<String> {
        let request = CalculatorRequest {
            expression: input.trim().to_string(),
        };
        let response: CalculatorResponse = self.backend.post("tools/calculate", &request).await?;
        Ok(render(&response))
    }

    async fn health_check(&self) -> anyhow::Result<()> {
        self.backend.health().await
    }
}
