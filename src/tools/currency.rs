//! Currency conversion tool.

use anyhow::Context;
use async_trait::async_trait;

use super::{split_fields, Backend, Tool};
use crate::servers::currency::{CurrencyRequest, CurrencyResponse};

/// Convert an amount between currencies.
pub struct ConvertCurrency {
    backend: Backend,
}

impl ConvertCurrency {
    pub fn new(backend: Backend) -> Self {
        Self { backend }
    }
}

fn parse_input(input: &str) -> anyhow::Result<CurrencyRequest> {
    let fields = split_fields(input, 3, "amount,from_currency,to_currency")?;
    let amount = fields[0]
        .trim_start_matches('$')
        .parse::<f64>()
        .with_context(|| format!("amount must be a number, got '{}'", fields[0]))?;

    Ok(CurrencyRequest {
        amount,
        from_currency: fields[1].to_uppercase(),
        to_currency: fields[2].to_uppercase(),
    })
}

fn render(response: &CurrencyResponse) -> String {
    format!(
        "{} {} = {} {} (rate: {})",
        response.original_amount,
        response.original_currency,
        response.converted_amount,
        response.converted_currency,
        response.exchange_rate
    )
}

#[async_trait]
impl Tool for ConvertCurrency {
    fn name(&self) -> &str {
        "convert_currency"
    }

    fn description(&self) -> &str {
        "Convert currency. Input: 'amount,from_currency,to_currency' (e.g., '1000,USD,EUR')"
    }

    async fn invoke(&self, input: &str) -> anyhow::Result<String> {
        let request = parse_input(input)?;
        let response: CurrencyResponse = self
            .backend
            .post("tools/convert_currency", &request)
            .await?;
        Ok(render(&response))
    }

    async fn health_check(&self) -> anyhow::Result<()> {
        self.backend.health().await
    }
}
