//! Weather lookup tool.

use async_trait::async_trait;

use super::{Backend, Tool};
use crate::servers::weather::{WeatherRequest, WeatherResponse};

/// Seasonal weather for a destination, optionally on a given date.
pub struct GetWeather {
    backend: Backend,
}

impl GetWeather {
    pub fn new(backend: Backend) -> Self {
        Self { backend }
    }
}

/// `destination` or `destination,YYYY-MM-DD`. The date is passed through as-is;
/// the back-end falls back to the current season if it cannot parse it.
fn parse_input(input: &str) -> anyhow::Result<WeatherRequest> {
    let mut parts = input.splitn(2, ',');
    let destination = parts.next().unwrap_or_default().trim();
    if destination.is_empty() {
        return Err(anyhow::anyhow!("Destination name is required"));
    }
    let date = parts
        .next()
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .map(str::to_string);

    Ok(WeatherRequest {
        destination: destination.to_string(),
        date,
    })
}

fn render(response: &WeatherResponse) -> String {
    format!(
        "Weather for {}:\nTemperature: {}\nConditions: {}\nRecommendation: {}",
        response.destination, response.temperature, response.conditions, response.recommendation
    )
}

#[async_trait]
impl Tool for GetWeather {
    fn name(&self) -> &str {
        "get_weather"
    }

    fn description(&self) -> &str {
        "Get weather info for a destination. Input: destination name (or 'destination,YYYY-MM-DD')"
    }

    async fn invoke(&self, input: &str) -> anyhow::Result<String> {
        let request = parse_input(input)?;
        let response: WeatherResponse = self.backend.post("tools/get_weather", &request).await?;
        Ok(render(&response))
    }

    async fn health_check(&self) -> anyhow::Result<()> {
        self.backend.health().await
    }
}
