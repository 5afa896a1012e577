//! Weather back-end server.

use travel_agent::servers::{self, weather};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    servers::run_standalone("weather-tools", 3335, weather::router()).await
}
