//! Currency conversion back-end server.

use travel_agent::servers::{self, currency};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    servers::run_standalone("currency-tools", 3336, currency::router()).await
}
