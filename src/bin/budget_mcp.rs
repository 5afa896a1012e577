//! Budget estimation back-end server.

use travel_agent::servers::{self, budget};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    servers::run_standalone("budget-tools", 3333, budget::router()).await
}
