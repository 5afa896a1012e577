//! Calculator back-end server.

use travel_agent::servers::{self, calculator};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    servers::run_standalone("calculator-tools", 3337, calculator::router()).await
}
