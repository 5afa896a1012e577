//! Destination search back-end server.

use travel_agent::servers::{self, destination};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    servers::run_standalone("search-tools", 3334, destination::router()).await
}
