use std::sync::Arc;

use crewai_rules_mcp::{domain::tools::build_registry, logging, stdio, AppState};
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init_logging();

    let registry = build_registry()?;
    info!(tools = registry.len(), "rules registry initialized");

    let state = AppState::new(Arc::new(registry));
    stdio::serve_stdio(state).await?;
    Ok(())
}
