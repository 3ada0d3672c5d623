use anyhow::Result;

use cadenza_server::{AppState, Config};

use super::open_catalog;

pub async fn run_server(config: Config) -> Result<()> {
    let catalog = open_catalog(&config.database_path)?;
    tracing::info!("Using database {}", config.database_path.display());

    cadenza_server::serve(&config.listen_addr, AppState::new(catalog)).await
}
