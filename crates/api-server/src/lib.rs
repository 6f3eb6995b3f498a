pub mod api;
pub mod error;
pub mod state;
pub mod views;

pub use api::create_router;

use anyhow::Result;
use infrastructure::ServerConfig;
use infrastructure::database::connect_and_migrate;
use state::AppState;
use std::sync::Arc;

/// Connect to the configured database, apply migrations and build the state.
pub async fn setup_app_state(config: ServerConfig) -> Result<Arc<AppState>> {
    let db = connect_and_migrate(&config.database_url).await?;
    Ok(Arc::new(AppState::new(db, config)))
}
