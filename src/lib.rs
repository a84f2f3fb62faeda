pub mod api;
pub mod config;
pub mod error;
pub mod logic;
pub mod model;
pub mod store;

pub use api::create_router;
pub use error::{CatalogError, Result};
pub use logic::{build_category_tree, CategoryTreeNode};
pub use model::*;
pub use store::{MemoryStore, PostgresStore, Store};

// Function for integration testing
pub async fn run_server() -> anyhow::Result<()> {
    use axum::serve;
    use std::sync::Arc;
    use tokio::net::TcpListener;

    // Load environment variables from .env file if it exists
    dotenvy::dotenv().ok();

    // Initialize logging with INFO level only (suppress DEBUG logs)
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .try_init();

    // Load configuration
    let config = crate::config::AppConfig::load()?;

    // Connect to PostgreSQL
    let database_url = config.database_url()?;
    let max_connections = config.database.max_connections.unwrap_or(20);
    let postgres_store = crate::store::PostgresStore::new(&database_url, max_connections).await?;

    // Run migrations
    postgres_store.migrate().await?;

    let store = Arc::new(postgres_store);

    // Create router with state
    let app = crate::api::create_router().with_state(store);

    let bind_address = config.server_address();
    let listener = TcpListener::bind(&bind_address).await?;

    serve(listener, app).await?;

    Ok(())
}
