//! Label Desk Backend
//!
//! Serves the label designer SPA together with its authentication, user
//! management and label tooling API.

use label_desk::{api, auth, core, db};

use anyhow::Result;
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration (handles CLI args, env vars, and config file)
    let config = match core::config::Config::load() {
        Ok(cfg) => cfg,
        Err(e) => {
            // Print error to stderr since logging isn't initialized yet
            eprintln!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };

    let _logger = match core::Logger::init(&config.logging) {
        Ok(logger) => logger,
        Err(e) => {
            eprintln!("Failed to initialize logging: {}", e);
            return Err(e);
        }
    };

    info!("Starting Label Desk Backend v{}", label_desk::VERSION);
    info!(
        host = %config.server.host,
        port = config.server.port,
        environment = ?config.server.environment,
        "Server configuration"
    );
    info!(
        path = ?config.database.path,
        pool_size = config.database.connection_pool_size,
        "Database configuration"
    );

    info!("Initializing database...");
    let db = Arc::new(db::DatabaseManager::new(
        &config.database.path,
        config.database.connection_pool_size,
        std::time::Duration::from_millis(config.database.busy_timeout),
    )?);
    info!(pool_size = db.pool_size(), "Database initialized successfully");

    let user_repo = db::UserRepository::new(db.clone());
    auth::ensure_default_admin(&user_repo, config.security.bcrypt_cost).await?;

    info!("Initializing HTTP server...");
    let server_url = format!("http://{}:{}", config.server.host, config.server.port);
    let server = api::ApiServer::new(config, db)?;

    info!(url = %server_url, "Server ready - starting to serve requests");

    server.serve().await?;

    Ok(())
}
