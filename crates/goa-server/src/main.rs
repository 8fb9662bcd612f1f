//! GOA Server - Main entry point

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use sqlx::postgres::PgPoolOptions;
use tracing::info;

use goa_common::logging::{init_logging, LogConfig};
use goa_server::cache::memory::MemoryCache;
use goa_server::config::Config;
use goa_server::features::AppState;
use goa_server::query::filer::FilerClient;
use goa_server::{api, cache::CacheStore};

#[tokio::main]
async fn main() -> Result<()> {
    let log_config = LogConfig::builder()
        .log_file_prefix("goa-server".to_string())
        .filter_directives("goa_server=debug,tower_http=debug,axum=trace,sqlx=info".to_string())
        .build();

    // Environment variables take precedence
    let log_config = LogConfig::from_env().unwrap_or(log_config);

    init_logging(&log_config)?;

    info!("Starting GOA Server");

    let config = Config::load()?;
    info!(
        "Configuration loaded - server will bind to {}:{}",
        config.server.host, config.server.port
    );

    let db_pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .min_connections(config.database.min_connections)
        .acquire_timeout(Duration::from_secs(config.database.connect_timeout_secs))
        .idle_timeout(Duration::from_secs(config.database.idle_timeout_secs))
        .connect(&config.database.url)
        .await?;

    info!("Database connection pool established");

    let cache: Arc<dyn CacheStore> = Arc::new(MemoryCache::new());
    let filer = FilerClient::new(config.filer.base_url.clone());

    let state = AppState::new(db_pool, cache, filer);

    api::serve(config, state).await
}
