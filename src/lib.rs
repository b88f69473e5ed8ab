pub mod commands;
pub mod config;
pub mod database;
pub mod errors;
pub mod evaluation;
pub mod logger;
pub mod models;
pub mod shopify;
pub mod sync;
pub mod validation;

use std::path::Path;

use shopify::ShopifyClient;

/// Global application state, shared across handlers.
pub struct AppState {
    pub db: sqlx::SqlitePool,
    pub shopify: ShopifyClient,
}

/// Initialize configuration, logging, the database pool and the Admin
/// API client. Called once at startup with the app data directory.
pub async fn init(app_data_dir: &Path) -> Result<AppState, errors::AppError> {
    let config = config::init_config();
    config
        .validate()
        .map_err(errors::AppError::Internal)?;

    if let Err(e) = logger::init_global_logger(app_data_dir) {
        eprintln!("Warning: failed to initialize logger: {}", e);
    }

    log_info!("APP", "Application starting", serde_json::json!({
        "version": env!("CARGO_PKG_VERSION"),
        "environment": config.environment.as_str(),
        "app_data_dir": app_data_dir.to_string_lossy()
    }));

    let pool = database::connection::init_db(app_data_dir)
        .await
        .map_err(|e| errors::AppError::Internal(format!("Database init failed: {}", e)))?;

    log_info!("DATABASE", "Database connection pool initialized", serde_json::json!({
        "pool_size": pool.size()
    }));

    let shopify = ShopifyClient::from_config()?;

    Ok(AppState { db: pool, shopify })
}
