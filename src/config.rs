//! Environment-based configuration module
//!
//! This module provides configuration management for different environments:
//! - Development: Verbose logging, relaxed validation
//! - Production: Minimal logging, requires Shopify credentials
//!
//! Configuration can be set via:
//! 1. Environment variables (highest priority)
//! 2. Default values (lowest priority)

use serde::{Deserialize, Serialize};
use std::env;
use std::sync::OnceLock;

/// Application environment mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Development,
    Production,
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Development => "development",
            Environment::Production => "production",
        }
    }

    /// Get environment from APP_ENV variable or default to Development
    pub fn from_env() -> Self {
        match env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()).as_str() {
            "production" => Environment::Production,
            "development" | _ => Environment::Development,
        }
    }

    pub fn is_production(&self) -> bool {
        *self == Environment::Production
    }
}

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Environment mode
    pub environment: Environment,

    /// Application name
    pub app_name: String,

    /// Application version
    pub version: String,

    /// Database configuration
    pub database: DatabaseConfig,

    /// Shopify Admin API configuration
    pub shopify: ShopifyConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// SQLite database path (relative to app data dir)
    pub path: String,

    /// Maximum number of connections
    pub max_connections: u32,

    /// Minimum number of connections
    pub min_connections: u32,

    /// Connection timeout in seconds
    pub connect_timeout_secs: u64,

    /// Idle timeout in seconds
    pub idle_timeout_secs: u64,
}

/// Shopify Admin API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShopifyConfig {
    /// Shop domain, e.g. "my-store.myshopify.com"
    pub shop_domain: String,

    /// Admin API version segment, e.g. "2025-04"
    pub api_version: String,

    /// Admin API access token (set via SHOPIFY_ADMIN_TOKEN in production)
    pub admin_token: Option<String>,

    /// Per-request timeout in seconds
    pub request_timeout_secs: u64,

    /// TCP connect timeout in seconds
    pub connect_timeout_secs: u64,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    pub level: String,

    /// Log to file
    pub log_to_file: bool,

    /// Log to stdout
    pub log_to_stdout: bool,

    /// Use JSON format (true for production)
    pub json_format: bool,

    /// Maximum log file size in MB
    pub max_file_size_mb: u64,

    /// Maximum number of log files to keep
    pub max_log_files: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        let env = Environment::from_env();

        Self {
            environment: env,
            app_name: env::var("APP_NAME").unwrap_or_else(|_| "Variant Discounts".to_string()),
            version: env!("CARGO_PKG_VERSION").to_string(),

            database: DatabaseConfig {
                path: env::var("DB_PATH").unwrap_or_else(|_| "discounts.db".to_string()),
                max_connections: env::var("DB_MAX_CONNECTIONS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(10),
                min_connections: env::var("DB_MIN_CONNECTIONS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(2),
                connect_timeout_secs: 30,
                idle_timeout_secs: 600,
            },

            shopify: ShopifyConfig {
                shop_domain: env::var("SHOPIFY_SHOP_DOMAIN").unwrap_or_default(),
                api_version: env::var("SHOPIFY_API_VERSION")
                    .unwrap_or_else(|_| "2025-04".to_string()),
                admin_token: env::var("SHOPIFY_ADMIN_TOKEN").ok(),
                request_timeout_secs: env::var("SHOPIFY_REQUEST_TIMEOUT_SECS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(15),
                connect_timeout_secs: 10,
            },

            logging: LoggingConfig {
                level: env::var("RUST_LOG").unwrap_or_else(|_| {
                    if env.is_production() { "warn".to_string() } else { "debug".to_string() }
                }),
                log_to_file: true,
                log_to_stdout: env::var("LOG_TO_STDOUT")
                    .map(|s| s == "true")
                    .unwrap_or(true),
                json_format: env.is_production(),
                max_file_size_mb: 10,
                max_log_files: 5,
            },
        }
    }
}

impl AppConfig {
    /// Load configuration from environment and defaults
    pub fn load() -> Self {
        Self::default()
    }

    pub fn is_production(&self) -> bool {
        self.environment.is_production()
    }

    /// Admin GraphQL endpoint for the configured shop
    pub fn graphql_endpoint(&self) -> String {
        format!(
            "https://{}/admin/api/{}/graphql.json",
            self.shopify.shop_domain, self.shopify.api_version
        )
    }

    /// Validate configuration for production
    pub fn validate(&self) -> Result<(), String> {
        if self.is_production() {
            if self.shopify.admin_token.is_none() {
                return Err(
                    "SHOPIFY_ADMIN_TOKEN must be set in production. \
                     Set it via environment variable for security.".to_string()
                );
            }

            if self.shopify.shop_domain.is_empty() {
                return Err("SHOPIFY_SHOP_DOMAIN must be set in production.".to_string());
            }
        }

        Ok(())
    }
}

/// Global configuration instance
static GLOBAL_CONFIG: OnceLock<AppConfig> = OnceLock::new();

/// Initialize the global configuration
pub fn init_config() -> &'static AppConfig {
    GLOBAL_CONFIG.get_or_init(AppConfig::load)
}

/// Get the global configuration
pub fn get_config() -> &'static AppConfig {
    GLOBAL_CONFIG.get().expect("Configuration not initialized. Call init_config() first.")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn graphql_endpoint_builds_admin_url() {
        let mut config = AppConfig::load();
        config.shopify.shop_domain = "my-store.myshopify.com".to_string();
        config.shopify.api_version = "2025-04".to_string();

        assert_eq!(
            config.graphql_endpoint(),
            "https://my-store.myshopify.com/admin/api/2025-04/graphql.json"
        );
    }

    #[test]
    fn production_validation_requires_credentials() {
        let mut config = AppConfig::load();
        config.environment = Environment::Production;
        config.shopify.admin_token = None;
        assert!(config.validate().is_err());

        config.shopify.admin_token = Some("shpat_test".to_string());
        config.shopify.shop_domain = "my-store.myshopify.com".to_string();
        assert!(config.validate().is_ok());
    }
}
