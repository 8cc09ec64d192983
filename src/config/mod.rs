use crate::core::{AppError, Result};
use serde::Deserialize;
use std::env;

pub mod database;
pub mod server;
pub mod tax;

pub use database::DatabaseConfig;
pub use server::ServerConfig;
pub use tax::TaxConfig;

/// Main application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub app: AppConfig,
    pub database: DatabaseConfig,
    pub server: ServerConfig,
    pub tax: TaxConfig,
    pub billing: BillingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub env: String,
    pub log_format: LogFormat,
    pub cors_allowed_origin: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    Json,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BillingConfig {
    /// Shared secret for HMAC-SHA256 signatures on payment webhooks
    pub webhook_secret: String,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present
        dotenvy::dotenv().ok();

        let log_format = match env::var("LOG_FORMAT")
            .unwrap_or_else(|_| "pretty".to_string())
            .to_lowercase()
            .as_str()
        {
            "json" => LogFormat::Json,
            "pretty" => LogFormat::Pretty,
            other => {
                return Err(AppError::Configuration(format!(
                    "Invalid LOG_FORMAT '{}', expected 'pretty' or 'json'",
                    other
                )))
            }
        };

        let config = Config {
            app: AppConfig {
                env: env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
                log_format,
                cors_allowed_origin: env::var("CORS_ALLOWED_ORIGIN").ok(),
            },
            database: DatabaseConfig::from_env()?,
            server: ServerConfig::from_env()?,
            tax: TaxConfig::from_env()?,
            billing: BillingConfig {
                webhook_secret: env::var("PAYMENT_WEBHOOK_SECRET").map_err(|_| {
                    AppError::Configuration("PAYMENT_WEBHOOK_SECRET not set".to_string())
                })?,
            },
        };

        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        self.tax.validate()?;

        if self.billing.webhook_secret.trim().is_empty() {
            return Err(AppError::Configuration(
                "PAYMENT_WEBHOOK_SECRET must not be empty".to_string(),
            ));
        }

        if self.database.pool_size > self.database.max_connections {
            return Err(AppError::Configuration(
                "DATABASE_POOL_SIZE cannot exceed DATABASE_MAX_CONNECTIONS".to_string(),
            ));
        }

        Ok(())
    }
}
