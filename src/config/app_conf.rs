use std::env;
use tracing::{debug, warn};

use crate::config::ConfigError;

const DEFAULT_CORS_ORIGINS: &str = "http://localhost:5173,http://localhost:3000";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    /// Origins allowed to call the API from a browser
    pub cors_allowed_origins: Vec<String>,
    /// bcrypt work factor used for new password hashes
    pub bcrypt_cost: u32,
}

impl AppConfig {
    /// Expected environment variables:
    /// - APP_HOST (defaults to 127.0.0.1)
    /// - APP_PORT (defaults to 3001)
    /// - CORS_ALLOWED_ORIGINS: comma separated list
    /// - BCRYPT_COST (defaults to 12)
    pub fn from_env() -> Result<Self, ConfigError> {
        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = match env::var("APP_PORT") {
            Ok(raw) => raw
                .parse::<u16>()
                .map_err(|_| ConfigError::InvalidValue(format!("APP_PORT: {}", raw)))?,
            Err(_) => {
                debug!("APP_PORT not set, using default: 3001");
                3001
            }
        };

        let origins = env::var("CORS_ALLOWED_ORIGINS").unwrap_or_else(|_| DEFAULT_CORS_ORIGINS.to_string());
        let cors_allowed_origins = split_origins(&origins);

        let bcrypt_cost = match env::var("BCRYPT_COST") {
            Ok(raw) => raw
                .parse::<u32>()
                .map_err(|_| ConfigError::InvalidValue(format!("BCRYPT_COST: {}", raw)))?,
            Err(_) => {
                warn!("BCRYPT_COST not set, using default: 12");
                12
            }
        };

        let config = AppConfig { host, port, cors_allowed_origins, bcrypt_cost };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.host.trim().is_empty() {
            return Err(ConfigError::ValidationError("APP_HOST cannot be empty".to_string()));
        }
        // bcrypt only accepts costs in 4..=31
        if !(4..=31).contains(&self.bcrypt_cost) {
            return Err(ConfigError::ValidationError(format!(
                "BCRYPT_COST must be between 4 and 31, got {}",
                self.bcrypt_cost
            )));
        }
        Ok(())
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            host: "127.0.0.1".to_string(),
            port: 3001,
            cors_allowed_origins: split_origins(DEFAULT_CORS_ORIGINS),
            bcrypt_cost: 12,
        }
    }
}

fn split_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(str::to_string)
        .collect()
}
