use std::env;
use tracing::debug;

use crate::config::{parse_bool, ConfigError};

/// Credentials of the demo account that logs in without registration.
#[derive(Debug, Clone)]
pub struct DemoUserConfig {
    pub enabled: bool,
    pub name: String,
    pub email: String,
    pub password: String,
}

impl DemoUserConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = DemoUserConfig::default();

        let enabled = match env::var("DEMO_USER_ENABLED") {
            Ok(raw) => parse_bool(&raw)
                .ok_or_else(|| ConfigError::InvalidValue(format!("DEMO_USER_ENABLED: {}", raw)))?,
            Err(_) => defaults.enabled,
        };
        let name = env::var("DEMO_USER_NAME").unwrap_or(defaults.name);
        let email = env::var("DEMO_USER_EMAIL")
            .map(|e| e.trim().to_lowercase())
            .unwrap_or(defaults.email);
        let password = env::var("DEMO_USER_PASSWORD").unwrap_or(defaults.password);

        if enabled && (email.is_empty() || password.is_empty()) {
            return Err(ConfigError::ValidationError(
                "DEMO_USER_EMAIL and DEMO_USER_PASSWORD cannot be empty".to_string(),
            ));
        }

        debug!(enabled, email = %email, "Demo user configuration loaded");
        Ok(DemoUserConfig { enabled, name, email, password })
    }

    /// Whether the given login attempt uses the demo credentials.
    pub fn matches(&self, email: &str, password: &str) -> bool {
        self.enabled && email == self.email && password == self.password
    }
}

impl Default for DemoUserConfig {
    fn default() -> Self {
        DemoUserConfig {
            enabled: true,
            name: "Demo Admin".to_string(),
            email: "admin@example.com".to_string(),
            password: "password".to_string(),
        }
    }
}
