//! API server configuration.
//!
//! Configuration is loaded from environment variables with fallback to
//! development defaults.

use std::env;

/// API server configuration.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// HTTP listen port.
    pub port: u16,

    /// Path to the SQLite database file.
    pub database_path: String,

    /// JWT secret key for signing tokens.
    pub jwt_secret: String,

    /// JWT token lifetime in seconds (default: 7 days).
    pub jwt_lifetime_secs: i64,
}

impl ApiConfig {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary variable source. Tests pass a
    /// closure instead of touching the process environment.
    fn load_from(get: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let config = ApiConfig {
            port: get("PORT")
                .unwrap_or_else(|| "5000".to_string())
                .parse()
                .map_err(|_| ConfigError::InvalidValue("PORT"))?,

            database_path: get("DATABASE_PATH").unwrap_or_else(|| "./bazaar.db".to_string()),

            jwt_secret: get("JWT_SECRET").unwrap_or_else(|| {
                // Development fallback only. In production this MUST be
                // set via environment variable.
                "bazaar-dev-secret-change-in-production".to_string()
            }),

            jwt_lifetime_secs: get("JWT_LIFETIME_SECS")
                .unwrap_or_else(|| "604800".to_string()) // 7 days
                .parse()
                .map_err(|_| ConfigError::InvalidValue("JWT_LIFETIME_SECS"))?,
        };

        Ok(config)
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid value for {0}")]
    InvalidValue(&'static str),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ApiConfig::load_from(|_| None).unwrap();

        assert_eq!(config.port, 5000);
        assert_eq!(config.database_path, "./bazaar.db");
        assert_eq!(config.jwt_lifetime_secs, 604800);
    }

    #[test]
    fn test_overrides() {
        let config = ApiConfig::load_from(|key| match key {
            "PORT" => Some("8080".to_string()),
            "JWT_SECRET" => Some("s3cret".to_string()),
            _ => None,
        })
        .unwrap();

        assert_eq!(config.port, 8080);
        assert_eq!(config.jwt_secret, "s3cret");
        assert_eq!(config.database_path, "./bazaar.db");
    }

    #[test]
    fn test_invalid_port_rejected() {
        let err = ApiConfig::load_from(|key| {
            (key == "PORT").then(|| "not-a-port".to_string())
        })
        .unwrap_err();

        assert!(matches!(err, ConfigError::InvalidValue("PORT")));
    }
}
