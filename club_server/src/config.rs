//! Server configuration management.
//!
//! Consolidates all environment variable reads and provides validated
//! configuration.

use chess_club::db::DatabaseConfig;
use std::net::SocketAddr;

/// Complete server configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Server bind address
    pub bind: SocketAddr,
    /// Database configuration
    pub database: DatabaseConfig,
    /// Club-site defaults
    pub club: ClubConfig,
}

/// Club-site defaults
#[derive(Debug, Clone)]
pub struct ClubConfig {
    /// Upper bound on a tournament's registration cap
    pub max_tournament_size: usize,
}

impl ServerConfig {
    /// Load configuration from environment variables, with optional CLI
    /// overrides for the bind address and database URL.
    pub fn from_env(
        bind_override: Option<SocketAddr>,
        database_url_override: Option<String>,
    ) -> Result<Self, ConfigError> {
        let bind = bind_override
            .or_else(|| {
                std::env::var("SERVER_BIND")
                    .ok()
                    .and_then(|s| s.parse().ok())
            })
            .unwrap_or_else(|| {
                "127.0.0.1:3000"
                    .parse()
                    .expect("Default bind address is valid")
            });

        let database_url = database_url_override
            .or_else(|| std::env::var("DATABASE_URL").ok())
            .unwrap_or_else(|| "postgres://postgres@localhost/chess_club".to_string());

        let database = DatabaseConfig {
            database_url,
            max_connections: parse_env_or("DB_MAX_CONNECTIONS", 20),
            min_connections: parse_env_or("DB_MIN_CONNECTIONS", 2),
            connection_timeout_secs: parse_env_or("DB_CONNECTION_TIMEOUT", 10),
            idle_timeout_secs: parse_env_or("DB_IDLE_TIMEOUT", 600),
            max_lifetime_secs: parse_env_or("DB_MAX_LIFETIME", 1800),
        };

        let club = ClubConfig {
            max_tournament_size: parse_env_or("MAX_TOURNAMENT_SIZE", 64),
        };

        Ok(ServerConfig {
            bind,
            database,
            club,
        })
    }

    /// Validate configuration after loading
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.database.database_url.is_empty() {
            return Err(ConfigError::Invalid {
                var: "DATABASE_URL".to_string(),
                reason: "Must not be empty".to_string(),
            });
        }

        if self.club.max_tournament_size < 2 {
            return Err(ConfigError::Invalid {
                var: "MAX_TOURNAMENT_SIZE".to_string(),
                reason: "Must be at least 2 (a bracket needs two players)".to_string(),
            });
        }

        if self.database.min_connections > self.database.max_connections {
            return Err(ConfigError::Invalid {
                var: "DB_MIN_CONNECTIONS".to_string(),
                reason: format!(
                    "Cannot exceed max connections ({})",
                    self.database.max_connections
                ),
            });
        }

        Ok(())
    }
}

/// Configuration error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {var}\nHint: {hint}")]
    MissingRequired { var: String, hint: String },

    #[error("Invalid configuration for {var}: {reason}")]
    Invalid { var: String, reason: String },
}

/// Helper to parse environment variable with default fallback
fn parse_env_or<T>(key: &str, default: T) -> T
where
    T: std::str::FromStr,
{
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> ServerConfig {
        ServerConfig {
            bind: "127.0.0.1:3000".parse().unwrap(),
            database: DatabaseConfig {
                database_url: "postgres://postgres@localhost/chess_club".to_string(),
                max_connections: 10,
                min_connections: 1,
                connection_timeout_secs: 5,
                idle_timeout_secs: 300,
                max_lifetime_secs: 1800,
            },
            club: ClubConfig {
                max_tournament_size: 64,
            },
        }
    }

    #[test]
    fn test_valid_config_passes() {
        test_config().validate().unwrap();
    }

    #[test]
    fn test_tournament_size_too_small() {
        let mut config = test_config();
        config.club.max_tournament_size = 1;
        let err = config.validate().unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { .. }));
    }

    #[test]
    fn test_min_connections_exceeding_max() {
        let mut config = test_config();
        config.database.min_connections = 50;
        let err = config.validate().unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { .. }));
    }

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::Invalid {
            var: "MAX_TOURNAMENT_SIZE".to_string(),
            reason: "Must be at least 2".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("MAX_TOURNAMENT_SIZE"));
        assert!(msg.contains("at least 2"));
    }
}
