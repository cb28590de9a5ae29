//! Database configuration.

use std::env;

/// Connection-pool settings for the club database.
///
/// Timeouts and lifetimes are in seconds.
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// PostgreSQL connection URL
    pub database_url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub connection_timeout_secs: u64,
    pub idle_timeout_secs: u64,
    pub max_lifetime_secs: u64,
}

impl DatabaseConfig {
    /// Read settings from `DATABASE_URL` plus the optional `DB_*`
    /// pool-tuning variables (`DB_MAX_CONNECTIONS`,
    /// `DB_MIN_CONNECTIONS`, `DB_CONNECTION_TIMEOUT`,
    /// `DB_IDLE_TIMEOUT`, `DB_MAX_LIFETIME`).
    ///
    /// Panics if `DATABASE_URL` is unset; everything else falls back
    /// to pool defaults.
    pub fn from_env() -> Self {
        Self {
            database_url: env::var("DATABASE_URL").expect("DATABASE_URL must be set"),
            max_connections: parse_env_or("DB_MAX_CONNECTIONS", 20),
            min_connections: parse_env_or("DB_MIN_CONNECTIONS", 2),
            connection_timeout_secs: parse_env_or("DB_CONNECTION_TIMEOUT", 10),
            idle_timeout_secs: parse_env_or("DB_IDLE_TIMEOUT", 600),
            max_lifetime_secs: parse_env_or("DB_MAX_LIFETIME", 1800),
        }
    }

    /// Defaults for a local `chess_club` database
    pub fn development() -> Self {
        Self {
            database_url: "postgres://postgres@localhost/chess_club".to_string(),
            max_connections: 10,
            min_connections: 1,
            connection_timeout_secs: 5,
            idle_timeout_secs: 300,
            max_lifetime_secs: 1800,
        }
    }
}

fn parse_env_or<T>(key: &str, default: T) -> T
where
    T: std::str::FromStr,
{
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_development_defaults() {
        let config = DatabaseConfig::development();
        assert_eq!(config.max_connections, 10);
        assert!(config.database_url.contains("chess_club"));
    }
}
