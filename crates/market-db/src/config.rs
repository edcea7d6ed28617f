//! # Database Configuration
//!
//! Configuration is built in code (builder methods) or loaded from
//! environment variables with fallback to defaults.
//!
//! ## Environment Variables
//! | Variable                         | Default                              |
//! |----------------------------------|--------------------------------------|
//! | `MARKET_ENV`                     | `development`                        |
//! | `MARKET_DB_PATH`                 | per environment (see [`Environment`])|
//! | `MARKET_DB_MAX_CONNECTIONS`      | `5` (`1` for in-memory)              |
//! | `MARKET_DB_CONNECT_TIMEOUT_SECS` | `30`                                 |
//! | `MARKET_DB_RUN_MIGRATIONS`       | `true`                               |

use std::env;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

/// Path SQLite treats as a private in-memory database.
pub const IN_MEMORY_PATH: &str = ":memory:";

/// Deployment environment; picks the default database location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    /// `./market_dev.db`
    #[default]
    Development,
    /// In-memory, wiped when the pool closes.
    Testing,
    /// `./market.db`
    Production,
}

impl Environment {
    pub fn default_database_path(&self) -> PathBuf {
        match self {
            Environment::Development => PathBuf::from("./market_dev.db"),
            Environment::Testing => PathBuf::from(IN_MEMORY_PATH),
            Environment::Production => PathBuf::from("./market.db"),
        }
    }
}

impl FromStr for Environment {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" => Ok(Environment::Development),
            "testing" | "test" => Ok(Environment::Testing),
            "production" | "prod" => Ok(Environment::Production),
            _ => Err(ConfigError::InvalidValue("MARKET_ENV".to_string())),
        }
    }
}

/// Database configuration.
///
/// ## Example
/// ```rust,ignore
/// let config = DbConfig::new("/path/to/market.db")
///     .max_connections(5)
///     .min_connections(1);
/// ```
#[derive(Debug, Clone)]
pub struct DbConfig {
    /// Path to the SQLite database file, or `:memory:`.
    pub database_path: PathBuf,

    /// Maximum number of connections in the pool.
    /// Default: 5
    pub max_connections: u32,

    /// Minimum number of connections to keep alive.
    /// Default: 1
    pub min_connections: u32,

    /// Connection acquire timeout.
    /// Default: 30 seconds
    pub connect_timeout: Duration,

    /// Idle timeout before closing a connection.
    /// Default: 10 minutes
    pub idle_timeout: Duration,

    /// Whether to run migrations on connect.
    /// Default: true
    pub run_migrations: bool,
}

impl DbConfig {
    /// Creates a new database configuration with the given path.
    ///
    /// The file is created on connect if it doesn't exist.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        DbConfig {
            database_path: path.into(),
            max_connections: 5,
            min_connections: 1,
            connect_timeout: Duration::from_secs(30),
            idle_timeout: Duration::from_secs(600),
            run_migrations: true,
        }
    }

    /// Creates an in-memory database configuration (for testing).
    ///
    /// Every call yields an isolated database.
    pub fn in_memory() -> Self {
        DbConfig {
            database_path: PathBuf::from(IN_MEMORY_PATH),
            // The database lives and dies with its single connection
            max_connections: 1,
            min_connections: 1,
            connect_timeout: Duration::from_secs(5),
            idle_timeout: Duration::from_secs(60),
            run_migrations: true,
        }
    }

    /// Loads configuration from `MARKET_*` environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Loads configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let environment = match lookup("MARKET_ENV") {
            Some(value) => value.parse()?,
            None => Environment::default(),
        };

        let path = lookup("MARKET_DB_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|| environment.default_database_path());

        let mut config = if is_in_memory(&path) {
            DbConfig::in_memory()
        } else {
            DbConfig::new(path)
        };

        if let Some(value) = lookup("MARKET_DB_MAX_CONNECTIONS") {
            config.max_connections = parse_var("MARKET_DB_MAX_CONNECTIONS", &value)?;
        }
        if let Some(value) = lookup("MARKET_DB_CONNECT_TIMEOUT_SECS") {
            config.connect_timeout =
                Duration::from_secs(parse_var("MARKET_DB_CONNECT_TIMEOUT_SECS", &value)?);
        }
        if let Some(value) = lookup("MARKET_DB_RUN_MIGRATIONS") {
            config.run_migrations = parse_var("MARKET_DB_RUN_MIGRATIONS", &value)?;
        }

        if config.max_connections == 0 {
            return Err(ConfigError::InvalidValue(
                "MARKET_DB_MAX_CONNECTIONS".to_string(),
            ));
        }
        config.min_connections = config.min_connections.min(config.max_connections);

        Ok(config)
    }

    /// Sets the maximum number of connections.
    pub fn max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        self
    }

    /// Sets the minimum number of connections.
    pub fn min_connections(mut self, min: u32) -> Self {
        self.min_connections = min;
        self
    }

    /// Sets the connection timeout.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Sets whether to run migrations on connect.
    pub fn run_migrations(mut self, run: bool) -> Self {
        self.run_migrations = run;
        self
    }

    pub fn is_in_memory(&self) -> bool {
        is_in_memory(&self.database_path)
    }
}

fn is_in_memory(path: &Path) -> bool {
    path.as_os_str() == IN_MEMORY_PATH
}

fn parse_var<T: FromStr>(key: &str, value: &str) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::InvalidValue(key.to_string()))
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_config_builder() {
        let config = DbConfig::new("/tmp/test.db")
            .max_connections(10)
            .min_connections(2)
            .run_migrations(false);

        assert_eq!(config.max_connections, 10);
        assert_eq!(config.min_connections, 2);
        assert!(!config.run_migrations);
        assert!(!config.is_in_memory());
    }

    #[test]
    fn test_defaults_without_env() {
        let config = DbConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.database_path, PathBuf::from("./market_dev.db"));
        assert_eq!(config.max_connections, 5);
        assert!(config.run_migrations);
    }

    #[test]
    fn test_testing_environment_is_in_memory() {
        let config = DbConfig::from_lookup(lookup(&[("MARKET_ENV", "testing")])).unwrap();
        assert!(config.is_in_memory());
        assert_eq!(config.max_connections, 1);
    }

    #[test]
    fn test_path_and_overrides() {
        let config = DbConfig::from_lookup(lookup(&[
            ("MARKET_ENV", "production"),
            ("MARKET_DB_PATH", "/var/lib/market/market.db"),
            ("MARKET_DB_MAX_CONNECTIONS", "8"),
            ("MARKET_DB_CONNECT_TIMEOUT_SECS", "3"),
            ("MARKET_DB_RUN_MIGRATIONS", "false"),
        ]))
        .unwrap();

        assert_eq!(config.database_path, PathBuf::from("/var/lib/market/market.db"));
        assert_eq!(config.max_connections, 8);
        assert_eq!(config.connect_timeout, Duration::from_secs(3));
        assert!(!config.run_migrations);
    }

    #[test]
    fn test_invalid_values() {
        let err = DbConfig::from_lookup(lookup(&[("MARKET_ENV", "staging")])).unwrap_err();
        assert_eq!(err.to_string(), "Invalid value for MARKET_ENV");

        let err =
            DbConfig::from_lookup(lookup(&[("MARKET_DB_MAX_CONNECTIONS", "many")])).unwrap_err();
        assert_eq!(err.to_string(), "Invalid value for MARKET_DB_MAX_CONNECTIONS");

        let err = DbConfig::from_lookup(lookup(&[("MARKET_DB_MAX_CONNECTIONS", "0")])).unwrap_err();
        assert_eq!(err.to_string(), "Invalid value for MARKET_DB_MAX_CONNECTIONS");
    }
}
