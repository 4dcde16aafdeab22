//! Connection pool configuration for the `PostgreSQL` adapter.

use diesel::pg::PgConnection;
use diesel::r2d2::{ConnectionManager, Pool};
use std::time::Duration;
use thiserror::Error;

/// `PostgreSQL` connection pool type used by task adapters.
pub type TaskPgPool = Pool<ConnectionManager<PgConnection>>;

/// Environment variable holding the database URL.
pub const DATABASE_URL_ENV: &str = "TASKS_DATABASE_URL";
/// Environment variable holding the maximum pool size.
pub const POOL_SIZE_ENV: &str = "TASKS_DATABASE_POOL_SIZE";
/// Environment variable holding the connection timeout in seconds.
pub const TIMEOUT_ENV: &str = "TASKS_DATABASE_TIMEOUT_SECS";

/// Errors raised while reading pool configuration or opening the pool.
#[derive(Debug, Error)]
pub enum PoolConfigError {
    /// The database URL variable is unset.
    #[error("environment variable {0} is not set")]
    MissingVariable(&'static str),

    /// A numeric variable does not parse.
    #[error("environment variable {name} has invalid value '{value}'")]
    InvalidVariable {
        /// Variable name.
        name: &'static str,
        /// Raw value.
        value: String,
    },

    /// The pool could not be created.
    #[error("failed to build connection pool: {0}")]
    Pool(#[from] diesel::r2d2::PoolError),
}

/// Settings for building a [`TaskPgPool`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostgresPoolConfig {
    /// Connection URL.
    pub database_url: String,
    /// Maximum number of pooled connections.
    pub max_size: u32,
    /// How long to wait for a connection before failing.
    pub connection_timeout: Duration,
}

impl PostgresPoolConfig {
    /// Default maximum pool size.
    pub const DEFAULT_MAX_SIZE: u32 = 10;
    /// Default connection timeout.
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

    /// Creates a configuration with default sizing.
    #[must_use]
    pub fn new(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            max_size: Self::DEFAULT_MAX_SIZE,
            connection_timeout: Self::DEFAULT_TIMEOUT,
        }
    }

    /// Reads configuration from `TASKS_DATABASE_*` environment variables.
    ///
    /// # Errors
    ///
    /// Returns [`PoolConfigError`] when the URL is missing or a numeric
    /// setting does not parse.
    pub fn from_env() -> Result<Self, PoolConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Reads configuration through an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns [`PoolConfigError`] when the URL is missing or a numeric
    /// setting does not parse.
    pub fn from_lookup(
        lookup: impl Fn(&'static str) -> Option<String>,
    ) -> Result<Self, PoolConfigError> {
        let database_url =
            lookup(DATABASE_URL_ENV).ok_or(PoolConfigError::MissingVariable(DATABASE_URL_ENV))?;
        let mut config = Self::new(database_url);
        if let Some(max_size) = parse_variable::<u32>(&lookup, POOL_SIZE_ENV)? {
            config.max_size = max_size;
        }
        if let Some(seconds) = parse_variable::<u64>(&lookup, TIMEOUT_ENV)? {
            config.connection_timeout = Duration::from_secs(seconds);
        }
        Ok(config)
    }

    /// Opens a connection pool.
    ///
    /// # Errors
    ///
    /// Returns [`PoolConfigError::Pool`] when r2d2 cannot establish the
    /// initial connections.
    pub fn build_pool(&self) -> Result<TaskPgPool, PoolConfigError> {
        let manager = ConnectionManager::<PgConnection>::new(&self.database_url);
        Ok(Pool::builder()
            .max_size(self.max_size)
            .connection_timeout(self.connection_timeout)
            .build(manager)?)
    }
}

fn parse_variable<T: std::str::FromStr>(
    lookup: &impl Fn(&'static str) -> Option<String>,
    name: &'static str,
) -> Result<Option<T>, PoolConfigError> {
    lookup(name)
        .map(|value| {
            value
                .trim()
                .parse::<T>()
                .map_err(|_| PoolConfigError::InvalidVariable { name, value })
        })
        .transpose()
}
