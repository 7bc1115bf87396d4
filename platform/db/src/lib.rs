//! Database primitives shared by the server binary and its tests.

use std::time::Duration;

use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DbErr, Statement};
use serde::Deserialize;
use thiserror::Error;
use tracing::info;

pub mod employees;
pub mod pagination;

pub use employees::{
    Employee, EmployeeRepository, NewEmployee, RepositoryError, RepositoryResult,
    SeaOrmEmployeeRepository,
};
pub use pagination::{DEFAULT_PAGE_SIZE, PageRequest, PaginatedResult};

/// Shared connection pool handle.
pub type DbPool = DatabaseConnection;

#[derive(Debug, Error)]
pub enum DbError {
    #[error("database url missing (set {0})")]
    MissingUrl(String),
    #[error("invalid value for {key}: {value}")]
    InvalidSetting { key: &'static str, value: String },
    #[error("failed to connect to database")]
    Connect(#[source] DbErr),
}

pub type DbResult<T> = Result<T, DbError>;

const DEFAULT_URL_KEY: &str = "DATABASE_URL";
const DEFAULT_MAX_CONNECTIONS: u32 = 10;
const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 8;

/// Connection settings, passed explicitly to [`connect`].
#[derive(Clone, Debug, Deserialize)]
pub struct DatabaseSettings {
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
}

fn default_max_connections() -> u32 {
    DEFAULT_MAX_CONNECTIONS
}

fn default_connect_timeout_secs() -> u64 {
    DEFAULT_CONNECT_TIMEOUT_SECS
}

impl DatabaseSettings {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            max_connections: DEFAULT_MAX_CONNECTIONS,
            connect_timeout_secs: DEFAULT_CONNECT_TIMEOUT_SECS,
        }
    }

    /// Read `DATABASE_URL`, `DB_MAX_CONNECTIONS` and `DB_CONNECT_TIMEOUT_SECS`.
    pub fn from_env() -> DbResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> DbResult<Self> {
        let url = lookup(DEFAULT_URL_KEY)
            .filter(|value| !value.trim().is_empty())
            .ok_or_else(|| DbError::MissingUrl(DEFAULT_URL_KEY.to_string()))?;
        let mut settings = Self::new(url);
        if let Some(value) = parsed(&lookup, "DB_MAX_CONNECTIONS")? {
            settings.max_connections = value;
        }
        if let Some(value) = parsed(&lookup, "DB_CONNECT_TIMEOUT_SECS")? {
            settings.connect_timeout_secs = value;
        }
        Ok(settings)
    }

    fn connect_options(&self) -> ConnectOptions {
        let timeout = Duration::from_secs(self.connect_timeout_secs);
        let mut options = ConnectOptions::new(self.url.clone());
        options
            .max_connections(self.max_connections)
            .connect_timeout(timeout)
            .acquire_timeout(timeout)
            .sqlx_logging(false);
        options
    }
}

fn parsed<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
) -> DbResult<Option<T>> {
    match lookup(key) {
        Some(value) => value
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|_| DbError::InvalidSetting { key, value }),
        None => Ok(None),
    }
}

/// Open the connection pool described by `settings`.
pub async fn connect(settings: &DatabaseSettings) -> DbResult<DbPool> {
    let pool = Database::connect(settings.connect_options())
        .await
        .map_err(DbError::Connect)?;
    info!(
        max_connections = settings.max_connections,
        "database pool ready"
    );
    Ok(pool)
}

/// Round-trip a trivial statement; used by the health endpoint.
pub async fn ping(pool: &DbPool) -> bool {
    let backend = pool.get_database_backend();
    pool.execute(Statement::from_string(backend, "SELECT 1".to_string()))
        .await
        .is_ok()
}
