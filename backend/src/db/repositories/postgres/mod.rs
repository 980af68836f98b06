//! Postgres repository implementation using Diesel.
//!
//! ## Features
//!
//! - Connection pooling with r2d2
//! - Retry with exponential backoff when a pooled connection cannot be obtained
//! - Connection health monitoring
//! - Automatic migration execution
//!
//! A statement that reached the database is never re-executed: an insert
//! either commits once or fails with the error the database reported.
//!
//! The connection timeout bounds a whole checkout, retries included. Each
//! attempt waits for its share of it, so an unreachable database fails a
//! request after roughly the timeout plus the backoff delays.
//!
//! ## Configuration
//!
//! Environment variables:
//! - `DATABASE_URL` or `PG_DATABASE_URL`: Connection string (required)
//! - `PG_POOL_MAX`: Maximum pool size (default: 10)
//! - `PG_POOL_MIN`: Minimum pool size (default: 1)
//! - `PG_CONN_TIMEOUT_SEC`: Connection timeout in seconds (default: 5)
//! - `PG_IDLE_TIMEOUT_SEC`: Idle connection timeout in seconds (default: 600)
//! - `PG_MAX_RETRIES`: Maximum checkout retry attempts (default: 3)
//! - `PG_RETRY_DELAY_MS`: Initial retry delay in milliseconds (default: 100)

use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::sql_query;
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use log::{debug, info, warn};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::task;

use crate::db::repository::{
    ErrorContext, MeasurementRepository, RepositoryError, RepositoryResult,
};
use crate::models::{ListOptions, Measurement, NewMeasurement};

mod models;
mod schema;

use models::{MeasurementRow, NewMeasurementRow};
use schema::measurements;

type PgPool = Pool<ConnectionManager<PgConnection>>;

const MIGRATIONS: EmbeddedMigrations = embed_migrations!("src/db/repositories/postgres/migrations");

/// Configuration for connecting to Postgres.
#[derive(Debug, Clone)]
pub struct PostgresConfig {
    /// Database connection URL
    pub database_url: String,
    /// Maximum number of connections in the pool
    pub max_pool_size: u32,
    /// Minimum number of connections in the pool
    pub min_pool_size: u32,
    /// Connection timeout in seconds, shared by all checkout attempts
    pub connection_timeout_sec: u64,
    /// Idle connection timeout in seconds
    pub idle_timeout_sec: u64,
    /// Maximum number of retry attempts when checking out a connection
    pub max_retries: u32,
    /// Initial retry delay in milliseconds (doubles with each retry)
    pub retry_delay_ms: u64,
}

impl Default for PostgresConfig {
    fn default() -> Self {
        Self {
            database_url: String::new(),
            max_pool_size: 10,
            min_pool_size: 1,
            connection_timeout_sec: 5,
            idle_timeout_sec: 600,
            max_retries: 3,
            retry_delay_ms: 100,
        }
    }
}

fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse::<T>().ok())
        .unwrap_or(default)
}

impl PostgresConfig {
    /// Create configuration from environment variables.
    ///
    /// See the module documentation for the recognised variables.
    pub fn from_env() -> Result<Self, String> {
        let database_url = std::env::var("DATABASE_URL")
            .or_else(|_| std::env::var("PG_DATABASE_URL"))
            .map_err(|_| "DATABASE_URL or PG_DATABASE_URL must be set".to_string())?;

        let defaults = Self::default();
        Ok(Self {
            database_url,
            max_pool_size: env_or("PG_POOL_MAX", defaults.max_pool_size),
            min_pool_size: env_or("PG_POOL_MIN", defaults.min_pool_size),
            connection_timeout_sec: env_or("PG_CONN_TIMEOUT_SEC", defaults.connection_timeout_sec),
            idle_timeout_sec: env_or("PG_IDLE_TIMEOUT_SEC", defaults.idle_timeout_sec),
            max_retries: env_or("PG_MAX_RETRIES", defaults.max_retries),
            retry_delay_ms: env_or("PG_RETRY_DELAY_MS", defaults.retry_delay_ms),
        })
    }

    /// Create a new configuration with a database URL.
    pub fn with_url(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            ..Default::default()
        }
    }

    /// How long a single checkout attempt may wait for a connection.
    fn checkout_timeout(&self) -> Duration {
        let total = Duration::from_secs(self.connection_timeout_sec);
        let per_attempt = total / self.max_retries.saturating_add(1);
        per_attempt.max(MIN_CHECKOUT_TIMEOUT)
    }
}

const MIN_CHECKOUT_TIMEOUT: Duration = Duration::from_millis(100);

/// Pool health statistics.
#[derive(Debug, Clone, Default)]
pub struct PoolStats {
    /// Number of connections currently in use
    pub connections_in_use: u32,
    /// Number of idle connections
    pub idle_connections: u32,
    /// Total number of connections in the pool
    pub total_connections: u32,
    /// Maximum pool size
    pub max_size: u32,
    /// Total queries executed
    pub total_queries: u64,
    /// Total failed queries
    pub failed_queries: u64,
    /// Total connection checkout retries
    pub retried_operations: u64,
}

/// Diesel-backed measurement repository for Postgres.
#[derive(Clone, Debug)]
pub struct PostgresRepository {
    pool: PgPool,
    config: PostgresConfig,
    total_queries: Arc<AtomicU64>,
    failed_queries: Arc<AtomicU64>,
    retried_operations: Arc<AtomicU64>,
}

impl PostgresRepository {
    /// Create a new repository and run pending migrations.
    ///
    /// # Errors
    /// Returns `RepositoryError::ConnectionError` if the pool cannot be built
    /// and `RepositoryError::InternalError` if a migration fails.
    pub fn new(config: PostgresConfig) -> RepositoryResult<Self> {
        let manager = ConnectionManager::<PgConnection>::new(&config.database_url);

        let pool = Pool::builder()
            .max_size(config.max_pool_size)
            .min_idle(Some(config.min_pool_size))
            .connection_timeout(Duration::from_secs(config.connection_timeout_sec))
            .idle_timeout(Some(Duration::from_secs(config.idle_timeout_sec)))
            .test_on_check_out(true)
            .build(manager)
            .map_err(|e| {
                RepositoryError::connection_with_context(
                    e.to_string(),
                    ErrorContext::new("create_pool")
                        .with_details(format!("max_size={}", config.max_pool_size)),
                )
            })?;

        {
            let mut conn = pool.get().map_err(|e| {
                RepositoryError::connection_with_context(
                    e.to_string(),
                    ErrorContext::new("get_connection_for_migrations"),
                )
            })?;
            Self::run_migrations(&mut conn)?;
        }

        info!(
            "Postgres repository ready (pool max={}, min={})",
            config.max_pool_size, config.min_pool_size
        );

        Ok(Self {
            pool,
            config,
            total_queries: Arc::new(AtomicU64::new(0)),
            failed_queries: Arc::new(AtomicU64::new(0)),
            retried_operations: Arc::new(AtomicU64::new(0)),
        })
    }

    fn run_migrations(conn: &mut PgConnection) -> RepositoryResult<()> {
        let applied = conn.run_pending_migrations(MIGRATIONS).map_err(|e| {
            RepositoryError::internal_with_context(
                format!("Migration failed: {}", e),
                ErrorContext::new("run_migrations"),
            )
        })?;
        if !applied.is_empty() {
            info!("Applied {} pending migration(s)", applied.len());
        }
        Ok(())
    }

    /// Run `f` on a pooled connection inside the blocking thread pool.
    ///
    /// Checking out a connection is retried up to `max_retries` times with
    /// exponential backoff, each attempt bounded by
    /// [`PostgresConfig::checkout_timeout`]. Once `f` runs, its result is
    /// returned as is.
    async fn with_conn<T, F>(&self, operation: &'static str, f: F) -> RepositoryResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut PgConnection) -> RepositoryResult<T> + Send + 'static,
    {
        let pool = self.pool.clone();
        let max_retries = self.config.max_retries;
        let checkout_timeout = self.config.checkout_timeout();
        let retry_delay_ms = self.config.retry_delay_ms;
        let total_queries = self.total_queries.clone();
        let failed_queries = self.failed_queries.clone();
        let retried_operations = self.retried_operations.clone();

        task::spawn_blocking(move || {
            let mut retry_delay = Duration::from_millis(retry_delay_ms);
            let mut attempt = 0;

            let mut conn = loop {
                match pool.get_timeout(checkout_timeout) {
                    Ok(conn) => break conn,
                    Err(e) if attempt < max_retries => {
                        warn!(
                            "{}: connection checkout failed (attempt {}): {}",
                            operation,
                            attempt + 1,
                            e
                        );
                        retried_operations.fetch_add(1, Ordering::Relaxed);
                        std::thread::sleep(retry_delay);
                        retry_delay *= 2;
                        attempt += 1;
                    }
                    Err(e) => {
                        failed_queries.fetch_add(1, Ordering::Relaxed);
                        return Err(RepositoryError::connection_with_context(
                            e.to_string(),
                            ErrorContext::new(operation)
                                .with_entity("measurement")
                                .with_details(format!("attempts={}", attempt + 1)),
                        ));
                    }
                }
            };

            total_queries.fetch_add(1, Ordering::Relaxed);
            f(&mut conn).map_err(|e| {
                failed_queries.fetch_add(1, Ordering::Relaxed);
                e.with_operation(operation)
            })
        })
        .await
        .map_err(|e| {
            RepositoryError::internal_with_context(
                format!("Task join error: {}", e),
                ErrorContext::new("spawn_blocking"),
            )
        })?
    }

    /// Get pool health statistics.
    pub fn get_pool_stats(&self) -> PoolStats {
        let state = self.pool.state();
        PoolStats {
            connections_in_use: state.connections - state.idle_connections,
            idle_connections: state.idle_connections,
            total_connections: state.connections,
            max_size: self.config.max_pool_size,
            total_queries: self.total_queries.load(Ordering::Relaxed),
            failed_queries: self.failed_queries.load(Ordering::Relaxed),
            retried_operations: self.retried_operations.load(Ordering::Relaxed),
        }
    }

    /// Get detailed health information.
    ///
    /// Returns a tuple of (is_healthy, latency_ms, error_message).
    pub async fn health_check_detailed(&self) -> (bool, Option<u64>, Option<String>) {
        let start = Instant::now();
        let result = self.health_check().await;
        let latency = Some(start.elapsed().as_millis() as u64);
        match result {
            Ok(true) => (true, latency, None),
            Ok(false) => (false, latency, Some("Health check returned false".to_string())),
            Err(e) => (false, latency, Some(e.to_string())),
        }
    }
}

fn map_diesel_error(err: diesel::result::Error) -> RepositoryError {
    RepositoryError::from(err)
}

#[async_trait]
impl MeasurementRepository for PostgresRepository {
    async fn health_check(&self) -> RepositoryResult<bool> {
        self.with_conn("health_check", |conn| {
            sql_query("SELECT 1")
                .execute(conn)
                .map(|_| true)
                .map_err(map_diesel_error)
        })
        .await
    }

    async fn insert(&self, measurement: NewMeasurement) -> RepositoryResult<Measurement> {
        let row = NewMeasurementRow::from(&measurement);
        let stored = self
            .with_conn("insert", move |conn| {
                diesel::insert_into(measurements::table)
                    .values(&row)
                    .returning(MeasurementRow::as_returning())
                    .get_result::<MeasurementRow>(conn)
                    .map_err(map_diesel_error)
            })
            .await?;

        debug!("Inserted measurement {}", stored.id);
        Ok(Measurement::from(stored))
    }

    async fn list_measurements(&self, options: &ListOptions) -> RepositoryResult<Vec<Measurement>> {
        let limit = options.limit;
        let rows = self
            .with_conn("list_measurements", move |conn| {
                let mut query = measurements::table
                    .select(MeasurementRow::as_select())
                    .order((measurements::created_at.desc(), measurements::id.desc()))
                    .into_boxed();
                if let Some(limit) = limit {
                    let limit = i64::try_from(limit).unwrap_or(i64::MAX);
                    query = query.limit(limit);
                }
                query.load::<MeasurementRow>(conn).map_err(map_diesel_error)
            })
            .await?;

        Ok(rows.into_iter().map(Measurement::from).collect())
    }

    async fn count(&self) -> RepositoryResult<usize> {
        let total = self
            .with_conn("count", |conn| {
                measurements::table
                    .count()
                    .get_result::<i64>(conn)
                    .map_err(map_diesel_error)
            })
            .await?;
        Ok(usize::try_from(total).unwrap_or(0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = PostgresConfig::default();
        assert!(config.database_url.is_empty());
        assert_eq!(config.max_pool_size, 10);
        assert_eq!(config.min_pool_size, 1);
        assert_eq!(config.max_retries, 3);
        assert_eq!(config.connection_timeout_sec, 5);
    }

    #[test]
    fn test_checkout_attempts_share_the_connection_timeout() {
        let config = PostgresConfig::default();
        let attempts = config.max_retries + 1;
        assert_eq!(config.checkout_timeout(), Duration::from_millis(1250));
        assert!(
            config.checkout_timeout() * attempts
                <= Duration::from_secs(config.connection_timeout_sec)
        );

        let single = PostgresConfig {
            max_retries: 0,
            ..PostgresConfig::default()
        };
        assert_eq!(single.checkout_timeout(), Duration::from_secs(5));
    }

    #[test]
    fn test_checkout_timeout_has_a_floor() {
        let config = PostgresConfig {
            connection_timeout_sec: 0,
            max_retries: u32::MAX,
            ..PostgresConfig::default()
        };
        assert_eq!(config.checkout_timeout(), MIN_CHECKOUT_TIMEOUT);
    }

    #[test]
    fn test_with_url_keeps_defaults() {
        let config = PostgresConfig::with_url("postgres://localhost/heating");
        assert_eq!(config.database_url, "postgres://localhost/heating");
        assert_eq!(config.retry_delay_ms, 100);
    }
}
