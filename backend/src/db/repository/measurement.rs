//! Measurement repository trait.

use async_trait::async_trait;

use super::error::RepositoryResult;
use crate::models::{ListOptions, Measurement, NewMeasurement};

/// Repository trait for measurement persistence.
///
/// Measurements are append-only: there is no update or delete operation.
///
/// # Thread Safety
/// Implementations must be `Send + Sync` to be shared across request handlers.
#[async_trait]
pub trait MeasurementRepository: Send + Sync {
    /// Check if the underlying store is reachable.
    ///
    /// # Returns
    /// - `Ok(true)` if the store is healthy
    /// - `Ok(false)` if the store is unhealthy but no error occurred
    /// - `Err(RepositoryError)` if an error occurred during the check
    async fn health_check(&self) -> RepositoryResult<bool>;

    /// Persist a new measurement.
    ///
    /// The store assigns `id` and `created_at` atomically with the insert; the
    /// returned record is fully populated. Either the row is committed or
    /// nothing is written.
    ///
    /// # Errors
    /// * `RepositoryError::ConnectionError` - the store is unreachable
    /// * `RepositoryError::ConstraintViolation` - the row breaks a table constraint
    ///   (temperature outside [-50, 100], device id empty or longer than 50 characters)
    /// * `RepositoryError::QueryError` - the store rejected the statement for any
    ///   other reason, such as a device id containing a NUL byte
    async fn insert(&self, measurement: NewMeasurement) -> RepositoryResult<Measurement>;

    /// List measurements, newest first, truncated to `options.limit` when set.
    async fn list_measurements(&self, options: &ListOptions) -> RepositoryResult<Vec<Measurement>>;

    /// List every stored measurement, newest first.
    async fn list_all(&self) -> RepositoryResult<Vec<Measurement>> {
        self.list_measurements(&ListOptions::unbounded()).await
    }

    /// Number of stored measurements.
    async fn count(&self) -> RepositoryResult<usize>;
}
