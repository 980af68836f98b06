//! In-memory local repository implementation.
//!
//! Suitable for unit testing and local development. Data lives in a `Vec`
//! behind a lock and is lost when the process exits.

use async_trait::async_trait;
use chrono::Utc;
use log::debug;
use parking_lot::RwLock;
use std::sync::Arc;

use crate::db::repository::{
    ErrorContext, MeasurementRepository, RepositoryError, RepositoryResult,
};
use crate::models::{
    is_temperature_in_range, ListOptions, Measurement, MeasurementId, NewMeasurement,
    DEVICE_ID_MAX_LEN,
};

/// In-memory local repository.
///
/// Mirrors the check constraints of the Postgres table (temperature within
/// [-50, 100], non-empty device id of at most [`DEVICE_ID_MAX_LEN`]
/// characters) so that both backends reject the same writes. Device ids with
/// a NUL byte fail as a query error, as `TEXT` columns cannot store them.
///
/// # Example
/// ```
/// use heating_monitor::db::repositories::LocalRepository;
/// use heating_monitor::db::repository::MeasurementRepository;
/// use heating_monitor::models::NewMeasurement;
///
/// let rt = tokio::runtime::Runtime::new().unwrap();
/// rt.block_on(async {
///     let repo = LocalRepository::new();
///     repo.insert(NewMeasurement::new(21.5, "sensor-1")).await.unwrap();
///     assert_eq!(repo.count().await.unwrap(), 1);
/// });
/// ```
#[derive(Clone, Default)]
pub struct LocalRepository {
    data: Arc<RwLock<LocalData>>,
}

struct LocalData {
    // (insertion sequence, row); the sequence breaks ties between equal timestamps
    rows: Vec<(u64, Measurement)>,
    next_seq: u64,
    // Connection health
    is_healthy: bool,
}

impl Default for LocalData {
    fn default() -> Self {
        Self {
            rows: Vec::new(),
            next_seq: 1,
            is_healthy: true,
        }
    }
}

impl LocalRepository {
    /// Create a new empty local repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a fully formed measurement, bypassing id and timestamp assignment.
    ///
    /// This is a helper for setting up data with known timestamps.
    pub fn store_measurement_impl(&self, measurement: Measurement) {
        let mut data = self.data.write();
        let seq = data.next_seq;
        data.next_seq += 1;
        data.rows.push((seq, measurement));
    }

    /// Set the health status for testing connection failures.
    ///
    /// While unhealthy every repository operation fails with a connection error.
    pub fn set_healthy(&self, healthy: bool) {
        self.data.write().is_healthy = healthy;
    }

    /// Clear all data from the repository.
    pub fn clear(&self) {
        let mut data = self.data.write();
        *data = LocalData {
            is_healthy: data.is_healthy,
            ..Default::default()
        };
    }

    /// Get the number of measurements stored.
    pub fn measurement_count(&self) -> usize {
        self.data.read().rows.len()
    }

    /// Check if a measurement exists.
    pub fn has_measurement(&self, id: MeasurementId) -> bool {
        self.data.read().rows.iter().any(|(_, m)| m.id == id)
    }

    fn ensure_healthy(data: &LocalData, operation: &str) -> RepositoryResult<()> {
        if data.is_healthy {
            Ok(())
        } else {
            Err(RepositoryError::connection_with_context(
                "local repository is marked unhealthy",
                ErrorContext::new(operation).with_entity("measurement"),
            ))
        }
    }

    fn check_constraints(measurement: &NewMeasurement) -> RepositoryResult<()> {
        let violation = |message: &str| {
            Err(RepositoryError::constraint_with_context(
                message,
                ErrorContext::new("insert").with_entity("measurement"),
            ))
        };

        let device_id = &measurement.device_id;
        if device_id.is_empty() || device_id.chars().count() > DEVICE_ID_MAX_LEN {
            return violation("device_id must be 1 to 50 characters");
        }
        if device_id.contains('\0') {
            return Err(RepositoryError::query_with_context(
                "invalid byte sequence: device_id contains a NUL byte",
                ErrorContext::new("insert").with_entity("measurement"),
            ));
        }
        if !is_temperature_in_range(measurement.temperature) {
            return violation("temperature outside [-50, 100]");
        }
        Ok(())
    }
}

#[async_trait]
impl MeasurementRepository for LocalRepository {
    async fn health_check(&self) -> RepositoryResult<bool> {
        Ok(self.data.read().is_healthy)
    }

    async fn insert(&self, measurement: NewMeasurement) -> RepositoryResult<Measurement> {
        let mut data = self.data.write();
        Self::ensure_healthy(&data, "insert")?;
        Self::check_constraints(&measurement)?;

        let stored = Measurement {
            id: MeasurementId::generate(),
            temperature: measurement.temperature,
            device_id: measurement.device_id,
            created_at: Utc::now(),
        };

        let seq = data.next_seq;
        data.next_seq += 1;
        data.rows.push((seq, stored.clone()));

        debug!("Inserted measurement {}", stored.id);
        Ok(stored)
    }

    async fn list_measurements(&self, options: &ListOptions) -> RepositoryResult<Vec<Measurement>> {
        let data = self.data.read();
        Self::ensure_healthy(&data, "list_measurements")?;

        let mut rows: Vec<&(u64, Measurement)> = data.rows.iter().collect();
        rows.sort_by(|(seq_a, a), (seq_b, b)| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| seq_b.cmp(seq_a))
        });

        let limit = options.limit.unwrap_or(rows.len());
        let result: Vec<Measurement> = rows
            .into_iter()
            .take(limit)
            .map(|(_, m)| m.clone())
            .collect();

        debug!("Listed {} of {} measurements", result.len(), data.rows.len());
        Ok(result)
    }

    async fn count(&self) -> RepositoryResult<usize> {
        let data = self.data.read();
        Self::ensure_healthy(&data, "count")?;
        Ok(data.rows.len())
    }
}
