//! Measurement service.
//!
//! Orchestrates the store for the write and list paths and maps stored
//! records to their wire representation. Input is expected to have passed
//! [`crate::services::validation`] already. Storage errors are propagated
//! unchanged: no retry, no compensation.

use log::{debug, info};

use crate::db::repository::{MeasurementRepository, RepositoryResult};
use crate::models::{ListOptions, Measurement, NewMeasurement};
use crate::routes::measurements::MeasurementResponse;

/// Persist a validated measurement and return the stored record.
///
/// Exactly one row is created on success.
pub async fn record_measurement<R: MeasurementRepository + ?Sized>(
    repo: &R,
    measurement: NewMeasurement,
) -> RepositoryResult<MeasurementResponse> {
    let stored = repo.insert(measurement).await?;
    info!(
        "Recorded {} from device '{}' as {}",
        stored.temperature, stored.device_id, stored.id
    );
    Ok(to_response(&stored))
}

/// List stored measurements, newest first.
///
/// `ListOptions::unbounded()` returns every stored row.
pub async fn get_recent_measurements<R: MeasurementRepository + ?Sized>(
    repo: &R,
    options: &ListOptions,
) -> RepositoryResult<Vec<MeasurementResponse>> {
    let measurements = repo.list_measurements(options).await?;
    debug!(
        "Fetched {} measurement(s) (limit={:?})",
        measurements.len(),
        options.limit
    );
    Ok(measurements.iter().map(to_response).collect())
}

/// Project a stored measurement onto the wire shape.
pub fn to_response(measurement: &Measurement) -> MeasurementResponse {
    MeasurementResponse::from(measurement)
}
