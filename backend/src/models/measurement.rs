//! Domain model for temperature measurements.
//!
//! A [`Measurement`] is a single reading reported by a heating-monitor device.
//! Callers only ever build a [`NewMeasurement`]; identity and creation time are
//! assigned by the store when the row is inserted.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

crate::define_id_type!(Uuid, MeasurementId);

impl MeasurementId {
    /// Generate a fresh random identifier.
    pub fn generate() -> Self {
        MeasurementId(Uuid::new_v4())
    }
}

/// Lowest temperature accepted on the write path (inclusive).
pub const TEMPERATURE_MIN: f64 = -50.0;

/// Highest temperature accepted on the write path (inclusive).
pub const TEMPERATURE_MAX: f64 = 100.0;

/// Maximum length of a device identifier, in characters.
pub const DEVICE_ID_MAX_LEN: usize = 50;

/// A persisted temperature reading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    /// Store-assigned identifier
    pub id: MeasurementId,
    /// Temperature in degrees Celsius
    pub temperature: f64,
    /// Identifier of the reporting device
    pub device_id: String,
    /// Time the row was persisted
    pub created_at: DateTime<Utc>,
}

/// A measurement that has not been persisted yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewMeasurement {
    pub temperature: f64,
    pub device_id: String,
}

impl NewMeasurement {
    pub fn new(temperature: f64, device_id: impl Into<String>) -> Self {
        Self {
            temperature,
            device_id: device_id.into(),
        }
    }
}

/// Ordering and size of a measurement listing.
///
/// Listings are always ordered by `created_at` descending (newest first). A
/// `limit` of `None` returns every stored row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ListOptions {
    pub limit: Option<usize>,
}

impl ListOptions {
    /// Options that return every stored measurement.
    pub fn unbounded() -> Self {
        Self { limit: None }
    }

    /// Options that return at most `limit` of the newest measurements.
    pub fn with_limit(limit: usize) -> Self {
        Self { limit: Some(limit) }
    }
}

/// Check whether a temperature lies within the accepted closed range.
pub fn is_temperature_in_range(temperature: f64) -> bool {
    (TEMPERATURE_MIN..=TEMPERATURE_MAX).contains(&temperature)
}
