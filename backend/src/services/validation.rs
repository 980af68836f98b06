//! Request validation guard for the write and list paths.
//!
//! Runs at the HTTP boundary before any service or store call. A failed check
//! produces a [`ValidationError`] naming the offending field; nothing is
//! written.

use crate::models::{
    is_temperature_in_range, ListOptions, NewMeasurement, DEVICE_ID_MAX_LEN, TEMPERATURE_MAX,
    TEMPERATURE_MIN,
};
use crate::routes::measurements::CreateMeasurementRequest;

/// A request failed a declared constraint.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{field}: {message}")]
pub struct ValidationError {
    /// Wire name of the offending field
    pub field: &'static str,
    /// Human-readable description of the violated constraint
    pub message: String,
}

impl ValidationError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Validate a create request and build the measurement shell from it.
///
/// Fields are checked in wire order; the first failure is reported.
pub fn validate_create_request(
    request: &CreateMeasurementRequest,
) -> Result<NewMeasurement, ValidationError> {
    let temperature = validate_temperature(request.temperature)?;
    let device_id = validate_device_id(request.device_id.as_deref())?;
    Ok(NewMeasurement::new(temperature, device_id))
}

/// Temperature must be present, finite and within [-50, 100].
pub fn validate_temperature(temperature: Option<f64>) -> Result<f64, ValidationError> {
    let temperature =
        temperature.ok_or_else(|| ValidationError::new("temperature", "Temperature is required"))?;

    if !is_temperature_in_range(temperature) {
        return Err(ValidationError::new(
            "temperature",
            format!(
                "Temperature must be between {} and {}",
                TEMPERATURE_MIN, TEMPERATURE_MAX
            ),
        ));
    }
    Ok(temperature)
}

/// Device id must be present, not blank, free of control characters and at
/// most [`DEVICE_ID_MAX_LEN`] characters.
///
/// The value is passed through unchanged.
pub fn validate_device_id(device_id: Option<&str>) -> Result<String, ValidationError> {
    let device_id =
        device_id.ok_or_else(|| ValidationError::new("deviceId", "Device ID is required"))?;

    if device_id.trim().is_empty() {
        return Err(ValidationError::new("deviceId", "Device ID must not be blank"));
    }
    if device_id.chars().any(char::is_control) {
        return Err(ValidationError::new(
            "deviceId",
            "Device ID must not contain control characters",
        ));
    }
    if device_id.chars().count() > DEVICE_ID_MAX_LEN {
        return Err(ValidationError::new(
            "deviceId",
            format!("Device ID must be at most {} characters", DEVICE_ID_MAX_LEN),
        ));
    }
    Ok(device_id.to_string())
}

/// Resolve the listing options for a requested limit.
///
/// A missing `requested` limit falls back to `default_limit` (`None` means
/// every row). An explicit limit must be in `1..=max_limit`.
pub fn validate_limit(
    requested: Option<usize>,
    default_limit: Option<usize>,
    max_limit: usize,
) -> Result<ListOptions, ValidationError> {
    match requested {
        None => Ok(ListOptions {
            limit: default_limit,
        }),
        Some(0) => Err(ValidationError::new("limit", "limit must be at least 1")),
        Some(limit) if limit > max_limit => Err(ValidationError::new(
            "limit",
            format!("limit must be at most {}", max_limit),
        )),
        Some(limit) => Ok(ListOptions::with_limit(limit)),
    }
}
