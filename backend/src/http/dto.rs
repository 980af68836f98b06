//! Data Transfer Objects for the HTTP API.
//!
//! Measurement and status DTOs live in [`crate::routes`] and are re-exported
//! here; only the health payload is HTTP-specific.

use serde::{Deserialize, Serialize};

pub use crate::api::{
    CreateMeasurementRequest, ListMeasurementsQuery, MeasurementResponse, StatusInfo,
};

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    /// Store connectivity: `connected`, `disconnected` or `error`
    pub database: String,
}
