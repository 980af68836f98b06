//! Public API surface for the backend.
//!
//! This file consolidates the domain and DTO types used by the HTTP API.
//! All wire types derive Serialize/Deserialize for JSON serialization.

pub use crate::models::ListOptions;
pub use crate::models::Measurement;
pub use crate::models::MeasurementId;
pub use crate::models::NewMeasurement;
pub use crate::models::{DEVICE_ID_MAX_LEN, TEMPERATURE_MAX, TEMPERATURE_MIN};
pub use crate::routes::measurements::CreateMeasurementRequest;
pub use crate::routes::measurements::ListMeasurementsQuery;
pub use crate::routes::measurements::MeasurementResponse;
pub use crate::routes::status::StatusInfo;
