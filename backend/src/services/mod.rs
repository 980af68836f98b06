//! Service layer for business logic and orchestration.
//!
//! Services sit between the HTTP handlers and the repositories and are
//! generic over [`crate::db::MeasurementRepository`].

pub mod measurements;
pub mod validation;

pub use measurements::{get_recent_measurements, record_measurement, to_response};
pub use validation::{validate_create_request, validate_limit, ValidationError};

#[cfg(all(test, feature = "local-repo"))]
#[path = "measurements_tests.rs"]
mod measurements_tests;
