//! Repository trait definitions for measurement storage.
//!
//! # Module Organization
//!
//! - [`error`]: Error types for repository operations
//! - [`measurement`]: Insert and listing operations for measurements
//!
//! Services take the trait as a bound so that any backend (in-memory or
//! Postgres) can be plugged in:
//!
//! ```ignore
//! async fn record<R: MeasurementRepository + ?Sized>(repo: &R) -> RepositoryResult<()> {
//!     repo.insert(NewMeasurement::new(21.5, "sensor-1")).await?;
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod measurement;

pub use error::{ErrorContext, RepositoryError, RepositoryResult};
pub use measurement::MeasurementRepository;
