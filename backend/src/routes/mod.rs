//! Wire types for the measurement and status endpoints.

pub mod measurements;
pub mod status;
