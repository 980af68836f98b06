pub mod macros;
pub mod measurement;

pub use measurement::*;
