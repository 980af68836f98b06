use serde::{Deserialize, Serialize};

pub const STATUS_OK: &str = "OK";
pub const STATUS_MESSAGE: &str = "Heating Monitor Backend is running";

/// Static liveness payload. Never depends on the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusInfo {
    pub status: String,
    pub message: String,
    pub version: String,
}

impl StatusInfo {
    pub fn current() -> Self {
        Self {
            status: STATUS_OK.to_string(),
            message: STATUS_MESSAGE.to_string(),
            version: api_version(),
        }
    }
}

/// Version string reported by the status endpoints.
pub fn api_version() -> String {
    format!("v{}", env!("CARGO_PKG_VERSION"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_is_ok() {
        let info = StatusInfo::current();
        assert_eq!(info.status, "OK");
        assert_eq!(info.message, STATUS_MESSAGE);
        assert!(info.version.starts_with('v'));
    }
}
