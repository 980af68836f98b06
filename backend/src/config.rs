//! Server configuration loaded from environment variables.

use std::env;
use std::net::SocketAddr;

/// Upper bound on `?limit=` when `MEASUREMENTS_MAX_LIMIT` is not set.
pub const DEFAULT_MAX_LIST_LIMIT: usize = 1000;

/// HTTP server and listing configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Interface to bind
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Limit applied to `GET /measurements` when the request has none (`None` = all rows)
    pub default_list_limit: Option<usize>,
    /// Largest `limit` a client may request
    pub max_list_limit: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            default_list_limit: None,
            max_list_limit: DEFAULT_MAX_LIST_LIMIT,
        }
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl ServerConfig {
    /// Create configuration from environment variables.
    ///
    /// # Environment Variables
    /// - `HOST` (default: 0.0.0.0)
    /// - `PORT` (default: 8080)
    /// - `MEASUREMENTS_DEFAULT_LIMIT` (optional): limit used when a listing request has none
    /// - `MEASUREMENTS_MAX_LIMIT` (default: 1000): largest accepted `limit`
    ///
    /// # Errors
    /// Returns an error if a variable is set but cannot be parsed, or if the
    /// default limit exceeds the maximum.
    pub fn from_env() -> Result<Self, String> {
        let defaults = Self::default();

        let host = non_empty_var("HOST").unwrap_or(defaults.host);
        let port = match non_empty_var("PORT") {
            Some(v) => v
                .parse()
                .map_err(|_| format!("PORT must be a valid port number, got '{}'", v))?,
            None => defaults.port,
        };
        let max_list_limit = match non_empty_var("MEASUREMENTS_MAX_LIMIT") {
            Some(v) => parse_limit("MEASUREMENTS_MAX_LIMIT", &v)?,
            None => defaults.max_list_limit,
        };
        let default_list_limit = non_empty_var("MEASUREMENTS_DEFAULT_LIMIT")
            .map(|v| parse_limit("MEASUREMENTS_DEFAULT_LIMIT", &v))
            .transpose()?;

        if let Some(limit) = default_list_limit {
            if limit > max_list_limit {
                return Err(format!(
                    "MEASUREMENTS_DEFAULT_LIMIT ({}) exceeds MEASUREMENTS_MAX_LIMIT ({})",
                    limit, max_list_limit
                ));
            }
        }

        Ok(Self {
            host,
            port,
            default_list_limit,
            max_list_limit,
        })
    }

    /// Socket address to bind.
    pub fn bind_address(&self) -> Result<SocketAddr, String> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| format!("Invalid bind address {}:{}: {}", self.host, self.port, e))
    }
}

fn parse_limit(key: &str, value: &str) -> Result<usize, String> {
    match value.parse::<usize>() {
        Ok(0) | Err(_) => Err(format!("{} must be a positive integer, got '{}'", key, value)),
        Ok(limit) => Ok(limit),
    }
}
