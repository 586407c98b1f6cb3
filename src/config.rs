//! Gateway configuration loaded from environment variables.
//!
//! Follows 12-factor style: all settings come from environment
//! variables (or a `.env` file via `dotenvy`).

use std::net::SocketAddr;

/// Top-level gateway configuration.
///
/// Loaded once at startup via [`GatewayConfig::from_env`].
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Socket address to bind the HTTP server to (e.g. `0.0.0.0:4000`).
    pub listen_addr: SocketAddr,

    /// Maximum number of history events retained per session.
    /// 0 keeps full history (the default; replay then always
    /// reconstructs the complete canvas).
    pub history_capacity: usize,
}

impl GatewayConfig {
    /// Loads configuration from environment variables.
    ///
    /// Falls back to sensible defaults when a variable is not set.
    /// Calls `dotenvy::dotenv().ok()` to optionally load a `.env` file.
    ///
    /// # Errors
    ///
    /// Returns an error if `LISTEN_ADDR` is set but cannot be parsed as
    /// a [`SocketAddr`].
    pub fn from_env() -> Result<Self, Box<dyn std::error::Error>> {
        dotenvy::dotenv().ok();

        let listen_addr: SocketAddr = std::env::var("LISTEN_ADDR")
            .unwrap_or_else(|_| "0.0.0.0:4000".to_string())
            .parse()?;

        let history_capacity = parse_env("HISTORY_CAPACITY", 0);

        Ok(Self {
            listen_addr,
            history_capacity,
        })
    }
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            listen_addr: ([0, 0, 0, 0], 4000).into(),
            history_capacity: 0,
        }
    }
}

/// Parses an environment variable as `T`, returning `default` on
/// missing or invalid values.
fn parse_env<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
