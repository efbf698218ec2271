//! # Gateway Configuration
//!
//! Immutable process configuration: bind address, CORS origins, and the
//! shared secret. Constructed once at startup and passed by reference into
//! every request through shared state.

use serde::{Deserialize, Serialize};

/// Gateway configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// Host to bind to (default: "0.0.0.0")
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to bind to (default: 8787)
    #[serde(default = "default_port")]
    pub port: u16,

    /// CORS allowed origins (empty = permissive)
    #[serde(default)]
    pub cors_origins: Vec<String>,

    /// Shared secret compared against the Authorization header
    pub secret: String,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8787
}

impl GatewayConfig {
    /// Create a config with defaults and the given secret.
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origins: Vec::new(),
            secret: secret.into(),
        }
    }

    /// Create a config with a specific port.
    pub fn with_port(secret: impl Into<String>, port: u16) -> Self {
        Self {
            port,
            ..Self::new(secret)
        }
    }

    /// Get the socket address string
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
