//! Configuration management for the Medicine Order MCP Server
//!
//! Handles bind address, reference data location, and environment variables.

use std::net::SocketAddr;
use std::path::PathBuf;

use crate::error::{ConfigError, PharmacyMcpError, Result};

/// Default HTTP port
pub const DEFAULT_PORT: u16 = 8765;

/// Default bind host
pub const DEFAULT_HOST: &str = "0.0.0.0";

/// Configuration for the Medicine Order MCP Server
#[derive(Debug, Clone)]
pub struct Config {
    /// IP address to bind the HTTP transport to
    pub host: String,

    /// Port for the HTTP transport
    pub port: u16,

    /// Optional JSON file replacing the built-in reference data
    pub data_path: Option<PathBuf>,
}

impl Config {
    /// Create a new configuration from the environment
    pub fn new() -> Result<Self> {
        let host = std::env::var("HOST").unwrap_or_else(|_| DEFAULT_HOST.to_string());

        let port = match std::env::var("PORT") {
            Ok(raw) => raw.trim().parse().map_err(|_| {
                PharmacyMcpError::Config(ConfigError::InvalidConfig {
                    message: format!("PORT must be a port number, got '{}'", raw),
                })
            })?,
            Err(_) => DEFAULT_PORT,
        };

        let data_path = std::env::var("MEDICINE_DATA_PATH")
            .ok()
            .filter(|p| !p.trim().is_empty())
            .map(PathBuf::from);

        Ok(Self {
            host,
            port,
            data_path,
        })
    }

    /// Socket address for the HTTP transport
    pub fn bind_addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.host, self.port).parse().map_err(|_| {
            PharmacyMcpError::Config(ConfigError::InvalidConfig {
                message: format!("invalid bind address {}:{}", self.host, self.port),
            })
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            data_path: None,
        }
    }
}

/// Server identity reported by `initialize`
pub mod server {
    pub const NAME: &str = "medicine-order-server";
    pub const VERSION: &str = "1.0.0";
    pub const DESCRIPTION: &str = "Medicine ordering and drug interaction checking";

    /// Service name reported by the health endpoint
    pub const HEALTH_SERVICE: &str = "mcp-medicine-server";
}
