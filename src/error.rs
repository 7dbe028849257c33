//! Error types for the Medicine Order MCP Server
//!
//! This module defines the error hierarchy for all operations in the server.

use thiserror::Error;

/// Main error type for the Medicine Order MCP Server
#[derive(Error, Debug)]
pub enum PharmacyMcpError {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Tool invocation errors
    #[error("Tool error: {0}")]
    Tool(#[from] ToolError),

    /// MCP protocol errors
    #[error("MCP protocol error: {0}")]
    Mcp(#[from] McpError),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    #[error("Reference data file not found: {path}")]
    DataFileNotFound { path: String },
}

/// Errors raised by tool handlers.
///
/// The display strings are the exact texts returned to the client in an
/// error-flagged tool result.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ToolError {
    #[error("Order Failed: {name} not found.")]
    MedicineNotFound { name: String },

    #[error("Order Failed: {dosage} not valid for {medicine}.")]
    InvalidDosage { dosage: String, medicine: String },

    #[error("Order {order_id} not found.")]
    OrderNotFound { order_id: String },

    #[error("Unknown tool: {name}")]
    UnknownTool { name: String },

    #[error("Invalid arguments: {message}")]
    InvalidArguments { message: String },
}

/// MCP protocol errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum McpError {
    #[error("Unknown method: {method}")]
    UnknownMethod { method: String },

    #[error("{message}")]
    MalformedRequest { message: String },
}

impl McpError {
    /// JSON-RPC error code for errors embedded in a response
    pub fn code(&self) -> i32 {
        match self {
            McpError::UnknownMethod { .. } => -32601,
            McpError::MalformedRequest { .. } => -32700,
        }
    }
}

/// Result type alias for server operations
pub type Result<T> = std::result::Result<T, PharmacyMcpError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ToolError::InvalidDosage {
            dosage: "999mg".to_string(),
            medicine: "Metformin".to_string(),
        };
        assert_eq!(err.to_string(), "Order Failed: 999mg not valid for Metformin.");

        let err = ToolError::UnknownTool {
            name: "refill".to_string(),
        };
        assert_eq!(err.to_string(), "Unknown tool: refill");
    }

    #[test]
    fn test_error_conversion() {
        let tool_err = ToolError::OrderNotFound {
            order_id: "ORD-1".to_string(),
        };
        let err: PharmacyMcpError = tool_err.into();
        assert!(matches!(err, PharmacyMcpError::Tool(_)));
    }

    #[test]
    fn test_unknown_method_code() {
        let err = McpError::UnknownMethod {
            method: "resources/list".to_string(),
        };
        assert_eq!(err.code(), -32601);
        assert_eq!(err.to_string(), "Unknown method: resources/list");
    }
}
