//! MCP Server implementation
//!
//! Dispatches JSON-RPC requests to the protocol handlers and tools. The
//! HTTP transport and the stdio loop both go through `handle_request`.

use std::sync::Arc;

use serde::Serialize;
use serde_json::{json, Value};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{debug, error, warn};

use crate::config::server;
use crate::error::{McpError, PharmacyMcpError, Result};
use crate::mcp::tools::ToolHandler;
use crate::mcp::types::*;
use crate::pharmacy::service::PharmacyService;

/// MCP Server for medicine ordering
pub struct McpServer {
    /// Tool handler
    tool_handler: ToolHandler,
}

impl McpServer {
    /// Create a new MCP server
    pub fn new(service: Arc<PharmacyService>) -> Self {
        Self {
            tool_handler: ToolHandler::new(service),
        }
    }

    /// Parse a request envelope. Anything but a JSON object is malformed.
    pub fn parse_request(message: &str) -> Result<JsonRpcRequest> {
        let malformed = |message: String| PharmacyMcpError::Mcp(McpError::MalformedRequest { message });

        let value: Value = serde_json::from_str(message).map_err(|e| malformed(e.to_string()))?;
        if !value.is_object() {
            return Err(malformed("request body must be a JSON object".to_string()));
        }

        serde_json::from_value(value).map_err(|e| malformed(e.to_string()))
    }

    /// Parse and handle a raw message
    pub async fn handle_message(&self, message: &str) -> Result<JsonRpcResponse> {
        let request = Self::parse_request(message)?;
        Ok(self.handle_request(request).await)
    }

    /// Handle a parsed request. Always produces a response echoing the request id.
    pub async fn handle_request(&self, request: JsonRpcRequest) -> JsonRpcResponse {
        debug!(method = %request.method, "handling request");

        let result = match request.method.as_str() {
            methods::INITIALIZE => self.handle_initialize(),
            methods::LIST_TOOLS => self.handle_list_tools(),
            methods::CALL_TOOL => self.handle_call_tool(request.params).await,
            other => {
                warn!(method = other, "unknown method");
                let err = McpError::UnknownMethod {
                    method: other.to_string(),
                };
                to_value(&ErrorResult {
                    error: JsonRpcError {
                        code: err.code(),
                        message: err.to_string(),
                    },
                })
            }
        };

        JsonRpcResponse::success(request.id, result)
    }

    /// Handle initialize request
    fn handle_initialize(&self) -> Value {
        to_value(&InitializeResult {
            protocol_version: MCP_VERSION.to_string(),
            capabilities: ServerCapabilities::default(),
            server_info: ServerInfo {
                name: server::NAME.to_string(),
                version: server::VERSION.to_string(),
                description: server::DESCRIPTION.to_string(),
            },
        })
    }

    /// Handle list tools request
    fn handle_list_tools(&self) -> Value {
        to_value(&ListToolsResult {
            tools: self.tool_handler.list_tools(),
        })
    }

    /// Handle call tool request
    async fn handle_call_tool(&self, params: Value) -> Value {
        let params = if params.is_null() { json!({}) } else { params };

        let result = match serde_json::from_value::<CallToolParams>(params) {
            Ok(params) => self.tool_handler.call_tool(&params.name, params.arguments).await,
            Err(e) => CallToolResult::error(format!("Invalid tool parameters: {}", e)),
        };

        to_value(&result)
    }

    /// Run the server on stdio, one JSON message per line
    pub async fn run_stdio(&self) -> Result<()> {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        let mut stdout = tokio::io::stdout();

        while let Some(line) = lines.next_line().await? {
            if line.trim().is_empty() {
                continue;
            }

            let reply = match Self::parse_request(&line) {
                Ok(request) if request.method.starts_with(methods::NOTIFICATION_PREFIX) => {
                    // Notifications get no response
                    continue;
                }
                Ok(request) => serde_json::to_string(&self.handle_request(request).await)?,
                Err(e) => {
                    error!("Error handling message: {}", e);
                    json!({
                        "jsonrpc": JSONRPC_VERSION,
                        "id": Value::Null,
                        "error": {"code": -32700, "message": e.to_string()}
                    })
                    .to_string()
                }
            };

            stdout.write_all(reply.as_bytes()).await?;
            stdout.write_all(b"\n").await?;
            stdout.flush().await?;
        }

        Ok(())
    }
}

fn to_value<T: Serialize>(result: &T) -> Value {
    serde_json::to_value(result).unwrap_or_else(|e| {
        error!("failed to serialize result: {}", e);
        Value::Null
    })
}
