//! HTTP transport for the MCP endpoint
//!
//! `POST /mcp` answers each request with a single `message` SSE event whose
//! data line is the JSON-RPC response. Malformed bodies are rejected with
//! 400 before dispatch.

use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{
        sse::{Event, Sse},
        IntoResponse, Response,
    },
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};

use crate::config::server;
use crate::error::Result;
use crate::mcp::server::McpServer;

/// SSE event name carrying the response
pub const MESSAGE_EVENT: &str = "message";

/// Build the HTTP router around a dispatcher
pub fn router(server: Arc<McpServer>) -> Router {
    Router::new()
        .route("/", get(health_handler))
        .route("/health", get(health_handler))
        .route("/mcp", post(mcp_handler))
        .with_state(server)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

/// Serve the router until the process is stopped
pub async fn serve(server: Arc<McpServer>, addr: SocketAddr) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Medicine Order MCP Server listening on {}", addr);
    info!("MCP endpoint: http://{}/mcp", addr);

    axum::serve(listener, router(server)).await?;
    Ok(())
}

async fn mcp_handler(State(server): State<Arc<McpServer>>, body: Bytes) -> Response {
    let request = match std::str::from_utf8(&body)
        .map_err(|e| e.to_string())
        .and_then(|raw| McpServer::parse_request(raw).map_err(|e| e.to_string()))
    {
        Ok(request) => request,
        Err(message) => {
            warn!("rejecting malformed request: {}", message);
            return (StatusCode::BAD_REQUEST, Json(json!({ "error": message }))).into_response();
        }
    };

    let response = server.handle_request(request).await;

    let event = match Event::default().event(MESSAGE_EVENT).json_data(&response) {
        Ok(event) => event,
        Err(e) => {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": e.to_string() })),
            )
                .into_response();
        }
    };

    Sse::new(tokio_stream::once(Ok::<_, Infallible>(event))).into_response()
}

async fn health_handler() -> impl IntoResponse {
    Json(json!({ "status": "ok", "service": server::HEALTH_SERVICE }))
}
