//! Medicine Order MCP Server Library
//!
//! A Model Context Protocol (MCP) server for medicine ordering.
//! Provides tools for catalog search, stock checks, order placement,
//! order status, and drug interaction checks.

pub mod config;
pub mod error;
pub mod mcp;
pub mod pharmacy;

pub use config::Config;
pub use error::{PharmacyMcpError, Result};
