//! data.gov.my MCP Server Library
//!
//! This crate exposes a handful of Malaysian open-data datasets published on
//! data.gov.my as Model Context Protocol (MCP) tools.
//!
//! # Architecture
//!
//! - **core**: Configuration, error handling, the MCP server handler and transports
//! - **domains**: Business logic organized by bounded contexts
//!   - **tools**: One tool per dataset, plus the shared data.gov.my client
//!
//! # Example
//!
//! ```rust,no_run
//! use datagovmy_mcp_server::{core::McpServer, core::Config};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::from_env();
//!     config.validate()?;
//!     let server = McpServer::new(config);
//!     // Start the server...
//!     Ok(())
//! }
//! ```

pub mod core;
pub mod domains;

// Re-export commonly used types for convenience
pub use core::{Config, Error, McpServer, Result};
