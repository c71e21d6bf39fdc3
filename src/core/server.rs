//! MCP Server implementation and lifecycle management.
//!
//! This module contains the main server handler that implements the MCP
//! protocol by delegating tool calls to the tools domain.
//!
//! The ToolRouter is built in `domains/tools/router.rs`; adding a dataset
//! does not require touching this file.

use rmcp::{
    ServerHandler, handler::server::tool::ToolRouter, model::*, tool_handler,
};
use std::sync::Arc;
use tracing::info;

use super::config::Config;
use crate::domains::tools::{ToolError, ToolRegistry, build_tool_router};

/// The main MCP server handler.
///
/// This struct implements the `ServerHandler` trait from rmcp. It holds no
/// per-request state: every tool call builds and discards its own inputs.
#[derive(Clone)]
pub struct McpServer {
    /// Server configuration.
    config: Arc<Config>,

    /// Tool router for handling tool calls.
    tool_router: ToolRouter<Self>,
}

impl McpServer {
    /// Instructions sent to clients on initialization.
    pub const INSTRUCTIONS: &'static str = "Open data from data.gov.my, the Malaysian government's open data portal. \
         Tools cover population (national and state), daily births, weekly fuel prices, \
         household income and car registration transactions. Every filter is optional; \
         dates use the YYYY-MM-DD format.";

    /// Create a new MCP server with the given configuration.
    pub fn new(config: Config) -> Self {
        let config = Arc::new(config);

        Self {
            tool_router: build_tool_router::<Self>(config.clone()),
            config,
        }
    }

    /// Get the server name.
    pub fn name(&self) -> &str {
        &self.config.server.name
    }

    /// Get the server version.
    pub fn version(&self) -> &str {
        &self.config.server.version
    }

    /// Get the server configuration.
    pub fn config(&self) -> &Arc<Config> {
        &self.config
    }

    /// Names of every registered tool.
    pub fn tool_names(&self) -> Vec<&'static str> {
        ToolRegistry::new(self.config.clone()).tool_names()
    }

    // ========================================================================
    // HTTP Transport Support Methods
    // ========================================================================

    /// List all available tools (for HTTP transport).
    pub fn list_tools(&self) -> Vec<serde_json::Value> {
        self.tool_router
            .list_all()
            .into_iter()
            .map(|t| {
                serde_json::json!({
                    "name": t.name,
                    "description": t.description,
                    "inputSchema": t.input_schema
                })
            })
            .collect()
    }

    /// Call a tool by name (for HTTP transport).
    ///
    /// The call runs on a blocking worker thread like rmcp-routed calls do.
    pub async fn call_tool(
        &self,
        name: &str,
        arguments: JsonObject,
    ) -> Result<CallToolResult, ToolError> {
        info!("Calling tool {}", name);
        let registry = ToolRegistry::new(self.config.clone());
        let name = name.to_string();

        tokio::task::spawn_blocking(move || registry.call_tool(&name, &arguments))
            .await
            .map_err(|e| ToolError::internal(format!("Task failed: {}", e)))?
    }
}

/// ServerHandler implementation with tool_handler macro for automatic tool routing.
#[tool_handler]
impl ServerHandler for McpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(Self::INSTRUCTIONS.to_string()),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: self.config.server.name.clone(),
                version: self.config.server.version.clone(),
                ..Default::default()
            },
            ..Default::default()
        }
    }
}
