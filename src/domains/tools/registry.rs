//! Tool Registry - central registration and dispatch for all tools.
//!
//! This module provides:
//! - A registry of all available tools
//! - Name-based dispatch for tool calls that do not go through rmcp (HTTP)
//! - Tool metadata for listing

use std::sync::Arc;

use rmcp::model::{CallToolResult, JsonObject, Tool};
use tracing::warn;

use crate::core::config::Config;

use super::definitions::RegistrationCarTool;
use super::definitions::catalogue::{ALL_DATASETS, CatalogueTool, Dataset};
use super::error::ToolError;

/// Tool registry - manages all available tools.
pub struct ToolRegistry {
    config: Arc<Config>,
}

impl ToolRegistry {
    /// Create a new tool registry.
    pub fn new(config: Arc<Config>) -> Self {
        Self { config }
    }

    /// Get all tool names.
    pub fn tool_names(&self) -> Vec<&'static str> {
        ALL_DATASETS
            .iter()
            .map(|d| d.tool_name)
            .chain(std::iter::once(RegistrationCarTool::NAME))
            .collect()
    }

    /// Get all tools as Tool models (metadata).
    pub fn get_all_tools() -> Vec<Tool> {
        ALL_DATASETS
            .iter()
            .copied()
            .map(|d| CatalogueTool::new(d).to_tool())
            .chain(std::iter::once(RegistrationCarTool::to_tool()))
            .collect()
    }

    /// Dispatch a tool call by name.
    ///
    /// Performs blocking I/O; async callers must run it on a blocking thread.
    pub fn call_tool(&self, name: &str, arguments: &JsonObject) -> Result<CallToolResult, ToolError> {
        let api = &self.config.api;

        if name == RegistrationCarTool::NAME {
            return Ok(RegistrationCarTool::execute(arguments, api));
        }

        match Dataset::by_tool_name(name) {
            Some(dataset) => Ok(CatalogueTool::new(dataset).execute(arguments, api)),
            None => {
                warn!("Unknown tool requested: {}", name);
                Err(ToolError::not_found(name))
            }
        }
    }
}
