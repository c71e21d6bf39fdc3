//! Domain modules.
//!
//! Each domain encapsulates one MCP capability. This server only exposes
//! tools: every data.gov.my dataset is a tool.

pub mod tools;
