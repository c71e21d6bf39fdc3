//! Tools domain module.
//!
//! Every data.gov.my dataset is exposed as one MCP tool.
//!
//! ## Architecture
//!
//! - `definitions/` - Tool implementations (catalogue datasets and the car CSV)
//! - `client.rs` - Blocking HTTP client for the data.gov.my endpoints
//! - `router.rs` - rmcp ToolRouter builder for STDIO transport
//! - `registry.rs` - Central tool registry and HTTP dispatch
//! - `error.rs` - Tool-specific error types
//!
//! ## Adding a New Catalogue Dataset
//!
//! Add a `Dataset` entry to `definitions/catalogue/datasets.rs` and list it in
//! `ALL_DATASETS`. The router and the registry pick it up from there.

pub mod client;
pub mod definitions;
mod error;
mod registry;
pub mod router;

pub use error::ToolError;
pub use registry::ToolRegistry;
pub use router::build_tool_router;
