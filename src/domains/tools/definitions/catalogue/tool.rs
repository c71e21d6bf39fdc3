//! Passthrough tool for a data catalogue dataset.
//!
//! The remote JSON is returned verbatim as the tool's text result; it is
//! never parsed here.

use std::sync::Arc;

use futures::FutureExt;
use rmcp::{
    ErrorData as McpError,
    handler::server::tool::{ToolCallContext, ToolRoute},
    model::{CallToolResult, JsonObject, Tool},
};
use tracing::{info, instrument};

use super::datasets::Dataset;
use super::query::RemoteQuery;
use crate::core::config::{ApiConfig, Config};
use crate::domains::tools::client::DataGovClient;
use crate::domains::tools::definitions::common::{error_result, input_schema, success_result};
use crate::domains::tools::error::ToolError;

/// Data catalogue tool implementation, parameterised by its dataset.
#[derive(Debug, Clone, Copy)]
pub struct CatalogueTool {
    dataset: &'static Dataset,
}

impl CatalogueTool {
    pub fn new(dataset: &'static Dataset) -> Self {
        Self { dataset }
    }

    /// Tool name as registered in MCP.
    pub fn name(&self) -> &'static str {
        self.dataset.tool_name
    }

    /// Execute the tool logic. Performs blocking I/O.
    #[instrument(skip_all, fields(tool = self.dataset.tool_name))]
    pub fn execute(&self, args: &JsonObject, api: &ApiConfig) -> CallToolResult {
        match self.fetch(args, api) {
            Ok(body) => {
                info!("Fetched {} bytes from dataset {}", body.len(), self.dataset.id);
                success_result(body)
            }
            Err(e) => error_result(&e.to_string()),
        }
    }

    /// Build the query from the arguments and fetch the raw response body.
    pub fn fetch(&self, args: &JsonObject, api: &ApiConfig) -> Result<String, ToolError> {
        let query = RemoteQuery::from_arguments(self.dataset, args);
        info!(
            "Querying dataset {} with filter {:?}",
            query.dataset,
            query.filter_param()
        );

        DataGovClient::new(api)?.fetch_catalogue(&query)
    }

    /// Create a Tool model for this tool (metadata).
    pub fn to_tool(&self) -> Tool {
        Tool {
            name: self.dataset.tool_name.into(),
            description: Some(self.dataset.description.into()),
            input_schema: input_schema(self.dataset.fields),
            annotations: None,
            output_schema: None,
            icons: None,
            meta: None,
            title: None,
        }
    }

    /// Create a ToolRoute for the rmcp router.
    pub fn create_route<S>(self, config: Arc<Config>) -> ToolRoute<S>
    where
        S: Send + Sync + 'static,
    {
        ToolRoute::new_dyn(self.to_tool(), move |ctx: ToolCallContext<'_, S>| {
            let args = ctx.arguments.clone().unwrap_or_default();
            let config = config.clone();
            async move {
                tokio::task::spawn_blocking(move || self.execute(&args, &config.api))
                    .await
                    .map_err(|e| McpError::internal_error(format!("Task failed: {}", e), None))
            }
            .boxed()
        })
    }
}
