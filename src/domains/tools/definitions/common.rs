//! Common utilities shared across the dataset tools.
//!
//! Every tool declares its parameters as a static table of [`FilterField`]s.
//! The same table drives the JSON input schema advertised to clients and the
//! extraction of filter values from call arguments.

use std::sync::Arc;

use rmcp::model::{CallToolResult, Content, JsonObject};
use serde_json::{Map, Value, json};
use tracing::error;

/// JSON type a filter argument is expected to have.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterKind {
    String,
    Number,
}

impl FilterKind {
    fn schema_type(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Number => "number",
        }
    }
}

/// One optional filter accepted by a tool.
#[derive(Debug, Clone, Copy)]
pub struct FilterField {
    /// Argument name in the tool call.
    pub arg: &'static str,

    /// Field (or CSV column) the value is matched against remotely.
    pub field: &'static str,

    pub kind: FilterKind,

    /// Shown to clients in the input schema.
    pub description: &'static str,
}

impl FilterField {
    /// A string-typed filter whose argument and field names coincide.
    pub const fn string(name: &'static str, description: &'static str) -> Self {
        Self {
            arg: name,
            field: name,
            kind: FilterKind::String,
            description,
        }
    }

    /// A number-typed filter whose argument and field names coincide.
    pub const fn number(name: &'static str, description: &'static str) -> Self {
        Self {
            arg: name,
            field: name,
            kind: FilterKind::Number,
            description,
        }
    }

    /// Pull this filter's value out of the call arguments.
    ///
    /// A value of the wrong JSON type is treated exactly like a missing one.
    pub fn extract(&self, args: &JsonObject) -> Option<String> {
        let value = args.get(self.arg)?;
        match self.kind {
            FilterKind::String => value.as_str().map(str::to_string),
            FilterKind::Number => match value {
                Value::Number(n) => Some(format_number(n)),
                _ => None,
            },
        }
    }
}

/// Render a JSON number the way a person would type it: `42`, not `42.0`.
pub fn format_number(number: &serde_json::Number) -> String {
    if let Some(i) = number.as_i64() {
        return i.to_string();
    }
    if let Some(u) = number.as_u64() {
        return u.to_string();
    }
    match number.as_f64() {
        Some(f) if f.fract() == 0.0 && f.abs() < i64::MAX as f64 => (f as i64).to_string(),
        Some(f) => f.to_string(),
        None => number.to_string(),
    }
}

/// Build a tool input schema: an object whose properties are all optional.
pub fn input_schema(fields: &[FilterField]) -> Arc<JsonObject> {
    let properties: Map<String, Value> = fields
        .iter()
        .map(|f| {
            (
                f.arg.to_string(),
                json!({
                    "type": f.kind.schema_type(),
                    "description": f.description,
                }),
            )
        })
        .collect();

    let mut schema = JsonObject::new();
    schema.insert("type".to_string(), json!("object"));
    schema.insert("properties".to_string(), Value::Object(properties));
    Arc::new(schema)
}

/// Create an error result with a formatted message.
pub fn error_result(message: &str) -> CallToolResult {
    error!("{}", message);
    CallToolResult::error(vec![Content::text(message.to_string())])
}

/// Create a success result with text content.
pub fn success_result(content: String) -> CallToolResult {
    CallToolResult::success(vec![Content::text(content)])
}
