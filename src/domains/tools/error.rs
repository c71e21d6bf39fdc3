//! Tool-specific error types.
//!
//! Every variant is terminal for the single tool call that produced it.

use thiserror::Error;

/// Errors that can occur during tool operations.
#[derive(Debug, Error)]
pub enum ToolError {
    /// The requested tool was not found.
    #[error("Tool not found: {0}")]
    NotFound(String),

    /// A request URL could not be built from the configured endpoint.
    #[error("invalid URL {url}: {reason}")]
    InvalidUrl { url: String, reason: String },

    /// The request never produced a response (DNS, connect, timeout).
    #[error("failed to make request: {0}")]
    Request(#[source] reqwest::Error),

    /// The remote answered with something other than 200 OK.
    #[error("unexpected status code: {status}")]
    UnexpectedStatus { status: u16 },

    /// The response body could not be read.
    #[error("failed to read response body: {0}")]
    Body(#[source] reqwest::Error),

    /// The CSV header could not be read.
    #[error("failed to read CSV header: {0}")]
    CsvHeader(#[source] csv::Error),

    /// A CSV data row could not be read.
    #[error("failed to read CSV row: {0}")]
    CsvRow(#[source] csv::Error),

    /// A filter refers to a column the CSV does not have.
    #[error("CSV header has no '{0}' column")]
    MissingColumn(String),

    /// The filtered rows could not be encoded as JSON.
    #[error("failed to marshal rows to JSON: {0}")]
    Serialize(#[from] serde_json::Error),

    /// An internal error occurred.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ToolError {
    /// Create a new "not found" error.
    pub fn not_found(name: impl Into<String>) -> Self {
        Self::NotFound(name.into())
    }

    /// Create a new "invalid URL" error.
    pub fn invalid_url(url: impl Into<String>, reason: impl ToString) -> Self {
        Self::InvalidUrl {
            url: url.into(),
            reason: reason.to_string(),
        }
    }

    /// Create a new "internal" error.
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }
}
