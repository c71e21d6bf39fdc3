//! Remote query assembly for the data catalogue API.
//!
//! The API takes the dataset in `id` and the filters in a single `filter`
//! parameter, each filter written as `<value>@<field>` and joined with `,`.

use rmcp::model::JsonObject;

use super::datasets::Dataset;
use crate::domains::tools::error::ToolError;

/// A dataset id plus the ordered filter tokens for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteQuery {
    pub dataset: &'static str,
    pub filters: Vec<String>,
}

impl RemoteQuery {
    pub fn new(dataset: &'static str) -> Self {
        Self {
            dataset,
            filters: Vec::new(),
        }
    }

    /// Append a `<value>@<field>` token.
    pub fn push(&mut self, value: &str, field: &str) {
        self.filters.push(format!("{}@{}", value, field));
    }

    /// Build the query for `dataset` from call arguments, in the dataset's
    /// declared field order.
    pub fn from_arguments(dataset: &Dataset, args: &JsonObject) -> Self {
        let mut query = Self::new(dataset.id);
        for field in dataset.fields {
            if let Some(value) = field.extract(args) {
                query.push(&value, field.field);
            }
        }
        query
    }

    /// The `filter` parameter value, if any filter was supplied.
    pub fn filter_param(&self) -> Option<String> {
        if self.filters.is_empty() {
            None
        } else {
            Some(self.filters.join(","))
        }
    }

    /// URL-encoded query string: `id=<dataset>[&filter=<tokens>]`.
    pub fn encode(&self) -> Result<String, ToolError> {
        let mut pairs = vec![("id", self.dataset.to_string())];
        if let Some(filter) = self.filter_param() {
            pairs.push(("filter", filter));
        }
        serde_urlencoded::to_string(&pairs).map_err(|e| ToolError::internal(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::super::datasets::{BIRTHS, FUELPRICE, POPULATION_MALAYSIA, POPULATION_STATE};
    use super::*;
    use serde_json::json;

    fn args(value: serde_json::Value) -> JsonObject {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_tokens_follow_declared_order() {
        // Argument order in the call must not matter.
        let query = RemoteQuery::from_arguments(
            &POPULATION_MALAYSIA,
            &args(json!({
                "date": "2020-01-01",
                "ethnicity": "chinese",
                "age": "overall",
                "sex": "both",
            })),
        );
        assert_eq!(
            query.filter_param().as_deref(),
            Some("overall@age,both@sex,chinese@ethnicity,2020-01-01@date")
        );
    }

    #[test]
    fn test_no_filters_means_no_filter_param() {
        let query = RemoteQuery::from_arguments(&FUELPRICE, &JsonObject::new());
        assert_eq!(query.dataset, "fuelprice");
        assert_eq!(query.filter_param(), None);
        assert_eq!(query.encode().unwrap(), "id=fuelprice");
    }

    #[test]
    fn test_unknown_arguments_are_ignored() {
        let query = RemoteQuery::from_arguments(
            &FUELPRICE,
            &args(json!({ "state": "Johor", "series_type": "level" })),
        );
        assert_eq!(query.filters, vec!["level@series_type".to_string()]);
    }

    #[test]
    fn test_wrong_type_behaves_like_absent() {
        let with_bad = RemoteQuery::from_arguments(
            &BIRTHS,
            &args(json!({ "date": "2024-01-01", "births": "many" })),
        );
        let without = RemoteQuery::from_arguments(&BIRTHS, &args(json!({ "date": "2024-01-01" })));
        assert_eq!(with_bad, without);
    }

    #[test]
    fn test_number_filter() {
        let query = RemoteQuery::from_arguments(&BIRTHS, &args(json!({ "births": 1500 })));
        assert_eq!(query.filter_param().as_deref(), Some("1500@births"));
    }

    #[test]
    fn test_state_filter_is_last() {
        let query = RemoteQuery::from_arguments(
            &POPULATION_STATE,
            &args(json!({ "state": "Sabah", "sex": "male" })),
        );
        assert_eq!(query.filter_param().as_deref(), Some("male@sex,Sabah@state"));
    }

    #[test]
    fn test_encode_with_filter() {
        let mut query = RemoteQuery::new("births");
        query.push("2024-01-01", "date");
        assert_eq!(
            query.encode().unwrap(),
            "id=births&filter=2024-01-01%40date"
        );
    }
}
