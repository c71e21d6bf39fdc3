//! Car registration transactions tool.
//!
//! Unlike the catalogue tools this one downloads a CSV and filters it
//! locally. Rows are streamed one at a time and only matches are kept.
//! The result is a JSON array of string arrays whose first element is
//! always the header row.

use std::io::Read;
use std::sync::Arc;

use csv::{ReaderBuilder, StringRecord};
use futures::FutureExt;
use rmcp::{
    ErrorData as McpError,
    handler::server::tool::{ToolCallContext, ToolRoute},
    model::{CallToolResult, JsonObject, Tool},
};
use tracing::{debug, info, instrument};

use super::common::{FilterField, error_result, input_schema, success_result};
use crate::core::config::{ApiConfig, Config};
use crate::domains::tools::client::DataGovClient;
use crate::domains::tools::error::ToolError;

/// Column the date range is evaluated against.
const DATE_COLUMN: &str = "date_reg";

/// Exact-match filters, in evaluation order.
const EXACT_FIELDS: &[FilterField] = &[
    FilterField::string(
        "date_reg",
        "The date of registration of the vehicle in YYYY-MM-DD format; please note that this date may not be the same as the date of purchase",
    ),
    FilterField::string(
        "type",
        "One of 5 vehicle types classed under as Cars for the purpose of analysis, namely motorcars ('motokar'), MPVs ('motokar_pelbagai_utiliti'), jeeps ('jip'), pick-up trucks ('pick_up') and window vans ('window_van')",
    ),
    FilterField::string(
        "maker",
        "Maker of the vehicle (e.g. Perodua, Proton, Toyota) in upper-case text",
    ),
    FilterField::string(
        "model",
        "Model of the vehicle (e.g. Bezza (Perodua), Saga (Proton), City (Honda)) in upper-case text",
    ),
    FilterField::string(
        "colour",
        "Colour of the car in lower-case English text; please note these are broadly defined colours which do not distinguish between shades of the same colour (e.g. light blue and dark blue are both classed as blue)",
    ),
    FilterField::string(
        "fuel",
        "Fuel used by the car's engine(s); there are 7 types, namely petrol ('petrol'), diesel ('diesel'), green diesel ('greendiesel'), natural gas ('ng'), liquefied natural gas ('lng'), hydrogen ('hydrogen'), and electricity ('electric'). Cars which can run on electricity or fuel are classed as hybrid (either 'hybrid_petrol' or 'hybrid_diesel'). Combinations of two fuels indicate that the car's engine can use more than one type of fuel; for instance, 'diesel_ng' means the car's engine can use both diesel and natural gas as fuel.",
    ),
    FilterField::string(
        "state",
        "One of 16 states, or 'Rakan Niaga'; this either indicates the state of the JPJ office the car was registered at, or that the car was registered through an official JPJ partner portal ('Rakan Niaga'). Please note that this data field has no relation to the car's number plate, which may be freely chosen with no dependence on where the car was registered.",
    ),
];

const DATE_START: FilterField = FilterField::string(
    "date_start",
    "For date range and the start date of registration of the vehicle in YYYY-MM-DD format; please note that this date may not be the same as the date of purchase",
);

const DATE_END: FilterField = FilterField::string(
    "date_end",
    "For date range and the end date of registration of the vehicle in YYYY-MM-DD format; please note that this date may not be the same as the date of purchase",
);

/// Filters requested by a caller, before they are resolved against a header.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegistrationFilter {
    /// `(column, value)` pairs in evaluation order.
    pub exact: Vec<(&'static str, String)>,
    pub date_start: Option<String>,
    pub date_end: Option<String>,
}

impl RegistrationFilter {
    /// Read the filters from call arguments. Empty or non-string values
    /// count as not supplied.
    pub fn from_arguments(args: &JsonObject) -> Self {
        let non_empty = |field: &FilterField| field.extract(args).filter(|v| !v.is_empty());

        Self {
            exact: EXACT_FIELDS
                .iter()
                .filter_map(|f| non_empty(f).map(|v| (f.field, v)))
                .collect(),
            date_start: non_empty(&DATE_START),
            date_end: non_empty(&DATE_END),
        }
    }

    fn has_date_range(&self) -> bool {
        self.date_start.is_some() || self.date_end.is_some()
    }

    /// Map every referenced column to its index in `header`.
    fn resolve(&self, header: &StringRecord) -> Result<ResolvedFilter<'_>, ToolError> {
        let index_of = |column: &str| {
            header
                .iter()
                .position(|h| h == column)
                .ok_or_else(|| ToolError::MissingColumn(column.to_string()))
        };

        let exact = self
            .exact
            .iter()
            .map(|&(column, ref value)| Ok((index_of(column)?, value.as_str())))
            .collect::<Result<Vec<_>, ToolError>>()?;

        let date_index = if self.has_date_range() {
            Some(index_of(DATE_COLUMN)?)
        } else {
            None
        };

        Ok(ResolvedFilter {
            exact,
            date_index,
            date_start: self.date_start.as_deref(),
            date_end: self.date_end.as_deref(),
        })
    }
}

/// Filters with column names replaced by header positions.
///
/// The reader is non-flexible, so every record is as wide as the header
/// and each resolved index is in bounds.
struct ResolvedFilter<'a> {
    exact: Vec<(usize, &'a str)>,
    date_index: Option<usize>,
    date_start: Option<&'a str>,
    date_end: Option<&'a str>,
}

impl ResolvedFilter<'_> {
    /// Whether `record` passes every filter, stopping at the first mismatch.
    ///
    /// ISO `YYYY-MM-DD` dates order the same lexicographically and
    /// chronologically, so the range check is a plain string comparison.
    fn matches(&self, record: &StringRecord) -> bool {
        let cell = |index: usize| record.get(index).unwrap_or_default();

        if self
            .exact
            .iter()
            .any(|&(index, expected)| cell(index) != expected)
        {
            return false;
        }

        match self.date_index {
            Some(index) => {
                let date = cell(index);
                self.date_start.is_none_or(|start| date >= start)
                    && self.date_end.is_none_or(|end| date <= end)
            }
            None => true,
        }
    }
}

/// Stream CSV rows from `source` and keep the header plus matching rows.
///
/// Any unreadable or malformed row fails the whole call.
pub fn filter_rows<R: Read>(
    source: R,
    filter: &RegistrationFilter,
) -> Result<Vec<Vec<String>>, ToolError> {
    let mut reader = ReaderBuilder::new().has_headers(false).from_reader(source);
    let mut records = reader.records();

    let header = match records.next() {
        Some(Ok(header)) => header,
        Some(Err(e)) => return Err(ToolError::CsvHeader(e)),
        None => {
            return Err(ToolError::CsvHeader(csv::Error::from(std::io::Error::new(
                std::io::ErrorKind::UnexpectedEof,
                "empty CSV",
            ))));
        }
    };

    let resolved = filter.resolve(&header)?;
    let mut table = vec![header.iter().map(str::to_string).collect::<Vec<_>>()];
    let mut scanned = 0u64;

    for record in records {
        let record = record.map_err(ToolError::CsvRow)?;
        scanned += 1;
        if resolved.matches(&record) {
            table.push(record.iter().map(str::to_string).collect());
        }
    }

    debug!("Scanned {} rows, kept {}", scanned, table.len() - 1);
    Ok(table)
}

/// Car Registration Transactions Tool implementation.
#[derive(Debug, Clone)]
pub struct RegistrationCarTool;

impl RegistrationCarTool {
    /// Tool name as registered in MCP.
    pub const NAME: &'static str = "registration_transactions_car";

    /// Tool description shown to clients.
    pub const DESCRIPTION: &'static str = "Car registration transactions from 2000 to the present";

    /// Execute the tool logic. Performs blocking I/O.
    #[instrument(skip_all)]
    pub fn execute(args: &JsonObject, api: &ApiConfig) -> CallToolResult {
        match Self::fetch(args, api) {
            Ok(json) => success_result(json),
            Err(e) => error_result(&e.to_string()),
        }
    }

    /// Download the CSV, filter it and encode the result as JSON.
    pub fn fetch(args: &JsonObject, api: &ApiConfig) -> Result<String, ToolError> {
        let filter = RegistrationFilter::from_arguments(args);
        info!("Filtering car registrations with {:?}", filter);

        let response = DataGovClient::new(api)?.open_cars_csv()?;
        let table = filter_rows(response, &filter)?;
        info!("{} registration(s) matched", table.len() - 1);

        Ok(serde_json::to_string(&table)?)
    }

    /// Create a Tool model for this tool (metadata).
    pub fn to_tool() -> Tool {
        let mut fields = EXACT_FIELDS.to_vec();
        fields.insert(1, DATE_START);
        fields.insert(2, DATE_END);

        Tool {
            name: Self::NAME.into(),
            description: Some(Self::DESCRIPTION.into()),
            input_schema: input_schema(&fields),
            annotations: None,
            output_schema: None,
            icons: None,
            meta: None,
            title: None,
        }
    }

    /// Create a ToolRoute for the rmcp router.
    pub fn create_route<S>(config: Arc<Config>) -> ToolRoute<S>
    where
        S: Send + Sync + 'static,
    {
        ToolRoute::new_dyn(Self::to_tool(), move |ctx: ToolCallContext<'_, S>| {
            let args = ctx.arguments.clone().unwrap_or_default();
            let config = config.clone();
            async move {
                tokio::task::spawn_blocking(move || Self::execute(&args, &config.api))
                    .await
                    .map_err(|e| McpError::internal_error(format!("Task failed: {}", e), None))
            }
            .boxed()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rmcp::model::RawContent;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const CSV: &str = "date_reg,type,maker,model,colour,fuel,state\n\
        2024-01-01,motokar,TOYOTA,VIOS,blue,petrol,Selangor\n\
        2024-02-01,jip,PERODUA,BEZZA,red,diesel,Johor\n";

    fn header() -> Vec<String> {
        ["date_reg", "type", "maker", "model", "colour", "fuel", "state"]
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    fn row(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|s| s.to_string()).collect()
    }

    fn filter(args: serde_json::Value) -> RegistrationFilter {
        RegistrationFilter::from_arguments(args.as_object().unwrap())
    }

    fn run(args: serde_json::Value) -> Result<Vec<Vec<String>>, ToolError> {
        filter_rows(CSV.as_bytes(), &filter(args))
    }

    #[test]
    fn test_filter_by_maker() {
        let table = run(json!({ "maker": "TOYOTA" })).unwrap();
        assert_eq!(
            table,
            vec![
                header(),
                row(&["2024-01-01", "motokar", "TOYOTA", "VIOS", "blue", "petrol", "Selangor"]),
            ]
        );
    }

    #[test]
    fn test_filter_by_date_start() {
        let table = run(json!({ "date_start": "2024-02-01" })).unwrap();
        assert_eq!(
            table,
            vec![
                header(),
                row(&["2024-02-01", "jip", "PERODUA", "BEZZA", "red", "diesel", "Johor"]),
            ]
        );
    }

    #[test]
    fn test_date_range_is_inclusive() {
        let table = run(json!({ "date_start": "2024-01-01", "date_end": "2024-02-01" })).unwrap();
        assert_eq!(table.len(), 3);

        let table = run(json!({ "date_end": "2024-01-31" })).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table[1][0], "2024-01-01");
    }

    #[test]
    fn test_no_match_returns_header_only() {
        let table = run(json!({ "maker": "HONDA" })).unwrap();
        assert_eq!(table, vec![header()]);
        assert_eq!(
            serde_json::to_string(&table).unwrap(),
            r#"[["date_reg","type","maker","model","colour","fuel","state"]]"#
        );
    }

    #[test]
    fn test_no_filters_keeps_every_row_in_order() {
        let table = run(json!({})).unwrap();
        assert_eq!(table.len(), 3);
        assert_eq!(table[1][2], "TOYOTA");
        assert_eq!(table[2][2], "PERODUA");
    }

    #[test]
    fn test_combined_filters_must_all_match() {
        assert_eq!(run(json!({ "maker": "TOYOTA", "state": "Johor" })).unwrap().len(), 1);
        assert_eq!(run(json!({ "maker": "PERODUA", "state": "Johor" })).unwrap().len(), 2);
    }

    #[test]
    fn test_empty_and_wrong_typed_filters_are_ignored() {
        let f = filter(json!({ "maker": "", "state": 7, "date_start": null }));
        assert_eq!(f, RegistrationFilter::default());
        assert_eq!(run(json!({ "maker": "", "state": 7 })).unwrap().len(), 3);
    }

    #[test]
    fn test_exact_filters_keep_evaluation_order() {
        let args = json!({ "state": "Johor", "date_reg": "2024-02-01", "maker": "PERODUA" });
        let f = filter(args.clone());
        let columns: Vec<_> = f.exact.iter().map(|(c, _)| *c).collect();
        assert_eq!(columns, vec!["date_reg", "maker", "state"]);

        let table = run(args).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table[1][3], "BEZZA");
    }

    #[test]
    fn test_filter_by_exact_registration_date() {
        let table = run(json!({ "date_reg": "2024-01-01" })).unwrap();
        assert_eq!(
            table,
            vec![
                header(),
                row(&["2024-01-01", "motokar", "TOYOTA", "VIOS", "blue", "petrol", "Selangor"]),
            ]
        );

        // Exact match does not use range semantics.
        assert_eq!(run(json!({ "date_reg": "2024-01" })).unwrap(), vec![header()]);
    }

    #[test]
    fn test_exact_date_combines_with_range() {
        let table = run(json!({ "date_reg": "2024-02-01", "date_end": "2024-01-31" })).unwrap();
        assert_eq!(table, vec![header()]);
    }

    #[test]
    fn test_malformed_row_fails_whole_call() {
        let csv = "date_reg,type,maker\n2024-01-01,motokar,TOYOTA\n2024-02-01,jip\n";
        let err = filter_rows(csv.as_bytes(), &RegistrationFilter::default()).unwrap_err();
        assert!(matches!(err, ToolError::CsvRow(_)));
    }

    #[test]
    fn test_short_row_under_filter_is_a_row_error() {
        let csv = "date_reg,type,maker\n2024-01-01,motokar\n";
        let err = filter_rows(csv.as_bytes(), &filter(json!({ "maker": "TOYOTA" }))).unwrap_err();
        assert!(matches!(err, ToolError::CsvRow(_)));
    }

    #[test]
    fn test_missing_column_is_an_error() {
        let csv = "date_reg,type\n2024-01-01,motokar\n";
        let err = filter_rows(csv.as_bytes(), &filter(json!({ "maker": "TOYOTA" }))).unwrap_err();
        assert_eq!(err.to_string(), "CSV header has no 'maker' column");
    }

    #[test]
    fn test_empty_csv_is_a_header_error() {
        let err = filter_rows("".as_bytes(), &RegistrationFilter::default()).unwrap_err();
        assert!(matches!(err, ToolError::CsvHeader(_)));
    }

    #[test]
    fn test_to_tool_lists_every_filter_once() {
        let tool = RegistrationCarTool::to_tool();
        let properties = tool.input_schema["properties"].as_object().unwrap();
        assert_eq!(properties.len(), 9);
        assert!(properties.contains_key("date_start"));
        assert!(properties.contains_key("date_end"));
    }

    fn api_for(server: &MockServer) -> ApiConfig {
        ApiConfig {
            cars_csv_url: format!("{}/transportation/cars_2025.csv", server.uri()),
            ..ApiConfig::default()
        }
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_execute_downloads_and_filters() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/transportation/cars_2025.csv"))
            .respond_with(ResponseTemplate::new(200).set_body_string(CSV))
            .expect(1)
            .mount(&server)
            .await;

        let api = api_for(&server);
        let args = json!({ "fuel": "diesel" }).as_object().cloned().unwrap();
        let result = tokio::task::spawn_blocking(move || RegistrationCarTool::execute(&args, &api))
            .await
            .unwrap();

        assert_eq!(result.is_error, Some(false));
        let RawContent::Text(text) = &result.content[0].raw else {
            panic!("expected text content");
        };
        assert_eq!(
            text.text,
            r#"[["date_reg","type","maker","model","colour","fuel","state"],["2024-02-01","jip","PERODUA","BEZZA","red","diesel","Johor"]]"#
        );
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_repeated_execute_is_byte_identical() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/transportation/cars_2025.csv"))
            .respond_with(ResponseTemplate::new(200).set_body_string(CSV))
            .expect(2)
            .mount(&server)
            .await;

        let api = api_for(&server);
        let args = json!({ "maker": "TOYOTA", "date_start": "2024-01-01" })
            .as_object()
            .cloned()
            .unwrap();
        let (first, second) = tokio::task::spawn_blocking(move || {
            (
                RegistrationCarTool::execute(&args, &api),
                RegistrationCarTool::execute(&args, &api),
            )
        })
        .await
        .unwrap();

        let text = |result: &CallToolResult| match &result.content[0].raw {
            RawContent::Text(text) => text.text.clone(),
            other => panic!("expected text content, got {:?}", other),
        };
        assert_eq!(first.is_error, Some(false));
        assert_eq!(text(&first), text(&second));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_execute_non_200_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let api = api_for(&server);
        let err = tokio::task::spawn_blocking(move || {
            RegistrationCarTool::fetch(&JsonObject::new(), &api)
        })
        .await
        .unwrap()
        .unwrap_err();

        assert!(matches!(err, ToolError::UnexpectedStatus { status: 404 }));
    }
}
