//! Blocking HTTP client for the data.gov.my endpoints.
//!
//! A client lives for exactly one tool call: it is built, used for a single
//! GET and dropped on the blocking worker thread that runs the call.

use std::time::Duration;

use reqwest::Url;
use reqwest::blocking::{Client, Response};
use tracing::{debug, instrument, warn};

use super::definitions::catalogue::RemoteQuery;
use super::error::ToolError;
use crate::core::config::ApiConfig;

/// Client for the data catalogue API and the transport CSV storage.
pub struct DataGovClient<'a> {
    http: Client,
    api: &'a ApiConfig,
}

impl<'a> DataGovClient<'a> {
    /// Build a client with the configured timeout and user agent.
    pub fn new(api: &'a ApiConfig) -> Result<Self, ToolError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(api.timeout_secs))
            .user_agent(&api.user_agent)
            .build()
            .map_err(ToolError::Request)?;

        Ok(Self { http, api })
    }

    /// Full catalogue URL for a query: `<base>?id=<dataset>[&filter=...]`.
    pub fn catalogue_url(&self, query: &RemoteQuery) -> Result<Url, ToolError> {
        let mut url = Url::parse(&self.api.base_url)
            .map_err(|e| ToolError::invalid_url(&self.api.base_url, e))?;
        url.set_query(Some(&query.encode()?));
        Ok(url)
    }

    /// Run a catalogue query and return the body untouched.
    #[instrument(skip_all, fields(dataset = query.dataset))]
    pub fn fetch_catalogue(&self, query: &RemoteQuery) -> Result<String, ToolError> {
        let url = self.catalogue_url(query)?;
        let response = self.get(url)?;
        response.text().map_err(ToolError::Body)
    }

    /// Open the car registrations CSV. The caller streams the body.
    pub fn open_cars_csv(&self) -> Result<Response, ToolError> {
        let url = Url::parse(&self.api.cars_csv_url)
            .map_err(|e| ToolError::invalid_url(&self.api.cars_csv_url, e))?;
        self.get(url)
    }

    fn get(&self, url: Url) -> Result<Response, ToolError> {
        debug!("GET {}", url);

        let response = self.http.get(url).send().map_err(ToolError::Request)?;

        let status = response.status();
        if status != reqwest::StatusCode::OK {
            warn!("{} answered with HTTP {}", response.url(), status);
            return Err(ToolError::UnexpectedStatus {
                status: status.as_u16(),
            });
        }

        Ok(response)
    }
}
