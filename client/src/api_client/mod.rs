// Thin wrapper over the docs server HTTP surface. It only knows how to fetch
// the published document; judging it is left to `refy_contract::lint`.
mod errors;
mod retryable;

use std::time::Duration;

use reqwest::{Client as HttpClient, StatusCode, Url};
use serde_json::Value;
use tracing::instrument;
use uuid::Uuid;

pub use crate::api_client::errors::DocsClientError;
pub use crate::api_client::retryable::RetrySettings;
use crate::api_client::retryable::Retryable;

pub const DOCUMENT_PATH: &str = "api-docs/openapi.json";
pub const CORRELATION_ID_HEADER: &str = "x-correlation-id";

#[derive(Clone)]
pub struct DocsClientArgs {
    pub base_url: Url,
    pub correlation_id: Uuid,
}

#[derive(Clone)]
pub struct DocsClient {
    http: HttpClient,
    args: DocsClientArgs,
    retry_settings: RetrySettings,
}

impl DocsClient {
    pub fn new(args: DocsClientArgs) -> Result<Self, DocsClientError> {
        let http = HttpClient::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| DocsClientError::Unexpected(e.to_string()))?;

        Ok(Self {
            http,
            args,
            retry_settings: RetrySettings::default(),
        })
    }

    pub fn with_retry_settings(mut self, retry_settings: RetrySettings) -> Self {
        self.retry_settings = retry_settings;
        self
    }

    fn document_url(&self) -> Result<Url, DocsClientError> {
        self.args
            .base_url
            .join(DOCUMENT_PATH)
            .map_err(|e| DocsClientError::InvalidUrl(e.to_string()))
    }

    #[instrument(skip(self), fields(correlation_id = %self.args.correlation_id, base_url = %self.args.base_url))]
    pub async fn fetch_document(&self) -> Result<Value, DocsClientError> {
        let url = self.document_url()?;
        let resp = self.send_with_retries(self.http.get(url)).await?;

        match resp.status() {
            StatusCode::OK => Ok(resp.json().await?),
            _ => Err(DocsClientError::from_response(resp).await),
        }
    }
}
