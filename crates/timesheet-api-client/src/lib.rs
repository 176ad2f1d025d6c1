//! HTTP client for the timesheet API.
//!
//! Provides a minimal client with generic JSON/binary/multipart helpers and
//! the domain calls (submit timesheet, download report, generate invoice).
//! No authentication headers are sent; the owner gate is client-side only.

pub mod api;

use std::time::Duration;

use anyhow::{Context, Result};
use bytes::Bytes;
use reqwest::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use reqwest::{Client, Response};
use timesheet_core::ClientConfig;

/// Binary response body plus the headers needed to save it.
#[derive(Debug, Clone)]
pub struct Download {
    pub bytes: Bytes,
    /// File name suggested by `Content-Disposition`, already sanitized.
    pub filename: Option<String>,
    pub content_type: Option<String>,
}

impl Download {
    pub fn filename_or(&self, fallback: &str) -> String {
        self.filename
            .clone()
            .unwrap_or_else(|| fallback.to_string())
    }
}

/// HTTP client for the timesheet API.
#[derive(Clone, Debug)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    api_prefix: String,
}

impl ApiClient {
    /// `timeout` of `None` lets a request wait for as long as the server takes.
    pub fn new(base_url: &str, api_version: &str, timeout: Option<Duration>) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_prefix: format!("/api/{}", api_version.trim().trim_matches('/')),
        })
    }

    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        Self::new(&config.api_url, &config.api_version, config.request_timeout())
    }

    /// Create client from environment: TIMESHEET_API_URL (or API_URL),
    /// TIMESHEET_API_VERSION, TIMESHEET_REQUEST_TIMEOUT_SECS.
    pub fn from_env() -> Result<Self> {
        let config = ClientConfig::from_env().context("Invalid client configuration")?;
        Self::from_config(&config)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// API version prefix, e.g. "/api/v1.0".
    pub fn api_prefix(&self) -> &str {
        &self.api_prefix
    }

    /// Full URL for a path below the API prefix.
    pub fn build_url(&self, path: &str) -> String {
        format!("{}{}{}", self.base_url, self.api_prefix, path)
    }

    async fn check_status(response: Response) -> Result<Response> {
        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(anyhow::anyhow!(
                "API request failed with status {}: {}",
                status,
                error_text
            ));
        }
        Ok(response)
    }

    async fn into_download(response: Response) -> Result<Download> {
        let headers = response.headers();
        let filename = headers
            .get(CONTENT_DISPOSITION)
            .and_then(|v| v.to_str().ok())
            .and_then(api::content_disposition_filename);
        let content_type = headers
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        let bytes = response
            .bytes()
            .await
            .context("Failed to read response body")?;

        Ok(Download {
            bytes,
            filename,
            content_type,
        })
    }

    /// POST JSON body. Only the status matters; the response body is ignored.
    pub async fn post_json<B>(&self, path: &str, body: &B) -> Result<()>
    where
        B: serde::Serialize + ?Sized,
    {
        let url = self.build_url(path);
        let response = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await
            .context("Failed to send request")?;

        Self::check_status(response).await?;
        Ok(())
    }

    /// GET a binary resource.
    pub async fn get_bytes(&self, path: &str) -> Result<Download> {
        let url = self.build_url(path);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .context("Failed to send request")?;

        let response = Self::check_status(response).await?;
        Self::into_download(response).await
    }

    /// POST multipart form and return the binary response.
    pub async fn post_multipart(
        &self,
        path: &str,
        form: reqwest::multipart::Form,
    ) -> Result<Download> {
        let url = self.build_url(path);
        let response = self
            .client
            .post(&url)
            .multipart(form)
            .send()
            .await
            .context("Failed to send request")?;

        let response = Self::check_status(response).await?;
        Self::into_download(response).await
    }
}

pub use api::{
    content_disposition_filename, TimesheetService, DEFAULT_INVOICE_FILENAME,
    TIMESHEET_REPORT_FILENAME,
};
