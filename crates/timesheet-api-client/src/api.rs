//! Domain methods for the timesheet API client.

use anyhow::{Context, Result};
use async_trait::async_trait;
use timesheet_core::{TimesheetEntry, UploadedFile};

use crate::{ApiClient, Download};

/// Name the timesheet report is saved under.
pub const TIMESHEET_REPORT_FILENAME: &str = "timesheets.xlsx";

/// Invoice file name when the server does not suggest one.
pub const DEFAULT_INVOICE_FILENAME: &str = "invoice.pdf";

/// Extract the file name from a `Content-Disposition` header value.
///
/// Quotes are stripped, parameters after the name are dropped and any
/// directory components are removed, so the result is safe to join onto a
/// download directory.
pub fn content_disposition_filename(header: &str) -> Option<String> {
    let start = header.find("filename=")? + "filename=".len();
    let raw = header[start..].split(';').next().unwrap_or_default();

    let unquoted: String = raw.chars().filter(|c| *c != '"' && *c != '\'').collect();
    let base = unquoted
        .trim()
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default()
        .trim();

    if base.is_empty() || base == "." || base == ".." {
        None
    } else {
        Some(base.to_string())
    }
}

/// Remote operations the views depend on.
#[async_trait]
pub trait TimesheetService: Send + Sync {
    /// Submit one timesheet entry. Any 2xx status counts as success.
    async fn submit_timesheet(&self, entry: &TimesheetEntry) -> Result<()>;

    /// Download the aggregated timesheet spreadsheet.
    async fn download_timesheets(&self) -> Result<Download>;

    /// Upload a spreadsheet and receive the rendered invoice PDF.
    async fn generate_invoice(&self, file: &UploadedFile) -> Result<Download>;
}

impl ApiClient {
    #[tracing::instrument(
        skip(self, entry),
        fields(employee_id = %entry.employee_id, date = %entry.date)
    )]
    pub async fn submit_timesheet(&self, entry: &TimesheetEntry) -> Result<()> {
        self.post_json("/time-sheet", entry)
            .await
            .context("Failed to submit timesheet")?;
        tracing::info!("Timesheet submitted");
        Ok(())
    }

    #[tracing::instrument(skip(self))]
    pub async fn download_timesheets(&self) -> Result<Download> {
        let download = self
            .get_bytes("/download/time-sheet")
            .await
            .context("Failed to download timesheets")?;
        tracing::info!(bytes = download.bytes.len(), "Timesheet report downloaded");
        Ok(download)
    }

    #[tracing::instrument(skip(self, file), fields(file_id = %file.id, name = %file.name))]
    pub async fn generate_invoice(&self, file: &UploadedFile) -> Result<Download> {
        let part = reqwest::multipart::Part::bytes(file.payload.to_vec())
            .file_name(file.name.clone())
            .mime_str(&file.mime_type)
            .with_context(|| format!("Invalid MIME type: {}", file.mime_type))?;
        let form = reqwest::multipart::Form::new().part("file", part);

        let download = self
            .post_multipart("/invoice", form)
            .await
            .context("Failed to generate invoice")?;
        tracing::info!(
            bytes = download.bytes.len(),
            filename = download.filename.as_deref().unwrap_or(DEFAULT_INVOICE_FILENAME),
            "Invoice generated"
        );
        Ok(download)
    }
}

#[async_trait]
impl TimesheetService for ApiClient {
    async fn submit_timesheet(&self, entry: &TimesheetEntry) -> Result<()> {
        ApiClient::submit_timesheet(self, entry).await
    }

    async fn download_timesheets(&self) -> Result<Download> {
        ApiClient::download_timesheets(self).await
    }

    async fn generate_invoice(&self, file: &UploadedFile) -> Result<Download> {
        ApiClient::generate_invoice(self, file).await
    }
}
