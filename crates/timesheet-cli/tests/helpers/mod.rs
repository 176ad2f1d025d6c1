#![allow(dead_code)]

pub mod fixtures;

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use timesheet_api_client::{Download, TimesheetService};
use timesheet_cli::shell::ShellContext;
use timesheet_core::{
    ClientConfig, Credentials, NotificationCenter, NotificationKind, NotificationTiming,
    StaticAuthenticator, TimesheetEntry, UploadedFile,
};
use timesheet_uploads::Viewer;
use tokio::sync::Notify;

/// In-memory stand-in for the remote API.
#[derive(Default)]
pub struct FakeService {
    pub submitted: Mutex<Vec<TimesheetEntry>>,
    pub invoice_requests: Mutex<Vec<(String, String, Vec<u8>)>>,
    pub report_downloads: Mutex<usize>,
    pub invoice_filename: Mutex<Option<String>>,
    /// Signalled whenever a call reaches the service.
    pub started: Notify,
    fail: AtomicBool,
    stalled: AtomicBool,
}

impl FakeService {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Make every call fail as if the server returned 500.
    pub fn set_failing(&self, failing: bool) {
        self.fail.store(failing, Ordering::SeqCst);
    }

    /// Make every call hang like a server that never answers.
    pub fn set_stalled(&self, stalled: bool) {
        self.stalled.store(stalled, Ordering::SeqCst);
    }

    pub fn set_invoice_filename(&self, name: &str) {
        *self.invoice_filename.lock().unwrap() = Some(name.to_string());
    }

    async fn check(&self) -> anyhow::Result<()> {
        self.started.notify_one();
        if self.stalled.load(Ordering::SeqCst) {
            std::future::pending::<()>().await;
        }
        if self.fail.load(Ordering::SeqCst) {
            Err(anyhow::anyhow!("API request failed with status 500 Internal Server Error"))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl TimesheetService for FakeService {
    async fn submit_timesheet(&self, entry: &TimesheetEntry) -> anyhow::Result<()> {
        self.check().await?;
        self.submitted.lock().unwrap().push(entry.clone());
        Ok(())
    }

    async fn download_timesheets(&self) -> anyhow::Result<Download> {
        self.check().await?;
        *self.report_downloads.lock().unwrap() += 1;
        Ok(Download {
            bytes: Bytes::from_static(fixtures::REPORT_BYTES),
            filename: Some("export-2024.xlsx".to_string()),
            content_type: Some(fixtures::XLSX_MIME.to_string()),
        })
    }

    async fn generate_invoice(&self, file: &UploadedFile) -> anyhow::Result<Download> {
        self.check().await?;
        self.invoice_requests.lock().unwrap().push((
            file.name.clone(),
            file.mime_type.clone(),
            file.payload.to_vec(),
        ));
        Ok(Download {
            bytes: Bytes::from_static(fixtures::PDF_BYTES),
            filename: self.invoice_filename.lock().unwrap().clone(),
            content_type: Some("application/pdf".to_string()),
        })
    }
}

/// Viewer that records what it was asked to open.
#[derive(Default)]
pub struct RecordingViewer {
    pub opened: Mutex<Vec<PathBuf>>,
}

impl Viewer for RecordingViewer {
    fn open(&self, path: &Path) -> std::io::Result<()> {
        self.opened.lock().unwrap().push(path.to_path_buf());
        Ok(())
    }
}

/// Notifications that stay visible long enough for assertions.
pub fn notifications() -> NotificationCenter {
    NotificationCenter::new(NotificationTiming {
        display: Duration::from_secs(600),
        dismiss_animation: Duration::from_millis(300),
    })
}

pub fn messages(center: &NotificationCenter) -> Vec<(NotificationKind, String)> {
    center
        .current()
        .into_iter()
        .map(|n| (n.kind, n.message))
        .collect()
}

/// Shell context backed by fakes, saving downloads into `download_dir`.
pub fn shell_context(
    service: Arc<FakeService>,
    viewer: Arc<RecordingViewer>,
    download_dir: &Path,
) -> ShellContext {
    let config = ClientConfig {
        download_dir: download_dir.to_path_buf(),
        ..ClientConfig::default()
    };
    ShellContext {
        authenticator: Arc::new(StaticAuthenticator::new(
            Credentials::new("admin", "admin123"),
            Duration::ZERO,
        )),
        config,
        service,
        notifications: notifications(),
        viewer,
    }
}
