//! Invoice generator: one source spreadsheet in, one PDF out.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use timesheet_api_client::{TimesheetService, DEFAULT_INVOICE_FILENAME};
use timesheet_core::{
    AppError, FileCandidate, FileId, NotificationCenter, UploadedFile, ValidationError,
};
use timesheet_uploads::{PayloadHandle, UploadManager, UploadPolicy, Viewer};

use super::BusyFlag;
use crate::downloads::save_download;

pub const NO_FILE: &str = "Please upload a file first";
pub const INVOICE_SUCCESS: &str = "Invoice downloaded successfully!";
pub const INVOICE_FAILURE: &str = "Error generating invoice. Please try again.";

pub struct InvoiceView {
    uploads: UploadManager,
    service: Arc<dyn TimesheetService>,
    notifications: NotificationCenter,
    viewer: Arc<dyn Viewer>,
    download_dir: PathBuf,
    processing: BusyFlag,
    open_view: Option<PayloadHandle>,
}

impl InvoiceView {
    pub fn new(
        uploads: UploadManager,
        service: Arc<dyn TimesheetService>,
        notifications: NotificationCenter,
        viewer: Arc<dyn Viewer>,
        download_dir: PathBuf,
    ) -> Self {
        Self {
            uploads,
            service,
            notifications,
            viewer,
            download_dir,
            processing: BusyFlag::new(),
            open_view: None,
        }
    }

    /// Build the view with the standard single-spreadsheet policy.
    pub fn with_policy(
        max_file_size: u64,
        service: Arc<dyn TimesheetService>,
        notifications: NotificationCenter,
        viewer: Arc<dyn Viewer>,
        download_dir: PathBuf,
    ) -> Self {
        let uploads = UploadManager::new(
            UploadPolicy::invoice_source(max_file_size),
            notifications.clone(),
        );
        Self::new(uploads, service, notifications, viewer, download_dir)
    }

    pub fn uploads(&self) -> &UploadManager {
        &self.uploads
    }

    pub fn is_processing(&self) -> bool {
        self.processing.is_busy()
    }

    pub fn busy_flag(&self) -> BusyFlag {
        self.processing.clone()
    }

    /// The file currently held in the slot, if any.
    pub fn file(&self) -> Option<UploadedFile> {
        self.uploads.snapshot().into_iter().next()
    }

    pub fn add(&mut self, candidate: FileCandidate) -> Result<FileId, ValidationError> {
        self.uploads.add(candidate)
    }

    pub async fn add_path(&mut self, path: &Path) -> Result<FileId, AppError> {
        self.uploads.add_path(path).await
    }

    /// Empty the slot so another file can be chosen.
    pub fn remove(&mut self) -> Option<UploadedFile> {
        self.close_view();
        let id = self.file()?.id;
        self.uploads.remove(id)
    }

    pub fn view(&mut self) -> Result<&Path, AppError> {
        let file = self
            .file()
            .ok_or_else(|| ValidationError::UnknownFile("slot".to_string()))?;
        self.close_view();
        let handle = self.uploads.view(file.id, self.viewer.as_ref())?;
        let handle = self.open_view.insert(handle);
        handle
            .path()
            .ok_or_else(|| ValidationError::UnknownFile(file.name.clone()).into())
    }

    pub fn close_view(&mut self) {
        if let Some(mut handle) = self.open_view.take() {
            if let Err(e) = handle.revoke() {
                tracing::warn!(error = %e, "Failed to remove temporary view file");
            }
        }
    }

    /// Send the completed spreadsheet and save the returned PDF.
    ///
    /// The uploaded file is kept either way.
    pub async fn generate(&mut self) -> Result<PathBuf, AppError> {
        let Some(busy) = self.processing.try_acquire() else {
            return Err(ValidationError::RequestInFlight.into());
        };

        let Some(file) = self.uploads.first_complete() else {
            self.notifications.error(NO_FILE);
            return Err(ValidationError::NoCompletedUpload.into());
        };

        let result = self.request_and_save(&file).await;
        drop(busy);

        match result {
            Ok(path) => {
                self.notifications.success(INVOICE_SUCCESS);
                Ok(path)
            }
            Err(e) => {
                e.log();
                self.notifications.error(INVOICE_FAILURE);
                Err(e)
            }
        }
    }

    async fn request_and_save(&self, file: &UploadedFile) -> Result<PathBuf, AppError> {
        let download = self
            .service
            .generate_invoice(file)
            .await
            .map_err(|e| AppError::network(INVOICE_FAILURE, e))?;

        let filename = download.filename_or(DEFAULT_INVOICE_FILENAME);
        save_download(
            &self.download_dir,
            &filename,
            DEFAULT_INVOICE_FILENAME,
            &download.bytes,
        )
        .await
    }
}
