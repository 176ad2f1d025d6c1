//! Supporting documents attached on the home screen. Local only; nothing is
//! sent to the server.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use timesheet_core::{
    AppError, FileCandidate, FileId, NotificationCenter, UploadedFile, ValidationError,
};
use timesheet_uploads::{PayloadHandle, UploadManager, UploadPolicy, Viewer};

pub struct AttachmentsView {
    uploads: UploadManager,
    viewer: Arc<dyn Viewer>,
    /// At most one temporary copy per file.
    open_views: HashMap<FileId, PayloadHandle>,
}

impl AttachmentsView {
    pub fn new(uploads: UploadManager, viewer: Arc<dyn Viewer>) -> Self {
        Self {
            uploads,
            viewer,
            open_views: HashMap::new(),
        }
    }

    pub fn with_policy(
        max_file_size: u64,
        notifications: NotificationCenter,
        viewer: Arc<dyn Viewer>,
    ) -> Self {
        Self::new(
            UploadManager::new(UploadPolicy::attachments(max_file_size), notifications),
            viewer,
        )
    }

    pub fn uploads(&self) -> &UploadManager {
        &self.uploads
    }

    pub fn files(&self) -> Vec<UploadedFile> {
        self.uploads.snapshot()
    }

    pub fn add(&mut self, candidate: FileCandidate) -> Result<FileId, ValidationError> {
        self.uploads.add(candidate)
    }

    /// Add several files; each is validated on its own.
    pub async fn add_paths(&mut self, paths: &[&Path]) -> Vec<Result<FileId, AppError>> {
        let mut results = Vec::with_capacity(paths.len());
        for path in paths {
            results.push(self.uploads.add_path(path).await);
        }
        results
    }

    /// Remove the file at a 1-based list position, along with any open
    /// temporary copy of it.
    pub fn remove(&mut self, position: usize) -> Result<UploadedFile, ValidationError> {
        let id = self
            .uploads
            .id_at(position)
            .ok_or_else(|| ValidationError::UnknownFile(format!("position {}", position)))?;
        self.close_view(id);
        self.uploads
            .remove(id)
            .ok_or_else(|| ValidationError::UnknownFile(format!("position {}", position)))
    }

    /// Open the file at a 1-based list position.
    ///
    /// Viewing a file again replaces its previous temporary copy. The copy
    /// stays until the file is removed, [`close_views`](Self::close_views) is
    /// called or the view is dropped.
    pub fn view(&mut self, position: usize) -> Result<&Path, AppError> {
        let id = self
            .uploads
            .id_at(position)
            .ok_or_else(|| ValidationError::UnknownFile(format!("position {}", position)))?;
        self.close_view(id);
        let handle = self.uploads.view(id, self.viewer.as_ref())?;
        let handle = self.open_views.entry(id).or_insert(handle);

        handle
            .path()
            .ok_or_else(|| ValidationError::UnknownFile(format!("position {}", position)).into())
    }

    /// Number of temporary copies currently on disk.
    pub fn open_view_count(&self) -> usize {
        self.open_views.len()
    }

    pub fn close_views(&mut self) {
        for (_, handle) in self.open_views.drain() {
            revoke(handle);
        }
    }

    fn close_view(&mut self, id: FileId) {
        if let Some(handle) = self.open_views.remove(&id) {
            revoke(handle);
        }
    }
}

fn revoke(mut handle: PayloadHandle) {
    if let Err(e) = handle.revoke() {
        tracing::warn!(
            error = %e,
            name = handle.name(),
            "Failed to remove temporary view file"
        );
    }
}
