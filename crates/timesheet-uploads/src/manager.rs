//! Upload manager: validation, progress tickers and notifications for one
//! upload context.
//!
//! A view owns one `UploadManager`. Dropping it (the view unmounting) drops
//! every ticker handle, which cancels the tasks so nothing mutates a
//! collection that is gone.

use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use bytes::Bytes;
use timesheet_core::models::content_type_for;
use timesheet_core::{
    AppError, FileCandidate, FileId, NotificationCenter, UploadedFile, ValidationError,
};

use crate::queue::{lock, SharedQueue, UploadQueue};
use crate::ticker::{self, ProgressStep, RandomStep, TickerHandle};
use crate::validator::{TickerConfig, UploadPolicy};
use crate::viewer::{PayloadHandle, Viewer};

type StepFactory = Box<dyn Fn(&TickerConfig) -> Box<dyn ProgressStep> + Send + Sync>;

pub struct UploadManager {
    policy: UploadPolicy,
    queue: SharedQueue,
    tickers: HashMap<FileId, TickerHandle>,
    notifications: NotificationCenter,
    step_factory: StepFactory,
}

impl UploadManager {
    pub fn new(policy: UploadPolicy, notifications: NotificationCenter) -> Self {
        Self {
            queue: Arc::new(Mutex::new(UploadQueue::new(policy.clone()))),
            policy,
            tickers: HashMap::new(),
            notifications,
            step_factory: Box::new(|config| Box::new(RandomStep::new(config.max_increment))),
        }
    }

    /// Replace the random increments, e.g. with a fixed step in tests.
    pub fn with_step_factory<F>(mut self, factory: F) -> Self
    where
        F: Fn(&TickerConfig) -> Box<dyn ProgressStep> + Send + Sync + 'static,
    {
        self.step_factory = Box::new(factory);
        self
    }

    pub fn policy(&self) -> &UploadPolicy {
        &self.policy
    }

    /// Validate a candidate and, if accepted, start its progress ticker.
    ///
    /// A rejection publishes an error notification and leaves the
    /// collection unchanged. Must be called from within a Tokio runtime.
    pub fn add(&mut self, candidate: FileCandidate) -> Result<FileId, ValidationError> {
        let name = candidate.name.clone();
        let size = candidate.size;

        let enqueued = lock(&self.queue).enqueue(candidate);
        let id = match enqueued {
            Ok(id) => id,
            Err(e) => return Err(self.reject(&name, e)),
        };

        tracing::info!(
            context = self.policy.name,
            file_id = %id,
            name = %name,
            size,
            "File accepted, upload started"
        );

        self.tickers.retain(|_, handle| !handle.is_finished());

        let notifications = self.notifications.clone();
        let policy = self.policy.clone();
        let handle = ticker::start(
            self.queue.clone(),
            id,
            self.policy.ticker.interval,
            (self.step_factory)(&self.policy.ticker),
            move |file| {
                notifications.success(policy.completion_message(&file.name));
            },
        );
        self.tickers.insert(id, handle);

        Ok(id)
    }

    /// Read a file from disk and [`add`](Self::add) it.
    ///
    /// The name and size are checked before the contents are read, so an
    /// oversized or disallowed file is never loaded into memory.
    pub async fn add_path(&mut self, path: impl AsRef<Path>) -> Result<FileId, AppError> {
        let path = path.as_ref();
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            let shown = path.display().to_string();
            let err = ValidationError::InvalidFilename(shown.clone());
            return Err(self.reject(&shown, err).into());
        };
        let name = name.to_string();

        let metadata = tokio::fs::metadata(path).await?;
        let candidate = FileCandidate {
            mime_type: content_type_for(&name).to_string(),
            size: metadata.len(),
            name: name.clone(),
            payload: Bytes::new(),
        };
        let checked = lock(&self.queue).validate(&candidate);
        if let Err(e) = checked {
            return Err(self.reject(&name, e).into());
        }

        let payload = tokio::fs::read(path).await?;
        Ok(self.add(FileCandidate::new(name, payload))?)
    }

    /// Log a rejection and publish its context-specific message.
    fn reject(&self, name: &str, err: ValidationError) -> ValidationError {
        tracing::warn!(context = self.policy.name, name, error = %err, "Rejected file");
        self.notifications.error(self.policy.rejection_message(&err));
        err
    }

    /// Remove a file and cancel its ticker. Returns the removed file.
    pub fn remove(&mut self, id: FileId) -> Option<UploadedFile> {
        if let Some(handle) = self.tickers.remove(&id) {
            handle.cancel();
        }
        let removed = lock(&self.queue).remove(id);
        if let Some(file) = &removed {
            tracing::info!(
                context = self.policy.name,
                file_id = %id,
                name = %file.name,
                "File removed"
            );
        }
        removed
    }

    /// Remove every file and cancel every ticker.
    pub fn clear(&mut self) {
        for (_, handle) in self.tickers.drain() {
            handle.cancel();
        }
        lock(&self.queue).clear();
    }

    /// Copy of the held files in insertion order.
    pub fn snapshot(&self) -> Vec<UploadedFile> {
        lock(&self.queue).files().to_vec()
    }

    pub fn get(&self, id: FileId) -> Option<UploadedFile> {
        lock(&self.queue).get(id).cloned()
    }

    /// The first completed file, the one an invoice is generated from.
    pub fn first_complete(&self) -> Option<UploadedFile> {
        lock(&self.queue).first_complete().cloned()
    }

    /// Look a file up by its position in [`snapshot`](Self::snapshot),
    /// starting at 1.
    pub fn id_at(&self, position: usize) -> Option<FileId> {
        let queue = lock(&self.queue);
        position
            .checked_sub(1)
            .and_then(|i| queue.files().get(i))
            .map(|f| f.id)
    }

    pub fn len(&self) -> usize {
        lock(&self.queue).len()
    }

    pub fn is_empty(&self) -> bool {
        lock(&self.queue).is_empty()
    }

    /// Wait until the file completes. `None` if it is removed first.
    pub async fn wait_until_complete(&self, id: FileId) -> Option<UploadedFile> {
        let poll = self.policy.ticker.interval.max(Duration::from_millis(10));
        loop {
            let current = lock(&self.queue).get(id).cloned();
            match current {
                Some(file) if file.is_complete() => return Some(file),
                Some(_) => tokio::time::sleep(poll).await,
                None => return None,
            }
        }
    }

    /// Write a held file to a temporary reference and hand it to `viewer`.
    ///
    /// The returned handle must be kept until the user is done viewing;
    /// dropping or revoking it deletes the temporary copy.
    pub fn view(&self, id: FileId, viewer: &dyn Viewer) -> Result<PayloadHandle, AppError> {
        let file = self
            .get(id)
            .ok_or_else(|| ValidationError::UnknownFile(id.to_string()))?;

        let handle = PayloadHandle::for_file(&file)?;
        if let Some(path) = handle.path() {
            viewer.open(path)?;
        }
        tracing::info!(file_id = %id, name = %file.name, "Opened file for viewing");
        Ok(handle)
    }
}
