//! Upload collection state.
//!
//! `UploadQueue` is the pure state machine behind both upload contexts: it
//! validates candidates against an [`UploadPolicy`], holds accepted files in
//! insertion order and applies progress increments. It knows nothing about
//! timers or notifications; see [`crate::manager`] for that.

use std::sync::{Arc, Mutex, MutexGuard};

use timesheet_core::{FileCandidate, FileId, ProgressUpdate, UploadedFile, ValidationError};

use crate::validator::{Capacity, FileValidator, UploadPolicy};

/// Queue shared between its owner and the progress tickers.
pub type SharedQueue = Arc<Mutex<UploadQueue>>;

/// Lock a shared queue. A poisoned lock is recovered; the queue has no
/// multi-step invariants a panicking holder could break halfway.
pub fn lock(queue: &Mutex<UploadQueue>) -> MutexGuard<'_, UploadQueue> {
    queue.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

pub struct UploadQueue {
    policy: UploadPolicy,
    validator: FileValidator,
    files: Vec<UploadedFile>,
}

impl UploadQueue {
    pub fn new(policy: UploadPolicy) -> Self {
        let validator = FileValidator::for_policy(&policy);
        Self {
            policy,
            validator,
            files: Vec::new(),
        }
    }

    pub fn policy(&self) -> &UploadPolicy {
        &self.policy
    }

    /// Check a candidate against the policy and the current contents.
    pub fn validate(&self, candidate: &FileCandidate) -> Result<(), ValidationError> {
        self.validator.validate_all(candidate)?;

        if self.policy.reject_duplicates && self.files.iter().any(|f| f.name == candidate.name) {
            return Err(ValidationError::DuplicateFile(candidate.name.clone()));
        }

        if self.policy.capacity == Capacity::Single {
            if let Some(held) = self.files.first() {
                return Err(ValidationError::SlotOccupied(held.name.clone()));
            }
        }

        Ok(())
    }

    /// Validate and append a candidate, returning the new file's id.
    pub fn enqueue(&mut self, candidate: FileCandidate) -> Result<FileId, ValidationError> {
        self.validate(&candidate)?;

        let id = FileId::generate();
        self.files.push(UploadedFile::new(id, candidate));
        Ok(id)
    }

    /// Apply one progress increment. `None` when the id is no longer held.
    pub fn advance(&mut self, id: FileId, increment: f64) -> Option<ProgressUpdate> {
        self.files
            .iter_mut()
            .find(|f| f.id == id)
            .map(|f| f.advance(increment))
    }

    pub fn remove(&mut self, id: FileId) -> Option<UploadedFile> {
        let index = self.files.iter().position(|f| f.id == id)?;
        Some(self.files.remove(index))
    }

    pub fn get(&self, id: FileId) -> Option<&UploadedFile> {
        self.files.iter().find(|f| f.id == id)
    }

    /// Files in insertion order.
    pub fn files(&self) -> &[UploadedFile] {
        &self.files
    }

    /// The first file that has finished uploading, if any.
    pub fn first_complete(&self) -> Option<&UploadedFile> {
        self.files.iter().find(|f| f.is_complete())
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn clear(&mut self) -> Vec<UploadedFile> {
        std::mem::take(&mut self.files)
    }
}
