use std::fmt;
use std::path::Path;

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identifier of a file held by an upload collection.
///
/// Backed by a UUIDv7: a millisecond timestamp followed by random bits, so two
/// files added within the same millisecond still get distinct ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FileId(Uuid);

impl FileId {
    pub fn generate() -> Self {
        Self(Uuid::now_v7())
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl fmt::Display for FileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Broad file category, used for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileKind {
    Pdf,
    Spreadsheet,
    Other,
}

impl FileKind {
    pub fn from_name(name: &str) -> Self {
        match extension_of(name).as_deref() {
            Some("pdf") => FileKind::Pdf,
            Some("xlsx") | Some("xls") | Some("csv") => FileKind::Spreadsheet,
            _ => FileKind::Other,
        }
    }
}

/// Lower-cased extension of a file name, without the dot.
pub fn extension_of(name: &str) -> Option<String> {
    Path::new(name)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
}

/// Expected MIME type for the extensions this client deals with.
pub fn content_type_for(name: &str) -> &'static str {
    match extension_of(name).as_deref() {
        Some("pdf") => "application/pdf",
        Some("xls") => "application/vnd.ms-excel",
        Some("xlsx") => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        Some("csv") => "text/csv",
        Some("txt") => "text/plain",
        _ => "application/octet-stream",
    }
}

/// Human-readable size: "0 Bytes", "512 Bytes", "1.5 KB", "10 MB".
pub fn format_file_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];

    if bytes == 0 {
        return "0 Bytes".to_string();
    }

    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }

    let rounded = format!("{:.2}", value);
    let trimmed = rounded.trim_end_matches('0').trim_end_matches('.');
    format!("{} {}", trimmed, UNITS[unit])
}

/// A file the user picked or dropped, before validation.
#[derive(Debug, Clone)]
pub struct FileCandidate {
    pub name: String,
    pub size: u64,
    pub mime_type: String,
    pub payload: Bytes,
}

impl FileCandidate {
    pub fn new(name: impl Into<String>, payload: impl Into<Bytes>) -> Self {
        let name = name.into();
        let payload = payload.into();
        Self {
            mime_type: content_type_for(&name).to_string(),
            size: payload.len() as u64,
            name,
            payload,
        }
    }

    pub fn with_mime_type(mut self, mime_type: impl Into<String>) -> Self {
        self.mime_type = mime_type.into();
        self
    }
}

/// Result of advancing a file's simulated progress.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ProgressUpdate {
    Progressed(f64),
    Completed,
    AlreadyComplete,
}

/// Lifecycle state of a file inside a collection.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum UploadState {
    Uploading { progress: f64 },
    Complete,
}

/// A file accepted into an upload collection.
///
/// Invariant: `progress == 100.0` exactly when `is_complete`, and progress
/// never decreases.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadedFile {
    pub id: FileId,
    #[serde(skip)]
    pub payload: Bytes,
    pub name: String,
    pub size: u64,
    pub mime_type: String,
    progress: f64,
    is_complete: bool,
}

impl UploadedFile {
    pub fn new(id: FileId, candidate: FileCandidate) -> Self {
        Self {
            id,
            payload: candidate.payload,
            name: candidate.name,
            size: candidate.size,
            mime_type: candidate.mime_type,
            progress: 0.0,
            is_complete: false,
        }
    }

    pub fn progress(&self) -> f64 {
        self.progress
    }

    pub fn is_complete(&self) -> bool {
        self.is_complete
    }

    pub fn kind(&self) -> FileKind {
        FileKind::from_name(&self.name)
    }

    pub fn state(&self) -> UploadState {
        if self.is_complete {
            UploadState::Complete
        } else {
            UploadState::Uploading {
                progress: self.progress,
            }
        }
    }

    /// Move progress forward by `increment` percent, completing at 100.
    ///
    /// Negative or non-finite increments are treated as zero.
    pub fn advance(&mut self, increment: f64) -> ProgressUpdate {
        if self.is_complete {
            return ProgressUpdate::AlreadyComplete;
        }

        let increment = if increment.is_finite() {
            increment.max(0.0)
        } else {
            0.0
        };

        let next = self.progress + increment;
        if next >= 100.0 {
            self.progress = 100.0;
            self.is_complete = true;
            ProgressUpdate::Completed
        } else {
            self.progress = next;
            ProgressUpdate::Progressed(next)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(name: &str) -> UploadedFile {
        UploadedFile::new(FileId::generate(), FileCandidate::new(name, vec![0u8; 16]))
    }

    #[test]
    fn test_format_file_size() {
        assert_eq!(format_file_size(0), "0 Bytes");
        assert_eq!(format_file_size(512), "512 Bytes");
        assert_eq!(format_file_size(1024), "1 KB");
        assert_eq!(format_file_size(1536), "1.5 KB");
        assert_eq!(format_file_size(10 * 1024 * 1024), "10 MB");
        assert_eq!(format_file_size(1_234_567), "1.18 MB");
        assert_eq!(format_file_size(3 * 1024 * 1024 * 1024), "3 GB");
    }

    #[test]
    fn test_candidate_derives_size_and_mime_type() {
        let candidate = FileCandidate::new("Hours.XLSX", vec![1u8; 42]);
        assert_eq!(candidate.size, 42);
        assert_eq!(
            candidate.mime_type,
            "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
        );
        assert_eq!(
            FileCandidate::new("notes", Vec::new()).mime_type,
            "application/octet-stream"
        );
    }

    #[test]
    fn test_file_kind() {
        assert_eq!(FileKind::from_name("invoice.PDF"), FileKind::Pdf);
        assert_eq!(FileKind::from_name("march.xls"), FileKind::Spreadsheet);
        assert_eq!(FileKind::from_name("readme"), FileKind::Other);
    }

    #[test]
    fn test_file_ids_are_unique() {
        let a = FileId::generate();
        let b = FileId::generate();
        assert_ne!(a, b);
    }

    #[test]
    fn test_advance_completes_exactly_once() {
        let mut f = file("a.pdf");
        assert_eq!(f.advance(40.0), ProgressUpdate::Progressed(40.0));
        assert_eq!(f.advance(59.0), ProgressUpdate::Progressed(99.0));
        assert!(!f.is_complete());
        assert_eq!(f.advance(15.0), ProgressUpdate::Completed);
        assert_eq!(f.progress(), 100.0);
        assert!(f.is_complete());
        assert_eq!(f.advance(15.0), ProgressUpdate::AlreadyComplete);
        assert_eq!(f.progress(), 100.0);
    }

    #[test]
    fn test_advance_never_decreases() {
        let mut f = file("a.pdf");
        f.advance(10.0);
        assert_eq!(f.advance(-5.0), ProgressUpdate::Progressed(10.0));
        assert_eq!(f.advance(f64::NAN), ProgressUpdate::Progressed(10.0));
        assert_eq!(f.progress(), 10.0);
    }

    #[test]
    fn test_state_tracks_completion() {
        let mut f = file("a.xlsx");
        assert_eq!(f.state(), UploadState::Uploading { progress: 0.0 });
        f.advance(100.0);
        assert_eq!(f.state(), UploadState::Complete);
    }
}
