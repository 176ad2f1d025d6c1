//! Validation modules

pub mod timesheet;

pub use timesheet::validate_entry;

/// Client-side validation failures for uploads and form input.
///
/// These block the attempted action only; the user corrects the input and
/// tries again.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("File too large: {size} bytes (max: {max} bytes)")]
    FileTooLarge { size: u64, max: u64 },

    #[error("Invalid file extension: {extension} (allowed: {allowed:?})")]
    InvalidExtension {
        extension: String,
        allowed: Vec<String>,
    },

    #[error("Invalid filename: {0}")]
    InvalidFilename(String),

    #[error("File \"{0}\" already exists")]
    DuplicateFile(String),

    #[error("An upload is already in progress for \"{0}\"; remove it first")]
    SlotOccupied(String),

    #[error("No file at {0}")]
    UnknownFile(String),

    #[error("A request is already in progress")]
    RequestInFlight,

    #[error("No completed upload available")]
    NoCompletedUpload,

    #[error("{0} is required")]
    MissingField(&'static str),

    #[error("Invalid {field}: {value}")]
    InvalidField { field: &'static str, value: String },

    #[error("{0} is calculated and cannot be set directly")]
    ReadOnlyField(&'static str),

    #[error("Unknown field: {0}")]
    UnknownField(String),
}
