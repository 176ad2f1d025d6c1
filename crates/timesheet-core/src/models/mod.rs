//! Domain models: timesheet entries, uploaded files and login credentials.

pub mod credentials;
pub mod timesheet;
pub mod upload;

pub use credentials::Credentials;
pub use timesheet::{TimesheetEntry, TimesheetField};
pub use upload::{
    content_type_for, extension_of, format_file_size, FileCandidate, FileId, FileKind,
    ProgressUpdate, UploadState, UploadedFile,
};
