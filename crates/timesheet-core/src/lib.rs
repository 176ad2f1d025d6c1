//! Timesheet Core Library
//!
//! This crate provides the domain models, error types, configuration and the
//! client-side rules (duration calculation, form validation, login gate,
//! notifications) shared by every timesheet client component.

pub mod auth;
pub mod config;
pub mod error;
pub mod hours;
pub mod models;
pub mod notifications;
pub mod validation;

// Re-export commonly used types
pub use auth::{AuthError, Authenticator, StaticAuthenticator};
pub use config::ClientConfig;
pub use error::{AppError, ErrorMetadata, LogLevel};
pub use hours::compute_hours;
pub use models::{
    format_file_size, Credentials, FileCandidate, FileId, FileKind, ProgressUpdate,
    TimesheetEntry, TimesheetField, UploadState, UploadedFile,
};
pub use notifications::{
    Notification, NotificationCenter, NotificationEvent, NotificationKind, NotificationPhase,
    NotificationTiming,
};
pub use validation::ValidationError;
