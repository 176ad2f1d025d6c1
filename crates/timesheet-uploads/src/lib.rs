//! Timesheet Uploads
//!
//! Client-side handling of user-selected files: per-context validation rules,
//! the upload collection state machine, simulated progress and temporary
//! references for viewing payloads.

pub mod manager;
pub mod queue;
pub mod ticker;
pub mod validator;
pub mod viewer;

pub use manager::UploadManager;
pub use queue::{SharedQueue, UploadQueue};
pub use ticker::{FixedStep, ProgressStep, RandomStep, TickerHandle};
pub use validator::{Capacity, FileValidator, TickerConfig, UploadPolicy, DEFAULT_MAX_FILE_SIZE};
pub use viewer::{PayloadHandle, SystemViewer, Viewer};
