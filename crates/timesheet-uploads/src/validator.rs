use timesheet_core::models::extension_of;
use timesheet_core::{FileCandidate, ValidationError};

use std::time::Duration;

/// How many files an upload context may hold at once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capacity {
    /// Any number of files, in insertion order.
    Multiple,
    /// At most one file; a second one is refused until the first is removed.
    Single,
}

/// Simulated progress settings for a context.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickerConfig {
    pub interval: Duration,
    /// Upper bound of the random increment applied per tick, in percent.
    pub max_increment: f64,
}

/// Validation and lifecycle rules for one upload context.
#[derive(Debug, Clone)]
pub struct UploadPolicy {
    pub name: &'static str,
    pub allowed_extensions: Vec<String>,
    pub max_file_size: u64,
    pub reject_duplicates: bool,
    pub capacity: Capacity,
    pub ticker: TickerConfig,
}

pub const DEFAULT_MAX_FILE_SIZE: u64 = 10 * 1024 * 1024;

impl UploadPolicy {
    /// Generic attachments: PDF or Excel, many files, unique names.
    pub fn attachments(max_file_size: u64) -> Self {
        Self {
            name: "attachments",
            allowed_extensions: vec!["pdf".to_string(), "xlsx".to_string(), "xls".to_string()],
            max_file_size,
            reject_duplicates: true,
            capacity: Capacity::Multiple,
            ticker: TickerConfig {
                interval: Duration::from_millis(200),
                max_increment: 15.0,
            },
        }
    }

    /// Invoice source spreadsheet: Excel only, one file at a time.
    pub fn invoice_source(max_file_size: u64) -> Self {
        Self {
            name: "invoice",
            allowed_extensions: vec!["xlsx".to_string(), "xls".to_string()],
            max_file_size,
            reject_duplicates: false,
            capacity: Capacity::Single,
            ticker: TickerConfig {
                interval: Duration::from_millis(150),
                max_increment: 20.0,
            },
        }
    }

    fn max_size_label(&self) -> String {
        format!("{}MB", self.max_file_size / (1024 * 1024))
    }

    /// Message shown to the user when a file is refused in this context.
    pub fn rejection_message(&self, err: &ValidationError) -> String {
        match (self.capacity, err) {
            (Capacity::Multiple, ValidationError::InvalidExtension { .. })
            | (Capacity::Multiple, ValidationError::InvalidFilename(_)) => {
                "File type not supported. Please upload PDF or Excel files only.".to_string()
            }
            (Capacity::Multiple, ValidationError::FileTooLarge { .. }) => format!(
                "File size too large. Maximum size is {}.",
                self.max_size_label()
            ),
            (Capacity::Single, ValidationError::InvalidExtension { .. })
            | (Capacity::Single, ValidationError::InvalidFilename(_)) => {
                "Please upload only Excel files (.xlsx, .xls)".to_string()
            }
            (Capacity::Single, ValidationError::FileTooLarge { .. }) => {
                format!("File size must be less than {}", self.max_size_label())
            }
            (_, ValidationError::DuplicateFile(name)) => {
                format!("File \"{}\" already exists.", name)
            }
            (_, other) => other.to_string(),
        }
    }

    /// Message shown when a file finishes uploading in this context.
    pub fn completion_message(&self, file_name: &str) -> String {
        match self.capacity {
            Capacity::Single => "File uploaded successfully!".to_string(),
            Capacity::Multiple => format!("\"{}\" uploaded successfully!", file_name),
        }
    }
}

/// Stateless file checks for an upload context.
///
/// Collection-dependent rules (duplicates, slot occupancy) live in the queue.
pub struct FileValidator {
    max_file_size: u64,
    allowed_extensions: Vec<String>,
}

impl FileValidator {
    pub fn new(max_file_size: u64, allowed_extensions: Vec<String>) -> Self {
        Self {
            max_file_size,
            allowed_extensions: allowed_extensions
                .into_iter()
                .map(|e| e.trim_start_matches('.').to_lowercase())
                .collect(),
        }
    }

    pub fn for_policy(policy: &UploadPolicy) -> Self {
        Self::new(policy.max_file_size, policy.allowed_extensions.clone())
    }

    /// Validate file size
    pub fn validate_file_size(&self, size: u64) -> Result<(), ValidationError> {
        if size > self.max_file_size {
            return Err(ValidationError::FileTooLarge {
                size,
                max: self.max_file_size,
            });
        }

        Ok(())
    }

    /// Validate file extension (case-insensitive)
    pub fn validate_extension(&self, filename: &str) -> Result<(), ValidationError> {
        let extension = extension_of(filename)
            .ok_or_else(|| ValidationError::InvalidFilename(filename.to_string()))?;

        if !self.allowed_extensions.contains(&extension) {
            return Err(ValidationError::InvalidExtension {
                extension,
                allowed: self.allowed_extensions.clone(),
            });
        }

        Ok(())
    }

    /// Validate extension first, then size.
    pub fn validate_all(&self, candidate: &FileCandidate) -> Result<(), ValidationError> {
        self.validate_extension(&candidate.name)?;
        self.validate_file_size(candidate.size)?;
        Ok(())
    }
}
