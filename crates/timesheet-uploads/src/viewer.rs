//! Revocable references to file payloads.
//!
//! Viewing a held file writes its bytes to a named temporary file carrying
//! the original extension, so the platform opener picks the right program.
//! The temporary file lives as long as the [`PayloadHandle`].

use std::io::{self, Write};
use std::path::Path;
use std::process::{Command, ExitStatus};
use std::thread::JoinHandle;

use tempfile::NamedTempFile;
use timesheet_core::models::extension_of;
use timesheet_core::UploadedFile;

/// Temporary on-disk copy of a payload. Deleted on [`PayloadHandle::revoke`]
/// or drop.
#[derive(Debug)]
pub struct PayloadHandle {
    name: String,
    file: Option<NamedTempFile>,
}

impl PayloadHandle {
    pub fn create(name: &str, payload: &[u8]) -> io::Result<Self> {
        let suffix = extension_of(name)
            .map(|ext| format!(".{}", ext))
            .unwrap_or_default();

        let mut file = tempfile::Builder::new()
            .prefix("timesheet-view-")
            .suffix(&suffix)
            .tempfile()?;
        file.write_all(payload)?;
        file.flush()?;

        tracing::debug!(name, path = %file.path().display(), "Created payload reference");

        Ok(Self {
            name: name.to_string(),
            file: Some(file),
        })
    }

    pub fn for_file(file: &UploadedFile) -> io::Result<Self> {
        Self::create(&file.name, &file.payload)
    }

    /// Original file name the reference was created for.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Path of the temporary copy, `None` once revoked.
    pub fn path(&self) -> Option<&Path> {
        self.file.as_ref().map(|f| f.path())
    }

    pub fn is_revoked(&self) -> bool {
        self.file.is_none()
    }

    /// Delete the temporary copy. Revoking twice is a no-op.
    pub fn revoke(&mut self) -> io::Result<()> {
        match self.file.take() {
            Some(file) => {
                tracing::debug!(name = %self.name, "Revoking payload reference");
                file.close()
            }
            None => Ok(()),
        }
    }
}

/// Something that can present a file on disk to the user.
pub trait Viewer: Send + Sync {
    fn open(&self, path: &Path) -> io::Result<()>;
}

/// Opens files with the platform's default application.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemViewer;

impl Viewer for SystemViewer {
    fn open(&self, path: &Path) -> io::Result<()> {
        let mut command = if cfg!(target_os = "macos") {
            Command::new("open")
        } else if cfg!(target_os = "windows") {
            let mut c = Command::new("cmd");
            c.args(["/C", "start", ""]);
            c
        } else {
            Command::new("xdg-open")
        };

        command.arg(path);
        spawn_reaped(command).map(|_| ())
    }
}

/// Start `command` without blocking and wait for it on a background thread,
/// so the finished process is reaped instead of lingering as a zombie.
pub fn spawn_reaped(mut command: Command) -> io::Result<JoinHandle<io::Result<ExitStatus>>> {
    let mut child = command.spawn()?;
    let pid = child.id();
    let waiter = std::thread::Builder::new()
        .name("viewer-reaper".to_string())
        .spawn(move || {
            let status = child.wait();
            if let Err(e) = &status {
                tracing::warn!(pid, error = %e, "Failed to wait for viewer process");
            }
            status
        })?;
    Ok(waiter)
}
