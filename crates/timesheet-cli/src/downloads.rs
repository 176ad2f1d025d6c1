//! Saving server responses to the download directory.

use std::path::{Path, PathBuf};

use timesheet_core::AppError;

const MAX_FILENAME_LENGTH: usize = 255;

/// Reduce a suggested file name to a safe single path component.
///
/// Directory parts are dropped and anything outside `[A-Za-z0-9._-]` and
/// spaces becomes `_`. Names that end up empty or made only of dots fall
/// back to `fallback`.
pub fn sanitize_filename(filename: &str, fallback: &str) -> String {
    let filename_only = filename
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(filename)
        .trim();

    let sanitized: String = filename_only
        .chars()
        .take(MAX_FILENAME_LENGTH)
        .map(|c| {
            if c.is_alphanumeric() || matches!(c, '.' | '-' | '_' | ' ') {
                c
            } else {
                '_'
            }
        })
        .collect();

    if sanitized.trim_matches('.').trim().is_empty() {
        return fallback.to_string();
    }

    sanitized
}

/// Write `bytes` into `dir` under a sanitized `filename`, creating `dir` if
/// needed. An existing file of the same name is overwritten.
pub async fn save_download(
    dir: &Path,
    filename: &str,
    fallback: &str,
    bytes: &[u8],
) -> Result<PathBuf, AppError> {
    tokio::fs::create_dir_all(dir).await?;

    let path = dir.join(sanitize_filename(filename, fallback));
    tokio::fs::write(&path, bytes).await?;

    tracing::info!(path = %path.display(), bytes = bytes.len(), "Saved download");
    Ok(path)
}
