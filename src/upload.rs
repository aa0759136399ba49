//! Transient upload storage
//!
//! Uploaded bytes are persisted under the upload directory for the duration
//! of one file's processing and removed unconditionally afterwards. Paths
//! are keyed by a per-request token so concurrent requests uploading the
//! same filename cannot collide.

use std::path::{Path, PathBuf};

/// Reduce an uploaded filename to a safe basename. Path components and
/// traversal sequences are stripped; anything outside `[A-Za-z0-9._-]`
/// becomes `_`.
pub fn sanitize_filename(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or(name);

    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect();

    let trimmed = cleaned.trim_matches('.');
    if trimmed.is_empty() {
        "upload".to_string()
    } else {
        trimmed.to_string()
    }
}

/// A saved upload that removes itself when dropped, on error paths included.
#[derive(Debug)]
pub struct TempUpload {
    path: PathBuf,
}

impl TempUpload {
    /// Persist `bytes` under `dir` as `<request_token>_<sanitized name>`.
    pub fn save(
        dir: &Path,
        request_token: &str,
        filename: &str,
        bytes: &[u8],
    ) -> std::io::Result<Self> {
        let path = dir.join(format!("{}_{}", request_token, sanitize_filename(filename)));
        std::fs::write(&path, bytes)?;
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for TempUpload {
    fn drop(&mut self) {
        if let Err(e) = std::fs::remove_file(&self.path) {
            tracing::warn!(
                "Failed to remove temp upload {}: {}",
                self.path.display(),
                e
            );
        }
    }
}
