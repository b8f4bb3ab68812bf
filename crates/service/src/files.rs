//! Upload-directory file handling for image attachments.

use std::path::Path;

use tracing::warn;
use uuid::Uuid;

use crate::errors::ServiceError;

/// Generated unique name for an embedded image written to disk.
pub fn generated_filename(format: &str) -> String {
    let ext: String = format
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .take(8)
        .collect();
    let ext = if ext.is_empty() { "bin".to_string() } else { ext };
    format!("{}.{}", Uuid::new_v4(), ext)
}

/// Reduce a client-supplied filename to a safe basename. Path components are
/// dropped and anything outside `[A-Za-z0-9._-]` becomes `_`. Returns `None`
/// when nothing usable remains.
pub fn sanitize_filename(name: &str) -> Option<String> {
    let base = name.rsplit(['/', '\\']).next().unwrap_or("");
    let cleaned: String = base
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') { c } else { '_' })
        .collect();
    let cleaned = cleaned.trim_matches('.').to_string();
    if cleaned.is_empty() || cleaned.chars().all(|c| c == '_') {
        None
    } else {
        Some(cleaned)
    }
}

/// Write image bytes under the uploads directory.
pub async fn store(uploads_dir: &Path, filename: &str, bytes: &[u8]) -> Result<(), ServiceError> {
    tokio::fs::create_dir_all(uploads_dir)
        .await
        .map_err(|e| ServiceError::Io(e.to_string()))?;
    tokio::fs::write(uploads_dir.join(filename), bytes)
        .await
        .map_err(|e| ServiceError::Io(e.to_string()))
}

/// Best-effort file removal. A missing file is logged, never an error.
/// Returns whether a file was actually deleted.
pub async fn remove(uploads_dir: &Path, filename: &str) -> bool {
    let path = uploads_dir.join(filename);
    match tokio::fs::remove_file(&path).await {
        Ok(()) => true,
        Err(e) => {
            warn!(file = %path.display(), error = %e, "could not remove image file");
            false
        }
    }
}
