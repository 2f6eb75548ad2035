//! Multipart upload intake.
//!
//! Reads the single `image` field out of a multipart request, validates its
//! MIME type, and persists the bytes under a generated name in the upload
//! directory. The returned [`TempUpload`] owns the file on disk for the rest
//! of the request.

use axum::extract::Multipart;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::ApiError;

/// A temp file exclusively owned by one in-flight request.
///
/// Removal is idempotent and best-effort: removing twice, or removing a file
/// that is already gone, never surfaces an error. `Drop` removes the file if
/// no explicit removal happened, so an unexpected exit from the handler still
/// leaves no file behind.
#[derive(Debug)]
pub struct TempUpload {
    path: Option<PathBuf>,
}

impl TempUpload {
    pub fn path(&self) -> &Path {
        self.path
            .as_deref()
            .expect("TempUpload used after removal")
    }

    /// Delete the file from disk. Safe to call more than once.
    pub fn remove(&mut self) {
        if let Some(path) = self.path.take() {
            match std::fs::remove_file(&path) {
                Ok(()) => debug!("Removed temp upload: {:?}", path),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => warn!("Failed to remove temp upload {:?}: {}", path, e),
            }
        }
    }
}

impl Drop for TempUpload {
    fn drop(&mut self) {
        self.remove();
    }
}

/// Pull the `image` field out of the request and persist it.
///
/// Fails before anything touches the disk, so a rejected request never
/// creates a temp file.
pub async fn receive_image(
    multipart: &mut Multipart,
    upload_dir: &Path,
) -> Result<TempUpload, ApiError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::Unexpected(anyhow::anyhow!("Multipart error: {}", e)))?
    {
        if field.name() != Some("image") {
            continue;
        }

        let mime_type = field.content_type().unwrap_or_default().to_string();
        if !mime_type.starts_with("image/") {
            return Err(ApiError::InvalidFileType);
        }

        let data = field
            .bytes()
            .await
            .map_err(|e| ApiError::Unexpected(anyhow::anyhow!("Failed to read upload: {}", e)))?;

        tokio::fs::create_dir_all(upload_dir)
            .await
            .map_err(|e| ApiError::Unexpected(e.into()))?;

        let path = upload_dir.join(Uuid::new_v4().to_string());
        tokio::fs::write(&path, &data)
            .await
            .map_err(|e| ApiError::Unexpected(e.into()))?;

        info!(
            "Received upload: {:?} ({} bytes, {})",
            path,
            data.len(),
            mime_type
        );

        return Ok(TempUpload { path: Some(path) });
    }

    Err(ApiError::MissingFile)
}
