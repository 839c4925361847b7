//! Multipart form helpers for local files.

use std::path::Path;

use assured_domain::MultipartForm;

/// Error raised when a file cannot be attached.
#[derive(Debug, thiserror::Error)]
#[error("Failed to read {path}: {source}")]
pub struct UploadError {
    /// File that could not be read.
    pub path: String,
    /// Underlying I/O error.
    #[source]
    pub source: std::io::Error,
}

/// Reads a file and appends it to `form` under `field`.
///
/// The part's file name is the path's last component and its content type
/// is guessed from the extension.
///
/// # Errors
///
/// Returns [`UploadError`] if the file cannot be read.
pub async fn attach_file(
    form: MultipartForm,
    field: &str,
    path: &Path,
) -> Result<MultipartForm, UploadError> {
    let content = tokio::fs::read(path).await.map_err(|source| UploadError {
        path: path.display().to_string(),
        source,
    })?;

    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("file")
        .to_string();
    let content_type = mime_guess::from_path(path)
        .first()
        .unwrap_or(mime::APPLICATION_OCTET_STREAM)
        .to_string();

    Ok(form.file(field, file_name, content_type, content))
}
