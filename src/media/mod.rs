//! Media storage collaborator: store bytes under a key, get a public URL.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use thiserror::Error;
use tokio::fs;
use tracing::info;

use crate::utils::{atomic_write, short_hash};

/// Upload size cap for images.
pub const MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;
/// Upload size cap for PDFs.
pub const MAX_PDF_BYTES: usize = 10 * 1024 * 1024;

const IMAGE_TYPES: &[(&str, &str)] = &[
    ("image/jpeg", "jpg"),
    ("image/png", "png"),
    ("image/webp", "webp"),
    ("image/gif", "gif"),
];

#[derive(Error, Debug)]
pub enum MediaError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("No file provided")]
    Empty,

    #[error("Invalid file type '{0}'")]
    UnsupportedType(String),

    #[error("File size exceeds {0} MB limit")]
    TooLarge(usize),
}

/// Result of storing a media asset.
#[derive(Debug, Clone)]
pub struct StoredMedia {
    pub url: String,
    pub asset_id: String,
}

/// Object-storage collaborator.
#[async_trait]
pub trait MediaStorage: Send + Sync {
    async fn store(
        &self,
        folder: &str,
        content_type: &str,
        bytes: &[u8],
    ) -> Result<StoredMedia, MediaError>;
}

/// Map an image content type to its file extension.
#[must_use]
pub fn image_extension(content_type: &str) -> Option<&'static str> {
    IMAGE_TYPES
        .iter()
        .find(|(ty, _)| *ty == content_type)
        .map(|(_, ext)| *ext)
}

/// Check an image upload: allowed type, non-empty, under the size cap.
pub fn validate_image(content_type: &str, len: usize) -> Result<(), MediaError> {
    if image_extension(content_type).is_none() {
        return Err(MediaError::UnsupportedType(content_type.to_string()));
    }
    if len == 0 {
        return Err(MediaError::Empty);
    }
    if len > MAX_IMAGE_BYTES {
        return Err(MediaError::TooLarge(MAX_IMAGE_BYTES / (1024 * 1024)));
    }
    Ok(())
}

/// Check a PDF upload: PDF only, non-empty, under the size cap.
pub fn validate_pdf(content_type: &str, len: usize) -> Result<(), MediaError> {
    if content_type != "application/pdf" {
        return Err(MediaError::UnsupportedType(content_type.to_string()));
    }
    if len == 0 {
        return Err(MediaError::Empty);
    }
    if len > MAX_PDF_BYTES {
        return Err(MediaError::TooLarge(MAX_PDF_BYTES / (1024 * 1024)));
    }
    Ok(())
}

fn extension_for(content_type: &str) -> &'static str {
    if content_type == "application/pdf" {
        return "pdf";
    }
    image_extension(content_type).unwrap_or("bin")
}

/// Keep folder names path-safe.
fn sanitize_folder(folder: &str) -> String {
    let cleaned: String = folder
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c.to_ascii_lowercase()
            } else {
                '-'
            }
        })
        .collect();
    let trimmed = cleaned.trim_matches('-');
    if trimmed.is_empty() {
        "portfolio".to_string()
    } else {
        trimmed.to_string()
    }
}

/// Media storage on the local filesystem, served under a public base path.
///
/// Files are content-addressed, so re-uploading identical bytes yields
/// the same URL instead of a duplicate file.
pub struct LocalMediaStore {
    root: PathBuf,
    public_base: String,
}

impl LocalMediaStore {
    #[must_use]
    pub fn new(root: &Path, public_base: &str) -> Self {
        Self {
            root: root.to_path_buf(),
            public_base: public_base.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl MediaStorage for LocalMediaStore {
    async fn store(
        &self,
        folder: &str,
        content_type: &str,
        bytes: &[u8],
    ) -> Result<StoredMedia, MediaError> {
        if bytes.is_empty() {
            return Err(MediaError::Empty);
        }
        let folder = sanitize_folder(folder);
        let asset_id = short_hash(bytes);
        let filename = format!("{asset_id}.{}", extension_for(content_type));

        let dir = self.root.join(&folder);
        fs::create_dir_all(&dir).await?;
        atomic_write(&dir.join(&filename), bytes).await?;

        let url = format!("{}/{folder}/{filename}", self.public_base);
        info!(%url, size = bytes.len(), "Stored media asset");
        Ok(StoredMedia { url, asset_id })
    }
}
