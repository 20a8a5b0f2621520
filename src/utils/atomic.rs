//! Atomic file write operations.
//!
//! Collection files and media assets are always replaced whole; a reader
//! must never observe a partially written file.

use std::io;
use std::path::Path;
use tempfile::NamedTempFile;

/// Write bytes to a file atomically using a temporary file.
///
/// The temp file is created in the same directory as the target (required
/// for an atomic rename), filled, flushed, and then renamed over the
/// target. If any step fails the temp file is cleaned up and the target
/// is left untouched.
///
/// # Errors
///
/// Returns an `io::Error` if the parent directory cannot be determined,
/// the temp file cannot be created or written, or the rename fails.
pub async fn atomic_write(path: &Path, content: &[u8]) -> io::Result<()> {
    let parent = path
        .parent()
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "Path has no parent directory"))?
        .to_path_buf();
    let target_path = path.to_path_buf();
    let content_owned = content.to_vec();

    // Run synchronous tempfile operations in a blocking task
    tokio::task::spawn_blocking(move || -> io::Result<()> {
        use std::io::Write as _;

        let mut temp_file = NamedTempFile::new_in(&parent)?;
        temp_file.write_all(&content_owned)?;
        temp_file.flush()?;

        // Renaming consumes the NamedTempFile, preventing auto-deletion
        temp_file.persist(&target_path)?;

        Ok(())
    })
    .await
    .map_err(io::Error::other)?
}
