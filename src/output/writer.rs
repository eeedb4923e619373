//! Incremental file writes.
//!
//! A file is initialized with its header only when it is missing or empty,
//! every other write appends. Repeated calls never clobber content that is
//! already there, so an artifact can be grown across many calls (or runs).
//!
//! There is no locking: one writer per file is assumed.

use std::io::ErrorKind;
use std::path::Path;

use tokio::fs::{self, OpenOptions};
use tokio::io::AsyncWriteExt;

use super::OutputError;

/// Create parent directories and write `header` unless the file has content
///
/// Returns `true` if the header was written.
pub async fn ensure_initialized(path: &Path, header: &str) -> Result<bool, OutputError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .await
            .map_err(|e| OutputError::io(parent, e))?;
    }

    match fs::metadata(path).await {
        Ok(metadata) if metadata.len() != 0 => return Ok(false),
        Ok(_) => {}
        Err(e) if e.kind() == ErrorKind::NotFound => {}
        Err(e) => return Err(OutputError::io(path, e)),
    }

    fs::write(path, header)
        .await
        .map_err(|e| OutputError::io(path, e))?;

    Ok(true)
}

/// Append `content` to the file, creating it if needed
pub async fn append(path: &Path, content: &str) -> Result<(), OutputError> {
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .await
        .map_err(|e| OutputError::io(path, e))?;

    file.write_all(content.as_bytes())
        .await
        .map_err(|e| OutputError::io(path, e))?;
    file.flush().await.map_err(|e| OutputError::io(path, e))?;

    Ok(())
}

/// Delete a stale artifact; a missing file is fine
///
/// Returns `true` if something was removed.
pub async fn remove_stale(path: &Path) -> Result<bool, OutputError> {
    match fs::remove_file(path).await {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == ErrorKind::NotFound => {
            tracing::debug!("No stale artifact at {}", path.display());
            Ok(false)
        }
        Err(e) => Err(OutputError::io(path, e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_initialize_creates_parents() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("a/b/list.m3u");

        assert!(ensure_initialized(&path, "#EXTM3U\n").await.unwrap());
        assert_eq!(fs::read_to_string(&path).await.unwrap(), "#EXTM3U\n");
    }

    #[tokio::test]
    async fn test_initialize_keeps_existing_content() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("list.m3u");

        ensure_initialized(&path, "#EXTM3U\n").await.unwrap();
        append(&path, "#EXTINF:0,A\na.mp4\n").await.unwrap();

        // Second initialization must not truncate
        assert!(!ensure_initialized(&path, "#EXTM3U\n").await.unwrap());
        assert_eq!(
            fs::read_to_string(&path).await.unwrap(),
            "#EXTM3U\n#EXTINF:0,A\na.mp4\n"
        );
    }

    #[tokio::test]
    async fn test_initialize_fills_empty_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("list.m3u");
        fs::write(&path, "").await.unwrap();

        assert!(ensure_initialized(&path, "header").await.unwrap());
        assert_eq!(fs::read_to_string(&path).await.unwrap(), "header");
    }

    #[tokio::test]
    async fn test_remove_stale_missing_is_ok() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("gone.html");

        assert!(!remove_stale(&path).await.unwrap());

        fs::write(&path, "x").await.unwrap();
        assert!(remove_stale(&path).await.unwrap());
        assert!(!path.exists());
    }
}
