//! Filesystem capability used by the page assembler and the downloader.

use std::io;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::debug;

/// Check whether anything exists at `path`
pub async fn exists(path: &Path) -> io::Result<bool> {
    fs::try_exists(path).await
}

/// Create a single directory. The parent must already exist.
pub async fn create_dir(path: &Path) -> io::Result<()> {
    fs::create_dir(path).await?;
    debug!("Created directory: {}", path.display());
    Ok(())
}

/// Write `contents` to `path` without exposing a partially written file.
///
/// The bytes go to a hidden sibling file first, which is then renamed over
/// the target. The temporary file is removed if either step fails.
pub async fn write_atomic(path: &Path, contents: &[u8]) -> io::Result<()> {
    let tmp_path = temp_path_for(path)?;

    let written = match fs::write(&tmp_path, contents).await {
        Ok(()) => fs::rename(&tmp_path, path).await,
        Err(e) => Err(e),
    };

    if let Err(e) = written {
        let _ = fs::remove_file(&tmp_path).await;
        return Err(e);
    }

    debug!("Wrote {} bytes to {}", contents.len(), path.display());
    Ok(())
}

fn temp_path_for(path: &Path) -> io::Result<PathBuf> {
    let parent = path.parent().ok_or_else(|| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("no parent directory for {}", path.display()),
        )
    })?;

    Ok(parent.join(format!(".{}.part", uuid::Uuid::new_v4())))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_write_atomic_leaves_only_target() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("page.html");

        write_atomic(&target, b"<html></html>").await.unwrap();

        assert_eq!(std::fs::read(&target).unwrap(), b"<html></html>");
        let entries: Vec<_> = std::fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(entries.len(), 1);
    }

    #[tokio::test]
    async fn test_write_atomic_replaces_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("a.css");
        std::fs::write(&target, "old").unwrap();

        write_atomic(&target, b"new").await.unwrap();

        assert_eq!(std::fs::read_to_string(&target).unwrap(), "new");
    }

    #[tokio::test]
    async fn test_write_atomic_into_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("missing").join("a.js");

        assert!(write_atomic(&target, b"x").await.is_err());
        assert!(!exists(&target).await.unwrap());
    }

    #[tokio::test]
    async fn test_failed_write_leaves_no_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        // a directory in the way makes the final step fail after the temp file exists
        let target = dir.path().join("photo.png");
        std::fs::create_dir(&target).unwrap();
        std::fs::write(target.join("keep"), "x").unwrap();

        assert!(write_atomic(&target, b"png").await.is_err());

        let names: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["photo.png"]);
    }

    #[tokio::test]
    async fn test_create_dir_refuses_existing() {
        let dir = tempfile::tempdir().unwrap();
        let assets = dir.path().join("assets");

        create_dir(&assets).await.unwrap();
        assert!(exists(&assets).await.unwrap());
        assert!(create_dir(&assets).await.is_err());
    }
}
