//! Removal of temporary entries.
//!
//! Handles delete through the [`Deleter`] capability; [`PlatformDeleter`] is the
//! implementation for the host platform and is what [`TempFile::cleanup`](crate::TempFile::cleanup)
//! and [`TempDir::cleanup`](crate::TempDir::cleanup) use.

use std::future::Future;
use std::io;
use std::path::Path;

/// Removes files and directory trees.
pub trait Deleter {
    /// Removes a single file.
    fn remove_file(&self, path: &Path) -> impl Future<Output = io::Result<()>> + Send;

    /// Removes a directory and everything below it.
    fn remove_tree(&self, path: &Path) -> impl Future<Output = io::Result<()>> + Send;
}

/// Deletes through the native removal calls.
#[derive(Debug, Default, Copy, Clone)]
pub struct PosixDeleter;

impl Deleter for PosixDeleter {
    async fn remove_file(&self, path: &Path) -> io::Result<()> {
        tokio::fs::remove_file(path).await
    }

    async fn remove_tree(&self, path: &Path) -> io::Result<()> {
        tokio::fs::remove_dir_all(path).await
    }
}

/// Deletes through the native removal calls after clearing read-only attributes,
/// which would otherwise make removal fail with permission denied.
#[derive(Debug, Default, Copy, Clone)]
pub struct WindowsDeleter;

impl Deleter for WindowsDeleter {
    async fn remove_file(&self, path: &Path) -> io::Result<()> {
        clear_readonly(path).await?;
        tokio::fs::remove_file(path).await
    }

    async fn remove_tree(&self, path: &Path) -> io::Result<()> {
        match tokio::fs::remove_dir_all(path).await {
            Err(e) if e.kind() == io::ErrorKind::PermissionDenied => {
                clear_readonly_tree(path).await?;
                tokio::fs::remove_dir_all(path).await
            }
            result => result,
        }
    }
}

/// The deleter for the host platform.
#[cfg(windows)]
pub type PlatformDeleter = WindowsDeleter;

/// The deleter for the host platform.
#[cfg(not(windows))]
pub type PlatformDeleter = PosixDeleter;

#[allow(clippy::permissions_set_readonly_false)]
async fn clear_readonly(path: &Path) -> io::Result<()> {
    let mut permissions = tokio::fs::metadata(path).await?.permissions();
    if permissions.readonly() {
        permissions.set_readonly(false);
        tokio::fs::set_permissions(path, permissions).await?;
    }
    Ok(())
}

async fn clear_readonly_tree(root: &Path) -> io::Result<()> {
    let mut pending = vec![root.to_path_buf()];
    while let Some(dir) = pending.pop() {
        clear_readonly(&dir).await?;
        let mut entries = tokio::fs::read_dir(&dir).await?;
        while let Some(entry) = entries.next_entry().await? {
            if entry.file_type().await?.is_dir() {
                pending.push(entry.path());
            } else {
                clear_readonly(&entry.path()).await?;
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn posix_removes_file_and_tree() {
        let base = tempfile::tempdir().unwrap();
        let file = base.path().join("file");
        let tree = base.path().join("tree");
        tokio::fs::write(&file, b"x").await.unwrap();
        tokio::fs::create_dir_all(tree.join("a").join("b")).await.unwrap();
        tokio::fs::write(tree.join("a").join("b").join("c"), b"x").await.unwrap();

        PosixDeleter.remove_file(&file).await.unwrap();
        PosixDeleter.remove_tree(&tree).await.unwrap();

        assert!(!file.exists());
        assert!(!tree.exists());
    }

    #[tokio::test]
    async fn readonly_entries_are_removed() {
        let base = tempfile::tempdir().unwrap();
        let file = base.path().join("locked");
        let tree = base.path().join("tree");
        tokio::fs::write(&file, b"x").await.unwrap();
        tokio::fs::create_dir(&tree).await.unwrap();
        tokio::fs::write(tree.join("locked"), b"x").await.unwrap();
        for path in [&file, &tree.join("locked")] {
            let mut permissions = tokio::fs::metadata(path).await.unwrap().permissions();
            permissions.set_readonly(true);
            tokio::fs::set_permissions(path, permissions).await.unwrap();
        }

        WindowsDeleter.remove_file(&file).await.unwrap();
        WindowsDeleter.remove_tree(&tree).await.unwrap();

        assert!(!file.exists());
        assert!(!tree.exists());
    }

    #[tokio::test]
    async fn missing_entries_are_reported() {
        let base = tempfile::tempdir().unwrap();
        let missing = base.path().join("missing");

        let err = PlatformDeleter::default().remove_file(&missing).await.unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
        let err = PlatformDeleter::default().remove_tree(&missing).await.unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }
}
