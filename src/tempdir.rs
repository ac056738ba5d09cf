use std::borrow::Borrow;
use std::fmt::{Debug, Formatter};
use std::ops::Deref;
use std::path::{Path, PathBuf};
use tracing::trace;

use crate::creator::{DirCreator, EntryKind};
use crate::deleter::{Deleter, PlatformDeleter};
use crate::retry::{self, Request};
use crate::{CreateOptions, Error, DEFAULT_DIR_MODE};

/// A uniquely named temporary directory.
///
/// The directory is created exclusively inside a base directory that must already
/// exist. Its path ends with a separator. Dropping the handle leaves the directory
/// on disk; call [`TempDir::cleanup`] to remove it and everything inside.
pub struct TempDir {
    /// The absolute path of the directory, including the trailing separator.
    path: PathBuf,
}

impl TempDir {
    /// Creates a new temporary directory in the default location.
    ///
    /// ## Example
    ///
    /// ```
    /// # use async_tmp::{TempDir, Error};
    /// # use tokio::fs;
    /// # let _ = tokio_test::block_on(async {
    /// let dir = TempDir::new().await?;
    ///
    /// // The directory exists.
    /// let dir_path = dir.dir_path().to_path_buf();
    /// assert!(fs::metadata(&dir_path).await?.is_dir());
    ///
    /// // Deletes the directory.
    /// dir.cleanup().await?;
    ///
    /// // The directory was removed.
    /// assert!(fs::metadata(dir_path).await.is_err());
    /// # Ok::<(), Error>(())
    /// # });
    /// ```
    pub async fn new() -> Result<Self, Error> {
        Self::with_options(&CreateOptions::default()).await
    }

    /// Creates a new temporary directory in the specified location.
    ///
    /// ## Arguments
    ///
    /// * `root_dir` - The existing directory to create the directory in.
    pub async fn new_in<P: AsRef<Path>>(root_dir: P) -> Result<Self, Error> {
        Self::with_options(&CreateOptions::new().dir(root_dir.as_ref())).await
    }

    /// Creates a new temporary directory as described by `options`.
    ///
    /// Unlike [`TempFile`](crate::TempFile), a missing base directory is not created
    /// and fails the call with [`Error::Io`].
    ///
    /// ## Example
    ///
    /// ```
    /// # use async_tmp::{CreateOptions, TempDir, Error};
    /// # let _ = tokio_test::block_on(async {
    /// let options = CreateOptions::new().prefix("build-").suffix("");
    /// let dir = TempDir::with_options(&options).await?;
    ///
    /// let name = dir.file_name().unwrap().to_string_lossy().into_owned();
    /// assert!(name.starts_with("build-"));
    /// dir.cleanup().await?;
    /// # Ok::<(), Error>(())
    /// # });
    /// ```
    pub async fn with_options(options: &CreateOptions) -> Result<Self, Error> {
        let request = Request::new(options, DEFAULT_DIR_MODE)?;
        let (path, ()) = retry::create_unique(&DirCreator, &request).await?;
        Ok(Self { path })
    }

    /// Returns the path of the underlying temporary directory.
    pub fn dir_path(&self) -> &Path {
        &self.path
    }

    /// Always [`EntryKind::Directory`].
    pub fn kind(&self) -> EntryKind {
        EntryKind::Directory
    }

    /// Removes the directory and all of its contents.
    pub async fn cleanup(self) -> Result<(), Error> {
        self.cleanup_with(&PlatformDeleter::default()).await
    }

    /// Removes the directory and all of its contents through `deleter`.
    pub async fn cleanup_with<D: Deleter>(self, deleter: &D) -> Result<(), Error> {
        deleter
            .remove_tree(&self.path)
            .await
            .map_err(|source| Error::Cleanup {
                path: self.path.clone(),
                source,
            })?;
        trace!(path = %self.path.display(), "removed");
        Ok(())
    }
}

impl Debug for TempDir {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self.path)
    }
}

/// Allows implicit treatment of TempDir as a Path.
impl Deref for TempDir {
    type Target = Path;

    fn deref(&self) -> &Self::Target {
        &self.path
    }
}

impl Borrow<Path> for TempDir {
    fn borrow(&self) -> &Path {
        &self.path
    }
}

impl AsRef<Path> for TempDir {
    fn as_ref(&self) -> &Path {
        &self.path
    }
}
