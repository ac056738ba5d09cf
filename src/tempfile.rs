use std::fmt::{Debug, Formatter};
use std::io::{self, IoSlice, SeekFrom};
use std::path::{Path, PathBuf};
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::fs::File;
use tokio::io::{AsyncRead, AsyncSeek, AsyncWrite, AsyncWriteExt, ReadBuf};
use tracing::trace;

use crate::creator::{EntryKind, FileCreator};
use crate::deleter::{Deleter, PlatformDeleter};
use crate::retry::{self, Request};
use crate::{CreateOptions, Error, DEFAULT_FILE_MODE};

/// A uniquely named temporary file.
///
/// The file is created exclusively, so the returned handle is the only owner of a
/// path that did not exist before. Dropping the handle closes the descriptor but
/// leaves the file on disk; call [`TempFile::cleanup`] to remove it.
pub struct TempFile {
    /// The absolute path of the file.
    path: PathBuf,

    /// The open descriptor, if it was kept open and not yet closed.
    file: Option<File>,
}

impl TempFile {
    /// Creates a new temporary file in the default location using the default options.
    /// The descriptor is closed before returning.
    ///
    /// ## Example
    ///
    /// ```
    /// # use async_tmp::{TempFile, Error};
    /// # use tokio::fs;
    /// # let _ = tokio_test::block_on(async {
    /// let file = TempFile::new().await?;
    ///
    /// // The file exists and no descriptor is held.
    /// let file_path = file.file_path().to_path_buf();
    /// assert!(fs::metadata(&file_path).await.is_ok());
    /// assert!(!file.is_open());
    ///
    /// // Deletes the file.
    /// file.cleanup().await?;
    ///
    /// // The file was removed.
    /// assert!(fs::metadata(file_path).await.is_err());
    /// # Ok::<(), Error>(())
    /// # });
    /// ```
    pub async fn new() -> Result<Self, Error> {
        Self::with_options(&CreateOptions::default()).await
    }

    /// Creates a new temporary file in the specified directory.
    /// Missing directories are created.
    ///
    /// ## Arguments
    ///
    /// * `dir` - The directory to create the file in.
    pub async fn new_in<P: AsRef<Path>>(dir: P) -> Result<Self, Error> {
        Self::with_options(&CreateOptions::new().dir(dir.as_ref())).await
    }

    /// Creates a new temporary file as described by `options`.
    ///
    /// The name is `prefix`, a random segment, then `suffix`. On a name collision a
    /// new name is drawn, up to [`MAX_TRIES`](crate::MAX_TRIES) attempts in total.
    ///
    /// ## Example
    ///
    /// ```
    /// # use async_tmp::{CreateOptions, TempFile, Error};
    /// # use tokio::io::AsyncWriteExt;
    /// # let _ = tokio_test::block_on(async {
    /// let options = CreateOptions::new().suffix(".log").keep_open(true);
    /// let mut file = TempFile::with_options(&options).await?;
    /// file.write_all(b"hello").await?;
    /// file.close().await?;
    ///
    /// assert_eq!(tokio::fs::read(file.file_path()).await?, b"hello");
    /// file.cleanup().await?;
    /// # Ok::<(), Error>(())
    /// # });
    /// ```
    pub async fn with_options(options: &CreateOptions) -> Result<Self, Error> {
        let request = Request::new(options, DEFAULT_FILE_MODE)?;
        let (path, file) = retry::create_unique(&FileCreator, &request).await?;

        let mut temp = Self {
            path,
            file: Some(file),
        };
        if !options.keeps_open() {
            temp.close().await?;
        }
        Ok(temp)
    }

    /// Returns the path of the underlying temporary file.
    pub fn file_path(&self) -> &Path {
        &self.path
    }

    /// Always [`EntryKind::File`].
    pub fn kind(&self) -> EntryKind {
        EntryKind::File
    }

    /// Whether the handle still holds an open descriptor.
    pub fn is_open(&self) -> bool {
        self.file.is_some()
    }

    /// The open descriptor, if any.
    pub fn file(&self) -> Option<&File> {
        self.file.as_ref()
    }

    /// The open descriptor, if any.
    pub fn file_mut(&mut self) -> Option<&mut File> {
        self.file.as_mut()
    }

    /// Flushes and closes the descriptor. Calling this on a closed handle does nothing.
    ///
    /// Pending writes are flushed first and their errors are returned; a descriptor
    /// that turns out to be gone already counts as closed. On any other flush failure
    /// the descriptor stays with the handle. Once the flush succeeds the descriptor is
    /// released before this returns. Errors reported by the OS `close` call itself
    /// cannot be observed: the standard library discards them when a file is dropped.
    pub async fn close(&mut self) -> Result<(), Error> {
        let Some(mut file) = self.file.take() else {
            return Ok(());
        };

        match file.flush().await {
            Ok(()) => {}
            Err(e) if is_already_closed(&e) => {
                trace!(path = %self.path.display(), error = %e, "descriptor already closed");
            }
            Err(e) => {
                self.file = Some(file);
                return Err(e.into());
            }
        }

        // Waits for in-flight operations so the drop below releases the descriptor.
        drop(file.into_std().await);
        trace!(path = %self.path.display(), "closed");
        Ok(())
    }

    /// Closes the descriptor and removes the file.
    ///
    /// ## Example
    ///
    /// ```
    /// # use async_tmp::{TempFile, Error};
    /// # let _ = tokio_test::block_on(async {
    /// let file = TempFile::new().await?;
    /// let path = file.file_path().to_path_buf();
    ///
    /// file.cleanup().await?;
    /// assert!(!path.exists());
    /// # Ok::<(), Error>(())
    /// # });
    /// ```
    pub async fn cleanup(self) -> Result<(), Error> {
        self.cleanup_with(&PlatformDeleter::default()).await
    }

    /// Closes the descriptor and removes the file through `deleter`.
    pub async fn cleanup_with<D: Deleter>(mut self, deleter: &D) -> Result<(), Error> {
        self.close().await?;
        deleter
            .remove_file(&self.path)
            .await
            .map_err(|source| Error::Cleanup {
                path: self.path.clone(),
                source,
            })?;
        trace!(path = %self.path.display(), "removed");
        Ok(())
    }

    fn open_file(&mut self) -> io::Result<&mut File> {
        self.file
            .as_mut()
            .ok_or_else(|| io::Error::other("temporary file is closed"))
    }
}

#[cfg(not(windows))]
const BAD_DESCRIPTOR: i32 = 9; // EBADF

#[cfg(windows)]
const BAD_DESCRIPTOR: i32 = 6; // ERROR_INVALID_HANDLE

fn is_already_closed(error: &io::Error) -> bool {
    error.kind() == io::ErrorKind::NotFound || error.raw_os_error() == Some(BAD_DESCRIPTOR)
}

impl Debug for TempFile {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TempFile")
            .field("path", &self.path)
            .field("open", &self.is_open())
            .finish()
    }
}

impl AsRef<Path> for TempFile {
    fn as_ref(&self) -> &Path {
        &self.path
    }
}

/// Forwarding AsyncWrite to the open descriptor.
impl AsyncWrite for TempFile {
    fn poll_write(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &[u8],
    ) -> Poll<Result<usize, io::Error>> {
        match self.get_mut().open_file() {
            Ok(file) => Pin::new(file).poll_write(cx, buf),
            Err(e) => Poll::Ready(Err(e)),
        }
    }

    fn poll_flush(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Result<(), io::Error>> {
        match self.get_mut().open_file() {
            Ok(file) => Pin::new(file).poll_flush(cx),
            Err(e) => Poll::Ready(Err(e)),
        }
    }

    fn poll_shutdown(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Result<(), io::Error>> {
        match self.get_mut().open_file() {
            Ok(file) => Pin::new(file).poll_shutdown(cx),
            Err(e) => Poll::Ready(Err(e)),
        }
    }

    fn poll_write_vectored(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        bufs: &[IoSlice<'_>],
    ) -> Poll<Result<usize, io::Error>> {
        match self.get_mut().open_file() {
            Ok(file) => Pin::new(file).poll_write_vectored(cx, bufs),
            Err(e) => Poll::Ready(Err(e)),
        }
    }
}

/// Forwarding AsyncRead to the open descriptor.
impl AsyncRead for TempFile {
    fn poll_read(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        match self.get_mut().open_file() {
            Ok(file) => Pin::new(file).poll_read(cx, buf),
            Err(e) => Poll::Ready(Err(e)),
        }
    }
}

/// Forwarding AsyncSeek to the open descriptor.
impl AsyncSeek for TempFile {
    fn start_seek(self: Pin<&mut Self>, position: SeekFrom) -> io::Result<()> {
        Pin::new(self.get_mut().open_file()?).start_seek(position)
    }

    fn poll_complete(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<u64>> {
        match self.get_mut().open_file() {
            Ok(file) => Pin::new(file).poll_complete(cx),
            Err(e) => Poll::Ready(Err(e)),
        }
    }
}
