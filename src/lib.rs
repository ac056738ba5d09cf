//! # async-tmp
//!
//! Provides the [`TempFile`] and [`TempDir`] handles: uniquely named temporary entries,
//! created asynchronously on top of `tokio::fs` with exclusive-create semantics, and
//! removed only when the caller asks for it.
//!
//! Names are `prefix`, a random segment derived from the process id, and `suffix`.
//! Creation never reuses an existing path: a name collision draws a fresh name, up
//! to [`MAX_TRIES`] attempts. A missing base directory is created for files.
//!
//! ```
//! use async_tmp::{CreateOptions, TempDir, TempFile};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), async_tmp::Error> {
//!     let dir = TempDir::new().await?;
//!
//!     let options = CreateOptions::new().dir(dir.dir_path()).suffix(".log");
//!     let file = TempFile::with_options(&options).await?;
//!     assert!(file.file_path().starts_with(dir.dir_path()));
//!
//!     // Handles do not delete on drop; cleanup is explicit.
//!     file.cleanup().await?;
//!     dir.cleanup().await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! * `rand` - (Default) Draws the random name segment from the thread-local RNG of the
//!   [`rand`](https://crates.io/crates/rand) crate.
//! * `uuid` - Draws the random name segment from a v4 [`uuid`](https://crates.io/crates/uuid)
//!   instead. Takes precedence over `rand`; build with `default-features = false` to drop
//!   `rand` entirely. One of the two must be enabled.
//! * `async-trait` - Provides the `AsyncCleanup` trait, implemented by both handles.

// Document crate features on docs.rs.
#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

mod creator;
mod deleter;
mod errors;
mod options;
mod random_name;
mod retry;
mod tempdir;
mod tempfile;

pub use creator::EntryKind;
pub use deleter::{Deleter, PlatformDeleter, PosixDeleter, WindowsDeleter};
pub use errors::Error;
pub use options::{
    CreateOptions, DEFAULT_BOOTSTRAP_TIMEOUT, DEFAULT_DIR_MODE, DEFAULT_FILE_MODE,
    DEFAULT_PREFIX, DEFAULT_SUFFIX,
};
pub use retry::{MAX_BOOTSTRAPS, MAX_TRIES};
// `self::` keeps these apart from the `tempfile` dev-dependency.
pub use self::tempdir::TempDir;
pub use self::tempfile::TempFile;

#[cfg(feature = "async-trait")]
use async_trait::async_trait;

/// Tears down a temporary entry, consuming its handle.
#[cfg(feature = "async-trait")]
#[cfg_attr(docsrs, doc(cfg(feature = "async-trait")))]
#[async_trait]
pub trait AsyncCleanup {
    async fn cleanup(self) -> Result<(), Error>;
}

#[cfg(feature = "async-trait")]
#[async_trait]
impl AsyncCleanup for TempFile {
    async fn cleanup(self) -> Result<(), Error> {
        TempFile::cleanup(self).await
    }
}

#[cfg(feature = "async-trait")]
#[async_trait]
impl AsyncCleanup for TempDir {
    async fn cleanup(self) -> Result<(), Error> {
        TempDir::cleanup(self).await
    }
}
