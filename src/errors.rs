use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// The ways creating or tearing down a temporary entry can fail.
#[derive(Debug, Error)]
pub enum Error {
    /// Every generated name collided with an existing entry.
    #[error("no free name found in {} after {attempts} attempts", .dir.display())]
    RetriesExhausted { dir: PathBuf, attempts: u32 },

    /// The missing parent directory was not created within the allotted time.
    #[error("timed out after {timeout:?} creating parent directory {}", .dir.display())]
    BootstrapTimeout { dir: PathBuf, timeout: Duration },

    /// The entry could not be removed.
    #[error("failed to remove {}: {source}", .path.display())]
    Cleanup {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// An I/O error occurred. Never retried.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
