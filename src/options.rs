use std::path::{Path, PathBuf};
use std::time::Duration;

/// Leading name segment used when no prefix is configured.
pub const DEFAULT_PREFIX: &str = "tmp-";

/// Trailing name segment used when no suffix is configured.
pub const DEFAULT_SUFFIX: &str = ".tmp";

/// Permission bits for new files.
pub const DEFAULT_FILE_MODE: u32 = 0o600;

/// Permission bits for new directories.
pub const DEFAULT_DIR_MODE: u32 = 0o700;

/// How long creating a missing parent directory may take.
pub const DEFAULT_BOOTSTRAP_TIMEOUT: Duration = Duration::from_millis(500);

/// Options controlling where and how a temporary entry is created.
///
/// Every field is optional; unset fields fall back to the `DEFAULT_*` constants
/// of this module, and the directory falls back to [`std::env::temp_dir`].
/// Only unset fields fall back: an explicitly empty prefix or suffix, or a mode of
/// `0`, is used as given instead of being treated as "unset" and replaced by the
/// default.
///
/// ## Example
///
/// ```
/// # use async_tmp::CreateOptions;
/// let options = CreateOptions::new()
///     .prefix("build-")
///     .suffix(".log")
///     .keep_open(true);
/// assert_eq!(options.prefix_or_default(), "build-");
/// assert_eq!(options.suffix_or_default(), ".log");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CreateOptions {
    dir: Option<PathBuf>,
    prefix: Option<String>,
    suffix: Option<String>,
    mode: Option<u32>,
    keep_open: bool,
    bootstrap_timeout: Option<Duration>,
}

impl CreateOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the base directory for the new entry.
    pub fn dir<P: Into<PathBuf>>(mut self, dir: P) -> Self {
        self.dir = Some(dir.into());
        self
    }

    /// Sets the leading name segment. An empty string is kept as-is.
    pub fn prefix<S: Into<String>>(mut self, prefix: S) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    /// Sets the trailing name segment. An empty string is kept as-is.
    pub fn suffix<S: Into<String>>(mut self, suffix: S) -> Self {
        self.suffix = Some(suffix.into());
        self
    }

    /// Sets the permission bits. Only honoured on Unix, where the umask still applies.
    pub fn mode(mut self, mode: u32) -> Self {
        self.mode = Some(mode);
        self
    }

    /// Keeps the descriptor of a new file open instead of closing it right away.
    /// Has no effect on directories.
    pub fn keep_open(mut self, keep_open: bool) -> Self {
        self.keep_open = keep_open;
        self
    }

    /// Bounds the time spent creating a missing parent directory.
    pub fn bootstrap_timeout(mut self, timeout: Duration) -> Self {
        self.bootstrap_timeout = Some(timeout);
        self
    }

    pub fn dir_or_default(&self) -> PathBuf {
        self.dir.clone().unwrap_or_else(std::env::temp_dir)
    }

    pub fn prefix_or_default(&self) -> &str {
        self.prefix.as_deref().unwrap_or(DEFAULT_PREFIX)
    }

    pub fn suffix_or_default(&self) -> &str {
        self.suffix.as_deref().unwrap_or(DEFAULT_SUFFIX)
    }

    /// The configured mode, or `default` when unset.
    pub fn mode_or(&self, default: u32) -> u32 {
        self.mode.unwrap_or(default)
    }

    pub fn keeps_open(&self) -> bool {
        self.keep_open
    }

    pub fn bootstrap_timeout_or_default(&self) -> Duration {
        self.bootstrap_timeout.unwrap_or(DEFAULT_BOOTSTRAP_TIMEOUT)
    }

    /// Resolves the base directory to an absolute path.
    pub(crate) fn absolute_dir(&self) -> std::io::Result<PathBuf> {
        let dir = self.dir_or_default();
        if dir.is_absolute() {
            Ok(dir)
        } else {
            Ok(std::env::current_dir()?.join(Path::new(&dir)))
        }
    }
}
