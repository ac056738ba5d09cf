use crate::creator::{EntryKind, ExclusiveCreate, Outcome};
use crate::random_name::RandomName;
use crate::{CreateOptions, Error};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, trace};

/// Maximum number of exclusive-create attempts per create call.
pub const MAX_TRIES: u32 = 100;

/// Maximum number of parent-directory bootstraps per create call.
pub const MAX_BOOTSTRAPS: u32 = 3;

/// Everything one create call needs, resolved from [`CreateOptions`].
#[derive(Debug)]
pub(crate) struct Request {
    dir: PathBuf,
    prefix: String,
    suffix: String,
    mode: u32,
    bootstrap_timeout: Duration,
}

impl Request {
    pub fn new(options: &CreateOptions, default_mode: u32) -> std::io::Result<Self> {
        Ok(Self {
            dir: options.absolute_dir()?,
            prefix: options.prefix_or_default().to_string(),
            suffix: options.suffix_or_default().to_string(),
            mode: options.mode_or(default_mode),
            bootstrap_timeout: options.bootstrap_timeout_or_default(),
        })
    }

    /// Builds `dir/prefix<random>suffix` with a freshly generated name.
    /// Directory candidates carry a trailing separator.
    fn candidate(&self, kind: EntryKind) -> PathBuf {
        let name = RandomName::new();
        let mut path = self
            .dir
            .join(format!("{}{}{}", self.prefix, name.as_ref(), self.suffix));
        if kind == EntryKind::Directory {
            path.push("");
        }
        path
    }
}

/// Creates a uniquely named entry, retrying on name collisions.
///
/// Every attempt uses a fresh name. A missing parent directory is created and the
/// same candidate is retried without consuming an attempt; this happens at most
/// [`MAX_BOOTSTRAPS`] times. Any other failure ends the call immediately.
pub(crate) async fn create_unique<C: ExclusiveCreate>(
    creator: &C,
    request: &Request,
) -> Result<(PathBuf, C::Output), Error> {
    let mut bootstraps = 0;

    for attempt in 1..=MAX_TRIES {
        let path = request.candidate(C::KIND);

        loop {
            match creator.create(&path, request.mode).await {
                Outcome::Created(output) => {
                    trace!(path = %path.display(), attempt, "created");
                    return Ok((path, output));
                }
                Outcome::Collision => {
                    debug!(path = %path.display(), attempt, "name collision");
                    break;
                }
                Outcome::MissingParent(error) => {
                    if bootstraps == MAX_BOOTSTRAPS {
                        debug!(dir = %request.dir.display(), bootstraps, "parent keeps disappearing");
                        return Err(Error::Io(error));
                    }
                    bootstraps += 1;
                    bootstrap(creator, request).await?;
                }
                Outcome::Fatal(error) => return Err(Error::Io(error)),
            }
        }
    }

    Err(Error::RetriesExhausted {
        dir: request.dir.clone(),
        attempts: MAX_TRIES,
    })
}

async fn bootstrap<C: ExclusiveCreate>(creator: &C, request: &Request) -> Result<(), Error> {
    let dir: &Path = &request.dir;
    debug!(dir = %dir.display(), "creating missing parent directory");
    match tokio::time::timeout(request.bootstrap_timeout, creator.create_parent(dir)).await {
        Ok(result) => Ok(result?),
        Err(_) => Err(Error::BootstrapTimeout {
            dir: dir.to_path_buf(),
            timeout: request.bootstrap_timeout,
        }),
    }
}
