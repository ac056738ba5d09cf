use std::io;
use std::path::Path;
use tokio::fs::{DirBuilder, File, OpenOptions};

/// The kind of filesystem entry a handle owns.
#[derive(Debug, Eq, PartialEq, Copy, Clone)]
pub enum EntryKind {
    /// A regular file.
    File,
    /// A directory, removed recursively on cleanup.
    Directory,
}

/// The classified result of one exclusive-create attempt.
#[derive(Debug)]
pub(crate) enum Outcome<T> {
    /// The entry was created; it did not exist before.
    Created(T),
    /// Something already exists at the candidate path.
    Collision,
    /// An ancestor directory is missing. Only reported for files.
    MissingParent(io::Error),
    /// Any other failure.
    Fatal(io::Error),
}

impl<T> Outcome<T> {
    /// Sorts an OS error into the retry taxonomy.
    ///
    /// Directories live in a single level below a base that is expected to exist,
    /// so a missing parent is fatal for them.
    pub fn from_error(error: io::Error, kind: EntryKind) -> Self {
        match error.kind() {
            io::ErrorKind::AlreadyExists => Outcome::Collision,
            io::ErrorKind::NotFound if kind == EntryKind::File => Outcome::MissingParent(error),
            _ => Outcome::Fatal(error),
        }
    }
}

/// Atomically creates an entry that must not already exist.
pub(crate) trait ExclusiveCreate {
    /// What a successful creation yields (an open file, or nothing for directories).
    type Output;

    /// The kind of entry this creator produces.
    const KIND: EntryKind;

    async fn create(&self, path: &Path, mode: u32) -> Outcome<Self::Output>;

    /// Creates `dir` and all of its missing ancestors.
    async fn create_parent(&self, dir: &Path) -> io::Result<()> {
        tokio::fs::create_dir_all(dir).await
    }
}

/// Opens a new file read-write, failing if it exists.
pub(crate) struct FileCreator;

impl ExclusiveCreate for FileCreator {
    type Output = File;
    const KIND: EntryKind = EntryKind::File;

    async fn create(&self, path: &Path, mode: u32) -> Outcome<File> {
        let mut options = OpenOptions::new();
        options.read(true).write(true).create_new(true);
        #[cfg(unix)]
        options.mode(mode);
        #[cfg(not(unix))]
        let _ = mode;

        match options.open(path).await {
            Ok(file) => Outcome::Created(file),
            Err(e) => Outcome::from_error(e, Self::KIND),
        }
    }
}

/// Creates a single new directory, failing if it exists.
pub(crate) struct DirCreator;

impl ExclusiveCreate for DirCreator {
    type Output = ();
    const KIND: EntryKind = EntryKind::Directory;

    async fn create(&self, path: &Path, mode: u32) -> Outcome<()> {
        let mut builder = DirBuilder::new();
        #[cfg(unix)]
        builder.mode(mode);
        #[cfg(not(unix))]
        let _ = mode;

        match builder.create(path).await {
            Ok(()) => Outcome::Created(()),
            Err(e) => Outcome::from_error(e, Self::KIND),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn error(kind: io::ErrorKind) -> io::Error {
        io::Error::new(kind, "test")
    }

    #[test]
    fn classification() {
        assert!(matches!(
            Outcome::<()>::from_error(error(io::ErrorKind::AlreadyExists), EntryKind::File),
            Outcome::Collision
        ));
        assert!(matches!(
            Outcome::<()>::from_error(error(io::ErrorKind::AlreadyExists), EntryKind::Directory),
            Outcome::Collision
        ));
        assert!(matches!(
            Outcome::<()>::from_error(error(io::ErrorKind::NotFound), EntryKind::File),
            Outcome::MissingParent(_)
        ));
        assert!(matches!(
            Outcome::<()>::from_error(error(io::ErrorKind::NotFound), EntryKind::Directory),
            Outcome::Fatal(_)
        ));
        assert!(matches!(
            Outcome::<()>::from_error(error(io::ErrorKind::PermissionDenied), EntryKind::File),
            Outcome::Fatal(_)
        ));
    }

    #[tokio::test]
    async fn file_creation_is_exclusive() {
        let base = tempfile::tempdir().unwrap();
        let path = base.path().join("taken");

        assert!(matches!(
            FileCreator.create(&path, 0o600).await,
            Outcome::Created(_)
        ));
        assert!(matches!(
            FileCreator.create(&path, 0o600).await,
            Outcome::Collision
        ));
    }

    #[tokio::test]
    async fn file_in_missing_directory_reports_missing_parent() {
        let base = tempfile::tempdir().unwrap();
        let path = base.path().join("absent").join("file");

        assert!(matches!(
            FileCreator.create(&path, 0o600).await,
            Outcome::MissingParent(_)
        ));
    }

    #[tokio::test]
    async fn dir_creation_is_exclusive() {
        let base = tempfile::tempdir().unwrap();
        let path = base.path().join("taken");

        assert!(matches!(
            DirCreator.create(&path, 0o700).await,
            Outcome::Created(())
        ));
        assert!(matches!(
            DirCreator.create(&path, 0o700).await,
            Outcome::Collision
        ));
        assert!(matches!(
            DirCreator.create(&base.path().join("a").join("b"), 0o700).await,
            Outcome::Fatal(_)
        ));
    }
}
