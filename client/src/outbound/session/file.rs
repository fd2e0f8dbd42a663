//! Session store persisted as a small JSON document.
//!
//! The document lives in a directory opened once through a `cap_std`
//! capability handle, so the store can only touch files beneath it. Writes
//! stage a uniquely named sibling and rename it over the target; a reader
//! sees either the previous record or the new one.

use std::collections::BTreeMap;
use std::io;
use std::path::{Path, PathBuf};

use cap_std::{ambient_authority, fs::Dir};
use tracing::debug;
use uuid::Uuid;

use crate::domain::ports::{SESSION_STORAGE_KEY, SessionStore, SessionStoreError};
use crate::domain::{Session, UserIdentifier};

/// File name of the persisted session record.
pub const SESSION_FILENAME: &str = "session.json";

/// Session store backed by `session.json` in a capability-scoped directory.
#[derive(Debug)]
pub struct FileSessionStore {
    dir: Dir,
    root: PathBuf,
}

impl FileSessionStore {
    /// Open (creating if needed) the session directory at `root`.
    ///
    /// # Errors
    ///
    /// Returns [`SessionStoreError::Io`] when the directory cannot be created
    /// or opened.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, SessionStoreError> {
        let root = path.as_ref().to_path_buf();
        Dir::create_ambient_dir_all(&root, ambient_authority())
            .map_err(|error| io_error(&root, &error))?;
        let dir = Dir::open_ambient_dir(&root, ambient_authority())
            .map_err(|error| io_error(&root, &error))?;
        Ok(Self { dir, root })
    }

    /// Directory holding the session record.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn record_path(&self) -> PathBuf {
        self.root.join(SESSION_FILENAME)
    }

    fn write_record(&self, contents: &[u8]) -> Result<(), SessionStoreError> {
        let staged = format!(".{SESSION_FILENAME}.{}", Uuid::new_v4().simple());
        self.dir
            .write(&staged, contents)
            .map_err(|error| io_error(&self.root.join(&staged), &error))?;
        if let Err(error) = self.dir.rename(&staged, &self.dir, SESSION_FILENAME) {
            let _cleanup_result = self.dir.remove_file(&staged);
            return Err(io_error(&self.record_path(), &error));
        }
        Ok(())
    }
}

impl SessionStore for FileSessionStore {
    fn get(&self) -> Result<Option<Session>, SessionStoreError> {
        let raw = match self.dir.read_to_string(SESSION_FILENAME) {
            Ok(raw) => raw,
            Err(error) if error.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(error) => return Err(io_error(&self.record_path(), &error)),
        };
        decode_record(&raw)
    }

    fn set(&self, session: &Session) -> Result<(), SessionStoreError> {
        let record = BTreeMap::from([(SESSION_STORAGE_KEY, session.identifier().as_str())]);
        let contents = serde_json::to_vec_pretty(&record)
            .map_err(|error| SessionStoreError::corrupt(error.to_string()))?;
        self.write_record(&contents)?;
        debug!(path = %self.record_path().display(), "session persisted");
        Ok(())
    }

    fn clear(&self) -> Result<(), SessionStoreError> {
        match self.dir.remove_file(SESSION_FILENAME) {
            Ok(()) => Ok(()),
            Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(error) => Err(io_error(&self.record_path(), &error)),
        }
    }
}

fn decode_record(raw: &str) -> Result<Option<Session>, SessionStoreError> {
    let mut record: BTreeMap<String, String> = serde_json::from_str(raw)
        .map_err(|error| SessionStoreError::corrupt(format!("invalid session JSON: {error}")))?;
    let Some(value) = record.remove(SESSION_STORAGE_KEY) else {
        return Ok(None);
    };
    let identifier = UserIdentifier::new(value)
        .map_err(|error| SessionStoreError::corrupt(error.to_string()))?;
    Ok(Some(Session::new(identifier)))
}

fn io_error(path: &Path, error: &io::Error) -> SessionStoreError {
    SessionStoreError::io(format!("{}: {error}", path.display()))
}
