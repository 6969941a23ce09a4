//! Handoff storage for the session and results blobs.
//!
//! The engine only defines what goes in and out; the backend decides where
//! it lives. [`MemoryBackend`] keeps blobs for the lifetime of the process,
//! [`FileBackend`] keeps one `<key>.json` per blob in a state directory.

use std::collections::HashMap;
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use crate::models::{ResultsSummary, SessionHandoff};

/// Key of the session handoff blob.
pub const SESSION_KEY: &str = "currentQuiz";
/// Key of the results handoff blob.
pub const RESULTS_KEY: &str = "quizResults";

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage I/O error for `{key}`: {source}")]
    Io {
        key: String,
        #[source]
        source: io::Error,
    },

    #[error("malformed blob `{key}`: {source}")]
    Serialize {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Raw key/value store for JSON blobs.
pub trait StorageBackend: Send {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn write(&mut self, key: &str, value: String) -> Result<(), StorageError>;
    fn remove(&mut self, key: &str) -> Result<(), StorageError>;
}

#[derive(Debug, Default)]
pub struct MemoryBackend {
    blobs: HashMap<String, String>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StorageBackend for MemoryBackend {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.blobs.get(key).cloned())
    }

    fn write(&mut self, key: &str, value: String) -> Result<(), StorageError> {
        self.blobs.insert(key.to_string(), value);
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        self.blobs.remove(key);
        Ok(())
    }
}

/// One JSON file per key under `dir`, replaced atomically on write.
#[derive(Debug, Clone)]
pub struct FileBackend {
    dir: PathBuf,
}

impl FileBackend {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

fn io_error(key: &str) -> impl FnOnce(io::Error) -> StorageError + '_ {
    move |source| StorageError::Io {
        key: key.to_string(),
        source,
    }
}

impl StorageBackend for FileBackend {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(contents) => Ok(Some(contents)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(io_error(key)(err)),
        }
    }

    fn write(&mut self, key: &str, value: String) -> Result<(), StorageError> {
        fs::create_dir_all(&self.dir).map_err(io_error(key))?;

        let path = self.path_for(key);
        let tmp_path = path.with_extension("json.tmp");
        {
            let mut file = File::create(&tmp_path).map_err(io_error(key))?;
            file.write_all(value.as_bytes()).map_err(io_error(key))?;
            file.sync_all().map_err(io_error(key))?;
        }
        fs::rename(&tmp_path, &path).map_err(io_error(key))?;

        debug!(path = %path.display(), "blob written");
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(io_error(key)(err)),
        }
    }
}

/// Typed access to the two handoff blobs.
pub struct HandoffStore {
    backend: Box<dyn StorageBackend>,
}

impl HandoffStore {
    pub fn new(backend: impl StorageBackend + 'static) -> Self {
        Self {
            backend: Box::new(backend),
        }
    }

    pub fn in_memory() -> Self {
        Self::new(MemoryBackend::new())
    }

    /// File-backed when `dir` is given, in-memory otherwise.
    pub fn for_dir(dir: Option<&Path>) -> Self {
        match dir {
            Some(dir) => Self::new(FileBackend::new(dir)),
            None => Self::in_memory(),
        }
    }

    pub fn save_session(&mut self, handoff: &SessionHandoff) -> Result<(), StorageError> {
        self.save(SESSION_KEY, handoff)
    }

    pub fn load_session(&self) -> Result<Option<SessionHandoff>, StorageError> {
        self.load(SESSION_KEY)
    }

    pub fn save_results(&mut self, summary: &ResultsSummary) -> Result<(), StorageError> {
        self.save(RESULTS_KEY, summary)
    }

    pub fn load_results(&self) -> Result<Option<ResultsSummary>, StorageError> {
        self.load(RESULTS_KEY)
    }

    /// Drop both blobs; called when the user leaves the results view.
    pub fn clear(&mut self) -> Result<(), StorageError> {
        self.backend.remove(RESULTS_KEY)?;
        self.backend.remove(SESSION_KEY)
    }

    fn save<T: Serialize>(&mut self, key: &str, value: &T) -> Result<(), StorageError> {
        let json = serde_json::to_string(value).map_err(|source| StorageError::Serialize {
            key: key.to_string(),
            source,
        })?;
        self.backend.write(key, json)
    }

    fn load<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StorageError> {
        let Some(json) = self.backend.read(key)? else {
            return Ok(None);
        };
        serde_json::from_str(&json)
            .map(Some)
            .map_err(|source| StorageError::Serialize {
                key: key.to_string(),
                source,
            })
    }
}
