use log::{debug, warn};
use std::fs::{self, File};
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use crate::model::ResultData;

/// Default location of the history collection, next to the binary.
pub const DEFAULT_HISTORY_FILE: &str = "database/history.json";

/// Whole-blob storage behind the result store.
///
/// The store never mutates storage in place; it reads the full blob,
/// rewrites the collection and writes the full blob back. Implementations
/// only need those two operations, which keeps the store swappable in tests.
pub trait StorageBackend: Send {
    /// The current blob, or `None` when storage has never been written.
    fn load(&self) -> io::Result<Option<String>>;

    /// Replace the blob. Must not leave a partially written blob behind.
    fn store(&mut self, data: &str) -> io::Result<()>;
}

/// File-backed storage, one JSON document per file.
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        FileStorage { path: path.into() }
    }
}

impl StorageBackend for FileStorage {
    fn load(&self) -> io::Result<Option<String>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let mut contents = String::new();
        File::open(&self.path)?.read_to_string(&mut contents)?;
        Ok(Some(contents))
    }

    fn store(&mut self, data: &str) -> io::Result<()> {
        let dir = match self.path.parent() {
            Some(d) if !d.as_os_str().is_empty() => d,
            _ => Path::new("."),
        };
        fs::create_dir_all(dir)?;

        // Write to a sibling temp file and rename over the target, so a
        // crash mid-write cannot leave a half-written collection.
        let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
        tmp.write_all(data.as_bytes())?;
        tmp.persist(&self.path).map_err(|e| e.error)?;
        Ok(())
    }
}

/// Local persistence of generated results.
///
/// One ordered collection of [`ResultData`], newest insertions first.
/// A single process is the only expected writer; concurrent writers are
/// last-write-wins and not supported.
pub struct ResultStore {
    backend: Box<dyn StorageBackend>,
}

impl ResultStore {
    /// Open a file-backed store at `path`.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        ResultStore::with_backend(Box::new(FileStorage::new(path)))
    }

    /// Build a store over any backend. Tests inject an in-memory one.
    pub fn with_backend(backend: Box<dyn StorageBackend>) -> Self {
        ResultStore { backend }
    }

    /// The full saved collection, newest-first for inserts.
    ///
    /// Absent, unreadable or corrupt storage yields an empty collection.
    /// There is no recovery action a user could take either way, so "no
    /// history" and "history unreadable" are deliberately indistinguishable.
    pub fn list_saved(&self) -> Vec<ResultData> {
        let raw = match self.backend.load() {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(e) => {
                warn!("could not read history, treating it as empty: {}", e);
                return Vec::new();
            }
        };
        match serde_json::from_str(&raw) {
            Ok(results) => results,
            Err(e) => {
                warn!("history is not valid JSON, treating it as empty: {}", e);
                Vec::new()
            }
        }
    }

    /// Idempotent upsert keyed by `result.id`.
    ///
    /// An existing record is replaced in place, keeping its position; a new
    /// record is inserted at the front.
    pub fn save(&mut self, result: &ResultData) -> io::Result<()> {
        let mut results = self.list_saved();
        match results.iter().position(|r| r.id == result.id) {
            Some(i) => results[i] = result.clone(),
            None => results.insert(0, result.clone()),
        }
        debug!("saving result {} ({} in history)", result.id, results.len());
        self.write_all(&results)
    }

    /// Remove the record with this id. Removing an unknown id is a no-op.
    pub fn delete(&mut self, id: &str) -> io::Result<()> {
        let mut results = self.list_saved();
        results.retain(|r| r.id != id);
        self.write_all(&results)
    }

    fn write_all(&mut self, results: &[ResultData]) -> io::Result<()> {
        let json = serde_json::to_string_pretty(results)
            .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;
        self.backend.store(&json)
    }
}
