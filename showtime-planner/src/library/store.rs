//! Disk-backed library storage.
//!
//! The document on disk is a JSON object. Each library lives under an
//! application-chosen key, so several apps (or profiles) can share a file;
//! saving one key leaves the others untouched.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};
use tokio::sync::RwLock;
use tracing::{debug, warn};

use super::Library;
use super::error::{LibraryError, StoreError};

/// Default key the library is stored under.
pub const DEFAULT_KEY: &str = "showtime-planner";

/// Configuration for the library store.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Path to the JSON document.
    pub path: PathBuf,
    /// Key of this library within the document.
    pub key: String,
}

impl StoreConfig {
    /// Create a config for the given path under the default key.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            key: DEFAULT_KEY.to_string(),
        }
    }

    /// Store under a different key.
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = key.into();
        self
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self::new("showtime_library.json")
    }
}

/// A library held in memory and written through to disk.
#[derive(Debug)]
pub struct LibraryStore {
    config: StoreConfig,
    library: RwLock<Library>,
}

impl LibraryStore {
    /// Load the library for `config.key`.
    ///
    /// A missing file or a missing key gives an empty library. A file that
    /// exists but can't be parsed is an error rather than being silently
    /// replaced on the next save.
    pub fn open(config: StoreConfig) -> Result<Self, StoreError> {
        let document = read_document(&config.path)?;

        let library = match document.get(&config.key) {
            Some(value) => serde_json::from_value(value.clone())?,
            None => {
                debug!(path = %config.path.display(), key = %config.key, "no stored library, starting empty");
                Library::default()
            }
        };

        Ok(Self {
            config,
            library: RwLock::new(library),
        })
    }

    /// A store that starts from `library` and persists to `config.path`.
    pub fn with_library(config: StoreConfig, library: Library) -> Self {
        Self {
            config,
            library: RwLock::new(library),
        }
    }

    /// A copy of the current library.
    pub async fn snapshot(&self) -> Library {
        self.library.read().await.clone()
    }

    /// Apply an edit and persist the result.
    ///
    /// The edit runs on a copy. If it fails, or the write fails, the
    /// in-memory library is left as it was.
    pub async fn update<T, F>(&self, edit: F) -> Result<T, StoreError>
    where
        F: FnOnce(&mut Library) -> Result<T, LibraryError>,
    {
        let mut guard = self.library.write().await;
        let mut draft = guard.clone();
        let value = edit(&mut draft)?;

        self.save(&draft)?;
        *guard = draft;
        Ok(value)
    }

    /// Get the document path.
    pub fn path(&self) -> &Path {
        &self.config.path
    }

    /// Get the document key.
    pub fn key(&self) -> &str {
        &self.config.key
    }

    fn save(&self, library: &Library) -> Result<(), StoreError> {
        let path = &self.config.path;
        let mut document = match read_document(path) {
            Ok(document) => document,
            Err(e) => {
                // Overwriting would lose whatever else is in the file.
                warn!(path = %path.display(), error = %e, "refusing to overwrite unreadable library document");
                return Err(e);
            }
        };
        document.insert(self.config.key.clone(), serde_json::to_value(library)?);
        let json = serde_json::to_string_pretty(&Value::Object(document))?;

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent).map_err(|source| io_error(parent, source))?;
        }
        std::fs::write(path, json).map_err(|source| io_error(path, source))?;

        debug!(
            path = %path.display(),
            key = %self.config.key,
            movies = library.movies.len(),
            theaters = library.theaters.len(),
            events = library.events.len(),
            "saved library"
        );
        Ok(())
    }
}

/// Read the whole document. A missing file reads as an empty object.
fn read_document(path: &Path) -> Result<Map<String, Value>, StoreError> {
    let contents = match std::fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Map::new()),
        Err(e) => return Err(io_error(path, e)),
    };

    let value: Value = serde_json::from_str(&contents)?;
    match value {
        Value::Object(map) => Ok(map),
        _ => Err(StoreError::NotAnObject),
    }
}

fn io_error(path: &Path, source: std::io::Error) -> StoreError {
    StoreError::Io {
        path: path.display().to_string(),
        source,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Movie, MovieId, Theater};
    use tempfile::tempdir;

    #[tokio::test]
    async fn missing_file_opens_empty() {
        let dir = tempdir().unwrap();
        let store = LibraryStore::open(StoreConfig::new(dir.path().join("lib.json"))).unwrap();

        assert_eq!(store.snapshot().await, Library::default());
        assert!(!store.path().exists());
    }

    #[tokio::test]
    async fn update_persists_and_reloads() {
        let dir = tempdir().unwrap();
        let config = StoreConfig::new(dir.path().join("lib.json"));

        let store = LibraryStore::open(config.clone()).unwrap();
        store
            .update(|lib| lib.upsert_movie(Movie::new("m1", "Brazil", 132)))
            .await
            .unwrap();
        store
            .update(|lib| lib.upsert_theater(Theater::new("t1", "Electric")))
            .await
            .unwrap();

        let reopened = LibraryStore::open(config).unwrap();
        let library = reopened.snapshot().await;
        assert_eq!(library.movies.len(), 1);
        assert_eq!(library.theaters[0].name, "Electric");
    }

    #[tokio::test]
    async fn failed_edit_changes_nothing() {
        let dir = tempdir().unwrap();
        let store = LibraryStore::open(StoreConfig::new(dir.path().join("lib.json"))).unwrap();

        let result = store
            .update(|lib| lib.remove_movie(&MovieId::new("ghost")))
            .await;

        assert!(matches!(
            result,
            Err(StoreError::Library(LibraryError::UnknownMovie(_)))
        ));
        assert!(!store.path().exists());
    }

    #[tokio::test]
    async fn other_keys_are_preserved() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("shared.json");
        std::fs::write(&path, r#"{"other-app": {"theme": "dark"}}"#).unwrap();

        let store = LibraryStore::open(StoreConfig::new(&path).with_key("films")).unwrap();
        store
            .update(|lib| lib.upsert_movie(Movie::new("m1", "Ikiru", 143)))
            .await
            .unwrap();

        let raw: Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(raw["other-app"]["theme"], "dark");
        assert_eq!(raw["films"]["movies"][0]["title"], "Ikiru");
    }

    #[test]
    fn corrupt_file_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("lib.json");
        std::fs::write(&path, "{ not json").unwrap();

        assert!(matches!(
            LibraryStore::open(StoreConfig::new(&path)),
            Err(StoreError::Json(_))
        ));

        std::fs::write(&path, "[1, 2, 3]").unwrap();
        assert!(matches!(
            LibraryStore::open(StoreConfig::new(&path)),
            Err(StoreError::NotAnObject)
        ));
    }

    #[tokio::test]
    async fn creates_parent_directories() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("dir").join("lib.json");
        let store = LibraryStore::with_library(StoreConfig::new(&path), Library::default());

        store
            .update(|lib| {
                lib.set_settings(crate::planner::PlannerSettings::new(1, 2, 3, 4));
                Ok(())
            })
            .await
            .unwrap();

        assert!(path.exists());
        assert_eq!(store.key(), DEFAULT_KEY);
    }
}
