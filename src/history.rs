use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

use crate::error::SearchError;
use crate::query::SearchParams;

pub const MAX_RECENT: usize = 5;

/// Durable storage for the recent-search list. Entries are stored as JSON
/// records with the same field names the query string uses.
pub trait HistoryStore: Send {
    fn load(&self) -> Result<Vec<SearchParams>, SearchError>;
    fn save(&self, entries: &[SearchParams]) -> Result<(), SearchError>;
    fn clear(&self) -> Result<(), SearchError>;
}

/// Prepend `params`, dropping any earlier search for the same route and
/// keeping the newest `MAX_RECENT` entries.
pub fn push_recent(recent: &mut Vec<SearchParams>, params: &SearchParams) {
    recent.retain(|s| !(s.origin == params.origin && s.destination == params.destination));
    recent.insert(0, params.clone());
    recent.truncate(MAX_RECENT);
}

pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn at_default_path() -> Option<Self> {
        let dir = dirs::data_dir()?;
        Some(Self::new(dir.join("skyfare").join("recent_searches.json")))
    }
}

impl HistoryStore for JsonFileStore {
    fn load(&self) -> Result<Vec<SearchParams>, SearchError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(SearchError::Persistence(e.to_string())),
        };
        serde_json::from_str(&raw).map_err(|e| SearchError::Persistence(e.to_string()))
    }

    fn save(&self, entries: &[SearchParams]) -> Result<(), SearchError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| SearchError::Persistence(e.to_string()))?;
        }
        let raw = serde_json::to_string(entries)
            .map_err(|e| SearchError::Persistence(e.to_string()))?;
        fs::write(&self.path, raw).map_err(|e| SearchError::Persistence(e.to_string()))
    }

    fn clear(&self) -> Result<(), SearchError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(SearchError::Persistence(e.to_string())),
        }
    }
}

/// Store that remembers nothing. Used when history is disabled and in tests.
pub struct NullStore;

impl HistoryStore for NullStore {
    fn load(&self) -> Result<Vec<SearchParams>, SearchError> {
        Ok(Vec::new())
    }

    fn save(&self, _entries: &[SearchParams]) -> Result<(), SearchError> {
        Ok(())
    }

    fn clear(&self) -> Result<(), SearchError> {
        Ok(())
    }
}
