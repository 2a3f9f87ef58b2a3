//! Best score persistence
//!
//! The game persists exactly one value: the best score, under a single key.
//! Backends:
//! - `MemoryStore`: tests and ephemeral runs
//! - `JsonFileStore`: native, a small JSON object on disk
//! - `LocalStorageStore`: browser LocalStorage (wasm32 only)

#[cfg(not(target_arch = "wasm32"))]
pub mod file;
#[cfg(target_arch = "wasm32")]
pub mod local_storage;

use std::collections::HashMap;

#[cfg(not(target_arch = "wasm32"))]
pub use file::JsonFileStore;
#[cfg(target_arch = "wasm32")]
pub use local_storage::LocalStorageStore;

use crate::consts::BEST_SCORE_KEY;

/// Errors from a storage backend
#[derive(Debug, thiserror::Error)]
pub enum PersistError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

/// String key-value store
pub trait ScoreStore {
    fn get(&self, key: &str) -> Result<Option<String>, PersistError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), PersistError>;
}

/// In-memory store
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ScoreStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, PersistError> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), PersistError> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

impl<S: ScoreStore + ?Sized> ScoreStore for Box<S> {
    fn get(&self, key: &str) -> Result<Option<String>, PersistError> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), PersistError> {
        (**self).set(key, value)
    }
}

/// Cached best score backed by a store
///
/// Read failures and unparsable values count as 0. Write failures are logged
/// and the cached value still advances for the rest of the run.
#[derive(Debug)]
pub struct BestScore<S: ScoreStore> {
    store: S,
    best: u64,
}

impl<S: ScoreStore> BestScore<S> {
    pub fn load(store: S) -> Self {
        let best = match store.get(BEST_SCORE_KEY) {
            Ok(Some(raw)) => raw.trim().parse().unwrap_or_else(|_| {
                log::warn!("Ignoring unparsable best score {:?}", raw);
                0
            }),
            Ok(None) => 0,
            Err(e) => {
                log::warn!("Failed to read best score: {}", e);
                0
            }
        };
        log::info!("Best score: {}", best);
        Self { store, best }
    }

    pub fn get(&self) -> u64 {
        self.best
    }

    /// Persist `score` if it beats the stored best; returns true when it did
    pub fn submit(&mut self, score: u64) -> bool {
        if score <= self.best {
            return false;
        }
        self.best = score;
        if let Err(e) = self.store.set(BEST_SCORE_KEY, &score.to_string()) {
            log::warn!("Failed to save best score {}: {}", score, e);
        } else {
            log::info!("New best score saved: {}", score);
        }
        true
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}
