use anyhow::Result;
use async_trait::async_trait;
use charades_core::{encode, rehydrate, PersistedState, STORAGE_KEY};
use std::collections::HashMap;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::StateRepository;

/// Where saved games live. One string payload per key.
#[async_trait]
pub trait StateStorage: Send + Sync {
    async fn read(&self, key: &str) -> Result<Option<String>>;
    async fn write(&self, key: &str, payload: String) -> Result<()>;
    async fn remove(&self, key: &str) -> Result<()>;
}

#[async_trait]
impl StateStorage for StateRepository {
    async fn read(&self, key: &str) -> Result<Option<String>> {
        self.find_payload(key).await
    }

    async fn write(&self, key: &str, payload: String) -> Result<()> {
        self.save_payload(key, payload).await
    }

    async fn remove(&self, key: &str) -> Result<()> {
        self.delete(key).await.map(|_| ())
    }
}

/// Volatile storage for tests and for running without a database
#[derive(Default)]
pub struct MemoryStateStorage {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStateStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl StateStorage for MemoryStateStorage {
    async fn read(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.lock().await.get(key).cloned())
    }

    async fn write(&self, key: &str, payload: String) -> Result<()> {
        self.entries.lock().await.insert(key.to_string(), payload);
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        self.entries.lock().await.remove(key);
        Ok(())
    }
}

/// Saves and loads the single game record under one key.
pub struct GameStorage<S> {
    backend: S,
    key: String,
}

impl<S: StateStorage> GameStorage<S> {
    pub fn new(backend: S) -> Self {
        Self::with_key(backend, STORAGE_KEY)
    }

    pub fn with_key(backend: S, key: &str) -> Self {
        Self {
            backend,
            key: key.to_string(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn backend(&self) -> &S {
        &self.backend
    }

    /// Load the saved game. Never fails: an unreadable backend, a missing record
    /// or a record that does not validate all yield a fresh default state.
    pub async fn load(&self) -> PersistedState {
        let raw = match self.backend.read(&self.key).await {
            Ok(raw) => raw,
            Err(e) => {
                warn!("Failed to read saved game '{}': {}", self.key, e);
                None
            }
        };
        if raw.is_none() {
            debug!("No saved game under '{}'", self.key);
        }
        rehydrate(raw.as_deref())
    }

    pub async fn save(&self, state: &PersistedState) -> Result<()> {
        let payload = encode(state)?;
        self.backend.write(&self.key, payload).await?;
        debug!("Saved game under '{}'", self.key);
        Ok(())
    }

    pub async fn clear(&self) -> Result<()> {
        self.backend.remove(&self.key).await
    }
}
