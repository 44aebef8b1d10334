//! Key-value persistence seam for navigation state.

use std::collections::HashMap;
use std::fmt::Debug;

/// Minimal string key-value store.
///
/// The selector persists the last dispatched link through this trait so
/// the storage backend (platform preferences, a file, a test double) stays
/// out of the engine.
pub trait KeyValueStore: Send + Debug {
    /// Read a value, if present.
    fn get_string(&self, key: &str) -> Option<String>;

    /// Write a value, replacing any previous one.
    fn set_string(&mut self, key: &str, value: &str);
}

/// In-memory store, for tests and ephemeral sessions.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    /// An empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get_string(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set_string(&mut self, key: &str, value: &str) {
        self.entries.insert(key.to_string(), value.to_string());
    }
}
