use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

/// An in-memory key-value store, backed by a [`BTreeMap`] from the standard
/// library and shared between every request handler on a node.
///
/// A single coarse mutex guards the map: writes are one insert, and snapshots
/// clone under the lock, so a status dump never observes a half-applied
/// write. Nothing is persisted; the store starts empty and dies with the
/// process.
#[derive(Debug, Clone, Default)]
pub struct Store {
    data: Arc<Mutex<BTreeMap<String, String>>>,
}

impl Store {
    pub fn new() -> Store {
        Store::default()
    }

    /// Set the value of a key, overwriting any existing value.
    pub fn put(&self, key: String, value: String) {
        self.data.lock().unwrap().insert(key, value);
    }

    /// Retrieve the value of a key from the local store.
    /// If the key does not exist, then [`None`] is returned.
    pub fn get(&self, key: &str) -> Option<String> {
        self.data.lock().unwrap().get(key).cloned()
    }

    /// A consistent copy of the whole mapping, cloned under the lock.
    pub fn snapshot(&self) -> BTreeMap<String, String> {
        self.data.lock().unwrap().clone()
    }

    pub fn len(&self) -> usize {
        self.data.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.lock().unwrap().is_empty()
    }
}
