//! In-memory [`RemoteStore`] backend.
//!
//! Backs the test suite and embedders that want the language service
//! without a networked store. Values live in one nested JSON tree;
//! paths address it segment by segment. Watch listeners fire with the
//! current subtree immediately on registration and again after every
//! write at, above, or below the watched path.

use crate::error::StoreError;
use crate::store::{ChangeFn, ErrorFn, RemoteStore, StoreSubscription};
use serde_json::{Map, Value};
use std::sync::{Arc, Mutex};

struct Watcher {
    id: u64,
    path: String,
    on_change: ChangeFn,
    on_error: ErrorFn,
}

struct Inner {
    root: Value,
    watchers: Vec<Arc<Watcher>>,
    next_watch_id: u64,
}

/// Hierarchical in-memory key-value store.
#[derive(Clone)]
pub struct MemoryStore {
    inner: Arc<Mutex<Inner>>,
}

fn segments(path: &str) -> Vec<&str> {
    path.split('/').filter(|s| !s.is_empty()).collect()
}

/// True when one path is the other's ancestor, descendant, or equal,
/// compared segment-wise.
fn related(a: &str, b: &str) -> bool {
    let a = segments(a);
    let b = segments(b);
    let shared = a.len().min(b.len());
    a[..shared] == b[..shared]
}

impl Inner {
    fn subtree(&self, path: &str) -> Option<Value> {
        let mut node = &self.root;
        for seg in segments(path) {
            node = node.get(seg)?;
        }
        Some(node.clone())
    }

    fn write(&mut self, path: &str, value: Value) {
        let segs = segments(path);
        let Some((last, parents)) = segs.split_last() else {
            self.root = value;
            return;
        };
        let mut node = &mut self.root;
        for seg in parents {
            if !node.is_object() {
                *node = Value::Object(Map::new());
            }
            node = node
                .as_object_mut()
                .expect("node was just made an object")
                .entry(seg.to_string())
                .or_insert_with(|| Value::Object(Map::new()));
        }
        if !node.is_object() {
            *node = Value::Object(Map::new());
        }
        node.as_object_mut()
            .expect("node was just made an object")
            .insert(last.to_string(), value);
    }

    fn delete(&mut self, path: &str) {
        let segs = segments(path);
        let Some((last, parents)) = segs.split_last() else {
            self.root = Value::Object(Map::new());
            return;
        };
        let mut node = &mut self.root;
        for seg in parents {
            match node.get_mut(seg) {
                Some(next) => node = next,
                None => return,
            }
        }
        if let Some(map) = node.as_object_mut() {
            map.remove(*last);
        }
    }

    /// Snapshot the watchers touched by a mutation at `path`, paired
    /// with the current value of their watched subtree.
    fn affected(&self, path: &str) -> Vec<(Arc<Watcher>, Value)> {
        self.watchers
            .iter()
            .filter(|w| related(&w.path, path))
            .map(|w| {
                let snapshot = self.subtree(&w.path).unwrap_or(Value::Null);
                (Arc::clone(w), snapshot)
            })
            .collect()
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner {
                root: Value::Object(Map::new()),
                watchers: Vec::new(),
                next_watch_id: 0,
            })),
        }
    }

    /// Deliver an error to every watcher of `path` (and of related
    /// paths). Fault-injection hook for tests.
    pub fn emit_error(&self, path: &str, error: StoreError) {
        let watchers: Vec<Arc<Watcher>> = {
            let inner = self.inner.lock().unwrap();
            inner
                .watchers
                .iter()
                .filter(|w| related(&w.path, path))
                .map(Arc::clone)
                .collect()
        };
        for watcher in watchers {
            (watcher.on_error)(error.clone());
        }
    }

    fn notify(&self, path: &str) {
        // Snapshots are taken under the lock, callbacks run outside it,
        // so an observer may call back into the store.
        let affected = self.inner.lock().unwrap().affected(path);
        for (watcher, snapshot) in affected {
            (watcher.on_change)(snapshot);
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl RemoteStore for MemoryStore {
    async fn get(&self, path: &str) -> Result<Option<Value>, StoreError> {
        Ok(self.inner.lock().unwrap().subtree(path))
    }

    async fn set(&self, path: &str, value: Value) -> Result<(), StoreError> {
        self.inner.lock().unwrap().write(path, value);
        self.notify(path);
        Ok(())
    }

    async fn remove(&self, path: &str) -> Result<(), StoreError> {
        self.inner.lock().unwrap().delete(path);
        self.notify(path);
        Ok(())
    }

    fn watch(&self, path: &str, on_change: ChangeFn, on_error: ErrorFn) -> StoreSubscription {
        let (watcher, initial) = {
            let mut inner = self.inner.lock().unwrap();
            let id = inner.next_watch_id;
            inner.next_watch_id += 1;
            let watcher = Arc::new(Watcher {
                id,
                path: path.to_string(),
                on_change,
                on_error,
            });
            inner.watchers.push(Arc::clone(&watcher));
            let initial = inner.subtree(path).unwrap_or(Value::Null);
            (watcher, initial)
        };

        // Mirror of the backend contract: a new listener is primed with
        // the current value before any change events.
        (watcher.on_change)(initial);

        let id = watcher.id;
        let inner = Arc::clone(&self.inner);
        StoreSubscription::new(move || {
            inner.lock().unwrap().watchers.retain(|w| w.id != id);
        })
    }
}
