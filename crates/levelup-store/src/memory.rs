//! In-memory snapshot store.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;

use levelup_core::traits::SnapshotStore;

/// Holds the snapshot in memory. Useful for tests and throwaway sessions.
#[derive(Debug, Default)]
pub struct MemoryStore {
    snapshot: Mutex<Option<String>>,
    save_count: AtomicU32,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with `snapshot` already stored.
    pub fn with_snapshot(snapshot: impl Into<String>) -> Self {
        Self {
            snapshot: Mutex::new(Some(snapshot.into())),
            save_count: AtomicU32::new(0),
        }
    }

    /// The currently stored snapshot.
    pub fn contents(&self) -> Option<String> {
        self.snapshot
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Number of `save` calls so far.
    pub fn save_count(&self) -> u32 {
        self.save_count.load(Ordering::Relaxed)
    }
}

impl SnapshotStore for MemoryStore {
    fn load(&self) -> anyhow::Result<Option<String>> {
        Ok(self.contents())
    }

    fn save(&self, snapshot: &str) -> anyhow::Result<()> {
        *self.snapshot.lock().unwrap_or_else(|e| e.into_inner()) = Some(snapshot.to_string());
        self.save_count.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }
}
