//! TTL'd in-process cache for the most recent record snapshot.
//!
//! The upstream dashboard kept the last-fetched dataset in a module-level
//! global; here the same lifetime lives behind an owned object with explicit
//! get/put/clear.

use std::time::{Duration, Instant};

use parking_lot::RwLock;

use crate::store::Snapshot;

struct CacheEntry {
    snapshot: Snapshot,
    inserted_at: Instant,
}

/// Holds the one dataset snapshot the dashboard works from.
pub struct SnapshotCache {
    entry: RwLock<Option<CacheEntry>>,
    ttl: Duration,
}

impl SnapshotCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entry: RwLock::new(None),
            ttl,
        }
    }

    /// The cached snapshot, unless missing or past its TTL.
    pub fn get(&self) -> Option<Snapshot> {
        let guard = self.entry.read();
        let entry = guard.as_ref()?;
        if entry.inserted_at.elapsed() > self.ttl {
            return None;
        }
        Some(entry.snapshot.clone())
    }

    pub fn put(&self, snapshot: Snapshot) {
        *self.entry.write() = Some(CacheEntry {
            snapshot,
            inserted_at: Instant::now(),
        });
    }

    pub fn clear(&self) {
        *self.entry.write() = None;
    }
}
