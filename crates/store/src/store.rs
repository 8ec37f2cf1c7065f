//! Fetch, coerce, reconcile, cache, and hand out generation-tagged
//! snapshots of the dataset.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use adboard_core::config::StoreConfig;
use adboard_core::error::{AdboardError, AdboardResult};
use adboard_core::types::{AdRecord, RawAdRecord};
use tracing::{debug, info, warn};

use crate::cache::SnapshotCache;
use crate::provider::RecordProvider;

/// An immutable, generation-tagged view of the dataset. Cloning is cheap;
/// the records are shared.
#[derive(Debug, Clone)]
pub struct Snapshot {
    generation: u64,
    records: Arc<Vec<AdRecord>>,
}

impl Snapshot {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn records(&self) -> &[AdRecord] {
        &self.records
    }
}

/// Owns the provider and the snapshot cache.
pub struct RecordStore {
    provider: Arc<dyn RecordProvider>,
    cache: SnapshotCache,
    generation: AtomicU64,
    max_records: usize,
    fetch_timeout: Duration,
}

impl RecordStore {
    pub fn new(provider: Arc<dyn RecordProvider>, config: &StoreConfig) -> Self {
        Self {
            provider,
            cache: SnapshotCache::new(Duration::from_secs(config.cache_ttl_secs)),
            generation: AtomicU64::new(0),
            max_records: config.max_records,
            fetch_timeout: Duration::from_millis(config.fetch_timeout_ms),
        }
    }

    /// Cached snapshot when fresh, otherwise a refresh.
    pub async fn get(&self) -> AdboardResult<Snapshot> {
        if let Some(snapshot) = self.cache.get() {
            debug!(generation = snapshot.generation(), "serving cached snapshot");
            return Ok(snapshot);
        }
        self.refresh().await
    }

    /// Fetch from the provider and rebuild the snapshot unconditionally.
    pub async fn refresh(&self) -> AdboardResult<Snapshot> {
        let rows = tokio::time::timeout(self.fetch_timeout, self.provider.fetch())
            .await
            .map_err(|_| AdboardError::FetchTimeout(self.fetch_timeout.as_millis() as u64))??;

        let records = self.ingest(rows);
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let snapshot = Snapshot {
            generation,
            records: Arc::new(records),
        };
        self.cache.put(snapshot.clone());
        info!(
            generation,
            records = snapshot.records().len(),
            "snapshot refreshed"
        );
        Ok(snapshot)
    }

    /// Drop the cached snapshot; the next `get` refetches.
    pub fn invalidate(&self) {
        self.cache.clear();
    }

    /// True when no newer snapshot has been produced since this one was
    /// taken. Callers discard results computed from a stale snapshot rather
    /// than merging them with newer ones.
    pub fn is_current(&self, snapshot: &Snapshot) -> bool {
        self.generation.load(Ordering::SeqCst) == snapshot.generation()
    }

    /// Coerce raw rows, reconcile duplicate ids, and apply the record bound.
    fn ingest(&self, rows: Vec<RawAdRecord>) -> Vec<AdRecord> {
        let total = rows.len();
        let mut unparseable = 0usize;
        let mut index: HashMap<String, usize> = HashMap::new();
        let mut records: Vec<AdRecord> = Vec::new();

        for raw in rows {
            let Some(record) = AdRecord::from_raw(raw) else {
                unparseable += 1;
                continue;
            };
            match index.get(&record.id) {
                Some(&slot) => {
                    if supersedes(&record, &records[slot]) {
                        records[slot] = record;
                    }
                }
                None => {
                    index.insert(record.id.clone(), records.len());
                    records.push(record);
                }
            }
        }

        if unparseable > 0 {
            warn!(unparseable, total, "dropped rows with unparseable start dates");
        }
        if records.len() > self.max_records {
            warn!(
                kept = self.max_records,
                received = records.len(),
                "record bound exceeded, truncating snapshot"
            );
            records.truncate(self.max_records);
        }
        records
    }
}

/// Duplicate-id precedence: newest `created_at` wins; when either side lacks
/// a timestamp or they tie, the later-seen record wins.
fn supersedes(candidate: &AdRecord, incumbent: &AdRecord) -> bool {
    match (candidate.created_at, incumbent.created_at) {
        (Some(new), Some(old)) => new >= old,
        _ => true,
    }
}
