//! The record store collaborator — an async provider seam, a TTL'd snapshot
//! cache, and duplicate-id reconciliation in front of the analytics engines.

pub mod cache;
pub mod provider;
pub mod store;

pub use cache::SnapshotCache;
pub use provider::{RecordProvider, StaticProvider};
pub use store::{RecordStore, Snapshot};
