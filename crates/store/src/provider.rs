//! The seam between the store and whatever supplies upstream rows.

use adboard_core::error::AdboardResult;
use adboard_core::types::RawAdRecord;
use async_trait::async_trait;

/// Supplies the raw upstream rows a snapshot is built from. Implementations
/// own all network and pagination concerns; the store only sees the rows.
#[async_trait]
pub trait RecordProvider: Send + Sync {
    async fn fetch(&self) -> AdboardResult<Vec<RawAdRecord>>;
}

/// In-memory provider for tests and local fixtures.
pub struct StaticProvider {
    rows: Vec<RawAdRecord>,
}

impl StaticProvider {
    pub fn new(rows: Vec<RawAdRecord>) -> Self {
        Self { rows }
    }
}

#[async_trait]
impl RecordProvider for StaticProvider {
    async fn fetch(&self) -> AdboardResult<Vec<RawAdRecord>> {
        Ok(self.rows.clone())
    }
}
