use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{GeneratedImageRecord, RecordStore};
use crate::error::Result;

/// Process-local store, emptied on restart
#[derive(Default)]
pub struct MemoryStore {
    records: RwLock<Vec<GeneratedImageRecord>>,
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn insert(&self, record: GeneratedImageRecord) -> Result<()> {
        self.records.write().await.push(record);
        Ok(())
    }

    async fn list_for_owner(&self, owner: &str) -> Result<Vec<GeneratedImageRecord>> {
        Ok(self
            .records
            .read()
            .await
            .iter()
            .filter(|record| record.owner == owner)
            .cloned()
            .collect())
    }
}
