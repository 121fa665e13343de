mod file;
mod memory;

use std::sync::Arc;

use async_trait::async_trait;
use brewshot_config::StoreConfig;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub use file::FileStore;
pub use memory::MemoryStore;

use crate::{error::Result, scene::SceneParameters};

/// One generated image attributed to an identified caller
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedImageRecord {
    pub id: Uuid,
    pub owner: String,
    pub image_url: String,
    /// Elaborated scene prompt the image was generated from
    pub prompt: String,
    pub product_type: String,
    pub theme: String,
    pub mood: String,
    pub placement: String,
    pub user_addition: String,
    pub created_at: DateTime<Utc>,
}

impl GeneratedImageRecord {
    pub fn new(owner: &str, image_url: &str, prompt: &str, params: &SceneParameters) -> Self {
        Self {
            id: Uuid::new_v4(),
            owner: owner.to_string(),
            image_url: image_url.to_string(),
            prompt: prompt.to_string(),
            product_type: params.product_type.clone(),
            theme: params.theme.clone(),
            mood: params.mood.clone(),
            placement: params.placement.clone(),
            user_addition: params.user_addition.clone(),
            created_at: Utc::now(),
        }
    }
}

/// Persistence for generated-image records
#[async_trait]
pub trait RecordStore: Send + Sync {
    async fn insert(&self, record: GeneratedImageRecord) -> Result<()>;

    /// Records owned by `owner`, oldest first
    async fn list_for_owner(&self, owner: &str) -> Result<Vec<GeneratedImageRecord>>;
}

/// Build the configured record store
pub fn from_config(config: &StoreConfig) -> Arc<dyn RecordStore> {
    match config {
        StoreConfig::Memory => Arc::new(MemoryStore::default()),
        StoreConfig::File { path } => Arc::new(FileStore::new(path.clone())),
    }
}
