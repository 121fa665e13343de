use std::{io::ErrorKind, path::PathBuf};

use async_trait::async_trait;
use tokio::{fs, io::AsyncWriteExt, sync::Mutex};

use super::{GeneratedImageRecord, RecordStore};
use crate::error::{Result, StudioError};

/// Append-only JSON Lines file, one record per line
pub struct FileStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileStore {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            write_lock: Mutex::new(()),
        }
    }
}

#[async_trait]
impl RecordStore for FileStore {
    async fn insert(&self, record: GeneratedImageRecord) -> Result<()> {
        let mut line = serde_json::to_string(&record).map_err(|e| StudioError::Store(e.to_string()))?;
        line.push('\n');

        let _guard = self.write_lock.lock().await;

        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| StudioError::Store(format!("{}: {e}", parent.display())))?;
        }

        let mut file = fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await
            .map_err(|e| StudioError::Store(format!("{}: {e}", self.path.display())))?;

        file.write_all(line.as_bytes())
            .await
            .map_err(|e| StudioError::Store(format!("{}: {e}", self.path.display())))?;

        file.flush().await.map_err(|e| StudioError::Store(e.to_string()))
    }

    async fn list_for_owner(&self, owner: &str) -> Result<Vec<GeneratedImageRecord>> {
        let contents = match fs::read_to_string(&self.path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(StudioError::Store(format!("{}: {e}", self.path.display()))),
        };

        let mut records = Vec::new();
        for (number, line) in contents.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }

            match serde_json::from_str::<GeneratedImageRecord>(line) {
                Ok(record) if record.owner == owner => records.push(record),
                Ok(_) => {}
                Err(e) => {
                    tracing::warn!(path = %self.path.display(), line = number + 1, error = %e, "skipping unreadable record");
                }
            }
        }

        Ok(records)
    }
}
