use crate::domain::model::StatusRecord;
use crate::domain::ports::StatusStore;
use crate::utils::error::Result;
use std::path::{Path, PathBuf};

/// Keeps the last observed status as a single pretty-printed JSON file.
#[derive(Debug, Clone)]
pub struct JsonStatusStore {
    path: PathBuf,
}

impl JsonStatusStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// `Ok(None)` when no record has been written yet.
    pub async fn read_record(&self) -> Result<Option<StatusRecord>> {
        let data = match tokio::fs::read(&self.path).await {
            Ok(data) => data,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        Ok(Some(serde_json::from_slice(&data)?))
    }

    /// Writes next to the target and renames over it, so a reader never sees
    /// a partial file.
    pub async fn write_record(&self, record: &StatusRecord) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }

        let mut tmp_name = self.path.as_os_str().to_owned();
        tmp_name.push(".tmp");
        let tmp_path = PathBuf::from(tmp_name);

        let json = serde_json::to_vec_pretty(record)?;
        tokio::fs::write(&tmp_path, json).await?;
        tokio::fs::rename(&tmp_path, &self.path).await?;
        Ok(())
    }
}

impl StatusStore for JsonStatusStore {
    async fn load(&self) -> Option<StatusRecord> {
        match self.read_record().await {
            Ok(record) => record,
            Err(e) => {
                tracing::error!(
                    "✗ Error loading previous status from {}: {}",
                    self.path.display(),
                    e
                );
                None
            }
        }
    }

    async fn save(&self, record: &StatusRecord) {
        match self.write_record(record).await {
            Ok(()) => tracing::info!("💾 Status saved to {}", self.path.display()),
            Err(e) => tracing::error!("✗ Error saving status to {}: {}", self.path.display(), e),
        }
    }
}
