//! Implements FilterStatePort using a JSON file.
//!
//! Remembers the last filters (text, selections, price, sort) between runs.

use crate::domain::{DomainError, FilterSet};
use crate::ports::FilterStatePort;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};

/// On-disk layout. Versioned so an incompatible layout is ignored, not misread.
#[derive(Debug, Serialize, Deserialize)]
struct StateData {
    version: u32,
    filters: FilterSet,
}

const STATE_VERSION: u32 = 1;

/// JSON file-based filter storage.
pub struct FilterStateJson {
    path: PathBuf,
}

impl FilterStateJson {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

#[async_trait::async_trait]
impl FilterStatePort for FilterStateJson {
    /// A missing, unreadable or outdated file means "nothing saved".
    async fn load(&self) -> Result<Option<FilterSet>, DomainError> {
        let raw = match fs::read_to_string(&self.path).await {
            Ok(s) => s,
            Err(_) => return Ok(None),
        };
        match serde_json::from_str::<StateData>(&raw) {
            Ok(data) if data.version == STATE_VERSION => Ok(Some(data.filters)),
            Ok(data) => {
                warn!(version = data.version, "ignoring filter state with unknown version");
                Ok(None)
            }
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "ignoring unreadable filter state");
                Ok(None)
            }
        }
    }

    /// Atomic save: write temp file, sync_all(), rename over the target.
    async fn save(&self, filters: &FilterSet) -> Result<(), DomainError> {
        let data = StateData {
            version: STATE_VERSION,
            filters: filters.clone(),
        };
        let json =
            serde_json::to_string_pretty(&data).map_err(|e| DomainError::State(e.to_string()))?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| DomainError::State(format!("create state dir: {}", e)))?;
        }

        let temp_path = self.path.with_extension("json.tmp");
        let mut f = fs::File::create(&temp_path)
            .await
            .map_err(|e| DomainError::State(format!("create temp file: {}", e)))?;
        f.write_all(json.as_bytes())
            .await
            .map_err(|e| DomainError::State(format!("write temp file: {}", e)))?;
        f.sync_all()
            .await
            .map_err(|e| DomainError::State(format!("sync temp file: {}", e)))?;
        drop(f);

        fs::rename(&temp_path, &self.path)
            .await
            .map_err(|e| DomainError::State(format!("atomic rename failed: {}", e)))?;

        debug!(path = %self.path.display(), "filters saved");
        Ok(())
    }
}
