//! # File Brain
//!
//! Persists the brain as a flat JSON object (e.g. `data/brain.json`).
//! The whole map is rewritten on every `set`; writes are serialized by the lock.

use crate::domain::traits::Brain;
use anyhow::{Context, Result};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;

pub struct FileBrain {
    path: PathBuf,
    data: Mutex<BTreeMap<String, String>>,
}

impl FileBrain {
    /// Loads the map from `path`, or starts empty when the file is missing or unreadable.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let data = match tokio::fs::read_to_string(&path).await {
            Ok(content) => match serde_json::from_str(&content) {
                Ok(map) => map,
                Err(e) => {
                    tracing::warn!("Ignoring corrupt brain file {}: {}", path.display(), e);
                    BTreeMap::new()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => {
                return Err(e).with_context(|| format!("Failed to read {}", path.display()));
            }
        };
        tracing::info!("Brain loaded from {} ({} keys)", path.display(), data.len());
        Ok(Self {
            path,
            data: Mutex::new(data),
        })
    }

    async fn save(&self, data: &BTreeMap<String, String>) -> Result<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(parent)
                .await
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let content = serde_json::to_string_pretty(data)?;
        tokio::fs::write(&self.path, content)
            .await
            .with_context(|| format!("Failed to write {}", self.path.display()))
    }
}

#[async_trait]
impl Brain for FileBrain {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.data.lock().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut guard = self.data.lock().await;
        guard.insert(key.to_string(), value.to_string());
        self.save(&guard).await
    }
}
