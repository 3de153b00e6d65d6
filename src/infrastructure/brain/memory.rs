use crate::domain::traits::Brain;
use anyhow::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::Mutex;

/// Process-local brain. Used by tests and the `memory` backend.
#[derive(Debug, Default)]
pub struct MemoryBrain {
    data: Mutex<HashMap<String, String>>,
}

impl MemoryBrain {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Brain for MemoryBrain {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.data.lock().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        self.data
            .lock()
            .await
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}
