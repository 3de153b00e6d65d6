//! # Brain Stores
//!
//! Implementations of the `Brain` key/value trait.
//! `memory` keeps everything in-process, `file` persists a JSON map to disk and
//! `redis` (behind the `redis` feature) shares context between bot instances.

pub mod file;
pub mod memory;
#[cfg(feature = "redis")]
pub mod redis;

use crate::domain::config::{BrainBackend, BrainConfig};
use crate::domain::traits::Brain;
use anyhow::Result;
use std::sync::Arc;

pub use file::FileBrain;
pub use memory::MemoryBrain;

/// Opens the backend selected in `config.yaml`.
pub async fn open(config: &BrainConfig) -> Result<Arc<dyn Brain>> {
    match config.backend {
        BrainBackend::Memory => {
            tracing::warn!("Using in-memory brain; room context is lost on restart");
            Ok(Arc::new(MemoryBrain::new()))
        }
        BrainBackend::File => Ok(Arc::new(FileBrain::open(&config.path).await?)),
        #[cfg(feature = "redis")]
        BrainBackend::Redis => {
            let url = config
                .redis_url
                .as_deref()
                .ok_or_else(|| anyhow::anyhow!("brain.redis_url is required for the redis backend"))?;
            Ok(Arc::new(redis::RedisBrain::connect(url).await?))
        }
        #[cfg(not(feature = "redis"))]
        BrainBackend::Redis => Err(anyhow::anyhow!(
            "brain.backend is redis but gitbot was built without the `redis` feature"
        )),
    }
}
