use crate::domain::traits::Brain;
use anyhow::{Context, Result};
use async_trait::async_trait;
use redis::AsyncCommands;
use redis::aio::ConnectionManager;

const KEY_PREFIX: &str = "gitbot:";

/// Brain backed by Redis, so several bot processes see the same room context.
#[derive(Clone)]
pub struct RedisBrain {
    manager: ConnectionManager,
}

impl RedisBrain {
    pub async fn connect(url: &str) -> Result<Self> {
        let client = redis::Client::open(url).context("Invalid redis url")?;
        let manager = ConnectionManager::new(client)
            .await
            .context("Failed to connect to redis")?;
        tracing::info!("Brain connected to redis");
        Ok(Self { manager })
    }
}

#[async_trait]
impl Brain for RedisBrain {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let mut conn = self.manager.clone();
        let value: Option<String> = conn.get(format!("{KEY_PREFIX}{key}")).await?;
        Ok(value)
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut conn = self.manager.clone();
        let _: () = conn.set(format!("{KEY_PREFIX}{key}"), value).await?;
        Ok(())
    }
}
