//! # Room Context
//!
//! Per-room settings kept in the brain: the default project and the GitLab
//! token/URL. Also holds the two gates a command must pass before any remote
//! call is made.

use anyhow::Result;
use std::sync::Arc;

use crate::application::params::Params;
use crate::domain::config::GitlabConfig;
use crate::domain::keys;
use crate::domain::traits::Brain;
use crate::domain::types::Credentials;

/// Context of a single chat room, read fresh from the brain per message.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RoomContext {
    pub room_id: String,
    pub default_project_id: Option<String>,
    pub access_token: Option<String>,
    pub base_url: Option<String>,
}

pub struct RoomContextResolver {
    brain: Arc<dyn Brain>,
    default_url: String,
    default_token: Option<String>,
}

impl RoomContextResolver {
    pub fn new(brain: Arc<dyn Brain>, gitlab: &GitlabConfig) -> Self {
        Self {
            brain,
            default_url: gitlab.url.clone(),
            default_token: gitlab.token.clone().filter(|t| !t.trim().is_empty()),
        }
    }

    /// URL used when a room configures a token without one.
    pub fn default_url(&self) -> &str {
        &self.default_url
    }

    pub async fn resolve(&self, room_id: &str) -> Result<RoomContext> {
        Ok(RoomContext {
            room_id: room_id.to_string(),
            default_project_id: self.read(&keys::project_key(room_id)).await?,
            access_token: self.read(&keys::token_key(room_id)).await?,
            base_url: self.read(&keys::url_key(room_id)).await?,
        })
    }

    pub async fn set_default_project(&self, room_id: &str, project_id: &str) -> Result<()> {
        tracing::info!("Room {} default project -> {}", room_id, project_id);
        self.brain.set(&keys::project_key(room_id), project_id).await
    }

    pub async fn set_credentials(&self, room_id: &str, token: &str, base_url: &str) -> Result<()> {
        tracing::info!("Room {} GitLab access set for {}", room_id, base_url);
        self.brain.set(&keys::token_key(room_id), token).await?;
        self.brain.set(&keys::url_key(room_id), base_url).await
    }

    /// Credentials for the room, falling back to the process defaults.
    /// Fallback values are persisted into the room on first use.
    /// `None` when neither the room nor the process has a token.
    pub async fn ensure_credentials(&self, context: &RoomContext) -> Result<Option<Credentials>> {
        let base_url = match &context.base_url {
            Some(url) => url.clone(),
            None => {
                self.brain
                    .set(&keys::url_key(&context.room_id), &self.default_url)
                    .await?;
                self.default_url.clone()
            }
        };

        let token = match (&context.access_token, &self.default_token) {
            (Some(token), _) => token.clone(),
            (None, Some(fallback)) => {
                tracing::info!("Room {} using the process-wide GitLab token", context.room_id);
                self.brain
                    .set(&keys::token_key(&context.room_id), fallback)
                    .await?;
                fallback.clone()
            }
            (None, None) => {
                tracing::info!("Room {} has no GitLab token", context.room_id);
                return Ok(None);
            }
        };

        Ok(Some(Credentials { token, base_url }))
    }

    async fn read(&self, key: &str) -> Result<Option<String>> {
        Ok(self
            .brain
            .get(key)
            .await?
            .filter(|v| !v.trim().is_empty()))
    }
}

/// Gate for project commands: the room must have a default project.
/// Returns the project the command runs against, which is an explicit
/// `project` capture when the command has one and the room default otherwise.
pub fn require_project(params: &mut Params, context: &RoomContext) -> Option<String> {
    let default = context.default_project_id.clone()?;
    let project = params.get("project").map(str::to_string).unwrap_or(default);
    params.set("project", project.clone());
    Some(project)
}
