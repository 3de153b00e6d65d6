//! # Domain Traits
//!
//! Abstract interfaces for core system components (Chat, Brain, GitLab).
//! Allows for pluggable implementations in the Infrastructure layer.

use crate::domain::error::GitlabError;
use crate::domain::types::{
    Build, Credentials, Deployment, Issue, IssueEdit, JobOutcome, Milestone, NewIssue, Pipeline,
    Project, StateFilter, User,
};
use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;

/// Abstract interface for a Chat Provider (e.g., Matrix, Slack, Console)
#[async_trait]
pub trait ChatProvider: Send + Sync {
    /// Send a message to the room
    async fn send_message(&self, content: &str) -> Result<String, String>;

    /// Send a typing indicator
    async fn typing(&self, active: bool) -> Result<(), String>;

    /// Get the current room ID
    fn room_id(&self) -> String;
}

/// Key/value store holding per-room context across restarts.
#[async_trait]
pub trait Brain: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>>;

    async fn set(&self, key: &str, value: &str) -> Result<()>;
}

/// The GitLab operations the chat commands use.
/// `project` is the numeric id or the URL-encoded path of a project.
#[async_trait]
pub trait GitlabApi: Send + Sync {
    async fn search_projects(&self, term: &str) -> Result<Vec<Project>, GitlabError>;

    /// Projects the token is a member of, or every visible project when `all` is set.
    async fn list_projects(&self, all: bool) -> Result<Vec<Project>, GitlabError>;

    /// `Ok(None)` when the project does not exist.
    async fn get_project(&self, project: &str) -> Result<Option<Project>, GitlabError>;

    async fn list_users(&self) -> Result<Vec<User>, GitlabError>;

    /// Exact username lookup over every user, not just the first page.
    async fn find_user(&self, username: &str) -> Result<Option<User>, GitlabError>;

    async fn list_milestones(
        &self,
        project: &str,
        state: StateFilter,
    ) -> Result<Vec<Milestone>, GitlabError>;

    async fn list_builds(&self, project: &str, scope: Option<&str>)
    -> Result<Vec<Build>, GitlabError>;

    async fn play_build(&self, project: &str, build: u64) -> Result<JobOutcome, GitlabError>;

    async fn retry_build(&self, project: &str, build: u64) -> Result<Build, GitlabError>;

    async fn erase_build(&self, project: &str, build: u64) -> Result<JobOutcome, GitlabError>;

    async fn list_issues(&self, project: &str, state: StateFilter)
    -> Result<Vec<Issue>, GitlabError>;

    async fn create_issue(&self, project: &str, issue: &NewIssue) -> Result<Issue, GitlabError>;

    async fn edit_issue(
        &self,
        project: &str,
        issue: u64,
        edit: &IssueEdit,
    ) -> Result<Issue, GitlabError>;

    /// `Ok(true)` only when GitLab confirmed the deletion.
    async fn remove_issue(&self, project: &str, issue: u64) -> Result<bool, GitlabError>;

    async fn list_pipelines(&self, project: &str) -> Result<Vec<Pipeline>, GitlabError>;

    async fn list_deployments(&self, project: &str) -> Result<Vec<Deployment>, GitlabError>;
}

/// Builds a client for a room's credentials.
pub trait GitlabConnector: Send + Sync {
    fn connect(&self, credentials: &Credentials) -> Result<Arc<dyn GitlabApi>, GitlabError>;
}
