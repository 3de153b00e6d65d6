//! # Command Handlers
//!
//! Contains one handler function per supported chat command.
//! Handlers are invoked by the Router once parameters are extracted and the
//! room's project and credentials are resolved. Each returns the reply text;
//! the router sends it, so every command answers exactly once.

pub mod access;
pub mod build;
pub mod help;
pub mod issue;
pub mod milestone;
pub mod pipeline;
pub mod project;
pub mod user;

use crate::application::context::RoomContextResolver;
use crate::application::params::Params;
use crate::domain::traits::GitlabApi;

/// Everything a remote-backed handler needs for one invocation.
pub struct CommandContext<'a> {
    pub room_id: &'a str,
    pub bot_name: &'a str,
    pub params: &'a Params,
    pub api: &'a dyn GitlabApi,
    pub resolver: &'a RoomContextResolver,
}

impl CommandContext<'_> {
    /// The resolved project. Router gating guarantees it for project commands.
    pub fn project(&self) -> anyhow::Result<&str> {
        self.params.require("project")
    }
}
