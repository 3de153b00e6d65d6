//! # Milestone Command
//!
//! Handles `milestone list [project_id] [all|opened|closed]`.
//! This is the one project command that accepts an explicit project id.

use super::CommandContext;
use crate::application::render;
use crate::domain::types::StateFilter;
use crate::strings::messages;
use anyhow::Result;

pub async fn handle_milestone_list(ctx: &CommandContext<'_>) -> Result<String> {
    let project = ctx.project()?;
    let state = StateFilter::from_param(ctx.params.get("status"));
    let milestones = ctx.api.list_milestones(project, state).await?;
    Ok(render::render_milestones(
        &messages::milestones_header(project),
        &milestones,
        ctx.params,
    ))
}
