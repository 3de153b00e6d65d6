//! # Project Commands
//!
//! Handles `project search`, `project list` and `project set`.
//! `project set` is what associates a chat room with a GitLab project.

use super::CommandContext;
use crate::application::render;
use crate::strings::messages;
use anyhow::Result;

pub async fn handle_project_search(ctx: &CommandContext<'_>) -> Result<String> {
    let term = ctx.params.require("search")?;
    let projects = ctx.api.search_projects(term).await?;
    Ok(render::render_projects(
        messages::PROJECTS_HEADER,
        &projects,
        ctx.params,
        &messages::set_project_guidance(ctx.bot_name),
    ))
}

pub async fn handle_project_list(ctx: &CommandContext<'_>) -> Result<String> {
    let all = ctx
        .params
        .get("status")
        .is_some_and(|s| s.eq_ignore_ascii_case("all"));
    let projects = ctx.api.list_projects(all).await?;
    Ok(render::render_projects(
        messages::PROJECTS_HEADER,
        &projects,
        ctx.params,
        &messages::set_project_guidance(ctx.bot_name),
    ))
}

pub async fn handle_project_set(ctx: &CommandContext<'_>) -> Result<String> {
    let requested = ctx.params.require("project")?;
    let Some(project) = ctx.api.get_project(requested).await? else {
        tracing::info!("Project {} not found, room {} unchanged", requested, ctx.room_id);
        return Ok(messages::project_not_found(requested));
    };

    ctx.resolver
        .set_default_project(ctx.room_id, &project.id.to_string())
        .await?;
    Ok(messages::default_project_set(project.id, &project.name))
}
