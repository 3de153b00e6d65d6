//! # Build Commands
//!
//! Handles `build list|play|retry|erase`.
//! Play and erase report GitLab's refusal as an informational reply, not an error.

use super::CommandContext;
use crate::application::render;
use crate::domain::types::JobOutcome;
use crate::strings::messages;
use anyhow::Result;

pub async fn handle_build_list(ctx: &CommandContext<'_>) -> Result<String> {
    let project = ctx.project()?;
    let builds = ctx.api.list_builds(project, ctx.params.get("scope")).await?;
    Ok(render::render_builds(
        &messages::builds_header(project),
        &builds,
        ctx.params,
    ))
}

pub async fn handle_build_play(ctx: &CommandContext<'_>) -> Result<String> {
    let project = ctx.project()?;
    let build = ctx.params.id("build")?;
    let header = messages::playing_build(build, project);
    Ok(match ctx.api.play_build(project, build).await? {
        JobOutcome::Record(record) => render::render_builds(&header, &[record], ctx.params),
        JobOutcome::Unavailable => format!("{}{}", header, messages::BUILD_ALREADY_EXECUTED),
    })
}

pub async fn handle_build_retry(ctx: &CommandContext<'_>) -> Result<String> {
    let project = ctx.project()?;
    let build = ctx.params.id("build")?;
    let record = ctx.api.retry_build(project, build).await?;
    Ok(render::render_builds(
        &messages::retrying_build(build, project),
        &[record],
        ctx.params,
    ))
}

pub async fn handle_build_erase(ctx: &CommandContext<'_>) -> Result<String> {
    let project = ctx.project()?;
    let build = ctx.params.id("build")?;
    let header = messages::erasing_build(build, project);
    Ok(match ctx.api.erase_build(project, build).await? {
        JobOutcome::Record(record) => render::render_builds(&header, &[record], ctx.params),
        JobOutcome::Unavailable => format!("{}{}", header, messages::BUILD_ALREADY_ERASED),
    })
}
