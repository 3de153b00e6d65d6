//! # Pipeline & Deployment Commands
//!
//! Handles `pipeline list` and `deployment list`.

use super::CommandContext;
use crate::application::render;
use crate::strings::messages;
use anyhow::Result;

pub async fn handle_pipeline_list(ctx: &CommandContext<'_>) -> Result<String> {
    let project = ctx.project()?;
    let pipelines = ctx.api.list_pipelines(project).await?;
    Ok(render::render_pipelines(
        &messages::pipelines_header(project),
        &pipelines,
        ctx.params,
    ))
}

pub async fn handle_deployment_list(ctx: &CommandContext<'_>) -> Result<String> {
    let project = ctx.project()?;
    let deployments = ctx.api.list_deployments(project).await?;
    Ok(render::render_deployments(
        &messages::deployments_header(project),
        &deployments,
        ctx.params,
    ))
}
