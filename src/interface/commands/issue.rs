//! # Issue Commands
//!
//! Handles `issue list|create|assign|close|reopen|remove`.
//! `assign` is the only multi-step flow: the user lookup must succeed before
//! the issue is edited, and nothing is undone if the edit then fails.

use super::CommandContext;
use crate::application::render;
use crate::domain::types::{IssueAction, IssueEdit, NewIssue, StateFilter};
use crate::strings::messages;
use anyhow::{Result, anyhow};

pub async fn handle_issue_list(ctx: &CommandContext<'_>) -> Result<String> {
    let project = ctx.project()?;
    let state = StateFilter::from_param(ctx.params.get("status"));
    let issues = ctx.api.list_issues(project, state).await?;
    Ok(render::render_issues(
        &messages::issues_header(project),
        &issues,
        ctx.params,
    ))
}

pub async fn handle_issue_create(ctx: &CommandContext<'_>) -> Result<String> {
    let project = ctx.project()?;
    let new_issue = NewIssue {
        title: ctx.params.require("title")?.to_string(),
        description: ctx.params.get("description").map(str::to_string),
    };
    let issue = ctx.api.create_issue(project, &new_issue).await?;
    Ok(render::render_issues(
        &messages::issue_created(project),
        &[issue],
        ctx.params,
    ))
}

pub async fn handle_issue_assign(ctx: &CommandContext<'_>) -> Result<String> {
    let project = ctx.project()?;
    let issue = ctx.params.id("issue")?;
    let username = ctx.params.require("username")?;

    let Some(user) = ctx.api.find_user(username).await? else {
        return Ok(messages::user_not_found(username));
    };

    ctx.api
        .edit_issue(project, issue, &IssueEdit::assign(user.id))
        .await?;
    Ok(messages::issue_assigned(&user.username, project))
}

pub async fn handle_issue_state(ctx: &CommandContext<'_>) -> Result<String> {
    let project = ctx.project()?;
    let issue = ctx.params.id("issue")?;
    let action = ctx
        .params
        .require("action")?
        .parse::<IssueAction>()
        .map_err(|e| anyhow!(e))?;

    match ctx.api.edit_issue(project, issue, &IssueEdit::state(action)).await {
        Ok(record) => Ok(render::render_issues(
            &messages::issue_state_changed(record.iid, &record.state, project),
            &[record],
            ctx.params,
        )),
        Err(e) => {
            tracing::warn!("Editing issue {} in {} failed: {}", issue, project, e);
            Ok(messages::issue_edit_failed(issue))
        }
    }
}

pub async fn handle_issue_remove(ctx: &CommandContext<'_>) -> Result<String> {
    let project = ctx.project()?;
    let issue = ctx.params.id("issue")?;

    match ctx.api.remove_issue(project, issue).await {
        Ok(true) => Ok(messages::issue_removed(issue, project)),
        Ok(false) => Ok(messages::issue_remove_failed(issue, project)),
        Err(e) => {
            tracing::warn!("Removing issue {} in {} failed: {}", issue, project, e);
            Ok(messages::issue_remove_failed(issue, project))
        }
    }
}
