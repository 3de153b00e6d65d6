//! # User Command
//!
//! Handles `user list`.

use super::CommandContext;
use crate::application::render;
use crate::strings::messages;
use anyhow::Result;

pub async fn handle_user_list(ctx: &CommandContext<'_>) -> Result<String> {
    let users = ctx.api.list_users().await?;
    Ok(render::render_users(messages::USERS_HEADER, &users, ctx.params))
}
