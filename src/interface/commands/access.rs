//! # Access Command
//!
//! Handles `access config <token> [url]`.
//! Stores the room's GitLab token and base URL. The token is never echoed back.

use crate::application::context::RoomContextResolver;
use crate::application::params::Params;
use crate::strings::messages;
use anyhow::Result;

pub async fn handle_access_config(
    resolver: &RoomContextResolver,
    room_id: &str,
    params: &Params,
) -> Result<String> {
    let Some(token) = params.get("token") else {
        return Ok(messages::ACCESS_USAGE.to_string());
    };
    let url = match params.get("url") {
        Some(url) => url.trim_end_matches('/').to_string(),
        None => {
            tracing::info!("access config without url, using {}", resolver.default_url());
            resolver.default_url().to_string()
        }
    };

    resolver.set_credentials(room_id, token, &url).await?;
    Ok(messages::access_configured(&url))
}
