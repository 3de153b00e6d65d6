//! # Brain Keys
//!
//! Centralized definitions for the keys room context is stored under.
//! Every key is suffixed with the room id so rooms never share context.

pub const PROJECT_PREFIX: &str = "context_project_by_room_";
pub const TOKEN_PREFIX: &str = "context_token_by_room_";
pub const URL_PREFIX: &str = "context_url_by_room_";

/// Key of the room's default project id.
pub fn project_key(room_id: &str) -> String {
    format!("{}{}", PROJECT_PREFIX, room_id)
}

/// Key of the room's access token.
pub fn token_key(room_id: &str) -> String {
    format!("{}{}", TOKEN_PREFIX, room_id)
}

/// Key of the room's GitLab base URL.
pub fn url_key(room_id: &str) -> String {
    format!("{}{}", URL_PREFIX, room_id)
}
