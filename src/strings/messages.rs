//! # Messages
//!
//! Contains constant strings and format functions for user-facing messages.
//! Includes guidance, reply headers, empty-result fallbacks and failure notices.

// Guidance
pub fn set_project_guidance(bot: &str) -> String {
    format!("Use `{bot} project set #PROJECT_ID` to set default project")
}

pub fn access_guidance(bot: &str) -> String {
    format!("Use `{bot} access config GITLAB_TOKEN GITLAB_URL` to set gitlab's access key")
}

pub const ACCESS_USAGE: &str = "You need to specify an access token and a gitlab url...";

pub fn access_configured(url: &str) -> String {
    format!("Access token set for `{url}`")
}

// Headers
pub const PROJECTS_HEADER: &str = "Here is your list of projects\n";
pub const USERS_HEADER: &str = "Here is your list of users\n";

pub fn milestones_header(project: &str) -> String {
    format!("Milestones from **Project #{project}**\n")
}

pub fn builds_header(project: &str) -> String {
    format!("Builds from **Project #{project}**\n")
}

pub fn playing_build(build: u64, project: &str) -> String {
    format!("Playing build {build} in **Project #{project}**\n")
}

pub fn retrying_build(build: u64, project: &str) -> String {
    format!("Retrying build {build} in **Project #{project}**\n")
}

pub fn erasing_build(build: u64, project: &str) -> String {
    format!("Erasing build {build} in **Project #{project}**\n")
}

pub fn issues_header(project: &str) -> String {
    format!("Issues from **Project #{project}**\n")
}

pub fn issue_created(project: &str) -> String {
    format!("Issue created in **Project #{project}**\n")
}

pub fn issue_state_changed(issue: u64, state: &str, project: &str) -> String {
    format!("Issue {issue} is now {state} in **Project #{project}**\n")
}

pub fn pipelines_header(project: &str) -> String {
    format!("Pipeline list in **Project #{project}**\n")
}

pub fn deployments_header(project: &str) -> String {
    format!("Deployment list in **Project #{project}**\n")
}

// Outcomes
pub const BUILD_ALREADY_EXECUTED: &str = "Build already executed or nonexistent";
pub const BUILD_ALREADY_ERASED: &str = "Build already erased or nonexistent";

pub fn default_project_set(id: u64, name: &str) -> String {
    format!("Default project set to `#{id} - {name}`")
}

pub fn project_not_found(id: &str) -> String {
    format!("Project #{id} not found")
}

pub fn user_not_found(username: &str) -> String {
    format!("User with username `{username}` not found")
}

pub fn issue_assigned(username: &str, project: &str) -> String {
    format!("Issue assigned to `{username}` in **Project #{project}**")
}

pub fn issue_edit_failed(issue: u64) -> String {
    format!("There was a problem editing issue #{issue}")
}

pub fn issue_removed(issue: u64, project: &str) -> String {
    format!("Issue {issue} was removed in **Project #{project}**")
}

pub fn issue_remove_failed(issue: u64, project: &str) -> String {
    format!("There was a problem removing issue {issue} in **Project #{project}**")
}

pub fn remote_failed(err: &str) -> String {
    format!("GitLab request failed: {err}")
}

pub const INTERNAL_ERROR: &str = "Something went wrong handling that command, check the bot logs.";

// Empty results
pub const NO_PROJECTS: &str = "**No projects found**";
pub const NO_USERS: &str = "**No users found in this project**";
pub const NO_MILESTONES: &str = "**No milestones found in this project**";
pub const NO_ISSUES: &str = "**No issues found in this project**";
pub const NO_PIPELINES: &str = "**No pipelines found in this project**";
pub const NO_BUILDS: &str = "**No builds found in this project**";
pub const NO_DEPLOYMENTS: &str = "**No deployments found in this project**";
