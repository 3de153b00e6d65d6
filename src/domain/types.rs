//! # Domain Types
//!
//! GitLab records as the REST v4 API returns them (only the fields the bot reads),
//! plus the small enums shared by the command handlers and the client.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Project {
    pub id: u64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub path_with_namespace: String,
    #[serde(default)]
    pub web_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct User {
    pub id: u64,
    pub username: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub web_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Milestone {
    pub id: u64,
    pub iid: u64,
    pub title: String,
    #[serde(default)]
    pub state: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Issue {
    pub id: u64,
    pub iid: u64,
    pub title: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub web_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Pipeline {
    pub id: u64,
    #[serde(rename = "ref", default)]
    pub git_ref: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub web_url: String,
}

/// A CI job. The chat surface keeps the older "build" name.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Build {
    pub id: u64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub stage: String,
    #[serde(rename = "ref", default)]
    pub git_ref: String,
    #[serde(default)]
    pub status: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Environment {
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Deployment {
    pub id: u64,
    pub iid: u64,
    #[serde(rename = "ref", default)]
    pub git_ref: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub environment: Option<Environment>,
}

/// Token and base URL a room talks to GitLab with.
#[derive(Clone, PartialEq)]
pub struct Credentials {
    pub token: String,
    pub base_url: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("token", &"***")
            .field("base_url", &self.base_url)
            .finish()
    }
}

/// Result of playing or erasing a job.
/// GitLab rejects the call when the job already ran, was already erased or does not exist.
#[derive(Debug, Clone, PartialEq)]
pub enum JobOutcome {
    Record(Build),
    Unavailable,
}

/// `state_event` sent when editing an issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IssueAction {
    Close,
    Reopen,
}

impl IssueAction {
    pub fn as_str(&self) -> &str {
        match self {
            IssueAction::Close => "close",
            IssueAction::Reopen => "reopen",
        }
    }
}

impl std::str::FromStr for IssueAction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "close" => Ok(IssueAction::Close),
            "reopen" => Ok(IssueAction::Reopen),
            other => Err(format!("unsupported issue action `{}`", other)),
        }
    }
}

/// Fields changed by an issue edit.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct IssueEdit {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assignee_ids: Option<Vec<u64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state_event: Option<String>,
}

impl IssueEdit {
    pub fn assign(user_id: u64) -> Self {
        Self {
            assignee_ids: Some(vec![user_id]),
            ..Default::default()
        }
    }

    pub fn state(action: IssueAction) -> Self {
        Self {
            state_event: Some(action.as_str().to_string()),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewIssue {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// `all|opened|closed` filter accepted by the list commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StateFilter {
    #[default]
    All,
    Opened,
    Closed,
}

impl StateFilter {
    pub fn from_param(value: Option<&str>) -> Self {
        match value.map(|v| v.to_lowercase()).as_deref() {
            Some("opened") => StateFilter::Opened,
            Some("closed") => StateFilter::Closed,
            _ => StateFilter::All,
        }
    }

    /// Value of the `state` query parameter for issues.
    pub fn issue_state(&self) -> Option<&str> {
        match self {
            StateFilter::All => None,
            StateFilter::Opened => Some("opened"),
            StateFilter::Closed => Some("closed"),
        }
    }

    /// Milestones call open ones "active".
    pub fn milestone_state(&self) -> Option<&str> {
        match self {
            StateFilter::All => None,
            StateFilter::Opened => Some("active"),
            StateFilter::Closed => Some("closed"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_deserializes_ref() {
        let json = r#"{"id": 7, "name": "test", "stage": "test", "ref": "main", "status": "failed", "extra": 1}"#;
        let build: Build = serde_json::from_str(json).unwrap();
        assert_eq!(build.git_ref, "main");
        assert_eq!(build.status, "failed");
    }

    #[test]
    fn test_deployment_environment_optional() {
        let json = r#"{"id": 1, "iid": 2, "ref": "main"}"#;
        let deployment: Deployment = serde_json::from_str(json).unwrap();
        assert_eq!(deployment.environment, None);
        assert_eq!(deployment.status, None);
    }

    #[test]
    fn test_issue_action_parse() {
        assert_eq!("CLOSE".parse::<IssueAction>(), Ok(IssueAction::Close));
        assert_eq!("reopen".parse::<IssueAction>(), Ok(IssueAction::Reopen));
        assert!("remove".parse::<IssueAction>().is_err());
    }

    #[test]
    fn test_issue_edit_serializes_only_set_fields() {
        let json = serde_json::to_value(IssueEdit::state(IssueAction::Close)).unwrap();
        assert_eq!(json, serde_json::json!({"state_event": "close"}));
        let json = serde_json::to_value(IssueEdit::assign(4)).unwrap();
        assert_eq!(json, serde_json::json!({"assignee_ids": [4]}));
    }

    #[test]
    fn test_state_filter() {
        assert_eq!(StateFilter::from_param(None), StateFilter::All);
        assert_eq!(StateFilter::from_param(Some("Closed")), StateFilter::Closed);
        assert_eq!(StateFilter::Opened.issue_state(), Some("opened"));
        assert_eq!(StateFilter::Opened.milestone_state(), Some("active"));
        assert_eq!(StateFilter::All.issue_state(), None);
    }
}
