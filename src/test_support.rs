//! In-process fakes for the chat room and the GitLab API.

use async_trait::async_trait;
use std::sync::{Arc, Mutex};

use crate::domain::error::GitlabError;
use crate::domain::traits::{ChatProvider, GitlabApi, GitlabConnector};
use crate::domain::types::{
    Build, Credentials, Deployment, Issue, IssueEdit, JobOutcome, Milestone, NewIssue, Pipeline,
    Project, StateFilter, User,
};

pub struct FakeChat {
    room_id: String,
    sent: Mutex<Vec<String>>,
}

impl FakeChat {
    pub fn new(room_id: &str) -> Self {
        Self {
            room_id: room_id.to_string(),
            sent: Mutex::new(Vec::new()),
        }
    }

    pub fn sent(&self) -> Vec<String> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatProvider for FakeChat {
    async fn send_message(&self, content: &str) -> Result<String, String> {
        let mut sent = self.sent.lock().unwrap();
        sent.push(content.to_string());
        Ok(format!("$event{}", sent.len()))
    }

    async fn typing(&self, _active: bool) -> Result<(), String> {
        Ok(())
    }

    fn room_id(&self) -> String {
        self.room_id.clone()
    }
}

/// Canned GitLab. Every call is recorded as a short line in `calls`.
#[derive(Default)]
pub struct FakeGitlab {
    pub projects: Mutex<Vec<Project>>,
    pub users: Mutex<Vec<User>>,
    pub issues: Mutex<Vec<Issue>>,
    pub builds: Mutex<Vec<Build>>,
    pub deployments: Mutex<Vec<Deployment>>,
    /// Play and erase answer this, `Unavailable` when unset.
    pub play_outcome: Mutex<Option<JobOutcome>>,
    pub remove_result: Mutex<bool>,
    pub fail_edits: Mutex<bool>,
    pub fail_lists: Mutex<bool>,
    calls: Mutex<Vec<String>>,
    connections: Mutex<Vec<Credentials>>,
}

impl FakeGitlab {
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn connections(&self) -> Vec<Credentials> {
        self.connections.lock().unwrap().clone()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }

    fn list<T: Clone>(&self, operation: &str, records: &Mutex<Vec<T>>) -> Result<Vec<T>, GitlabError> {
        if *self.fail_lists.lock().unwrap() {
            return Err(GitlabError::new(operation, "boom").with_status(500));
        }
        Ok(records.lock().unwrap().clone())
    }

    fn job(&self) -> JobOutcome {
        self.play_outcome
            .lock()
            .unwrap()
            .clone()
            .unwrap_or(JobOutcome::Unavailable)
    }
}

#[async_trait]
impl GitlabApi for FakeGitlab {
    async fn search_projects(&self, term: &str) -> Result<Vec<Project>, GitlabError> {
        self.record(format!("search_projects {term}"));
        let projects = self.list("search_projects", &self.projects)?;
        Ok(projects
            .into_iter()
            .filter(|p| p.path_with_namespace.contains(term))
            .collect())
    }

    async fn list_projects(&self, all: bool) -> Result<Vec<Project>, GitlabError> {
        self.record(format!("list_projects all={all}"));
        self.list("list_projects", &self.projects)
    }

    async fn get_project(&self, project: &str) -> Result<Option<Project>, GitlabError> {
        self.record(format!("get_project {project}"));
        let projects = self.projects.lock().unwrap();
        Ok(projects.iter().find(|p| p.id.to_string() == project).cloned())
    }

    async fn list_users(&self) -> Result<Vec<User>, GitlabError> {
        self.record("list_users".to_string());
        self.list("list_users", &self.users)
    }

    async fn find_user(&self, username: &str) -> Result<Option<User>, GitlabError> {
        self.record(format!("find_user {username}"));
        let users = self.users.lock().unwrap();
        Ok(users.iter().find(|u| u.username == username).cloned())
    }

    async fn list_milestones(
        &self,
        project: &str,
        state: StateFilter,
    ) -> Result<Vec<Milestone>, GitlabError> {
        self.record(format!("list_milestones {project} {state:?}"));
        self.list("list_milestones", &Mutex::new(Vec::new()))
    }

    async fn list_builds(
        &self,
        project: &str,
        scope: Option<&str>,
    ) -> Result<Vec<Build>, GitlabError> {
        self.record(format!("list_builds {project} {}", scope.unwrap_or("-")));
        self.list("list_builds", &self.builds)
    }

    async fn play_build(&self, project: &str, build: u64) -> Result<JobOutcome, GitlabError> {
        self.record(format!("play_build {project} {build}"));
        Ok(self.job())
    }

    async fn retry_build(&self, project: &str, build: u64) -> Result<Build, GitlabError> {
        self.record(format!("retry_build {project} {build}"));
        Ok(Build {
            id: build + 1,
            name: "retried".to_string(),
            stage: "test".to_string(),
            git_ref: "main".to_string(),
            status: "pending".to_string(),
        })
    }

    async fn erase_build(&self, project: &str, build: u64) -> Result<JobOutcome, GitlabError> {
        self.record(format!("erase_build {project} {build}"));
        Ok(self.job())
    }

    async fn list_issues(
        &self,
        project: &str,
        state: StateFilter,
    ) -> Result<Vec<Issue>, GitlabError> {
        self.record(format!("list_issues {project} {state:?}"));
        self.list("list_issues", &self.issues)
    }

    async fn create_issue(&self, project: &str, issue: &NewIssue) -> Result<Issue, GitlabError> {
        self.record(format!(
            "create_issue {project} {} | {}",
            issue.title,
            issue.description.as_deref().unwrap_or("-")
        ));
        Ok(Issue {
            id: 1001,
            iid: 1,
            title: issue.title.clone(),
            state: "opened".to_string(),
            web_url: String::new(),
        })
    }

    async fn edit_issue(
        &self,
        project: &str,
        issue: u64,
        edit: &IssueEdit,
    ) -> Result<Issue, GitlabError> {
        let change = match (&edit.assignee_ids, &edit.state_event) {
            (Some(ids), _) => format!("assignee={}", ids.first().copied().unwrap_or_default()),
            (None, Some(event)) => format!("state={event}"),
            (None, None) => "noop".to_string(),
        };
        self.record(format!("edit_issue {project} {issue} {change}"));
        if *self.fail_edits.lock().unwrap() {
            return Err(GitlabError::new("edit_issue", "forbidden").with_status(403));
        }
        let state = match edit.state_event.as_deref() {
            Some("close") => "closed",
            _ => "opened",
        };
        Ok(Issue {
            id: issue + 1000,
            iid: issue,
            title: "Edited".to_string(),
            state: state.to_string(),
            web_url: String::new(),
        })
    }

    async fn remove_issue(&self, project: &str, issue: u64) -> Result<bool, GitlabError> {
        self.record(format!("remove_issue {project} {issue}"));
        Ok(*self.remove_result.lock().unwrap())
    }

    async fn list_pipelines(&self, project: &str) -> Result<Vec<Pipeline>, GitlabError> {
        self.record(format!("list_pipelines {project}"));
        self.list("list_pipelines", &Mutex::new(Vec::new()))
    }

    async fn list_deployments(&self, project: &str) -> Result<Vec<Deployment>, GitlabError> {
        self.record(format!("list_deployments {project}"));
        self.list("list_deployments", &self.deployments)
    }
}

/// Hands out the same `FakeGitlab` for any credentials, remembering them.
pub struct FakeConnector {
    gitlab: Arc<FakeGitlab>,
}

impl FakeConnector {
    pub fn new(gitlab: Arc<FakeGitlab>) -> Self {
        Self { gitlab }
    }
}

impl GitlabConnector for FakeConnector {
    fn connect(&self, credentials: &Credentials) -> Result<Arc<dyn GitlabApi>, GitlabError> {
        self.gitlab.connections.lock().unwrap().push(credentials.clone());
        Ok(self.gitlab.clone())
    }
}
