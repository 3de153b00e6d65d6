//! # GitLab REST Client
//!
//! Implements `GitlabApi` over the GitLab REST v4 API with `reqwest`.
//! Every call carries the room's `PRIVATE-TOKEN` and the configured timeout.

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;

use crate::domain::error::GitlabError;
use crate::domain::traits::{GitlabApi, GitlabConnector};
use crate::domain::types::{
    Build, Credentials, Deployment, Issue, IssueEdit, JobOutcome, Milestone, NewIssue, Pipeline,
    Project, StateFilter, User,
};

/// GitLab caps `per_page` at 100.
const MAX_PER_PAGE: usize = 100;

/// Builds one `GitlabClient` per room, sharing the underlying connection pool.
pub struct HttpConnector {
    http: Client,
    per_page: usize,
    timeout: Duration,
}

impl HttpConnector {
    pub fn new(record_limit: usize, timeout_secs: u64) -> Result<Self, GitlabError> {
        let http = Client::builder()
            .user_agent(concat!("gitbot/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| GitlabError::new("connect", format!("Failed to create HTTP client: {}", e)))?;
        let per_page = match record_limit {
            0 => MAX_PER_PAGE,
            n => n.min(MAX_PER_PAGE),
        };
        Ok(Self {
            http,
            per_page,
            timeout: Duration::from_secs(timeout_secs),
        })
    }
}

impl GitlabConnector for HttpConnector {
    fn connect(&self, credentials: &Credentials) -> Result<Arc<dyn GitlabApi>, GitlabError> {
        let base_url = credentials.base_url.trim().trim_end_matches('/');
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(GitlabError::new(
                "connect",
                format!("Invalid GitLab URL `{}`", credentials.base_url),
            ));
        }
        Ok(Arc::new(GitlabClient {
            http: self.http.clone(),
            api_url: format!("{}/api/v4", base_url),
            token: credentials.token.clone(),
            per_page: self.per_page,
            timeout: self.timeout,
        }))
    }
}

pub struct GitlabClient {
    http: Client,
    api_url: String,
    token: String,
    per_page: usize,
    timeout: Duration,
}

impl GitlabClient {
    fn get(&self, path: &str) -> RequestBuilder {
        self.http
            .get(format!("{}{}", self.api_url, path))
            .query(&[("per_page", self.per_page)])
    }

    fn post(&self, path: &str) -> RequestBuilder {
        self.http.post(format!("{}{}", self.api_url, path))
    }

    async fn send(&self, operation: &str, request: RequestBuilder) -> Result<Response, GitlabError> {
        tracing::debug!("GitLab request: {}", operation);
        request
            .header("PRIVATE-TOKEN", &self.token)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    GitlabError::new(operation, format!("timed out after {}s", self.timeout.as_secs()))
                } else {
                    GitlabError::new(operation, format!("HTTP request failed: {}", e))
                }
            })
    }

    async fn json<T: DeserializeOwned>(
        &self,
        operation: &str,
        request: RequestBuilder,
    ) -> Result<T, GitlabError> {
        let response = self.send(operation, request).await?;
        let response = check_status(operation, response).await?;
        response
            .json::<T>()
            .await
            .map_err(|e| GitlabError::new(operation, format!("Invalid response: {}", e)))
    }

    /// play/erase answer 400 when the job already ran or was erased and 404 when it is unknown.
    /// Anything else, 403 included, is a real failure.
    async fn job_action(
        &self,
        operation: &str,
        project: &str,
        build: u64,
        action: &str,
    ) -> Result<JobOutcome, GitlabError> {
        let path = format!("/projects/{}/jobs/{}/{}", encode_project(project), build, action);
        let response = self.send(operation, self.post(&path)).await?;
        match response.status() {
            StatusCode::BAD_REQUEST | StatusCode::NOT_FOUND => {
                tracing::info!("{} {} rejected with {}", operation, build, response.status());
                Ok(JobOutcome::Unavailable)
            }
            _ => {
                let response = check_status(operation, response).await?;
                response
                    .json::<Build>()
                    .await
                    .map(JobOutcome::Record)
                    .map_err(|e| GitlabError::new(operation, format!("Invalid response: {}", e)))
            }
        }
    }
}

#[async_trait]
impl GitlabApi for GitlabClient {
    async fn search_projects(&self, term: &str) -> Result<Vec<Project>, GitlabError> {
        let request = self.get("/projects").query(&[("search", term)]);
        self.json("search_projects", request).await
    }

    async fn list_projects(&self, all: bool) -> Result<Vec<Project>, GitlabError> {
        let mut request = self.get("/projects").query(&[("order_by", "id")]);
        if !all {
            request = request.query(&[("membership", "true")]);
        }
        self.json("list_projects", request).await
    }

    async fn get_project(&self, project: &str) -> Result<Option<Project>, GitlabError> {
        let request = self
            .http
            .get(format!("{}/projects/{}", self.api_url, encode_project(project)));
        match self.json("get_project", request).await {
            Ok(project) => Ok(Some(project)),
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(e),
        }
    }

    async fn list_users(&self) -> Result<Vec<User>, GitlabError> {
        self.json("list_users", self.get("/users").query(&[("active", "true")]))
            .await
    }

    async fn find_user(&self, username: &str) -> Result<Option<User>, GitlabError> {
        let request = self
            .http
            .get(format!("{}/users", self.api_url))
            .query(&[("username", username)]);
        let users: Vec<User> = self.json("find_user", request).await?;
        Ok(users.into_iter().find(|u| u.username == username))
    }

    async fn list_milestones(
        &self,
        project: &str,
        state: StateFilter,
    ) -> Result<Vec<Milestone>, GitlabError> {
        let mut request = self.get(&format!("/projects/{}/milestones", encode_project(project)));
        if let Some(state) = state.milestone_state() {
            request = request.query(&[("state", state)]);
        }
        self.json("list_milestones", request).await
    }

    async fn list_builds(
        &self,
        project: &str,
        scope: Option<&str>,
    ) -> Result<Vec<Build>, GitlabError> {
        let mut request = self.get(&format!("/projects/{}/jobs", encode_project(project)));
        if let Some(scope) = scope {
            request = request.query(&[("scope[]", scope.to_lowercase())]);
        }
        self.json("list_builds", request).await
    }

    async fn play_build(&self, project: &str, build: u64) -> Result<JobOutcome, GitlabError> {
        self.job_action("play_build", project, build, "play").await
    }

    async fn retry_build(&self, project: &str, build: u64) -> Result<Build, GitlabError> {
        let path = format!("/projects/{}/jobs/{}/retry", encode_project(project), build);
        self.json("retry_build", self.post(&path)).await
    }

    async fn erase_build(&self, project: &str, build: u64) -> Result<JobOutcome, GitlabError> {
        self.job_action("erase_build", project, build, "erase").await
    }

    async fn list_issues(
        &self,
        project: &str,
        state: StateFilter,
    ) -> Result<Vec<Issue>, GitlabError> {
        let mut request = self.get(&format!("/projects/{}/issues", encode_project(project)));
        if let Some(state) = state.issue_state() {
            request = request.query(&[("state", state)]);
        }
        self.json("list_issues", request).await
    }

    async fn create_issue(&self, project: &str, issue: &NewIssue) -> Result<Issue, GitlabError> {
        let path = format!("/projects/{}/issues", encode_project(project));
        self.json("create_issue", self.post(&path).json(issue)).await
    }

    async fn edit_issue(
        &self,
        project: &str,
        issue: u64,
        edit: &IssueEdit,
    ) -> Result<Issue, GitlabError> {
        let url = format!(
            "{}/projects/{}/issues/{}",
            self.api_url,
            encode_project(project),
            issue
        );
        self.json("edit_issue", self.http.put(url).json(edit)).await
    }

    async fn remove_issue(&self, project: &str, issue: u64) -> Result<bool, GitlabError> {
        let url = format!(
            "{}/projects/{}/issues/{}",
            self.api_url,
            encode_project(project),
            issue
        );
        let response = self.send("remove_issue", self.http.delete(url)).await?;
        let status = response.status();
        if !status.is_success() {
            tracing::warn!("remove_issue {} answered {}", issue, status);
        }
        Ok(status.is_success())
    }

    async fn list_pipelines(&self, project: &str) -> Result<Vec<Pipeline>, GitlabError> {
        let request = self.get(&format!("/projects/{}/pipelines", encode_project(project)));
        self.json("list_pipelines", request).await
    }

    async fn list_deployments(&self, project: &str) -> Result<Vec<Deployment>, GitlabError> {
        let request = self
            .get(&format!("/projects/{}/deployments", encode_project(project)))
            .query(&[("order_by", "id"), ("sort", "desc")]);
        self.json("list_deployments", request).await
    }
}

/// Turns a non-2xx response into an error carrying GitLab's `message`/`error` field.
async fn check_status(operation: &str, response: Response) -> Result<Response, GitlabError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(GitlabError::new(operation, error_message(&body, status)).with_status(status.as_u16()))
}

fn error_message(body: &str, status: StatusCode) -> String {
    let parsed = serde_json::from_str::<serde_json::Value>(body).ok();
    let field = parsed.as_ref().and_then(|v| {
        v.get("message")
            .or_else(|| v.get("error"))
            .map(|m| match m.as_str() {
                Some(s) => s.to_string(),
                None => m.to_string(),
            })
    });
    field.unwrap_or_else(|| {
        status
            .canonical_reason()
            .unwrap_or("Unexpected response")
            .to_string()
    })
}

/// Namespaced paths (`group/project`) must be URL-encoded in the project segment.
fn encode_project(project: &str) -> String {
    project.trim().replace('/', "%2F")
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use serde_json::json;

    fn client_for(server: &MockServer) -> Arc<dyn GitlabApi> {
        let connector = HttpConnector::new(20, 5).unwrap();
        connector
            .connect(&Credentials {
                token: "secret".to_string(),
                base_url: server.base_url(),
            })
            .unwrap()
    }

    #[test]
    fn test_encode_project() {
        assert_eq!(encode_project("42"), "42");
        assert_eq!(encode_project("group/sub/app"), "group%2Fsub%2Fapp");
    }

    #[test]
    fn test_error_message_prefers_gitlab_fields() {
        assert_eq!(
            error_message(r#"{"message": "401 Unauthorized"}"#, StatusCode::UNAUTHORIZED),
            "401 Unauthorized"
        );
        assert_eq!(
            error_message(r#"{"error": "insufficient_scope"}"#, StatusCode::FORBIDDEN),
            "insufficient_scope"
        );
        assert_eq!(error_message("<html>", StatusCode::BAD_GATEWAY), "Bad Gateway");
    }

    #[test]
    fn test_connect_rejects_non_http_url() {
        let connector = HttpConnector::new(20, 5).unwrap();
        let result = connector.connect(&Credentials {
            token: "t".to_string(),
            base_url: "gitlab.com".to_string(),
        });
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_list_issues_sends_token_state_and_page_size() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/api/v4/projects/42/issues")
                    .header("private-token", "secret")
                    .query_param("state", "opened")
                    .query_param("per_page", "20");
                then.status(200).json_body(json!([
                    {"id": 100, "iid": 1, "title": "Broken login", "state": "opened"}
                ]));
            })
            .await;

        let issues = client_for(&server)
            .list_issues("42", StateFilter::Opened)
            .await
            .unwrap();
        mock.assert_async().await;
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].title, "Broken login");
    }

    #[tokio::test]
    async fn test_get_project_not_found_is_none() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/api/v4/projects/99");
                then.status(404).json_body(json!({"message": "404 Project Not Found"}));
            })
            .await;

        let project = client_for(&server).get_project("99").await.unwrap();
        assert_eq!(project, None);
    }

    #[tokio::test]
    async fn test_play_build_rejected_is_unavailable() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/api/v4/projects/42/jobs/7/play");
                then.status(400).json_body(json!({"message": "400 (Bad request) \"Unplayable Job\""}));
            })
            .await;

        let outcome = client_for(&server).play_build("42", 7).await.unwrap();
        assert_eq!(outcome, JobOutcome::Unavailable);
    }

    #[tokio::test]
    async fn test_play_build_forbidden_is_an_error() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/api/v4/projects/42/jobs/7/play");
                then.status(403).json_body(json!({"message": "403 Forbidden"}));
            })
            .await;

        let err = client_for(&server).play_build("42", 7).await.unwrap_err();
        assert_eq!(err.status, Some(403));
        assert_eq!(err.operation, "play_build");
    }

    #[tokio::test]
    async fn test_list_builds_sends_scope() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/api/v4/projects/42/jobs")
                    .query_param("scope[]", "failed");
                then.status(200).json_body(json!([
                    {"id": 7, "name": "rspec", "stage": "test", "ref": "main", "status": "failed"}
                ]));
            })
            .await;

        let builds = client_for(&server)
            .list_builds("42", Some("FAILED"))
            .await
            .unwrap();
        mock.assert_async().await;
        assert_eq!(builds[0].status, "failed");
    }

    #[tokio::test]
    async fn test_find_user_filters_by_username_server_side() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/api/v4/users")
                    .query_param("username", "alice");
                then.status(200)
                    .json_body(json!([{"id": 21, "username": "alice", "name": "Alice"}]));
            })
            .await;

        let user = client_for(&server).find_user("alice").await.unwrap();
        mock.assert_async().await;
        assert_eq!(user.map(|u| u.id), Some(21));
    }

    #[tokio::test]
    async fn test_find_user_unknown_is_none() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/api/v4/users")
                    .query_param("username", "ghost");
                then.status(200).json_body(json!([]));
            })
            .await;

        assert_eq!(client_for(&server).find_user("ghost").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_erase_build_returns_record() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/api/v4/projects/42/jobs/7/erase");
                then.status(201).json_body(json!({
                    "id": 7, "name": "rspec", "stage": "test", "ref": "main", "status": "success"
                }));
            })
            .await;

        let outcome = client_for(&server).erase_build("42", 7).await.unwrap();
        match outcome {
            JobOutcome::Record(build) => assert_eq!(build.name, "rspec"),
            JobOutcome::Unavailable => panic!("expected a record"),
        }
    }

    #[tokio::test]
    async fn test_remove_issue_maps_status_to_bool() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(DELETE).path("/api/v4/projects/42/issues/3");
                then.status(204);
            })
            .await;
        server
            .mock_async(|when, then| {
                when.method(DELETE).path("/api/v4/projects/42/issues/4");
                then.status(403).json_body(json!({"message": "403 Forbidden"}));
            })
            .await;

        let client = client_for(&server);
        assert!(client.remove_issue("42", 3).await.unwrap());
        assert!(!client.remove_issue("42", 4).await.unwrap());
    }

    #[tokio::test]
    async fn test_edit_issue_sends_state_event() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(PUT)
                    .path("/api/v4/projects/42/issues/3")
                    .json_body(json!({"state_event": "close"}));
                then.status(200).json_body(json!({
                    "id": 300, "iid": 3, "title": "Flaky test", "state": "closed"
                }));
            })
            .await;

        let issue = client_for(&server)
            .edit_issue("42", 3, &IssueEdit::state(crate::domain::types::IssueAction::Close))
            .await
            .unwrap();
        mock.assert_async().await;
        assert_eq!(issue.state, "closed");
    }

    #[tokio::test]
    async fn test_server_error_surfaces_status() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/api/v4/users");
                then.status(500).body("boom");
            })
            .await;

        let err = client_for(&server).list_users().await.unwrap_err();
        assert_eq!(err.status, Some(500));
        assert_eq!(err.operation, "list_users");
    }
}
