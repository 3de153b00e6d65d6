//! # Reply Rendering
//!
//! Turns GitLab records into the markdown lines sent back to the room.
//! Every function here is pure: same records and params, same text.

use crate::application::params::Params;
use crate::domain::types::{Build, Deployment, Issue, Milestone, Pipeline, Project, User};
use crate::strings::messages;

/// The records a reply lists: the first `limit` when one is set.
fn limited<'a, T>(records: &'a [T], params: &Params) -> &'a [T] {
    match params.limit() {
        Some(limit) => &records[..records.len().min(limit)],
        None => records,
    }
}

/// Appends one line per listed record, or `empty` when nothing was rendered.
fn render_lines<T>(
    header: &str,
    records: &[T],
    params: &Params,
    empty: &str,
    line: impl Fn(&T) -> String,
) -> String {
    let shown = limited(records, params);
    let mut msg = header.to_string();
    for record in shown {
        msg.push('\n');
        msg.push_str(&line(record));
    }
    if shown.is_empty() {
        msg.push('\n');
        msg.push_str(empty);
    }
    msg
}

fn is_default(project: &Project, default: Option<&str>) -> bool {
    default == Some(project.id.to_string().as_str())
}

/// Marks the room's default project; when it is not listed, appends `set_project_hint`.
pub fn render_projects(
    header: &str,
    records: &[Project],
    params: &Params,
    set_project_hint: &str,
) -> String {
    let default = params.get("project");
    let mut msg = render_lines(header, records, params, messages::NO_PROJECTS, |p| {
        let mut line = format!("#{} - {}", p.id, p.path_with_namespace);
        if is_default(p, default) {
            line.push_str(" - **default**");
        }
        line
    });
    if !limited(records, params).iter().any(|p| is_default(p, default)) {
        msg.push_str("\n\n");
        msg.push_str(set_project_hint);
    }
    msg
}

pub fn render_users(header: &str, records: &[User], params: &Params) -> String {
    render_lines(header, records, params, messages::NO_USERS, |u| {
        format!("#{} - {} - {}", u.id, u.username, u.name)
    })
}

pub fn render_milestones(header: &str, records: &[Milestone], params: &Params) -> String {
    render_lines(header, records, params, messages::NO_MILESTONES, |m| {
        with_closed_marker(format!("#{} - {}", m.iid, m.title), &m.state)
    })
}

pub fn render_issues(header: &str, records: &[Issue], params: &Params) -> String {
    render_lines(header, records, params, messages::NO_ISSUES, |i| {
        with_closed_marker(format!("#{} - {}", i.iid, i.title), &i.state)
    })
}

pub fn render_pipelines(header: &str, records: &[Pipeline], params: &Params) -> String {
    render_lines(header, records, params, messages::NO_PIPELINES, |p| {
        format!("#{} - {} - **{}**", p.id, p.git_ref, p.status)
    })
}

pub fn render_builds(header: &str, records: &[Build], params: &Params) -> String {
    render_lines(header, records, params, messages::NO_BUILDS, |b| {
        format!(
            "#{} - {} (stage: {}, branch: {}) - **{}**",
            b.id, b.name, b.stage, b.git_ref, b.status
        )
    })
}

pub fn render_deployments(header: &str, records: &[Deployment], params: &Params) -> String {
    render_lines(header, records, params, messages::NO_DEPLOYMENTS, |d| {
        let environment = d.environment.as_ref().map(|e| e.name.as_str()).unwrap_or("-");
        let status = d.status.as_deref().unwrap_or("unknown");
        format!("#{} - {} - {} - **{}**", d.iid, environment, d.git_ref, status)
    })
}

fn with_closed_marker(mut line: String, state: &str) -> String {
    if state == "closed" {
        line.push_str(" **CLOSED**");
    }
    line
}
