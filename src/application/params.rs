//! # Parameter Extraction
//!
//! Binds a command's regex captures to its ordered parameter names and fills
//! in room defaults for the ones left empty.

use anyhow::{Result, anyhow};
use std::collections::BTreeMap;

use crate::application::context::RoomContext;

/// Name of the parameter that limits how many records a reply lists.
pub const LIMIT: &str = "limit";

/// Parameters of one command invocation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Params {
    values: BTreeMap<String, String>,
}

impl Params {
    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    pub fn set(&mut self, name: &str, value: impl Into<String>) {
        self.values.insert(name.to_string(), value.into());
    }

    /// Sets `limit` when `n > 0`; 0 leaves replies untruncated.
    pub fn with_limit(mut self, n: usize) -> Self {
        if n > 0 {
            self.set(LIMIT, n.to_string());
        }
        self
    }

    /// The positive `limit`, if any.
    pub fn limit(&self) -> Option<usize> {
        self.get(LIMIT)
            .and_then(|v| v.parse::<usize>().ok())
            .filter(|n| *n > 0)
    }

    pub fn require(&self, name: &str) -> Result<&str> {
        self.get(name)
            .ok_or_else(|| anyhow!("missing parameter `{}`", name))
    }

    /// A required numeric id (issue iid, job id, ...).
    pub fn id(&self, name: &str) -> Result<u64> {
        let raw = self.require(name)?;
        raw.parse()
            .map_err(|_| anyhow!("parameter `{}` is not a number: {}", name, raw))
    }
}

/// Binds `captures[i]` to `names[i]`. Absent or blank captures fall back to the
/// room default for that name, if there is one, and are otherwise left unset.
pub fn extract(captures: &[Option<&str>], names: &[&str], context: &RoomContext) -> Params {
    let mut params = Params::default();
    for (i, name) in names.iter().enumerate() {
        let captured = captures
            .get(i)
            .copied()
            .flatten()
            .map(str::trim)
            .filter(|v| !v.is_empty());
        match captured {
            Some(value) => params.set(name, value),
            None => {
                if let Some(value) = default_for(name, context) {
                    params.set(name, value);
                }
            }
        }
    }
    params
}

fn default_for(name: &str, context: &RoomContext) -> Option<String> {
    match name {
        "project" => context.default_project_id.clone(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn room_with_project(project: Option<&str>) -> RoomContext {
        RoomContext {
            room_id: "!room:example.org".to_string(),
            default_project_id: project.map(str::to_string),
            ..Default::default()
        }
    }

    #[test]
    fn test_positional_binding() {
        let params = extract(&[Some("c0"), Some("c1")], &["a", "b"], &room_with_project(None));
        assert_eq!(params.get("a"), Some("c0"));
        assert_eq!(params.get("b"), Some("c1"));
    }

    #[test]
    fn test_absent_project_uses_room_default() {
        let params = extract(
            &[None, Some("closed")],
            &["project", "status"],
            &room_with_project(Some("42")),
        );
        assert_eq!(params.get("project"), Some("42"));
        assert_eq!(params.get("status"), Some("closed"));
    }

    #[test]
    fn test_explicit_project_wins_over_default() {
        let params = extract(&[Some("7")], &["project"], &room_with_project(Some("42")));
        assert_eq!(params.get("project"), Some("7"));
    }

    #[test]
    fn test_missing_without_default_stays_absent() {
        let params = extract(&[None], &["status"], &room_with_project(Some("42")));
        assert_eq!(params.get("status"), None);
        assert!(params.require("status").is_err());
    }

    #[test]
    fn test_blank_capture_is_absent() {
        let params = extract(&[Some("  ")], &["project"], &room_with_project(Some("42")));
        assert_eq!(params.get("project"), Some("42"));
    }

    #[test]
    fn test_more_names_than_captures() {
        let params = extract(&[Some("term")], &["search", "project"], &room_with_project(Some("3")));
        assert_eq!(params.get("search"), Some("term"));
        assert_eq!(params.get("project"), Some("3"));
    }

    #[test]
    fn test_limit() {
        let params = Params::default().with_limit(0);
        assert_eq!(params.limit(), None);
        let params = Params::default().with_limit(5);
        assert_eq!(params.limit(), Some(5));
    }

    #[test]
    fn test_id_parsing() {
        let mut params = Params::default();
        params.set("issue", "12");
        params.set("build", "x");
        assert_eq!(params.id("issue").unwrap(), 12);
        assert!(params.id("build").is_err());
    }
}
