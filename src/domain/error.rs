//! # GitLab Error
//!
//! Error returned by every remote operation. Carries the operation name so a
//! reply can say what failed without surfacing the raw response body.

/// Error type
#[derive(Debug, Clone, PartialEq)]
pub struct GitlabError {
    pub operation: String,
    pub message: String,
    /// HTTP status, when the server answered at all.
    pub status: Option<u16>,
}

impl GitlabError {
    pub fn new(operation: &str, message: impl Into<String>) -> Self {
        Self {
            operation: operation.to_string(),
            message: message.into(),
            status: None,
        }
    }

    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    pub fn is_not_found(&self) -> bool {
        self.status == Some(404)
    }
}

impl std::fmt::Display for GitlabError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.status {
            Some(status) => write!(f, "[{}] HTTP {}: {}", self.operation, status, self.message),
            None => write!(f, "[{}] {}", self.operation, self.message),
        }
    }
}

impl std::error::Error for GitlabError {}
