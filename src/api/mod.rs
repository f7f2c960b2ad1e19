//! Client side of the issue-tracking REST API.
//!
//! Controllers only see the [`IssueApi`] trait; [`http::HttpApi`] is the
//! reqwest-backed implementation used by the running server.

use std::fmt;

use async_trait::async_trait;
use serde::Deserialize;

use crate::models::issue::{Issue, IssueStatus, NewReport};
use crate::models::user::{AuthResponse, LoginForm, SignupForm};

pub mod http;

pub use http::HttpApi;

/// Failure talking to the API.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiError {
    /// Network error, or a response body that could not be decoded.
    Transport(String),
    /// Non-2xx response; `message` is the server's `{message}` when present.
    Rejected { status: u16, message: Option<String> },
}

impl ApiError {
    pub fn rejected(status: u16, message: impl Into<String>) -> Self {
        ApiError::Rejected { status, message: Some(message.into()) }
    }

    /// Text shown to the user. Server messages are surfaced verbatim;
    /// otherwise `fallback` is used, with a retry hint for transport errors.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            ApiError::Rejected { message: Some(m), .. } if !m.trim().is_empty() => m.clone(),
            ApiError::Rejected { .. } => fallback.to_string(),
            ApiError::Transport(_) => format!("{fallback}. Please try again."),
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Transport(e) => write!(f, "API transport error: {e}"),
            ApiError::Rejected { status, message: Some(m) } => {
                write!(f, "API rejected request ({status}): {m}")
            }
            ApiError::Rejected { status, message: None } => {
                write!(f, "API rejected request ({status})")
            }
        }
    }
}

impl std::error::Error for ApiError {}

/// `{message}` error body returned by the API.
#[derive(Debug, Deserialize)]
pub struct ApiMessage {
    pub message: Option<String>,
}

/// Operations the front end needs from the API. Every call is a single
/// request/response round-trip.
///
/// The two mutations succeed on any 2xx status. Their body is returned when it
/// decodes as an [`Issue`] and is otherwise ignored.
#[async_trait]
pub trait IssueApi: Send + Sync {
    async fn login(&self, form: &LoginForm) -> Result<AuthResponse, ApiError>;

    async fn register(&self, form: &SignupForm) -> Result<AuthResponse, ApiError>;

    async fn public_issues(&self) -> Result<Vec<Issue>, ApiError>;

    async fn my_issues(&self, token: &str) -> Result<Vec<Issue>, ApiError>;

    async fn all_issues(&self, token: &str) -> Result<Vec<Issue>, ApiError>;

    async fn issue(&self, id: &str) -> Result<Issue, ApiError>;

    async fn update_status(
        &self,
        token: &str,
        id: &str,
        status: IssueStatus,
    ) -> Result<Option<Issue>, ApiError>;

    async fn report_issue(&self, token: &str, report: NewReport)
        -> Result<Option<Issue>, ApiError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_message_is_surfaced_verbatim() {
        let e = ApiError::rejected(400, "Title is required");
        assert_eq!(e.user_message("Failed to report issue"), "Title is required");
    }

    #[test]
    fn missing_or_blank_message_falls_back() {
        let e = ApiError::Rejected { status: 500, message: None };
        assert_eq!(e.user_message("Login failed"), "Login failed");
        let e = ApiError::rejected(500, "  ");
        assert_eq!(e.user_message("Login failed"), "Login failed");
    }

    #[test]
    fn transport_errors_prompt_retry() {
        let e = ApiError::Transport("connection refused".into());
        assert_eq!(e.user_message("Login failed"), "Login failed. Please try again.");
    }
}
