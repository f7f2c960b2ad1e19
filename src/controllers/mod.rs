//! Page controllers.
//!
//! A controller lives for one request: it owns the issue lists fetched for
//! that request and exposes the page's operations. Every mutating operation
//! ends in an explicit `refresh`, so what the page shows is always what the
//! API last returned.

pub mod admin;
pub mod citizen;
pub mod public;

pub use admin::{AdminController, StatusChange};
pub use citizen::{CitizenController, LocationReading, ReportError};
pub use public::PublicController;

use crate::api::{ApiError, IssueApi};
use crate::models::issue::Issue;

pub const DETAIL_FAILED: &str = "Failed to load issue details";

/// Fetches one issue for the detail view. Always a fresh API call, even when
/// the issue is already in a fetched list.
pub async fn fetch_issue_detail(api: &dyn IssueApi, issue_id: &str) -> Result<Issue, ApiError> {
    api.issue(issue_id).await.inspect_err(|e| {
        log::error!("Error loading issue details for {issue_id}: {e}");
    })
}
