use crate::api::{ApiError, IssueApi};
use crate::models::issue::{Issue, IssueFilter, IssueStats, IssueStatus};

pub const STATUS_UPDATED: &str = "Issue status updated successfully!";
pub const STATUS_UPDATE_FAILED: &str = "Failed to update issue status";

#[derive(Debug, Clone, PartialEq)]
pub enum StatusChange {
    /// No status was selected; nothing was sent.
    Skipped,
    /// Accepted by the API; carries the updated issue when the response body
    /// had one.
    Applied(Option<Issue>),
}

/// Admin dashboard: every issue, client-side filtering and status updates.
///
/// `filtered_issues` is always `filter` applied to `all_issues`.
pub struct AdminController<'a> {
    api: &'a dyn IssueApi,
    token: &'a str,
    all_issues: Vec<Issue>,
    filtered_issues: Vec<Issue>,
    filter: IssueFilter,
    load_failed: bool,
}

impl<'a> AdminController<'a> {
    pub fn new(api: &'a dyn IssueApi, token: &'a str) -> Self {
        AdminController {
            api,
            token,
            all_issues: Vec::new(),
            filtered_issues: Vec::new(),
            filter: IssueFilter::default(),
            load_failed: false,
        }
    }

    /// Re-fetches every issue and re-derives the filtered view.
    /// On failure both lists are kept as they were.
    pub async fn refresh(&mut self) -> Result<(), ApiError> {
        match self.api.all_issues(self.token).await {
            Ok(issues) => {
                self.load_failed = false;
                self.all_issues = issues;
                self.filtered_issues = self.filter.apply(&self.all_issues);
                Ok(())
            }
            Err(e) => {
                self.load_failed = true;
                log::error!("Error loading issues: {e}");
                Err(e)
            }
        }
    }

    /// True when the last refresh failed; the held list may be stale or empty.
    pub fn load_failed(&self) -> bool {
        self.load_failed
    }

    /// Recomputes the filtered view. Purely local.
    pub fn apply_filter(&mut self, filter: IssueFilter) {
        self.filtered_issues = filter.apply(&self.all_issues);
        self.filter = filter;
    }

    pub fn filter(&self) -> &IssueFilter {
        &self.filter
    }

    pub fn all_issues(&self) -> &[Issue] {
        &self.all_issues
    }

    pub fn filtered_issues(&self) -> &[Issue] {
        &self.filtered_issues
    }

    /// Counts over the unfiltered collection.
    pub fn stats(&self) -> IssueStats {
        IssueStats::compute(&self.all_issues)
    }

    /// Sends a status change and, once the API accepts it, refreshes the
    /// whole collection instead of patching the held copy. Any transition is
    /// allowed here; the API decides what is legal.
    pub async fn update_status(
        &mut self,
        issue_id: &str,
        new_status: Option<IssueStatus>,
    ) -> Result<StatusChange, ApiError> {
        let Some(status) = new_status else {
            return Ok(StatusChange::Skipped);
        };

        let updated = self
            .api
            .update_status(self.token, issue_id, status)
            .await
            .inspect_err(|e| log::error!("Update error for issue {issue_id}: {e}"))?;
        log::info!("Issue {issue_id} moved to {status}");

        let _ = self.refresh().await;
        Ok(StatusChange::Applied(updated))
    }
}
