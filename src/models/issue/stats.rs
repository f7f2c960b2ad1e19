use super::types::{Issue, IssueStatus};

/// Aggregate counts shown on the dashboards.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IssueStats {
    pub total: usize,
    pub pending: usize,
    pub in_progress: usize,
    pub resolved: usize,
}

impl IssueStats {
    pub fn compute(issues: &[Issue]) -> Self {
        issues.iter().fold(IssueStats::default(), |mut stats, issue| {
            stats.total += 1;
            match issue.status {
                IssueStatus::Pending => stats.pending += 1,
                IssueStatus::InProgress => stats.in_progress += 1,
                IssueStatus::Resolved => stats.resolved += 1,
            }
            stats
        })
    }
}
