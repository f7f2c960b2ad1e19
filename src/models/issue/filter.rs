use super::types::{Issue, IssueStatus};

/// Client-side filter over an already-fetched issue list.
/// `None` on a dimension matches everything.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IssueFilter {
    pub status: Option<IssueStatus>,
    pub category: Option<String>,
}

impl IssueFilter {
    /// Builds a filter from raw query values. Blank values are wildcards, and
    /// so is a status label the API does not know.
    pub fn from_query(status: Option<&str>, category: Option<&str>) -> Self {
        let status = status
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .and_then(|s| match s.parse::<IssueStatus>() {
                Ok(status) => Some(status),
                Err(e) => {
                    log::debug!("Ignoring status filter: {e}");
                    None
                }
            });
        let category = category
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(String::from);
        IssueFilter { status, category }
    }

    pub fn is_empty(&self) -> bool {
        self.status.is_none() && self.category.is_none()
    }

    pub fn matches(&self, issue: &Issue) -> bool {
        let status_match = self.status.is_none_or(|s| issue.status == s);
        let category_match = self
            .category
            .as_deref()
            .is_none_or(|c| issue.category == c);
        status_match && category_match
    }

    /// Returns the matching issues in source order. Never touches `issues`.
    pub fn apply(&self, issues: &[Issue]) -> Vec<Issue> {
        issues.iter().filter(|i| self.matches(i)).cloned().collect()
    }

    /// Query-string value for the status dimension ("" when unset).
    pub fn status_value(&self) -> &'static str {
        self.status.map(IssueStatus::label).unwrap_or("")
    }

    pub fn category_value(&self) -> &str {
        self.category.as_deref().unwrap_or("")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_query_values_are_wildcards() {
        let f = IssueFilter::from_query(Some(""), Some("  "));
        assert!(f.is_empty());
    }

    #[test]
    fn unknown_status_is_wildcard() {
        let f = IssueFilter::from_query(Some("Closed"), Some("Road"));
        assert_eq!(f.status, None);
        assert_eq!(f.category.as_deref(), Some("Road"));
    }

    #[test]
    fn query_round_trip_values() {
        let f = IssueFilter::from_query(Some("In Progress"), None);
        assert_eq!(f.status_value(), "In Progress");
        assert_eq!(f.category_value(), "");
    }
}
