use askama::Template;
use reqwest::Url;

use super::SelectOption;
use crate::models::issue::{Issue, IssueFilter, IssueStatus, format_date};

/// Who the feed is rendered for; decides which card parts appear.
#[derive(Debug, Clone, Copy)]
pub enum FeedAudience<'a> {
    Public,
    Citizen,
    Admin { csrf_token: &'a str, filter: &'a IssueFilter },
}

/// Inline or detail-view status form posting to the admin update endpoint.
#[derive(Debug, Clone)]
pub struct StatusForm {
    pub action: String,
    pub csrf_token: String,
    pub origin: &'static str,
    pub status_filter: String,
    pub category_filter: String,
    pub options: Vec<SelectOption>,
}

impl StatusForm {
    /// Per-card selector: a blank "Update Status" entry first, so picking
    /// nothing is a no-op.
    pub fn inline(issue: &Issue, csrf_token: &str, filter: &IssueFilter) -> Self {
        let mut options = vec![SelectOption {
            value: String::new(),
            label: "Update Status".to_string(),
            selected: false,
        }];
        options.extend(status_options(issue.status));
        StatusForm {
            action: status_action(&issue.id),
            csrf_token: csrf_token.to_string(),
            origin: "card",
            status_filter: filter.status_value().to_string(),
            category_filter: filter.category_value().to_string(),
            options,
        }
    }

    /// Detail-view selector: always one status selected.
    pub fn detail(issue: &Issue, csrf_token: &str) -> Self {
        StatusForm {
            action: status_action(&issue.id),
            csrf_token: csrf_token.to_string(),
            origin: "detail",
            status_filter: String::new(),
            category_filter: String::new(),
            options: status_options(issue.status),
        }
    }
}

fn status_action(issue_id: &str) -> String {
    issue_path(&["admin", "issues", issue_id, "status"])
}

/// Absolute path from raw segments, each percent-encoded on its own so an id
/// cannot add a query, a fragment or extra segments.
pub fn issue_path(segments: &[&str]) -> String {
    let Ok(mut url) = Url::parse("http://localhost/") else {
        return "/".to_string();
    };
    if let Ok(mut path) = url.path_segments_mut() {
        path.clear().extend(segments);
    }
    url.path().to_string()
}

fn status_options(current: IssueStatus) -> Vec<SelectOption> {
    IssueStatus::ALL
        .into_iter()
        .map(|s| SelectOption {
            value: s.label().to_string(),
            label: s.label().to_string(),
            selected: s == current,
        })
        .collect()
}

/// View model for one issue card.
#[derive(Debug, Clone)]
pub struct IssueCard {
    pub title: String,
    pub description: String,
    pub category: String,
    pub status_label: &'static str,
    pub status_slug: String,
    pub image_url: String,
    pub reporter_name: String,
    pub created_on: String,
    pub detail_href: Option<String>,
    pub status_form: Option<StatusForm>,
}

impl IssueCard {
    fn build(issue: &Issue, audience: &FeedAudience<'_>) -> Self {
        let detail_href = match audience {
            FeedAudience::Public => None,
            FeedAudience::Citizen => Some(issue_path(&["citizen", "issues", issue.id.as_str()])),
            FeedAudience::Admin { .. } => Some(issue_path(&["admin", "issues", issue.id.as_str()])),
        };
        let status_form = match audience {
            FeedAudience::Admin { csrf_token, filter } if issue.status != IssueStatus::Resolved => {
                Some(StatusForm::inline(issue, csrf_token, filter))
            }
            _ => None,
        };
        IssueCard {
            title: issue.title.clone(),
            description: issue.description.clone(),
            category: issue.category.clone(),
            status_label: issue.status.label(),
            status_slug: issue.status.slug(),
            image_url: issue.image_url.clone(),
            reporter_name: issue.reported_by.name.clone(),
            created_on: format_date(&issue.created_at),
            detail_href,
            status_form,
        }
    }
}

#[derive(Template)]
#[template(path = "partials/issue_feed.html")]
pub struct IssueFeedTemplate {
    pub cards: Vec<IssueCard>,
    pub show_reporter: bool,
    pub date_prefix: &'static str,
    pub empty_message: &'static str,
    pub empty_action: Option<&'static str>,
}

/// Renders the issue cards for `audience` as an HTML fragment.
/// Depends only on its arguments, so equal input gives equal markup.
pub fn render_issue_feed(issues: &[Issue], audience: FeedAudience<'_>) -> Result<String, askama::Error> {
    let (show_reporter, date_prefix, empty_message, empty_action) = match audience {
        FeedAudience::Public => (true, "", "No issues reported yet.", None),
        FeedAudience::Citizen => (
            false,
            "Reported on: ",
            "No issues reported yet.",
            Some("Report your first issue"),
        ),
        FeedAudience::Admin { .. } => (true, "", "No issues found.", None),
    };
    let tmpl = IssueFeedTemplate {
        cards: issues.iter().map(|i| IssueCard::build(i, &audience)).collect(),
        show_reporter,
        date_prefix,
        empty_message,
        empty_action,
    };
    tmpl.render()
}

/// View model for the detail view.
#[derive(Debug, Clone)]
pub struct IssueDetailView {
    pub title: String,
    pub image_url: String,
    pub description: String,
    pub category: String,
    pub status_label: &'static str,
    pub status_slug: String,
    pub location: String,
    pub reporter: String,
    pub created_on: String,
    pub updated_on: Option<String>,
}

impl IssueDetailView {
    /// `with_email` adds the reporter's email (admin view).
    pub fn new(issue: &Issue, with_email: bool) -> Self {
        let reporter = if with_email && !issue.reported_by.email.is_empty() {
            format!("{} ({})", issue.reported_by.name, issue.reported_by.email)
        } else {
            issue.reported_by.name.clone()
        };
        IssueDetailView {
            title: issue.title.clone(),
            image_url: issue.image_url.clone(),
            description: issue.description.clone(),
            category: issue.category.clone(),
            status_label: issue.status.label(),
            status_slug: issue.status.slug(),
            location: issue.location.display_precise(),
            reporter,
            created_on: format_date(&issue.created_at),
            updated_on: issue.was_updated().then(|| format_date(&issue.updated_at)),
        }
    }
}

#[derive(Template)]
#[template(path = "issue_detail.html")]
pub struct IssueDetailTemplate {
    pub ctx: super::PageContext,
    pub issue: IssueDetailView,
    pub back_href: &'static str,
    pub status_form: Option<StatusForm>,
}
