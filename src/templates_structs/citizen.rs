use askama::Template;

use super::{PageContext, SelectOption, category_options};
use crate::models::issue::{IssueStats, Location};

/// Report form contents; text fields survive a failed submission.
#[derive(Debug, Clone)]
pub struct ReportFormState {
    pub open: bool,
    pub title: String,
    pub description: String,
    pub categories: Vec<SelectOption>,
    pub error: Option<String>,
}

impl ReportFormState {
    pub fn closed() -> Self {
        ReportFormState {
            open: false,
            title: String::new(),
            description: String::new(),
            categories: category_options(""),
            error: None,
        }
    }

    pub fn retry(title: &str, description: &str, category: &str, error: String) -> Self {
        ReportFormState {
            open: true,
            title: title.to_string(),
            description: description.to_string(),
            categories: category_options(category),
            error: Some(error),
        }
    }
}

#[derive(Template)]
#[template(path = "citizen.html")]
pub struct CitizenDashboardTemplate {
    pub ctx: PageContext,
    pub stats: IssueStats,
    pub feed_html: String,
    pub load_error: bool,
    pub status_options: Vec<SelectOption>,
    pub category_options: Vec<SelectOption>,
    pub report: ReportFormState,
    /// "Location captured: ..." once a fix is held.
    pub location_status: Option<String>,
}

pub fn location_status(location: Option<Location>) -> Option<String> {
    location.map(|l| format!("Location captured: {}", l.display_precise()))
}
