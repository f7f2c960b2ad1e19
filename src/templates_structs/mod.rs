// Template context structures for Askama templates, organized by page.

use actix_session::Session;

use crate::auth::csrf;
use crate::auth::session::{Flash, SignedIn, take_flash};
use crate::models::issue::{CATEGORIES, IssueFilter, IssueStatus};

pub mod admin;
pub mod citizen;
pub mod issues;
pub mod public;

pub use admin::*;
pub use citizen::*;
pub use issues::*;
pub use public::*;

/// Common context shared by every page.
/// Templates access these as `ctx.greeting`, `ctx.csrf_token`, etc.
pub struct PageContext {
    pub greeting: Option<String>,
    pub home_path: Option<&'static str>,
    pub csrf_token: String,
    pub flash: Option<Flash>,
}

impl PageContext {
    /// Context for a page; `signed_in` drives the greeting and the logout form.
    /// Consumes any pending flash message from the session.
    pub fn build(session: &Session, signed_in: Option<&SignedIn>) -> Self {
        PageContext {
            greeting: signed_in.map(|s| format!("Welcome, {}", s.user.name)),
            home_path: signed_in.map(|s| s.user.role.home_path()),
            csrf_token: csrf::token_for(session),
            flash: take_flash(session),
        }
    }
}

/// One `<option>` in a select control.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
    pub selected: bool,
}

impl SelectOption {
    fn new(value: &str, label: &str, selected: bool) -> Self {
        SelectOption { value: value.to_string(), label: label.to_string(), selected }
    }
}

/// Status filter choices, with "All Status" as the wildcard.
pub fn status_filter_options(filter: &IssueFilter) -> Vec<SelectOption> {
    let mut options = vec![SelectOption::new("", "All Status", filter.status.is_none())];
    options.extend(IssueStatus::ALL.into_iter().map(|s| {
        SelectOption::new(s.label(), s.label(), filter.status == Some(s))
    }));
    options
}

/// Category filter choices, with "All Categories" as the wildcard.
pub fn category_filter_options(filter: &IssueFilter) -> Vec<SelectOption> {
    let current = filter.category_value();
    let mut options = vec![SelectOption::new("", "All Categories", current.is_empty())];
    options.extend(category_options(current));
    options
}

/// Categories for the report form and filters. A selected value outside the
/// known set is kept so it survives a re-render.
pub fn category_options(selected: &str) -> Vec<SelectOption> {
    let mut options: Vec<SelectOption> = CATEGORIES
        .iter()
        .map(|c| SelectOption::new(c, c, *c == selected))
        .collect();
    if !selected.is_empty() && !CATEGORIES.contains(&selected) {
        options.push(SelectOption::new(selected, selected, true));
    }
    options
}
