use askama::Template;

use super::{PageContext, SelectOption};
use crate::models::issue::IssueStats;

#[derive(Template)]
#[template(path = "admin.html")]
pub struct AdminDashboardTemplate {
    pub ctx: PageContext,
    pub stats: IssueStats,
    pub feed_html: String,
    pub load_error: bool,
    pub status_options: Vec<SelectOption>,
    pub category_options: Vec<SelectOption>,
}
