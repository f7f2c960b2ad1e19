use askama::Template;

use super::PageContext;

/// Login form state kept across a failed attempt.
#[derive(Debug, Clone, Default)]
pub struct LoginState {
    pub open: bool,
    pub email: String,
    pub error: Option<String>,
}

/// Signup form state kept across a failed attempt.
#[derive(Debug, Clone, Default)]
pub struct SignupState {
    pub open: bool,
    pub name: String,
    pub email: String,
    pub admin_selected: bool,
    pub error: Option<String>,
}

#[derive(Template)]
#[template(path = "index.html")]
pub struct LandingTemplate {
    pub ctx: PageContext,
    pub feed_html: String,
    pub load_error: bool,
    pub login: LoginState,
    pub signup: SignupState,
}
