//! Shared test infrastructure for controller and page tests.
//!
//! # Fake API
//! - `FakeApi` - in-memory stand-in for the issue REST API that records
//!   every call it receives
//! - `seeded_api()` - one citizen, one admin, three issues
//!
//! # Page helpers
//! - `test_app!(api)` - actix test service wired like `main`
//! - `CookieJar` - carries the session cookie between requests
//! - `csrf_token()`, `stat()` - scrape rendered pages

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use actix_web::cookie::Cookie;
use actix_web::dev::ServiceResponse;
use actix_web::test::TestRequest;
use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use regex::Regex;

use civic_portal::api::{ApiError, IssueApi};
use civic_portal::models::issue::{Issue, IssueStatus, Location, NewReport, Reporter};
use civic_portal::models::user::{AuthResponse, LoginForm, Role, SessionUser, SignupForm};

// ============================================================================
// TEST CONSTANTS
// ============================================================================

pub const CITIZEN_EMAIL: &str = "asha@example.com";
pub const CITIZEN_PASS: &str = "citizen123";
pub const ADMIN_EMAIL: &str = "admin@example.com";
pub const ADMIN_PASS: &str = "admin123";
pub const OTHER_EMAIL: &str = "ravi@example.com";

pub fn created_at() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 5, 10, 0, 0).unwrap()
}

pub fn sample_issue(id: &str, title: &str, status: IssueStatus, category: &str, reporter: &str) -> Issue {
    Issue {
        id: id.to_string(),
        title: title.to_string(),
        description: format!("{title} needs attention"),
        category: category.to_string(),
        status,
        image_url: format!("https://img.example/{id}.jpg"),
        location: Location { latitude: 12.9715987, longitude: 77.5945627 },
        reported_by: Reporter {
            name: reporter.split('@').next().unwrap_or(reporter).to_string(),
            email: reporter.to_string(),
        },
        created_at: created_at(),
        updated_at: created_at(),
    }
}

// ============================================================================
// FAKE API
// ============================================================================

struct FakeUser {
    password: String,
    user: SessionUser,
}

#[derive(Default)]
struct FakeState {
    users: Vec<FakeUser>,
    issues: Vec<Issue>,
    calls: Vec<&'static str>,
    reports: Vec<NewReport>,
    next_id: usize,
    offline: bool,
    reject_reports: Option<String>,
    bare_mutations: bool,
}

/// In-memory API. Tokens are `token-<email>`.
#[derive(Default)]
pub struct FakeApi {
    state: Mutex<FakeState>,
}

impl FakeApi {
    pub fn new() -> Self {
        FakeApi::default()
    }

    pub fn add_user(&self, name: &str, email: &str, password: &str, role: Role) {
        self.state.lock().unwrap().users.push(FakeUser {
            password: password.to_string(),
            user: SessionUser { name: name.to_string(), email: email.to_string(), role },
        });
    }

    pub fn add_issue(&self, issue: Issue) {
        self.state.lock().unwrap().issues.push(issue);
    }

    pub fn token_for(email: &str) -> String {
        format!("token-{email}")
    }

    /// Every later call fails as a transport error.
    pub fn go_offline(&self) {
        self.state.lock().unwrap().offline = true;
    }

    /// Report submissions are rejected with `message`.
    pub fn reject_reports(&self, message: &str) {
        self.state.lock().unwrap().reject_reports = Some(message.to_string());
    }

    /// Mutations still apply but answer without an issue body.
    pub fn bare_mutations(&self) {
        self.state.lock().unwrap().bare_mutations = true;
    }

    pub fn calls(&self) -> Vec<&'static str> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn count(&self, name: &str) -> usize {
        self.calls().into_iter().filter(|c| *c == name).count()
    }

    pub fn reset_calls(&self) {
        self.state.lock().unwrap().calls.clear();
    }

    pub fn reports(&self) -> Vec<NewReport> {
        self.state.lock().unwrap().reports.clone()
    }

    pub fn status_of(&self, id: &str) -> Option<IssueStatus> {
        let state = self.state.lock().unwrap();
        state.issues.iter().find(|i| i.id == id).map(|i| i.status)
    }

    fn record(&self, name: &'static str) -> Result<(), ApiError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(name);
        if state.offline {
            return Err(ApiError::Transport("connection refused".to_string()));
        }
        Ok(())
    }

    fn user_for(&self, token: &str) -> Result<SessionUser, ApiError> {
        let state = self.state.lock().unwrap();
        state
            .users
            .iter()
            .find(|u| FakeApi::token_for(&u.user.email) == token)
            .map(|u| u.user.clone())
            .ok_or_else(|| ApiError::rejected(401, "Token is not valid"))
    }

    fn admin_for(&self, token: &str) -> Result<SessionUser, ApiError> {
        let user = self.user_for(token)?;
        if user.role != Role::Admin {
            return Err(ApiError::rejected(403, "Access denied. Admin only."));
        }
        Ok(user)
    }
}

#[async_trait]
impl IssueApi for FakeApi {
    async fn login(&self, form: &LoginForm) -> Result<AuthResponse, ApiError> {
        self.record("login")?;
        let state = self.state.lock().unwrap();
        state
            .users
            .iter()
            .find(|u| u.user.email == form.email && u.password == form.password)
            .map(|u| AuthResponse { token: FakeApi::token_for(&u.user.email), user: u.user.clone() })
            .ok_or_else(|| ApiError::rejected(400, "Invalid credentials"))
    }

    async fn register(&self, form: &SignupForm) -> Result<AuthResponse, ApiError> {
        self.record("register")?;
        let mut state = self.state.lock().unwrap();
        if state.users.iter().any(|u| u.user.email == form.email) {
            return Err(ApiError::rejected(400, "User already exists"));
        }
        let user = SessionUser { name: form.name.clone(), email: form.email.clone(), role: form.role };
        state.users.push(FakeUser { password: form.password.clone(), user: user.clone() });
        Ok(AuthResponse { token: FakeApi::token_for(&user.email), user })
    }

    async fn public_issues(&self) -> Result<Vec<Issue>, ApiError> {
        self.record("public_issues")?;
        Ok(self.state.lock().unwrap().issues.clone())
    }

    async fn my_issues(&self, token: &str) -> Result<Vec<Issue>, ApiError> {
        self.record("my_issues")?;
        let user = self.user_for(token)?;
        let state = self.state.lock().unwrap();
        Ok(state
            .issues
            .iter()
            .filter(|i| i.reported_by.email == user.email)
            .cloned()
            .collect())
    }

    async fn all_issues(&self, token: &str) -> Result<Vec<Issue>, ApiError> {
        self.record("all_issues")?;
        self.admin_for(token)?;
        Ok(self.state.lock().unwrap().issues.clone())
    }

    async fn issue(&self, id: &str) -> Result<Issue, ApiError> {
        self.record("issue")?;
        let state = self.state.lock().unwrap();
        state
            .issues
            .iter()
            .find(|i| i.id == id)
            .cloned()
            .ok_or_else(|| ApiError::rejected(404, "Issue not found"))
    }

    async fn update_status(
        &self,
        token: &str,
        id: &str,
        status: IssueStatus,
    ) -> Result<Option<Issue>, ApiError> {
        self.record("update_status")?;
        self.admin_for(token)?;
        let mut state = self.state.lock().unwrap();
        let bare = state.bare_mutations;
        let issue = state
            .issues
            .iter_mut()
            .find(|i| i.id == id)
            .ok_or_else(|| ApiError::rejected(404, "Issue not found"))?;
        issue.status = status;
        issue.updated_at = issue.created_at + Duration::days(1);
        Ok((!bare).then(|| issue.clone()))
    }

    async fn report_issue(
        &self,
        token: &str,
        report: NewReport,
    ) -> Result<Option<Issue>, ApiError> {
        self.record("report_issue")?;
        let user = self.user_for(token)?;
        let mut state = self.state.lock().unwrap();
        if let Some(message) = state.reject_reports.clone() {
            return Err(ApiError::rejected(400, message));
        }
        state.next_id += 1;
        let issue = Issue {
            id: format!("new-{}", state.next_id),
            title: report.title.clone(),
            description: report.description.clone(),
            category: report.category.clone(),
            status: IssueStatus::Pending,
            image_url: format!("https://img.example/{}", report.image.file_name),
            location: report.location,
            reported_by: Reporter { name: user.name, email: user.email },
            created_at: created_at(),
            updated_at: created_at(),
        };
        state.reports.push(report);
        state.issues.push(issue.clone());
        Ok((!state.bare_mutations).then_some(issue))
    }
}

/// One citizen (Asha, two issues), one admin, and an issue from someone else.
pub fn seeded_api() -> Arc<FakeApi> {
    let api = FakeApi::new();
    api.add_user("Asha", CITIZEN_EMAIL, CITIZEN_PASS, Role::Citizen);
    api.add_user("Admin", ADMIN_EMAIL, ADMIN_PASS, Role::Admin);
    api.add_issue(sample_issue("i-1", "Pothole on Main St", IssueStatus::Pending, "Road", CITIZEN_EMAIL));
    api.add_issue(sample_issue("i-2", "Broken streetlight", IssueStatus::Resolved, "Streetlight", CITIZEN_EMAIL));
    api.add_issue(sample_issue("i-3", "Burst water main", IssueStatus::InProgress, "Water", OTHER_EMAIL));
    Arc::new(api)
}

// ============================================================================
// PAGE HELPERS
// ============================================================================

/// Builds the app the way `main` does, around the given API.
#[macro_export]
macro_rules! test_app {
    ($api:expr) => {{
        let api: std::sync::Arc<dyn civic_portal::api::IssueApi> = $api;
        actix_web::test::init_service(
            actix_web::App::new()
                .wrap(civic_portal::session_middleware(actix_web::cookie::Key::generate(), false))
                .app_data(actix_web::web::Data::from(api))
                .configure(civic_portal::configure),
        )
        .await
    }};
}

/// Carries the session cookie from one response to the next request.
#[derive(Default)]
pub struct CookieJar {
    session: Option<Cookie<'static>>,
}

impl CookieJar {
    pub fn attach(&self, req: TestRequest) -> TestRequest {
        match &self.session {
            Some(cookie) => req.cookie(cookie.clone()),
            None => req,
        }
    }

    pub fn update<B>(&mut self, resp: &ServiceResponse<B>) {
        if let Some(cookie) = resp.response().cookies().find(|c| c.name() == "id") {
            self.session = Some(cookie.into_owned());
        }
    }
}

pub fn csrf_token(html: &str) -> String {
    let re = Regex::new(r#"name="csrf_token" value="([0-9a-f]{64})""#).unwrap();
    re.captures(html)
        .map(|c| c[1].to_string())
        .expect("page has no CSRF token")
}

/// Number rendered in the stat card with the given element id.
pub fn stat(html: &str, id: &str) -> usize {
    let re = Regex::new(&format!(r#"id="{id}">(\d+)<"#)).unwrap();
    re.captures(html)
        .map(|c| c[1].parse().unwrap())
        .unwrap_or_else(|| panic!("no stat {id} on page"))
}

pub fn location_header<B>(resp: &ServiceResponse<B>) -> String {
    resp.headers()
        .get("Location")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string()
}

pub const BOUNDARY: &str = "----civicportaltestboundary";

/// multipart/form-data body with text fields and an optional image part.
pub fn multipart_body(fields: &[(&str, &str)], image: Option<(&str, &[u8])>) -> Vec<u8> {
    let mut body = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(
            format!("--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n")
                .as_bytes(),
        );
    }
    if let Some((file_name, bytes)) = image {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"image\"; filename=\"{file_name}\"\r\nContent-Type: image/jpeg\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(bytes);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

pub fn multipart_content_type() -> String {
    format!("multipart/form-data; boundary={BOUNDARY}")
}
