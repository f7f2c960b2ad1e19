use crate::api::{ApiError, IssueApi};
use crate::models::issue::Issue;
use crate::models::user::{AuthResponse, LoginForm, SignupForm};

pub const LOGIN_FAILED: &str = "Login failed";
pub const REGISTRATION_FAILED: &str = "Registration failed";

/// Landing page: public feed plus the login and signup forms.
pub struct PublicController<'a> {
    api: &'a dyn IssueApi,
}

impl<'a> PublicController<'a> {
    pub fn new(api: &'a dyn IssueApi) -> Self {
        PublicController { api }
    }

    pub async fn load_feed(&self) -> Result<Vec<Issue>, ApiError> {
        self.api.public_issues().await.inspect_err(|e| {
            log::error!("Error loading public issues: {e}");
        })
    }

    /// Posts the credentials. The caller persists the session only on `Ok`.
    pub async fn login(&self, form: &LoginForm) -> Result<AuthResponse, ApiError> {
        let result = self.api.login(form).await;
        match &result {
            Ok(auth) => log::info!("{} signed in as {}", auth.user.email, auth.user.role),
            Err(e) => log::warn!("Login failed for {}: {e}", form.email),
        }
        result
    }

    pub async fn signup(&self, form: &SignupForm) -> Result<AuthResponse, ApiError> {
        let result = self.api.register(form).await;
        match &result {
            Ok(auth) => log::info!("{} registered as {}", auth.user.email, auth.user.role),
            Err(e) => log::warn!("Registration failed for {}: {e}", form.email),
        }
        result
    }
}
