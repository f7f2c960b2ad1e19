use actix_session::Session;
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::models::issue::Location;
use crate::models::user::{AuthResponse, Role, SessionUser};

const TOKEN_KEY: &str = "token";
const USER_KEY: &str = "user";
const LOCATION_KEY: &str = "current_location";
const FLASH_KEY: &str = "flash";
const REPORT_DRAFT_KEY: &str = "report_draft";

/// Credential and identity of the signed-in user.
#[derive(Debug, Clone)]
pub struct SignedIn {
    pub token: String,
    pub user: SessionUser,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlashKind {
    Success,
    Error,
}

/// One-shot notification shown on the next rendered page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Flash {
    pub kind: FlashKind,
    pub message: String,
}

impl Flash {
    pub fn success(message: impl Into<String>) -> Self {
        Flash { kind: FlashKind::Success, message: message.into() }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Flash { kind: FlashKind::Error, message: message.into() }
    }

    pub fn css_class(&self) -> &'static str {
        match self.kind {
            FlashKind::Success => "alert-success",
            FlashKind::Error => "alert-error",
        }
    }
}

/// Persists a successful login/registration. The session id is renewed so a
/// pre-login cookie cannot be reused.
pub fn store_signed_in(session: &Session, auth: &AuthResponse) -> Result<(), AppError> {
    session.renew();
    session
        .insert(TOKEN_KEY, &auth.token)
        .map_err(|e| AppError::Session(e.to_string()))?;
    session
        .insert(USER_KEY, &auth.user)
        .map_err(|e| AppError::Session(e.to_string()))?;
    Ok(())
}

pub fn get_signed_in(session: &Session) -> Option<SignedIn> {
    let token = session.get::<String>(TOKEN_KEY).unwrap_or(None)?;
    let user = session.get::<SessionUser>(USER_KEY).unwrap_or(None)?;
    if token.is_empty() {
        return None;
    }
    Some(SignedIn { token, user })
}

/// Signed-in identity, required to hold `role`.
pub fn require_role(session: &Session, role: Role) -> Result<SignedIn, AppError> {
    match get_signed_in(session) {
        Some(signed_in) if signed_in.user.role == role => Ok(signed_in),
        Some(_) => Err(AppError::Session(format!("Session role is not {role}"))),
        None => Err(AppError::Session("No signed-in user".to_string())),
    }
}

pub fn has_role(session: &Session, role: Role) -> bool {
    get_signed_in(session).is_some_and(|s| s.user.role == role)
}

pub fn set_flash(session: &Session, flash: Flash) {
    if let Err(e) = session.insert(FLASH_KEY, flash) {
        log::warn!("Failed to store flash message: {e}");
    }
}

pub fn take_flash(session: &Session) -> Option<Flash> {
    let flash = session.get::<Flash>(FLASH_KEY).unwrap_or(None);
    if flash.is_some() {
        session.remove(FLASH_KEY);
    }
    flash
}

/// Text fields of a report that could not be submitted, restored into the
/// form on the next dashboard render. The photo has to be picked again.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SavedReport {
    pub title: String,
    pub description: String,
    pub category: String,
    pub error: String,
}

// Byte budgets per field once the draft is JSON-encoded inside the session
// state. They keep the encrypted cookie under the 4 KB browser limit.
const SAVED_TITLE_BUDGET: usize = 200;
const SAVED_DESCRIPTION_BUDGET: usize = 1200;
const SAVED_CATEGORY_BUDGET: usize = 60;
const SAVED_ERROR_BUDGET: usize = 300;

impl SavedReport {
    /// Builds a draft with every field clipped to its session budget.
    pub fn new(title: &str, description: &str, category: &str, error: &str) -> Self {
        SavedReport {
            title: clip_for_session(title, SAVED_TITLE_BUDGET),
            description: clip_for_session(description, SAVED_DESCRIPTION_BUDGET),
            category: clip_for_session(category, SAVED_CATEGORY_BUDGET),
            error: clip_for_session(error, SAVED_ERROR_BUDGET),
        }
    }
}

/// Longest prefix of `text` that still fits `budget` bytes after the value is
/// JSON-escaped twice (once as a field, once inside the session state map).
fn clip_for_session(text: &str, budget: usize) -> String {
    let mut used = 0;
    let mut clipped = String::new();
    for c in text.chars() {
        let cost = match c {
            '"' | '\\' => 4,
            c if c.is_control() => 7,
            c => c.len_utf8(),
        };
        if used + cost > budget {
            break;
        }
        used += cost;
        clipped.push(c);
    }
    clipped
}

pub fn save_report_draft(session: &Session, draft: &SavedReport) {
    if let Err(e) = session.insert(REPORT_DRAFT_KEY, draft) {
        log::warn!("Failed to keep report draft: {e}");
    }
}

pub fn take_report_draft(session: &Session) -> Option<SavedReport> {
    let draft = session.get::<SavedReport>(REPORT_DRAFT_KEY).unwrap_or(None);
    if draft.is_some() {
        session.remove(REPORT_DRAFT_KEY);
    }
    draft
}

pub fn get_location(session: &Session) -> Option<Location> {
    session.get::<Location>(LOCATION_KEY).unwrap_or(None)
}

pub fn set_location(session: &Session, location: Option<Location>) {
    match location {
        Some(loc) => {
            if let Err(e) = session.insert(LOCATION_KEY, loc) {
                log::warn!("Failed to store captured location: {e}");
            }
        }
        None => {
            session.remove(LOCATION_KEY);
        }
    }
}
