use std::fmt;

use crate::api::{ApiError, IssueApi};
use crate::models::issue::{Issue, IssueFilter, IssueStats, Location, NewReport, ReportDraft};

pub const LOCATION_REQUIRED: &str = "Please get your current location first.";
pub const IMAGE_REQUIRED: &str = "Please attach a photo of the issue.";
pub const LOCATION_FAILED: &str = "Error getting location. Please try again.";
pub const REPORT_FAILED: &str = "Failed to report issue";
pub const REPORT_SUCCEEDED: &str = "Issue reported successfully!";

/// Result of a single geolocation attempt, as reported by the browser.
#[derive(Debug, Clone, PartialEq)]
pub enum LocationReading {
    Fix { latitude: f64, longitude: f64 },
    Failed(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum ReportError {
    /// No location captured yet; nothing was sent.
    MissingLocation,
    /// No image part in the upload; nothing was sent.
    MissingImage,
    Api(ApiError),
}

impl ReportError {
    pub fn user_message(&self) -> String {
        match self {
            ReportError::MissingLocation => LOCATION_REQUIRED.to_string(),
            ReportError::MissingImage => IMAGE_REQUIRED.to_string(),
            ReportError::Api(e) => e.user_message(REPORT_FAILED),
        }
    }
}

impl fmt::Display for ReportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReportError::MissingLocation => write!(f, "no location captured"),
            ReportError::MissingImage => write!(f, "no image attached"),
            ReportError::Api(e) => write!(f, "{e}"),
        }
    }
}

impl From<ApiError> for ReportError {
    fn from(e: ApiError) -> Self {
        ReportError::Api(e)
    }
}

/// Citizen dashboard: the user's own issues and the report form.
pub struct CitizenController<'a> {
    api: &'a dyn IssueApi,
    token: &'a str,
    issues: Vec<Issue>,
    filter: IssueFilter,
    location: Option<Location>,
    load_failed: bool,
}

impl<'a> CitizenController<'a> {
    /// `location` is the fix captured earlier in this page session, if any.
    pub fn new(api: &'a dyn IssueApi, token: &'a str, location: Option<Location>) -> Self {
        CitizenController {
            api,
            token,
            issues: Vec::new(),
            filter: IssueFilter::default(),
            location,
            load_failed: false,
        }
    }

    /// Replaces the held list with the user's issues from the API.
    /// On failure the previous list is kept.
    pub async fn refresh(&mut self) -> Result<(), ApiError> {
        match self.api.my_issues(self.token).await {
            Ok(issues) => {
                self.load_failed = false;
                self.issues = issues;
                Ok(())
            }
            Err(e) => {
                self.load_failed = true;
                log::error!("Error loading citizen issues: {e}");
                Err(e)
            }
        }
    }

    pub fn load_failed(&self) -> bool {
        self.load_failed
    }

    pub fn set_filter(&mut self, filter: IssueFilter) {
        self.filter = filter;
    }

    pub fn filter(&self) -> &IssueFilter {
        &self.filter
    }

    pub fn issues(&self) -> &[Issue] {
        &self.issues
    }

    pub fn visible_issues(&self) -> Vec<Issue> {
        self.filter.apply(&self.issues)
    }

    pub fn stats(&self) -> IssueStats {
        IssueStats::compute(&self.issues)
    }

    pub fn location(&self) -> Option<Location> {
        self.location
    }

    /// Records one geolocation attempt. A failed or out-of-range reading
    /// clears whatever was captured before.
    pub fn capture_location(&mut self, reading: LocationReading) -> Option<Location> {
        self.location = match reading {
            LocationReading::Fix { latitude, longitude } => Location::checked(latitude, longitude),
            LocationReading::Failed(reason) => {
                log::warn!("Geolocation error: {reason}");
                None
            }
        };
        self.location
    }

    /// Submits a new report. Without a captured location or an image no API
    /// call is made. On success the captured location is cleared and the list
    /// is refreshed; on failure everything is left as it was. Any 2xx answer
    /// counts as success, so the created issue is only returned when the API
    /// sent one back.
    pub async fn submit_report(
        &mut self,
        draft: ReportDraft,
    ) -> Result<Option<Issue>, ReportError> {
        let Some(location) = self.location else {
            return Err(ReportError::MissingLocation);
        };
        let Some(image) = draft.image else {
            return Err(ReportError::MissingImage);
        };

        let report = NewReport {
            title: draft.title,
            description: draft.description,
            category: draft.category,
            location,
            image,
        };

        let created = self.api.report_issue(self.token, report).await.inspect_err(|e| {
            log::error!("Report error: {e}");
        })?;
        match &created {
            Some(issue) => log::info!("Reported issue {}", issue.id),
            None => log::info!("Issue reported"),
        }

        self.location = None;
        // The report already went through; a failed reload only leaves the
        // previous list on screen.
        let _ = self.refresh().await;
        Ok(created)
    }
}
