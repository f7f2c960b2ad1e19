use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Categories offered by the report form. The API owns the authoritative set;
/// issues carrying any other category still render and filter normally.
pub const CATEGORIES: &[&str] = &[
    "Road",
    "Water",
    "Electricity",
    "Sanitation",
    "Streetlight",
    "Waste",
    "Other",
];

/// Lifecycle stage of an issue. Serialized with the API's display labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IssueStatus {
    Pending,
    #[serde(rename = "In Progress")]
    InProgress,
    Resolved,
}

impl IssueStatus {
    pub const ALL: [IssueStatus; 3] = [
        IssueStatus::Pending,
        IssueStatus::InProgress,
        IssueStatus::Resolved,
    ];

    pub fn label(self) -> &'static str {
        match self {
            IssueStatus::Pending => "Pending",
            IssueStatus::InProgress => "In Progress",
            IssueStatus::Resolved => "Resolved",
        }
    }

    /// CSS-friendly slug: lowercase with the first space turned into a dash.
    pub fn slug(self) -> String {
        self.label().to_lowercase().replacen(' ', "-", 1)
    }
}

impl fmt::Display for IssueStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for IssueStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        IssueStatus::ALL
            .into_iter()
            .find(|status| status.label() == s)
            .ok_or_else(|| format!("Unknown issue status: {s}"))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
}

impl Location {
    /// Returns `None` unless both coordinates are finite and within range.
    pub fn checked(latitude: f64, longitude: f64) -> Option<Self> {
        let valid = latitude.is_finite()
            && longitude.is_finite()
            && (-90.0..=90.0).contains(&latitude)
            && (-180.0..=180.0).contains(&longitude);
        valid.then_some(Location { latitude, longitude })
    }

    /// "lat, lon" with six decimals.
    pub fn display_precise(&self) -> String {
        format!("{:.6}, {:.6}", self.latitude, self.longitude)
    }
}

/// Denormalized snapshot of the reporting user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reporter {
    pub name: String,
    #[serde(default)]
    pub email: String,
}

/// An issue as returned by the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Issue {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    pub title: String,
    pub description: String,
    pub category: String,
    pub status: IssueStatus,
    pub image_url: String,
    pub location: Location,
    pub reported_by: Reporter,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Issue {
    pub fn was_updated(&self) -> bool {
        self.updated_at != self.created_at
    }
}

/// Image attached to a new report.
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// Everything the citizen typed into the report form.
#[derive(Debug, Clone, Default)]
pub struct ReportDraft {
    pub title: String,
    pub description: String,
    pub category: String,
    pub image: Option<ImageUpload>,
}

/// Fully assembled multipart payload for `POST /issues/report`.
#[derive(Debug, Clone)]
pub struct NewReport {
    pub title: String,
    pub description: String,
    pub category: String,
    pub location: Location,
    pub image: ImageUpload,
}

/// Formats a timestamp the way the dashboards show dates (M/D/YYYY).
pub fn format_date(at: &DateTime<Utc>) -> String {
    at.format("%-m/%-d/%Y").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_slugs() {
        assert_eq!(IssueStatus::Pending.slug(), "pending");
        assert_eq!(IssueStatus::InProgress.slug(), "in-progress");
        assert_eq!(IssueStatus::Resolved.slug(), "resolved");
    }

    #[test]
    fn status_parses_wire_labels() {
        assert_eq!("In Progress".parse::<IssueStatus>(), Ok(IssueStatus::InProgress));
        assert!("in progress".parse::<IssueStatus>().is_err());
        assert!("".parse::<IssueStatus>().is_err());
    }

    #[test]
    fn issue_deserializes_from_api_shape() {
        let json = r#"{
            "_id": "665f1c",
            "title": "Pothole",
            "description": "Deep pothole on Main St",
            "category": "Road",
            "status": "In Progress",
            "imageUrl": "https://img.example/1.jpg",
            "location": {"latitude": 12.9715987, "longitude": 77.5945627},
            "reportedBy": {"name": "Asha", "email": "asha@example.com"},
            "createdAt": "2024-03-05T10:00:00.000Z",
            "updatedAt": "2024-03-06T08:30:00.000Z"
        }"#;
        let issue: Issue = serde_json::from_str(json).expect("parse issue");
        assert_eq!(issue.id, "665f1c");
        assert_eq!(issue.status, IssueStatus::InProgress);
        assert_eq!(issue.reported_by.email, "asha@example.com");
        assert!(issue.was_updated());
        assert_eq!(format_date(&issue.created_at), "3/5/2024");
        assert_eq!(issue.location.display_precise(), "12.971599, 77.594563");
    }

    #[test]
    fn reporter_email_is_optional() {
        let r: Reporter = serde_json::from_str(r#"{"name":"Ravi"}"#).expect("parse reporter");
        assert_eq!(r.email, "");
    }

    #[test]
    fn location_range_checks() {
        assert!(Location::checked(45.0, 90.0).is_some());
        assert!(Location::checked(91.0, 0.0).is_none());
        assert!(Location::checked(0.0, -180.5).is_none());
        assert!(Location::checked(f64::NAN, 0.0).is_none());
    }
}
