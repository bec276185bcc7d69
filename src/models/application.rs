use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::deserializers::{empty_string_as_none, is_unset};
use super::ids::{APPLICATION_ID_PREFIX, generate_id};
use super::timestamps::{self, Timestamp};
use super::validation::{DATE_FORMAT, ValidationError, require, validate_date};

/// Where a job application currently stands
///
/// Records are read leniently: a status outside the known set (a hand edit such as
/// `"Interviewing"` or `"ghosted"`) is kept as [`Status::Other`] and written back as is.
/// Only [`FromStr`] and [`Application::validate`] insist on a known status.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub enum Status {
    #[default]
    Applied,
    Interviewing,
    Rejected,
    Offer,
    Other(String),
}

impl Status {
    pub const ALL: [Status; 4] =
        [Status::Applied, Status::Interviewing, Status::Rejected, Status::Offer];

    pub fn as_str(&self) -> &str {
        match self {
            Status::Applied => "applied",
            Status::Interviewing => "interviewing",
            Status::Rejected => "rejected",
            Status::Offer => "offer",
            Status::Other(raw) => raw,
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, Status::Other(_))
    }

    /// Status of a record that has none
    fn missing() -> Self {
        Status::Other(String::new())
    }

    /// Map a stored value to a status, keeping unknown values verbatim
    fn from_stored(raw: String) -> Self {
        Status::ALL.into_iter().find(|status| status.as_str() == raw).unwrap_or(Status::Other(raw))
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Status {
    type Err = ValidationError;

    /// Case-sensitive: "APPLIED" is not a status
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Status::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| ValidationError::InvalidStatus(s.to_string()))
    }
}

impl Serialize for Status {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Status {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<String>::deserialize(deserializer)?.unwrap_or_default();
        Ok(Status::from_stored(raw))
    }
}

/// One tracked job application
///
/// Missing fields read as empty (timestamps as [`timestamps::unset`]) rather than
/// rejecting the line; [`Application::validate`] is where they are checked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Application {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub role: String,
    #[serde(default = "Status::missing")]
    pub status: Status,
    #[serde(default)]
    pub date_applied: String,
    #[serde(default, deserialize_with = "empty_string_as_none", skip_serializing_if = "is_unset")]
    pub jd_url: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none", skip_serializing_if = "is_unset")]
    pub jd_content: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none", skip_serializing_if = "is_unset")]
    pub resume_path: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none", skip_serializing_if = "is_unset")]
    pub company_url: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none", skip_serializing_if = "is_unset")]
    pub notes: Option<String>,
    #[serde(default = "timestamps::unset", with = "timestamps")]
    pub created_at: Timestamp,
    #[serde(default = "timestamps::unset", with = "timestamps")]
    pub updated_at: Timestamp,
}

impl Application {
    /// Create an application with status `applied`, dated today (local time)
    pub fn new(company: impl Into<String>, role: impl Into<String>) -> Self {
        let now = timestamps::now();
        Self {
            id: generate_id(APPLICATION_ID_PREFIX),
            company: company.into(),
            role: role.into(),
            status: Status::default(),
            date_applied: now.format(DATE_FORMAT).to_string(),
            jd_url: None,
            jd_content: None,
            resume_path: None,
            company_url: None,
            notes: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        require(&self.company, "company")?;
        require(&self.role, "role")?;
        if !self.status.is_known() {
            return Err(ValidationError::InvalidStatus(self.status.to_string()));
        }
        validate_date(&self.date_applied)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_application_defaults() {
        let app = Application::new("Test Corp", "Software Engineer");
        assert_eq!(app.company, "Test Corp");
        assert_eq!(app.role, "Software Engineer");
        assert_eq!(app.status, Status::Applied);
        assert_eq!(app.date_applied, chrono::Local::now().format("%Y-%m-%d").to_string());
        assert!(app.id.starts_with("app-"));
        assert_eq!(app.id.len(), 12);
        assert_eq!(app.created_at, app.updated_at);
    }

    #[test]
    fn test_status_from_str() {
        assert_eq!("applied".parse::<Status>().unwrap(), Status::Applied);
        assert_eq!("interviewing".parse::<Status>().unwrap(), Status::Interviewing);
        assert_eq!("rejected".parse::<Status>().unwrap(), Status::Rejected);
        assert_eq!("offer".parse::<Status>().unwrap(), Status::Offer);
    }

    #[test]
    fn test_status_from_str_rejects_unknown() {
        assert!("invalid".parse::<Status>().is_err());
        assert!("".parse::<Status>().is_err());
        // case sensitive
        assert!("APPLIED".parse::<Status>().is_err());
    }

    #[test]
    fn test_serialization_omits_unset_fields() {
        let mut app = Application::new("Acme", "Engineer");
        app.notes = Some(String::new());
        let json = serde_json::to_string(&app).unwrap();
        assert!(json.contains(r#""status":"applied""#));
        assert!(json.contains(r#""date_applied""#));
        assert!(!json.contains("notes"));
        assert!(!json.contains("jd_url"));
    }

    #[test]
    fn test_optional_fields_round_trip() {
        let mut app = Application::new("Company", "Role");
        app.jd_url = Some("https://example.com/job".to_string());
        app.jd_content = Some("This is a job description".to_string());
        app.company_url = Some("https://example.com".to_string());
        app.resume_path = Some("outputs/resume.html".to_string());
        app.notes = Some("Applied via referral".to_string());

        let json = serde_json::to_string(&app).unwrap();
        let loaded: Application = serde_json::from_str(&json).unwrap();
        assert_eq!(loaded, app);
    }

    #[test]
    fn test_validate() {
        let app = Application::new("Acme", "Engineer");
        assert!(app.validate().is_ok());

        let mut missing = app.clone();
        missing.company.clear();
        assert!(missing.validate().unwrap_err().is_missing_field());

        let mut bad_date = app.clone();
        bad_date.date_applied = "January 5".to_string();
        assert!(matches!(bad_date.validate(), Err(ValidationError::InvalidDate(_))));

        let mut bad_status = app;
        bad_status.status = Status::Other("ghosted".to_string());
        assert!(matches!(bad_status.validate(), Err(ValidationError::InvalidStatus(_))));
    }

    #[test]
    fn test_unknown_status_kept_verbatim() {
        let json = r#"{"id":"app-00000001","company":"Acme","role":"Engineer","status":"Interviewing","date_applied":"2025-01-15","created_at":"2025-01-15T10:00:00Z","updated_at":"2025-01-15T10:00:00Z"}"#;
        let app: Application = serde_json::from_str(json).unwrap();
        assert_eq!(app.status, Status::Other("Interviewing".to_string()));
        assert_eq!(app.status.to_string(), "Interviewing");
        assert_eq!(serde_json::to_string(&app).unwrap(), json);
    }

    #[test]
    fn test_missing_fields_read_as_empty() {
        let app: Application = serde_json::from_str(r#"{"id":"app-00000001","company":"Acme"}"#).unwrap();
        assert_eq!(app.role, "");
        assert_eq!(app.status, Status::Other(String::new()));
        assert_eq!(app.date_applied, "");
        assert_eq!(app.created_at, timestamps::unset());
        assert!(app.validate().is_err());

        let json = serde_json::to_string(&app).unwrap();
        assert!(json.contains(r#""status":"""#));
        assert!(json.contains(r#""created_at":"0001-01-01T00:00:00Z""#));
    }

    #[test]
    fn test_timestamp_offset_preserved() {
        let json = r#"{"id":"app-00000001","company":"Acme","role":"Engineer","status":"applied","date_applied":"2025-01-15","created_at":"2025-01-15T10:00:00.123456789+02:00","updated_at":"2025-01-15T10:00:00.5-05:00"}"#;
        let app: Application = serde_json::from_str(json).unwrap();
        assert_eq!(serde_json::to_string(&app).unwrap(), json);
    }
}
