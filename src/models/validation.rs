use chrono::NaiveDate;
use thiserror::Error;

use super::knowledge::KbEntryType;

/// Date format used for `date_applied` and `--date`
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// A record failed a precondition before reaching the store
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("{0} is required")]
    MissingField(&'static str),

    #[error("invalid status: {0:?} (must be one of: applied, interviewing, rejected, offer)")]
    InvalidStatus(String),

    #[error("invalid entry type: {0:?} (must be 'profile' or 'context')")]
    InvalidEntryType(String),

    #[error(
        "invalid profile category: {0:?} (must be one of: contact, experience, education, skills, certifications, languages)"
    )]
    InvalidProfileCategory(String),

    #[error("invalid date {0:?}: must be in YYYY-MM-DD format")]
    InvalidDate(String),

    #[error("invalid JSON for {category} data")]
    InvalidData {
        category: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("{field} does not belong on a {entry_type} entry")]
    UnexpectedField { field: &'static str, entry_type: KbEntryType },

    #[error("category is required")]
    EmptyCategory,

    #[error("content is required for context entries")]
    EmptyContent,
}

impl ValidationError {
    /// True when the failure is a missing required field
    pub fn is_missing_field(&self) -> bool {
        matches!(self, ValidationError::MissingField(_))
    }
}

/// Check that a required text field is non-empty
pub(crate) fn require(value: &str, field: &'static str) -> Result<(), ValidationError> {
    if value.is_empty() { Err(ValidationError::MissingField(field)) } else { Ok(()) }
}

/// Validate a `YYYY-MM-DD` calendar date
pub fn validate_date(value: &str) -> Result<NaiveDate, ValidationError> {
    NaiveDate::parse_from_str(value, DATE_FORMAT)
        .map_err(|_| ValidationError::InvalidDate(value.to_string()))
}
