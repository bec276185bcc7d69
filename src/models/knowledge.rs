use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};
use tracing::debug;

use super::deserializers::empty_string_as_none;
use super::ids::{KB_ID_PREFIX, generate_id};
use super::timestamps::{self, Timestamp};
use super::validation::{ValidationError, require};

/// Distinguishes structured profile facts from free-text context notes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KbEntryType {
    Profile,
    Context,
}

impl KbEntryType {
    pub fn as_str(&self) -> &'static str {
        match self {
            KbEntryType::Profile => "profile",
            KbEntryType::Context => "context",
        }
    }
}

impl fmt::Display for KbEntryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for KbEntryType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "profile" => Ok(KbEntryType::Profile),
            "context" => Ok(KbEntryType::Context),
            other => Err(ValidationError::InvalidEntryType(other.to_string())),
        }
    }
}

/// Categories of structured profile data
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProfileCategory {
    Contact,
    Experience,
    Education,
    Skills,
    Certifications,
    Languages,
}

impl ProfileCategory {
    pub const ALL: [ProfileCategory; 6] = [
        ProfileCategory::Contact,
        ProfileCategory::Experience,
        ProfileCategory::Education,
        ProfileCategory::Skills,
        ProfileCategory::Certifications,
        ProfileCategory::Languages,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ProfileCategory::Contact => "contact",
            ProfileCategory::Experience => "experience",
            ProfileCategory::Education => "education",
            ProfileCategory::Skills => "skills",
            ProfileCategory::Certifications => "certifications",
            ProfileCategory::Languages => "languages",
        }
    }
}

impl fmt::Display for ProfileCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProfileCategory {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ProfileCategory::ALL
            .into_iter()
            .find(|category| category.as_str() == s)
            .ok_or_else(|| ValidationError::InvalidProfileCategory(s.to_string()))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContactData {
    pub name: String,
    pub email: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub phone: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub location: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub linkedin: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub github: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub website: String,
    /// Keys without a field of their own, written back unchanged
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ContactData {
    pub fn validate(&self) -> Result<(), ValidationError> {
        require(&self.name, "name")?;
        require(&self.email, "email")
    }
}

/// A single work experience entry
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExperienceEntry {
    pub company: String,
    pub role: String,
    /// YYYY-MM
    pub start_date: String,
    /// YYYY-MM or "present"
    #[serde(skip_serializing_if = "String::is_empty")]
    pub end_date: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub location: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub highlights: Vec<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ExperienceEntry {
    pub fn validate(&self) -> Result<(), ValidationError> {
        require(&self.company, "company")?;
        require(&self.role, "role")?;
        require(&self.start_date, "start_date")
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EducationEntry {
    pub institution: String,
    pub degree: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub field: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub start_date: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub end_date: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub gpa: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl EducationEntry {
    pub fn validate(&self) -> Result<(), ValidationError> {
        require(&self.institution, "institution")?;
        require(&self.degree, "degree")
    }
}

/// Skills grouped by kind. Every list is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SkillsData {
    /// Programming languages
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub languages: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub frameworks: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tools: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub databases: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub cloud: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub other: Vec<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl SkillsData {
    pub fn validate(&self) -> Result<(), ValidationError> {
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self.count() == 0
    }

    /// Total number of skills across all groups
    pub fn count(&self) -> usize {
        self.languages.len()
            + self.frameworks.len()
            + self.tools.len()
            + self.databases.len()
            + self.cloud.len()
            + self.other.len()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CertificationEntry {
    pub name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub issuer: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub date: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub expiry_date: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub credential_id: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl CertificationEntry {
    pub fn validate(&self) -> Result<(), ValidationError> {
        require(&self.name, "certification name")
    }
}

/// Spoken or written language proficiency
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LanguageEntry {
    pub language: String,
    /// e.g. "native", "fluent", "intermediate", "basic"
    #[serde(skip_serializing_if = "String::is_empty")]
    pub proficiency: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl LanguageEntry {
    pub fn validate(&self) -> Result<(), ValidationError> {
        require(&self.language, "language")
    }
}

/// Structured payload of a profile entry, one variant per category.
///
/// Serializes as the bare payload object; the category travels separately
/// in the entry's `category` field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ProfileData {
    Contact(ContactData),
    Experience(ExperienceEntry),
    Education(EducationEntry),
    Skills(SkillsData),
    Certifications(CertificationEntry),
    Languages(LanguageEntry),
}

impl ProfileData {
    pub fn category(&self) -> ProfileCategory {
        match self {
            ProfileData::Contact(_) => ProfileCategory::Contact,
            ProfileData::Experience(_) => ProfileCategory::Experience,
            ProfileData::Education(_) => ProfileCategory::Education,
            ProfileData::Skills(_) => ProfileCategory::Skills,
            ProfileData::Certifications(_) => ProfileCategory::Certifications,
            ProfileData::Languages(_) => ProfileCategory::Languages,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        match self {
            ProfileData::Contact(data) => data.validate(),
            ProfileData::Experience(data) => data.validate(),
            ProfileData::Education(data) => data.validate(),
            ProfileData::Skills(data) => data.validate(),
            ProfileData::Certifications(data) => data.validate(),
            ProfileData::Languages(data) => data.validate(),
        }
    }

    /// Decode an already-parsed JSON value as the payload for `category`
    pub fn from_value(category: ProfileCategory, value: Value) -> serde_json::Result<Self> {
        Ok(match category {
            ProfileCategory::Contact => ProfileData::Contact(serde_json::from_value(value)?),
            ProfileCategory::Experience => ProfileData::Experience(serde_json::from_value(value)?),
            ProfileCategory::Education => ProfileData::Education(serde_json::from_value(value)?),
            ProfileCategory::Skills => ProfileData::Skills(serde_json::from_value(value)?),
            ProfileCategory::Certifications => {
                ProfileData::Certifications(serde_json::from_value(value)?)
            }
            ProfileCategory::Languages => ProfileData::Languages(serde_json::from_value(value)?),
        })
    }

    /// Parse user-supplied JSON for `category` and check its required fields
    pub fn parse(category: ProfileCategory, json: &str) -> Result<Self, ValidationError> {
        let invalid = |source| ValidationError::InvalidData { category: category.as_str(), source };
        let value: Value = serde_json::from_str(json).map_err(invalid)?;
        let data = Self::from_value(category, value).map_err(invalid)?;
        data.validate()?;
        Ok(data)
    }
}

/// What a knowledge-base entry carries, selected by its type
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KbBody {
    Profile(ProfileData),
    Context { category: String, content: String },
    /// Stored fields that form neither a valid profile nor a context body, kept as read
    Unrecognized(RawKbBody),
}

impl KbBody {
    pub fn validate(&self) -> Result<(), ValidationError> {
        match self {
            KbBody::Profile(data) => data.validate(),
            KbBody::Context { category, content } => {
                if category.is_empty() {
                    return Err(ValidationError::EmptyCategory);
                }
                if content.is_empty() {
                    return Err(ValidationError::EmptyContent);
                }
                Ok(())
            }
            KbBody::Unrecognized(raw) => raw.interpret()?.validate(),
        }
    }
}

/// The type-dependent fields of a stored entry, before interpretation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawKbBody {
    pub entry_type: String,
    pub category: String,
    pub data: Option<Value>,
    pub content: Option<String>,
}

impl RawKbBody {
    /// Read the fields as a profile or context body
    pub fn interpret(&self) -> Result<KbBody, ValidationError> {
        match self.entry_type.parse::<KbEntryType>()? {
            KbEntryType::Profile => {
                if self.content.is_some() {
                    return Err(ValidationError::UnexpectedField {
                        field: "content",
                        entry_type: KbEntryType::Profile,
                    });
                }
                let category: ProfileCategory = self.category.parse()?;
                let value = self.data.clone().ok_or(ValidationError::MissingField("data"))?;
                let data = ProfileData::from_value(category, value).map_err(|source| {
                    ValidationError::InvalidData { category: category.as_str(), source }
                })?;
                Ok(KbBody::Profile(data))
            }
            KbEntryType::Context => {
                if self.data.is_some() {
                    return Err(ValidationError::UnexpectedField {
                        field: "data",
                        entry_type: KbEntryType::Context,
                    });
                }
                Ok(KbBody::Context {
                    category: self.category.clone(),
                    content: self.content.clone().unwrap_or_default(),
                })
            }
        }
    }
}

impl From<RawKbBody> for KbBody {
    fn from(raw: RawKbBody) -> Self {
        match raw.interpret() {
            Ok(body) => body,
            Err(e) => {
                debug!(
                    entry_type = %raw.entry_type,
                    category = %raw.category,
                    error = %e,
                    "keeping entry uninterpreted"
                );
                KbBody::Unrecognized(raw)
            }
        }
    }
}

/// One knowledge-base record
///
/// Reading never rejects an entry for its type, category or payload: anything that does
/// not interpret cleanly is kept as [`KbBody::Unrecognized`] and written back unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "KbEntryWire")]
pub struct KbEntry {
    pub id: String,
    pub body: KbBody,
    pub source: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl KbEntry {
    fn with_body(body: KbBody, source: Option<String>) -> Self {
        let now = timestamps::now();
        Self {
            id: generate_id(KB_ID_PREFIX),
            body,
            source: source.filter(|s| !s.is_empty()),
            created_at: now,
            updated_at: now,
        }
    }

    /// New profile entry; the category follows from the payload
    pub fn profile(data: ProfileData, source: Option<String>) -> Self {
        Self::with_body(KbBody::Profile(data), source)
    }

    /// New context entry with a freeform category
    pub fn context(
        category: impl Into<String>,
        content: impl Into<String>,
        source: Option<String>,
    ) -> Self {
        Self::with_body(
            KbBody::Context { category: category.into(), content: content.into() },
            source,
        )
    }

    /// `None` when the stored type is neither profile nor context
    pub fn entry_type(&self) -> Option<KbEntryType> {
        match &self.body {
            KbBody::Profile(_) => Some(KbEntryType::Profile),
            KbBody::Context { .. } => Some(KbEntryType::Context),
            KbBody::Unrecognized(raw) => raw.entry_type.parse().ok(),
        }
    }

    /// The type as stored
    pub fn type_name(&self) -> &str {
        match &self.body {
            KbBody::Profile(_) => KbEntryType::Profile.as_str(),
            KbBody::Context { .. } => KbEntryType::Context.as_str(),
            KbBody::Unrecognized(raw) => &raw.entry_type,
        }
    }

    pub fn category(&self) -> &str {
        match &self.body {
            KbBody::Profile(data) => data.category().as_str(),
            KbBody::Context { category, .. } => category,
            KbBody::Unrecognized(raw) => &raw.category,
        }
    }

    /// Typed profile payload, if the entry has one
    pub fn data(&self) -> Option<&ProfileData> {
        match &self.body {
            KbBody::Profile(data) => Some(data),
            _ => None,
        }
    }

    pub fn content(&self) -> Option<&str> {
        match &self.body {
            KbBody::Profile(_) => None,
            KbBody::Context { content, .. } => Some(content),
            KbBody::Unrecognized(raw) => raw.content.as_deref(),
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        self.body.validate()
    }
}

/// On-disk shape of a knowledge-base line. Missing fields read as empty.
#[derive(Deserialize)]
struct KbEntryWire {
    #[serde(default)]
    id: String,
    #[serde(rename = "type", default)]
    entry_type: String,
    #[serde(default)]
    category: String,
    #[serde(default)]
    data: Option<Value>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    content: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    source: Option<String>,
    #[serde(default = "timestamps::unset", deserialize_with = "timestamps::deserialize")]
    created_at: Timestamp,
    #[serde(default = "timestamps::unset", deserialize_with = "timestamps::deserialize")]
    updated_at: Timestamp,
}

impl From<KbEntryWire> for KbEntry {
    fn from(wire: KbEntryWire) -> Self {
        let raw = RawKbBody {
            entry_type: wire.entry_type,
            category: wire.category,
            data: wire.data,
            content: wire.content,
        };

        KbEntry {
            id: wire.id,
            body: raw.into(),
            source: wire.source,
            created_at: wire.created_at,
            updated_at: wire.updated_at,
        }
    }
}

#[derive(Serialize)]
#[serde(untagged)]
enum DataRef<'a> {
    Typed(&'a ProfileData),
    Raw(&'a Value),
}

#[derive(Serialize)]
struct KbEntryWireRef<'a> {
    id: &'a str,
    #[serde(rename = "type")]
    entry_type: &'a str,
    category: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<DataRef<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    content: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    source: Option<&'a str>,
    #[serde(serialize_with = "timestamps::serialize")]
    created_at: Timestamp,
    #[serde(serialize_with = "timestamps::serialize")]
    updated_at: Timestamp,
}

impl Serialize for KbEntry {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let data = match &self.body {
            KbBody::Profile(data) => Some(DataRef::Typed(data)),
            KbBody::Context { .. } => None,
            KbBody::Unrecognized(raw) => raw.data.as_ref().map(DataRef::Raw),
        };

        KbEntryWireRef {
            id: &self.id,
            entry_type: self.type_name(),
            category: self.category(),
            data,
            content: self.content().filter(|c| !c.is_empty()),
            source: self.source.as_deref().filter(|s| !s.is_empty()),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
        .serialize(serializer)
    }
}
