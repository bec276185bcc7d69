//! Data models for tracked applications and the candidate knowledge base.
//!
//! - [`Application`] - One job application and its [`Status`]
//! - [`KbEntry`] - A knowledge-base record, either structured profile data
//!   ([`ProfileData`]) or a free-text context note
//!
//! Field validation lives next to each model and returns [`ValidationError`].
//! The store never validates; callers check records before persisting them.

pub mod application;
pub mod deserializers;
pub mod ids;
pub mod knowledge;
pub mod timestamps;
pub mod validation;

pub use application::{Application, Status};
pub use ids::generate_id;
pub use knowledge::{
    CertificationEntry, ContactData, EducationEntry, ExperienceEntry, KbBody, KbEntry,
    KbEntryType, LanguageEntry, ProfileCategory, ProfileData, RawKbBody, SkillsData,
};
pub use timestamps::Timestamp;
pub use validation::{ValidationError, validate_date};
