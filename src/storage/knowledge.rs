//! Knowledge-base lookups layered over the generic store

use super::error::StoreError;
use super::jsonl::KnowledgeStore;
use crate::models::{KbEntry, KbEntryType, ProfileCategory};

impl KnowledgeStore {
    pub fn by_type(&self, entry_type: KbEntryType) -> Result<Vec<KbEntry>, StoreError> {
        Ok(self.load()?.into_iter().filter(|e| e.entry_type() == Some(entry_type)).collect())
    }

    /// Entries whose category matches exactly, profile or context
    pub fn by_category(&self, category: &str) -> Result<Vec<KbEntry>, StoreError> {
        Ok(self.load()?.into_iter().filter(|e| e.category() == category).collect())
    }

    pub fn profile(&self) -> Result<Vec<KbEntry>, StoreError> {
        self.by_type(KbEntryType::Profile)
    }

    pub fn context(&self) -> Result<Vec<KbEntry>, StoreError> {
        self.by_type(KbEntryType::Context)
    }

    /// The first contact entry; there should be at most one
    pub fn contact(&self) -> Result<KbEntry, StoreError> {
        self.first_profile(ProfileCategory::Contact)
    }

    /// The first skills entry; there should be at most one
    pub fn skills(&self) -> Result<KbEntry, StoreError> {
        self.first_profile(ProfileCategory::Skills)
    }

    pub fn experience(&self) -> Result<Vec<KbEntry>, StoreError> {
        self.by_category(ProfileCategory::Experience.as_str())
    }

    pub fn education(&self) -> Result<Vec<KbEntry>, StoreError> {
        self.by_category(ProfileCategory::Education.as_str())
    }

    fn first_profile(&self, category: ProfileCategory) -> Result<KbEntry, StoreError> {
        self.by_category(category.as_str())?
            .into_iter()
            .next()
            .ok_or_else(|| StoreError::not_found(category.as_str()))
    }
}
