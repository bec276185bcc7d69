//! Shared test utilities for integration tests
#![allow(dead_code)]

use std::fs;
use std::path::Path;

use tempfile::TempDir;

/// Builder for workspace directories holding the two JSONL files
pub struct WorkspaceBuilder {
    temp_dir: TempDir,
}

impl WorkspaceBuilder {
    /// Create a new builder with an empty workspace directory
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        Self { temp_dir }
    }

    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Write applications.jsonl with the given raw content
    pub fn with_applications(self, content: &str) -> Self {
        fs::write(self.temp_dir.path().join("applications.jsonl"), content)
            .expect("Failed to write applications.jsonl");
        self
    }

    /// Write candidate-kb.jsonl with the given raw content
    pub fn with_knowledge(self, content: &str) -> Self {
        fs::write(self.temp_dir.path().join("candidate-kb.jsonl"), content)
            .expect("Failed to write candidate-kb.jsonl");
        self
    }

    /// Write applications.jsonl from builders, newline-terminated
    pub fn with_application_lines(self, lines: &[ApplicationLine]) -> Self {
        let content: String = lines.iter().map(|l| l.to_json() + "\n").collect();
        self.with_applications(&content)
    }

    /// Build and return the temp directory (consumes self)
    pub fn build(self) -> TempDir {
        self.temp_dir
    }
}

impl Default for WorkspaceBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for applications.jsonl lines
pub struct ApplicationLine {
    id: String,
    company: String,
    role: String,
    status: String,
    date_applied: String,
    notes: Option<String>,
}

impl ApplicationLine {
    pub fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            company: "Acme".to_string(),
            role: "Engineer".to_string(),
            status: "applied".to_string(),
            date_applied: "2025-01-15".to_string(),
            notes: None,
        }
    }

    pub fn company(mut self, company: &str) -> Self {
        self.company = company.to_string();
        self
    }

    pub fn role(mut self, role: &str) -> Self {
        self.role = role.to_string();
        self
    }

    pub fn status(mut self, status: &str) -> Self {
        self.status = status.to_string();
        self
    }

    pub fn notes(mut self, notes: &str) -> Self {
        self.notes = Some(notes.to_string());
        self
    }

    pub fn to_json(&self) -> String {
        let mut value = serde_json::json!({
            "id": self.id,
            "company": self.company,
            "role": self.role,
            "status": self.status,
            "date_applied": self.date_applied,
            "created_at": "2025-01-15T10:00:00Z",
            "updated_at": "2025-01-15T10:00:00Z",
        });
        if let Some(notes) = &self.notes {
            value["notes"] = serde_json::Value::String(notes.clone());
        }
        value.to_string()
    }
}

/// A context entry line for candidate-kb.jsonl
pub fn context_line(id: &str, category: &str, content: &str) -> String {
    serde_json::json!({
        "id": id,
        "type": "context",
        "category": category,
        "content": content,
        "created_at": "2025-01-15T10:00:00Z",
        "updated_at": "2025-01-15T10:00:00Z",
    })
    .to_string()
}

/// A profile entry line for candidate-kb.jsonl
pub fn profile_line(id: &str, category: &str, data: serde_json::Value) -> String {
    serde_json::json!({
        "id": id,
        "type": "profile",
        "category": category,
        "data": data,
        "source": "cv-import",
        "created_at": "2025-01-15T10:00:00Z",
        "updated_at": "2025-01-15T10:00:00Z",
    })
    .to_string()
}
