//! brag - Track job applications and a candidate knowledge base
//!
//! All data lives in two JSON Lines files inside a workspace directory:
//!
//! - `applications.jsonl` holds one [`Application`] per line
//! - `candidate-kb.jsonl` holds one [`KbEntry`] per line, either structured
//!   profile data (contact, experience, skills, ...) or a free-text context note
//!
//! The stores are stateless: every operation re-reads the file, and every
//! mutation rewrites it in full.
//!
//! # Example
//!
//! ```no_run
//! use brag::models::Application;
//! use brag::storage::ApplicationStore;
//! use std::path::Path;
//!
//! let store = ApplicationStore::in_dir(Path::new("/home/alice/job-search"));
//! store.add(Application::new("Acme", "Engineer"))?;
//! println!("Tracking {} applications", store.load()?.len());
//! # Ok::<(), brag::StoreError>(())
//! ```

pub mod cli;
pub mod models;
pub mod storage;
pub mod utils;

// Re-export commonly used types
pub use models::{Application, KbEntry};
pub use storage::{ApplicationStore, KnowledgeStore, StoreError};
