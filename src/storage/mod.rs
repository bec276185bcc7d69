//! JSONL record storage for applications and knowledge-base entries
//!
//! # Storage Model
//!
//! Each collection lives in one newline-delimited JSON file, one compact object per line.
//! The store keeps nothing in memory between calls: every operation reads the whole file,
//! and every mutation rewrites it.
//!
//! - **Load**: a missing file is an empty collection. Records are read leniently (unknown
//!   statuses, entry types and payload shapes are kept as written). Lines that are not a
//!   JSON object at all are logged with `tracing::warn!` and dropped, so one corrupted line
//!   never hides the rest of the file. A dropped line is gone for good once the next
//!   mutation rewrites the file.
//!
//! - **Save**: records are written to a temporary file next to the target which is then
//!   renamed over it, so an interrupted write leaves the previous contents in place.
//!
//! - **Not found**: `get`, `update` and `remove` report a missing ID as
//!   [`StoreError::NotFound`] and never touch the file in that case.
//!
//! # Concurrency
//!
//! There is no locking. Two processes doing load → mutate → save on the same file at the
//! same time will lose one of the updates. The tool assumes a single user running one
//! command at a time.

pub mod error;
pub mod jsonl;
pub mod knowledge;

pub use error::StoreError;
pub use jsonl::{ApplicationStore, JsonlStore, KnowledgeStore, Record};
