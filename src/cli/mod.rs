//! Command-line interface
//!
//! Every command is non-interactive: input arrives through flags, and each invocation
//! performs a single load → mutate → save cycle against the workspace's JSONL files.

pub mod applications;
pub mod commands;
pub mod knowledge;

pub use commands::{Cli, Commands, KbCommands, run};
