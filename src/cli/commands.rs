use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::debug;

use super::applications::{self, ApplicationArgs};
use super::knowledge::{self, KbArgs};
use crate::storage::{ApplicationStore, KnowledgeStore};
use crate::utils::get_workspace_dir;

#[derive(Parser)]
#[command(name = "brag")]
#[command(version)]
#[command(about = "Track job applications and a candidate knowledge base", long_about = None)]
pub struct Cli {
    /// Workspace directory holding applications.jsonl and candidate-kb.jsonl
    /// [default: $BRAG_DIR, then the current directory]
    #[arg(long, global = true, value_name = "PATH")]
    pub dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Add a new application (requires --company and --role)
    Add(ApplicationArgs),
    /// List all applications
    List,
    /// Show details of an application
    Show { id: String },
    /// Update an application; only the provided flags change
    Update {
        id: String,
        #[command(flatten)]
        fields: ApplicationArgs,
    },
    /// Remove an application
    Remove { id: String },
    /// Manage the candidate knowledge base
    Kb {
        #[command(subcommand)]
        command: KbCommands,
    },
}

#[derive(Subcommand)]
pub enum KbCommands {
    /// Show entries: all, `profile`, `context`, or a single category
    Show { filter: Option<String> },
    /// Add a new entry
    Add(KbArgs),
    /// Update an existing entry
    Update {
        id: String,
        #[command(flatten)]
        fields: KbArgs,
    },
    /// Remove an entry
    Remove { id: String },
}

pub fn run() -> Result<()> {
    execute(Cli::parse())
}

/// Dispatch an already-parsed command line
pub fn execute(cli: Cli) -> Result<()> {
    let Some(command) = cli.command else {
        println!("Use --help for usage information");
        return Ok(());
    };

    let workspace = get_workspace_dir(cli.dir.as_deref())?;
    debug!(workspace = %workspace.display(), "resolved workspace");

    match command {
        Commands::Add(args) => applications::add(&ApplicationStore::in_dir(&workspace), args),
        Commands::List => applications::list(&ApplicationStore::in_dir(&workspace)),
        Commands::Show { id } => applications::show(&ApplicationStore::in_dir(&workspace), &id),
        Commands::Update { id, fields } => {
            applications::update(&ApplicationStore::in_dir(&workspace), &id, fields)
        }
        Commands::Remove { id } => {
            applications::remove(&ApplicationStore::in_dir(&workspace), &id)
        }
        Commands::Kb { command } => {
            let store = KnowledgeStore::in_dir(&workspace);
            match command {
                KbCommands::Show { filter } => knowledge::show(&store, filter.as_deref()),
                KbCommands::Add(args) => knowledge::add(&store, args),
                KbCommands::Update { id, fields } => knowledge::update(&store, &id, fields),
                KbCommands::Remove { id } => knowledge::remove(&store, &id),
            }
        }
    }
}
