//! Command-line interface for bt
//!
//! This module defines the CLI structure using clap derive macros.
//! Subcommands are implemented in their own submodules.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::bug::BugId;
use crate::command::Action;
use crate::config::Config;
use crate::error::Result;
use crate::output::OutputOptions;
use crate::storage::BugStore;

mod bug;
mod init;
mod workflow;

/// bt - bug lifecycle tracker
///
/// Report bugs, vote and confirm them, take ownership, resolve, verify,
/// and reopen them.
#[derive(Parser, Debug)]
#[command(name = "bt")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to the bug store (defaults to store.path from .bugtrack.toml)
    #[arg(long, global = true, env = "BT_STORE")]
    pub store: Option<PathBuf>,

    /// Actor identity used as reporter
    #[arg(long, global = true)]
    pub actor: Option<String>,

    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create a new, empty bug store
    Init {
        /// Replace an existing store
        #[arg(long)]
        force: bool,

        /// Also write a default .bugtrack.toml if none exists
        #[arg(long)]
        config: bool,
    },

    /// Report a new bug
    New {
        /// One-line description of the bug
        summary: String,

        /// Reporter name (defaults to --actor, BT_ACTOR, or actor.default)
        #[arg(long)]
        reporter: Option<String>,
    },

    /// List bugs
    List {
        /// Only bugs owned by this developer
        #[arg(long)]
        owner: Option<String>,
    },

    /// Show one bug in full
    Show {
        /// Bug id
        id: BugId,
    },

    /// Vote for an unconfirmed bug
    Vote {
        /// Bug id
        id: BugId,

        /// Note to log with the vote
        #[arg(long)]
        note: Option<String>,
    },

    /// Confirm an unconfirmed bug
    Confirm {
        /// Bug id
        id: BugId,

        /// Developer confirming the bug
        #[arg(long)]
        developer: Option<String>,

        /// Note to log with the confirmation
        #[arg(long)]
        note: Option<String>,
    },

    /// Take ownership of a new or reopened bug
    Possess {
        /// Bug id
        id: BugId,

        /// Developer taking the bug
        developer: String,

        /// Note to log with the assignment
        #[arg(long)]
        note: Option<String>,
    },

    /// Resolve an assigned or reopened bug
    Resolve {
        /// Bug id
        id: BugId,

        /// Resolution: fixed, duplicate, wontfix, worksforme
        #[arg(long)]
        reason: String,

        /// Note to log with the resolution
        #[arg(long)]
        note: Option<String>,
    },

    /// Verify a resolved fix and close the bug
    Verify {
        /// Bug id
        id: BugId,

        /// Note to log with the verification
        #[arg(long)]
        note: Option<String>,
    },

    /// Reopen a resolved or closed bug
    Reopen {
        /// Bug id
        id: BugId,

        /// Note to log with the reopen
        #[arg(long)]
        note: Option<String>,
    },

    /// Delete a bug from the store
    Delete {
        /// Bug id
        id: BugId,
    },
}

impl Cli {
    /// Execute the CLI command
    pub fn run(self) -> Result<()> {
        let output = OutputOptions {
            json: self.json,
            quiet: self.quiet,
        };
        let store = self.store;

        match self.command {
            Commands::Init { force, config } => init::run(init::InitOptions {
                force,
                config,
                store,
                output,
            }),
            Commands::New { summary, reporter } => bug::run_new(bug::NewOptions {
                summary,
                reporter: reporter.or(self.actor),
                store,
                output,
            }),
            Commands::List { owner } => bug::run_list(bug::ListOptions {
                owner,
                store,
                output,
            }),
            Commands::Show { id } => bug::run_show(bug::ShowOptions { id, store, output }),
            Commands::Delete { id } => bug::run_delete(bug::DeleteOptions { id, store, output }),
            Commands::Vote { id, note } => workflow::run(workflow::TransitionOptions {
                id,
                action: Action::Vote,
                developer: None,
                reason: None,
                note,
                store,
                output,
            }),
            Commands::Confirm {
                id,
                developer,
                note,
            } => workflow::run(workflow::TransitionOptions {
                id,
                action: Action::Confirm,
                developer,
                reason: None,
                note,
                store,
                output,
            }),
            Commands::Possess {
                id,
                developer,
                note,
            } => workflow::run(workflow::TransitionOptions {
                id,
                action: Action::Possess,
                developer: Some(developer),
                reason: None,
                note,
                store,
                output,
            }),
            Commands::Resolve { id, reason, note } => {
                workflow::run(workflow::TransitionOptions {
                    id,
                    action: Action::Resolve,
                    developer: None,
                    reason: Some(reason),
                    note,
                    store,
                    output,
                })
            }
            Commands::Verify { id, note } => workflow::run(workflow::TransitionOptions {
                id,
                action: Action::Verify,
                developer: None,
                reason: None,
                note,
                store,
                output,
            }),
            Commands::Reopen { id, note } => workflow::run(workflow::TransitionOptions {
                id,
                action: Action::Reopen,
                developer: None,
                reason: None,
                note,
                store,
                output,
            }),
        }
    }
}

/// Configuration and store resolved for one invocation
struct Context {
    dir: PathBuf,
    config: Config,
    store: BugStore,
}

impl Context {
    fn open(store: Option<PathBuf>) -> Result<Self> {
        let cwd = std::env::current_dir()?;
        let config = Config::load_from_dir(&cwd);
        let store = match store {
            Some(path) => {
                let path = if path.is_absolute() { path } else { cwd.join(path) };
                BugStore::new(path).with_lock_timeout(config.store.lock_timeout_ms)
            }
            None => config.open_store(&cwd),
        };
        Ok(Self {
            dir: cwd,
            config,
            store,
        })
    }
}
