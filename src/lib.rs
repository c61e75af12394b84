//! bugtrack - Bug Lifecycle Library
//!
//! This library provides the core functionality for the bt CLI tool,
//! tracking bugs from first report through confirmation, ownership,
//! resolution and verification.
//!
//! # Core Concepts
//!
//! - **Bugs**: Reports with a summary, a reporter, votes and a note log
//! - **Commands**: Validated user actions (vote, confirm, possess, ...)
//! - **States**: Unconfirmed, New, Assigned, Resolved, Reopen, Closed
//! - **Transition table**: The only place that decides which action is
//!   legal in which state
//!
//! # Module Organization
//!
//! - `cli`: Command-line interface using clap
//! - `command`: Actions, resolutions and the validated `Command`
//! - `state`: Lifecycle states and the transition table
//! - `bug`: A single tracked bug and the id counter
//! - `tracker`: The bug collection and its queries
//! - `storage`: JSON snapshot persistence
//! - `lock`: File locking and atomic writes for concurrency safety
//! - `config`: Configuration loading from `.bugtrack.toml`
//! - `actor`: Reporter identity resolution
//! - `output`: Human and JSON output for the CLI
//! - `error`: Error types and result aliases

pub mod actor;
pub mod bug;
pub mod cli;
pub mod command;
pub mod config;
pub mod error;
pub mod lock;
pub mod output;
pub mod state;
pub mod storage;
pub mod tracker;

pub use error::{Error, Result};
