//! bt init command implementation
//!
//! Creates an empty bug store at the configured location, and optionally
//! writes a default `.bugtrack.toml`.

use std::path::{Path, PathBuf};

use crate::config::{Config, CONFIG_FILE};
use crate::error::{Error, Result};
use crate::output::{emit_success, HumanOutput, OutputOptions};
use crate::tracker::BugList;

use super::Context;

/// Options for `bt init`
pub struct InitOptions {
    pub force: bool,
    pub config: bool,
    pub store: Option<PathBuf>,
    pub output: OutputOptions,
}

#[derive(serde::Serialize)]
struct InitReport {
    path: PathBuf,
    replaced: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    config: Option<PathBuf>,
}

pub fn run(options: InitOptions) -> Result<()> {
    let context = Context::open(options.store)?;

    let session = context.store.lock()?;
    let replaced = session.exists();
    if replaced && !options.force {
        return Err(Error::InvalidArgument(format!(
            "bug store already exists at {} (use --force to replace it)",
            context.store.path().display()
        )));
    }
    session.save(&BugList::new())?;
    drop(session);

    let config = if options.config {
        ensure_config(&context.dir, &context.config)?
    } else {
        None
    };

    let mut human = HumanOutput::new(format!("bt init: {}", context.store.path().display()));
    human.push_summary("bugs", "0");
    if let Some(path) = &config {
        human.push_summary("config", path.display().to_string());
    }
    if replaced {
        human.push_warning("existing bugs were discarded");
    }
    human.push_next_step("bt new \"<summary>\"");

    let report = InitReport {
        path: context.store.path().to_path_buf(),
        replaced,
        config,
    };

    emit_success(options.output, "init", &report, Some(&human))
}

/// Write `config` to `dir/.bugtrack.toml` unless a config file is already there.
///
/// Returns the path written, or `None` when an existing file was kept.
fn ensure_config(dir: &Path, config: &Config) -> Result<Option<PathBuf>> {
    let config_path = dir.join(CONFIG_FILE);
    if config_path.exists() {
        if !config_path.is_file() {
            return Err(Error::InvalidArgument(format!(
                "{} exists but is not a file",
                config_path.display()
            )));
        }
        return Ok(None);
    }

    config.save(&config_path)?;
    Ok(Some(config_path))
}
