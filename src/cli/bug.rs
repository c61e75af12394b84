//! bt bug commands: new, list, show, delete

use std::path::PathBuf;

use crate::actor::{self, resolve_actor};
use crate::bug::{BugId, BugRecord};
use crate::command::Action;
use crate::error::{Error, Result};
use crate::output::{emit_success, format_rows, HumanOutput, OutputOptions};
use crate::tracker::BugRow;

use super::workflow::next_step_for;
use super::Context;

/// Options for `bt new`
pub struct NewOptions {
    pub summary: String,
    pub reporter: Option<String>,
    pub store: Option<PathBuf>,
    pub output: OutputOptions,
}

/// Options for `bt list`
pub struct ListOptions {
    pub owner: Option<String>,
    pub store: Option<PathBuf>,
    pub output: OutputOptions,
}

/// Options for `bt show`
pub struct ShowOptions {
    pub id: BugId,
    pub store: Option<PathBuf>,
    pub output: OutputOptions,
}

/// Options for `bt delete`
pub struct DeleteOptions {
    pub id: BugId,
    pub store: Option<PathBuf>,
    pub output: OutputOptions,
}

#[derive(serde::Serialize)]
struct ListReport {
    #[serde(skip_serializing_if = "Option::is_none")]
    owner: Option<String>,
    total: usize,
    bugs: Vec<BugRow>,
}

#[derive(serde::Serialize)]
struct ShowReport {
    #[serde(flatten)]
    bug: BugRecord,
    legal_actions: Vec<Action>,
}

pub fn run_new(options: NewOptions) -> Result<()> {
    let summary = actor::non_empty(Some(options.summary.as_str()))
        .ok_or_else(|| Error::InvalidArgument("summary cannot be empty".to_string()))?
        .to_string();

    let context = Context::open(options.store)?;
    let reporter = resolve_actor(options.reporter.as_deref(), &context.config);

    let session = context.store.lock()?;
    let mut list = session.load()?;
    let id = list.add_bug(summary, reporter)?;
    session.save(&list)?;

    let bug = list.get(id)?;
    let record = bug.to_record();

    let mut human = HumanOutput::new(format!("bt new: #{id} {}", bug.summary()));
    human.push_summary("state", bug.state().as_str());
    human.push_summary("reporter", bug.reporter());
    human.push_summary("votes", bug.votes().to_string());
    human.push_next_step(next_step_for(id, Action::Vote));
    human.push_next_step(next_step_for(id, Action::Confirm));

    emit_success(options.output, "new", &record, Some(&human))
}

pub fn run_list(options: ListOptions) -> Result<()> {
    let context = Context::open(options.store)?;
    let list = context.store.load()?;

    let owner = options.owner;
    let rows = match owner.as_deref() {
        Some(owner) => list.rows_by_owner(owner),
        None => list.rows(),
    };

    let header = match owner.as_deref() {
        Some(owner) => format!("bt list: {} bug(s) owned by {owner}", rows.len()),
        None => format!("bt list: {} bug(s)", rows.len()),
    };
    let mut human = HumanOutput::new(header);
    for line in format_rows(&rows) {
        human.push_detail(line);
    }
    if list.is_empty() {
        human.push_next_step("bt new \"<summary>\"");
    }

    let report = ListReport {
        owner,
        total: rows.len(),
        bugs: rows,
    };

    emit_success(options.output, "list", &report, Some(&human))
}

pub fn run_show(options: ShowOptions) -> Result<()> {
    let context = Context::open(options.store)?;
    let list = context.store.load()?;
    let bug = list.get(options.id)?;

    let legal_actions = bug.state().legal_actions();

    let mut human = HumanOutput::new(format!("bt show: #{} {}", bug.id(), bug.summary()));
    human.push_summary("state", bug.state().as_str());
    human.push_summary("reporter", bug.reporter());
    human.push_summary("owner", bug.owner().unwrap_or("-"));
    human.push_summary("votes", bug.votes().to_string());
    human.push_summary("confirmed", bug.is_confirmed().to_string());
    if let Some(name) = bug.resolution_name() {
        human.push_summary("resolution", name);
    }
    for note in bug.notes() {
        human.push_detail(note.clone());
    }
    for violation in bug.invariant_violations() {
        human.push_warning(violation);
    }
    for action in &legal_actions {
        human.push_next_step(next_step_for(bug.id(), *action));
    }

    let report = ShowReport {
        bug: bug.to_record(),
        legal_actions,
    };

    emit_success(options.output, "show", &report, Some(&human))
}

pub fn run_delete(options: DeleteOptions) -> Result<()> {
    let context = Context::open(options.store)?;
    let session = context.store.lock()?;
    let mut list = session.load()?;
    let removed = list.delete_by_id(options.id)?;
    session.save(&list)?;

    let mut human = HumanOutput::new(format!(
        "bt delete: #{} {}",
        removed.id(),
        removed.summary()
    ));
    human.push_summary("remaining", list.len().to_string());

    emit_success(options.output, "delete", &removed.to_record(), Some(&human))
}
