//! bt workflow commands: vote, confirm, possess, resolve, verify, reopen
//!
//! Each command loads the store, applies one [`Command`] to one bug and
//! saves the result. A note is logged on the bug before the action is
//! checked, so a rejected command that carried a note is still saved.

use std::path::PathBuf;

use tracing::warn;

use crate::actor::non_empty;
use crate::bug::{BugId, BugRecord};
use crate::command::{Action, Command, Resolution};
use crate::error::Result;
use crate::output::{emit_success, HumanOutput, OutputOptions};
use crate::state::BugState;

use super::Context;

/// Options shared by every workflow command
pub struct TransitionOptions {
    pub id: BugId,
    pub action: Action,
    pub developer: Option<String>,
    pub reason: Option<String>,
    pub note: Option<String>,
    pub store: Option<PathBuf>,
    pub output: OutputOptions,
}

#[derive(serde::Serialize)]
struct TransitionReport {
    id: BugId,
    action: Action,
    from: BugState,
    to: BugState,
    bug: BugRecord,
}

pub fn run(options: TransitionOptions) -> Result<()> {
    let resolution = options
        .reason
        .as_deref()
        .map(str::parse::<Resolution>)
        .transpose()?;
    let developer = non_empty(options.developer.as_deref()).map(str::to_string);
    let note = non_empty(options.note.as_deref()).map(str::to_string);
    let command = Command::new(Some(options.action), developer, resolution, note)?;

    let context = Context::open(options.store)?;
    let session = context.store.lock()?;
    let mut list = session.load()?;
    let from = list.get(options.id)?.state();

    if let Err(err) = list.apply(options.id, &command) {
        if command.note().is_some() {
            warn!(id = options.id, action = %options.action, "command rejected; keeping its note");
            session.save(&list)?;
        }
        return Err(err);
    }
    session.save(&list)?;
    drop(session);

    let bug = list.get(options.id)?;
    let to = bug.state();

    let header = if from == to {
        format!("bt {}: #{} stays {to}", options.action, bug.id())
    } else {
        format!("bt {}: #{} {from} -> {to}", options.action, bug.id())
    };
    let mut human = HumanOutput::new(header);
    human.push_summary("votes", bug.votes().to_string());
    if let Some(owner) = bug.owner() {
        human.push_summary("owner", owner);
    }
    if let Some(name) = bug.resolution_name() {
        human.push_summary("resolution", name);
    }
    if let Some(note) = command.note() {
        human.push_detail(format!("note: {note}"));
    }
    for action in to.legal_actions() {
        human.push_next_step(next_step_for(bug.id(), action));
    }

    let report = TransitionReport {
        id: bug.id(),
        action: options.action,
        from,
        to,
        bug: bug.to_record(),
    };

    emit_success(options.output, options.action.as_str(), &report, Some(&human))
}

/// Command line that performs `action` on bug `id`
pub(super) fn next_step_for(id: BugId, action: Action) -> String {
    match action {
        Action::Possess => format!("bt possess {id} <developer>"),
        Action::Resolve => {
            format!("bt resolve {id} --reason <fixed|duplicate|wontfix|worksforme>")
        }
        other => format!("bt {other} {id}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn next_steps_include_required_arguments() {
        assert_eq!(next_step_for(3, Action::Vote), "bt vote 3");
        assert_eq!(
            next_step_for(3, Action::Possess),
            "bt possess 3 <developer>"
        );
        assert!(next_step_for(7, Action::Resolve).starts_with("bt resolve 7 --reason"));
    }
}
