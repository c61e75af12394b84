//! The tracked bug entity.
//!
//! A [`Bug`] is created interactively through an [`IdCounter`] owned by its
//! collection, or reconstructed verbatim from a persisted [`BugRecord`].
//! After that it only changes through [`Bug::apply`].

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::command::{Command, Resolution};
use crate::error::{Error, Result};
use crate::state::{self, BugState, Lifecycle};

/// Identifier assigned to a bug at creation.
pub type BugId = u32;

/// Separator printed after each note by [`Bug::notes_text`].
pub const NOTE_SEPARATOR: &str = "\n------\n";

/// Monotonic id generator owned by a bug collection.
///
/// Once `BugId::MAX` has been handed out (or loaded) the counter is
/// exhausted and refuses to issue more ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdCounter {
    next: Option<BugId>,
}

impl Default for IdCounter {
    fn default() -> Self {
        Self { next: Some(0) }
    }
}

impl IdCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// The id the next created bug will receive, or `None` when exhausted.
    pub fn peek(&self) -> Option<BugId> {
        self.next
    }

    pub fn reset(&mut self) {
        self.next = Some(0);
    }

    /// Hand out the current id and move past it.
    pub fn advance(&mut self) -> Result<BugId> {
        let id = self
            .next
            .ok_or_else(|| Error::OperationFailed("bug id space exhausted".to_string()))?;
        self.next = id.checked_add(1);
        Ok(id)
    }

    /// Continue numbering after the largest of `ids`. No-op when `ids` is empty.
    pub fn resume_after(&mut self, ids: impl IntoIterator<Item = BugId>) {
        if let Some(max) = ids.into_iter().max() {
            self.next = max.checked_add(1);
        }
    }
}

/// Persisted view of a bug.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BugRecord {
    pub id: BugId,
    pub state: BugState,
    pub summary: String,
    pub reporter: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
    pub votes: u32,
    pub confirmed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolution: Option<Resolution>,
    #[serde(default)]
    pub notes: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bug {
    id: BugId,
    state: BugState,
    summary: String,
    reporter: String,
    owner: Option<String>,
    votes: u32,
    confirmed: bool,
    resolution: Option<Resolution>,
    notes: Vec<String>,
}

impl Bug {
    /// Report a new bug, taking the next id from `counter`.
    ///
    /// Fails only when the counter is exhausted.
    pub fn create(
        counter: &mut IdCounter,
        summary: impl Into<String>,
        reporter: impl Into<String>,
    ) -> Result<Self> {
        let bug = Self {
            id: counter.advance()?,
            state: BugState::Unconfirmed,
            summary: summary.into(),
            reporter: reporter.into(),
            owner: None,
            votes: 1,
            confirmed: false,
            resolution: None,
            notes: Vec::new(),
        };
        info!(bug = bug.id, reporter = %bug.reporter, "bug created");
        Ok(bug)
    }

    /// Rebuild a bug from a persisted record, copying every field as-is.
    ///
    /// The collection is responsible for moving its counter past loaded ids.
    pub fn reconstruct(record: BugRecord) -> Self {
        let bug = Self {
            id: record.id,
            state: record.state,
            summary: record.summary,
            reporter: record.reporter,
            owner: record.owner,
            votes: record.votes,
            confirmed: record.confirmed,
            resolution: record.resolution,
            notes: record.notes,
        };
        for violation in bug.invariant_violations() {
            warn!(bug = bug.id, state = %bug.state, "loaded bug is inconsistent: {violation}");
        }
        bug
    }

    pub fn to_record(&self) -> BugRecord {
        BugRecord {
            id: self.id,
            state: self.state,
            summary: self.summary.clone(),
            reporter: self.reporter.clone(),
            owner: self.owner.clone(),
            votes: self.votes,
            confirmed: self.confirmed,
            resolution: self.resolution,
            notes: self.notes.clone(),
        }
    }

    /// Dispatch `command` to the handler for the current state.
    ///
    /// A note on the command is logged before the transition is checked, so
    /// it is kept even when the command is rejected. No other field changes
    /// on failure.
    pub fn apply(&mut self, command: &Command) -> Result<()> {
        let action = command.action();
        debug!(bug = self.id, state = %self.state, %action, "dispatching command");

        if let Some(note) = command.note() {
            self.notes.push(note.to_string());
        }

        let next = match state::transition(self.lifecycle(), command) {
            Ok(next) => next,
            Err(err) => {
                debug!(bug = self.id, state = %self.state, %action, "command rejected: {err}");
                return Err(err);
            }
        };

        if next.state != self.state {
            info!(bug = self.id, from = %self.state, to = %next.state, %action, "bug state changed");
        }

        let Lifecycle {
            state,
            votes,
            owner,
            confirmed,
            resolution,
        } = next;
        self.state = state;
        self.votes = votes;
        self.owner = owner;
        self.confirmed = confirmed;
        self.resolution = resolution;
        Ok(())
    }

    /// Invariants a well-formed bug satisfies; empty when consistent.
    pub fn invariant_violations(&self) -> Vec<&'static str> {
        let mut violations = Vec::new();
        if self.votes < 1 {
            violations.push("votes must be at least 1");
        }
        if self.state.is_resolved() && self.resolution.is_none() {
            violations.push("resolved or closed bug has no resolution");
        }
        if !self.state.is_resolved() && self.resolution.is_some() {
            violations.push("open bug carries a resolution");
        }
        if self.state == BugState::Assigned && self.owner.is_none() {
            violations.push("assigned bug has no owner");
        }
        violations
    }

    pub fn id(&self) -> BugId {
        self.id
    }

    pub fn state(&self) -> BugState {
        self.state
    }

    pub fn summary(&self) -> &str {
        &self.summary
    }

    pub fn reporter(&self) -> &str {
        &self.reporter
    }

    pub fn owner(&self) -> Option<&str> {
        self.owner.as_deref()
    }

    pub fn votes(&self) -> u32 {
        self.votes
    }

    pub fn is_confirmed(&self) -> bool {
        self.confirmed
    }

    pub fn resolution(&self) -> Option<Resolution> {
        self.resolution
    }

    /// Wire name of the resolution, shown only while Resolved or Closed.
    pub fn resolution_name(&self) -> Option<&'static str> {
        if self.state.is_resolved() {
            self.resolution.map(Resolution::as_str)
        } else {
            None
        }
    }

    pub fn notes(&self) -> &[String] {
        &self.notes
    }

    /// All notes, each followed by [`NOTE_SEPARATOR`].
    pub fn notes_text(&self) -> String {
        self.notes
            .iter()
            .map(|note| format!("{note}{NOTE_SEPARATOR}"))
            .collect()
    }

    fn lifecycle(&self) -> Lifecycle {
        Lifecycle {
            state: self.state,
            votes: self.votes,
            owner: self.owner.clone(),
            confirmed: self.confirmed,
            resolution: self.resolution,
        }
    }
}
