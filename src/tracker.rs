//! Bug collection.
//!
//! [`BugList`] owns the bugs of one tracker together with the [`IdCounter`]
//! used to number new ones. It is constructed explicitly and handed to
//! whoever needs it; there is no global instance.

use std::collections::HashSet;

use serde::Serialize;
use tracing::info;

use crate::bug::{Bug, BugId, BugRecord, IdCounter};
use crate::command::Command;
use crate::error::{Error, Result};
use crate::state::BugState;

/// One line of a bug listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BugRow {
    pub id: BugId,
    pub state: BugState,
    pub summary: String,
}

impl From<&Bug> for BugRow {
    fn from(bug: &Bug) -> Self {
        Self {
            id: bug.id(),
            state: bug.state(),
            summary: bug.summary().to_string(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct BugList {
    bugs: Vec<Bug>,
    counter: IdCounter,
}

impl BugList {
    /// An empty collection; numbering starts at 0.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a collection from persisted records.
    pub fn from_records(records: Vec<BugRecord>) -> Result<Self> {
        let mut list = Self::new();
        list.load_records(records)?;
        Ok(list)
    }

    /// Append persisted records and move the counter past every id held.
    ///
    /// Nothing is loaded if any record reuses an id already in the
    /// collection or repeats an id within `records`.
    pub fn load_records(&mut self, records: Vec<BugRecord>) -> Result<usize> {
        let mut seen: HashSet<BugId> = self.bugs.iter().map(Bug::id).collect();
        for record in &records {
            if !seen.insert(record.id) {
                return Err(Error::DuplicateBugId(record.id));
            }
        }

        let loaded = records.len();
        self.bugs.extend(records.into_iter().map(Bug::reconstruct));
        self.counter.resume_after(self.bugs.iter().map(Bug::id));
        info!(loaded, next_id = ?self.counter.peek(), "bug records loaded");
        Ok(loaded)
    }

    /// Report a new bug and return its id.
    ///
    /// Fails with [`Error::OperationFailed`] once every id has been used.
    pub fn add_bug(
        &mut self,
        summary: impl Into<String>,
        reporter: impl Into<String>,
    ) -> Result<BugId> {
        let bug = Bug::create(&mut self.counter, summary, reporter)?;
        let id = bug.id();
        self.bugs.push(bug);
        Ok(id)
    }

    pub fn delete_by_id(&mut self, id: BugId) -> Result<Bug> {
        let index = self
            .bugs
            .iter()
            .position(|bug| bug.id() == id)
            .ok_or(Error::BugNotFound(id))?;
        let removed = self.bugs.remove(index);
        info!(bug = id, "bug deleted");
        Ok(removed)
    }

    pub fn find_by_id(&self, id: BugId) -> Option<&Bug> {
        self.bugs.iter().find(|bug| bug.id() == id)
    }

    /// Like [`BugList::find_by_id`], but a missing bug is an error.
    pub fn get(&self, id: BugId) -> Result<&Bug> {
        self.find_by_id(id).ok_or(Error::BugNotFound(id))
    }

    /// Bugs whose owner is exactly `owner`, in collection order.
    pub fn filter_by_owner(&self, owner: &str) -> Vec<&Bug> {
        self.bugs
            .iter()
            .filter(|bug| bug.owner() == Some(owner))
            .collect()
    }

    /// Dispatch `command` to the bug with `id`.
    pub fn apply(&mut self, id: BugId, command: &Command) -> Result<&Bug> {
        let bug = self
            .bugs
            .iter_mut()
            .find(|bug| bug.id() == id)
            .ok_or(Error::BugNotFound(id))?;
        bug.apply(command)?;
        Ok(bug)
    }

    pub fn rows(&self) -> Vec<BugRow> {
        self.bugs.iter().map(BugRow::from).collect()
    }

    pub fn rows_by_owner(&self, owner: &str) -> Vec<BugRow> {
        self.filter_by_owner(owner)
            .into_iter()
            .map(BugRow::from)
            .collect()
    }

    pub fn to_records(&self) -> Vec<BugRecord> {
        self.bugs.iter().map(Bug::to_record).collect()
    }

    pub fn bugs(&self) -> &[Bug] {
        &self.bugs
    }

    /// The id the next reported bug will receive; `None` once ids run out.
    pub fn next_id(&self) -> Option<BugId> {
        self.counter.peek()
    }

    pub fn len(&self) -> usize {
        self.bugs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bugs.is_empty()
    }
}
