//! Commands applied to tracked bugs.
//!
//! A [`Command`] is validated once, at construction. Whether the action is
//! legal for a particular bug is decided later by the transition table in
//! [`crate::state`].

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// User actions that drive the bug lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    Vote,
    Possess,
    Resolve,
    Verify,
    Reopen,
    Confirm,
}

impl Action {
    pub const ALL: [Action; 6] = [
        Action::Vote,
        Action::Possess,
        Action::Resolve,
        Action::Verify,
        Action::Reopen,
        Action::Confirm,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Action::Vote => "vote",
            Action::Possess => "possess",
            Action::Resolve => "resolve",
            Action::Verify => "verify",
            Action::Reopen => "reopen",
            Action::Confirm => "confirm",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Action {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        Action::ALL
            .into_iter()
            .find(|action| action.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| Error::InvalidArgument(format!("unknown action '{trimmed}'")))
    }
}

/// Why a bug left active development.
///
/// Variant names are the persisted wire names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Resolution {
    Fixed,
    Duplicate,
    WontFix,
    WorksForMe,
}

impl Resolution {
    pub const ALL: [Resolution; 4] = [
        Resolution::Fixed,
        Resolution::Duplicate,
        Resolution::WontFix,
        Resolution::WorksForMe,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Resolution::Fixed => "Fixed",
            Resolution::Duplicate => "Duplicate",
            Resolution::WontFix => "WontFix",
            Resolution::WorksForMe => "WorksForMe",
        }
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Resolution {
    type Err = Error;

    /// Accepts wire names case-insensitively, plus `wont-fix` style spellings.
    fn from_str(s: &str) -> Result<Self> {
        let normalized: String = s
            .trim()
            .chars()
            .filter(|ch| !matches!(ch, '-' | '_' | ' ' | '\''))
            .collect();
        Resolution::ALL
            .into_iter()
            .find(|resolution| resolution.as_str().eq_ignore_ascii_case(&normalized))
            .ok_or_else(|| {
                Error::InvalidArgument(format!(
                    "unknown resolution '{}' (expected fixed|duplicate|wontfix|worksforme)",
                    s.trim()
                ))
            })
    }
}

/// A validated request to change a bug.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    action: Action,
    developer_id: Option<String>,
    resolution: Option<Resolution>,
    note: Option<String>,
}

impl Command {
    /// Build a command from raw parts, as a form or CLI would collect them.
    ///
    /// Fails with [`Error::Validation`] when the action is missing, when
    /// `Resolve` has no resolution, or when `Possess` has no developer id.
    pub fn new(
        action: Option<Action>,
        developer_id: Option<String>,
        resolution: Option<Resolution>,
        note: Option<String>,
    ) -> Result<Self> {
        let action =
            action.ok_or_else(|| Error::Validation("an action is required".to_string()))?;

        if action == Action::Resolve && resolution.is_none() {
            return Err(Error::Validation(
                "resolve requires a resolution".to_string(),
            ));
        }

        if action == Action::Possess
            && developer_id.as_deref().map_or(true, str::is_empty)
        {
            return Err(Error::Validation(
                "possess requires a developer id".to_string(),
            ));
        }

        Ok(Self {
            action,
            developer_id,
            resolution,
            note,
        })
    }

    pub fn vote() -> Self {
        Self::bare(Action::Vote)
    }

    pub fn confirm() -> Self {
        Self::bare(Action::Confirm)
    }

    /// Confirm on behalf of a developer; an owned, unconfirmed bug moves to Assigned.
    pub fn confirm_for(developer_id: impl Into<String>) -> Self {
        Self {
            developer_id: Some(developer_id.into()),
            ..Self::bare(Action::Confirm)
        }
    }

    pub fn possess(developer_id: impl Into<String>) -> Result<Self> {
        Self::new(Some(Action::Possess), Some(developer_id.into()), None, None)
    }

    pub fn resolve(resolution: Resolution) -> Self {
        Self {
            resolution: Some(resolution),
            ..Self::bare(Action::Resolve)
        }
    }

    pub fn verify() -> Self {
        Self::bare(Action::Verify)
    }

    pub fn reopen() -> Self {
        Self::bare(Action::Reopen)
    }

    /// Attach a note to be logged when the command is dispatched.
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    pub fn action(&self) -> Action {
        self.action
    }

    pub fn developer_id(&self) -> Option<&str> {
        self.developer_id.as_deref()
    }

    pub fn resolution(&self) -> Option<Resolution> {
        self.resolution
    }

    pub fn note(&self) -> Option<&str> {
        self.note.as_deref()
    }

    /// Skips validation so handler-level field checks can be exercised.
    #[cfg(test)]
    pub(crate) fn unchecked(
        action: Action,
        developer_id: Option<&str>,
        resolution: Option<Resolution>,
        note: Option<&str>,
    ) -> Self {
        Self {
            action,
            developer_id: developer_id.map(str::to_string),
            resolution,
            note: note.map(str::to_string),
        }
    }

    fn bare(action: Action) -> Self {
        Self {
            action,
            developer_id: None,
            resolution: None,
            note: None,
        }
    }
}
