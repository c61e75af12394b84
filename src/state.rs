//! Bug lifecycle states and the transition table.
//!
//! Each legal `(state, action)` pair maps to a pure handler that takes the
//! bug's current [`Lifecycle`] fields and returns the updated ones. Pairs
//! missing from the table are rejected with
//! [`Error::UnsupportedTransition`].
//!
//! ```text
//! Unconfirmed --vote x3 / confirm--> New --possess--> Assigned
//! Assigned --resolve(fixed)--> Resolved --verify--> Closed
//! Assigned --resolve(other)--> Closed
//! Resolved, Closed --reopen--> Reopened (confirmed) | Unconfirmed
//! Reopened --possess--> Assigned, Reopened --resolve--> Resolved | Closed
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::command::{Action, Command, Resolution};
use crate::error::{Error, Result};

/// Number of votes needed for a bug to leave Unconfirmed.
pub const VOTE_THRESHOLD: u32 = 3;

/// The six lifecycle states. Serialized names are the persisted wire names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BugState {
    Unconfirmed,
    New,
    Assigned,
    Resolved,
    #[serde(rename = "Reopen")]
    Reopened,
    Closed,
}

impl BugState {
    pub const ALL: [BugState; 6] = [
        BugState::Unconfirmed,
        BugState::New,
        BugState::Assigned,
        BugState::Resolved,
        BugState::Reopened,
        BugState::Closed,
    ];

    /// Wire name of the state.
    pub const fn as_str(self) -> &'static str {
        match self {
            BugState::Unconfirmed => "Unconfirmed",
            BugState::New => "New",
            BugState::Assigned => "Assigned",
            BugState::Resolved => "Resolved",
            BugState::Reopened => "Reopen",
            BugState::Closed => "Closed",
        }
    }

    /// Whether a resolution is carried in this state.
    pub const fn is_resolved(self) -> bool {
        matches!(self, BugState::Resolved | BugState::Closed)
    }

    pub fn allows(self, action: Action) -> bool {
        handler(self, action).is_some()
    }

    /// Actions the transition table accepts in this state.
    pub fn legal_actions(self) -> Vec<Action> {
        Action::ALL
            .into_iter()
            .filter(|action| self.allows(*action))
            .collect()
    }
}

impl fmt::Display for BugState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BugState {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        if trimmed.eq_ignore_ascii_case("reopened") {
            return Ok(BugState::Reopened);
        }
        BugState::ALL
            .into_iter()
            .find(|state| state.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| Error::InvalidArgument(format!("unknown state '{trimmed}'")))
    }
}

/// The bug fields a transition may read and replace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lifecycle {
    pub state: BugState,
    pub votes: u32,
    pub owner: Option<String>,
    pub confirmed: bool,
    pub resolution: Option<Resolution>,
}

type Handler = fn(Lifecycle, &Command) -> Result<Lifecycle>;

fn handler(state: BugState, action: Action) -> Option<Handler> {
    let handler: Handler = match (state, action) {
        (BugState::Unconfirmed, Action::Vote) => unconfirmed_vote,
        (BugState::Unconfirmed, Action::Confirm) => unconfirmed_confirm,
        (BugState::New, Action::Possess) => take_possession,
        (BugState::Assigned, Action::Resolve) => resolve,
        (BugState::Resolved, Action::Verify) => verify,
        (BugState::Resolved, Action::Reopen) => reopen,
        (BugState::Reopened, Action::Possess) => take_possession,
        (BugState::Reopened, Action::Resolve) => resolve,
        (BugState::Closed, Action::Reopen) => reopen,
        _ => return None,
    };
    Some(handler)
}

/// Compute the fields that result from applying `command` to `current`.
///
/// Does not touch notes; note logging is the caller's side effect.
pub fn transition(current: Lifecycle, command: &Command) -> Result<Lifecycle> {
    let state = current.state;
    let action = command.action();
    let handler = handler(state, action).ok_or(Error::UnsupportedTransition { state, action })?;
    handler(current, command)
}

fn unconfirmed_vote(mut fields: Lifecycle, _command: &Command) -> Result<Lifecycle> {
    fields.votes = fields.votes.saturating_add(1);
    if fields.votes >= VOTE_THRESHOLD {
        fields.state = if fields.owner.is_none() {
            BugState::New
        } else {
            BugState::Assigned
        };
    }
    Ok(fields)
}

fn unconfirmed_confirm(mut fields: Lifecycle, command: &Command) -> Result<Lifecycle> {
    if fields.owner.is_none() {
        fields.state = BugState::New;
    } else if command.developer_id().is_some() {
        fields.state = BugState::Assigned;
    }
    fields.confirmed = true;
    Ok(fields)
}

fn take_possession(mut fields: Lifecycle, command: &Command) -> Result<Lifecycle> {
    let developer = command
        .developer_id()
        .filter(|id| !id.is_empty())
        .ok_or_else(|| Error::Validation("possess requires a developer id".to_string()))?;
    fields.owner = Some(developer.to_string());
    fields.state = BugState::Assigned;
    Ok(fields)
}

fn resolve(mut fields: Lifecycle, command: &Command) -> Result<Lifecycle> {
    let resolution = command
        .resolution()
        .ok_or_else(|| Error::Validation("resolve requires a resolution".to_string()))?;
    fields.state = match resolution {
        Resolution::Fixed => BugState::Resolved,
        _ => BugState::Closed,
    };
    fields.resolution = Some(resolution);
    Ok(fields)
}

fn verify(mut fields: Lifecycle, _command: &Command) -> Result<Lifecycle> {
    fields.state = BugState::Closed;
    Ok(fields)
}

fn reopen(mut fields: Lifecycle, _command: &Command) -> Result<Lifecycle> {
    fields.state = if fields.confirmed {
        BugState::Reopened
    } else {
        BugState::Unconfirmed
    };
    fields.resolution = None;
    Ok(fields)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(state: BugState) -> Lifecycle {
        Lifecycle {
            state,
            votes: 1,
            owner: None,
            confirmed: false,
            resolution: None,
        }
    }

    fn owned(state: BugState, owner: &str) -> Lifecycle {
        Lifecycle {
            owner: Some(owner.to_string()),
            ..fields(state)
        }
    }

    #[test]
    fn vote_below_threshold_keeps_state() {
        let next = transition(fields(BugState::Unconfirmed), &Command::vote()).unwrap();
        assert_eq!(next.state, BugState::Unconfirmed);
        assert_eq!(next.votes, 2);
    }

    #[test]
    fn vote_reaching_threshold_moves_to_new_or_assigned() {
        let current = Lifecycle {
            votes: 2,
            ..fields(BugState::Unconfirmed)
        };
        let next = transition(current, &Command::vote()).unwrap();
        assert_eq!(next.state, BugState::New);
        assert_eq!(next.votes, 3);

        let current = Lifecycle {
            votes: 2,
            ..owned(BugState::Unconfirmed, "bob")
        };
        let next = transition(current, &Command::vote()).unwrap();
        assert_eq!(next.state, BugState::Assigned);
        assert_eq!(next.owner.as_deref(), Some("bob"));
    }

    #[test]
    fn confirm_branches_on_owner_and_developer() {
        let next = transition(fields(BugState::Unconfirmed), &Command::confirm()).unwrap();
        assert_eq!(next.state, BugState::New);
        assert!(next.confirmed);

        let next = transition(
            owned(BugState::Unconfirmed, "bob"),
            &Command::confirm_for("carol"),
        )
        .unwrap();
        assert_eq!(next.state, BugState::Assigned);
        assert_eq!(next.owner.as_deref(), Some("bob"));
        assert!(next.confirmed);

        let next = transition(owned(BugState::Unconfirmed, "bob"), &Command::confirm()).unwrap();
        assert_eq!(next.state, BugState::Unconfirmed);
        assert!(next.confirmed);
    }

    #[test]
    fn possess_assigns_owner_from_new_and_reopened() {
        for state in [BugState::New, BugState::Reopened] {
            let next = transition(fields(state), &Command::possess("bob").unwrap()).unwrap();
            assert_eq!(next.state, BugState::Assigned);
            assert_eq!(next.owner.as_deref(), Some("bob"));
        }
    }

    #[test]
    fn resolve_splits_fixed_from_other_reasons() {
        for state in [BugState::Assigned, BugState::Reopened] {
            let next = transition(
                owned(state, "bob"),
                &Command::resolve(Resolution::Fixed),
            )
            .unwrap();
            assert_eq!(next.state, BugState::Resolved);
            assert_eq!(next.resolution, Some(Resolution::Fixed));

            for reason in [
                Resolution::Duplicate,
                Resolution::WontFix,
                Resolution::WorksForMe,
            ] {
                let next = transition(owned(state, "bob"), &Command::resolve(reason)).unwrap();
                assert_eq!(next.state, BugState::Closed);
                assert_eq!(next.resolution, Some(reason));
            }
        }
    }

    #[test]
    fn verify_closes_and_keeps_resolution() {
        let current = Lifecycle {
            resolution: Some(Resolution::Fixed),
            ..owned(BugState::Resolved, "bob")
        };
        let next = transition(current, &Command::verify()).unwrap();
        assert_eq!(next.state, BugState::Closed);
        assert_eq!(next.resolution, Some(Resolution::Fixed));
    }

    #[test]
    fn reopen_branches_on_confirmed() {
        for state in [BugState::Resolved, BugState::Closed] {
            let confirmed = Lifecycle {
                confirmed: true,
                resolution: Some(Resolution::Fixed),
                ..owned(state, "bob")
            };
            let next = transition(confirmed, &Command::reopen()).unwrap();
            assert_eq!(next.state, BugState::Reopened);
            assert_eq!(next.resolution, None);

            let unconfirmed = Lifecycle {
                resolution: Some(Resolution::WontFix),
                ..owned(state, "bob")
            };
            let next = transition(unconfirmed, &Command::reopen()).unwrap();
            assert_eq!(next.state, BugState::Unconfirmed);
            assert_eq!(next.resolution, None);
        }
    }

    #[test]
    fn unlisted_pairs_are_unsupported() {
        let err = transition(fields(BugState::Closed), &Command::vote()).expect_err("vote");
        match err {
            Error::UnsupportedTransition { state, action } => {
                assert_eq!(state, BugState::Closed);
                assert_eq!(action, Action::Vote);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn legal_actions_match_table() {
        assert_eq!(
            BugState::Unconfirmed.legal_actions(),
            vec![Action::Vote, Action::Confirm]
        );
        assert_eq!(BugState::New.legal_actions(), vec![Action::Possess]);
        assert_eq!(BugState::Assigned.legal_actions(), vec![Action::Resolve]);
        assert_eq!(
            BugState::Resolved.legal_actions(),
            vec![Action::Verify, Action::Reopen]
        );
        assert_eq!(
            BugState::Reopened.legal_actions(),
            vec![Action::Possess, Action::Resolve]
        );
        assert_eq!(BugState::Closed.legal_actions(), vec![Action::Reopen]);
    }

    #[test]
    fn wire_names_round_trip() {
        for state in BugState::ALL {
            let json = serde_json::to_string(&state).unwrap();
            assert_eq!(json, format!("\"{}\"", state.as_str()));
            let back: BugState = serde_json::from_str(&json).unwrap();
            assert_eq!(back, state);
            assert_eq!(state.as_str().parse::<BugState>().unwrap(), state);
        }
        assert_eq!(BugState::Reopened.as_str(), "Reopen");
        assert!(serde_json::from_str::<BugState>("\"Reopened\"").is_err());
    }
}
