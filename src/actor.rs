//! Actor identity resolution.
//!
//! The actor names who reports a bug. Resolution order:
//! 1) CLI --actor / --reporter (explicit)
//! 2) BT_ACTOR environment variable
//! 3) Config default (actor.default), itself defaulting to "unknown"

use crate::config::Config;

/// Environment variable consulted when no actor is given explicitly
pub const ACTOR_ENV: &str = "BT_ACTOR";

/// Resolve the current actor using CLI, environment, and config.
pub fn resolve_actor(cli_actor: Option<&str>, config: &Config) -> String {
    if let Some(actor) = non_empty(cli_actor) {
        return actor.to_string();
    }

    if let Ok(env_actor) = std::env::var(ACTOR_ENV) {
        if let Some(actor) = non_empty(Some(env_actor.as_str())) {
            return actor.to_string();
        }
    }

    non_empty(Some(config.actor.default.as_str()))
        .unwrap_or("unknown")
        .to_string()
}

pub(crate) fn non_empty(input: Option<&str>) -> Option<&str> {
    input.and_then(|value| {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed)
        }
    })
}
