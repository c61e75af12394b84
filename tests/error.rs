use std::path::PathBuf;

use bugtrack::command::Action;
use bugtrack::error::{exit_codes, Error, JsonError};
use bugtrack::state::BugState;

#[test]
fn exit_codes_map_correctly() {
    let user = Error::InvalidArgument("bad".to_string());
    assert_eq!(user.exit_code(), exit_codes::USER_ERROR);

    let validation = Error::Validation("resolve requires a resolution".to_string());
    assert_eq!(validation.exit_code(), exit_codes::USER_ERROR);

    let missing = Error::BugNotFound(9);
    assert_eq!(missing.exit_code(), exit_codes::USER_ERROR);

    let blocked = Error::UnsupportedTransition {
        state: BugState::Closed,
        action: Action::Vote,
    };
    assert_eq!(blocked.exit_code(), exit_codes::WORKFLOW_BLOCKED);

    let lock = Error::LockFailed(PathBuf::from(".bugtrack/bugs.json.lock"));
    assert_eq!(lock.exit_code(), exit_codes::OPERATION_FAILED);

    let op = Error::OperationFailed("boom".to_string());
    assert_eq!(op.exit_code(), exit_codes::OPERATION_FAILED);
}

#[test]
fn json_error_includes_code() {
    let err = Error::BugNotFound(42);
    let json = JsonError::from(&err);
    assert_eq!(json.code, exit_codes::USER_ERROR);
    assert!(json.error.contains("Bug not found: 42"));
    assert_eq!(json.details, Some(serde_json::json!({ "id": 42 })));
}

#[test]
fn unsupported_transition_details_list_allowed_actions() {
    let err = Error::UnsupportedTransition {
        state: BugState::Reopened,
        action: Action::Vote,
    };
    assert_eq!(
        err.to_string(),
        "Unsupported transition: vote is not allowed while Reopen"
    );
    let details = err.details().expect("details");
    assert_eq!(details["state"], "Reopen");
    assert_eq!(details["action"], "vote");
    assert_eq!(details["allowed"], serde_json::json!(["possess", "resolve"]));
}

#[test]
fn io_errors_have_no_details() {
    let err = Error::from(std::io::Error::other("disk"));
    assert_eq!(err.exit_code(), exit_codes::OPERATION_FAILED);
    assert!(err.details().is_none());
}
