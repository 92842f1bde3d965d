//! Unit tests for lint error types.

use std::error::Error as _;
use std::io;

use rstest::rstest;

use super::*;

#[test]
fn io_error_message_includes_program_and_cause() {
    let error = LintError::io(
        "ansible-lint",
        io::Error::new(io::ErrorKind::NotFound, "no such file"),
    );
    let message = error.to_string();
    assert!(
        message.contains("ansible-lint"),
        "expected program in message: {message}"
    );
    assert!(
        message.contains("no such file"),
        "expected cause in message: {message}"
    );
    assert!(error.source().is_some());
}

#[rstest]
#[case::io(LintError::io("lint-a", io::Error::other("boom")), "lint-a")]
#[case::interrupted(LintError::Interrupted { program: "lint-b".into() }, "lint-b")]
fn program_is_reported(#[case] error: LintError, #[case] expected: &str) {
    assert_eq!(error.program(), expected);
}

#[test]
fn interrupted_has_no_source() {
    let error = LintError::Interrupted {
        program: "ansible-lint".into(),
    };
    assert!(error.source().is_none());
    assert!(error.to_string().contains("interrupted"));
}
