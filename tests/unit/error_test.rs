//! Tests for error types

use festival_scheduler::core::{AppResult, SchedulerError};

#[test]
fn test_invariant_violation_display() {
    let err = SchedulerError::InvariantViolation("stage 2 released twice".to_string());
    assert_eq!(format!("{err}"), "invariant violation: stage 2 released twice");
}

#[test]
fn test_invalid_config_display() {
    let err = SchedulerError::InvalidConfig("roster is empty".to_string());
    assert_eq!(format!("{err}"), "invalid configuration: roster is empty");
}

#[test]
fn test_roster_error_display() {
    let err = SchedulerError::Roster {
        line: 4,
        reason: "bad arrival".to_string(),
    };
    assert_eq!(format!("{err}"), "roster line 4: bad arrival");
}

#[test]
fn test_panicked_display() {
    let err = SchedulerError::PerformerPanicked("performer 3: boom".to_string());
    assert_eq!(format!("{err}"), "performer panicked: performer 3: boom");
}

#[test]
fn test_converts_into_app_result() {
    fn load() -> AppResult<()> {
        Err(SchedulerError::Runtime("spawn failed".to_string()))?;
        Ok(())
    }
    let err = load().unwrap_err();
    assert_eq!(err.to_string(), "runtime error: spawn failed");
    assert!(err.downcast_ref::<SchedulerError>().is_some());
}
