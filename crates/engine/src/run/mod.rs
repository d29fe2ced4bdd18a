//! Run-level primitives for the simulated pipeline.
//!
//! Groups the driver, the detail provider abstraction, and envelope assembly.
//! Payload validation lives here because it gates run creation: a payload
//! that fails validation never reaches the driver.

use thiserror::Error;

pub mod details;
pub mod output;
pub mod runner;

/// Keyword that switches a run onto the simulated failure path.
pub const ERROR_TRIGGER_KEYWORD: &str = "error";

/// Rejection reasons checked before a run is created.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Please enter a request payload")]
    EmptyPayload,
}

/// Fails fast on empty or whitespace-only payloads. Callers must not start a
/// run (or schedule any stage work) when this returns an error.
pub fn validate_payload(payload: &str) -> Result<(), ValidationError> {
    if payload.trim().is_empty() {
        return Err(ValidationError::EmptyPayload);
    }
    Ok(())
}

/// True when the payload opts into the simulated failure path. The match is
/// case-insensitive anywhere in the text.
pub fn payload_triggers_error(payload: &str) -> bool {
    payload.to_lowercase().contains(ERROR_TRIGGER_KEYWORD)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_empty_and_whitespace_payloads() {
        assert_eq!(validate_payload(""), Err(ValidationError::EmptyPayload));
        assert_eq!(validate_payload("   \t\n"), Err(ValidationError::EmptyPayload));
        assert_eq!(validate_payload("hello world"), Ok(()));
    }

    #[test]
    fn validation_error_text_matches_notice_copy() {
        assert_eq!(ValidationError::EmptyPayload.to_string(), "Please enter a request payload");
    }

    #[test]
    fn keyword_detection_is_case_insensitive() {
        assert!(payload_triggers_error("trigger an ERROR please"));
        assert!(payload_triggers_error("error"));
        assert!(payload_triggers_error("no ErRoRs here either"));
        assert!(!payload_triggers_error("hello world"));
        assert!(!payload_triggers_error(""));
    }
}
