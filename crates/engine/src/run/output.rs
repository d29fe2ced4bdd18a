//! Assembly of the terminal result envelope.
//!
//! The envelope is produced exactly once per run, after either the last
//! stage succeeds or the injected failure fires. On the error path the
//! stages array stops at the failing stage; later stages are never reported.

use chrono::{SecondsFormat, Utc};
use flowtty_types::Deployment;
use flowtty_types::flow::{ExecutionOutput, OutputStage, RunOutcome};

/// Fixed detail text carried by the failing stage.
pub const STAGE_ERROR_DETAILS: &str = "Error: Failed to process data. Invalid schema detected.";

/// Envelope-level error message naming the failing stage.
pub fn envelope_error_message(failing_stage: &str) -> String {
    format!("Execution failed: Unable to validate input schema at stage {failing_stage}")
}

/// Envelope for a run where all four stages completed.
pub fn success_envelope(deployment: Deployment, stages: Vec<OutputStage>) -> ExecutionOutput {
    ExecutionOutput {
        status: RunOutcome::Success,
        deployment: deployment.as_str().to_string(),
        stages,
        timestamp: envelope_timestamp(),
        error: None,
    }
}

/// Envelope for a run cut short at `failing_stage`. `stages` must already
/// end with the error stage snapshot.
pub fn error_envelope(deployment: Deployment, stages: Vec<OutputStage>, failing_stage: &str) -> ExecutionOutput {
    ExecutionOutput {
        status: RunOutcome::Error,
        deployment: deployment.as_str().to_string(),
        stages,
        timestamp: envelope_timestamp(),
        error: Some(envelope_error_message(failing_stage)),
    }
}

fn envelope_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use flowtty_types::flow::StageStatus;

    fn success_stage(name: &str) -> OutputStage {
        OutputStage {
            name: name.into(),
            status: StageStatus::Success,
            details: Some("Processed abc123".into()),
        }
    }

    #[test]
    fn success_envelope_reports_all_stages() {
        let stages = vec![success_stage("Document Parser"), success_stage("LLM Processor")];
        let envelope = success_envelope(Deployment::V2, stages);

        assert_eq!(envelope.status, RunOutcome::Success);
        assert_eq!(envelope.deployment, "v2");
        assert_eq!(envelope.stages.len(), 2);
        assert!(envelope.error.is_none());
        // RFC 3339 with trailing Z, parseable back.
        assert!(envelope.timestamp.ends_with('Z'));
        assert!(chrono::DateTime::parse_from_rfc3339(&envelope.timestamp).is_ok());
    }

    #[test]
    fn error_envelope_names_the_failing_stage() {
        let stages = vec![
            success_stage("Document Parser"),
            OutputStage {
                name: "LLM Processor".into(),
                status: StageStatus::Error,
                details: Some(STAGE_ERROR_DETAILS.into()),
            },
        ];
        let envelope = error_envelope(Deployment::V1, stages, "LLM Processor");

        assert_eq!(envelope.status, RunOutcome::Error);
        assert_eq!(envelope.deployment, "v1");
        assert_eq!(
            envelope.error.as_deref(),
            Some("Execution failed: Unable to validate input schema at stage LLM Processor")
        );
    }
}
