//! Stage and run models for the simulated execution pipeline.
//!
//! A run walks a fixed four-stage catalog. The live stage list is a view
//! model replaced wholesale on every transition; the terminal
//! [`ExecutionOutput`] envelope is produced exactly once per run.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::Deployment;

/// Status of a single pipeline stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StageStatus {
    Pending,
    Running,
    Success,
    Error,
}

impl StageStatus {
    /// Terminal statuses never transition again within a run.
    pub fn is_terminal(&self) -> bool {
        matches!(self, StageStatus::Success | StageStatus::Error)
    }
}

/// Fixed definition of one pipeline stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StageDefinition {
    pub id: &'static str,
    pub name: &'static str,
}

/// The four stages every run walks, in order.
pub const STAGE_CATALOG: [StageDefinition; 4] = [
    StageDefinition {
        id: "document-parser",
        name: "Document Parser",
    },
    StageDefinition {
        id: "llm-processor",
        name: "LLM Processor",
    },
    StageDefinition {
        id: "data-validation",
        name: "Data Validation",
    },
    StageDefinition {
        id: "output-generation",
        name: "Output Generation",
    },
];

/// Live view model of one stage within the current run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionStage {
    pub id: String,
    pub name: String,
    pub status: StageStatus,
    /// Wall-clock `HH:MM:SS` label set on the first transition.
    pub timestamp: Option<String>,
    /// Placeholder detail text; opaque, never meaningful telemetry.
    pub details: Option<String>,
}

impl ExecutionStage {
    /// Fresh pending stage for the given definition.
    pub fn pending(definition: &StageDefinition) -> Self {
        Self {
            id: definition.id.to_string(),
            name: definition.name.to_string(),
            status: StageStatus::Pending,
            timestamp: None,
            details: None,
        }
    }
}

/// Fresh pending stage list for a new run.
pub fn pending_stages() -> Vec<ExecutionStage> {
    STAGE_CATALOG.iter().map(ExecutionStage::pending).collect()
}

/// Terminal outcome of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunOutcome {
    Success,
    Error,
}

/// Stage snapshot embedded in the output envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputStage {
    pub name: String,
    pub status: StageStatus,
    pub details: Option<String>,
}

/// Terminal result envelope, produced exactly once per run.
///
/// Declaration order is serialization order for the exported JSON; `error`
/// is omitted entirely on success.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionOutput {
    pub status: RunOutcome,
    pub deployment: String,
    pub stages: Vec<OutputStage>,
    /// RFC 3339 timestamp taken when the envelope is assembled.
    pub timestamp: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ExecutionOutput {
    /// Pretty-printed JSON text used by both export actions (clipboard and
    /// file). Stable for an unchanged envelope.
    pub fn to_pretty_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// Parameters of one trigger invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlowRunRequest {
    pub deployment: Deployment,
    pub payload: String,
}

/// Events emitted by the run driver, in transition order.
///
/// Per run the sequence is `RunStarted`, then per stage a
/// `StageStarted`/`StageCompleted` pair (or a single terminal `StageFailed`),
/// then exactly one `RunCompleted`.
#[derive(Debug, Clone, PartialEq)]
pub enum FlowRunEvent {
    /// The run was accepted and the stage list reset to pending.
    RunStarted { at: DateTime<Utc> },
    /// Stage `index` moved pending -> running.
    StageStarted { index: usize, timestamp: String },
    /// Stage `index` moved running -> success.
    StageCompleted {
        index: usize,
        details: String,
        timestamp: String,
    },
    /// Stage `index` moved pending -> error; no later stage will start.
    StageFailed {
        index: usize,
        details: String,
        timestamp: String,
    },
    /// Terminal envelope; exactly one per run.
    RunCompleted { output: ExecutionOutput },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_defines_four_known_stages() {
        let names: Vec<&str> = STAGE_CATALOG.iter().map(|stage| stage.name).collect();
        assert_eq!(
            names,
            vec!["Document Parser", "LLM Processor", "Data Validation", "Output Generation"]
        );
    }

    #[test]
    fn pending_stages_start_blank() {
        let stages = pending_stages();
        assert_eq!(stages.len(), 4);
        for (stage, definition) in stages.iter().zip(STAGE_CATALOG.iter()) {
            assert_eq!(stage.id, definition.id);
            assert_eq!(stage.status, StageStatus::Pending);
            assert!(stage.timestamp.is_none());
            assert!(stage.details.is_none());
        }
    }

    #[test]
    fn envelope_omits_error_field_on_success() {
        let output = ExecutionOutput {
            status: RunOutcome::Success,
            deployment: "v2".into(),
            stages: vec![OutputStage {
                name: "Document Parser".into(),
                status: StageStatus::Success,
                details: Some("Processed abc123".into()),
            }],
            timestamp: "2025-03-01T09:15:24Z".into(),
            error: None,
        };

        let json = serde_json::to_string(&output).expect("serialize envelope");
        assert!(!json.contains("\"error\""));
        assert!(json.starts_with("{\"status\":\"success\",\"deployment\":\"v2\""));
    }

    #[test]
    fn envelope_carries_error_message_on_failure() {
        let output = ExecutionOutput {
            status: RunOutcome::Error,
            deployment: "v1".into(),
            stages: vec![],
            timestamp: "2025-03-01T09:15:24Z".into(),
            error: Some("Execution failed: Unable to validate input schema at stage LLM Processor".into()),
        };

        let json = serde_json::to_string(&output).expect("serialize envelope");
        assert!(json.contains("\"status\":\"error\""));
        assert!(json.contains("at stage LLM Processor"));
    }

    #[test]
    fn pretty_json_is_stable_for_unchanged_envelope() {
        let output = ExecutionOutput {
            status: RunOutcome::Success,
            deployment: "v2".into(),
            stages: vec![],
            timestamp: "2025-03-01T09:15:24Z".into(),
            error: None,
        };

        let first = output.to_pretty_json().expect("pretty json");
        let second = output.to_pretty_json().expect("pretty json");
        assert_eq!(first, second);
    }
}
