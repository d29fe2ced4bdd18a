//! History view models: past execution records and release metadata.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// User feedback on a history record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Feedback {
    Like,
    Dislike,
}

/// Completion status of a recorded execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RecordStatus {
    Completed,
    Failed,
}

impl RecordStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordStatus::Completed => "Completed",
            RecordStatus::Failed => "Failed",
        }
    }
}

/// One row of the execution history table.
///
/// Seeded in memory; `feedback` and `expanded` are the only fields mutated,
/// and only by local interaction within the session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionRecord {
    pub execution_id: String,
    pub executed_by: String,
    pub status: RecordStatus,
    pub latency: f64,
    pub input: Value,
    pub output: Value,
    pub feedback: Option<Feedback>,
    #[serde(default)]
    pub expanded: bool,
}

impl ExecutionRecord {
    /// Compact "Input" cell text: `"{action} {target}"` when both keys are
    /// present, otherwise the JSON truncated to 30 characters.
    pub fn input_summary(&self) -> String {
        let action = self.input.get("action").and_then(Value::as_str);
        let target = self.input.get("target").and_then(Value::as_str);
        match (action, target) {
            (Some(action), Some(target)) => format!("{action} {target}"),
            _ => truncate_json(&self.input),
        }
    }

    /// Compact "Output" cell text keyed off the embedded `status` field.
    pub fn output_summary(&self) -> String {
        match self.output.get("status").and_then(Value::as_str) {
            Some("success") => {
                let metric = self
                    .output
                    .get("processed")
                    .or_else(|| self.output.get("updated"))
                    .and_then(Value::as_u64)
                    .map(|count| count.to_string())
                    .or_else(|| {
                        self.output
                            .get("valid")
                            .and_then(Value::as_bool)
                            .filter(|valid| *valid)
                            .map(|_| "Valid".to_string())
                    });
                format!("Success: {}", metric.unwrap_or_default())
            }
            Some("error") => {
                let message = self.output.get("message").and_then(Value::as_str).unwrap_or_default();
                format!("Error: {message}")
            }
            _ => self
                .output
                .get("message")
                .and_then(Value::as_str)
                .map(str::to_string)
                .unwrap_or_else(|| truncate_json(&self.output)),
        }
    }
}

fn truncate_json(value: &Value) -> String {
    let raw = value.to_string();
    if raw.chars().count() > 30 {
        let head: String = raw.chars().take(30).collect();
        format!("{head}...")
    } else {
        raw
    }
}

/// Summary card for one release in the sidebar list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReleaseSummary {
    pub name: String,
    pub tag: String,
    pub date: String,
    pub time: String,
}

/// Detail panel contents for the selected release.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReleaseInfo {
    pub name: String,
    pub description: String,
    pub deployed_on: String,
    pub status: String,
    pub tags: Vec<String>,
}
