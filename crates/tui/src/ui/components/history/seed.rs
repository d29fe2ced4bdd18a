//! Fixture data backing the history view.
//!
//! Records are seeded once at startup and live in memory for the session.
//! Only `feedback` and `expanded` ever change, and only through local
//! interaction; nothing here talks to a backend.

use flowtty_types::history::{
    ExecutionRecord, Feedback, RecordStatus, ReleaseInfo, ReleaseSummary,
};
use serde_json::json;

/// The execution records shown in the history table.
pub fn execution_records() -> Vec<ExecutionRecord> {
    vec![
        ExecutionRecord {
            execution_id: "exe_7391f5a2".into(),
            executed_by: "tarak@curiflow.com".into(),
            status: RecordStatus::Completed,
            latency: 2.3,
            input: json!({
                "action": "Process",
                "target": "customer_data",
                "filters": { "region": "APAC", "category": "Enterprise" },
            }),
            output: json!({
                "status": "success",
                "processed": 158,
                "details": {
                    "created": 42,
                    "updated": 116,
                    "failed": 0,
                    "logs": [
                        "Started processing at 2025-03-01T09:15:22",
                        "Connecting to database...",
                        "Processing batch #1 (50 records)",
                        "Processing batch #2 (50 records)",
                        "Processing batch #3 (50 records)",
                        "Processing batch #4 (8 records)",
                        "Finalizing results...",
                        "Operation completed at 2025-03-01T09:15:24",
                    ],
                },
            }),
            feedback: Some(Feedback::Like),
            expanded: false,
        },
        ExecutionRecord {
            execution_id: "exe_45e2b18c".into(),
            executed_by: "sara@curiflow.com".into(),
            status: RecordStatus::Failed,
            latency: 5.7,
            input: json!({
                "action": "Generate",
                "target": "monthly_report",
                "parameters": { "month": "February", "year": 2025 },
            }),
            output: json!({
                "status": "error",
                "message": "Missing data source",
                "details": {
                    "errorCode": "DATA_SRC_404",
                    "location": "ReportGenerator.js:126",
                    "trace": "at ReportGenerator.fetchData (ReportGenerator.js:126)\nat ReportGenerator.generate (ReportGenerator.js:58)\nat processQueue (Worker.js:24)",
                },
            }),
            feedback: Some(Feedback::Dislike),
            expanded: false,
        },
        ExecutionRecord {
            execution_id: "exe_d873fe1e".into(),
            executed_by: "tarak@curiflow.com".into(),
            status: RecordStatus::Completed,
            latency: 1.2,
            input: json!({
                "action": "Update",
                "target": "user_profiles",
                "ids": [101, 102, 103, 104],
            }),
            output: json!({
                "status": "success",
                "updated": 47,
                "skipped": 0,
            }),
            feedback: None,
            expanded: false,
        },
        validation_record("exe_9a42b67d"),
        validation_record("exe_9a43467d"),
        validation_record("exe_9a42e67d"),
        validation_record("exe_942fv67d"),
        validation_record("exe_9a42b6dd"),
    ]
}

/// The repeated bulk-validation entry; only the id differs between them.
fn validation_record(execution_id: &str) -> ExecutionRecord {
    ExecutionRecord {
        execution_id: execution_id.into(),
        executed_by: "alex@curiflow.com".into(),
        status: RecordStatus::Completed,
        latency: 3.8,
        input: json!({
            "action": "Validate",
            "target": "customer_data",
            "level": "complete",
        }),
        output: json!({
            "status": "success",
            "valid": true,
            "checks": {
                "schema": "passed",
                "relationships": "passed",
                "consistency": "passed",
                "duplicates": "passed",
            },
        }),
        feedback: None,
        expanded: false,
    }
}

/// Entries for the releases sidebar card.
pub fn release_summaries() -> Vec<ReleaseSummary> {
    vec![ReleaseSummary {
        name: "v1".into(),
        tag: "prod".into(),
        date: "22 Feb 2003".into(),
        time: "12:11:10".into(),
    }]
}

/// Contents of the release info card.
pub fn release_info() -> ReleaseInfo {
    ReleaseInfo {
        name: "v2".into(),
        description: "No description".into(),
        deployed_on: "21/02/2025, 18:56:43".into(),
        status: "COMPLETED".into(),
        tags: vec!["prod".into()],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeds_eight_records_with_known_summaries() {
        let records = execution_records();
        assert_eq!(records.len(), 8);
        assert_eq!(records[0].input_summary(), "Process customer_data");
        assert_eq!(records[0].output_summary(), "Success: 158");
        assert_eq!(records[1].output_summary(), "Error: Missing data source");
        assert_eq!(records[3].output_summary(), "Success: Valid");
    }

    #[test]
    fn validation_records_differ_only_by_id() {
        let records = execution_records();
        let ids: Vec<&str> = records[3..]
            .iter()
            .map(|record| record.execution_id.as_str())
            .collect();
        assert_eq!(
            ids,
            [
                "exe_9a42b67d",
                "exe_9a43467d",
                "exe_9a42e67d",
                "exe_942fv67d",
                "exe_9a42b6dd"
            ]
        );
        assert!(records[3..].iter().all(|record| {
            record.executed_by == "alex@curiflow.com" && record.latency == 3.8
        }));
    }
}
