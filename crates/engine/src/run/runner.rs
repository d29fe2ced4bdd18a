//! Asynchronous run driver that streams stage lifecycle events.
//!
//! This module turns the fixed stage catalog into a cooperative task that
//! emits [`FlowRunEvent`]s over a Tokio channel on a timed schedule. The
//! caller owns the event receiver and the task handle; superseding a run
//! means aborting the handle and dropping the receiver, after which no
//! further events are delivered.

use std::sync::{
    Arc,
    atomic::{AtomicU64, Ordering},
};
use std::time::Duration;

use anyhow::{Result, anyhow};
use chrono::{Local, Utc};
use flowtty_types::flow::{FlowRunEvent, FlowRunRequest, OutputStage, STAGE_CATALOG, StageStatus};
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel};
use tokio::task::JoinHandle;
use tokio::time::Instant;

use crate::run::{
    details::StageDetailSource,
    output::{self, STAGE_ERROR_DETAILS},
    payload_triggers_error,
};

static NEXT_RUN_ID: AtomicU64 = AtomicU64::new(1);

/// Schedule knobs for the simulated pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunTiming {
    /// Gap between consecutive stage start times, measured from run start.
    pub stage_start_interval: Duration,
    /// Time a stage spends running before it completes.
    pub stage_run_duration: Duration,
}

impl RunTiming {
    /// Demo schedule: stage `i` starts at `i × 3s` and completes 2s later.
    pub const fn demo() -> Self {
        Self {
            stage_start_interval: Duration::from_millis(3000),
            stage_run_duration: Duration::from_millis(2000),
        }
    }

    /// Millisecond-scale schedule so tests finish promptly.
    pub const fn compressed() -> Self {
        Self {
            stage_start_interval: Duration::from_millis(3),
            stage_run_duration: Duration::from_millis(2),
        }
    }
}

impl Default for RunTiming {
    fn default() -> Self {
        Self::demo()
    }
}

/// Owned handle to an in-flight run.
///
/// Bundles the event receiver with the driver task. Aborting the handle
/// supersedes the run: the task stops at its next timer and the channel
/// closes without a terminal event.
#[derive(Debug)]
pub struct FlowRunHandle {
    /// Monotonic id used to tag events delivered to the update loop.
    pub run_id: u64,
    /// Stream of lifecycle events for this run.
    pub events: UnboundedReceiver<FlowRunEvent>,
    task: JoinHandle<()>,
}

impl FlowRunHandle {
    /// Stops the driver task. Safe to call on a run that already finished.
    pub fn abort(&self) {
        self.task.abort();
    }
}

/// Spawns the driver as an owned task and returns its handle.
///
/// The payload is assumed validated; callers gate on
/// [`crate::run::validate_payload`] first.
pub fn spawn_flow_run(
    request: FlowRunRequest,
    details: Arc<dyn StageDetailSource + Send + Sync>,
    timing: RunTiming,
) -> FlowRunHandle {
    let run_id = NEXT_RUN_ID.fetch_add(1, Ordering::Relaxed);
    let (event_tx, events) = unbounded_channel();
    tracing::debug!(run_id, deployment = %request.deployment, "starting simulated flow run");
    let task = tokio::spawn(async move {
        if let Err(error) = drive_flow_run(request, details, timing, event_tx).await {
            tracing::debug!(run_id, %error, "flow run driver stopped early");
        }
    });
    FlowRunHandle { run_id, events, task }
}

/// Drives one simulated run to its terminal event.
///
/// Emits events in transition order and returns once the run reaches a
/// terminal outcome or the receiver goes away. The failure index for an
/// error-keyword payload is chosen up front; when the schedule reaches that
/// stage the driver emits `StageFailed` instead of starting it, assembles
/// the error envelope, and stops without touching later stages.
pub async fn drive_flow_run(
    request: FlowRunRequest,
    details: Arc<dyn StageDetailSource + Send + Sync>,
    timing: RunTiming,
    event_tx: UnboundedSender<FlowRunEvent>,
) -> Result<()> {
    let error_index = payload_triggers_error(&request.payload).then(|| details.error_stage_index(STAGE_CATALOG.len()));

    if event_tx.send(FlowRunEvent::RunStarted { at: Utc::now() }).is_err() {
        return Ok(());
    }

    let run_started = Instant::now();
    let mut completed: Vec<OutputStage> = Vec::with_capacity(STAGE_CATALOG.len());

    for (index, stage) in STAGE_CATALOG.iter().enumerate() {
        let start_at = run_started + timing.stage_start_interval * index as u32;
        tokio::time::sleep_until(start_at).await;

        if error_index == Some(index) {
            emit(
                &event_tx,
                FlowRunEvent::StageFailed {
                    index,
                    details: STAGE_ERROR_DETAILS.to_string(),
                    timestamp: wall_clock_label(),
                },
            )?;
            completed.push(OutputStage {
                name: stage.name.to_string(),
                status: StageStatus::Error,
                details: Some(STAGE_ERROR_DETAILS.to_string()),
            });
            let output = output::error_envelope(request.deployment, completed, stage.name);
            let _ = event_tx.send(FlowRunEvent::RunCompleted { output });
            return Ok(());
        }

        emit(
            &event_tx,
            FlowRunEvent::StageStarted {
                index,
                timestamp: wall_clock_label(),
            },
        )?;

        tokio::time::sleep(timing.stage_run_duration).await;

        let stage_details = details.success_details(stage);
        emit(
            &event_tx,
            FlowRunEvent::StageCompleted {
                index,
                details: stage_details.clone(),
                timestamp: wall_clock_label(),
            },
        )?;
        completed.push(OutputStage {
            name: stage.name.to_string(),
            status: StageStatus::Success,
            details: Some(stage_details),
        });
    }

    let output = output::success_envelope(request.deployment, completed);
    let _ = event_tx.send(FlowRunEvent::RunCompleted { output });
    Ok(())
}

fn emit(event_tx: &UnboundedSender<FlowRunEvent>, event: FlowRunEvent) -> Result<()> {
    event_tx.send(event).map_err(|err| anyhow!("failed to emit run event: {}", err))
}

/// Wall-clock `HH:MM:SS` label attached to live stage transitions.
fn wall_clock_label() -> String {
    Local::now().format("%H:%M:%S").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::run::details::SampledDetailSource;
    use flowtty_types::Deployment;
    use flowtty_types::flow::RunOutcome;

    /// Pins the failure index so error-path assertions are exact.
    struct FixedDetailSource {
        failure_index: usize,
    }

    impl StageDetailSource for FixedDetailSource {
        fn success_details(&self, stage: &flowtty_types::flow::StageDefinition) -> String {
            format!("Processed {}", stage.id)
        }

        fn error_stage_index(&self, _stage_count: usize) -> usize {
            self.failure_index
        }
    }

    async fn drive_and_collect(payload: &str, details: Arc<dyn StageDetailSource + Send + Sync>) -> Vec<FlowRunEvent> {
        let request = FlowRunRequest {
            deployment: Deployment::V2,
            payload: payload.into(),
        };
        let (event_tx, mut event_rx) = unbounded_channel();
        drive_flow_run(request, details, RunTiming::compressed(), event_tx)
            .await
            .expect("drive flow run");

        let mut events = Vec::new();
        while let Ok(event) = event_rx.try_recv() {
            events.push(event);
        }
        events
    }

    #[tokio::test]
    async fn success_run_completes_all_four_stages() {
        let events = drive_and_collect("hello world", Arc::new(SampledDetailSource::with_seed(1))).await;

        assert!(matches!(events.first(), Some(FlowRunEvent::RunStarted { .. })));
        let started = events.iter().filter(|e| matches!(e, FlowRunEvent::StageStarted { .. })).count();
        let completed = events.iter().filter(|e| matches!(e, FlowRunEvent::StageCompleted { .. })).count();
        assert_eq!(started, 4);
        assert_eq!(completed, 4);

        let Some(FlowRunEvent::RunCompleted { output }) = events.last() else {
            panic!("expected terminal RunCompleted event");
        };
        assert_eq!(output.status, RunOutcome::Success);
        assert_eq!(output.deployment, "v2");
        assert_eq!(output.stages.len(), 4);
        assert!(output.stages.iter().all(|stage| stage.status == StageStatus::Success));
        assert!(output.stages.iter().all(|stage| stage.details.is_some()));
        assert!(output.error.is_none());
    }

    #[tokio::test]
    async fn stage_events_arrive_in_schedule_order() {
        let events = drive_and_collect("hello world", Arc::new(SampledDetailSource::with_seed(2))).await;

        let mut expected_index = 0usize;
        for event in &events {
            match event {
                FlowRunEvent::StageStarted { index, .. } => {
                    assert_eq!(*index, expected_index);
                }
                FlowRunEvent::StageCompleted { index, .. } => {
                    assert_eq!(*index, expected_index);
                    expected_index += 1;
                }
                _ => {}
            }
        }
        assert_eq!(expected_index, 4);
        assert_eq!(
            events.iter().filter(|e| matches!(e, FlowRunEvent::RunCompleted { .. })).count(),
            1
        );
    }

    #[tokio::test]
    async fn error_keyword_cuts_the_run_short_at_the_chosen_stage() {
        let details = Arc::new(FixedDetailSource { failure_index: 2 });
        let events = drive_and_collect("please error now", details).await;

        assert!(events.iter().any(|e| matches!(e, FlowRunEvent::StageFailed { index: 2, .. })));
        assert!(!events.iter().any(|e| matches!(e, FlowRunEvent::StageStarted { index: 2, .. })));
        assert!(!events.iter().any(|e| matches!(e, FlowRunEvent::StageStarted { index: 3, .. })));

        let Some(FlowRunEvent::RunCompleted { output }) = events.last() else {
            panic!("expected terminal RunCompleted event");
        };
        assert_eq!(output.status, RunOutcome::Error);
        assert_eq!(output.stages.len(), 3);
        assert!(output.stages[..2].iter().all(|stage| stage.status == StageStatus::Success));
        assert_eq!(output.stages[2].status, StageStatus::Error);
        assert_eq!(output.stages[2].details.as_deref(), Some(STAGE_ERROR_DETAILS));
        assert_eq!(
            output.error.as_deref(),
            Some("Execution failed: Unable to validate input schema at stage Data Validation")
        );
    }

    #[tokio::test]
    async fn uppercase_keyword_still_triggers_the_error_path() {
        let events = drive_and_collect("trigger an ERROR please", Arc::new(SampledDetailSource::with_seed(9))).await;

        let Some(FlowRunEvent::RunCompleted { output }) = events.last() else {
            panic!("expected terminal RunCompleted event");
        };
        assert_eq!(output.status, RunOutcome::Error);
        assert!((2..=4).contains(&output.stages.len()));
        let failing = output.stages.last().expect("error stage present");
        assert_eq!(failing.status, StageStatus::Error);
        let message = output.error.as_deref().expect("error message present");
        assert!(message.contains(&failing.name));
    }

    #[tokio::test]
    async fn driver_stops_quietly_when_receiver_is_dropped() {
        let request = FlowRunRequest {
            deployment: Deployment::V1,
            payload: "hello".into(),
        };
        let (event_tx, event_rx) = unbounded_channel();
        drop(event_rx);

        let result = drive_flow_run(
            request,
            Arc::new(SampledDetailSource::with_seed(4)),
            RunTiming::compressed(),
            event_tx,
        )
        .await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn aborted_run_emits_no_terminal_event() {
        let request = FlowRunRequest {
            deployment: Deployment::V2,
            payload: "hello".into(),
        };
        let timing = RunTiming {
            stage_start_interval: Duration::from_millis(50),
            stage_run_duration: Duration::from_millis(30),
        };
        let mut handle = spawn_flow_run(request, Arc::new(SampledDetailSource::with_seed(5)), timing);

        let first = handle.events.recv().await;
        assert!(matches!(first, Some(FlowRunEvent::RunStarted { .. })));
        handle.abort();

        let mut saw_terminal = false;
        while let Some(event) = handle.events.recv().await {
            if matches!(event, FlowRunEvent::RunCompleted { .. }) {
                saw_terminal = true;
            }
        }
        assert!(!saw_terminal, "aborted run must not deliver a terminal envelope");
    }

    #[tokio::test]
    async fn spawned_runs_get_monotonic_ids() {
        let details: Arc<dyn StageDetailSource + Send + Sync> = Arc::new(SampledDetailSource::with_seed(6));
        let request = FlowRunRequest {
            deployment: Deployment::V2,
            payload: "hello".into(),
        };

        let first = spawn_flow_run(request.clone(), Arc::clone(&details), RunTiming::compressed());
        let second = spawn_flow_run(request, Arc::clone(&details), RunTiming::compressed());
        assert!(second.run_id > first.run_id);
        first.abort();
        second.abort();
    }
}
