//! State for the trigger view.
//!
//! A single [`ViewMode`] describes what the view is showing at any moment,
//! and every user toggle or run lifecycle change is expressed as a
//! [`ViewEvent`] fed through [`ViewMode::apply`]. Keeping the transitions in
//! one table means the payload editor, the stage log, and the output pane can
//! never disagree about which of them is on screen.

use chrono::{DateTime, Utc};
use flowtty_types::flow::{
    ExecutionOutput, ExecutionStage, FlowRunEvent, FlowRunRequest, StageStatus, pending_stages,
};
use flowtty_types::{Deployment, Effect};

use crate::ui::components::common::TextInputState;

/// Number of output lines shown in the summary pane before expansion.
pub const PREVIEW_LINE_COUNT: usize = 5;

/// Placeholder shown while the payload editor is empty.
pub const PAYLOAD_PLACEHOLDER: &str = "Enter JSON payload (include 'error' to simulate failure)";

// ----- View mode machine -----

/// What the trigger view currently emphasizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewMode {
    /// Payload editor open; the side pane follows the run automatically.
    Compose,
    /// Stage log pinned, even when an output envelope is available.
    Log,
    /// Output preview with the payload editor collapsed.
    Summary,
    /// Full output envelope with the export actions.
    Expanded,
}

/// Everything that can move the view between modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewEvent {
    OpenPayload,
    ClosePayload,
    RunStarted,
    RunFinished,
    ShowLog,
    HideLog,
    ExpandOutput,
    CollapseOutput,
}

impl ViewMode {
    /// Returns the mode reached by `event`, staying put for transitions that
    /// do not apply to the current mode.
    pub fn apply(self, event: ViewEvent) -> ViewMode {
        use ViewEvent::*;
        use ViewMode::*;

        match (self, event) {
            // A fresh run closes the editor and pins the stage log.
            (_, RunStarted) => Log,
            // Completion unpins the log so the output becomes visible.
            (Log, RunFinished) => Summary,
            (Compose, ClosePayload) => Summary,
            (Compose, ShowLog) => Log,
            (Compose, ExpandOutput) => Expanded,
            (Log, HideLog) => Summary,
            (Log, OpenPayload) => Compose,
            (Log, ExpandOutput) => Expanded,
            (Summary, OpenPayload) => Compose,
            (Summary, ShowLog) => Log,
            (Summary, ExpandOutput) => Expanded,
            (Expanded, CollapseOutput) => Summary,
            (Expanded, ShowLog) => Log,
            (Expanded, OpenPayload) => Compose,
            (mode, _) => mode,
        }
    }
}

// ----- Focus ring -----

/// Focusable controls in the trigger view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerFocus {
    Deployment,
    Payload,
    Execute,
}

// ----- View state -----

/// Mutable state backing the trigger view.
#[derive(Debug)]
pub struct TriggerViewState {
    /// Index into [`Deployment::ALL`] for the selected target.
    pub deployment_idx: usize,
    /// Payload editor contents and cursor.
    pub payload: TextInputState,
    /// Which pane arrangement is on screen.
    pub mode: ViewMode,
    /// Which control receives keyboard input.
    pub focus: TriggerFocus,
    /// True from run start until the terminal envelope arrives.
    pub is_executing: bool,
    /// Identifier of the run this view accepts events for.
    pub active_run_id: Option<u64>,
    /// Stage rows for the execution log, reset at every run start.
    pub stages: Vec<ExecutionStage>,
    /// When the active run started, for the elapsed readout.
    pub started_at: Option<DateTime<Utc>>,
    /// Terminal envelope of the most recent run.
    pub output: Option<ExecutionOutput>,
    /// Pretty-printed form of [`Self::output`], rendered and exported as is.
    pub output_json: Option<String>,
    /// Scroll offset of the stage log pane.
    pub log_scroll: u16,
    /// Scroll offset of the expanded output pane.
    pub output_scroll: u16,
}

impl TriggerViewState {
    /// Creates the initial view state with `deployment` preselected.
    pub fn new(deployment: Deployment) -> Self {
        let deployment_idx = Deployment::ALL
            .iter()
            .position(|candidate| *candidate == deployment)
            .unwrap_or(0);

        Self {
            deployment_idx,
            payload: TextInputState::new(),
            mode: ViewMode::Compose,
            focus: TriggerFocus::Payload,
            is_executing: false,
            active_run_id: None,
            stages: Vec::new(),
            started_at: None,
            output: None,
            output_json: None,
            log_scroll: 0,
            output_scroll: 0,
        }
    }

    /// Currently selected deployment target.
    pub fn deployment(&self) -> Deployment {
        Deployment::ALL[self.deployment_idx]
    }

    /// Cycles the deployment selector backwards, wrapping at the first entry.
    pub fn select_previous_deployment(&mut self) {
        let count = Deployment::ALL.len();
        self.deployment_idx = (self.deployment_idx + count - 1) % count;
    }

    /// Cycles the deployment selector forwards, wrapping at the last entry.
    pub fn select_next_deployment(&mut self) {
        self.deployment_idx = (self.deployment_idx + 1) % Deployment::ALL.len();
    }

    /// Applies a toggle or lifecycle event to the view mode.
    pub fn apply_view_event(&mut self, event: ViewEvent) {
        self.mode = self.mode.apply(event);
    }

    /// Marks `run_id` as the run this view tracks and resets the per-run
    /// state so superseded runs leave nothing behind.
    pub fn begin_run(&mut self, run_id: u64) {
        self.active_run_id = Some(run_id);
        self.is_executing = true;
        self.stages = pending_stages();
        self.started_at = None;
        self.output = None;
        self.output_json = None;
        self.log_scroll = 0;
        self.output_scroll = 0;
        self.apply_view_event(ViewEvent::RunStarted);
        // The editor closed with the mode change; its focus must not linger.
        if self.focus == TriggerFocus::Payload {
            self.focus = TriggerFocus::Execute;
        }
    }

    /// Folds one engine event into the stage log and, for the terminal
    /// event, the output envelope.
    pub fn apply_run_event(&mut self, event: &FlowRunEvent) {
        match event {
            FlowRunEvent::RunStarted { at } => {
                self.started_at = Some(*at);
            }
            FlowRunEvent::StageStarted { index, timestamp } => {
                if let Some(stage) = self.stages.get_mut(*index) {
                    stage.status = StageStatus::Running;
                    stage.timestamp = Some(timestamp.clone());
                }
            }
            FlowRunEvent::StageCompleted {
                index,
                details,
                timestamp,
            } => {
                if let Some(stage) = self.stages.get_mut(*index) {
                    stage.status = StageStatus::Success;
                    stage.details = Some(details.clone());
                    if stage.timestamp.is_none() {
                        stage.timestamp = Some(timestamp.clone());
                    }
                }
            }
            FlowRunEvent::StageFailed {
                index,
                details,
                timestamp,
            } => {
                if let Some(stage) = self.stages.get_mut(*index) {
                    stage.status = StageStatus::Error;
                    stage.details = Some(details.clone());
                    if stage.timestamp.is_none() {
                        stage.timestamp = Some(timestamp.clone());
                    }
                }
            }
            FlowRunEvent::RunCompleted { output } => {
                self.is_executing = false;
                self.output_json = output.to_pretty_json().ok();
                self.output = Some(output.clone());
                self.apply_view_event(ViewEvent::RunFinished);
            }
        }
    }

    /// Fraction of stages that reached a terminal status, in `0.0..=1.0`.
    pub fn progress(&self) -> f64 {
        if self.stages.is_empty() {
            return 0.0;
        }
        let settled = self.stages.iter().filter(|stage| stage.status.is_terminal()).count();
        settled as f64 / self.stages.len() as f64
    }

    /// True when any stage of the current run has failed.
    pub fn has_error(&self) -> bool {
        self.stages
            .iter()
            .any(|stage| stage.status == StageStatus::Error)
    }

    /// True once any stage has been touched by the active or previous run.
    pub fn has_run_activity(&self) -> bool {
        self.is_executing
            || self
                .stages
                .iter()
                .any(|stage| stage.status != StageStatus::Pending)
    }

    /// Seconds since the active run started, if it has.
    pub fn elapsed_seconds(&self, now: DateTime<Utc>) -> Option<i64> {
        self.started_at
            .map(|started| (now - started).num_seconds().max(0))
    }

    /// Validates the editor contents and, when they pass, produces the
    /// request the runtime should hand to the engine. A validation failure
    /// is returned as the message to surface to the operator.
    pub fn request_execution(&self) -> Result<Effect, String> {
        if self.is_executing {
            return Err("A flow execution is already in progress".to_string());
        }
        flowtty_engine::validate_payload(self.payload.input())
            .map_err(|error| error.to_string())?;
        Ok(Effect::StartRun(FlowRunRequest {
            deployment: self.deployment(),
            payload: self.payload.input().to_string(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use flowtty_engine::success_envelope;
    use flowtty_types::Effect;
    use flowtty_types::flow::STAGE_CATALOG;

    use super::*;

    fn state_with_payload(payload: &str) -> TriggerViewState {
        let mut state = TriggerViewState::new(Deployment::V2);
        state.payload.set_input(payload);
        state
    }

    #[test]
    fn view_mode_transitions_follow_the_table() {
        assert_eq!(ViewMode::Compose.apply(ViewEvent::ShowLog), ViewMode::Log);
        assert_eq!(ViewMode::Log.apply(ViewEvent::HideLog), ViewMode::Summary);
        assert_eq!(
            ViewMode::Summary.apply(ViewEvent::ExpandOutput),
            ViewMode::Expanded
        );
        assert_eq!(
            ViewMode::Log.apply(ViewEvent::ExpandOutput),
            ViewMode::Expanded
        );
        assert_eq!(
            ViewMode::Expanded.apply(ViewEvent::CollapseOutput),
            ViewMode::Summary
        );
        assert_eq!(
            ViewMode::Expanded.apply(ViewEvent::ShowLog),
            ViewMode::Log
        );
        assert_eq!(
            ViewMode::Summary.apply(ViewEvent::OpenPayload),
            ViewMode::Compose
        );
        // Re-opening the editor folds away whichever pane was pinned.
        assert_eq!(ViewMode::Log.apply(ViewEvent::OpenPayload), ViewMode::Compose);
        assert_eq!(
            ViewMode::Expanded.apply(ViewEvent::OpenPayload),
            ViewMode::Compose
        );
        // Events that do not apply to the current mode leave it alone.
        assert_eq!(ViewMode::Compose.apply(ViewEvent::HideLog), ViewMode::Compose);
        assert_eq!(
            ViewMode::Summary.apply(ViewEvent::CollapseOutput),
            ViewMode::Summary
        );
    }

    #[test]
    fn starting_a_run_closes_the_editor_and_pins_the_log() {
        for mode in [
            ViewMode::Compose,
            ViewMode::Log,
            ViewMode::Summary,
            ViewMode::Expanded,
        ] {
            assert_eq!(mode.apply(ViewEvent::RunStarted), ViewMode::Log);
        }
    }

    #[test]
    fn finishing_a_run_unpins_the_stage_log() {
        assert_eq!(ViewMode::Log.apply(ViewEvent::RunFinished), ViewMode::Summary);
        assert_eq!(
            ViewMode::Summary.apply(ViewEvent::RunFinished),
            ViewMode::Summary
        );
        assert_eq!(
            ViewMode::Compose.apply(ViewEvent::RunFinished),
            ViewMode::Compose
        );
    }

    #[test]
    fn begin_run_resets_the_previous_run() {
        let mut state = state_with_payload("{}");
        state.begin_run(1);
        state.apply_run_event(&FlowRunEvent::RunCompleted {
            output: success_envelope(Deployment::V2, Vec::new()),
        });
        assert!(state.output.is_some());

        state.begin_run(2);
        assert_eq!(state.active_run_id, Some(2));
        assert!(state.is_executing);
        assert!(state.output.is_none());
        assert!(state.output_json.is_none());
        assert_eq!(state.stages.len(), STAGE_CATALOG.len());
        assert!(
            state
                .stages
                .iter()
                .all(|stage| stage.status == StageStatus::Pending)
        );
    }

    #[test]
    fn stage_events_advance_the_log_in_order() {
        let mut state = state_with_payload("{}");
        state.begin_run(1);
        state.apply_run_event(&FlowRunEvent::StageStarted {
            index: 0,
            timestamp: "09:15:22".to_string(),
        });
        state.apply_run_event(&FlowRunEvent::StageCompleted {
            index: 0,
            details: "Processed a1b2c3".to_string(),
            timestamp: "09:15:25".to_string(),
        });

        assert_eq!(state.stages[0].status, StageStatus::Success);
        assert_eq!(state.stages[0].details.as_deref(), Some("Processed a1b2c3"));
        // The row keeps the timestamp from when the stage started.
        assert_eq!(state.stages[0].timestamp.as_deref(), Some("09:15:22"));
        assert_eq!(state.stages[1].status, StageStatus::Pending);
    }

    #[test]
    fn a_failed_stage_sets_the_error_flags() {
        let mut state = state_with_payload("{\"error\": true}");
        state.begin_run(1);
        state.apply_run_event(&FlowRunEvent::StageFailed {
            index: 1,
            details: "Error occurred during llm processor".to_string(),
            timestamp: "09:15:24".to_string(),
        });

        assert!(state.has_error());
        assert_eq!(state.stages[1].status, StageStatus::Error);
        assert_eq!(state.stages[2].status, StageStatus::Pending);
        assert_eq!(state.progress(), 0.25);
    }

    #[test]
    fn deployment_selection_wraps_in_both_directions() {
        let mut state = TriggerViewState::new(Deployment::V1);
        state.select_previous_deployment();
        assert_eq!(state.deployment(), Deployment::V3);
        state.select_next_deployment();
        assert_eq!(state.deployment(), Deployment::V1);
        state.select_next_deployment();
        assert_eq!(state.deployment(), Deployment::V2);
    }

    #[test]
    fn request_execution_rejects_a_blank_payload() {
        let state = state_with_payload("   \n  ");
        let message = state.request_execution().unwrap_err();
        assert_eq!(message, "Please enter a request payload");
    }

    #[test]
    fn request_execution_builds_the_run_request() {
        let state = state_with_payload("{\"action\": \"Process\"}");
        match state.request_execution() {
            Ok(Effect::StartRun(request)) => {
                assert_eq!(request.deployment, Deployment::V2);
                assert_eq!(request.payload, "{\"action\": \"Process\"}");
            }
            other => panic!("expected a run request, got {other:?}"),
        }
    }

    #[test]
    fn request_execution_refuses_to_stack_runs() {
        let mut state = state_with_payload("{}");
        state.begin_run(1);
        assert!(state.request_execution().is_err());
    }

    #[test]
    fn run_completed_stores_the_envelope_and_stops_executing() {
        let mut state = state_with_payload("{}");
        state.begin_run(1);
        let output = success_envelope(Deployment::V3, Vec::new());
        state.apply_run_event(&FlowRunEvent::RunCompleted {
            output: output.clone(),
        });

        assert!(!state.is_executing);
        assert_eq!(state.output, Some(output));
        assert!(state.output_json.as_deref().unwrap().contains("\"status\""));
    }

    #[test]
    fn elapsed_seconds_tracks_the_run_start_event() {
        let mut state = state_with_payload("{}");
        assert_eq!(state.elapsed_seconds(Utc::now()), None);

        let started = Utc::now();
        state.begin_run(1);
        state.apply_run_event(&FlowRunEvent::RunStarted { at: started });
        let elapsed = state
            .elapsed_seconds(started + chrono::Duration::seconds(7))
            .unwrap();
        assert_eq!(elapsed, 7);
    }
}
