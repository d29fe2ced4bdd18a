//! Application state and the pure update loop.
//!
//! [`App`] owns everything the UI renders: shared context (theme, preferences,
//! run plumbing), the per-view states, and the transient notice line. State
//! changes flow through [`App::update`], which consumes a message and returns
//! the side effects the runtime should perform. Nothing in this module touches
//! the terminal, the clipboard, or the filesystem.

use std::sync::Arc;
use std::time::{Duration, Instant};

use flowtty_engine::{RunTiming, SampledDetailSource, StageDetailSource};
use flowtty_types::flow::{FlowRunEvent, RunOutcome};
use flowtty_types::{Effect, Msg, Route};
use flowtty_util::UserPreferences;

use crate::ui::components::history::HistoryViewState;
use crate::ui::components::nav_bar::VerticalNavBarState;
use crate::ui::components::trigger::TriggerViewState;
use crate::ui::theme::{self, Theme};

/// How long a notice stays on screen before the tick loop clears it.
const NOTICE_TTL: Duration = Duration::from_secs(4);

/// Context shared by every component: theme, preferences, and the pieces the
/// runtime needs to spawn run drivers.
pub struct SharedCtx {
    pub theme: Box<dyn Theme>,
    pub preferences: UserPreferences,
    /// Detail source handed to every spawned run driver.
    pub details: Arc<dyn StageDetailSource + Send + Sync>,
    /// Stage schedule used for interactive runs.
    pub timing: RunTiming,
}

impl SharedCtx {
    pub fn new(preferences: UserPreferences) -> Self {
        let loaded = theme::load(preferences.preferred_theme().as_deref());
        Self {
            theme: loaded.theme,
            preferences,
            details: Arc::new(SampledDetailSource::new()),
            timing: RunTiming::default(),
        }
    }
}

/// Visual weight of a notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Info,
    Success,
    Error,
}

/// One transient status line, rendered in the hint row until it expires.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub text: String,
}

/// Holder for the current notice, if any. A new notice replaces the previous
/// one; the tick handler drops it after [`NOTICE_TTL`].
#[derive(Debug, Default)]
pub struct NoticeState {
    current: Option<(Notice, Instant)>,
}

impl NoticeState {
    pub fn info(&mut self, text: impl Into<String>) {
        self.push(NoticeKind::Info, text.into());
    }

    pub fn success(&mut self, text: impl Into<String>) {
        self.push(NoticeKind::Success, text.into());
    }

    pub fn error(&mut self, text: impl Into<String>) {
        self.push(NoticeKind::Error, text.into());
    }

    fn push(&mut self, kind: NoticeKind, text: String) {
        self.current = Some((Notice { kind, text }, Instant::now()));
    }

    /// The notice to render, if one is still live.
    pub fn active(&self) -> Option<&Notice> {
        self.current.as_ref().map(|(notice, _)| notice)
    }

    /// Drops the current notice once its time is up. Called from the tick
    /// handler.
    pub fn expire(&mut self) {
        if let Some((_, shown_at)) = &self.current {
            if shown_at.elapsed() >= NOTICE_TTL {
                self.current = None;
            }
        }
    }

    #[cfg(test)]
    fn backdate(&mut self, by: Duration) {
        if let Some((_, shown_at)) = &mut self.current {
            *shown_at = shown_at.checked_sub(by).expect("backdated instant in range");
        }
    }
}

/// Top-level application state.
pub struct App {
    pub ctx: SharedCtx,
    pub route: Route,
    pub trigger: TriggerViewState,
    pub history: HistoryViewState,
    pub nav_bar: VerticalNavBarState,
    pub notices: NoticeState,
    pub should_quit: bool,
}

impl App {
    pub fn new(preferences: UserPreferences) -> Self {
        let ctx = SharedCtx::new(preferences);
        let trigger = TriggerViewState::new(ctx.preferences.default_deployment().unwrap_or_default());
        Self {
            ctx,
            route: Route::Trigger,
            trigger,
            history: HistoryViewState::new(),
            nav_bar: VerticalNavBarState::defaults_for_views(),
            notices: NoticeState::default(),
            should_quit: false,
        }
    }

    /// Applies one message and returns the effects the runtime should run.
    ///
    /// Run events are gated on the active run id so a superseded driver's
    /// stragglers can never touch the stage list of its successor.
    pub fn update(&mut self, msg: &Msg) -> Vec<Effect> {
        match msg {
            Msg::Tick => {
                self.notices.expire();
                Vec::new()
            }
            Msg::Resize(_, _) => Vec::new(),
            Msg::FlowRun(run_id, event) => {
                if self.trigger.active_run_id != Some(*run_id) {
                    tracing::debug!(run_id, "dropping event from superseded run");
                    return Vec::new();
                }
                let failed = matches!(
                    event,
                    FlowRunEvent::RunCompleted { output } if output.status == RunOutcome::Error
                );
                self.trigger.apply_run_event(event);
                if failed {
                    self.notices.error("Flow execution failed");
                }
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flowtty_engine::error_envelope;
    use flowtty_types::Deployment;
    use flowtty_types::flow::StageStatus;

    fn app() -> App {
        App::new(UserPreferences::ephemeral())
    }

    #[test]
    fn events_from_superseded_runs_are_dropped() {
        let mut app = app();
        app.trigger.begin_run(7);

        let effects = app.update(&Msg::FlowRun(
            3,
            FlowRunEvent::StageStarted {
                index: 0,
                timestamp: "09:15:22".into(),
            },
        ));

        assert!(effects.is_empty());
        assert_eq!(app.trigger.stages[0].status, StageStatus::Pending);
        assert!(app.trigger.is_executing);
    }

    #[test]
    fn matching_run_events_advance_the_stage_list() {
        let mut app = app();
        app.trigger.begin_run(7);

        app.update(&Msg::FlowRun(
            7,
            FlowRunEvent::StageStarted {
                index: 0,
                timestamp: "09:15:22".into(),
            },
        ));

        assert_eq!(app.trigger.stages[0].status, StageStatus::Running);
        assert_eq!(app.trigger.stages[0].timestamp.as_deref(), Some("09:15:22"));
    }

    #[test]
    fn failed_run_raises_an_error_notice() {
        let mut app = app();
        app.trigger.begin_run(1);

        let output = error_envelope(Deployment::V2, Vec::new(), "LLM Processor");
        app.update(&Msg::FlowRun(1, FlowRunEvent::RunCompleted { output }));

        let notice = app.notices.active().expect("notice present");
        assert_eq!(notice.kind, NoticeKind::Error);
        assert_eq!(notice.text, "Flow execution failed");
        assert!(!app.trigger.is_executing);
    }

    #[test]
    fn notices_expire_on_tick_after_ttl() {
        let mut app = app();
        app.notices.success("Output copied to clipboard");
        assert!(app.notices.active().is_some());

        app.update(&Msg::Tick);
        assert!(app.notices.active().is_some(), "fresh notice survives a tick");

        app.notices.backdate(NOTICE_TTL + Duration::from_secs(1));
        app.update(&Msg::Tick);
        assert!(app.notices.active().is_none());
    }
}
