//! Rendering and input handling for the trigger view.
//!
//! The component keeps no domain state of its own; everything lives on
//! [`TriggerViewState`]. What it does cache is the rectangles of the
//! interactive elements rendered in the last frame, so mouse clicks can be
//! mapped back to the action they landed on.

use chrono::Utc;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use flowtty_types::Effect;
use flowtty_types::flow::{ExecutionStage, RunOutcome, StageStatus};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Layout, Position, Rect},
    text::{Line, Span},
    widgets::{Gauge, Paragraph, Wrap},
};

use super::state::{PAYLOAD_PLACEHOLDER, PREVIEW_LINE_COUNT, TriggerFocus, TriggerViewState, ViewEvent, ViewMode};
use crate::app::App;
use crate::ui::components::common::highlighted_json_lines;
use crate::ui::components::{Component, find_target_index_by_mouse_position};
use crate::ui::theme::Theme;
use crate::ui::theme::theme_helpers::{self as th, render_button};

/// Interactive element a cached mouse-target rectangle belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ActionRole {
    DeploymentSelector,
    ExecuteButton,
    PayloadToggle,
    LogToggle,
    PayloadEditor,
    CopyButton,
    SaveButton,
    CollapseButton,
}

/// Trigger view component.
#[derive(Debug, Default)]
pub struct TriggerComponent {
    /// Clickable rectangles recorded during the last render.
    mouse_target_areas: Vec<Rect>,
    /// Role of each rectangle, kept in lockstep with `mouse_target_areas`.
    mouse_target_roles: Vec<ActionRole>,
    /// Stage log pane, for wheel scrolling.
    log_area: Rect,
    /// Expanded output pane, for wheel scrolling.
    output_area: Rect,
}

impl TriggerComponent {
    pub fn new() -> Self {
        Self::default()
    }

    fn push_target(&mut self, area: Rect, role: ActionRole) {
        self.mouse_target_areas.push(area);
        self.mouse_target_roles.push(role);
    }

    /// Validates the payload and either emits the run request or surfaces
    /// the rejection as an error notice.
    fn submit(app: &mut App) -> Vec<Effect> {
        match app.trigger.request_execution() {
            Ok(effect) => vec![effect],
            Err(message) => {
                app.notices.error(message);
                Vec::new()
            }
        }
    }

    fn toggle_payload(state: &mut TriggerViewState) {
        let event = if state.mode == ViewMode::Compose {
            ViewEvent::ClosePayload
        } else {
            ViewEvent::OpenPayload
        };
        state.apply_view_event(event);
        if state.mode != ViewMode::Compose && state.focus == TriggerFocus::Payload {
            state.focus = TriggerFocus::Execute;
        }
    }

    fn toggle_logs(state: &mut TriggerViewState) {
        let event = if state.mode == ViewMode::Log {
            ViewEvent::HideLog
        } else {
            ViewEvent::ShowLog
        };
        state.apply_view_event(event);
        if state.mode != ViewMode::Compose && state.focus == TriggerFocus::Payload {
            state.focus = TriggerFocus::Execute;
        }
    }

    fn toggle_expanded(state: &mut TriggerViewState) {
        if state.mode == ViewMode::Expanded {
            state.apply_view_event(ViewEvent::CollapseOutput);
        } else if state.output.is_some() {
            state.apply_view_event(ViewEvent::ExpandOutput);
        }
    }

    fn copy_output(app: &App) -> Vec<Effect> {
        match app.trigger.output_json.as_ref() {
            Some(json) => vec![Effect::CopyToClipboardRequested(json.clone())],
            None => Vec::new(),
        }
    }

    fn save_output(app: &App) -> Vec<Effect> {
        match app.trigger.output_json.as_ref() {
            Some(json) => vec![Effect::SaveOutputRequested(json.clone())],
            None => Vec::new(),
        }
    }

    fn focus_next(state: &mut TriggerViewState) {
        state.focus = match state.focus {
            TriggerFocus::Deployment if state.mode == ViewMode::Compose => TriggerFocus::Payload,
            TriggerFocus::Deployment => TriggerFocus::Execute,
            TriggerFocus::Payload => TriggerFocus::Execute,
            TriggerFocus::Execute => TriggerFocus::Deployment,
        };
    }

    fn focus_previous(state: &mut TriggerViewState) {
        state.focus = match state.focus {
            TriggerFocus::Deployment => TriggerFocus::Execute,
            TriggerFocus::Payload => TriggerFocus::Deployment,
            TriggerFocus::Execute if state.mode == ViewMode::Compose => TriggerFocus::Payload,
            TriggerFocus::Execute => TriggerFocus::Deployment,
        };
    }

    /// Key handling while the payload editor has focus. Everything except
    /// the focus-movement keys goes into the text buffer.
    fn handle_payload_key(app: &mut App, key: KeyEvent) -> Vec<Effect> {
        match key.code {
            KeyCode::Esc => app.trigger.focus = TriggerFocus::Execute,
            KeyCode::Enter => app.trigger.payload.insert_newline(),
            KeyCode::Backspace => app.trigger.payload.backspace(),
            KeyCode::Left => app.trigger.payload.move_left(),
            KeyCode::Right => app.trigger.payload.move_right(),
            KeyCode::Up => app.trigger.payload.move_up(),
            KeyCode::Down => app.trigger.payload.move_down(),
            KeyCode::Home => app.trigger.payload.move_line_start(),
            KeyCode::End => app.trigger.payload.move_line_end(),
            KeyCode::Char(character) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                app.trigger.payload.insert_char(character);
            }
            _ => {}
        }
        Vec::new()
    }

    fn handle_scroll(&self, app: &mut App, mouse: MouseEvent, up: bool) {
        let position = Position {
            x: mouse.column,
            y: mouse.row,
        };
        if self.log_area.contains(position) {
            let scroll = &mut app.trigger.log_scroll;
            *scroll = if up { scroll.saturating_sub(1) } else { scroll.saturating_add(1) };
        } else if self.output_area.contains(position) {
            let scroll = &mut app.trigger.output_scroll;
            *scroll = if up { scroll.saturating_sub(1) } else { scroll.saturating_add(1) };
        }
    }

    // ----- Rendering -----

    fn render_header(&mut self, frame: &mut Frame, area: Rect, app: &App) {
        let theme = &*app.ctx.theme;
        let state = &app.trigger;
        let [deployment_area, execute_area, payload_toggle_area, log_toggle_area, status_area] =
            Layout::horizontal([
                Constraint::Length(18),
                Constraint::Length(16),
                Constraint::Length(16),
                Constraint::Length(13),
                Constraint::Min(0),
            ])
            .areas(area);

        let selector = Paragraph::new(format!("◂ {} ▸", state.deployment()))
            .alignment(Alignment::Center)
            .style(theme.accent_primary_style())
            .block(th::block(theme, Some("Deployment"), state.focus == TriggerFocus::Deployment));
        frame.render_widget(selector, deployment_area);
        self.push_target(deployment_area, ActionRole::DeploymentSelector);

        let execute_label = if state.is_executing { "Executing" } else { "Execute Flow" };
        render_button(
            frame,
            execute_area,
            execute_label,
            !state.is_executing,
            state.focus == TriggerFocus::Execute,
            state.focus == TriggerFocus::Execute,
            theme,
            ratatui::widgets::Borders::ALL,
        );
        self.push_target(execute_area, ActionRole::ExecuteButton);

        let payload_label = if state.mode == ViewMode::Compose {
            "Hide Payload"
        } else {
            "Show Payload"
        };
        render_button(
            frame,
            payload_toggle_area,
            payload_label,
            true,
            false,
            false,
            theme,
            ratatui::widgets::Borders::ALL,
        );
        self.push_target(payload_toggle_area, ActionRole::PayloadToggle);

        let log_label = if state.mode == ViewMode::Log { "Hide Logs" } else { "Show Logs" };
        render_button(
            frame,
            log_toggle_area,
            log_label,
            true,
            false,
            false,
            theme,
            ratatui::widgets::Borders::ALL,
        );
        self.push_target(log_toggle_area, ActionRole::LogToggle);

        let status = header_status_line(state, theme);
        frame.render_widget(
            Paragraph::new(status).alignment(Alignment::Right),
            status_area.inner(ratatui::layout::Margin {
                horizontal: 1,
                vertical: 1,
            }),
        );
    }

    fn render_progress(&self, frame: &mut Frame, area: Rect, app: &App) {
        let state = &app.trigger;
        if !state.has_run_activity() {
            return;
        }
        let theme = &*app.ctx.theme;
        let style = if state.has_error() {
            theme.status_error()
        } else {
            theme.accent_primary_style()
        };
        let percent = (state.progress() * 100.0).round() as u16;
        let gauge = Gauge::default()
            .ratio(state.progress())
            .label(format!("{percent}%"))
            .gauge_style(style)
            .style(theme.background_style());
        frame.render_widget(gauge, area);
    }

    fn render_payload_editor(&mut self, frame: &mut Frame, area: Rect, app: &App) {
        let theme = &*app.ctx.theme;
        let state = &app.trigger;
        let focused = state.focus == TriggerFocus::Payload;
        let block = th::block(theme, Some("Request Payload"), focused);
        let inner = block.inner(area);
        frame.render_widget(block, area);
        self.push_target(area, ActionRole::PayloadEditor);

        if state.payload.input().is_empty() && !focused {
            frame.render_widget(
                Paragraph::new(PAYLOAD_PLACEHOLDER)
                    .style(theme.text_muted_style())
                    .wrap(Wrap { trim: false }),
                inner,
            );
            return;
        }

        let (cursor_line, cursor_col) = state.payload.cursor_line_col();
        let visible_rows = inner.height.max(1) as usize;
        let scroll = cursor_line.saturating_sub(visible_rows - 1) as u16;
        frame.render_widget(
            Paragraph::new(state.payload.input())
                .style(theme.text_style())
                .scroll((scroll, 0)),
            inner,
        );

        if focused && inner.width > 0 {
            let x = inner.x + (cursor_col as u16).min(inner.width - 1);
            let y = inner.y + (cursor_line as u16 - scroll).min(inner.height.saturating_sub(1));
            frame.set_cursor_position(Position { x, y });
        }
    }

    fn render_stage_log(&mut self, frame: &mut Frame, area: Rect, app: &App) {
        let theme = &*app.ctx.theme;
        let state = &app.trigger;
        let block = th::block(theme, Some("Execution Log"), false);
        let inner = block.inner(area);
        frame.render_widget(block, area);
        self.log_area = inner;

        if state.stages.is_empty() {
            frame.render_widget(
                Paragraph::new("Execute to see logs")
                    .style(theme.text_muted_style())
                    .alignment(Alignment::Center),
                inner,
            );
            return;
        }

        let lines: Vec<Line> = state
            .stages
            .iter()
            .map(|stage| stage_line(stage, theme))
            .collect();
        frame.render_widget(
            Paragraph::new(lines).scroll((state.log_scroll, 0)),
            inner,
        );
    }

    fn render_output_preview(&mut self, frame: &mut Frame, area: Rect, app: &App) {
        let theme = &*app.ctx.theme;
        let state = &app.trigger;
        let block = th::block(theme, Some("Output"), false);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let Some(json) = state.output_json.as_deref() else {
            return;
        };
        let mut lines = highlighted_json_lines(json, theme);
        if lines.len() > PREVIEW_LINE_COUNT {
            lines.truncate(PREVIEW_LINE_COUNT);
            lines.push(Line::styled("...", theme.text_muted_style()));
        }
        frame.render_widget(Paragraph::new(lines), inner);
    }

    fn render_output_expanded(&mut self, frame: &mut Frame, area: Rect, app: &App) {
        let theme = &*app.ctx.theme;
        let state = &app.trigger;
        let [json_outer, actions_area] =
            Layout::vertical([Constraint::Min(3), Constraint::Length(3)]).areas(area);

        let block = th::block(theme, Some("Output"), false);
        let inner = block.inner(json_outer);
        frame.render_widget(block, json_outer);
        self.output_area = inner;

        if let Some(json) = state.output_json.as_deref() {
            let lines = highlighted_json_lines(json, theme);
            frame.render_widget(
                Paragraph::new(lines).scroll((state.output_scroll, 0)),
                inner,
            );
        }

        let [copy_area, save_area, collapse_area, _] = Layout::horizontal([
            Constraint::Length(10),
            Constraint::Length(10),
            Constraint::Length(12),
            Constraint::Min(0),
        ])
        .areas(actions_area);
        for (button_area, label, role) in [
            (copy_area, "Copy", ActionRole::CopyButton),
            (save_area, "Save", ActionRole::SaveButton),
            (collapse_area, "Collapse", ActionRole::CollapseButton),
        ] {
            render_button(
                frame,
                button_area,
                label,
                true,
                false,
                false,
                theme,
                ratatui::widgets::Borders::ALL,
            );
            self.push_target(button_area, role);
        }
    }

    /// Renders the pane to the right of (or instead of) the payload editor.
    /// The stage log wins while a run is in flight or logs are pinned; the
    /// output takes over once an envelope is available.
    fn render_side_pane(&mut self, frame: &mut Frame, area: Rect, app: &App) {
        let state = &app.trigger;
        let show_output =
            state.output_json.is_some() && !state.is_executing && state.mode != ViewMode::Log;
        if !show_output {
            self.render_stage_log(frame, area, app);
        } else if state.mode == ViewMode::Expanded {
            self.render_output_expanded(frame, area, app);
        } else {
            self.render_output_preview(frame, area, app);
        }
    }
}

impl Component for TriggerComponent {
    fn handle_key_events(&mut self, app: &mut App, key: KeyEvent) -> Vec<Effect> {
        let editing =
            app.trigger.mode == ViewMode::Compose && app.trigger.focus == TriggerFocus::Payload;
        match key.code {
            KeyCode::Tab => {
                Self::focus_next(&mut app.trigger);
                Vec::new()
            }
            KeyCode::BackTab => {
                Self::focus_previous(&mut app.trigger);
                Vec::new()
            }
            _ if editing => Self::handle_payload_key(app, key),
            KeyCode::Left if app.trigger.focus == TriggerFocus::Deployment => {
                app.trigger.select_previous_deployment();
                Vec::new()
            }
            KeyCode::Right if app.trigger.focus == TriggerFocus::Deployment => {
                app.trigger.select_next_deployment();
                Vec::new()
            }
            KeyCode::Enter | KeyCode::Char(' ')
                if app.trigger.focus == TriggerFocus::Execute =>
            {
                Self::submit(app)
            }
            KeyCode::Enter | KeyCode::Char(' ')
                if app.trigger.focus == TriggerFocus::Deployment =>
            {
                app.trigger.select_next_deployment();
                Vec::new()
            }
            KeyCode::Char('p') => {
                Self::toggle_payload(&mut app.trigger);
                Vec::new()
            }
            KeyCode::Char('l') => {
                Self::toggle_logs(&mut app.trigger);
                Vec::new()
            }
            KeyCode::Char('e') => {
                Self::toggle_expanded(&mut app.trigger);
                Vec::new()
            }
            KeyCode::Char('c') => Self::copy_output(app),
            KeyCode::Char('s') => Self::save_output(app),
            _ => Vec::new(),
        }
    }

    fn handle_mouse_events(&mut self, app: &mut App, mouse: MouseEvent) -> Vec<Effect> {
        match mouse.kind {
            MouseEventKind::ScrollUp => {
                self.handle_scroll(app, mouse, true);
                return Vec::new();
            }
            MouseEventKind::ScrollDown => {
                self.handle_scroll(app, mouse, false);
                return Vec::new();
            }
            MouseEventKind::Down(MouseButton::Left) => {}
            _ => return Vec::new(),
        }

        let Some(index) =
            find_target_index_by_mouse_position(&self.mouse_target_areas, mouse.column, mouse.row)
        else {
            return Vec::new();
        };
        match self.mouse_target_roles[index] {
            ActionRole::DeploymentSelector => {
                app.trigger.select_next_deployment();
                Vec::new()
            }
            ActionRole::ExecuteButton => Self::submit(app),
            ActionRole::PayloadToggle => {
                Self::toggle_payload(&mut app.trigger);
                Vec::new()
            }
            ActionRole::LogToggle => {
                Self::toggle_logs(&mut app.trigger);
                Vec::new()
            }
            ActionRole::PayloadEditor => {
                app.trigger.focus = TriggerFocus::Payload;
                Vec::new()
            }
            ActionRole::CopyButton => Self::copy_output(app),
            ActionRole::SaveButton => Self::save_output(app),
            ActionRole::CollapseButton => {
                app.trigger.apply_view_event(ViewEvent::CollapseOutput);
                Vec::new()
            }
        }
    }

    fn render(&mut self, frame: &mut Frame, rect: Rect, app: &mut App) {
        self.mouse_target_areas.clear();
        self.mouse_target_roles.clear();
        self.log_area = Rect::ZERO;
        self.output_area = Rect::ZERO;

        let [header_area, gauge_area, body_area] = Layout::vertical([
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Min(6),
        ])
        .areas(rect);

        self.render_header(frame, header_area, app);
        self.render_progress(frame, gauge_area, app);

        if app.trigger.mode == ViewMode::Compose {
            let [payload_area, side_area] =
                Layout::horizontal([Constraint::Percentage(50), Constraint::Percentage(50)])
                    .areas(body_area);
            self.render_payload_editor(frame, payload_area, app);
            self.render_side_pane(frame, side_area, app);
        } else {
            self.render_side_pane(frame, body_area, app);
        }
    }

    fn get_hint_spans(&self, app: &App) -> Vec<Span<'static>> {
        let theme = &*app.ctx.theme;
        let state = &app.trigger;
        if state.mode == ViewMode::Compose && state.focus == TriggerFocus::Payload {
            return th::build_hint_spans(
                theme,
                &[("tab", "Next field"), ("enter", "New line"), ("esc", "Done")],
            );
        }

        let mut hints: Vec<(&'static str, &'static str)> = vec![
            ("enter", "Execute"),
            ("tab", "Focus"),
            ("p", "Payload"),
            ("l", "Logs"),
        ];
        if state.output_json.is_some() {
            let expand_label = if state.mode == ViewMode::Expanded { "Collapse" } else { "Expand" };
            hints.push(("e", expand_label));
            hints.push(("c", "Copy"));
            hints.push(("s", "Save"));
        }
        th::build_hint_spans(theme, &hints)
    }
}

// ----- Line builders -----

/// One row of the execution log: status icon, stage name, timestamp, details.
fn stage_line<'a>(stage: &'a ExecutionStage, theme: &dyn Theme) -> Line<'a> {
    let (icon, icon_style) = match stage.status {
        StageStatus::Pending => ("○", theme.text_muted_style()),
        StageStatus::Running => ("▸", theme.accent_primary_style()),
        StageStatus::Success => ("✓", theme.status_success()),
        StageStatus::Error => ("✗", theme.status_error()),
    };
    let mut spans = vec![
        Span::styled(icon, icon_style),
        Span::raw(" "),
        Span::styled(stage.name.as_str(), theme.text_style()),
        Span::raw("  "),
        Span::styled(
            stage.timestamp.as_deref().unwrap_or("Pending"),
            theme.text_muted_style(),
        ),
    ];
    if let Some(details) = stage.details.as_deref() {
        spans.push(Span::raw("  "));
        spans.push(Span::styled(details, theme.text_secondary_style()));
    }
    Line::from(spans)
}

fn header_status_line(state: &TriggerViewState, theme: &dyn Theme) -> Line<'static> {
    if state.is_executing {
        let label = match state.elapsed_seconds(Utc::now()) {
            Some(elapsed) => format!("Executing {elapsed}s"),
            None => "Executing".to_string(),
        };
        return Line::styled(label, theme.accent_primary_style());
    }
    match state.output.as_ref().map(|output| output.status) {
        Some(RunOutcome::Success) => Line::styled("Success", theme.status_success()),
        Some(RunOutcome::Error) => Line::styled("Failed", theme.status_error()),
        None => Line::raw(""),
    }
}
