//! Rendering and input handling for the history view.
//!
//! Layout is a release sidebar on the left and the execution table on the
//! right, with a pagination footer underneath. Expanding a row opens a detail
//! pane with the full input and output JSON.

use crossterm::event::{KeyCode, KeyEvent, MouseButton, MouseEvent, MouseEventKind};
use flowtty_types::Effect;
use flowtty_types::history::{ExecutionRecord, Feedback, RecordStatus};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Layout, Position, Rect},
    text::{Line, Span},
    widgets::{Cell, Paragraph, Row, Table, TableState},
};

use super::state::{HistoryFocus, HistoryViewState};
use crate::app::App;
use crate::ui::components::common::highlighted_json_lines;
use crate::ui::components::{Component, find_target_index_by_mouse_position};
use crate::ui::theme::Theme;
use crate::ui::theme::theme_helpers::{self as th, render_button};

/// Interactive element a cached mouse-target rectangle belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ActionRole {
    PreviousButton,
    NextButton,
}

/// History view component.
#[derive(Debug, Default)]
pub struct HistoryComponent {
    /// Clickable rectangles recorded during the last render.
    mouse_target_areas: Vec<Rect>,
    /// Role of each rectangle, kept in lockstep with `mouse_target_areas`.
    mouse_target_roles: Vec<ActionRole>,
    /// Inner table area, header row included, for click-to-row mapping.
    table_area: Rect,
    table_state: TableState,
}

impl HistoryComponent {
    pub fn new() -> Self {
        Self::default()
    }

    fn push_target(&mut self, area: Rect, role: ActionRole) {
        self.mouse_target_areas.push(area);
        self.mouse_target_roles.push(role);
    }

    /// Keys handled while a feedback cell is in edit mode.
    fn handle_feedback_key(state: &mut HistoryViewState, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Char('l') => state.set_feedback(Feedback::Like),
            KeyCode::Char('d') => state.set_feedback(Feedback::Dislike),
            KeyCode::Esc => state.cancel_feedback_edit(),
            _ => return false,
        }
        true
    }

    fn focus_next(state: &mut HistoryViewState) {
        state.focus = match state.focus {
            HistoryFocus::Table => HistoryFocus::Previous,
            HistoryFocus::Previous => HistoryFocus::Next,
            HistoryFocus::Next => HistoryFocus::Table,
        };
    }

    fn focus_previous(state: &mut HistoryViewState) {
        state.focus = match state.focus {
            HistoryFocus::Table => HistoryFocus::Next,
            HistoryFocus::Previous => HistoryFocus::Table,
            HistoryFocus::Next => HistoryFocus::Previous,
        };
    }

    // ----- Rendering -----

    fn render_sidebar(&self, frame: &mut Frame, area: Rect, app: &App) {
        let theme = &*app.ctx.theme;
        let state = &app.history;
        let [releases_area, info_area] =
            Layout::vertical([Constraint::Length(7), Constraint::Min(0)]).areas(area);

        let releases_block = th::block(theme, Some("Releases"), false);
        let releases_inner = releases_block.inner(releases_area);
        frame.render_widget(releases_block, releases_area);
        let mut release_lines: Vec<Line> = Vec::new();
        for release in &state.releases {
            release_lines.push(Line::from(vec![
                Span::styled(release.name.clone(), theme.text_style()),
                Span::raw("  "),
                Span::styled(release.tag.clone(), theme.accent_secondary_style()),
            ]));
            release_lines.push(Line::styled(release.date.clone(), theme.text_muted_style()));
            release_lines.push(Line::styled(release.time.clone(), theme.text_muted_style()));
        }
        frame.render_widget(Paragraph::new(release_lines), releases_inner);

        let info_block = th::block(theme, Some("Release Info"), false);
        let info_inner = info_block.inner(info_area);
        frame.render_widget(info_block, info_area);
        let info = &state.release_info;
        let labeled = |label: &'static str, value: String| {
            Line::from(vec![
                Span::styled(label, theme.text_secondary_style()),
                Span::styled(value, theme.text_style()),
            ])
        };
        let info_lines = vec![
            labeled("Name: ", info.name.clone()),
            labeled("Description: ", info.description.clone()),
            labeled("Deployed On: ", info.deployed_on.clone()),
            labeled("Status: ", info.status.clone()),
            Line::from(vec![
                Span::styled("Tags: ", theme.text_secondary_style()),
                Span::styled(info.tags.join(", "), theme.accent_secondary_style()),
            ]),
        ];
        frame.render_widget(Paragraph::new(info_lines), info_inner);
    }

    fn render_table(&mut self, frame: &mut Frame, area: Rect, app: &App) {
        let theme = &*app.ctx.theme;
        let state = &app.history;
        let block = th::block(theme, Some("Execution History"), state.focus == HistoryFocus::Table);
        let inner = block.inner(area);
        frame.render_widget(block, area);
        self.table_area = inner;

        if state.records.is_empty() {
            frame.render_widget(
                Paragraph::new("No results.")
                    .style(theme.text_muted_style())
                    .alignment(Alignment::Center),
                inner,
            );
            return;
        }

        let header_cells = [
            "Execution ID",
            "Executed By",
            "Status",
            "Latency (sec)",
            "Input",
            "Output",
            "Feedback",
        ]
        .iter()
        .map(|&title| Span::styled(title, th::table_header_style(theme)));
        let header = Row::new(header_cells).style(th::table_header_row_style(theme));

        let rows: Vec<Row> = state
            .visible_records()
            .iter()
            .enumerate()
            .map(|(row_index, record)| {
                record_row(record, state, theme).style(th::table_row_style(theme, row_index))
            })
            .collect();

        self.table_state.select(Some(state.selected));
        let table = Table::new(
            rows,
            [
                Constraint::Length(15),
                Constraint::Length(20),
                Constraint::Length(10),
                Constraint::Length(13),
                Constraint::Min(18),
                Constraint::Min(18),
                Constraint::Length(10),
            ],
        )
        .header(header)
        .row_highlight_style(th::table_selected_style(theme));
        frame.render_stateful_widget(table, inner, &mut self.table_state);
    }

    fn render_detail(&self, frame: &mut Frame, area: Rect, app: &App) {
        let theme = &*app.ctx.theme;
        let Some(record) = app.history.selected_record() else {
            return;
        };
        let block = th::block(theme, Some("Execution Details"), false);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let [input_area, output_area] =
            Layout::horizontal([Constraint::Percentage(50), Constraint::Percentage(50)])
                .areas(inner);

        let input_json = serde_json::to_string_pretty(&record.input).unwrap_or_default();
        let mut input_lines = vec![Line::styled("Full Input:", theme.text_secondary_style())];
        input_lines.extend(highlighted_json_lines(&input_json, theme));
        frame.render_widget(Paragraph::new(input_lines), input_area);

        let output_json = serde_json::to_string_pretty(&record.output).unwrap_or_default();
        let mut output_lines = vec![Line::styled("Full Output:", theme.text_secondary_style())];
        output_lines.extend(highlighted_json_lines(&output_json, theme));
        frame.render_widget(Paragraph::new(output_lines), output_area);
    }

    fn render_footer(&mut self, frame: &mut Frame, area: Rect, app: &App) {
        let theme = &*app.ctx.theme;
        let state = &app.history;
        let [label_area, previous_area, next_area] = Layout::horizontal([
            Constraint::Min(0),
            Constraint::Length(12),
            Constraint::Length(8),
        ])
        .areas(area);

        let page_label = format!(
            "Page {} of {}",
            state.pagination.page + 1,
            state.pagination.page_count(state.records.len())
        );
        frame.render_widget(
            Paragraph::new(page_label)
                .style(theme.text_secondary_style())
                .alignment(Alignment::Right),
            label_area.inner(ratatui::layout::Margin {
                horizontal: 1,
                vertical: 1,
            }),
        );

        render_button(
            frame,
            previous_area,
            "Previous",
            state.pagination.can_previous(),
            state.focus == HistoryFocus::Previous,
            state.focus == HistoryFocus::Previous,
            theme,
            ratatui::widgets::Borders::ALL,
        );
        self.push_target(previous_area, ActionRole::PreviousButton);

        render_button(
            frame,
            next_area,
            "Next",
            state.pagination.can_next(state.records.len()),
            state.focus == HistoryFocus::Next,
            state.focus == HistoryFocus::Next,
            theme,
            ratatui::widgets::Borders::ALL,
        );
        self.push_target(next_area, ActionRole::NextButton);
    }
}

impl Component for HistoryComponent {
    fn handle_key_events(&mut self, app: &mut App, key: KeyEvent) -> Vec<Effect> {
        if app.history.editing_feedback.is_some()
            && Self::handle_feedback_key(&mut app.history, key)
        {
            return Vec::new();
        }

        match key.code {
            KeyCode::Tab => Self::focus_next(&mut app.history),
            KeyCode::BackTab => Self::focus_previous(&mut app.history),
            KeyCode::Up if app.history.focus == HistoryFocus::Table => app.history.select_up(),
            KeyCode::Down if app.history.focus == HistoryFocus::Table => app.history.select_down(),
            KeyCode::Left => app.history.previous_page(),
            KeyCode::Right => app.history.next_page(),
            KeyCode::Enter | KeyCode::Char(' ') => match app.history.focus {
                HistoryFocus::Table => app.history.toggle_selected_expanded(),
                HistoryFocus::Previous => app.history.previous_page(),
                HistoryFocus::Next => app.history.next_page(),
            },
            KeyCode::Char('f') if app.history.focus == HistoryFocus::Table => {
                app.history.start_feedback_edit();
            }
            _ => {}
        }
        Vec::new()
    }

    fn handle_mouse_events(&mut self, app: &mut App, mouse: MouseEvent) -> Vec<Effect> {
        let position = Position {
            x: mouse.column,
            y: mouse.row,
        };
        match mouse.kind {
            MouseEventKind::ScrollUp if self.table_area.contains(position) => {
                app.history.select_up();
                return Vec::new();
            }
            MouseEventKind::ScrollDown if self.table_area.contains(position) => {
                app.history.select_down();
                return Vec::new();
            }
            MouseEventKind::Down(MouseButton::Left) => {}
            _ => return Vec::new(),
        }

        if let Some(index) =
            find_target_index_by_mouse_position(&self.mouse_target_areas, mouse.column, mouse.row)
        {
            match self.mouse_target_roles[index] {
                ActionRole::PreviousButton => app.history.previous_page(),
                ActionRole::NextButton => app.history.next_page(),
            }
            return Vec::new();
        }

        if let Some(row) = table_row_at(self.table_area, position, self.table_state.offset()) {
            app.history.focus = HistoryFocus::Table;
            if row == app.history.selected {
                app.history.toggle_selected_expanded();
            } else {
                app.history.select_row(row);
            }
        }
        Vec::new()
    }

    fn render(&mut self, frame: &mut Frame, rect: Rect, app: &mut App) {
        self.mouse_target_areas.clear();
        self.mouse_target_roles.clear();
        self.table_area = Rect::ZERO;

        let [sidebar_area, content_area] =
            Layout::horizontal([Constraint::Length(26), Constraint::Min(0)]).areas(rect);
        self.render_sidebar(frame, sidebar_area, app);

        let [main_area, footer_area] =
            Layout::vertical([Constraint::Min(6), Constraint::Length(3)]).areas(content_area);

        let show_detail = app
            .history
            .selected_record()
            .is_some_and(|record| record.expanded);
        if show_detail {
            let [table_area, detail_area] =
                Layout::vertical([Constraint::Percentage(55), Constraint::Percentage(45)])
                    .areas(main_area);
            self.render_table(frame, table_area, app);
            self.render_detail(frame, detail_area, app);
        } else {
            self.render_table(frame, main_area, app);
        }

        self.render_footer(frame, footer_area, app);
    }

    fn get_hint_spans(&self, app: &App) -> Vec<Span<'static>> {
        let theme = &*app.ctx.theme;
        if app.history.editing_feedback.is_some() {
            return th::build_hint_spans(
                theme,
                &[("l", "Like"), ("d", "Dislike"), ("esc", "Cancel")],
            );
        }
        th::build_hint_spans(
            theme,
            &[
                ("↑/↓", "Select"),
                ("enter", "Details"),
                ("◂/▸", "Page"),
                ("f", "Feedback"),
            ],
        )
    }
}

/// Maps a click inside the table to a page-relative row, skipping the header.
fn table_row_at(table_area: Rect, position: Position, offset: usize) -> Option<usize> {
    if !table_area.contains(position) || position.y <= table_area.y {
        return None;
    }
    Some((position.y - table_area.y - 1) as usize + offset)
}

/// One table row; the feedback cell reflects edit mode for its record.
fn record_row<'a>(
    record: &'a ExecutionRecord,
    state: &HistoryViewState,
    theme: &dyn Theme,
) -> Row<'a> {
    let chevron = if record.expanded { "▾" } else { "▸" };
    let status_style = match record.status {
        RecordStatus::Completed => theme.status_success(),
        RecordStatus::Failed => theme.status_error(),
    };
    let feedback_cell = if state.is_editing_feedback(&record.execution_id) {
        Cell::from("l / d").style(theme.accent_emphasis_style())
    } else {
        match record.feedback {
            Some(Feedback::Like) => Cell::from("Like").style(theme.status_success()),
            Some(Feedback::Dislike) => Cell::from("Dislike").style(theme.status_error()),
            None => Cell::from("-").style(theme.text_muted_style()),
        }
    };

    Row::new(vec![
        Cell::from(format!("{chevron} {}", record.execution_id)),
        Cell::from(record.executed_by.as_str()),
        Cell::from(record.status.as_str()).style(status_style),
        Cell::from(format!("{:.1}", record.latency)),
        Cell::from(record.input_summary()),
        Cell::from(record.output_summary()),
        feedback_cell,
    ])
}

#[cfg(test)]
mod tests {
    use crossterm::event::KeyModifiers;
    use flowtty_util::UserPreferences;

    use super::*;
    use crate::app::App;

    fn test_app() -> App {
        App::new(UserPreferences::ephemeral())
    }

    fn press(component: &mut HistoryComponent, app: &mut App, code: KeyCode) {
        component.handle_key_events(app, KeyEvent::new(code, KeyModifiers::NONE));
    }

    #[test]
    fn feedback_editing_applies_a_like() {
        let mut component = HistoryComponent::new();
        let mut app = test_app();
        press(&mut component, &mut app, KeyCode::Down);
        press(&mut component, &mut app, KeyCode::Down);
        press(&mut component, &mut app, KeyCode::Char('f'));
        press(&mut component, &mut app, KeyCode::Char('l'));

        assert_eq!(app.history.records[2].feedback, Some(Feedback::Like));
        assert!(app.history.editing_feedback.is_none());
    }

    #[test]
    fn enter_toggles_the_detail_pane_for_the_selected_row() {
        let mut component = HistoryComponent::new();
        let mut app = test_app();
        press(&mut component, &mut app, KeyCode::Enter);
        assert!(app.history.records[0].expanded);
        press(&mut component, &mut app, KeyCode::Enter);
        assert!(!app.history.records[0].expanded);
    }

    #[test]
    fn arrow_keys_page_through_the_table() {
        let mut component = HistoryComponent::new();
        let mut app = test_app();
        press(&mut component, &mut app, KeyCode::Right);
        assert_eq!(app.history.pagination.page, 1);
        press(&mut component, &mut app, KeyCode::Left);
        assert_eq!(app.history.pagination.page, 0);
    }

    #[test]
    fn clicking_a_footer_button_changes_the_page() {
        let mut component = HistoryComponent::new();
        let mut app = test_app();
        component.push_target(Rect::new(0, 0, 8, 3), ActionRole::NextButton);

        let mouse = MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column: 2,
            row: 1,
            modifiers: KeyModifiers::NONE,
        };
        component.handle_mouse_events(&mut app, mouse);
        assert_eq!(app.history.pagination.page, 1);
    }

    #[test]
    fn clicking_the_selected_row_expands_it() {
        let mut component = HistoryComponent::new();
        let mut app = test_app();
        component.table_area = Rect::new(0, 0, 80, 8);

        // Header occupies the first line; row 0 sits below it.
        let mouse = MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column: 4,
            row: 1,
            modifiers: KeyModifiers::NONE,
        };
        component.handle_mouse_events(&mut app, mouse);
        assert!(app.history.records[0].expanded);

        let second_row = MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column: 4,
            row: 2,
            modifiers: KeyModifiers::NONE,
        };
        component.handle_mouse_events(&mut app, second_row);
        assert_eq!(app.history.selected, 1);
        assert!(app.history.records[0].expanded);
    }

    #[test]
    fn clicks_past_the_last_row_do_not_move_the_selection() {
        let mut component = HistoryComponent::new();
        let mut app = test_app();
        component.table_area = Rect::new(0, 0, 80, 10);
        app.history.next_page();

        let mouse = MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column: 4,
            row: 5,
            modifiers: KeyModifiers::NONE,
        };
        component.handle_mouse_events(&mut app, mouse);
        assert_eq!(app.history.selected, 0);
    }
}
