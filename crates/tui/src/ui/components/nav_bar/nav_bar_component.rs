use crossterm::event::{MouseButton, MouseEvent, MouseEventKind};
use flowtty_types::Effect;
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    text::Span,
    widgets::Borders,
};

use super::VerticalNavBarState;
use crate::app::App;
use crate::ui::components::{Component, find_target_index_by_mouse_position};
use crate::ui::theme::theme_helpers::{self as th, render_button};

/// A reusable vertical navigation bar component.
///
/// Renders a vertical column of icon buttons with selection styling. Items
/// activate on left click; keyboard access goes through the global view
/// shortcuts handled by the main component.
#[derive(Debug, Default)]
pub struct VerticalNavBarComponent {
    /// Optional title for the surrounding block. When `None`, no title is shown.
    pub title: Option<String>,
}

impl VerticalNavBarComponent {
    /// Creates a new component.
    pub fn new() -> Self {
        Self {
            title: Some("Views".to_string()),
        }
    }

    /// Equal-height rows inside the block, one per item.
    fn item_layout(state: &VerticalNavBarState, area: Rect) -> Vec<Rect> {
        let row_count = state.items.len();
        let mut constraints = vec![Constraint::Length(3); row_count];
        constraints.push(Constraint::Min(0));
        let mut rects = Layout::vertical(constraints).margin(1).split(area).to_vec();
        rects.truncate(row_count);
        rects
    }
}

impl Component for VerticalNavBarComponent {
    /// Routes left clicks on an item to its view.
    fn handle_mouse_events(&mut self, app: &mut App, mouse: MouseEvent) -> Vec<Effect> {
        if mouse.kind != MouseEventKind::Down(MouseButton::Left) {
            return Vec::new();
        }
        let Some(idx) = find_target_index_by_mouse_position(&app.nav_bar.per_item_areas, mouse.column, mouse.row) else {
            return Vec::new();
        };
        let Some(route) = app.nav_bar.items.get(idx).map(|item| item.route) else {
            return Vec::new();
        };
        app.nav_bar.selected_index = idx;
        vec![Effect::SwitchTo(route)]
    }

    /// Renders the navigation bar widget within the given area.
    fn render(&mut self, frame: &mut Frame, area: Rect, app: &mut App) {
        let theme = &*app.ctx.theme;
        let block = th::block(theme, self.title.as_deref(), false);
        frame.render_widget(block, area);

        if app.nav_bar.items.is_empty() {
            return;
        }

        let item_rects = Self::item_layout(&app.nav_bar, area);
        for (index, item) in app.nav_bar.items.iter().enumerate() {
            let is_selected = index == app.nav_bar.selected_index;
            if let Some(row_area) = item_rects.get(index).copied() {
                let borders = if is_selected { Borders::ALL } else { Borders::NONE };
                render_button(frame, row_area, &item.icon, true, is_selected, is_selected, theme, borders);
            }
        }
        app.nav_bar.per_item_areas = item_rects;
    }

    fn get_hint_spans(&self, app: &App) -> Vec<Span<'static>> {
        th::build_hint_spans(
            &*app.ctx.theme,
            &[("ctrl+t", "Trigger"), ("ctrl+h", "History"), ("ctrl+c", "Quit")],
        )
    }
}
