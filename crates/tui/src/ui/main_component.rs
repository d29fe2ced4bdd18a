//! Top-level composition: nav bar on the left, the active view on the right,
//! and a hint bar with the transient notice line underneath.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseEvent};
use flowtty_types::{Effect, Msg, Route};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
};
use unicode_width::UnicodeWidthStr;

use crate::app::{App, NoticeKind};
use crate::ui::components::{Component, HistoryComponent, TriggerComponent, VerticalNavBarComponent};

/// Root component owning one instance of each view.
///
/// Input goes to the view matching the current route; the nav bar sees mouse
/// events on every route. Global shortcuts are handled here before anything
/// is delegated.
#[derive(Debug, Default)]
pub struct MainView {
    trigger_view: TriggerComponent,
    history_view: HistoryComponent,
    nav_bar_view: VerticalNavBarComponent,
}

impl MainView {
    pub fn new() -> Self {
        Self {
            trigger_view: TriggerComponent::new(),
            history_view: HistoryComponent::new(),
            nav_bar_view: VerticalNavBarComponent::new(),
        }
    }

    /// Switches the active route. Components do not call this directly; they
    /// return [`Effect::SwitchTo`] and the runtime lands here.
    pub fn set_current_route(&mut self, app: &mut App, route: Route) {
        match app.route {
            Route::Trigger => self.trigger_view.on_route_exit(app),
            Route::History => self.history_view.on_route_exit(app),
        }
        app.route = route;
        app.nav_bar.set_route(route);
        match route {
            Route::Trigger => self.trigger_view.on_route_enter(app),
            Route::History => self.history_view.on_route_enter(app),
        }
    }

    fn active_view(&mut self, route: Route) -> &mut dyn Component {
        match route {
            Route::Trigger => &mut self.trigger_view,
            Route::History => &mut self.history_view,
        }
    }

    /// Nav column, content area, hint bar.
    fn layout(area: Rect) -> [Rect; 3] {
        let [nav_area, wrapper] =
            Layout::horizontal([Constraint::Length(9), Constraint::Min(1)]).areas(area);
        let [content_area, hints_area] =
            Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).areas(wrapper);
        [nav_area, content_area, hints_area]
    }

    fn render_hint_bar(&self, frame: &mut Frame, area: Rect, app: &App) {
        let theme = &*app.ctx.theme;
        let notice = app.notices.active();
        let notice_width = notice
            .map(|notice| notice.text.width() as u16 + 2)
            .unwrap_or(0);
        let [hints_area, notice_area] =
            Layout::horizontal([Constraint::Min(1), Constraint::Length(notice_width)]).areas(area);

        let hint_spans = self.get_hint_spans(app);
        frame.render_widget(
            Paragraph::new(Line::from(hint_spans)).style(theme.text_muted_style()),
            hints_area,
        );

        if let Some(notice) = notice {
            let style = match notice.kind {
                NoticeKind::Info => theme.status_info(),
                NoticeKind::Success => theme.status_success(),
                NoticeKind::Error => theme.status_error(),
            };
            frame.render_widget(
                Paragraph::new(notice.text.as_str())
                    .style(style)
                    .alignment(Alignment::Right),
                notice_area,
            );
        }
    }
}

impl Component for MainView {
    fn init(&mut self, app: &mut App) -> anyhow::Result<()> {
        self.trigger_view.init(app)?;
        self.history_view.init(app)?;
        self.nav_bar_view.init(app)?;
        Ok(())
    }

    fn handle_message(&mut self, app: &mut App, msg: &Msg) -> Vec<Effect> {
        let mut effects = app.update(msg);
        let route = app.route;
        effects.extend(self.active_view(route).handle_message(app, msg));
        effects
    }

    fn handle_key_events(&mut self, app: &mut App, key: KeyEvent) -> Vec<Effect> {
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            match key.code {
                KeyCode::Char('c') => {
                    app.should_quit = true;
                    return Vec::new();
                }
                KeyCode::Char('t') => return vec![Effect::SwitchTo(Route::Trigger)],
                KeyCode::Char('h') => return vec![Effect::SwitchTo(Route::History)],
                _ => {}
            }
        }

        let route = app.route;
        self.active_view(route).handle_key_events(app, key)
    }

    fn handle_mouse_events(&mut self, app: &mut App, mouse: MouseEvent) -> Vec<Effect> {
        let mut effects = self.nav_bar_view.handle_mouse_events(app, mouse);
        let route = app.route;
        effects.extend(self.active_view(route).handle_mouse_events(app, mouse));
        effects
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, app: &mut App) {
        let bg_fill = Paragraph::new("").style(Style::default().bg(app.ctx.theme.roles().background));
        frame.render_widget(bg_fill, area);

        let [nav_area, content_area, hints_area] = Self::layout(area);
        self.nav_bar_view.render(frame, nav_area, app);
        let route = app.route;
        self.active_view(route).render(frame, content_area, app);
        self.render_hint_bar(frame, hints_area, app);
    }

    fn get_hint_spans(&self, app: &App) -> Vec<Span<'static>> {
        let theme = &*app.ctx.theme;
        let mut spans = vec![Span::styled("Hints: ", theme.text_muted_style())];
        let view: &dyn Component = match app.route {
            Route::Trigger => &self.trigger_view,
            Route::History => &self.history_view,
        };
        spans.extend(view.get_hint_spans(app));
        spans.push(Span::styled("  ", theme.text_muted_style()));
        spans.extend(self.nav_bar_view.get_hint_spans(app));
        spans
    }
}

#[cfg(test)]
mod tests {
    use flowtty_util::UserPreferences;

    use super::*;

    fn test_app() -> App {
        App::new(UserPreferences::ephemeral())
    }

    fn control(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::CONTROL)
    }

    #[test]
    fn control_shortcuts_switch_views_from_anywhere() {
        let mut main_view = MainView::new();
        let mut app = test_app();

        let effects = main_view.handle_key_events(&mut app, control(KeyCode::Char('h')));
        assert_eq!(effects, vec![Effect::SwitchTo(Route::History)]);

        let effects = main_view.handle_key_events(&mut app, control(KeyCode::Char('t')));
        assert_eq!(effects, vec![Effect::SwitchTo(Route::Trigger)]);
    }

    #[test]
    fn control_c_requests_shutdown() {
        let mut main_view = MainView::new();
        let mut app = test_app();

        let effects = main_view.handle_key_events(&mut app, control(KeyCode::Char('c')));
        assert!(effects.is_empty());
        assert!(app.should_quit);
    }

    #[test]
    fn switching_routes_moves_the_nav_selection() {
        let mut main_view = MainView::new();
        let mut app = test_app();
        assert_eq!(app.route, Route::Trigger);

        main_view.set_current_route(&mut app, Route::History);
        assert_eq!(app.route, Route::History);
        assert_eq!(
            app.nav_bar.items[app.nav_bar.selected_index].route,
            Route::History
        );
    }
}
