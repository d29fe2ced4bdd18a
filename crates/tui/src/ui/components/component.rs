//! Component system for the flowtty TUI.
//!
//! This module defines the Component trait and related abstractions that
//! enable modular UI development. Components are self-contained UI elements
//! that handle their own events and rendering while integrating with the
//! main application through a consistent interface.

use anyhow::Result;
use crossterm::event::{KeyEvent, MouseEvent};
use ratatui::Frame;
use ratatui::layout::{Position, Rect};
use ratatui::text::Span;

use flowtty_types::{Effect, Msg};

use crate::app::App;

/// A trait representing a UI component with its own state and behavior.
///
/// Components handle localized events and render themselves into a provided
/// `Rect`, reporting side effects back to the application via `Effect`s.
/// State lives on [`App`]; components own only presentation concerns such as
/// cached hit-test areas.
///
/// # Design Principles
///
/// - **Separation of concerns**: components own only local UI behavior
/// - **Event-driven**: components respond to messages and user input
/// - **Side-effect reporting**: components report effects rather than
///   directly performing I/O
pub(crate) trait Component {
    /// Initialize any internal state. Called once before the first render.
    fn init(&mut self, _app: &mut App) -> Result<()> {
        Ok(())
    }

    /// React to an application-level message this component cares about.
    fn handle_message(&mut self, _app: &mut App, _msg: &Msg) -> Vec<Effect> {
        Vec::new()
    }

    /// Handle key events while this component is visible.
    fn handle_key_events(&mut self, _app: &mut App, _key: KeyEvent) -> Vec<Effect> {
        Vec::new()
    }

    /// Handle mouse events while this component is visible.
    fn handle_mouse_events(&mut self, _app: &mut App, _mouse: MouseEvent) -> Vec<Effect> {
        Vec::new()
    }

    /// Render the component into the given area.
    ///
    /// Implementations should be side-effect free except for frame drawing
    /// and cursor placement; state changes belong in the event handlers.
    fn render(&mut self, frame: &mut Frame, rect: Rect, app: &mut App);

    /// Key hints shown in the bottom bar while this component is visible.
    fn get_hint_spans(&self, _app: &App) -> Vec<Span<'static>> {
        Vec::new()
    }

    /// Called when the route owning this component becomes active.
    fn on_route_enter(&mut self, _app: &mut App) {}

    /// Called when the route owning this component stops being active.
    fn on_route_exit(&mut self, _app: &mut App) {}
}

/// Finds the index of the first cached area containing the mouse position.
///
/// Components record the regions they rendered interactive elements into and
/// use this to translate click coordinates back into actions. Areas that
/// were not rendered this frame should be cleared to `Rect::ZERO`, which can
/// never contain a position.
pub(crate) fn find_target_index_by_mouse_position(areas: &[Rect], column: u16, row: u16) -> Option<usize> {
    let position = Position { x: column, y: row };
    areas.iter().position(|area| area.contains(position))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_the_area_under_the_cursor() {
        let areas = [
            Rect::new(0, 0, 10, 1),
            Rect::new(12, 0, 10, 1),
            Rect::new(0, 2, 22, 3),
        ];

        assert_eq!(find_target_index_by_mouse_position(&areas, 3, 0), Some(0));
        assert_eq!(find_target_index_by_mouse_position(&areas, 12, 0), Some(1));
        assert_eq!(find_target_index_by_mouse_position(&areas, 21, 4), Some(2));
    }

    #[test]
    fn misses_return_none() {
        let areas = [Rect::new(0, 0, 10, 1)];
        assert_eq!(find_target_index_by_mouse_position(&areas, 10, 0), None);
        assert_eq!(find_target_index_by_mouse_position(&areas, 0, 1), None);
    }

    #[test]
    fn zero_sized_areas_never_match() {
        let areas = [Rect::ZERO, Rect::new(5, 5, 1, 1)];
        assert_eq!(find_target_index_by_mouse_position(&areas, 0, 0), None);
        assert_eq!(find_target_index_by_mouse_position(&areas, 5, 5), Some(1));
    }
}
