use flowtty_types::Route;
use ratatui::layout::Rect;

/// A single item in the vertical navigation bar.
///
/// Each item consists of a display icon (a short bracketed symbol) and a
/// descriptive label used in hints and testing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavItem {
    /// Icon to display for the item (e.g., "[Run]"). Prefer non-emoji symbols
    /// for consistent terminal rendering.
    pub icon: String,
    /// Human-friendly description of the item (e.g., "Trigger").
    pub label: String,
    /// Route associated with this item
    pub route: Route,
}

impl NavItem {
    /// Creates a new navigation item.
    pub fn new(icon: impl Into<String>, label: impl Into<String>, route: Route) -> Self {
        Self {
            icon: icon.into(),
            label: label.into(),
            route,
        }
    }
}

/// State for the vertical navigation bar.
///
/// Owns the list of items, the selection index, and the cached hit-test
/// areas from the last render.
#[derive(Debug, Default, Clone)]
pub struct VerticalNavBarState {
    /// Items displayed in the navigation bar.
    pub items: Vec<NavItem>,
    /// Index of the currently selected item.
    pub selected_index: usize,
    /// Last computed per-item row areas for hit testing.
    pub per_item_areas: Vec<Rect>,
}

impl VerticalNavBarState {
    /// Creates a new vertical nav bar state with the provided items.
    pub fn new(items: Vec<NavItem>) -> Self {
        Self {
            items,
            selected_index: 0,
            per_item_areas: Vec::new(),
        }
    }

    /// Creates a nav bar pre-populated with the application views.
    pub fn defaults_for_views() -> Self {
        Self::new(vec![
            NavItem::new("[Run]", "Trigger", Route::Trigger),
            NavItem::new("[Hst]", "History", Route::History),
        ])
    }

    /// Syncs the selection with the given route, if an item matches it.
    pub fn set_route(&mut self, route: Route) -> Route {
        if let Some(idx) = self.items.iter().position(|item| item.route == route) {
            self.selected_index = idx;
        }
        route
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_items_cover_both_views() {
        let state = VerticalNavBarState::defaults_for_views();
        let routes: Vec<Route> = state.items.iter().map(|item| item.route).collect();
        assert_eq!(routes, vec![Route::Trigger, Route::History]);
        assert_eq!(state.selected_index, 0);
    }

    #[test]
    fn set_route_moves_the_selection() {
        let mut state = VerticalNavBarState::defaults_for_views();
        state.set_route(Route::History);
        assert_eq!(state.selected_index, 1);
        state.set_route(Route::Trigger);
        assert_eq!(state.selected_index, 0);
    }
}
