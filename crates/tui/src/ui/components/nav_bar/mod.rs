//! Vertical navigation bar component.
//!
//! This module provides the vertical navigation rail shown along the left
//! edge of the screen: one icon button per top-level view. Items activate on
//! mouse click or via the global view shortcuts; the active route's button is
//! rendered selected.

mod nav_bar_component;
mod state;

pub use nav_bar_component::VerticalNavBarComponent;
pub use state::{NavItem, VerticalNavBarState};
