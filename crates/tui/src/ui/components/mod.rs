//! UI components: navigation, trigger view, history view, shared widgets.

pub mod common;
pub mod component;
pub mod history;
pub mod nav_bar;
pub mod trigger;

pub use component::*;
pub use history::HistoryComponent;
pub use nav_bar::VerticalNavBarComponent;
pub use trigger::TriggerComponent;
