//! History view: the seeded execution record table, release metadata cards,
//! pagination, and per-record feedback editing.

mod history_component;
mod seed;
mod state;

pub use history_component::HistoryComponent;
pub use state::{HistoryFocus, HistoryViewState, PAGE_SIZE};
