//! Trigger view: deployment selector, payload editor, live stage log, and
//! the result envelope with its export actions.
//!
//! State transitions live in `state`; `trigger_component` owns rendering and
//! input translation. The run itself is driven by the engine; this view only
//! reflects the events the runtime feeds back through the update loop.

mod state;
mod trigger_component;

pub use state::{PAYLOAD_PLACEHOLDER, PREVIEW_LINE_COUNT, TriggerFocus, TriggerViewState, ViewEvent, ViewMode};
pub use trigger_component::TriggerComponent;
