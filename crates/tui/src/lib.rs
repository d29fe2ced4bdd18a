//! # Flowtty TUI Library
//!
//! Terminal user interface for triggering and inspecting simulated flow
//! executions, built on Ratatui.
//!
//! ## Key Features
//!
//! - Trigger view with deployment selector, payload editor, and live stage log
//! - Output envelope preview with expand, copy, and save-to-file actions
//! - Execution history with pagination, row details, and feedback capture
//! - Theme system with truecolor palettes and an ANSI 256-color fallback
//!
//! ## Architecture
//!
//! State updates are pure: [`app::App::update`] consumes messages and returns
//! `Effect`s, components translate key and mouse input into effects, and the
//! runtime executes effects at the loop boundary (clipboard, file writes,
//! spawning run drivers). Each view is a component that handles events and
//! renders itself.

mod app;
mod cmd;
mod ui;

pub use app::App;

use anyhow::Result;
use flowtty_util::UserPreferences;

/// Runs the main TUI event loop until the user exits.
///
/// Sets up the terminal, constructs the application state from the provided
/// preferences, and drives input, ticks, and run events through the unified
/// event loop.
///
/// # Errors
///
/// Returns an error when terminal setup or teardown fails, or when the event
/// loop encounters an unrecoverable rendering error.
pub async fn run(preferences: UserPreferences) -> Result<()> {
    ui::runtime::run_app(preferences).await
}
