//! # Command Execution Layer
//!
//! This module translates high-level application effects (`Effect`) into
//! imperative commands (`Cmd`) and executes them. It provides the "boundary"
//! where the pure state management of the app interacts with side effects
//! such as:
//! - Writing to the system clipboard
//! - Writing the exported output envelope to disk
//!
//! ## Design
//! - [`Cmd`] is the effectful command type (clipboard / file export).
//! - [`from_effects`] translates state-driven [`Effect`]s into [`Cmd`]s.
//! - [`run_cmds`] executes the commands and reports each outcome through the
//!   notice line, so failures stay user-visible.
//!
//! This design follows a **functional core, imperative shell** pattern:
//! state updates are pure, but commands handle side effects. Route switches
//! and run starts are consumed by the runtime before effects reach this
//! layer.

use std::env;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use flowtty_types::Effect;
use flowtty_util::expand_tilde;
use tokio::fs;

use crate::app::App;

/// File name of the exported output envelope.
pub const OUTPUT_FILE_NAME: &str = "flow_execution_output.json";

/// Environment variable overriding the export directory.
pub const OUTPUT_DIR_ENV: &str = "FLOWTTY_OUTPUT_DIR";

/// Represents side-effectful system commands executed outside of pure state
/// updates.
#[derive(Debug, Clone, PartialEq)]
pub enum Cmd {
    /// Write text into the system clipboard.
    ClipboardSet(String),
    /// Write the rendered output envelope to the export file.
    SaveOutput(String),
}

/// Translates effects into runnable commands.
pub fn from_effects(effects: &[Effect]) -> Vec<Cmd> {
    effects
        .iter()
        .filter_map(|effect| match effect {
            Effect::CopyToClipboardRequested(text) => Some(Cmd::ClipboardSet(text.clone())),
            Effect::SaveOutputRequested(text) => Some(Cmd::SaveOutput(text.clone())),
            Effect::SwitchTo(_) | Effect::StartRun(_) => None,
        })
        .collect()
}

/// Runs each command in order and reports the outcome through the notice
/// line.
pub async fn run_cmds(cmds: Vec<Cmd>, app: &mut App) {
    for cmd in cmds {
        match cmd {
            Cmd::ClipboardSet(text) => match set_clipboard(text) {
                Ok(()) => app.notices.success("Output copied to clipboard"),
                Err(error) => {
                    tracing::warn!(%error, "clipboard copy failed");
                    app.notices.error("Could not access the clipboard");
                }
            },
            Cmd::SaveOutput(text) => match save_output(&text).await {
                Ok(path) => {
                    tracing::info!(path = %path.display(), "output envelope exported");
                    app.notices.success("Output downloaded");
                }
                Err(error) => {
                    tracing::warn!(%error, "output export failed");
                    app.notices.error("Could not save the output file");
                }
            },
        }
    }
}

fn set_clipboard(text: String) -> Result<()> {
    let mut clipboard = arboard::Clipboard::new().context("open system clipboard")?;
    clipboard.set_text(text).context("write clipboard text")?;
    Ok(())
}

async fn save_output(text: &str) -> Result<PathBuf> {
    let path = resolve_output_path();
    write_output(&path, text).await?;
    Ok(path)
}

async fn write_output(path: &Path, text: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .await
                .with_context(|| format!("create export directory {}", parent.display()))?;
        }
    }
    fs::write(path, text)
        .await
        .with_context(|| format!("write export file {}", path.display()))?;
    Ok(())
}

/// Where the exported envelope lands: the env override when set, otherwise
/// the user's download directory, otherwise the working directory.
pub fn resolve_output_path() -> PathBuf {
    if let Ok(dir) = env::var(OUTPUT_DIR_ENV) {
        let trimmed = dir.trim();
        if !trimmed.is_empty() {
            return expand_tilde(trimmed).join(OUTPUT_FILE_NAME);
        }
    }
    dirs_next::download_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(OUTPUT_FILE_NAME)
}

#[cfg(test)]
mod tests {
    use super::*;
    use flowtty_types::Route;
    use flowtty_types::flow::FlowRunRequest;

    #[test]
    fn only_export_effects_become_commands() {
        let effects = vec![
            Effect::SwitchTo(Route::History),
            Effect::CopyToClipboardRequested("{}".into()),
            Effect::StartRun(FlowRunRequest {
                deployment: Default::default(),
                payload: "{}".into(),
            }),
            Effect::SaveOutputRequested("{}".into()),
        ];

        let cmds = from_effects(&effects);
        assert_eq!(
            cmds,
            vec![Cmd::ClipboardSet("{}".into()), Cmd::SaveOutput("{}".into())]
        );
    }

    #[test]
    fn output_dir_override_wins() {
        temp_env::with_var(OUTPUT_DIR_ENV, Some("/tmp/flowtty-exports"), || {
            let path = resolve_output_path();
            assert_eq!(path, Path::new("/tmp/flowtty-exports").join(OUTPUT_FILE_NAME));
        });
    }

    #[test]
    fn default_output_path_keeps_the_export_file_name() {
        temp_env::with_var(OUTPUT_DIR_ENV, None::<&str>, || {
            let path = resolve_output_path();
            assert_eq!(path.file_name().and_then(|name| name.to_str()), Some(OUTPUT_FILE_NAME));
        });
    }

    #[tokio::test]
    async fn write_output_creates_missing_directories() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("nested").join(OUTPUT_FILE_NAME);

        write_output(&path, "{\n  \"status\": \"success\"\n}")
            .await
            .expect("write export file");

        let written = std::fs::read_to_string(&path).expect("read back export");
        assert!(written.contains("\"success\""));
    }
}
