//! Theme styling module for the TUI UI layer.
//!
//! This module defines the Aurora truecolor palette, an ANSI 256-color
//! fallback, semantic theme roles, and helper builders for Ratatui widgets
//! and styles. Prefer these helpers over hard-coding colors to keep the UI
//! consistent.

use std::env;

use tracing::debug;

pub mod ansi256;
pub mod aurora;
pub mod catalog;
pub mod roles;
pub mod theme_helpers;

pub use ansi256::{Ansi256Theme, Ansi256ThemeHighContrast};
pub use aurora::{AuroraTheme, AuroraThemeHighContrast};
pub use catalog::ThemeDefinition;
pub use roles::Theme;

/// Environment variable overriding the theme by id or alias.
pub const THEME_ENV: &str = "FLOWTTY_THEME";

/// Environment variable forcing the color capability detection.
pub const COLOR_MODE_ENV: &str = "FLOWTTY_COLOR_MODE";

/// Theme plus metadata describing how it was selected.
pub struct LoadedTheme {
    pub definition: &'static ThemeDefinition,
    pub theme: Box<dyn Theme>,
}

impl LoadedTheme {
    fn from_definition(definition: &'static ThemeDefinition) -> Self {
        Self {
            definition,
            theme: definition.build(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ColorCapability {
    Truecolor,
    Ansi256,
}

/// Selects a theme based on environment variables, persisted preferences,
/// and terminal capabilities. ANSI-only terminals always get the indexed
/// fallback palette so truecolor values never degrade unpredictably.
pub fn load(preferred_theme: Option<&str>) -> LoadedTheme {
    let capability = detect_color_capability();
    if matches!(capability, ColorCapability::Ansi256) {
        debug!("ANSI-only terminal detected; forcing the indexed fallback palette.");
        let wants_high_contrast = env::var(THEME_ENV)
            .ok()
            .as_deref()
            .or(preferred_theme)
            .and_then(|name| catalog::resolve(name.trim()))
            .map(|definition| definition.is_high_contrast)
            .unwrap_or(false);
        let definition = if wants_high_contrast {
            catalog::resolve("ansi256_hc").unwrap_or_else(catalog::default_ansi)
        } else {
            catalog::default_ansi()
        };
        return LoadedTheme::from_definition(definition);
    }

    if let Ok(theme_name) = env::var(THEME_ENV)
        && let Some(definition) = catalog::resolve(theme_name.trim())
    {
        debug!(theme = definition.label, "theme selected from environment");
        return LoadedTheme::from_definition(definition);
    }

    if let Some(name) = preferred_theme
        && let Some(definition) = catalog::resolve(name.trim())
    {
        debug!(theme = definition.label, "theme selected from preferences");
        return LoadedTheme::from_definition(definition);
    }

    LoadedTheme::from_definition(catalog::default_truecolor())
}

fn detect_color_capability() -> ColorCapability {
    if let Some(mode) = env::var(COLOR_MODE_ENV).ok().and_then(|value| parse_color_mode(value.trim())) {
        return mode;
    }

    let color_term = env::var("COLORTERM").unwrap_or_default().to_ascii_lowercase();
    if color_term.contains("truecolor") || color_term.contains("24bit") {
        return ColorCapability::Truecolor;
    }

    let term = env::var("TERM").unwrap_or_default().to_ascii_lowercase();
    if term.contains("truecolor") {
        return ColorCapability::Truecolor;
    }

    ColorCapability::Ansi256
}

fn parse_color_mode(value: &str) -> Option<ColorCapability> {
    match value.to_ascii_lowercase().as_str() {
        "truecolor" | "24bit" => Some(ColorCapability::Truecolor),
        "ansi256" | "256" | "8bit" => Some(ColorCapability::Ansi256),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_color_mode<R>(mode: Option<&str>, run: impl FnOnce() -> R) -> R {
        temp_env::with_vars(
            [
                (COLOR_MODE_ENV, mode),
                (THEME_ENV, None),
                ("COLORTERM", None),
                ("TERM", None),
            ],
            run,
        )
    }

    #[test]
    fn ansi_terminals_force_the_fallback_palette() {
        with_color_mode(Some("ansi256"), || {
            let loaded = load(Some("aurora"));
            assert!(loaded.definition.is_ansi_fallback);
        });
    }

    #[test]
    fn truecolor_terminals_honor_the_preferred_theme() {
        with_color_mode(Some("truecolor"), || {
            let loaded = load(Some("aurora_hc"));
            assert_eq!(loaded.definition.id, "aurora_hc");
        });
    }

    #[test]
    fn env_override_beats_the_preference() {
        temp_env::with_vars(
            [(COLOR_MODE_ENV, Some("truecolor")), (THEME_ENV, Some("ansi256_hc"))],
            || {
                let loaded = load(Some("aurora"));
                assert_eq!(loaded.definition.id, "ansi256_hc");
            },
        );
    }

    #[test]
    fn high_contrast_preference_survives_the_ansi_downgrade() {
        with_color_mode(Some("ansi256"), || {
            let loaded = load(Some("aurora_hc"));
            assert_eq!(loaded.definition.id, "ansi256_hc");
        });
    }

    #[test]
    fn unknown_preference_falls_back_to_the_default() {
        with_color_mode(Some("truecolor"), || {
            let loaded = load(Some("solarized"));
            assert_eq!(loaded.definition.id, catalog::default_truecolor().id);
        });
    }
}
