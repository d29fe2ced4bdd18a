use super::{Ansi256Theme, Ansi256ThemeHighContrast, AuroraTheme, AuroraThemeHighContrast, Theme};

/// Describes a selectable theme.
#[derive(Clone, Copy, Debug)]
pub struct ThemeDefinition {
    /// Canonical identifier used for persistence and env overrides.
    pub id: &'static str,
    /// Human-friendly display name.
    pub label: &'static str,
    /// Theme aliases (e.g., env overrides) that map back to this definition.
    pub aliases: &'static [&'static str],
    /// Indicates whether the definition represents a high-contrast variant.
    pub is_high_contrast: bool,
    /// Whether the palette targets ANSI/8-bit terminals.
    pub is_ansi_fallback: bool,
    factory: fn() -> Box<dyn Theme>,
}

impl ThemeDefinition {
    /// Instantiate the theme represented by this definition.
    pub fn build(&self) -> Box<dyn Theme> {
        (self.factory)()
    }
}

/// Ordered list of selectable themes surfaced to the loaders.
pub const THEME_DEFINITIONS: &[ThemeDefinition] = &[
    ThemeDefinition {
        id: "aurora",
        label: "Aurora",
        aliases: &["aurora", "default"],
        is_high_contrast: false,
        is_ansi_fallback: false,
        factory: || Box::new(AuroraTheme::new()),
    },
    ThemeDefinition {
        id: "aurora_hc",
        label: "Aurora High Contrast",
        aliases: &["aurora_hc", "aurora-high-contrast", "aurora-hc", "aurorahc"],
        is_high_contrast: true,
        is_ansi_fallback: false,
        factory: || Box::new(AuroraThemeHighContrast::new()),
    },
    ThemeDefinition {
        id: "ansi256",
        label: "ANSI 256",
        aliases: &["ansi256", "ansi"],
        is_high_contrast: false,
        is_ansi_fallback: true,
        factory: || Box::new(Ansi256Theme::new()),
    },
    ThemeDefinition {
        id: "ansi256_hc",
        label: "ANSI 256 High Contrast",
        aliases: &["ansi256_hc", "ansi256-high-contrast", "ansi256-hc", "ansi256hc", "ansi-hc"],
        is_high_contrast: true,
        is_ansi_fallback: true,
        factory: || Box::new(Ansi256ThemeHighContrast::new()),
    },
];

/// Locate a definition by alias (case-insensitive).
pub fn resolve(name: &str) -> Option<&'static ThemeDefinition> {
    let normalized = name.to_ascii_lowercase();
    THEME_DEFINITIONS.iter().find(|definition| {
        definition.aliases.iter().any(|alias| alias.eq_ignore_ascii_case(&normalized)) || definition.id.eq_ignore_ascii_case(&normalized)
    })
}

/// Preferred default for truecolor terminals.
pub fn default_truecolor() -> &'static ThemeDefinition {
    &THEME_DEFINITIONS[0]
}

/// Preferred default for ANSI-only terminals.
pub fn default_ansi() -> &'static ThemeDefinition {
    THEME_DEFINITIONS
        .iter()
        .find(|definition| definition.is_ansi_fallback && !definition.is_high_contrast)
        .unwrap_or(&THEME_DEFINITIONS[0])
}
