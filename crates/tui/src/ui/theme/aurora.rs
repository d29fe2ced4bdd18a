//! Provides the Aurora theme implementations that map the default flowtty
//! palette to the application's theme roles for both default and
//! high-contrast variants.

use ratatui::style::Color;

use super::{
    roles::{Theme, ThemeRoles},
    theme_helpers::{darken_rgb, lighten_rgb},
};

// Deep indigo surfaces
pub const B0: Color = Color::Rgb(0x10, 0x14, 0x25); // #101425
pub const B1: Color = Color::Rgb(0x16, 0x1B, 0x2E); // #161B2E
pub const B2: Color = Color::Rgb(0x1E, 0x24, 0x38); // #1E2438
pub const B3: Color = Color::Rgb(0x2A, 0x31, 0x47); // #2A3147

// Foregrounds
pub const T0: Color = Color::Rgb(0xE2, 0xE8, 0xF0); // #E2E8F0
pub const T1: Color = Color::Rgb(0xCB, 0xD5, 0xE1); // #CBD5E1
pub const T2: Color = Color::Rgb(0xF1, 0xF5, 0xF9); // #F1F5F9

// Accents
pub const INDIGO: Color = Color::Rgb(0x81, 0x8C, 0xF8); // #818CF8
pub const SKY: Color = Color::Rgb(0x7D, 0xD3, 0xFC); // #7DD3FC
pub const VIOLET: Color = Color::Rgb(0xC0, 0x84, 0xFC); // #C084FC
pub const STEEL: Color = Color::Rgb(0x63, 0x6E, 0x94); // #636E94

// Status
pub const STATUS_INFO: Color = Color::Rgb(0x60, 0xA5, 0xFA); // #60A5FA
pub const STATUS_OK: Color = Color::Rgb(0x4A, 0xDE, 0x80); // #4ADE80
pub const STATUS_WARN: Color = Color::Rgb(0xFB, 0xBF, 0x24); // #FBBF24
pub const STATUS_ERROR: Color = Color::Rgb(0xF8, 0x71, 0x71); // #F87171

// Syntax
pub const SYN_STRING: Color = Color::Rgb(0x86, 0xEF, 0xAC); // #86EFAC
pub const SYN_NUMBER: Color = Color::Rgb(0xFD, 0xBA, 0x74); // #FDBA74

// Role aliases
pub const BG_MAIN: Color = B0; // App/root background
pub const BG_PANEL: Color = B1; // Panels/cards/inputs
pub const BG_PANEL_MUTED: Color = B2; // Muted or inactive surfaces
pub const UI_BORDER: Color = B3; // Borders
pub const UI_DIVIDER: Color = Color::Rgb(0x37, 0x40, 0x5C); // #37405C separators
pub const TEXT_MUTED: Color = Color::Rgb(0x8B, 0x94, 0xA8); // #8B94A8 muted/disabled text
pub const SELECTION_BG: Color = Color::Rgb(0x31, 0x39, 0x5A); // #31395A selected row background

fn build_aurora_roles() -> ThemeRoles {
    ThemeRoles {
        background: BG_MAIN,
        surface: BG_PANEL,
        surface_muted: BG_PANEL_MUTED,
        border: UI_BORDER,
        divider: UI_DIVIDER,

        text: T0,
        text_secondary: T1,
        text_muted: TEXT_MUTED,

        accent_primary: INDIGO,
        accent_secondary: SKY,
        accent_subtle: STEEL,

        info: STATUS_INFO,
        success: STATUS_OK,
        warning: STATUS_WARN,
        error: STATUS_ERROR,

        selection_bg: SELECTION_BG,
        selection_fg: T2,
        focus: INDIGO,

        syntax_keyword: VIOLET,
        syntax_string: SYN_STRING,
        syntax_number: SYN_NUMBER,
        syntax_type: SKY,

        table_row_even: darken_rgb(BG_PANEL, 0.70),
        table_row_odd: darken_rgb(BG_PANEL_MUTED, 0.70),
    }
}

fn build_aurora_high_contrast_roles() -> ThemeRoles {
    let mut roles = build_aurora_roles();
    roles.surface_muted = lighten_rgb(roles.surface_muted, 0.12);
    roles.border = lighten_rgb(roles.border, 0.30);
    roles.divider = lighten_rgb(roles.divider, 0.20);

    roles.text = T2;
    roles.text_secondary = T2;
    roles.text_muted = T1;

    roles.selection_bg = lighten_rgb(roles.selection_bg, 0.10);
    roles.focus = SKY;
    roles.table_row_even = darken_rgb(BG_PANEL, 0.55);
    roles.table_row_odd = darken_rgb(BG_PANEL_MUTED, 0.55);
    roles
}

/// Default Aurora theme tuned for dark terminals.
#[derive(Debug, Clone)]
pub struct AuroraTheme {
    roles: ThemeRoles,
}

impl AuroraTheme {
    /// Construct an Aurora theme instance using the canonical palette.
    pub fn new() -> Self {
        Self {
            roles: build_aurora_roles(),
        }
    }
}

impl Theme for AuroraTheme {
    fn roles(&self) -> &ThemeRoles {
        &self.roles
    }
}

/// High-contrast variant derived from the Aurora palette.
#[derive(Debug, Clone)]
pub struct AuroraThemeHighContrast {
    roles: ThemeRoles,
}

impl AuroraThemeHighContrast {
    /// Construct the high-contrast variant by brightening text and borders.
    pub fn new() -> Self {
        Self {
            roles: build_aurora_high_contrast_roles(),
        }
    }
}

impl Theme for AuroraThemeHighContrast {
    fn roles(&self) -> &ThemeRoles {
        &self.roles
    }
}
