//! ANSI 256-color fallback theme tailored for terminals without truecolor support.
//!
//! This palette approximates the Aurora theme using indexed colors so the UI
//! remains legible inside macOS Terminal and other 8-bit color terminals.

use ratatui::style::Color;

use super::roles::{Theme, ThemeRoles};

/// ANSI 256-color approximation of the Aurora palette.
#[derive(Debug, Clone)]
pub struct Ansi256Theme {
    roles: ThemeRoles,
}

impl Ansi256Theme {
    pub fn new() -> Self {
        Self {
            roles: ThemeRoles {
                background: Color::Indexed(234),
                surface: Color::Indexed(235),
                surface_muted: Color::Indexed(237),
                border: Color::Indexed(238),
                divider: Color::Indexed(238),

                text: Color::Indexed(254),
                text_secondary: Color::Indexed(251),
                text_muted: Color::Indexed(245),

                accent_primary: Color::Indexed(105),
                accent_secondary: Color::Indexed(117),
                accent_subtle: Color::Indexed(61),

                info: Color::Indexed(111),
                success: Color::Indexed(114),
                warning: Color::Indexed(221),
                error: Color::Indexed(210),

                selection_bg: Color::Indexed(60),
                selection_fg: Color::Indexed(255),
                focus: Color::Indexed(105),

                syntax_keyword: Color::Indexed(141),
                syntax_string: Color::Indexed(151),
                syntax_number: Color::Indexed(215),
                syntax_type: Color::Indexed(117),

                table_row_even: Color::Indexed(233),
                table_row_odd: Color::Indexed(236),
            },
        }
    }
}

impl Theme for Ansi256Theme {
    fn roles(&self) -> &ThemeRoles {
        &self.roles
    }
}

/// High-contrast variant for ANSI terminals.
#[derive(Debug, Clone)]
pub struct Ansi256ThemeHighContrast {
    roles: ThemeRoles,
}

impl Ansi256ThemeHighContrast {
    pub fn new() -> Self {
        Self {
            roles: ThemeRoles {
                background: Color::Indexed(234),
                surface: Color::Indexed(235),
                surface_muted: Color::Indexed(237),
                border: Color::Indexed(105),
                divider: Color::Indexed(238),

                text: Color::Indexed(255),
                text_secondary: Color::Indexed(117),
                text_muted: Color::Indexed(61),

                accent_primary: Color::Indexed(105),
                accent_secondary: Color::Indexed(117),
                accent_subtle: Color::Indexed(61),

                info: Color::Indexed(111),
                success: Color::Indexed(114),
                warning: Color::Indexed(221),
                error: Color::Indexed(210),

                selection_bg: Color::Indexed(60),
                selection_fg: Color::Indexed(255),
                focus: Color::Indexed(117),

                syntax_keyword: Color::Indexed(141),
                syntax_string: Color::Indexed(151),
                syntax_number: Color::Indexed(215),
                syntax_type: Color::Indexed(123),

                table_row_even: Color::Indexed(233),
                table_row_odd: Color::Indexed(236),
            },
        }
    }
}

impl Theme for Ansi256ThemeHighContrast {
    fn roles(&self) -> &ThemeRoles {
        &self.roles
    }
}
