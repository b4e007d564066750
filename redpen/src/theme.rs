//! Color theme system for redpen.
//!
//! A `Theme` holds named `ratatui::style::Color` fields for every surface the
//! review screen draws. Two built-in themes are provided:
//!
//! - `dark`: ANSI 16 colors only, safe on any terminal.
//! - `catppuccin_mocha`: Catppuccin Mocha palette in RGB; requires truecolor.

use ratatui::style::Color;
use redpen_core::Level;

/// All color values used across redpen's UI surfaces.
#[derive(Debug, Clone)]
pub struct Theme {
    // Panel borders
    /// Border color for the currently focused panel.
    pub border_active: Color,
    /// Border color for unfocused panels.
    pub border_inactive: Color,

    // Suggestion levels
    /// Grammar and spelling highlights.
    pub level_grammar: Color,
    /// Cohesion and structure highlights.
    pub level_structure: Color,
    /// Content and clarity highlights.
    pub level_content: Color,
    /// Accepted suggestions.
    pub accepted: Color,

    // Inline diff
    pub diff_added: Color,
    pub diff_removed: Color,

    /// Plain document text.
    pub text: Color,
    /// Secondary text: hints, placeholders, reasons.
    pub muted: Color,
    /// Error messages in the status bar.
    pub error: Color,

    // Status bar
    pub status_bar_bg: Color,
    pub status_bar_fg: Color,
    /// Mode indicator color when in NORMAL mode.
    pub status_mode_normal: Color,
    /// Mode indicator color when in INSERT mode.
    pub status_mode_insert: Color,

    /// Fill behind the help overlay once `Clear` has erased it.
    pub background: Color,
}

impl Theme {
    /// Returns the built-in dark theme using ANSI 16 colors.
    pub fn dark() -> Self {
        Self {
            border_active: Color::Cyan,
            border_inactive: Color::DarkGray,

            level_grammar: Color::Blue,
            level_structure: Color::Yellow,
            level_content: Color::Red,
            accepted: Color::Green,

            diff_added: Color::Green,
            diff_removed: Color::Red,

            text: Color::Reset,
            muted: Color::DarkGray,
            error: Color::LightRed,

            status_bar_bg: Color::DarkGray,
            status_bar_fg: Color::White,
            status_mode_normal: Color::Cyan,
            status_mode_insert: Color::Green,

            background: Color::Reset,
        }
    }

    /// Returns the Catppuccin Mocha theme using RGB truecolor values.
    ///
    /// Palette source: <https://github.com/catppuccin/catppuccin> Mocha variant.
    pub fn catppuccin_mocha() -> Self {
        let green = Color::Rgb(166, 227, 161); // #a6e3a1
        let red = Color::Rgb(243, 139, 168); // #f38ba8
        let yellow = Color::Rgb(249, 226, 175); // #f9e2af
        let blue = Color::Rgb(137, 180, 250); // #89b4fa
        let maroon = Color::Rgb(235, 160, 172); // #eba0ac
        let lavender = Color::Rgb(180, 190, 254); // #b4befe
        let overlay1 = Color::Rgb(127, 132, 156); // #7f849c
        let surface1 = Color::Rgb(69, 71, 90); // #45475a
        let base = Color::Rgb(30, 30, 46); // #1e1e2e
        let text = Color::Rgb(205, 214, 244); // #cdd6f4
        let peach = Color::Rgb(250, 179, 135); // #fab387

        Self {
            border_active: lavender,
            border_inactive: overlay1,

            level_grammar: blue,
            level_structure: yellow,
            level_content: peach,
            accepted: green,

            diff_added: green,
            diff_removed: red,

            text,
            muted: overlay1,
            error: maroon,

            status_bar_bg: surface1,
            status_bar_fg: text,
            status_mode_normal: lavender,
            status_mode_insert: green,

            background: base,
        }
    }

    /// Highlight color for a suggestion level.
    pub fn level(&self, level: Level) -> Color {
        match level {
            Level::Grammar => self.level_grammar,
            Level::Structure => self.level_structure,
            Level::Content => self.level_content,
        }
    }

    /// Resolves a theme name string to the corresponding built-in theme.
    ///
    /// Unknown names fall back to `dark()` so a typo in config never prevents
    /// startup. The fallback is logged.
    pub fn from_name(name: &str) -> Self {
        match name {
            "catppuccin-mocha" | "catppuccin_mocha" => Self::catppuccin_mocha(),
            "dark" => Self::dark(),
            other => {
                tracing::warn!(theme = other, "unknown theme, falling back to 'dark'");
                Self::dark()
            }
        }
    }
}
