//! Terminal styling per theme.

use bizcard_core::ThemePreference;

/// ANSI escape sequences used by the card templates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    /// Names and headings
    pub strong: &'static str,
    /// Labels and secondary text
    pub muted: &'static str,
    /// Links and active tab
    pub accent: &'static str,
    /// Frame lines
    pub border: &'static str,
    pub reset: &'static str,
}

impl Palette {
    /// No styling at all.
    pub const PLAIN: Self = Self {
        strong: "",
        muted: "",
        accent: "",
        border: "",
        reset: "",
    };

    /// Bright text for dark terminals.
    pub const DARK: Self = Self {
        strong: "\x1b[1;97m",
        muted: "\x1b[37m",
        accent: "\x1b[96m",
        border: "\x1b[90m",
        reset: "\x1b[0m",
    };

    /// Dark text for light terminals.
    pub const LIGHT: Self = Self {
        strong: "\x1b[1;30m",
        muted: "\x1b[90m",
        accent: "\x1b[34m",
        border: "\x1b[37m",
        reset: "\x1b[0m",
    };

    /// Palette for `theme`, or [`Palette::PLAIN`] when color is off.
    #[must_use]
    pub const fn for_theme(theme: ThemePreference, color: bool) -> Self {
        match (color, theme.is_dark()) {
            (false, _) => Self::PLAIN,
            (true, true) => Self::DARK,
            (true, false) => Self::LIGHT,
        }
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::PLAIN
    }
}
