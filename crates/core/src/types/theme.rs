//! Light/dark theme preference.

use serde::{Deserialize, Serialize};

/// Process-wide theme flag.
///
/// Read once at startup from persistent key-value storage under
/// [`ThemePreference::STORAGE_KEY`] and written on every toggle. With nothing
/// persisted the dark variant is used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ThemePreference {
    dark: bool,
}

impl ThemePreference {
    /// Storage key for the persisted flag.
    pub const STORAGE_KEY: &'static str = "isDarkMode";

    /// The dark variant.
    pub const DARK: Self = Self { dark: true };

    /// The light variant.
    pub const LIGHT: Self = Self { dark: false };

    /// Create a preference from the persisted boolean.
    #[must_use]
    pub const fn from_dark_mode(dark: bool) -> Self {
        Self { dark }
    }

    /// Returns `true` for the dark variant.
    #[must_use]
    pub const fn is_dark(&self) -> bool {
        self.dark
    }

    /// Returns the opposite variant.
    #[must_use]
    pub const fn toggled(self) -> Self {
        Self { dark: !self.dark }
    }

    /// Human-readable name of the variant.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        if self.dark { "dark" } else { "light" }
    }
}

impl Default for ThemePreference {
    fn default() -> Self {
        Self::DARK
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_dark() {
        assert!(ThemePreference::default().is_dark());
    }

    #[test]
    fn test_toggle_twice_restores() {
        let pref = ThemePreference::LIGHT;
        assert!(pref.toggled().is_dark());
        assert_eq!(pref.toggled().toggled(), pref);
    }

    #[test]
    fn test_serializes_as_json_boolean() {
        assert_eq!(serde_json::to_string(&ThemePreference::DARK).unwrap(), "true");
        let pref: ThemePreference = serde_json::from_str("false").unwrap();
        assert_eq!(pref, ThemePreference::LIGHT);
    }
}
