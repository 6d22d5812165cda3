//! Static assets for the card.

use std::path::Path;

/// Text shown in place of the logo when none is available.
pub const FALLBACK_LOGO_TEXT: &str = "UNITY";

/// Brand mark printed on the back face.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Logo {
    /// Text art read from disk.
    Art(String),
    /// Plain brand name.
    #[default]
    Fallback,
}

impl Logo {
    /// Lines to print.
    #[must_use]
    pub fn lines(&self) -> Vec<&str> {
        match self {
            Self::Art(art) => art.lines().collect(),
            Self::Fallback => vec![FALLBACK_LOGO_TEXT],
        }
    }
}

/// Load the logo art at `path`.
///
/// Never fails: with no path, an unreadable file or an empty one the
/// fallback text is used and the problem logged.
#[must_use]
pub fn load_logo(path: Option<&Path>) -> Logo {
    let Some(path) = path else {
        return Logo::Fallback;
    };

    match std::fs::read_to_string(path) {
        Ok(art) if !art.trim().is_empty() => Logo::Art(art.trim_end().to_string()),
        Ok(_) => {
            tracing::warn!(path = %path.display(), "Logo file is empty, using fallback");
            Logo::Fallback
        }
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "Failed to load logo, using fallback");
            Logo::Fallback
        }
    }
}
