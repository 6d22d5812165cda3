//! Persisted user preferences.
//!
//! A small JSON object on disk acting as key-value storage. Only the theme
//! flag lives here today (`{"isDarkMode": true}`); unknown keys are kept
//! intact on every write.

use std::io;
use std::path::{Path, PathBuf};

use bizcard_core::ThemePreference;
use serde_json::{Map, Value};
use thiserror::Error;

/// Errors from reading or writing the preference file.
#[derive(Debug, Error)]
pub enum PreferenceError {
    /// No preference location could be determined.
    #[error("no configuration directory available for preferences")]
    NoConfigDir,

    /// Reading or writing the file failed.
    #[error("preference file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Serializing the preferences failed.
    #[error("failed to encode preferences: {0}")]
    Encode(#[from] serde_json::Error),
}

/// JSON-file backed preference storage.
#[derive(Debug, Clone)]
pub struct PreferenceStore {
    path: PathBuf,
}

impl PreferenceStore {
    /// Store backed by the file at `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at the explicit path if given, else the platform default
    /// (`<config dir>/bizcard/preferences.json`).
    ///
    /// # Errors
    ///
    /// Returns `PreferenceError::NoConfigDir` if no path is given and the
    /// platform has no configuration directory.
    pub fn at_default_location(explicit: Option<&Path>) -> Result<Self, PreferenceError> {
        if let Some(path) = explicit {
            return Ok(Self::new(path));
        }
        let dir = dirs::config_dir().ok_or(PreferenceError::NoConfigDir)?;
        Ok(Self::new(dir.join("bizcard").join("preferences.json")))
    }

    /// Location of the preference file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the theme flag.
    ///
    /// Missing file, missing key, a non-boolean value or an unreadable file
    /// all yield the default (dark) variant; problems are logged, never
    /// returned.
    #[must_use]
    pub fn load_theme(&self) -> ThemePreference {
        match self.read_map() {
            Ok(map) => match map.get(ThemePreference::STORAGE_KEY) {
                Some(Value::Bool(dark)) => ThemePreference::from_dark_mode(*dark),
                Some(other) => {
                    tracing::warn!(value = %other, "Ignoring non-boolean theme preference");
                    ThemePreference::default()
                }
                None => ThemePreference::default(),
            },
            Err(e) => {
                tracing::warn!(error = %e, "Could not read preferences, using defaults");
                ThemePreference::default()
            }
        }
    }

    /// Persist the theme flag.
    ///
    /// # Errors
    ///
    /// Returns error if the file cannot be written.
    pub fn save_theme(&self, theme: ThemePreference) -> Result<(), PreferenceError> {
        let mut map = self.read_map().unwrap_or_default();
        map.insert(
            ThemePreference::STORAGE_KEY.to_string(),
            Value::Bool(theme.is_dark()),
        );
        self.write_map(&map)?;
        tracing::debug!(theme = theme.label(), path = %self.path.display(), "Saved theme");
        Ok(())
    }

    /// Flip the persisted theme and return the new value.
    ///
    /// # Errors
    ///
    /// Returns error if the file cannot be written.
    pub fn toggle_theme(&self) -> Result<ThemePreference, PreferenceError> {
        let theme = self.load_theme().toggled();
        self.save_theme(theme)?;
        Ok(theme)
    }

    /// Read the stored object. A missing file is an empty object.
    fn read_map(&self) -> Result<Map<String, Value>, PreferenceError> {
        let contents = match std::fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Map::new()),
            Err(source) => {
                return Err(PreferenceError::Io {
                    path: self.path.clone(),
                    source,
                });
            }
        };

        match serde_json::from_str::<Value>(&contents) {
            Ok(Value::Object(map)) => Ok(map),
            Ok(_) | Err(_) => {
                tracing::warn!(path = %self.path.display(), "Malformed preference file, starting fresh");
                Ok(Map::new())
            }
        }
    }

    /// Write through a sibling temporary file so readers never see a
    /// half-written object.
    fn write_map(&self, map: &Map<String, Value>) -> Result<(), PreferenceError> {
        let io_err = |source| PreferenceError::Io {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(io_err)?;
        }

        let contents = serde_json::to_string_pretty(map)?;
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, contents).map_err(io_err)?;
        std::fs::rename(&tmp, &self.path).map_err(io_err)?;
        Ok(())
    }
}
