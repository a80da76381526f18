//! Persisted user preferences
//!
//! Preferences live in a small JSON document, by default `~/.screensnaprc`:
//!
//! ```json
//! {
//!   "version": "1.0.0",
//!   "output_dir": ".",
//!   "format": "png",
//!   "include_timestamp": true
//! }
//! ```
//!
//! They are read once at startup and written back only by an explicit
//! [`Preferences::save`]. A missing, unreadable or malformed file is never
//! fatal: [`Preferences::load`] falls back to defaults and logs a warning.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Deserializer, Serialize};

use crate::{
    error::{CaptureError, CaptureResult},
    model::ImageFormat,
};

/// File name of the preferences document inside the home directory
pub const PREFERENCES_FILE_NAME: &str = ".screensnaprc";

/// User preferences
///
/// Missing fields take their default value, so older or hand-edited files
/// keep working.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Preferences {
    /// Version of the tool that wrote the file
    pub version:           String,
    /// Directory screenshots are written to
    pub output_dir:        PathBuf,
    /// Image format
    #[serde(deserialize_with = "deserialize_format")]
    pub format:            ImageFormat,
    /// Timestamped auto names when true, numbered auto names when false
    pub include_timestamp: bool,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            version:           env!("CARGO_PKG_VERSION").to_string(),
            output_dir:        PathBuf::from("."),
            format:            ImageFormat::default(),
            include_timestamp: true,
        }
    }
}

impl Preferences {
    /// Returns `<home>/.screensnaprc`, or `None` when no home directory is known
    pub fn default_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(PREFERENCES_FILE_NAME))
    }

    /// Loads preferences from the default location
    pub fn load_default() -> Self {
        match Self::default_path() {
            Some(path) => Self::load(&path),
            None => {
                tracing::warn!("No home directory found, using default preferences");
                Self::default()
            }
        }
    }

    /// Loads preferences from `path`
    ///
    /// Never fails. A missing file yields defaults silently; an unreadable or
    /// malformed file yields defaults and a warning.
    pub fn load(path: &Path) -> Self {
        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::debug!("No preferences at {}, using defaults", path.display());
                return Self::default();
            }
            Err(e) => {
                tracing::warn!(
                    "Cannot read preferences at {}: {}. Using defaults",
                    path.display(),
                    e
                );
                return Self::default();
            }
        };

        match serde_json::from_str(&contents) {
            Ok(preferences) => {
                tracing::debug!("Loaded preferences from {}", path.display());
                preferences
            }
            Err(e) => {
                tracing::warn!(
                    "Ignoring malformed preferences at {}: {}. Using defaults",
                    path.display(),
                    e
                );
                Self::default()
            }
        }
    }

    /// Writes preferences to `path` as pretty-printed JSON
    ///
    /// Parent directories are created if needed.
    ///
    /// # Errors
    ///
    /// Returns [`CaptureError::PreferencesWrite`] if the file cannot be
    /// written.
    pub fn save(&self, path: &Path) -> CaptureResult<()> {
        let write_error = |reason: String| CaptureError::PreferencesWrite {
            path: path.to_path_buf(),
            reason,
        };

        let json = serde_json::to_string_pretty(self).map_err(|e| write_error(e.to_string()))?;

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| write_error(e.to_string()))?;
        }

        fs::write(path, json).map_err(|e| write_error(e.to_string()))?;

        tracing::info!("Saved preferences to {}", path.display());
        Ok(())
    }
}

/// Accepts any spelling `ImageFormat::normalize` accepts (`"PNG"`, `"Jpg"`)
fn deserialize_format<'de, D>(deserializer: D) -> Result<ImageFormat, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    ImageFormat::normalize(&raw).map_err(serde::de::Error::custom)
}
