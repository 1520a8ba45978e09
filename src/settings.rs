use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::app_dirs::AppDirs;
use crate::error::{Error, Result};

pub const DEFAULT_WPM: u32 = 130;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Settings {
    pub wpm: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self { wpm: DEFAULT_WPM }
    }
}

/// Whatever subset of [`Settings`] was persisted. Unknown keys are ignored.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct PartialSettings {
    pub wpm: Option<u32>,
}

impl Settings {
    /// Overlay persisted values on top of the defaults
    pub fn merged(stored: Option<PartialSettings>) -> Self {
        let defaults = Self::default();
        match stored {
            Some(p) => Self {
                wpm: p.wpm.unwrap_or(defaults.wpm),
            },
            None => defaults,
        }
    }
}

pub trait SettingsStore {
    /// `Ok(None)` when nothing has been saved yet
    fn load(&self) -> Result<Option<PartialSettings>>;
    fn save(&self, settings: &Settings) -> Result<()>;

    /// Load and merge over defaults, falling back to defaults on any error
    fn load_or_default(&self) -> Settings {
        match self.load() {
            Ok(stored) => Settings::merged(stored),
            Err(e) => {
                tracing::warn!("Failed to load settings, using defaults: {e}");
                Settings::default()
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct FileSettingsStore {
    path: PathBuf,
}

impl FileSettingsStore {
    pub fn new() -> Self {
        Self {
            path: AppDirs::settings_path(),
        }
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for FileSettingsStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SettingsStore for FileSettingsStore {
    fn load(&self) -> Result<Option<PartialSettings>> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(Error::io(e, self.path.clone())),
        };
        // the host persists `null` before anything was ever saved
        serde_json::from_slice::<Option<PartialSettings>>(&bytes).map_err(|source| {
            Error::Settings {
                source,
                path: self.path.clone(),
            }
        })
    }

    fn save(&self, settings: &Settings) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| Error::io(e, parent.to_path_buf()))?;
        }
        let data = serde_json::to_vec_pretty(settings).map_err(|source| Error::Settings {
            source,
            path: self.path.clone(),
        })?;
        fs::write(&self.path, data).map_err(|e| Error::io(e, self.path.clone()))?;
        tracing::debug!(path = ?self.path, wpm = settings.wpm, "settings saved");
        Ok(())
    }
}
