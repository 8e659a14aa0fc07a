//! Settings file owned by the host shell.
//!
//! The file holds [`TerminalSettings`] as camelCase JSON. A missing file
//! means defaults. Writes go to a sibling temp file that is then renamed
//! into place.

use std::path::{Path, PathBuf};

use kebab_pos_core::{SettingsPatch, TerminalSettings};
use thiserror::Error;

/// Errors reading or writing the settings file.
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Failed to access settings file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Settings file {path} is not valid JSON: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Persistent settings with an in-memory copy.
#[derive(Debug)]
pub struct SettingsStore {
    path: PathBuf,
    current: TerminalSettings,
}

impl SettingsStore {
    /// Load settings from `path`, starting from `defaults` if the file does
    /// not exist yet. Keys missing from the file take their default value.
    ///
    /// # Errors
    ///
    /// Returns error if the file exists but cannot be read or parsed.
    pub async fn load(
        path: impl Into<PathBuf>,
        defaults: TerminalSettings,
    ) -> Result<Self, SettingsError> {
        let path = path.into();
        let current = match tokio::fs::read(&path).await {
            Ok(bytes) => {
                let mut value = serde_json::to_value(&defaults).map_err(|source| {
                    SettingsError::Parse {
                        path: path.clone(),
                        source,
                    }
                })?;
                let stored: serde_json::Value =
                    serde_json::from_slice(&bytes).map_err(|source| SettingsError::Parse {
                        path: path.clone(),
                        source,
                    })?;
                merge_objects(&mut value, stored);
                serde_json::from_value(value).map_err(|source| SettingsError::Parse {
                    path: path.clone(),
                    source,
                })?
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!(path = %path.display(), "No settings file, using defaults");
                defaults
            }
            Err(source) => return Err(SettingsError::Io { path, source }),
        };

        Ok(Self { path, current })
    }

    /// Current settings.
    #[must_use]
    pub const fn get(&self) -> &TerminalSettings {
        &self.current
    }

    /// File the settings live in.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Merge `patch` and persist the result.
    ///
    /// The in-memory copy only changes once the file has been written.
    ///
    /// # Errors
    ///
    /// Returns error if the file could not be written.
    pub async fn update(&mut self, patch: SettingsPatch) -> Result<(), SettingsError> {
        let mut next = self.current.clone();
        next.apply(patch);
        self.save(&next).await?;
        self.current = next;
        Ok(())
    }

    async fn save(&self, settings: &TerminalSettings) -> Result<(), SettingsError> {
        let bytes = serde_json::to_vec_pretty(settings).map_err(|source| SettingsError::Parse {
            path: self.path.clone(),
            source,
        })?;

        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        let io = |source: std::io::Error| SettingsError::Io {
            path: self.path.clone(),
            source,
        };
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await.map_err(io)?;
        }
        tokio::fs::write(&tmp, bytes).await.map_err(io)?;
        tokio::fs::rename(&tmp, &self.path).await.map_err(io)?;
        Ok(())
    }
}

/// Overlay the keys of `overlay` onto `base` (both JSON objects).
fn merge_objects(base: &mut serde_json::Value, overlay: serde_json::Value) {
    if let (Some(base), serde_json::Value::Object(overlay)) = (base.as_object_mut(), overlay) {
        for (key, value) in overlay {
            base.insert(key, value);
        }
    }
}
