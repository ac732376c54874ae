//! Settings persistence
//!
//! Settings live in `settings.json` under the app config directory.

use std::fs;
use std::path::PathBuf;

use crate::events::{EventBus, EventKind};

use super::models::Settings;

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config directory not found")]
    ConfigDirNotFound,
}

/// Loads and saves [`Settings`], announcing changes on an [`EventBus`]
pub struct SettingsStorage {
    /// Base path for app config (e.g., ~/.config/memmaster)
    base_path: PathBuf,
    events: Option<EventBus>,
}

impl SettingsStorage {
    pub fn new(base_path: PathBuf) -> Self {
        Self {
            base_path,
            events: None,
        }
    }

    /// Publish `SettingsUpdated` on every save
    pub fn with_events(mut self, events: EventBus) -> Self {
        self.events = Some(events);
        self
    }

    /// Get the default config directory
    pub fn default_config_dir() -> Result<PathBuf, SettingsError> {
        dirs::config_dir()
            .map(|p| p.join("memmaster"))
            .ok_or(SettingsError::ConfigDirNotFound)
    }

    fn settings_file(&self) -> PathBuf {
        self.base_path.join("settings.json")
    }

    /// Load settings, falling back to defaults when nothing is stored yet
    pub fn load(&self) -> Result<Settings, SettingsError> {
        let path = self.settings_file();
        if !path.exists() {
            log::info!("No settings at {:?}, using defaults", path);
            return Ok(Settings::default());
        }

        let content = fs::read_to_string(&path)?;
        let settings: Settings = serde_json::from_str(&content)?;
        Ok(settings)
    }

    /// Save settings using atomic write (write to .tmp then rename)
    pub fn save(&self, settings: &Settings) -> Result<(), SettingsError> {
        fs::create_dir_all(&self.base_path)?;

        let path = self.settings_file();
        let tmp_path = path.with_extension("json.tmp");
        fs::write(&tmp_path, serde_json::to_string_pretty(settings)?)?;
        fs::rename(&tmp_path, &path)?;

        log::info!("Saved settings to {:?}", path);
        if let Some(events) = &self.events {
            events.emit(EventKind::SettingsUpdated, None);
        }
        Ok(())
    }

    /// Load, apply `change`, save and return the new settings
    pub fn update<F>(&self, change: F) -> Result<Settings, SettingsError>
    where
        F: FnOnce(&mut Settings),
    {
        let mut settings = self.load()?;
        change(&mut settings);
        self.save(&settings)?;
        Ok(settings)
    }
}
