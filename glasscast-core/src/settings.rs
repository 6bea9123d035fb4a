//! Persisted user preferences.
//!
//! Loaded once at startup and written back on every change. Consumers get the
//! store injected and may subscribe to changes.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};
use tokio::sync::watch;

use crate::{config::project_dirs, model::TemperatureUnit};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct UserSettings {
    #[serde(rename = "isFahrenheit", default)]
    pub is_fahrenheit: bool,
}

impl UserSettings {
    pub fn temperature_unit(&self) -> TemperatureUnit {
        TemperatureUnit::from_fahrenheit_flag(self.is_fahrenheit)
    }
}

#[derive(Debug)]
pub struct SettingsStore {
    path: PathBuf,
    state: watch::Sender<UserSettings>,
}

impl SettingsStore {
    /// Opens the store at the platform default location.
    pub fn load() -> Result<Self> {
        let path = project_dirs()?.config_dir().join("settings.toml");
        Self::load_from(path)
    }

    /// Missing file means defaults; a file that fails to parse is an error.
    pub fn load_from(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let settings = read_settings(&path)?;
        let (state, _) = watch::channel(settings);

        Ok(Self { path, state })
    }

    pub fn current(&self) -> UserSettings {
        *self.state.borrow()
    }

    pub fn temperature_unit(&self) -> TemperatureUnit {
        self.current().temperature_unit()
    }

    pub fn subscribe(&self) -> watch::Receiver<UserSettings> {
        self.state.subscribe()
    }

    pub fn set_fahrenheit(&self, is_fahrenheit: bool) -> Result<()> {
        self.update(UserSettings { is_fahrenheit })
    }

    pub fn set_temperature_unit(&self, unit: TemperatureUnit) -> Result<()> {
        self.set_fahrenheit(unit.is_fahrenheit())
    }

    /// Persists first, then notifies; a failed write leaves the state untouched.
    pub fn update(&self, settings: UserSettings) -> Result<()> {
        write_settings(&self.path, &settings)?;
        self.state.send_if_modified(|current| {
            let changed = *current != settings;
            *current = settings;
            changed
        });
        tracing::debug!(is_fahrenheit = settings.is_fahrenheit, "settings updated");
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn read_settings(path: &Path) -> Result<UserSettings> {
    if !path.exists() {
        return Ok(UserSettings::default());
    }

    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read settings file: {}", path.display()))?;

    toml::from_str(&contents)
        .with_context(|| format!("Failed to parse settings file: {}", path.display()))
}

fn write_settings(path: &Path, settings: &UserSettings) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).with_context(|| {
            format!("Failed to create settings directory: {}", parent.display())
        })?;
    }

    let toml = toml::to_string(settings).context("Failed to serialize settings to TOML")?;
    fs::write(path, toml)
        .with_context(|| format!("Failed to write settings file: {}", path.display()))
}
