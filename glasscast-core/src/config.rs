use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use crate::network::{DEFAULT_TIMEOUT, EndpointConfig};

/// Remote backends the client talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BackendId {
    WeatherApi,
    Supabase,
}

impl BackendId {
    pub fn as_str(&self) -> &'static str {
        match self {
            BackendId::WeatherApi => "weatherapi",
            BackendId::Supabase => "supabase",
        }
    }

    pub const fn all() -> &'static [BackendId] {
        &[BackendId::WeatherApi, BackendId::Supabase]
    }
}

impl std::fmt::Display for BackendId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for BackendId {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.to_lowercase().as_str() {
            "weatherapi" => Ok(BackendId::WeatherApi),
            "supabase" => Ok(BackendId::Supabase),
            _ => Err(anyhow!(
                "Unknown backend '{value}'. Supported backends: weatherapi, supabase."
            )),
        }
    }
}

/// weatherapi.com credentials.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct WeatherApiConfig {
    pub api_key: String,
}

/// Supabase project address and public anon key.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SupabaseConfig {
    pub url: String,
    pub anon_key: String,
}

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// timeout_secs = 30
///
/// [weatherapi]
/// api_key = "..."
///
/// [supabase]
/// url = "https://<project>.supabase.co"
/// anon_key = "..."
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct Config {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,

    #[serde(default, rename = "weatherapi", skip_serializing_if = "Option::is_none")]
    pub weather_api: Option<WeatherApiConfig>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub supabase: Option<SupabaseConfig>,
}

impl Config {
    /// Load config from disk, or return an empty default if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_file_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            // First run: no config file, return empty.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_file_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        Ok(project_dirs()?.config_dir().join("config.toml"))
    }

    pub fn timeout(&self) -> Duration {
        self.timeout_secs.map(Duration::from_secs).unwrap_or(DEFAULT_TIMEOUT)
    }

    pub fn weather_api_key(&self) -> Option<&str> {
        self.weather_api.as_ref().map(|cfg| cfg.api_key.as_str())
    }

    pub fn set_weather_api_key(&mut self, api_key: String) {
        self.weather_api = Some(WeatherApiConfig { api_key });
    }

    pub fn set_supabase(&mut self, url: String, anon_key: String) {
        self.supabase = Some(SupabaseConfig { url, anon_key });
    }

    pub fn is_backend_configured(&self, id: BackendId) -> bool {
        match id {
            BackendId::WeatherApi => self.weather_api.is_some(),
            BackendId::Supabase => self.supabase.is_some(),
        }
    }

    pub fn weather_endpoint(&self) -> EndpointConfig {
        EndpointConfig::weather_api().with_timeout(self.timeout())
    }

    /// `None` until the Supabase project has been configured.
    pub fn supabase_endpoint(&self) -> Option<EndpointConfig> {
        self.supabase
            .as_ref()
            .map(|cfg| {
                EndpointConfig::supabase(cfg.url.as_str(), &cfg.anon_key)
                    .with_timeout(self.timeout())
            })
    }
}

pub(crate) fn project_dirs() -> Result<ProjectDirs> {
    ProjectDirs::from("dev", "glasscast", "glasscast")
        .ok_or_else(|| anyhow!("Could not determine platform config directory"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backend_id_as_str_roundtrip() {
        for id in BackendId::all() {
            let parsed = BackendId::try_from(id.as_str()).expect("roundtrip should succeed");
            assert_eq!(*id, parsed);
        }
    }

    #[test]
    fn unknown_backend_error() {
        let err = BackendId::try_from("firebase").unwrap_err();
        assert!(err.to_string().contains("Unknown backend"));
    }

    #[test]
    fn missing_file_loads_default() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = Config::load_from(&dir.path().join("config.toml")).unwrap();

        assert_eq!(cfg, Config::default());
        assert_eq!(cfg.timeout(), DEFAULT_TIMEOUT);
        assert!(cfg.supabase_endpoint().is_none());
    }

    #[test]
    fn save_and_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut cfg = Config::default();
        cfg.set_weather_api_key("WEATHER_KEY".into());
        cfg.set_supabase("https://demo.supabase.co".into(), "anon".into());
        cfg.timeout_secs = Some(5);
        cfg.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded, cfg);
        assert!(loaded.is_backend_configured(BackendId::WeatherApi));
        assert_eq!(loaded.weather_api_key(), Some("WEATHER_KEY"));
    }

    #[test]
    fn endpoints_use_configured_timeout() {
        let mut cfg = Config::default();
        cfg.timeout_secs = Some(7);
        cfg.set_supabase("https://demo.supabase.co".into(), "anon".into());

        assert_eq!(cfg.weather_endpoint().timeout(), Duration::from_secs(7));
        let supabase = cfg.supabase_endpoint().expect("configured");
        assert_eq!(supabase.timeout(), Duration::from_secs(7));
        assert_eq!(supabase.headers()[0], ("apikey".to_string(), "anon".to_string()));
    }

    #[test]
    fn parse_error_mentions_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "timeout_secs = \"soon\"").unwrap();

        let err = Config::load_from(&path).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));
    }
}
