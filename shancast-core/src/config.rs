use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use crate::runner::{MAX_REFRESH_INTERVAL, MIN_REFRESH_INTERVAL};
use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// api_key = "..."
/// default_city = "Lisbon"
/// refresh_interval_secs = 300
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// WeatherAPI.com key. Required by every command that fetches.
    #[serde(default)]
    pub api_key: Option<String>,

    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// City selected when the dashboard starts without an explicit one.
    #[serde(default = "default_city")]
    pub default_city: String,

    #[serde(default = "default_refresh_interval")]
    pub refresh_interval_secs: u64,

    #[serde(default = "default_forecast_days")]
    pub forecast_days: u8,

    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// JSON city list used for search suggestions. Falls back to the bundled one.
    #[serde(default)]
    pub city_index: Option<PathBuf>,

    /// Where favorites and other local state live. Falls back to the platform data dir.
    #[serde(default)]
    pub data_dir: Option<PathBuf>,
}

fn default_base_url() -> String {
    crate::provider::weatherapi::DEFAULT_BASE_URL.to_string()
}

fn default_city() -> String {
    "London".to_string()
}

const fn default_refresh_interval() -> u64 {
    300
}

const fn default_forecast_days() -> u8 {
    7
}

const fn default_timeout() -> u64 {
    10
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_base_url(),
            default_city: default_city(),
            refresh_interval_secs: default_refresh_interval(),
            forecast_days: default_forecast_days(),
            timeout_secs: default_timeout(),
            city_index: None,
            data_dir: None,
        }
    }
}

impl Config {
    /// Load config from the platform location, or defaults if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_file_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            // First run: no config file, return defaults.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Save config to the platform location, creating parent directories as needed.
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

    /// Directory holding local state such as favorites.
    pub fn data_dir(&self) -> Result<PathBuf> {
        match &self.data_dir {
            Some(dir) => Ok(dir.clone()),
            None => Ok(project_dirs()?.data_dir().to_path_buf()),
        }
    }

    /// Returns the API key, or an error with a hint on how to set one.
    pub fn api_key(&self) -> Result<&str> {
        self.api_key.as_deref().filter(|k| !k.trim().is_empty()).ok_or_else(|| {
            anyhow!(
                "No API key configured.\n\
                 Hint: run `shancast configure` and enter your WeatherAPI.com key."
            )
        })
    }

    pub fn set_api_key(&mut self, api_key: String) {
        self.api_key = Some(api_key);
    }

    /// Polling period, clamped to between one second and one day.
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_secs)
            .clamp(MIN_REFRESH_INTERVAL, MAX_REFRESH_INTERVAL)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

fn project_dirs() -> Result<ProjectDirs> {
    ProjectDirs::from("dev", "shancast", "shancast")
        .ok_or_else(|| anyhow!("Could not determine platform config directory"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_key_errors_when_not_set() {
        let cfg = Config::default();
        let err = cfg.api_key().unwrap_err();

        assert!(err.to_string().contains("No API key configured"));
        assert!(err.to_string().contains("shancast configure"));
    }

    #[test]
    fn blank_api_key_counts_as_missing() {
        let mut cfg = Config::default();
        cfg.set_api_key("   ".into());
        assert!(cfg.api_key().is_err());
    }

    #[test]
    fn set_api_key_is_returned() {
        let mut cfg = Config::default();
        cfg.set_api_key("KEY".into());
        assert_eq!(cfg.api_key().expect("key must exist"), "KEY");
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let cfg: Config = toml::from_str("api_key = \"abc\"\ndefault_city = \"Lisbon\"\n")
            .expect("valid toml");

        assert_eq!(cfg.default_city, "Lisbon");
        assert_eq!(cfg.refresh_interval_secs, 300);
        assert_eq!(cfg.forecast_days, 7);
        assert_eq!(cfg.base_url, "https://api.weatherapi.com/v1");
        assert!(cfg.city_index.is_none());
    }

    #[test]
    fn refresh_interval_never_zero() {
        let cfg = Config { refresh_interval_secs: 0, ..Config::default() };
        assert_eq!(cfg.refresh_interval(), Duration::from_secs(1));
    }

    #[test]
    fn huge_refresh_interval_is_capped_at_one_day() {
        let cfg: Config =
            toml::from_str("refresh_interval_secs = 9223372036854775807").expect("valid toml");
        assert_eq!(cfg.refresh_interval(), Duration::from_secs(24 * 60 * 60));
    }

    #[test]
    fn explicit_data_dir_wins() {
        let cfg = Config { data_dir: Some(PathBuf::from("/tmp/shancast")), ..Config::default() };
        assert_eq!(cfg.data_dir().expect("data dir"), PathBuf::from("/tmp/shancast"));
    }
}
