use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

pub const DEFAULT_CITY: &str = "London";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_BAR_WIDTH: usize = 15;

/// Where and how to reach the weather endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    pub api_url: String,
    pub api_key: String,
}

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// api_url = "https://example.invalid/weather"
/// api_key = "..."
/// timeout_secs = 10
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub api_url: Option<String>,
    pub api_key: Option<String>,

    /// Request timeout, in seconds.
    pub timeout_secs: u64,

    /// City used when the first prompt is answered with nothing.
    pub default_city: String,

    /// Width of the progress bars, in cells.
    pub bar_width: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: None,
            api_key: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            default_city: DEFAULT_CITY.to_string(),
            bar_width: DEFAULT_BAR_WIDTH,
        }
    }
}

impl Config {
    /// Return the configured endpoint, or a hint on how to set one up.
    pub fn endpoint(&self) -> Result<Endpoint> {
        let api_url = non_empty(self.api_url.as_deref()).ok_or_else(|| {
            anyhow!(
                "No API URL configured.\n\
                 Hint: run `weather configure` or pass `--api-url`."
            )
        })?;
        let api_key = non_empty(self.api_key.as_deref()).ok_or_else(|| {
            anyhow!(
                "No API key configured.\n\
                 Hint: run `weather configure` or pass `--api-key`."
            )
        })?;

        Ok(Endpoint {
            api_url: api_url.to_string(),
            api_key: api_key.to_string(),
        })
    }

    /// Set/replace the endpoint URL and credential.
    pub fn set_endpoint(&mut self, api_url: String, api_key: String) {
        self.api_url = Some(api_url);
        self.api_key = Some(api_key);
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Load config from `path`, or return an empty default if it doesn't exist yet.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            // First run: no config file, return empty.
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Save config to `path`, creating parent directories as needed.
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
        let dirs = ProjectDirs::from("dev", "weather-tui", "weather-cli")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }
}

fn non_empty(s: Option<&str>) -> Option<&str> {
    s.map(str::trim).filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_errors_when_not_set() {
        let cfg = Config::default();
        let err = cfg.endpoint().unwrap_err();

        assert!(err.to_string().contains("No API URL configured"));
        assert!(err.to_string().contains("weather configure"));
    }

    #[test]
    fn endpoint_errors_when_key_is_blank() {
        let mut cfg = Config::default();
        cfg.set_endpoint("https://example.invalid/weather".into(), "   ".into());

        let err = cfg.endpoint().unwrap_err();
        assert!(err.to_string().contains("No API key configured"));
    }

    #[test]
    fn set_endpoint_makes_config_usable() {
        let mut cfg = Config::default();
        cfg.set_endpoint("https://example.invalid/weather".into(), "KEY".into());

        let endpoint = cfg.endpoint().expect("endpoint must exist");
        assert_eq!(endpoint.api_url, "https://example.invalid/weather");
        assert_eq!(endpoint.api_key, "KEY");
    }

    #[test]
    fn defaults_match_reference_behavior() {
        let cfg = Config::default();
        assert_eq!(cfg.timeout(), Duration::from_secs(10));
        assert_eq!(cfg.default_city, "London");
        assert_eq!(cfg.bar_width, 15);
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = Config::load_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(cfg, Config::default());
    }

    #[test]
    fn partial_file_keeps_defaults_for_absent_keys() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "api_key = \"abc\"\ntimeout_secs = 3\n").unwrap();

        let cfg = Config::load_from(&path).unwrap();
        assert_eq!(cfg.api_key.as_deref(), Some("abc"));
        assert_eq!(cfg.timeout_secs, 3);
        assert_eq!(cfg.default_city, "London");
    }

    #[test]
    fn save_then_load_preserves_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut cfg = Config::default();
        cfg.set_endpoint("https://example.invalid/weather".into(), "KEY".into());
        cfg.bar_width = 20;
        cfg.save_to(&path).unwrap();

        assert_eq!(Config::load_from(&path).unwrap(), cfg);
    }

    #[test]
    fn invalid_toml_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "timeout_secs = \"soon\"").unwrap();

        let err = Config::load_from(&path).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));
    }
}
