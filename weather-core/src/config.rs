use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use crate::provider::openweather::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT};

/// Environment variable that overrides the configured OpenWeatherMap key.
pub const API_KEY_ENV: &str = "OPENWEATHER_API_KEY";

/// Placeholder key used when nothing else is configured.
pub const DEMO_API_KEY: &str = "demo_key";

pub const DEFAULT_BIND: &str = "127.0.0.1:8080";

/// OpenWeatherMap credentials and endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OpenWeatherConfig {
    pub api_key: Option<String>,
    pub base_url: String,

    /// Whole-request timeout in seconds. Zero means the default.
    pub timeout_seconds: u64,
}

impl Default for OpenWeatherConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_seconds: DEFAULT_TIMEOUT.as_secs(),
        }
    }
}

impl OpenWeatherConfig {
    pub fn request_timeout(&self) -> Duration {
        match self.timeout_seconds {
            0 => DEFAULT_TIMEOUT,
            secs => Duration::from_secs(secs),
        }
    }
}

/// HTTP listener settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind: String,

    /// Bearer tokens accepted by the access guard. Empty disables the guard.
    pub access_tokens: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { bind: DEFAULT_BIND.to_string(), access_tokens: Vec::new() }
    }
}

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// [openweather]
/// api_key = "..."
/// timeout_seconds = 30
///
/// [server]
/// bind = "127.0.0.1:8080"
/// access_tokens = ["..."]
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub openweather: OpenWeatherConfig,
    pub server: ServerConfig,
}

impl Config {
    /// Load config from the platform location, or defaults if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_file_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Save config to the platform location.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_file_path()?)
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
        let dirs = ProjectDirs::from("dev", "weather-search", "weather-web")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    /// API key to send upstream: environment first, then the file, then the demo key.
    pub fn api_key(&self) -> String {
        self.resolve_api_key(std::env::var(API_KEY_ENV).ok())
    }

    fn resolve_api_key(&self, from_env: Option<String>) -> String {
        from_env
            .filter(|key| !key.trim().is_empty())
            .or_else(|| self.openweather.api_key.clone().filter(|key| !key.trim().is_empty()))
            .unwrap_or_else(|| DEMO_API_KEY.to_string())
    }

    pub fn set_api_key(&mut self, api_key: String) {
        self.openweather.api_key = Some(api_key);
    }

    /// Add an access token unless it is already present.
    pub fn add_access_token(&mut self, token: String) {
        if !self.server.access_tokens.contains(&token) {
            self.server.access_tokens.push(token);
        }
    }

    pub fn is_guarded(&self) -> bool {
        !self.server.access_tokens.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_at_openweather() {
        let cfg = Config::default();

        assert_eq!(cfg.openweather.base_url, "https://api.openweathermap.org/data/2.5");
        assert_eq!(cfg.server.bind, DEFAULT_BIND);
        assert!(cfg.openweather.api_key.is_none());
        assert_eq!(cfg.openweather.request_timeout(), Duration::from_secs(30));
        assert!(!cfg.is_guarded());
    }

    #[test]
    fn zero_timeout_means_default() {
        let mut cfg = Config::default();

        cfg.openweather.timeout_seconds = 0;
        assert_eq!(cfg.openweather.request_timeout(), DEFAULT_TIMEOUT);

        cfg.openweather.timeout_seconds = 5;
        assert_eq!(cfg.openweather.request_timeout(), Duration::from_secs(5));
    }

    #[test]
    fn api_key_falls_back_to_demo_key() {
        let cfg = Config::default();
        assert_eq!(cfg.resolve_api_key(None), DEMO_API_KEY);
        assert_eq!(cfg.resolve_api_key(Some("  ".into())), DEMO_API_KEY);
    }

    #[test]
    fn env_key_wins_over_file_key() {
        let mut cfg = Config::default();
        cfg.set_api_key("FILE_KEY".into());

        assert_eq!(cfg.resolve_api_key(None), "FILE_KEY");
        assert_eq!(cfg.resolve_api_key(Some("ENV_KEY".into())), "ENV_KEY");
    }

    #[test]
    fn access_tokens_are_not_duplicated() {
        let mut cfg = Config::default();

        cfg.add_access_token("secret".into());
        cfg.add_access_token("secret".into());
        cfg.add_access_token("other".into());

        assert_eq!(cfg.server.access_tokens, vec!["secret", "other"]);
        assert!(cfg.is_guarded());
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let cfg = Config::load_from(&dir.path().join("absent.toml")).expect("load");

        assert_eq!(cfg.server.bind, DEFAULT_BIND);
    }

    #[test]
    fn save_then_load_keeps_values() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("nested").join("config.toml");

        let mut cfg = Config::default();
        cfg.set_api_key("OPEN_KEY".into());
        cfg.add_access_token("token-1".into());
        cfg.server.bind = "0.0.0.0:9000".into();
        cfg.save_to(&path).expect("save");

        let loaded = Config::load_from(&path).expect("load");
        assert_eq!(loaded.openweather.api_key.as_deref(), Some("OPEN_KEY"));
        assert_eq!(loaded.server.access_tokens, vec!["token-1"]);
        assert_eq!(loaded.server.bind, "0.0.0.0:9000");
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.toml");
        fs::write(&path, "[openweather]\napi_key = \"K\"\n").expect("write");

        let cfg = Config::load_from(&path).expect("load");

        assert_eq!(cfg.openweather.api_key.as_deref(), Some("K"));
        assert_eq!(cfg.openweather.base_url, DEFAULT_BASE_URL);
        assert_eq!(cfg.server.bind, DEFAULT_BIND);
    }

    #[test]
    fn invalid_file_reports_path() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.toml");
        fs::write(&path, "server = 12").expect("write");

        let err = Config::load_from(&path).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));
    }
}
