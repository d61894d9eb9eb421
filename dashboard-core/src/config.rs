use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
};

use crate::provider::ProviderId;

/// Environment variable that points at an alternative config file.
pub const CONFIG_PATH_ENV: &str = "DASHBOARD_CONFIG";

/// Configuration for a single provider (API key and optional origin override).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderConfig {
    pub api_key: String,

    /// Replaces the vendor origin, e.g. `http://127.0.0.1:9000`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

/// Top-level configuration stored on disk.
///
/// Built once at startup and handed to the adapters; nothing reads it from
/// ambient state afterwards.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Example TOML:
    /// [providers.openweather]
    /// api_key = "..."
    #[serde(default)]
    pub providers: HashMap<String, ProviderConfig>,
}

impl Config {
    pub fn provider_config(&self, id: ProviderId) -> Option<&ProviderConfig> {
        self.providers.get(id.as_str())
    }

    /// Returns API key for a provider, if present and non-blank.
    pub fn provider_api_key(&self, id: ProviderId) -> Option<&str> {
        self.provider_config(id)
            .map(|cfg| cfg.api_key.trim())
            .filter(|key| !key.is_empty())
    }

    pub fn provider_base_url(&self, id: ProviderId) -> Option<&str> {
        self.provider_config(id).and_then(|cfg| cfg.base_url.as_deref())
    }

    pub fn is_provider_configured(&self, id: ProviderId) -> bool {
        self.provider_api_key(id).is_some()
    }

    /// Set/replace a provider API key, keeping any origin override.
    pub fn upsert_provider_api_key(&mut self, id: ProviderId, api_key: String) {
        self.providers.entry(id.as_str().to_string()).or_default().api_key = api_key;
    }

    pub fn set_provider_base_url(&mut self, id: ProviderId, base_url: impl Into<String>) {
        self.providers.entry(id.as_str().to_string()).or_default().base_url = Some(base_url.into());
    }

    /// Load config from disk (or start empty), then apply `.env` and process
    /// environment overrides.
    pub fn load_with_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        let mut cfg = Self::load()?;
        cfg.apply_env(|name| std::env::var(name).ok());
        Ok(cfg)
    }

    /// Overlay provider keys from the environment. `lookup` is the variable
    /// source; blank values are ignored.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        for id in ProviderId::all() {
            if let Some(key) = lookup(id.env_var()).filter(|v| !v.trim().is_empty()) {
                self.upsert_provider_api_key(*id, key.trim().to_string());
            }
        }
    }

    /// Load config from disk, or return an empty default if it doesn't exist yet.
    /// A platform without a config directory also yields an empty config.
    pub fn load() -> Result<Self> {
        Self::load_or_empty(Self::config_file_path())
    }

    fn load_or_empty(path: Result<PathBuf>) -> Result<Self> {
        match path {
            Ok(path) => Self::load_from(&path),
            Err(err) => {
                tracing::warn!(error = %err, "no config file location; starting with an empty config");
                Ok(Self::default())
            }
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_toml(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<PathBuf> {
        let path = Self::config_file_path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(&path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(path)
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        if let Some(path) = std::env::var_os(CONFIG_PATH_ENV) {
            return Ok(PathBuf::from(path));
        }

        let dirs = ProjectDirs::from("dev", "city-dashboard", "dashboard")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env_of(pairs: &'static [(&'static str, &'static str)]) -> impl Fn(&str) -> Option<String> {
        move |name| {
            pairs
                .iter()
                .find(|(k, _)| *k == name)
                .map(|(_, v)| (*v).to_string())
        }
    }

    #[test]
    fn empty_config_has_no_keys() {
        let cfg = Config::default();

        for id in ProviderId::all() {
            assert!(!cfg.is_provider_configured(*id));
        }
    }

    #[test]
    fn set_api_key_for_provider() {
        let mut cfg = Config::default();

        cfg.upsert_provider_api_key(ProviderId::OpenWeather, "OPEN_KEY".into());

        assert_eq!(cfg.provider_api_key(ProviderId::OpenWeather), Some("OPEN_KEY"));
        assert!(cfg.is_provider_configured(ProviderId::OpenWeather));
        assert!(!cfg.is_provider_configured(ProviderId::NewsApi));
    }

    #[test]
    fn blank_key_counts_as_unset() {
        let mut cfg = Config::default();
        cfg.upsert_provider_api_key(ProviderId::ExchangeRate, "   ".into());

        assert_eq!(cfg.provider_api_key(ProviderId::ExchangeRate), None);
    }

    #[test]
    fn upsert_keeps_base_url() {
        let mut cfg = Config::default();
        cfg.set_provider_base_url(ProviderId::NewsApi, "http://127.0.0.1:9000");
        cfg.upsert_provider_api_key(ProviderId::NewsApi, "NEWS".into());

        assert_eq!(cfg.provider_base_url(ProviderId::NewsApi), Some("http://127.0.0.1:9000"));
        assert_eq!(cfg.provider_api_key(ProviderId::NewsApi), Some("NEWS"));
    }

    #[test]
    fn env_overrides_file_values() {
        let mut cfg = Config::from_toml(
            r#"
            [providers.openweather]
            api_key = "from-file"

            [providers.exchangerate]
            api_key = "rates-file"
            "#,
        )
        .expect("valid toml");

        cfg.apply_env(env_of(&[
            ("OPENWEATHER_API_KEY", "from-env"),
            ("EXCHANGERATE_API_KEY", ""),
        ]));

        assert_eq!(cfg.provider_api_key(ProviderId::OpenWeather), Some("from-env"));
        assert_eq!(cfg.provider_api_key(ProviderId::ExchangeRate), Some("rates-file"));
        assert_eq!(cfg.provider_api_key(ProviderId::NewsApi), None);
    }

    #[test]
    fn missing_config_location_loads_empty_config() {
        let cfg = Config::load_or_empty(Err(anyhow!("no home directory"))).unwrap();
        assert!(cfg.providers.is_empty());

        let cfg = Config::load_from(Path::new("/nonexistent/dashboard/config.toml")).unwrap();
        assert!(cfg.providers.is_empty());
    }

    #[test]
    fn missing_config_location_still_takes_env_keys() {
        let mut cfg = Config::load_or_empty(Err(anyhow!("no home directory"))).unwrap();
        cfg.apply_env(env_of(&[("OPENWEATHER_API_KEY", "from-env")]));

        assert_eq!(cfg.provider_api_key(ProviderId::OpenWeather), Some("from-env"));
    }

    #[test]
    fn toml_roundtrip_preserves_providers() {
        let mut cfg = Config::default();
        cfg.upsert_provider_api_key(ProviderId::NewsApi, "abc".into());
        cfg.set_provider_base_url(ProviderId::NewsApi, "http://localhost:1");

        let text = toml::to_string_pretty(&cfg).unwrap();
        let parsed = Config::from_toml(&text).unwrap();

        assert_eq!(parsed.provider_config(ProviderId::NewsApi), cfg.provider_config(ProviderId::NewsApi));
    }
}
