use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::platform;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub collector: CollectorConfig,
    #[serde(default)]
    pub http: HttpConfig,
    #[serde(default)]
    pub mpv: MpvConfig,
    #[serde(default)]
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub paths: PathsConfig,
}

/// Remote collector receiving play and like reports.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectorConfig {
    #[serde(default = "default_collector_enabled")]
    pub enabled: bool,
    /// Base URL; `/song/play` and `/song/like` are appended.
    #[serde(default = "default_collector_url")]
    pub base_url: String,
}

/// Local control API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    #[serde(default = "default_http_enabled")]
    pub enabled: bool,
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MpvConfig {
    #[serde(default = "default_volume")]
    pub default_volume: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Path to a TOML track list (highest priority).
    /// Defaults to `$XDG_CONFIG_HOME/lyrica/catalog.toml`.
    #[serde(default = "default_catalog_toml")]
    pub catalog_toml: PathBuf,
    /// Prefix for the media files of the built-in catalog.
    #[serde(default = "default_media_base")]
    pub media_base: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Durable liked-tracks file.
    #[serde(default = "default_likes_file")]
    pub likes_file: PathBuf,
}

impl Default for CollectorConfig {
    fn default() -> Self {
        Self {
            enabled: default_collector_enabled(),
            base_url: default_collector_url(),
        }
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            enabled: default_http_enabled(),
            bind_address: default_bind_address(),
            port: default_port(),
        }
    }
}

impl Default for MpvConfig {
    fn default() -> Self {
        Self {
            default_volume: default_volume(),
        }
    }
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            catalog_toml: default_catalog_toml(),
            media_base: default_media_base(),
        }
    }
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            likes_file: default_likes_file(),
        }
    }
}

fn default_collector_enabled() -> bool {
    true
}

fn default_collector_url() -> String {
    "http://127.0.0.1:5000".to_string()
}

fn default_http_enabled() -> bool {
    true
}

fn default_bind_address() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8990
}

fn default_volume() -> f32 {
    0.5
}

fn default_catalog_toml() -> PathBuf {
    // Portable layout: a catalog.toml next to the executable on Windows
    #[cfg(windows)]
    {
        if let Some(dir) = platform::exe_dir() {
            let portable = dir.join("catalog.toml");
            if portable.exists() {
                return portable;
            }
        }
    }

    platform::config_dir().join("catalog.toml")
}

fn default_media_base() -> String {
    format!("{}/songs", default_collector_url())
}

fn default_likes_file() -> PathBuf {
    platform::data_dir().join("liked_songs.json")
}

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        let config_path = Self::config_path();

        if !config_path.exists() {
            let config = Self::default();
            config.save()?;
            return Ok(config);
        }

        let content = std::fs::read_to_string(&config_path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    pub fn save(&self) -> anyhow::Result<()> {
        let config_path = Self::config_path();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(&config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        platform::config_dir().join("config.toml")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.collector.enabled);
        assert_eq!(config.collector.base_url, "http://127.0.0.1:5000");
        assert!(config.http.enabled);
        assert_eq!(config.http.port, 8990);
        assert_eq!(config.http.bind_address, "127.0.0.1");
        assert_eq!(config.mpv.default_volume, 0.5);
        assert!(config.catalog.media_base.ends_with("/songs"));
        assert!(config.paths.likes_file.ends_with("liked_songs.json"));
    }

    #[test]
    fn partial_file_fills_defaults() {
        let config: Config = toml::from_str(
            r#"
            [collector]
            enabled = false

            [http]
            port = 9000
            "#,
        )
        .unwrap();
        assert!(!config.collector.enabled);
        assert_eq!(config.collector.base_url, "http://127.0.0.1:5000");
        assert_eq!(config.http.port, 9000);
        assert!(config.http.enabled);
    }
}
