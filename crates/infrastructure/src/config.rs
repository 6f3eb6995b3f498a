use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct HttpConfig {
    #[serde(default = "default_http_host")]
    pub host: String,
    #[serde(default = "default_http_port")]
    pub port: u16,
}

fn default_http_host() -> String {
    "0.0.0.0".to_string()
}
fn default_http_port() -> u16 {
    8000
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            host: default_http_host(),
            port: default_http_port(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct StorageConfig {
    /// Uploaded files live here, served under `/media`
    #[serde(default = "default_media_root")]
    pub media_root: PathBuf,
    /// Static assets and legacy upload fallbacks, served under `/static`
    #[serde(default = "default_static_root")]
    pub static_root: PathBuf,
}

fn default_media_root() -> PathBuf {
    PathBuf::from("media")
}
fn default_static_root() -> PathBuf {
    PathBuf::from("static")
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            media_root: default_media_root(),
            static_root: default_static_root(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct UploadConfig {
    #[serde(default = "default_max_bytes")]
    pub max_bytes: usize,
}

fn default_max_bytes() -> usize {
    50 * 1024 * 1024
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            max_bytes: default_max_bytes(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct BrowseConfig {
    #[serde(default = "default_page_size")]
    pub page_size: u64,
}

fn default_page_size() -> u64 {
    20
}

impl Default for BrowseConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServerConfig {
    #[serde(default)]
    pub database_url: String,
    #[serde(default)]
    pub http: HttpConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub upload: UploadConfig,
    #[serde(default)]
    pub browse: BrowseConfig,
}

pub const DEFAULT_DATABASE_URL: &str = "sqlite://tanks.db?mode=rwc";

impl ServerConfig {
    pub fn load(config_dir: &str) -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let s = Config::builder()
            .set_default("database_url", "")?
            // Shared settings, e.g. config/default.toml
            .add_source(File::with_name(&format!("{}/default", config_dir)).required(false))
            // Per-environment overrides
            .add_source(File::with_name(&format!("{}/{}", config_dir, run_mode)).required(false))
            // Environment variables (e.g. TANKS__HTTP__PORT=9000)
            .add_source(Environment::with_prefix("TANKS").separator("__"))
            .build()?;

        let mut config: Self = s.try_deserialize()?;
        if config.database_url.is_empty() {
            config.database_url =
                std::env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string());
        }
        Ok(config)
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.http.host, self.http.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            database_url: DEFAULT_DATABASE_URL.to_string(),
            http: HttpConfig::default(),
            storage: StorageConfig::default(),
            upload: UploadConfig::default(),
            browse: BrowseConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ServerConfig::default();
        assert_eq!(config.http.port, 8000);
        assert_eq!(config.upload.max_bytes, 52_428_800);
        assert_eq!(config.browse.page_size, 20);
        assert_eq!(config.storage.media_root, PathBuf::from("media"));
        assert_eq!(config.bind_address(), "0.0.0.0:8000");
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("default.toml"),
            "database_url = \"sqlite::memory:\"\n[http]\nport = 9100\n[storage]\nmedia_root = \"/srv/media\"\n",
        )
        .unwrap();

        let config = ServerConfig::load(dir.path().to_str().unwrap()).unwrap();
        assert_eq!(config.database_url, "sqlite::memory:");
        assert_eq!(config.http.port, 9100);
        assert_eq!(config.http.host, "0.0.0.0");
        assert_eq!(config.storage.media_root, PathBuf::from("/srv/media"));
        assert_eq!(config.browse.page_size, 20);
    }
}
