use std::path::Path;

use serde::Deserialize;

static CONFIG: OnceCell<Config> = OnceCell::const_new();

mod config_dir;
pub use config_dir::{find_config_file, read_config, read_config_from};

mod error;
pub use error::{ConfigError, ConfigResult};
use tokio::sync::OnceCell;

#[derive(Debug, Deserialize)]
pub struct Config {
    host: Host,
    app: App,
}

#[derive(Debug, Deserialize)]
pub struct Host {
    bindto: String,
}

#[derive(Debug, Deserialize)]
pub struct App {
    /// `memory` or a sqlite connection string
    storage_uri: String,
    #[serde(default)]
    docs: bool,
}

impl Config {
    /// Process-wide config, read on first use. A failed read is not cached.
    #[tracing::instrument]
    pub async fn get_or_init(use_local: bool) -> ConfigResult<&'static Config> {
        CONFIG
            .get_or_try_init(|| async {
                Self::load(use_local).inspect_err(|e| {
                    if matches!(e, ConfigError::ConfigNotFound) {
                        tracing::error!("Config not found.");
                    }
                })
            })
            .await
    }

    /// Reads the config without touching the process-wide instance.
    pub fn load(use_local: bool) -> ConfigResult<Self> {
        let bytes = read_config(use_local)?;
        Self::from_slice(&bytes)
    }

    pub fn load_from(path: &Path) -> ConfigResult<Self> {
        let bytes = read_config_from(path)?;
        Self::from_slice(&bytes)
    }

    pub fn from_slice(bytes: &[u8]) -> ConfigResult<Self> {
        let config: Self = toml::from_slice(bytes)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> ConfigResult<()> {
        if self.host.bindto.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                key: "host.bindto",
                reason: String::from("must not be empty"),
            });
        }

        let uri = self.app.storage_uri.as_str();
        if uri != "memory" && !uri.starts_with("sqlite:") {
            return Err(ConfigError::InvalidValue {
                key: "app.storage_uri",
                reason: format!("expected `memory` or a sqlite uri, got `{uri}`"),
            });
        }

        Ok(())
    }

    #[inline]
    pub fn host(&self) -> &Host {
        &self.host
    }

    #[inline]
    pub fn app(&self) -> &App {
        &self.app
    }
}

impl Host {
    #[inline]
    pub fn bindto(&self) -> &str {
        &self.bindto
    }
}

impl App {
    #[inline]
    pub fn storage_uri(&self) -> &str {
        &self.storage_uri
    }

    #[inline]
    pub fn docs(&self) -> bool {
        self.docs
    }
}
