use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_ENDPOINT: &str = "https://practicum.yandex.ru/api/user_api/homework_statuses/";
pub const DEFAULT_TELEGRAM_API: &str = "https://api.telegram.org";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub api: ApiSettings,
    pub polling: PollingSettings,
    pub telegram: TelegramSettings,
    pub logging: LoggingSettings,
    pub debug: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiSettings {
    pub endpoint: String,
    pub request_timeout_secs: u64,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            request_timeout_secs: 30,
        }
    }
}

impl ApiSettings {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PollingSettings {
    pub interval_secs: u64,
    pub initial_cursor: i64,
    /// Also deliver cycle failures to the chat, not just the log.
    pub report_errors: bool,
}

impl Default for PollingSettings {
    fn default() -> Self {
        Self {
            interval_secs: 600,
            initial_cursor: 0,
            report_errors: true,
        }
    }
}

impl PollingSettings {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TelegramSettings {
    pub api_base: String,
    pub request_timeout_secs: u64,
}

impl Default for TelegramSettings {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_TELEGRAM_API.to_string(),
            request_timeout_secs: 30,
        }
    }
}

impl TelegramSettings {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    pub json: bool,
}

/// Where the active settings came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigOrigin {
    File(PathBuf),
    Defaults(Option<PathBuf>),
}

impl ConfigOrigin {
    pub fn log(&self) {
        match self {
            ConfigOrigin::File(path) => tracing::info!(?path, "Loaded config"),
            ConfigOrigin::Defaults(Some(path)) => {
                tracing::info!(?path, "Config file not found, using defaults")
            }
            ConfigOrigin::Defaults(None) => {
                tracing::info!("Could not determine config directory, using defaults")
            }
        }
    }
}

impl Settings {
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("homework-bot").join("config.toml"))
    }

    /// Loads from `path`, or the default location when `None`.
    /// Nothing is logged here since this runs before the subscriber exists.
    pub fn load(path: Option<&Path>) -> Result<(Self, ConfigOrigin)> {
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => match Self::config_path() {
                Some(path) => path,
                None => return Ok((Self::default(), ConfigOrigin::Defaults(None))),
            },
        };

        if !path.exists() {
            return Ok((Self::default(), ConfigOrigin::Defaults(Some(path))));
        }

        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let settings: Settings = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok((settings, ConfigOrigin::File(path)))
    }

    pub fn validate(&self) -> Result<()> {
        if self.polling.interval_secs == 0 {
            anyhow::bail!("polling.interval_secs must be greater than 0");
        }
        if self.api.request_timeout_secs == 0 {
            anyhow::bail!("api.request_timeout_secs must be greater than 0");
        }
        if self.telegram.request_timeout_secs == 0 {
            anyhow::bail!("telegram.request_timeout_secs must be greater than 0");
        }
        for (name, url) in [
            ("api.endpoint", &self.api.endpoint),
            ("telegram.api_base", &self.telegram.api_base),
        ] {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                anyhow::bail!("{} must be an http(s) URL, got {}", name, url);
            }
        }
        Ok(())
    }
}
