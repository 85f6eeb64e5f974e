use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::retry::RetryPolicy;

/// Retry policy parameters (optional `[retry]` section in dropdl.toml).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Maximum number of attempts per page fetch (including the first).
    pub max_attempts: u32,
    /// Base delay in seconds for exponential backoff.
    pub base_delay_secs: f64,
    /// Maximum backoff delay in seconds.
    pub max_delay_secs: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            base_delay_secs: 5.0,
            max_delay_secs: 60,
        }
    }
}

impl RetryConfig {
    /// Convert the config section into the policy the fetch loop consumes.
    pub fn to_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.max_attempts.max(1),
            base_delay: Duration::from_secs_f64(self.base_delay_secs.max(0.0)),
            max_delay: Duration::from_secs(self.max_delay_secs),
        }
    }
}

/// Global configuration loaded from `dropdl.toml` inside the config directory
/// (the same directory that holds cookies.txt and archive.txt, so a single
/// mounted volume carries all run state).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DropdlConfig {
    /// Root of the catalog site.
    pub base_url: String,
    /// User-Agent header sent with every catalog request.
    pub user_agent: String,
    /// Courtesy pause after each successful catalog request, in seconds.
    pub request_delay_secs: f64,
    /// Total per-request timeout in seconds.
    pub timeout_secs: u64,
    /// Subtitle languages passed to yt-dlp (`--sub-langs`).
    pub sub_langs: String,
    /// Optional retry policy; if missing, built-in defaults are used.
    #[serde(default)]
    pub retry: Option<RetryConfig>,
}

impl Default for DropdlConfig {
    fn default() -> Self {
        Self {
            base_url: "https://watch.dropout.tv".to_string(),
            user_agent: "Mozilla/5.0 (compatible; dropout-catalog/slow-mode)".to_string(),
            request_delay_secs: 2.5,
            timeout_secs: 60,
            sub_langs: "en.*".to_string(),
            retry: None,
        }
    }
}

impl DropdlConfig {
    /// Effective retry policy: the `[retry]` section if present, else defaults.
    pub fn retry_policy(&self) -> RetryPolicy {
        self.retry
            .as_ref()
            .map(RetryConfig::to_policy)
            .unwrap_or_default()
    }

    /// Courtesy delay between catalog requests.
    pub fn request_delay(&self) -> Duration {
        Duration::from_secs_f64(self.request_delay_secs.max(0.0))
    }
}

pub fn config_file_path(config_dir: &Path) -> PathBuf {
    config_dir.join("dropdl.toml")
}

/// Load configuration from the config directory, creating a default file if
/// none exists. The config directory itself is created if needed.
pub fn load_or_init(config_dir: &Path) -> Result<DropdlConfig> {
    let path = config_file_path(config_dir);
    if !path.exists() {
        let default_cfg = DropdlConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        fs::create_dir_all(config_dir)?;
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(&path)?;
    let cfg: DropdlConfig = toml::from_str(&data)?;
    Ok(cfg)
}
