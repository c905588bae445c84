use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};
use tracing::debug;
use uuid::Uuid;

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct NbuProviderConfig {
    pub base_url: String,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AnalyticsProviderConfig {
    pub base_url: String,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ProvidersConfig {
    pub nbu: Option<NbuProviderConfig>,
    pub analytics: Option<AnalyticsProviderConfig>,
}

impl Default for ProvidersConfig {
    fn default() -> Self {
        ProvidersConfig {
            nbu: Some(NbuProviderConfig {
                base_url: "https://bank.gov.ua".to_string(),
            }),
            analytics: Some(AnalyticsProviderConfig {
                base_url: "https://www.google-analytics.com".to_string(),
            }),
        }
    }
}

fn default_currency() -> String {
    "USD".to_string()
}

fn default_interval_secs() -> u64 {
    3600
}

/// File-backed settings. Every field has a default, so the worker runs
/// without a configuration file at all.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AppConfig {
    #[serde(default)]
    pub providers: ProvidersConfig,
    #[serde(default = "default_currency")]
    pub currency: String,
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            providers: ProvidersConfig::default(),
            currency: default_currency(),
            interval_secs: default_interval_secs(),
        }
    }
}

impl AppConfig {
    /// Loads the default config file, falling back to defaults when no
    /// file exists.
    pub fn load() -> Result<Self> {
        debug!("Loading default config");
        let config_path = Self::default_config_path()?;
        if !config_path.exists() {
            debug!("No config file found, using defaults");
            return Ok(AppConfig::default());
        }
        Self::load_from_path(&config_path)
    }

    pub fn default_config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("in", "codito", "ratecast")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.config_dir().join("config.yaml"))
    }

    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let config_str = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Self = serde_yaml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;
        debug!("Successfully loaded config");
        Ok(config)
    }
}

/// Collector credentials, sourced from the environment. The client
/// identifier survives for the process lifetime; a random one is
/// generated when `CLIENT_ID` is not supplied.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub measurement_id: String,
    pub api_secret: String,
    pub client_id: String,
}

impl Credentials {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let measurement_id = lookup("MEASUREMENT_ID")
            .context("MEASUREMENT_ID is not set in the environment")?;
        let api_secret =
            lookup("API_SECRET").context("API_SECRET is not set in the environment")?;
        let client_id = lookup("CLIENT_ID").unwrap_or_else(|| Uuid::new_v4().to_string());

        Ok(Credentials {
            measurement_id,
            api_secret,
            client_id,
        })
    }
}
