//! Server settings: optional TOML file, overridden by `PHARMACY__*` environment variables.

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment, File};
use pharmacy_stock_llm::GatewaySettings;
use serde::Deserialize;

pub const CONFIG_FILE: &str = "config/pharmacy.toml";
pub const ENV_PREFIX: &str = "PHARMACY";

/// Gateway section of the server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct GatewayConfig {
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_base_url(),
            model: default_model(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl GatewayConfig {
    /// Client settings, or `None` when no API key is set.
    pub fn settings(&self) -> Option<GatewaySettings> {
        let api_key = self.api_key.as_deref().map(str::trim).filter(|k| !k.is_empty())?;
        Some(GatewaySettings {
            api_key: api_key.to_string(),
            base_url: self.base_url.clone(),
            model: self.model.clone(),
            timeout_secs: self.timeout_secs,
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,
    #[serde(default = "default_database_path")]
    pub database_path: PathBuf,
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
    #[serde(default = "default_session_ttl_hours")]
    pub session_ttl_hours: i64,
    /// Bootstrap account, created at startup if missing
    #[serde(default)]
    pub admin_username: Option<String>,
    #[serde(default)]
    pub admin_password: Option<String>,
    #[serde(default)]
    pub gateway: GatewayConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            database_path: default_database_path(),
            log_filter: default_log_filter(),
            session_ttl_hours: default_session_ttl_hours(),
            admin_username: None,
            admin_password: None,
            gateway: GatewayConfig::default(),
        }
    }
}

fn default_bind_addr() -> String {
    "127.0.0.1:8000".to_string()
}

fn default_database_path() -> PathBuf {
    PathBuf::from("pharmacy.db")
}

fn default_log_filter() -> String {
    "pharmacy_stock=info,tower_http=info".to_string()
}

fn default_session_ttl_hours() -> i64 {
    12
}

fn default_base_url() -> String {
    "https://generativelanguage.googleapis.com".to_string()
}

fn default_model() -> String {
    "gemini-1.5-flash".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

impl ServerConfig {
    /// Load from `config/pharmacy.toml` (optional), overridden by `PHARMACY__*` env vars.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(Path::new(CONFIG_FILE))
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::from(path).required(false))
            .add_source(Environment::with_prefix(ENV_PREFIX).separator("__"))
            .build()?;

        settings.try_deserialize()
    }

    pub fn session_ttl(&self) -> chrono::Duration {
        chrono::Duration::hours(self.session_ttl_hours)
    }

    /// Bootstrap credentials when both halves are set.
    pub fn admin_credentials(&self) -> Option<(&str, &str)> {
        match (self.admin_username.as_deref(), self.admin_password.as_deref()) {
            (Some(user), Some(password)) if !user.is_empty() && !password.is_empty() => {
                Some((user, password))
            }
            _ => None,
        }
    }
}
