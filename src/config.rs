use std::net::SocketAddr;
use std::path::PathBuf;

use thiserror::Error;

/// Application-level constants
pub const APP_NAME: &str = "SmartFlow";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

pub const DEFAULT_BIND: &str = "127.0.0.1:8501";
pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4o";
pub const DEFAULT_OPENAI_TIMEOUT_SECS: u64 = 120;

const DATABASE_FILE: &str = "smartflow.db";

/// Default tracing filter when `RUST_LOG` is unset.
pub fn default_log_filter() -> &'static str {
    "smartflow_lib=info,tower_http=warn"
}

/// ~/SmartFlow/ unless overridden by `SMARTFLOW_DATA_DIR`.
pub fn app_data_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(APP_NAME))
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid value for {var}: {value:?} ({reason})")]
    InvalidValue {
        var: &'static str,
        value: String,
        reason: String,
    },

    #[error("OPENAI_API_KEY is required outside test mode")]
    MissingApiKey,

    #[error("Cannot determine home directory; set SMARTFLOW_DATA_DIR")]
    NoDataDir,
}

/// Runtime configuration, read once at startup.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// `ENVIRONMENT=test`: canned completions, no network.
    pub test_mode: bool,
    pub data_dir: PathBuf,
    pub bind_addr: SocketAddr,
    pub openai_api_key: Option<String>,
    pub openai_base_url: String,
    pub openai_model: String,
    pub openai_timeout_secs: u64,
    pub demo_accounts: bool,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable source. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let test_mode = get("ENVIRONMENT").is_some_and(|v| v.eq_ignore_ascii_case("test"));

        let data_dir = match get("SMARTFLOW_DATA_DIR") {
            Some(dir) => PathBuf::from(dir),
            None => app_data_dir().ok_or(ConfigError::NoDataDir)?,
        };

        let bind = get("SMARTFLOW_BIND").unwrap_or_else(|| DEFAULT_BIND.to_string());
        let bind_addr = bind.parse().map_err(|e: std::net::AddrParseError| {
            ConfigError::InvalidValue {
                var: "SMARTFLOW_BIND",
                value: bind.clone(),
                reason: e.to_string(),
            }
        })?;

        let openai_timeout_secs = match get("OPENAI_TIMEOUT_SECS") {
            Some(raw) => raw.parse().map_err(|e: std::num::ParseIntError| {
                ConfigError::InvalidValue {
                    var: "OPENAI_TIMEOUT_SECS",
                    value: raw.clone(),
                    reason: e.to_string(),
                }
            })?,
            None => DEFAULT_OPENAI_TIMEOUT_SECS,
        };

        let demo_accounts = match get("SMARTFLOW_DEMO_ACCOUNTS") {
            Some(raw) => parse_bool("SMARTFLOW_DEMO_ACCOUNTS", &raw)?,
            None => true,
        };

        let openai_api_key = get("OPENAI_API_KEY");
        if openai_api_key.is_none() && !test_mode {
            return Err(ConfigError::MissingApiKey);
        }

        Ok(Self {
            test_mode,
            data_dir,
            bind_addr,
            openai_api_key,
            openai_base_url: get("OPENAI_BASE_URL")
                .unwrap_or_else(|| DEFAULT_OPENAI_BASE_URL.to_string()),
            openai_model: get("OPENAI_MODEL").unwrap_or_else(|| DEFAULT_OPENAI_MODEL.to_string()),
            openai_timeout_secs,
            demo_accounts,
        })
    }

    pub fn db_path(&self) -> PathBuf {
        self.data_dir.join(DATABASE_FILE)
    }

    pub fn exports_dir(&self) -> PathBuf {
        self.data_dir.join("exports")
    }
}

fn parse_bool(var: &'static str, raw: &str) -> Result<bool, ConfigError> {
    match raw.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            var,
            value: raw.to_string(),
            reason: "expected true or false".into(),
        }),
    }
}
