//! Process configuration read from the environment

use std::fmt;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use thiserror::Error;

use crate::assistant::openai::DEFAULT_BASE_URL;

pub const DEFAULT_PORT: u16 = 3000;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("Invalid value for {name}: {value:?}")]
    Invalid { name: &'static str, value: String },
}

/// Settings for the relay server
#[derive(Clone)]
pub struct RelayConfig {
    /// Provider credential (`OPENAI_API_KEY`)
    pub api_key: String,
    /// Fallback assistant for streaming requests (`ASSISTANT_ID`)
    pub default_assistant_id: Option<String>,
    /// Listen address (`HOST`)
    pub host: IpAddr,
    /// Listen port (`PORT`)
    pub port: u16,
    /// Provider API root (`OPENAI_BASE_URL`)
    pub base_url: String,
    /// Start a run during thread creation (`START_RUN_ON_CREATE`)
    pub start_run_on_create: bool,
    /// Emit JSON log lines (`LOG_JSON`)
    pub log_json: bool,
}

impl RelayConfig {
    /// Read configuration from process environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let api_key = get("OPENAI_API_KEY").ok_or(ConfigError::Missing("OPENAI_API_KEY"))?;

        let port = match get("PORT") {
            Some(value) => value.trim().parse().map_err(|_| ConfigError::Invalid {
                name: "PORT",
                value,
            })?,
            None => DEFAULT_PORT,
        };

        let host = match get("HOST") {
            Some(value) => value.trim().parse().map_err(|_| ConfigError::Invalid {
                name: "HOST",
                value,
            })?,
            None => IpAddr::V4(Ipv4Addr::UNSPECIFIED),
        };

        Ok(Self {
            api_key,
            default_assistant_id: get("ASSISTANT_ID"),
            host,
            port,
            base_url: get("OPENAI_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            start_run_on_create: parse_flag("START_RUN_ON_CREATE", get("START_RUN_ON_CREATE"))?,
            log_json: parse_flag("LOG_JSON", get("LOG_JSON"))?,
        })
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

fn parse_flag(name: &'static str, value: Option<String>) -> Result<bool, ConfigError> {
    let Some(value) = value else {
        return Ok(false);
    };

    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::Invalid { name, value }),
    }
}

// Keeps the API key out of logs
impl fmt::Debug for RelayConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RelayConfig")
            .field("api_key", &"<redacted>")
            .field("default_assistant_id", &self.default_assistant_id)
            .field("host", &self.host)
            .field("port", &self.port)
            .field("base_url", &self.base_url)
            .field("start_run_on_create", &self.start_run_on_create)
            .field("log_json", &self.log_json)
            .finish()
    }
}
