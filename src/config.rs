use std::env;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{name} must be {expected}, got {value:?}")]
    Invalid {
        name: &'static str,
        expected: &'static str,
        value: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoteMode {
    Http,
    Memory,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub remote_base_url: String,
    pub remote_mode: RemoteMode,
    pub remote_timeout: Duration,
    pub bind_addr: String,
    pub port: u16,
    pub cache_ttl: Duration,
    /// How long an untouched form session stays open.
    pub form_idle: Duration,
    pub allowed_origins: Vec<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            remote_base_url: "http://localhost:5000".to_string(),
            remote_mode: RemoteMode::Http,
            remote_timeout: Duration::from_secs(30),
            bind_addr: "0.0.0.0".to_string(),
            port: 8080,
            cache_ttl: Duration::from_secs(10 * 60),
            form_idle: Duration::from_secs(30 * 60),
            allowed_origins: vec!["http://localhost:3000".to_string()],
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Reads settings through `lookup`, falling back to defaults for
    /// anything unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = AppConfig::default();

        if let Some(url) = lookup("REMOTE_BASE_URL") {
            config.remote_base_url = url;
        }
        if let Some(mode) = lookup("REMOTE_MODE") {
            config.remote_mode = match mode.to_ascii_lowercase().as_str() {
                "http" => RemoteMode::Http,
                "memory" => RemoteMode::Memory,
                _ => {
                    return Err(ConfigError::Invalid {
                        name: "REMOTE_MODE",
                        expected: "`http` or `memory`",
                        value: mode,
                    })
                }
            };
        }
        if let Some(secs) = lookup("REMOTE_TIMEOUT_SECS") {
            config.remote_timeout = Duration::from_secs(parse_number("REMOTE_TIMEOUT_SECS", secs)?);
        }
        if let Some(addr) = lookup("BIND_ADDR") {
            config.bind_addr = addr;
        }
        if let Some(port) = lookup("PORT") {
            config.port = port.parse().map_err(|_| ConfigError::Invalid {
                name: "PORT",
                expected: "a port number",
                value: port,
            })?;
        }
        if let Some(secs) = lookup("CACHE_TTL_SECS") {
            config.cache_ttl = Duration::from_secs(parse_number("CACHE_TTL_SECS", secs)?);
        }
        if let Some(secs) = lookup("FORM_IDLE_SECS") {
            config.form_idle = Duration::from_secs(parse_number("FORM_IDLE_SECS", secs)?);
        }
        if let Some(origins) = lookup("ALLOWED_ORIGINS") {
            config.allowed_origins = origins
                .split(',')
                .map(str::trim)
                .filter(|o| !o.is_empty())
                .map(str::to_string)
                .collect();
        }

        Ok(config)
    }
}

fn parse_number(name: &'static str, value: String) -> Result<u64, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::Invalid {
        name,
        expected: "a whole number of seconds",
        value,
    })
}
