use reqwest::Url;
use std::time::Duration;
use thiserror::Error;

pub const API_URL_VAR: &str = "MESSENGER_API_URL";
pub const TIMEOUT_VAR: &str = "MESSENGER_REQUEST_TIMEOUT_SECS";
const DEFAULT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("{0} is not set")]
    Missing(&'static str),
    #[error("{var} is invalid: {reason}")]
    Invalid { var: &'static str, reason: String },
}

/// Where the backend lives and how long a single request may take.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub base_url: Url,
    pub request_timeout: Duration,
}

impl Config {
    pub fn new(base_url: &str, request_timeout: Duration) -> Result<Self, ConfigError> {
        let mut base_url = Url::parse(base_url.trim()).map_err(|e| ConfigError::Invalid {
            var: API_URL_VAR,
            reason: e.to_string(),
        })?;
        if !matches!(base_url.scheme(), "http" | "https") {
            return Err(ConfigError::Invalid {
                var: API_URL_VAR,
                reason: format!("unsupported scheme `{}`", base_url.scheme()),
            });
        }
        // Url::join drops the last path segment unless it ends with a slash.
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        if request_timeout.is_zero() {
            return Err(ConfigError::Invalid { var: TIMEOUT_VAR, reason: "must be greater than zero".into() });
        }
        Ok(Self { base_url, request_timeout })
    }

    /// Reads the process environment (and `.env` on native targets); on wasm the
    /// values are fixed at compile time.
    pub fn from_env() -> Result<Self, ConfigError> {
        #[cfg(not(target_arch = "wasm32"))]
        {
            let _ = dotenvy::dotenv();
            Self::from_lookup(|key| std::env::var(key).ok())
        }
        #[cfg(target_arch = "wasm32")]
        {
            Self::from_lookup(|key| match key {
                API_URL_VAR => option_env!("MESSENGER_API_URL").map(str::to_string),
                TIMEOUT_VAR => option_env!("MESSENGER_REQUEST_TIMEOUT_SECS").map(str::to_string),
                _ => None,
            })
        }
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let base_url = lookup(API_URL_VAR)
            .filter(|v| !v.trim().is_empty())
            .ok_or(ConfigError::Missing(API_URL_VAR))?;
        let timeout_secs = match lookup(TIMEOUT_VAR) {
            Some(raw) => raw.trim().parse::<u64>().map_err(|e| ConfigError::Invalid {
                var: TIMEOUT_VAR,
                reason: e.to_string(),
            })?,
            None => DEFAULT_TIMEOUT_SECS,
        };
        Self::new(&base_url, Duration::from_secs(timeout_secs))
    }

    pub fn messages_url(&self) -> Url {
        self.endpoint("messages")
    }

    pub fn send_url(&self) -> Url {
        self.endpoint("send")
    }

    pub fn status_url(&self) -> Url {
        self.base_url.clone()
    }

    pub fn ledger_image_url(&self) -> Url {
        self.endpoint("blockchain/image")
    }

    fn endpoint(&self, path: &str) -> Url {
        // Relative joins onto an http(s) base cannot fail.
        self.base_url.join(path).unwrap_or_else(|_| self.base_url.clone())
    }
}
