//! Client configuration parsed from environment variables.

pub const DEFAULT_BASE_URL: &str = "http://localhost:8080";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 5;
pub const DEFAULT_EVENT_CAPACITY: usize = 64;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid base URL '{0}' (expected http:// or https://)")]
    InvalidBaseUrl(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeouts {
    pub request_secs: u64,
    pub connect_secs: u64,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self { request_secs: DEFAULT_REQUEST_TIMEOUT_SECS, connect_secs: DEFAULT_CONNECT_TIMEOUT_SECS }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Backend root without a trailing slash.
    pub base_url: String,
    pub timeouts: Timeouts,
    /// Capacity of the coordinator's event broadcast channel.
    pub event_capacity: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_owned(),
            timeouts: Timeouts::default(),
            event_capacity: DEFAULT_EVENT_CAPACITY,
        }
    }
}

impl ClientConfig {
    /// Build typed client config from environment variables.
    ///
    /// Optional:
    /// - `TASKFLOW_BASE_URL`: default `http://localhost:8080`
    /// - `TASKFLOW_REQUEST_TIMEOUT_SECS`: default 10
    /// - `TASKFLOW_CONNECT_TIMEOUT_SECS`: default 5
    /// - `TASKFLOW_EVENT_CAPACITY`: default 64
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is not an http(s) URL.
    pub fn from_env() -> Result<Self, ConfigError> {
        let base_url = std::env::var("TASKFLOW_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_owned());
        let timeouts = Timeouts {
            request_secs: env_parse("TASKFLOW_REQUEST_TIMEOUT_SECS", DEFAULT_REQUEST_TIMEOUT_SECS),
            connect_secs: env_parse("TASKFLOW_CONNECT_TIMEOUT_SECS", DEFAULT_CONNECT_TIMEOUT_SECS),
        };
        let event_capacity = env_parse("TASKFLOW_EVENT_CAPACITY", DEFAULT_EVENT_CAPACITY).max(1);

        Self { base_url: String::new(), timeouts, event_capacity }.with_base_url(&base_url)
    }

    /// Replace the base URL after validating it.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is not an http(s) URL.
    pub fn with_base_url(mut self, raw: &str) -> Result<Self, ConfigError> {
        self.base_url = normalize_base_url(raw)?;
        Ok(self)
    }
}

fn normalize_base_url(raw: &str) -> Result<String, ConfigError> {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        Ok(trimmed.to_owned())
    } else {
        Err(ConfigError::InvalidBaseUrl(raw.to_owned()))
    }
}

fn env_parse<T>(key: &str, default: T) -> T
where
    T: std::str::FromStr + Copy,
{
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse::<T>().ok())
        .unwrap_or(default)
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
