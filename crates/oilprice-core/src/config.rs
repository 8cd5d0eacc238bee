//! Gateway configuration.
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `OILPRICE_API_BASE_URL` | `https://api.oilpriceapi.com/v1` | API base URL |
//! | `OILPRICE_TIMEOUT_MS` | unset | Per-request timeout; unset keeps the transport default |

use crate::ValidationError;

pub const DEFAULT_BASE_URL: &str = "https://api.oilpriceapi.com/v1";
pub const DEFAULT_USER_AGENT: &str = concat!("oilprice/", env!("CARGO_PKG_VERSION"));

pub const BASE_URL_ENV: &str = "OILPRICE_API_BASE_URL";
pub const TIMEOUT_ENV: &str = "OILPRICE_TIMEOUT_MS";
pub const API_KEY_ENV: &str = "OILPRICE_API_KEY";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayConfig {
    pub base_url: String,
    pub timeout_ms: Option<u64>,
    pub user_agent: String,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            base_url: String::from(DEFAULT_BASE_URL),
            timeout_ms: None,
            user_agent: String::from(DEFAULT_USER_AGENT),
        }
    }
}

impl GatewayConfig {
    pub fn from_env() -> Result<Self, ValidationError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds a config from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ValidationError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(base_url) = lookup(BASE_URL_ENV).filter(|value| !value.trim().is_empty()) {
            config = config.with_base_url(base_url);
        }

        if let Some(raw) = lookup(TIMEOUT_ENV).filter(|value| !value.trim().is_empty()) {
            let timeout_ms = raw.trim().parse::<u64>().map_err(|_| {
                ValidationError::InvalidArgument("OILPRICE_TIMEOUT_MS must be a whole number")
            })?;
            config.timeout_ms = Some(timeout_ms);
        }

        Ok(config)
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        self.base_url = base_url.trim().trim_end_matches('/').to_owned();
        self
    }

    pub fn with_timeout_ms(mut self, timeout_ms: Option<u64>) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}
