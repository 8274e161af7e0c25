//! Data service connection settings, read once at startup.

use reqwest::Url;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

use crate::gateway::{DataGateway, HttpDataGateway, InMemoryDataGateway};

pub const DATA_SERVICE_URL: &str = "DATA_SERVICE_URL";
pub const DATA_SERVICE_TIMEOUT_MS: &str = "DATA_SERVICE_TIMEOUT_MS";
pub const DATA_SERVICE_CONNECT_TIMEOUT_MS: &str = "DATA_SERVICE_CONNECT_TIMEOUT_MS";

const DEFAULT_TIMEOUT_MS: u64 = 5_000;
const DEFAULT_CONNECT_TIMEOUT_MS: u64 = 2_000;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{name} must be a whole number of milliseconds, got {value:?}")]
    InvalidNumber { name: &'static str, value: String },

    #[error("DATA_SERVICE_URL is not a usable http(s) base url: {0}")]
    InvalidUrl(String),

    #[error("failed to build http client: {0}")]
    Client(String),
}

/// Where the persistence tier lives and how long to wait for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayConfig {
    /// `None` selects the in-process gateway.
    pub base_url: Option<Url>,
    pub timeout: Duration,
    pub connect_timeout: Duration,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
            connect_timeout: Duration::from_millis(DEFAULT_CONNECT_TIMEOUT_MS),
        }
    }
}

impl GatewayConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Same as [`GatewayConfig::from_env`], with an injectable variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let base_url = match lookup(DATA_SERVICE_URL).filter(|v| !v.trim().is_empty()) {
            Some(raw) => Some(parse_base_url(raw.trim())?),
            None => None,
        };

        Ok(Self {
            base_url,
            timeout: millis(&lookup, DATA_SERVICE_TIMEOUT_MS, DEFAULT_TIMEOUT_MS)?,
            connect_timeout: millis(
                &lookup,
                DATA_SERVICE_CONNECT_TIMEOUT_MS,
                DEFAULT_CONNECT_TIMEOUT_MS,
            )?,
        })
    }

    /// Build the gateway this configuration selects.
    pub fn build_gateway(&self) -> Result<Arc<dyn DataGateway>, ConfigError> {
        match &self.base_url {
            Some(url) => {
                tracing::info!(data_service = %url, "using http data gateway");
                Ok(Arc::new(HttpDataGateway::new(url.clone(), self)?))
            }
            None => {
                tracing::warn!(
                    "DATA_SERVICE_URL not set; using the in-memory data gateway (development only)"
                );
                Ok(Arc::new(InMemoryDataGateway::new()))
            }
        }
    }
}

fn parse_base_url(raw: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(raw).map_err(|e| ConfigError::InvalidUrl(format!("{raw}: {e}")))?;
    if !matches!(url.scheme(), "http" | "https") || url.cannot_be_a_base() {
        return Err(ConfigError::InvalidUrl(raw.to_string()));
    }
    Ok(url)
}

fn millis<F>(lookup: &F, name: &'static str, default: u64) -> Result<Duration, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(name) {
        None => Ok(Duration::from_millis(default)),
        Some(value) => value
            .trim()
            .parse::<u64>()
            .map(Duration::from_millis)
            .map_err(|_| ConfigError::InvalidNumber { name, value }),
    }
}
