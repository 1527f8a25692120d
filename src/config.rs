//! Process configuration
//!
//! Built once at startup from the environment (after `.env` is loaded) and
//! passed by reference into the clients that need it.

use crate::error::AgentError;
use crate::Result;
use reqwest::Client;
use std::env;
use std::time::Duration;

pub const DEFAULT_ANALYTICS_ENDPOINT: &str = "https://streaming.bitquery.io/eap";
pub const DEFAULT_REGISTRY_URL: &str = "https://api.onchainbrain.xyz";

#[derive(Debug, Clone)]
pub struct Config {
    pub analytics_api_key: String,
    pub analytics_endpoint: String,
    pub registry_url: String,
    /// `None` means requests may wait indefinitely.
    pub request_timeout: Option<Duration>,
}

impl Config {
    /// Read configuration from process environment.
    ///
    /// Fails when `BITQUERY_API_KEY` is missing or blank, or when
    /// `HTTP_TIMEOUT_SECS` is not a whole number of seconds.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`Config::from_env`] but over an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let analytics_api_key = lookup("BITQUERY_API_KEY")
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .ok_or_else(|| {
                AgentError::ConfigError("Missing BITQUERY_API_KEY in environment".to_string())
            })?;

        let analytics_endpoint = lookup("BITQUERY_ENDPOINT")
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_ANALYTICS_ENDPOINT.to_string());

        let registry_url = lookup("ONCHAINBRAIN_API_URL")
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_REGISTRY_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        let request_timeout = match lookup("HTTP_TIMEOUT_SECS") {
            Some(raw) if !raw.trim().is_empty() => {
                let secs: u64 = raw.trim().parse().map_err(|_| {
                    AgentError::ConfigError(format!(
                        "HTTP_TIMEOUT_SECS must be a whole number of seconds, got {:?}",
                        raw
                    ))
                })?;
                Some(Duration::from_secs(secs))
            }
            _ => None,
        };

        Ok(Self {
            analytics_api_key,
            analytics_endpoint,
            registry_url,
            request_timeout,
        })
    }

    /// Long-lived pooled HTTP client shared by the analytics and registry clients
    pub fn http_client(&self) -> Result<Client> {
        let mut builder = Client::builder()
            .pool_idle_timeout(Duration::from_secs(90))
            .pool_max_idle_per_host(8);

        if let Some(timeout) = self.request_timeout {
            builder = builder.timeout(timeout);
        }

        Ok(builder.build()?)
    }
}
