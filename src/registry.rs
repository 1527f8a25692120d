//! Agent registry client
//!
//! Thin HTTP wrapper over the OnChainBrain backend. Callers decide how to
//! degrade on failure; this layer only reports what went wrong.

use crate::config::Config;
use crate::error::AgentError;
use crate::models::{Agent, AgentDetails, AgentProfile};
use crate::Result;
use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

/// Registry operations used by the orchestrator
#[async_trait]
pub trait AgentRegistry: Send + Sync {
    async fn exists(&self, name: &str) -> Result<bool>;
    async fn agent(&self, name: &str) -> Result<AgentProfile>;
    async fn list(&self) -> Result<Vec<Agent>>;
    async fn store(&self, name: &str, details: &AgentDetails) -> Result<()>;
}

pub struct HttpRegistry {
    client: Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct ExistsResponse {
    exists: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct StoreAgentRequest<'a> {
    agent_name: &'a str,
    agent_details: &'a AgentDetails,
}

impl HttpRegistry {
    pub fn new(client: Client, config: &Config) -> Self {
        Self {
            client,
            base_url: config.registry_url.clone(),
        }
    }

    /// Base URL joined with percent-encoded path segments
    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let invalid =
            || AgentError::ConfigError(format!("invalid registry URL: {}", self.base_url));

        let mut url = Url::parse(&self.base_url).map_err(|_| invalid())?;
        url.path_segments_mut()
            .map_err(|_| invalid())?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(&self, segments: &[&str]) -> Result<T> {
        let url = self.endpoint(segments)?;
        debug!(%url, "Registry GET");

        let response = self.client.get(url.clone()).send().await.map_err(|e| {
            error!("Error communicating with backend: {}", e);
            AgentError::NetworkFailure(e.to_string())
        })?;

        let status = response.status();
        if !status.is_success() {
            error!(%url, %status, "Registry returned a non-success status");
            return Err(AgentError::ServiceError(format!(
                "Registry returned {} for {}",
                status,
                url.path()
            )));
        }

        response.json::<T>().await.map_err(|e| {
            error!("Invalid registry response: {}", e);
            AgentError::DecodeError(format!("Invalid registry response: {}", e))
        })
    }
}

#[async_trait]
impl AgentRegistry for HttpRegistry {
    async fn exists(&self, name: &str) -> Result<bool> {
        let body: ExistsResponse = self.get_json(&["exists", name]).await?;
        Ok(body.exists)
    }

    async fn agent(&self, name: &str) -> Result<AgentProfile> {
        self.get_json(&["agent", name]).await
    }

    async fn list(&self) -> Result<Vec<Agent>> {
        self.get_json(&["agents"]).await
    }

    async fn store(&self, name: &str, details: &AgentDetails) -> Result<()> {
        let url = self.endpoint(&["store-agent"])?;

        let response = self
            .client
            .post(url)
            .json(&StoreAgentRequest {
                agent_name: name,
                agent_details: details,
            })
            .send()
            .await
            .map_err(|e| {
                error!("Error storing agent details through backend: {}", e);
                AgentError::NetworkFailure(e.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(AgentError::ServiceError(format!(
                "Error storing agent details: {}",
                status
            )));
        }

        Ok(())
    }
}
