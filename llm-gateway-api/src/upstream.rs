//! OpenAI-compatible model listing client.

use async_trait::async_trait;
use llm_gateway_core::{UpstreamClient, UpstreamError};
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;
use url::Url;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpstreamConfig {
    pub timeout: Duration,
    pub connect_timeout: Duration,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ModelsEnvelope {
    #[serde(default)]
    data: Vec<ModelEntry>,
    #[serde(default)]
    success: bool,
}

#[derive(Debug, Deserialize)]
struct ModelEntry {
    id: String,
}

/// Calls `GET {base_url}/v1/models` with bearer authentication. One attempt
/// per call, bounded by the configured timeouts.
#[derive(Debug, Clone)]
pub struct OpenAiCompatibleClient {
    http: Client,
}

impl OpenAiCompatibleClient {
    pub fn new(config: UpstreamConfig) -> Result<Self, reqwest::Error> {
        let http = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .build()?;
        Ok(Self { http })
    }
}

fn models_url(base_url: &str) -> Result<Url, UpstreamError> {
    let base = format!("{}/", base_url.trim().trim_end_matches('/'));
    Url::parse(&base)
        .and_then(|url| url.join("v1/models"))
        .map_err(|e| UpstreamError::Transport {
            url: base_url.to_string(),
            message: format!("invalid base URL: {}", e),
        })
}

#[async_trait]
impl UpstreamClient for OpenAiCompatibleClient {
    async fn list_models(&self, base_url: &str, key: &str) -> Result<Vec<String>, UpstreamError> {
        let url = models_url(base_url)?;
        let url_text = url.to_string();
        debug!(url = %url_text, "fetching upstream models");

        let transport = |message: String| UpstreamError::Transport {
            url: url_text.clone(),
            message,
        };

        let response = self
            .http
            .get(url)
            .bearer_auth(key)
            .send()
            .await
            .map_err(|e| transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(transport(format!("upstream returned status {}", status)));
        }

        let body = response.bytes().await.map_err(|e| transport(e.to_string()))?;
        let envelope: ModelsEnvelope =
            serde_json::from_slice(&body).map_err(|e| UpstreamError::Decode {
                url: url_text.clone(),
                message: e.to_string(),
            })?;

        if !envelope.success {
            return Err(UpstreamError::Rejected { url: url_text });
        }

        Ok(envelope.data.into_iter().map(|m| m.id).collect())
    }
}
