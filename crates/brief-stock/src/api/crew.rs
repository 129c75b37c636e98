//! HTTP client for a crew-style generation service
//!
//! The service runs the performance and recommendation tasks for a symbol
//! and answers with a JSON body carrying `tasks_output`. The body is passed
//! through untouched as a [`GenerationResult::Mapping`]; shape checks happen
//! in the narrative adapter.

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;

use crate::config::StockConfig;
use crate::error::{Result, StockError};
use crate::generation::GenerationResult;
use crate::sources::NarrativeGenerator;

#[derive(Debug, Serialize)]
struct KickoffRequest<'a> {
    inputs: KickoffInputs<'a>,
}

#[derive(Debug, Serialize)]
struct KickoffInputs<'a> {
    stock: &'a str,
}

/// Crew kickoff client
pub struct CrewClient {
    client: Client,
    endpoint: String,
    api_key: Option<String>,
}

impl CrewClient {
    pub fn new(endpoint: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            client: Client::new(),
            endpoint: endpoint.into(),
            api_key,
        }
    }

    /// Build from configuration; the endpoint is required
    pub fn from_config(config: &StockConfig) -> Result<Self> {
        let endpoint = config.generation_endpoint.clone().ok_or_else(|| {
            StockError::ConfigError(
                "generation endpoint required (set CREW_API_URL or generation_endpoint)"
                    .to_string(),
            )
        })?;
        Ok(Self::new(endpoint, config.generation_api_key.clone()))
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Kick off the crew for one symbol and return the decoded body
    pub async fn kickoff(&self, symbol: &str) -> Result<Value> {
        let body = KickoffRequest {
            inputs: KickoffInputs { stock: symbol },
        };

        let mut request = self.client.post(&self.endpoint).json(&body);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| StockError::ApiError(format!("Crew request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(StockError::ApiError(format!("Crew API error {status}: {body}")));
        }

        Ok(response.json::<Value>().await?)
    }
}

#[async_trait]
impl NarrativeGenerator for CrewClient {
    async fn invoke(&self, symbol: &str) -> Result<GenerationResult> {
        tracing::debug!("Requesting narratives for {} from {}", symbol, self.endpoint);
        self.kickoff(symbol).await.map(GenerationResult::Mapping)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kickoff_body() {
        let body = KickoffRequest {
            inputs: KickoffInputs { stock: "AAPL" },
        };
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            serde_json::json!({"inputs": {"stock": "AAPL"}})
        );
    }

    #[test]
    fn test_from_config_requires_endpoint() {
        assert!(CrewClient::from_config(&StockConfig::default()).is_err());

        let config = StockConfig::builder()
            .generation_endpoint("http://localhost:8000/kickoff")
            .build()
            .unwrap();
        let client = CrewClient::from_config(&config).unwrap();
        assert_eq!(client.endpoint(), "http://localhost:8000/kickoff");
    }
}
