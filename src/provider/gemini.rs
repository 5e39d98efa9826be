//! HTTP client for the Gemini `generateContent` API.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use super::types::{
    Content, ErrorEnvelope, GenerateContentRequest, GenerateContentResponse, GenerationConfig,
};
use super::{GenerationRequest, GenerationResponse, ProviderError, TextProvider};
use crate::config::Config;

/// Public Gemini endpoint.
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Model the readings are tuned for.
pub const DEFAULT_MODEL: &str = "gemini-3-flash-preview";

#[derive(Debug, Clone)]
pub struct GeminiClient {
    base_url: String,
    api_key: String,
    client: Client,
}

impl GeminiClient {
    /// Create with explicit configuration and no request timeout.
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: trim_base(base_url.into()),
            api_key: api_key.into(),
            client: Client::new(),
        }
    }

    /// Create with a per-request timeout.
    pub fn with_timeout(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, ProviderError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            base_url: trim_base(base_url.into()),
            api_key: api_key.into(),
            client,
        })
    }

    /// Create from resolved configuration. Fails when no API key is set.
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let api_key = config.require_api_key()?;
        let client = match config.request_timeout() {
            Some(timeout) => Self::with_timeout(&config.base_url, api_key, timeout)?,
            None => Self::new(&config.base_url, api_key),
        };
        Ok(client)
    }

    fn endpoint(&self, model: &str) -> String {
        format!("{}/v1beta/models/{}:generateContent", self.base_url, model)
    }

    fn to_wire(request: &GenerationRequest) -> GenerateContentRequest {
        GenerateContentRequest {
            contents: vec![Content::text(Some("user"), request.contents.clone())],
            system_instruction: Content::text(None, request.system_instruction.clone()),
            generation_config: GenerationConfig {
                temperature: request.temperature,
                top_p: request.top_p,
            },
        }
    }

    /// Map a response to text or a tagged error.
    async fn handle_response(
        &self,
        response: reqwest::Response,
    ) -> Result<GenerateContentResponse, ProviderError> {
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            let message = serde_json::from_str::<ErrorEnvelope>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            return Err(ProviderError::ProviderRejected {
                status: status.as_u16(),
                message,
            });
        }
        serde_json::from_str(&body).map_err(|e| ProviderError::MalformedResponse(e.to_string()))
    }
}

#[async_trait]
impl TextProvider for GeminiClient {
    async fn generate_content(
        &self,
        request: &GenerationRequest,
    ) -> Result<GenerationResponse, ProviderError> {
        tracing::debug!(model = %request.model, "sending generateContent request");
        let response = self
            .client
            .post(self.endpoint(&request.model))
            .header("x-goog-api-key", &self.api_key)
            .json(&Self::to_wire(request))
            .send()
            .await?;
        let parsed = self.handle_response(response).await?;
        Ok(GenerationResponse {
            text: parsed.text(),
        })
    }
}

fn trim_base(url: String) -> String {
    url.trim_end_matches('/').to_string()
}
