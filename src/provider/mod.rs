//! Text-generation provider contract.
//!
//! The oracle only needs "send a prompt with a system instruction, get text
//! back". [`TextProvider`] is that seam; [`GeminiClient`] is the production
//! implementation and tests substitute scripted providers.

mod gemini;
mod types;

pub use gemini::*;
pub use types::*;

use async_trait::async_trait;
use thiserror::Error;

/// Why a provider call failed.
///
/// Callers outside the oracle never see these directly; they are kept apart
/// so logs can tell a dropped connection from a rejected key.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("network failure: {0}")]
    NetworkFailure(#[from] reqwest::Error),

    #[error("provider rejected the request ({status}): {message}")]
    ProviderRejected { status: u16, message: String },

    #[error("malformed provider response: {0}")]
    MalformedResponse(String),
}

/// One generation call.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    pub model: String,
    /// The user prompt.
    pub contents: String,
    pub system_instruction: String,
    pub temperature: f32,
    pub top_p: f32,
}

/// What came back. `text` is `None` when the provider produced no text parts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerationResponse {
    pub text: Option<String>,
}

#[async_trait]
pub trait TextProvider: Send + Sync {
    async fn generate_content(
        &self,
        request: &GenerationRequest,
    ) -> Result<GenerationResponse, ProviderError>;
}
