//! Test providers shared by the integration specs.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::Notify;

use tianji::oracle::Oracle;
use tianji::provider::{GenerationRequest, GenerationResponse, ProviderError, TextProvider};

/// What a [`ScriptedProvider`] answers with.
#[derive(Debug, Clone)]
pub enum Reply {
    Text(Option<String>),
    Rejected(u16, String),
    Malformed,
}

/// Answers every call with the same reply and records what it was sent.
pub struct ScriptedProvider {
    reply: Reply,
    calls: AtomicUsize,
    last_request: Mutex<Option<GenerationRequest>>,
}

impl ScriptedProvider {
    pub fn new(reply: Reply) -> Arc<Self> {
        Arc::new(Self {
            reply,
            calls: AtomicUsize::new(0),
            last_request: Mutex::new(None),
        })
    }

    pub fn text(text: &str) -> Arc<Self> {
        Self::new(Reply::Text(Some(text.to_string())))
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_request(&self) -> Option<GenerationRequest> {
        self.last_request.lock().unwrap().clone()
    }
}

#[async_trait]
impl TextProvider for ScriptedProvider {
    async fn generate_content(
        &self,
        request: &GenerationRequest,
    ) -> Result<GenerationResponse, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_request.lock().unwrap() = Some(request.clone());
        match &self.reply {
            Reply::Text(text) => Ok(GenerationResponse { text: text.clone() }),
            Reply::Rejected(status, message) => Err(ProviderError::ProviderRejected {
                status: *status,
                message: message.clone(),
            }),
            Reply::Malformed => Err(ProviderError::MalformedResponse(
                "expected value at line 1 column 1".to_string(),
            )),
        }
    }
}

/// Blocks inside the call until released, so a request can be held in flight.
pub struct GatedProvider {
    pub entered: Arc<Notify>,
    pub release: Arc<Notify>,
    text: String,
}

impl GatedProvider {
    pub fn new(text: &str) -> Arc<Self> {
        Arc::new(Self {
            entered: Arc::new(Notify::new()),
            release: Arc::new(Notify::new()),
            text: text.to_string(),
        })
    }
}

#[async_trait]
impl TextProvider for GatedProvider {
    async fn generate_content(
        &self,
        _request: &GenerationRequest,
    ) -> Result<GenerationResponse, ProviderError> {
        self.entered.notify_one();
        self.release.notified().await;
        Ok(GenerationResponse {
            text: Some(self.text.clone()),
        })
    }
}

pub fn oracle_with(provider: Arc<dyn TextProvider>) -> Oracle {
    Oracle::new(provider, "gemini-test")
}
