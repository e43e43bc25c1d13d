//! Free-form question responders
//!
//! The query router answers questions it recognizes itself. Anything else
//! goes to an optional [`Responder`], typically a local LLM.
//!
//! # Configuration
//!
//! Environment variables:
//! - `RESPONDER_BACKEND`: Backend to use (ollama, mock). Default: ollama
//! - `OLLAMA_HOST`: Ollama server URL (required for ollama backend)
//! - `OLLAMA_MODEL`: Model name (default: llama3.2)

mod mock;
mod ollama;

pub use mock::MockResponder;
pub use ollama::OllamaResponder;

use async_trait::async_trait;

use crate::error::Result;
use crate::router::RouterContext;

/// Capability for answering questions the router has no rule for
#[async_trait]
pub trait Responder: Send + Sync {
    /// Answer `question` given a snapshot of the user's finances
    async fn respond(&self, question: &str, context: &RouterContext) -> Result<String>;

    /// Backend name (for logging)
    fn name(&self) -> &str;
}

/// Concrete responder enum
///
/// Provides Clone and compile-time dispatch without Box<dyn> overhead.
#[derive(Clone)]
pub enum ResponderClient {
    /// Ollama backend (HTTP API)
    Ollama(OllamaResponder),
    /// Mock backend for testing and offline demos
    Mock(MockResponder),
}

impl ResponderClient {
    /// Create a responder from environment variables
    ///
    /// Returns None if the required environment variables are not set.
    pub fn from_env() -> Option<Self> {
        let backend = std::env::var("RESPONDER_BACKEND").unwrap_or_else(|_| "ollama".to_string());

        match backend.to_lowercase().as_str() {
            "ollama" => OllamaResponder::from_env().map(ResponderClient::Ollama),
            "mock" => Some(ResponderClient::Mock(MockResponder::new())),
            _ => {
                tracing::warn!(backend = %backend, "Unknown RESPONDER_BACKEND, falling back to ollama");
                OllamaResponder::from_env().map(ResponderClient::Ollama)
            }
        }
    }

    /// Create an Ollama responder directly
    pub fn ollama(host: &str, model: &str) -> Self {
        ResponderClient::Ollama(OllamaResponder::new(host, model))
    }

    /// Create a mock responder for testing
    pub fn mock() -> Self {
        ResponderClient::Mock(MockResponder::new())
    }
}

#[async_trait]
impl Responder for ResponderClient {
    async fn respond(&self, question: &str, context: &RouterContext) -> Result<String> {
        match self {
            ResponderClient::Ollama(r) => r.respond(question, context).await,
            ResponderClient::Mock(r) => r.respond(question, context).await,
        }
    }

    fn name(&self) -> &str {
        match self {
            ResponderClient::Ollama(r) => r.name(),
            ResponderClient::Mock(r) => r.name(),
        }
    }
}
