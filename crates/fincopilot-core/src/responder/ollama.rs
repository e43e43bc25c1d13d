//! Ollama responder
//!
//! Sends the question together with a rendered financial context to
//! Ollama's `/api/generate` endpoint (non-streaming).

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::Result;
use crate::router::RouterContext;

use super::Responder;

/// HTTP client for a local Ollama server
#[derive(Clone)]
pub struct OllamaResponder {
    http_client: Client,
    base_url: String,
    model: String,
}

impl OllamaResponder {
    pub fn new(base_url: &str, model: &str) -> Self {
        Self {
            http_client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
        }
    }

    /// Create from environment variables
    pub fn from_env() -> Option<Self> {
        let host = std::env::var("OLLAMA_HOST").ok()?;
        let model = std::env::var("OLLAMA_MODEL").unwrap_or_else(|_| "llama3.2".to_string());
        Some(Self::new(&host, &model))
    }

    /// Same server, different model
    pub fn with_model(&self, model: &str) -> Self {
        Self {
            http_client: self.http_client.clone(),
            base_url: self.base_url.clone(),
            model: model.to_string(),
        }
    }

    pub fn host(&self) -> &str {
        &self.base_url
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Check if the server is reachable
    pub async fn health_check(&self) -> bool {
        match self
            .http_client
            .get(format!("{}/api/tags", self.base_url))
            .send()
            .await
        {
            Ok(resp) => resp.status().is_success(),
            Err(_) => false,
        }
    }
}

/// Prompt sent for a free-form question
fn build_prompt(question: &str, context: &RouterContext) -> String {
    format!(
        "You are a personal finance assistant. Answer the user's question using only \
         the figures below. Be concise and practical.\n\n\
         Financial Context:\n{}\n\
         User Question: {}\n",
        context.render(),
        question.trim()
    )
}

/// Request to Ollama API
#[derive(Debug, Serialize)]
struct OllamaRequest {
    model: String,
    prompt: String,
    stream: bool,
}

/// Response from Ollama API
#[derive(Debug, Deserialize)]
struct OllamaResponse {
    response: String,
}

#[async_trait]
impl Responder for OllamaResponder {
    async fn respond(&self, question: &str, context: &RouterContext) -> Result<String> {
        let request = OllamaRequest {
            model: self.model.clone(),
            prompt: build_prompt(question, context),
            stream: false,
        };

        let response = self
            .http_client
            .post(format!("{}/api/generate", self.base_url))
            .json(&request)
            .send()
            .await?
            .error_for_status()?;

        let ollama_response: OllamaResponse = response.json().await?;
        debug!(model = %self.model, "Ollama response: {}", ollama_response.response);

        Ok(ollama_response.response.trim().to_string())
    }

    fn name(&self) -> &str {
        "ollama"
    }
}
