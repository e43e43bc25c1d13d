//! Test utilities for fincopilot-core
//!
//! Transaction builders pinned to a fixed reference instant, plus a mock
//! Ollama server for exercising the HTTP responder without a running LLM.

use axum::{
    extract::Json,
    routing::{get, post},
    Router,
};
use chrono::{Duration, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use tokio::sync::oneshot;

use crate::models::{Category, Direction, Transaction};

/// Reference instant used by tests: 2026-06-15 12:00
pub fn as_of() -> NaiveDateTime {
    at(2026, 6, 15)
}

/// Noon on the given date
pub fn at(year: i32, month: u32, day: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(year, month, day)
        .unwrap()
        .and_hms_opt(12, 0, 0)
        .unwrap()
}

/// `n` days before [`as_of`]
pub fn days_ago(n: i64) -> NaiveDateTime {
    as_of() - Duration::days(n)
}

/// Build a debit
pub fn debit(
    id: &str,
    timestamp: NaiveDateTime,
    description: &str,
    amount: f64,
    category: Category,
) -> Transaction {
    Transaction::new(id, timestamp, description, amount, Direction::Debit, category).unwrap()
}

/// Build a credit
pub fn credit(
    id: &str,
    timestamp: NaiveDateTime,
    description: &str,
    amount: f64,
    category: Category,
) -> Transaction {
    Transaction::new(id, timestamp, description, amount, Direction::Credit, category).unwrap()
}

/// Mock Ollama server for testing and development
pub struct MockOllamaServer {
    addr: SocketAddr,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl MockOllamaServer {
    /// Start the mock server on an available port
    pub async fn start() -> Self {
        let app = Router::new()
            .route("/api/tags", get(handle_tags))
            .route("/api/generate", post(handle_generate));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let (shutdown_tx, shutdown_rx) = oneshot::channel();

        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    shutdown_rx.await.ok();
                })
                .await
                .unwrap();
        });

        Self {
            addr,
            shutdown_tx: Some(shutdown_tx),
        }
    }

    /// Get the base URL for this mock server
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Stop the mock server
    pub fn stop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

impl Drop for MockOllamaServer {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Ollama tags endpoint response (health check)
async fn handle_tags() -> Json<TagsResponse> {
    Json(TagsResponse {
        models: vec![ModelInfo {
            name: "llama3.2:latest".to_string(),
            size: 4_000_000_000,
        }],
    })
}

/// Ollama generate endpoint
///
/// Answers with the question line of the prompt and whether the financial
/// context block was present, so callers can assert what was sent.
async fn handle_generate(Json(request): Json<GenerateRequest>) -> Json<GenerateResponse> {
    let question = request
        .prompt
        .lines()
        .find_map(|line| line.strip_prefix("User Question: "))
        .unwrap_or("")
        .trim()
        .to_string();
    let has_context = request.prompt.contains("Financial Context:");

    Json(GenerateResponse {
        model: request.model,
        response: format!("Mock answer to \"{}\" (context: {})", question, has_context),
        done: true,
    })
}

#[derive(Debug, Serialize)]
struct TagsResponse {
    models: Vec<ModelInfo>,
}

#[derive(Debug, Serialize)]
struct ModelInfo {
    name: String,
    size: u64,
}

#[derive(Debug, Deserialize)]
struct GenerateRequest {
    model: String,
    prompt: String,
    #[serde(default)]
    #[allow(dead_code)]
    stream: bool,
}

#[derive(Debug, Serialize)]
struct GenerateResponse {
    model: String,
    response: String,
    done: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builders() {
        let tx = debit("1", days_ago(2), "Coffee", 4.0, Category::FoodDining);
        assert!(tx.is_debit());
        assert_eq!(tx.date(), NaiveDate::from_ymd_opt(2026, 6, 13).unwrap());
    }

    #[tokio::test]
    async fn test_mock_server_health_check() {
        let server = MockOllamaServer::start().await;
        let resp = reqwest::get(format!("{}/api/tags", server.url()))
            .await
            .unwrap();
        assert!(resp.status().is_success());
    }
}
