//! Mock responder for testing
//!
//! Useful for unit tests and offline demos without a running LLM server.

use async_trait::async_trait;

use crate::error::{Error, Result};
use crate::router::RouterContext;

use super::Responder;

#[derive(Debug, Clone, Default)]
enum Mode {
    /// Echo the question with the window spend
    #[default]
    Echo,
    Fixed(String),
    Fail(String),
}

/// Predictable responder
#[derive(Debug, Clone, Default)]
pub struct MockResponder {
    mode: Mode,
}

impl MockResponder {
    /// Echoing responder
    pub fn new() -> Self {
        Self::default()
    }

    /// Always answer with `reply`
    pub fn with_reply(reply: impl Into<String>) -> Self {
        Self {
            mode: Mode::Fixed(reply.into()),
        }
    }

    /// Always fail with `message`
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            mode: Mode::Fail(message.into()),
        }
    }
}

#[async_trait]
impl Responder for MockResponder {
    async fn respond(&self, question: &str, context: &RouterContext) -> Result<String> {
        match &self.mode {
            Mode::Echo => Ok(format!(
                "You asked: \"{}\". You spent ${:.2} in the last {} days.",
                question.trim(),
                context.insights.total_spent,
                context.insights.window_days
            )),
            Mode::Fixed(reply) => Ok(reply.clone()),
            Mode::Fail(message) => Err(Error::InvalidData(message.clone())),
        }
    }

    fn name(&self) -> &str {
        "mock"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Category, Transaction};
    use crate::router::QueryRouter;
    use crate::test_utils::{as_of, days_ago, debit};

    #[tokio::test]
    async fn test_mock_echo() {
        let txs = vec![debit("1", days_ago(2), "Coffee", 4.5, Category::FoodDining)];
        let context = QueryRouter::new(&txs)
            .with_reference(as_of())
            .context()
            .unwrap();

        let reply = MockResponder::new()
            .respond("  what about coffee? ", &context)
            .await
            .unwrap();
        assert_eq!(
            reply,
            "You asked: \"what about coffee?\". You spent $4.50 in the last 30 days."
        );
    }

    #[tokio::test]
    async fn test_mock_fixed_and_failing() {
        let txs: Vec<Transaction> = vec![];
        let context = QueryRouter::new(&txs)
            .with_reference(as_of())
            .context()
            .unwrap();

        let fixed = MockResponder::with_reply("42");
        assert_eq!(fixed.respond("anything", &context).await.unwrap(), "42");

        let failing = MockResponder::failing("backend down");
        let err = failing.respond("anything", &context).await.unwrap_err();
        assert!(matches!(err, Error::InvalidData(ref m) if m == "backend down"));
    }
}
