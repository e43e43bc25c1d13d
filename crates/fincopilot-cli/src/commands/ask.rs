//! Question answering command

use anyhow::{Context, Result};
use fincopilot_core::{Intent, Responder, ResponderClient};
use serde_json::json;
use tracing::debug;

use super::{print_json, Session};

/// Route a question, delegating unrecognized ones to `responder` if given
pub async fn answer_question(
    session: &Session,
    question: &str,
    responder: Option<ResponderClient>,
) -> Result<String> {
    let mut router = session.router();
    if let Some(responder) = responder {
        debug!(responder = responder.name(), "Responder attached");
        router = router.with_responder(responder);
    }

    router
        .ask(question)
        .await
        .context("Failed to answer question")
}

pub async fn cmd_ask(session: &Session, question: &str) -> Result<()> {
    let responder = ResponderClient::from_env();
    if responder.is_none() {
        debug!("No responder configured (set OLLAMA_HOST or RESPONDER_BACKEND=mock)");
    }

    let answer = answer_question(session, question, responder).await?;

    if session.json {
        let intent = Intent::classify(question).map(|i| i.as_str());
        return print_json(&json!({
            "question": question,
            "intent": intent,
            "answer": answer,
        }));
    }

    println!();
    println!("{}", answer);
    Ok(())
}
