// file: src/query/synthesis.rs
// description: external answer-synthesis client over an OpenAI-compatible chat API
// reference: https://console.groq.com/docs/api-reference

use crate::config::SynthesisConfig;
use crate::error::{AssistantError, Result};
use crate::models::Passage;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

const SYSTEM_PROMPT: &str = "You are a documentation assistant. Answer the question using only \
the provided passages. Cite the source paths you relied on. If the passages do not contain the \
answer, say so.";

/// Collaborator failure taxonomy. The query engine treats every variant the
/// same way: log, fall back to retrieval-only, never fail the query.
#[derive(Error, Debug)]
pub enum SynthesisError {
    #[error("authentication rejected")]
    Auth,

    #[error("rate limited")]
    RateLimited,

    #[error("request timed out")]
    Timeout,

    #[error("network error: {0}")]
    Network(String),
}

impl From<SynthesisError> for AssistantError {
    fn from(e: SynthesisError) -> Self {
        AssistantError::AnswerGeneration(e.to_string())
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
}

#[derive(Debug, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

pub struct SynthesisClient {
    client: Client,
    api_key: String,
    endpoint: String,
    model: String,
}

impl SynthesisClient {
    pub fn new(api_key: String, config: &SynthesisConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| AssistantError::Config(format!("HTTP client setup failed: {}", e)))?;

        Ok(Self {
            client,
            api_key,
            endpoint: config.endpoint.clone(),
            model: config.model.clone(),
        })
    }

    /// Explicit dependency injection: the collaborator exists exactly when an
    /// API key is configured, decided once at startup.
    pub fn from_config(config: &SynthesisConfig) -> Result<Option<Self>> {
        match &config.api_key {
            Some(api_key) => Ok(Some(Self::new(api_key.clone(), config)?)),
            None => Ok(None),
        }
    }

    /// Submit the query plus its retrieved passages and return the
    /// synthesized answer text. The passage context is bounded by
    /// `max_prompt_chars`.
    pub async fn synthesize(
        &self,
        query: &str,
        passages: &[Passage],
        max_prompt_chars: usize,
    ) -> std::result::Result<String, SynthesisError> {
        let context = build_context(passages, max_prompt_chars);

        let request = ChatRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: SYSTEM_PROMPT.to_string(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: format!("Passages:\n\n{}\nQuestion: {}", context, query),
                },
            ],
            temperature: 0.2,
        };

        debug!(
            "Requesting answer synthesis for {} passages ({} context chars)",
            passages.len(),
            context.len()
        );

        let response = self
            .client
            .post(&self.endpoint)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    SynthesisError::Timeout
                } else {
                    SynthesisError::Network(e.to_string())
                }
            })?;

        match response.status() {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => return Err(SynthesisError::Auth),
            StatusCode::TOO_MANY_REQUESTS => return Err(SynthesisError::RateLimited),
            status if !status.is_success() => {
                let body = response
                    .text()
                    .await
                    .unwrap_or_else(|_| "unknown error".to_string());
                return Err(SynthesisError::Network(format!(
                    "status {}: {}",
                    status, body
                )));
            }
            _ => {}
        }

        let chat_response: ChatResponse = response
            .json()
            .await
            .map_err(|e| SynthesisError::Network(format!("malformed response: {}", e)))?;

        chat_response
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| SynthesisError::Network("response contained no choices".to_string()))
    }
}

/// Concatenate passages into the prompt context, stopping once the character
/// budget is spent. The first passage is always included, truncated if it
/// alone exceeds the budget.
fn build_context(passages: &[Passage], max_prompt_chars: usize) -> String {
    let mut context = String::new();

    for passage in passages {
        let snippet = format!("[{}] {}\n\n", passage.source_path, passage.text);

        if context.is_empty() {
            if snippet.chars().count() > max_prompt_chars {
                context.extend(snippet.chars().take(max_prompt_chars));
            } else {
                context.push_str(&snippet);
            }
            continue;
        }

        if context.chars().count() + snippet.chars().count() > max_prompt_chars {
            break;
        }
        context.push_str(&snippet);
    }

    context
}

#[cfg(test)]
mod tests {
    use super::*;

    fn passage(source: &str, text: &str) -> Passage {
        Passage {
            chunk_id: format!("{}_000", source),
            source_path: source.to_string(),
            text: text.to_string(),
            score: 0.5,
        }
    }

    #[test]
    fn test_context_respects_budget() {
        let passages = vec![
            passage("a.txt", "first passage text"),
            passage("b.txt", "second passage text"),
            passage("c.txt", "third passage text"),
        ];

        let context = build_context(&passages, 40);
        assert!(context.contains("a.txt"));
        assert!(!context.contains("c.txt"));
    }

    #[test]
    fn test_first_passage_always_present() {
        let passages = vec![passage("a.txt", &"x".repeat(500))];
        let context = build_context(&passages, 50);
        assert_eq!(context.chars().count(), 50);
    }

    #[test]
    fn test_client_absent_without_api_key() {
        let config = crate::config::Config::default_config().synthesis;
        assert!(SynthesisClient::from_config(&config).unwrap().is_none());
    }

    #[test]
    fn test_client_present_with_api_key() {
        let mut config = crate::config::Config::default_config().synthesis;
        config.api_key = Some("test-key".to_string());
        assert!(SynthesisClient::from_config(&config).unwrap().is_some());
    }
}
