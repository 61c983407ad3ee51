/*!
 * Completion Client
 * Timeout-bounded HTTP calls to an OpenAI-style completion endpoint
 */

use super::types::{
    ChatMessage, ChatRequest, ChatResponse, CompletionError, CompletionResult, SYSTEM_PROMPT,
};
use crate::config::Config;
use std::time::Duration;
use tracing::debug;

/// One synchronous (from the caller's point of view) completion call.
///
/// Implementations must respect a bounded timeout and are permitted to
/// fail; the pipe converts every failure to the fixed fallback reply.
#[tonic::async_trait]
pub trait CompletionClient: Send + Sync {
    async fn complete(&self, prompt: &str) -> CompletionResult<String>;
}

/// HTTP client for a chat-completions endpoint
pub struct HttpCompletionClient {
    http: reqwest::Client,
    url: String,
    model: String,
    api_key: String,
}

impl HttpCompletionClient {
    pub fn new(config: &Config) -> CompletionResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;
        Ok(Self {
            http,
            url: config.completion_url.clone(),
            model: config.completion_model.clone(),
            api_key: config.api_key.clone(),
        })
    }
}

#[tonic::async_trait]
impl CompletionClient for HttpCompletionClient {
    async fn complete(&self, prompt: &str) -> CompletionResult<String> {
        let request = ChatRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: SYSTEM_PROMPT.to_string(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: prompt.to_string(),
                },
            ],
        };

        let response: ChatResponse = self
            .http
            .post(&self.url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let choice = response
            .choices
            .into_iter()
            .next()
            .ok_or(CompletionError::EmptyChoices)?;
        debug!("completion reply received");
        Ok(choice.message.content)
    }
}
