/*!
 * Completion Wire Types
 * Request/response schema for the chat-completions endpoint
 */

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub(super) const SYSTEM_PROMPT: &str = "You are a helpful assistant";

/// Completion operation result
pub type CompletionResult<T> = Result<T, CompletionError>;

/// Completion error types
#[derive(Debug, Error)]
pub enum CompletionError {
    /// Transport-level failure: connect, timeout, non-success status, or
    /// an undecodable body.
    #[error("completion request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Well-formed response carrying no choices.
    #[error("completion response had no choices")]
    EmptyChoices,
}

#[derive(Debug, Serialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

#[derive(Debug, Deserialize)]
pub struct ChatResponse {
    #[serde(default)]
    pub choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
pub struct ChatChoice {
    #[serde(default)]
    pub index: u32,
    pub message: ChatMessage,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn request_matches_wire_shape() {
        let request = ChatRequest {
            model: "gpt-3.5-turbo".to_string(),
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: "hello".to_string(),
            }],
        };

        let encoded = serde_json::to_value(&request).unwrap();
        assert_eq!(
            encoded,
            serde_json::json!({
                "model": "gpt-3.5-turbo",
                "messages": [{"role": "user", "content": "hello"}],
            })
        );
    }

    #[test]
    fn response_decodes_first_choice() {
        let body = r#"{
            "choices": [
                {"index": 0, "message": {"role": "assistant", "content": "hi there"}},
                {"index": 1, "message": {"role": "assistant", "content": "ignored"}}
            ]
        }"#;

        let response: ChatResponse = serde_json::from_str(body).unwrap();
        assert_eq!(response.choices.len(), 2);
        assert_eq!(response.choices[0].message.content, "hi there");
    }

    #[test]
    fn response_without_choices_decodes_empty() {
        let response: ChatResponse = serde_json::from_str("{}").unwrap();
        assert!(response.choices.is_empty());
    }
}
