//! Wire schema for the backend chat endpoint.

use chat_core::{ChatMessage, Role};
use serde::{Deserialize, Serialize};

/// Request body for `POST /api/chat`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub stream: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<GenerationOptions>,
}

/// Sampling parameters, forwarded verbatim. Parameters left at their zero
/// value are omitted from the wire, matching the backend's "unset" handling.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GenerationOptions {
    pub temperature: f32,
    pub top_p: f32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frequency_penalty: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub presence_penalty: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mixture_seed: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub best_of: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logprobs: Option<u32>,
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self {
            temperature: 0.7,
            top_p: 0.95,
            frequency_penalty: None,
            presence_penalty: None,
            mixture_seed: None,
            seed: None,
            best_of: None,
            logprobs: None,
        }
    }
}

fn default_message() -> ChatMessage {
    ChatMessage {
        role: Role::Assistant,
        content: String::new(),
        images: None,
    }
}

/// One decoded reply object. When streaming, the backend sends one of these
/// per line; only the final line carries `done: true` and the eval counters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatResponse {
    #[serde(default)]
    pub model: String,
    #[serde(default)]
    pub created_at: String,
    #[serde(default = "default_message")]
    pub message: ChatMessage,
    #[serde(default)]
    pub done: bool,
    #[serde(default)]
    pub total_duration: i64,
    #[serde(default)]
    pub load_duration: i64,
    #[serde(default)]
    pub prompt_eval_count: i64,
    #[serde(default)]
    pub prompt_eval_duration: i64,
    #[serde(default)]
    pub eval_count: i64,
    #[serde(default)]
    pub eval_duration: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unset_options_are_omitted() {
        let options = GenerationOptions::default();
        let json = serde_json::to_string(&options).unwrap();
        assert!(json.contains("temperature"));
        assert!(json.contains("top_p"));
        assert!(!json.contains("seed"));
        assert!(!json.contains("logprobs"));
    }

    #[test]
    fn test_stream_fragment_decodes_without_counters() {
        let line = r#"{"model":"m1","created_at":"2024-01-01T00:00:00Z","message":{"role":"assistant","content":"Hi"},"done":false}"#;
        let fragment: ChatResponse = serde_json::from_str(line).unwrap();
        assert_eq!(fragment.message.content, "Hi");
        assert!(!fragment.done);
        assert_eq!(fragment.eval_count, 0);
    }

    #[test]
    fn test_final_fragment_carries_counters() {
        let line = r#"{"model":"m1","created_at":"t","message":{"role":"assistant","content":""},"done":true,"total_duration":42,"eval_count":7}"#;
        let fragment: ChatResponse = serde_json::from_str(line).unwrap();
        assert!(fragment.done);
        assert_eq!(fragment.total_duration, 42);
        assert_eq!(fragment.eval_count, 7);
    }
}
