//! Message module - conversation turn types
//!
//! A `ChatMessage` is one turn of a conversation as it is stored and as it is
//! sent over the wire to the backend. The stored form only ever contains the
//! raw user input and the assembled assistant reply; prompt augmentation is
//! applied to outgoing copies, never to these values.

use serde::{Deserialize, Serialize};

/// Speaker of a conversation turn.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
    /// Reserved for upstream wire compatibility; the relay never stores it.
    System,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::User => write!(f, "user"),
            Role::Assistant => write!(f, "assistant"),
            Role::System => write!(f, "system"),
        }
    }
}

/// One conversation turn: text content plus optional base64 image payloads.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,

    /// Raw base64 payloads (no data-URI prefix), as the backend expects them.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub images: Option<Vec<String>>,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
            images: None,
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
            images: None,
        }
    }

    pub fn with_images(mut self, images: Vec<String>) -> Self {
        if !images.is_empty() {
            self.images = Some(images);
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Role::User).unwrap(), "\"user\"");
        assert_eq!(
            serde_json::to_string(&Role::Assistant).unwrap(),
            "\"assistant\""
        );
    }

    #[test]
    fn test_images_omitted_when_absent() {
        let msg = ChatMessage::user("hello");
        let json = serde_json::to_string(&msg).unwrap();
        assert!(!json.contains("images"));
    }

    #[test]
    fn test_images_serialized_when_present() {
        let msg = ChatMessage::user("look").with_images(vec!["aGVsbG8=".to_string()]);
        let json = serde_json::to_string(&msg).unwrap();
        assert!(json.contains("\"images\":[\"aGVsbG8=\"]"));
    }

    #[test]
    fn test_round_trip() {
        let msg = ChatMessage::assistant("Hi there");
        let json = serde_json::to_string(&msg).unwrap();
        let back: ChatMessage = serde_json::from_str(&json).unwrap();
        assert_eq!(msg, back);
    }
}
