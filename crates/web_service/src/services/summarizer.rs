//! History condensation via a single non-streaming backend call

use std::sync::Arc;

use anyhow::anyhow;
use chat_core::{ChatMessage, Role};
use log::info;
use ollama_client::api::models::ChatRequest;
use ollama_client::OllamaClientTrait;

pub struct Summarizer {
    client: Arc<dyn OllamaClientTrait>,
}

impl Summarizer {
    pub fn new(client: Arc<dyn OllamaClientTrait>) -> Self {
        Self { client }
    }

    /// Condense `history` into a short synopsis. One attempt, no retry;
    /// every failure propagates to the caller for fallback handling.
    pub async fn summarize(
        &self,
        model: &str,
        history: &[ChatMessage],
    ) -> anyhow::Result<String> {
        let prompt = build_condense_prompt(history);

        let request = ChatRequest {
            model: model.to_string(),
            messages: vec![ChatMessage::user(prompt)],
            stream: false,
            options: None,
        };

        let reply = self.client.chat_completion(request).await?;
        let summary = reply.message.content.trim().to_string();
        if summary.is_empty() {
            return Err(anyhow!("Summarizer returned an empty reply"));
        }

        info!("Condensed {} turns into {} chars", history.len(), summary.len());
        Ok(summary)
    }
}

/// Build the condensation prompt from role-labelled transcript lines.
fn build_condense_prompt(history: &[ChatMessage]) -> String {
    let mut lines: Vec<String> = Vec::new();

    for message in history {
        let text = message.content.trim();
        if text.is_empty() {
            continue;
        }

        let role_label = match message.role {
            Role::User => "User",
            Role::Assistant => "Assistant",
            Role::System => continue,
        };

        lines.push(format!("{}: {}", role_label, text));
    }

    format!(
        "You condense chat transcripts. Summarize the conversation below in a few \
         short sentences, keeping every fact needed to continue it. \
         Respond with the summary only, no preamble.\n\n\
         Conversation:\n{}",
        lines.join("\n")
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_condense_prompt_labels_roles() {
        let history = vec![
            ChatMessage::user("What is Rust?"),
            ChatMessage::assistant("A systems language."),
        ];
        let prompt = build_condense_prompt(&history);
        assert!(prompt.contains("User: What is Rust?"));
        assert!(prompt.contains("Assistant: A systems language."));
    }

    #[test]
    fn test_condense_prompt_skips_empty_turns() {
        let history = vec![ChatMessage::user("hello"), ChatMessage::assistant("  ")];
        let prompt = build_condense_prompt(&history);
        assert!(prompt.contains("User: hello"));
        assert!(!prompt.contains("Assistant:"));
    }
}
