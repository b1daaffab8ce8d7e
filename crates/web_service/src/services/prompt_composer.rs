//! Prompt composition: what gets sent upstream vs. what gets remembered
//!
//! The composer returns two values per turn: the message list actually sent
//! to the backend, and the clean user turn that is later committed to the
//! session history. They differ whenever augmentation (a persistent
//! instruction, a condensed history) is applied; augmentation must never
//! leak into the stored history, or the conversation state compounds errors
//! across turns.

use chat_core::ChatMessage;
use log::warn;

use crate::models::ChatRequestPayload;

use super::summarizer::Summarizer;

/// Result of composing one turn.
#[derive(Debug, Clone)]
pub struct ComposedPrompt {
    /// Exact message sequence submitted upstream, augmentation included.
    pub upstream: Vec<ChatMessage>,
    /// The turn that gets committed to history on success: raw prompt plus
    /// attachment, nothing else.
    pub clean_turn: ChatMessage,
}

pub struct PromptComposer {
    summarizer: Summarizer,
    summary_window: usize,
}

impl PromptComposer {
    pub fn new(summarizer: Summarizer, summary_window: usize) -> Self {
        Self {
            summarizer,
            summary_window,
        }
    }

    /// Derive the upstream message list for this turn without touching the
    /// stored history.
    pub async fn compose(
        &self,
        history: &[ChatMessage],
        payload: &ChatRequestPayload,
    ) -> ComposedPrompt {
        // 1. The clean turn is fixed here, before any augmentation.
        let clean_turn = build_clean_turn(payload);

        // 2. Base list: full history, or a condensed stand-in for it.
        let mut upstream = if payload.summarize_history && !history.is_empty() {
            match self.summarized_base(&payload.model, history, &payload.prompt).await {
                Ok(base) => base,
                Err(e) => {
                    // Degrade, never abort: the turn proceeds over full history.
                    warn!("History summarization failed, using full history: {e}");
                    full_history_base(history, &clean_turn)
                }
            }
        } else {
            full_history_base(history, &clean_turn)
        };

        // 3. The persistent instruction lands on the last outgoing message,
        //    after summarization, and only on the outgoing copy.
        if let Some(instruction) = payload
            .persistent_prompt
            .as_deref()
            .filter(|s| !s.trim().is_empty())
        {
            if let Some(last) = upstream.last_mut() {
                last.content = format!("{}\n\n{}", instruction, last.content);
            }
        }

        ComposedPrompt {
            upstream,
            clean_turn,
        }
    }

    async fn summarized_base(
        &self,
        model: &str,
        history: &[ChatMessage],
        raw_prompt: &str,
    ) -> anyhow::Result<Vec<ChatMessage>> {
        let window_start = history.len().saturating_sub(self.summary_window);
        let summary = self.summarizer.summarize(model, &history[window_start..]).await?;

        Ok(vec![ChatMessage::user(format!(
            "Summary of the conversation so far:\n{summary}\n\n\
             With that context, answer the following:\n{raw_prompt}"
        ))])
    }
}

fn build_clean_turn(payload: &ChatRequestPayload) -> ChatMessage {
    let mut turn = ChatMessage::user(payload.prompt.clone());
    if let Some(image) = payload.image.as_deref().filter(|i| !i.is_empty()) {
        turn = turn.with_images(vec![strip_data_uri_prefix(image).to_string()]);
    }
    turn
}

fn full_history_base(history: &[ChatMessage], clean_turn: &ChatMessage) -> Vec<ChatMessage> {
    let mut base = history.to_vec();
    base.push(clean_turn.clone());
    base
}

/// The backend expects raw base64, so a data-URI prefix is dropped:
/// `data:image/png;base64,iVBORw0...` -> `iVBORw0...`
fn strip_data_uri_prefix(image: &str) -> &str {
    match image.find(',') {
        Some(i) => &image[i + 1..],
        None => image,
    }
}
