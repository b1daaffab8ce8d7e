//! Relay controller: one chat turn end-to-end
//!
//! A turn progresses validating -> composing -> streaming -> committing ->
//! done, with any failure terminal for that turn only. History is committed
//! in one step after the stream completes, so an aborted turn never leaves a
//! partial exchange behind.

use std::sync::Arc;
use std::time::Instant;

use actix_web_lab::{sse, util::InfallibleStream};
use chat_core::ChatMessage;
use log::{debug, error, info, warn};
use ollama_client::api::models::{ChatRequest, ChatResponse};
use ollama_client::OllamaClientTrait;
use serde_json::json;
use session_manager::SessionStore;
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;

use crate::config::RelayConfig;
use crate::error::AppError;
use crate::models::{ChatRequestPayload, DoneFrame, TokenFrame};

use super::prompt_composer::PromptComposer;
use super::summarizer::Summarizer;

pub type SseResponse = sse::Sse<InfallibleStream<ReceiverStream<sse::Event>>>;

pub struct ChatService {
    client: Arc<dyn OllamaClientTrait>,
    store: Arc<SessionStore>,
    composer: PromptComposer,
    config: RelayConfig,
}

impl ChatService {
    pub fn new(
        client: Arc<dyn OllamaClientTrait>,
        store: Arc<SessionStore>,
        config: RelayConfig,
    ) -> Self {
        let composer = PromptComposer::new(
            Summarizer::new(client.clone()),
            config.summary_window,
        );
        Self {
            client,
            store,
            composer,
            config,
        }
    }

    /// Process one chat turn, streaming the reply back as SSE frames.
    pub async fn process_chat_stream(
        &self,
        session_key: String,
        payload: ChatRequestPayload,
    ) -> Result<SseResponse, AppError> {
        let started = Instant::now();

        // validating: rejected turns never reach the backend.
        if payload.model.trim().is_empty() {
            return Err(AppError::Validation("Model is required".to_string()));
        }
        if payload.prompt.trim().is_empty() && !payload.has_image() {
            return Err(AppError::Validation(
                "A prompt or an image is required".to_string(),
            ));
        }
        debug!("turn {session_key}: validating -> composing");

        // composing: snapshot the history, derive the upstream list.
        let history = self.store.get(&session_key).await;
        let composed = self.composer.compose(&history, &payload).await;

        tracing::info!(
            session_key = %session_key,
            model = %payload.model,
            history_len = history.len(),
            upstream_len = composed.upstream.len(),
            summarized = payload.summarize_history,
            "relay turn composed"
        );

        let request = ChatRequest {
            model: payload.model.clone(),
            messages: composed.upstream,
            stream: true,
            options: Some(payload.options.clone().into()),
        };

        // streaming: the request is issued before the SSE stream opens, so
        // pre-stream failures surface as plain status codes.
        let response = self
            .client
            .send_chat_request(request)
            .await
            .map_err(|e| AppError::BackendUnavailable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::BackendUnavailable(format!(
                "backend returned status {status}"
            )));
        }
        debug!("turn {session_key}: composing -> streaming");

        let (tx, rx) = mpsc::channel::<sse::Event>(100);

        let client = self.client.clone();
        let store = self.store.clone();
        let clean_turn = composed.clean_turn;

        tokio::spawn(async move {
            let (chunk_tx, mut chunk_rx) = mpsc::channel::<anyhow::Result<ChatResponse>>(100);

            let processor_handle = tokio::spawn(async move {
                client.process_chat_stream(response, chunk_tx).await
            });

            let mut reply = String::new();
            let mut completed = false;

            while let Some(fragment) = chunk_rx.recv().await {
                match fragment {
                    Ok(fragment) => {
                        // Empty non-terminal fragments carry nothing: drop them.
                        if !fragment.message.content.is_empty() {
                            reply.push_str(&fragment.message.content);

                            let frame = TokenFrame {
                                token: fragment.message.content,
                            };
                            let event = match sse::Data::new_json(frame) {
                                Ok(data) => sse::Event::Data(data),
                                Err(e) => {
                                    error!("Failed to serialise token frame: {e}");
                                    break;
                                }
                            };
                            if tx.send(event).await.is_err() {
                                // Caller is gone: abort upstream, discard the
                                // partial reply, commit nothing.
                                warn!("Client disconnected mid-stream, aborting upstream call");
                                processor_handle.abort();
                                return;
                            }
                        }
                        if fragment.done {
                            completed = true;
                            break;
                        }
                    }
                    Err(e) => {
                        error!("Error in chat stream: {e}");
                        send_error_event(&tx, "backend unavailable").await;
                        processor_handle.abort();
                        return;
                    }
                }
            }

            // Unblock the processor if it is still sending before we join it.
            drop(chunk_rx);
            if let Err(e) = processor_handle.await {
                if !e.is_cancelled() {
                    error!("Stream processor task failed: {e}");
                }
            }

            if !completed {
                // The backend closed the stream without a done marker;
                // whatever streamed so far is not history.
                warn!("Backend stream ended without completion marker");
                send_error_event(&tx, "backend stream ended early").await;
                return;
            }

            // committing: the clean user turn and the assembled reply land
            // together, in order, only on a completed stream.
            debug!("turn {session_key}: streaming -> committing");
            store
                .commit_exchange(&session_key, clean_turn, ChatMessage::assistant(reply))
                .await;

            let done = DoneFrame {
                duration: format!("{:?}", started.elapsed()),
            };
            if let Ok(data) = sse::Data::new_json(done) {
                let _ = tx.send(sse::Event::Data(data.event("done"))).await;
            }
            info!("turn {session_key}: done");
        });

        Ok(sse::Sse::from_infallible_receiver(rx).with_keep_alive(self.config.keep_alive))
    }

    /// Wipe the caller's session history. Idempotent.
    pub async fn clear_history(&self, session_key: &str) {
        info!("Clearing history for session: {session_key}");
        self.store.clear(session_key).await;
    }

    /// Proxy the backend model inventory.
    pub async fn list_models(&self) -> Result<Vec<String>, AppError> {
        self.client
            .get_models()
            .await
            .map_err(|e| AppError::BackendUnavailable(e.to_string()))
    }
}

async fn send_error_event(tx: &mpsc::Sender<sse::Event>, message: &str) {
    if let Ok(data) = sse::Data::new_json(json!({ "error": message })) {
        let _ = tx.send(sse::Event::Data(data.event("error"))).await;
    }
}
