use anyhow::Result;
use async_trait::async_trait;
use reqwest::Response;
use tokio::sync::mpsc::Sender;

use crate::api::models::{ChatRequest, ChatResponse};

#[async_trait]
pub trait OllamaClientTrait: Send + Sync {
    /// Issue the chat request and hand back the raw HTTP response. Streaming
    /// and non-streaming requests go through the same endpoint; `request.stream`
    /// decides the reply shape.
    async fn send_chat_request(&self, request: ChatRequest) -> Result<Response>;

    /// Decode a streaming response body as newline-delimited JSON fragments,
    /// forwarding each one over `tx` in arrival order. Stops consuming at the
    /// first fragment with `done: true`. An undecodable line is fatal to the
    /// whole call and is forwarded as an error.
    async fn process_chat_stream(
        &self,
        response: Response,
        tx: Sender<Result<ChatResponse>>,
    ) -> Result<()>;

    /// Non-streaming chat call: one request, one decoded reply object.
    async fn chat_completion(&self, request: ChatRequest) -> Result<ChatResponse>;

    /// Fetch the backend's model inventory as plain model names.
    async fn get_models(&self) -> Result<Vec<String>>;
}
