use anyhow::anyhow;
use async_trait::async_trait;
use bytes::BytesMut;
use chat_core::Config;
use futures_util::StreamExt;
use log::{error, info, warn};
use reqwest::header::HeaderMap;
use reqwest::{Client, Response};
use tokio::sync::mpsc::Sender;

use crate::api::models::{ChatRequest, ChatResponse};
use crate::client_trait::OllamaClientTrait;

use super::models_handler::OllamaModelsHandler;

// Main Ollama client struct
#[derive(Debug, Clone)]
pub struct OllamaClient {
    client: Client,
    endpoint: String,
    models_handler: OllamaModelsHandler,
}

impl OllamaClient {
    pub fn new(config: Config) -> Self {
        let client = Self::build_http_client(&config).expect("ollama client");
        let models_handler = OllamaModelsHandler::new(client.clone(), config.endpoint.clone());

        OllamaClient {
            client,
            endpoint: config.endpoint,
            models_handler,
        }
    }

    fn build_http_client(config: &Config) -> anyhow::Result<Client> {
        // One overall timeout bounds the whole call, streaming reads included.
        Client::builder()
            .default_headers(Self::get_default_headers())
            .timeout(config.timeout())
            .build()
            .map_err(|e| anyhow!("Failed to build HTTP client: {e}"))
    }

    pub fn get_default_headers() -> HeaderMap {
        let mut header: HeaderMap = HeaderMap::new();
        header.insert("accept", "application/json".parse().unwrap());
        header.insert("content-type", "application/json".parse().unwrap());
        header
    }

    fn decode_line(line: &[u8]) -> anyhow::Result<Option<ChatResponse>> {
        if line.iter().all(|b| b.is_ascii_whitespace()) {
            return Ok(None);
        }
        serde_json::from_slice::<ChatResponse>(line)
            .map(Some)
            .map_err(|e| anyhow!("Undecodable stream line: {e}"))
    }
}

#[async_trait]
impl OllamaClientTrait for OllamaClient {
    async fn send_chat_request(&self, request: ChatRequest) -> anyhow::Result<Response> {
        let url = format!("{}/api/chat", self.endpoint);
        info!(
            "Sending chat request with {} messages, model: {}",
            request.messages.len(),
            request.model
        );

        self.client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                error!("Failed to send chat request: {}", e);
                anyhow!("Failed to send chat request: {}", e)
            })
    }

    async fn process_chat_stream(
        &self,
        response: Response,
        tx: Sender<anyhow::Result<ChatResponse>>,
    ) -> anyhow::Result<()> {
        let mut body = response.bytes_stream();
        let mut buf = BytesMut::new();

        while let Some(next) = body.next().await {
            let chunk = match next {
                Ok(chunk) => chunk,
                Err(e) => {
                    error!("Error reading chat stream: {}", e);
                    let _ = tx.send(Err(anyhow!("Error reading chat stream: {e}"))).await;
                    return Ok(());
                }
            };
            buf.extend_from_slice(&chunk);

            while let Some(pos) = buf.iter().position(|&b| b == b'\n') {
                let line = buf.split_to(pos + 1);
                match Self::decode_line(&line) {
                    Ok(None) => {}
                    Ok(Some(fragment)) => {
                        let done = fragment.done;
                        if tx.send(Ok(fragment)).await.is_err() {
                            warn!("Failed to send fragment - receiver dropped.");
                            return Ok(());
                        }
                        if done {
                            info!("Received done fragment, closing stream.");
                            return Ok(());
                        }
                    }
                    Err(e) => {
                        error!("Failed to parse stream line: {}", e);
                        let _ = tx.send(Err(e)).await;
                        return Ok(());
                    }
                }
            }
        }

        // Body ended without a done marker; an unterminated trailing line still counts.
        match Self::decode_line(&buf) {
            Ok(None) => {}
            Ok(Some(fragment)) => {
                let _ = tx.send(Ok(fragment)).await;
            }
            Err(e) => {
                error!("Failed to parse trailing stream line: {}", e);
                let _ = tx.send(Err(e)).await;
            }
        }
        Ok(())
    }

    async fn chat_completion(&self, mut request: ChatRequest) -> anyhow::Result<ChatResponse> {
        request.stream = false;
        let response = self.send_chat_request(request).await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let error_msg = format!("Chat request failed: {body} with status {status}");
            error!("{error_msg}");
            return Err(anyhow!(error_msg));
        }

        response
            .json::<ChatResponse>()
            .await
            .map_err(|e| anyhow!("Failed to decode chat reply: {e}"))
    }

    async fn get_models(&self) -> anyhow::Result<Vec<String>> {
        self.models_handler.get_models().await
    }
}
