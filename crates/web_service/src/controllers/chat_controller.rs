use crate::{error::AppError, models::ChatRequestPayload, server::AppState, services::ChatService};
use actix_web::{
    http::header::{HeaderName, HeaderValue},
    web::{self, Data},
    HttpRequest, HttpResponse, Responder, Result,
};
use log::info;

/// Session identity comes from the transport layer: the peer address is the
/// opaque session key.
pub(crate) fn session_key(req: &HttpRequest) -> String {
    req.peer_addr()
        .map(|addr| addr.to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

/// Streaming chat endpoint: one turn in, one SSE reply stream out.
pub async fn chat(
    payload: web::Json<ChatRequestPayload>,
    http_req: HttpRequest,
    app_state: Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let session_key = session_key(&http_req);
    info!("Chat turn for session: {}", session_key);

    let chat_service = ChatService::new(
        app_state.ollama_client.clone(),
        app_state.session_store.clone(),
        app_state.relay_config.clone(),
    );

    let sse_response = chat_service
        .process_chat_stream(session_key, payload.into_inner())
        .await?;

    let mut response = sse_response.respond_to(&http_req);
    response.headers_mut().insert(
        HeaderName::from_static("x-accel-buffering"),
        HeaderValue::from_static("no"),
    );
    Ok(response)
}

/// Wipe the caller's conversation history.
pub async fn clear_history(
    http_req: HttpRequest,
    app_state: Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let session_key = session_key(&http_req);

    let chat_service = ChatService::new(
        app_state.ollama_client.clone(),
        app_state.session_store.clone(),
        app_state.relay_config.clone(),
    );
    chat_service.clear_history(&session_key).await;

    Ok(HttpResponse::Ok().finish())
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.route("/chat", web::post().to(chat))
        .route("/clear-history", web::post().to(clear_history));
}
