use crate::{error::AppError, models::ModelsResponse, server::AppState, services::ChatService};
use actix_web::{
    web::{self, Data},
    HttpResponse, Result,
};

/// Proxy the backend's model inventory as plain model names.
pub async fn list_models(app_state: Data<AppState>) -> Result<HttpResponse, AppError> {
    let chat_service = ChatService::new(
        app_state.ollama_client.clone(),
        app_state.session_store.clone(),
        app_state.relay_config.clone(),
    );
    let models = chat_service.list_models().await?;

    Ok(HttpResponse::Ok().json(ModelsResponse { models }))
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.route("/tags", web::get().to(list_models));
}
