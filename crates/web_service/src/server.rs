use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{web, App, HttpServer};
use chat_core::Config;
use log::{error, info};
use ollama_client::{OllamaClient, OllamaClientTrait};
use session_manager::SessionStore;

use crate::config::{load_relay_config, RelayConfig};
use crate::controllers::{chat_controller, models_controller};

pub struct AppState {
    pub ollama_client: Arc<dyn OllamaClientTrait>,
    pub session_store: Arc<SessionStore>,
    pub relay_config: RelayConfig,
}

const DEFAULT_WORKER_COUNT: usize = 10;

pub fn app_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .configure(chat_controller::config)
            .configure(models_controller::config),
    );
}

pub async fn run(port: u16) -> Result<(), String> {
    info!("Starting relay service...");

    let config = Config::new();
    let relay_config = load_relay_config();
    info!("Relaying to backend at {}", config.endpoint);

    let ollama_client: Arc<dyn OllamaClientTrait> = Arc::new(OllamaClient::new(config));
    let session_store = Arc::new(SessionStore::new());

    let app_state = web::Data::new(AppState {
        ollama_client,
        session_store,
        relay_config,
    });

    let server = HttpServer::new(move || {
        App::new()
            .app_data(app_state.clone())
            .wrap(Cors::permissive())
            .configure(app_config)
    })
    .workers(DEFAULT_WORKER_COUNT)
    .bind(format!("127.0.0.1:{port}"))
    .map_err(|e| format!("Failed to bind server: {e}"))?
    .run();

    info!("Starting relay service on http://127.0.0.1:{port}");

    if let Err(e) = server.await {
        error!("Relay server error: {}", e);
        return Err(format!("Relay server error: {e}"));
    }

    Ok(())
}
