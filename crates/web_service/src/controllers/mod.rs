pub mod chat_controller;
pub mod models_controller;
