pub mod client;
pub mod models;

mod models_handler;
