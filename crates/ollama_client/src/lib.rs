pub mod api;
pub mod client_trait;

pub use api::client::OllamaClient;
pub use chat_core::Config;
pub use client_trait::OllamaClientTrait;
