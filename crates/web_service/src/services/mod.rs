pub mod chat_service;
pub mod prompt_composer;
pub mod summarizer;

pub use chat_service::ChatService;
pub use prompt_composer::{ComposedPrompt, PromptComposer};
pub use summarizer::Summarizer;
