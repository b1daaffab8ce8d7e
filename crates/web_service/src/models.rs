use ollama_client::api::models::GenerationOptions;
use serde::{Deserialize, Serialize};

/// Inbound chat turn payload.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatRequestPayload {
    #[serde(default)]
    pub model: String,

    #[serde(default)]
    pub prompt: String,

    /// Base64 encoded image, with or without a `data:...;base64,` prefix.
    #[serde(default)]
    pub image: Option<String>,

    /// Instruction prefixed to the outgoing prompt on every turn it is sent.
    /// Never stored in the session history.
    #[serde(default)]
    pub persistent_prompt: Option<String>,

    /// Ask for the prior history to be condensed before this turn is sent.
    #[serde(default)]
    pub summarize_history: bool,

    #[serde(default)]
    pub options: GenerationOptionsPayload,
}

impl ChatRequestPayload {
    pub fn has_image(&self) -> bool {
        self.image.as_deref().is_some_and(|image| !image.is_empty())
    }
}

/// Generation parameters as the caller sends them. Opaque pass-through
/// configuration: the relay only fills in defaults for absent fields.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct GenerationOptionsPayload {
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    #[serde(default = "default_top_p")]
    pub top_p: f32,
    #[serde(default)]
    pub frequency_penalty: f32,
    #[serde(default)]
    pub presence_penalty: f32,
    #[serde(default)]
    pub mixture_seed: i64,
    #[serde(default)]
    pub seed: i64,
    #[serde(default)]
    pub best_of: u32,
    #[serde(default)]
    pub logprobs: u32,
}

fn default_temperature() -> f32 {
    0.7
}

fn default_top_p() -> f32 {
    0.95
}

impl Default for GenerationOptionsPayload {
    fn default() -> Self {
        Self {
            temperature: default_temperature(),
            top_p: default_top_p(),
            frequency_penalty: 0.0,
            presence_penalty: 0.0,
            mixture_seed: 0,
            seed: 0,
            best_of: 0,
            logprobs: 0,
        }
    }
}

impl From<GenerationOptionsPayload> for GenerationOptions {
    fn from(payload: GenerationOptionsPayload) -> Self {
        // Zero means "unset" on the inbound side and is omitted upstream.
        GenerationOptions {
            temperature: payload.temperature,
            top_p: payload.top_p,
            frequency_penalty: (payload.frequency_penalty != 0.0)
                .then_some(payload.frequency_penalty),
            presence_penalty: (payload.presence_penalty != 0.0).then_some(payload.presence_penalty),
            mixture_seed: (payload.mixture_seed != 0).then_some(payload.mixture_seed),
            seed: (payload.seed != 0).then_some(payload.seed),
            best_of: (payload.best_of != 0).then_some(payload.best_of),
            logprobs: (payload.logprobs != 0).then_some(payload.logprobs),
        }
    }
}

/// One streamed content fragment, as the caller sees it.
#[derive(Debug, Serialize)]
pub struct TokenFrame {
    pub token: String,
}

/// Terminal frame of a successful turn.
#[derive(Debug, Serialize)]
pub struct DoneFrame {
    pub duration: String,
}

/// Reply of the model inventory proxy.
#[derive(Debug, Serialize)]
pub struct ModelsResponse {
    pub models: Vec<String>,
}
