use anyhow::{anyhow, Error};
use log::info;
use reqwest::{Client, Response, StatusCode};

// Struct for handling the model inventory endpoint
#[derive(Debug, Clone)]
pub(crate) struct OllamaModelsHandler {
    client: Client,
    endpoint: String,
}

impl OllamaModelsHandler {
    pub(crate) fn new(client: Client, endpoint: String) -> Self {
        OllamaModelsHandler { client, endpoint }
    }

    pub(crate) async fn get_models(&self) -> anyhow::Result<Vec<String>> {
        let url = format!("{}/api/tags", self.endpoint);
        info!("Fetching available models...");

        let response = self.client.get(&url).send().await?;

        let status = response.status();
        if status != StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            let error_msg = format!("Failed to get models: {body} with status {status}");
            log::error!("{error_msg}");
            return Err(anyhow!(error_msg));
        }

        Self::extract_models_from_response(response).await
    }

    async fn extract_models_from_response(response: Response) -> Result<Vec<String>, Error> {
        let tags: serde_json::Value = response.json().await?;

        let models = tags
            .get("models")
            .and_then(|m| m.as_array())
            .ok_or_else(|| anyhow!("Invalid tags response format"))?;

        Ok(models
            .iter()
            .filter_map(Self::extract_model_name)
            .collect::<Vec<String>>())
    }

    fn extract_model_name(model: &serde_json::Value) -> Option<String> {
        model
            .get("name")
            .and_then(|name| name.as_str())
            .map(str::to_string)
    }
}
