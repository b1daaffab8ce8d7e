use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Base URL of the inference backend.
    pub endpoint: String,

    /// Overall timeout for one backend call, streaming included, in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

const CONFIG_FILE_PATH: &str = "config.toml";

const DEFAULT_ENDPOINT: &str = "http://localhost:11434";

fn default_timeout_secs() -> u64 {
    300
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

impl Config {
    /// Load configuration: `config.toml` in the working directory if present,
    /// then environment variable overrides on top.
    pub fn new() -> Self {
        let mut config = Config {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout_secs: default_timeout_secs(),
        };

        if std::path::Path::new(CONFIG_FILE_PATH).exists() {
            if let Ok(content) = std::fs::read_to_string(CONFIG_FILE_PATH) {
                match toml::from_str::<Config>(&content) {
                    Ok(file_config) => config = file_config,
                    Err(e) => log::warn!("Ignoring malformed {CONFIG_FILE_PATH}: {e}"),
                }
            }
        }

        if let Ok(endpoint) = std::env::var("OLLAMA_ENDPOINT") {
            if !endpoint.is_empty() {
                config.endpoint = endpoint;
            }
        }
        if let Some(secs) = std::env::var("OLLAMA_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
        {
            config.timeout_secs = secs;
        }

        config
    }

    pub fn timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_sensible() {
        let config = Config {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout_secs: default_timeout_secs(),
        };
        assert!(config.endpoint.starts_with("http://"));
        assert!(config.timeout().as_secs() > 0);
    }

    #[test]
    fn test_timeout_defaults_when_missing_from_file() {
        let config: Config = toml::from_str("endpoint = \"http://10.0.0.1:11434\"").unwrap();
        assert_eq!(config.endpoint, "http://10.0.0.1:11434");
        assert_eq!(config.timeout_secs, 300);
    }
}
