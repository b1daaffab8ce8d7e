//! Configuration management for the relay service
//!
//! Supports loading configuration from environment variables with fallback to defaults.

use std::time::Duration;

/// Relay tuning knobs, separate from the backend connection config
/// (`chat_core::Config`).
#[derive(Debug, Clone)]
pub struct RelayConfig {
    /// How many trailing turns are handed to the summarizer.
    pub summary_window: usize,
    /// Keep-alive interval for the outbound event stream.
    pub keep_alive: Duration,
}

/// Load RelayConfig from environment variables
///
/// Environment variables:
/// - `RELAY_SUMMARY_WINDOW`: turns passed to the summarizer (default: 10)
/// - `RELAY_KEEP_ALIVE_SECS`: SSE keep-alive interval in seconds (default: 15)
pub fn load_relay_config() -> RelayConfig {
    RelayConfig {
        summary_window: std::env::var("RELAY_SUMMARY_WINDOW")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(10),
        keep_alive: Duration::from_secs(
            std::env::var("RELAY_KEEP_ALIVE_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(15),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relay_config_has_sensible_defaults() {
        let config = load_relay_config();
        assert!(config.summary_window > 0);
        assert!(config.keep_alive.as_secs() > 0);
    }
}
