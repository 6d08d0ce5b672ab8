//! Client configuration.

use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://api.mistral.ai/v1";
pub const DEFAULT_MODEL: &str = "mistral-large-latest";
pub const DEFAULT_TEMPERATURE: f32 = 0.7;
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

/// Environment variable holding the API key.
pub const API_KEY_VAR: &str = "MISTRAL_API_KEY";

/// Endpoint and sampling settings for [`crate::MistralClient`].
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    pub base_url: String,
    pub model: String,
    pub temperature: f32,
    pub timeout: Duration,
}

impl ClientConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Trailing slashes are dropped.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub(crate) fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ClientConfig::new();
        assert_eq!(config.model, "mistral-large-latest");
        assert_eq!(config.timeout, Duration::from_secs(120));
        assert_eq!(
            config.completions_url(),
            "https://api.mistral.ai/v1/chat/completions"
        );
    }

    #[test]
    fn test_builder() {
        let config = ClientConfig::new()
            .with_base_url("http://localhost:8080/v1/")
            .with_model("mistral-small-latest")
            .with_temperature(0.2)
            .with_timeout(Duration::from_secs(5));
        assert_eq!(config.completions_url(), "http://localhost:8080/v1/chat/completions");
        assert_eq!(config.model, "mistral-small-latest");
        assert_eq!(config.temperature, 0.2);
        assert_eq!(config.timeout, Duration::from_secs(5));
    }
}
