//! Blocking chat-completions client.

use crate::config::{ClientConfig, API_KEY_VAR};
use deck_core::instructions;
use deck_core::prompt::{enhance_prompt, extract_target_slides, system_prompt};
use deck_core::{Error, Outline, OutlineGenerator, Result};
use serde::{Deserialize, Serialize};

/// Outline generator backed by the Mistral chat-completions API.
pub struct MistralClient {
    api_key: String,
    config: ClientConfig,
    http: reqwest::blocking::Client,
}

impl MistralClient {
    pub fn new(api_key: impl Into<String>, config: ClientConfig) -> Result<Self> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(Error::Configuration(format!(
                "{} is empty",
                API_KEY_VAR
            )));
        }

        let http = reqwest::blocking::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| Error::Configuration(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            api_key,
            config,
            http,
        })
    }

    /// Read the API key from `MISTRAL_API_KEY`.
    pub fn from_env(config: ClientConfig) -> Result<Self> {
        let api_key = std::env::var(API_KEY_VAR).map_err(|_| {
            Error::Configuration(format!("{} not found in environment variables", API_KEY_VAR))
        })?;
        Self::new(api_key, config)
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    fn complete(&self, request: &ChatRequest) -> Result<String> {
        let url = self.config.completions_url();
        log::debug!("POST {} (model {})", url, request.model);

        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(request)
            .send()
            .map_err(|e| Error::UpstreamRequest(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(Error::UpstreamRequest(format!("HTTP {}: {}", status, body)));
        }

        response
            .text()
            .map_err(|e| Error::UpstreamRequest(format!("Failed to read response body: {}", e)))
    }
}

impl OutlineGenerator for MistralClient {
    fn generate(&self, prompt: &str, detailed: bool) -> Result<Outline> {
        let target_slides = extract_target_slides(prompt);
        let request = build_request(&self.config, prompt, detailed);
        let body = self.complete(&request)?;
        parse_response(&body, target_slides)
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
    response_format: ResponseFormat,
}

#[derive(Debug, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChatMessage,
}

/// System instruction plus the prompt restated with its extracted directives.
fn build_request(config: &ClientConfig, prompt: &str, detailed: bool) -> ChatRequest {
    let extracted = instructions::extract(prompt);
    if !extracted.is_empty() {
        log::debug!(
            "Prompt carries {} slide and {} general directives",
            extracted.slide_instructions.len(),
            extracted.general_instructions.len()
        );
    }

    let target_slides = extract_target_slides(prompt);
    ChatRequest {
        model: config.model.clone(),
        messages: vec![
            ChatMessage {
                role: "system".to_string(),
                content: Some(system_prompt(target_slides, detailed)),
            },
            ChatMessage {
                role: "user".to_string(),
                content: Some(enhance_prompt(prompt, &extracted)),
            },
        ],
        temperature: config.temperature,
        response_format: ResponseFormat {
            kind: "json_object",
        },
    }
}

/// Pull `choices[0].message.content` out of the response and parse it as an
/// outline.
fn parse_response(body: &str, fallback_target: usize) -> Result<Outline> {
    let response: ChatResponse = serde_json::from_str(body)
        .map_err(|e| Error::UpstreamParse(format!("invalid response JSON: {}", e)))?;

    let content = response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .ok_or_else(|| {
            Error::UpstreamParse("response has no choices[0].message.content".to_string())
        })?;

    Outline::from_json(&content, fallback_target)
}
