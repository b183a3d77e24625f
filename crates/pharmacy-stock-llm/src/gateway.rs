//! Generative-language gateway clients.
//!
//! The assistant never talks to the network directly. It receives an
//! [`AssistantGateway`] at construction time, which lets tests swap in
//! [`MockGateway`] and lets deployments without an API key run with
//! [`UnconfiguredGateway`].

use std::sync::Mutex;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::extraction::{extract_reply_text, GenerateContentResponse};

/// Gateway errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GatewayError {
    #[error("AI assistant is not configured (missing API key)")]
    NotConfigured,

    #[error("Cannot reach AI service at {0}")]
    Connection(String),

    #[error("AI service timed out after {0}s")]
    Timeout(u64),

    #[error("AI service returned HTTP {status}: {body}")]
    Http { status: u16, body: String },

    #[error("Could not parse AI service response: {0}")]
    ResponseParsing(String),

    #[error("AI service returned an empty response")]
    EmptyResponse,

    #[error("HTTP client error: {0}")]
    Client(String),
}

pub type GatewayResult<T> = Result<T, GatewayError>;

/// Text-in/text-out access to an external generative-language service.
pub trait AssistantGateway: Send + Sync {
    /// Send a prompt and return the service's text reply.
    fn generate(&self, prompt: &str) -> GatewayResult<String>;

    /// List models visible to the configured credentials.
    fn list_models(&self) -> GatewayResult<Vec<String>>;
}

/// Connection settings for [`GeminiGateway`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GatewaySettings {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
    pub timeout_secs: u64,
}

impl GatewaySettings {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: "https://generativelanguage.googleapis.com".to_string(),
            model: "gemini-1.5-flash".to_string(),
            timeout_secs: 30,
        }
    }
}

/// HTTP client for the Gemini `generateContent` API.
pub struct GeminiGateway {
    settings: GatewaySettings,
    client: reqwest::blocking::Client,
}

impl GeminiGateway {
    /// Build a client whose every request is bounded by `settings.timeout_secs`.
    pub fn new(mut settings: GatewaySettings) -> GatewayResult<Self> {
        settings.base_url = settings.base_url.trim_end_matches('/').to_string();
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()
            .map_err(|e| GatewayError::Client(e.to_string()))?;
        Ok(Self { settings, client })
    }

    pub fn model(&self) -> &str {
        &self.settings.model
    }

    fn map_send_error(&self, e: reqwest::Error) -> GatewayError {
        if e.is_timeout() {
            GatewayError::Timeout(self.settings.timeout_secs)
        } else if e.is_connect() {
            GatewayError::Connection(self.settings.base_url.clone())
        } else {
            GatewayError::Client(e.to_string())
        }
    }

    fn check_status(
        response: reqwest::blocking::Response,
    ) -> GatewayResult<reqwest::blocking::Response> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(GatewayError::Http {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }
}

/// Request body for `models/{model}:generateContent`.
#[derive(Serialize)]
struct GenerateContentRequest<'a> {
    contents: Vec<RequestContent<'a>>,
}

#[derive(Serialize)]
struct RequestContent<'a> {
    parts: Vec<RequestPart<'a>>,
}

#[derive(Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

/// Response body from `GET models`.
#[derive(Deserialize)]
struct ListModelsResponse {
    #[serde(default)]
    models: Vec<ModelInfo>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ModelInfo {
    name: String,
    #[serde(default)]
    supported_generation_methods: Vec<String>,
}

impl AssistantGateway for GeminiGateway {
    fn generate(&self, prompt: &str) -> GatewayResult<String> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.settings.base_url, self.settings.model
        );
        let body = GenerateContentRequest {
            contents: vec![RequestContent {
                parts: vec![RequestPart { text: prompt }],
            }],
        };

        tracing::debug!(
            model = %self.settings.model,
            prompt_len = prompt.len(),
            "Calling AI gateway"
        );

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.settings.api_key)
            .json(&body)
            .send()
            .map_err(|e| self.map_send_error(e))?;
        let response = Self::check_status(response)?;

        let parsed: GenerateContentResponse = response
            .json()
            .map_err(|e| GatewayError::ResponseParsing(e.to_string()))?;

        extract_reply_text(&parsed)
    }

    fn list_models(&self) -> GatewayResult<Vec<String>> {
        let url = format!("{}/v1beta/models", self.settings.base_url);

        let response = self
            .client
            .get(&url)
            .header("x-goog-api-key", &self.settings.api_key)
            .send()
            .map_err(|e| self.map_send_error(e))?;
        let response = Self::check_status(response)?;

        let parsed: ListModelsResponse = response
            .json()
            .map_err(|e| GatewayError::ResponseParsing(e.to_string()))?;

        Ok(parsed
            .models
            .into_iter()
            .filter(|m| {
                m.supported_generation_methods.is_empty()
                    || m
                        .supported_generation_methods
                        .iter()
                        .any(|g| g == "generateContent")
            })
            .map(|m| m.name)
            .collect())
    }
}

/// Gateway used when no API key is configured. Every call fails.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnconfiguredGateway;

impl AssistantGateway for UnconfiguredGateway {
    fn generate(&self, _prompt: &str) -> GatewayResult<String> {
        Err(GatewayError::NotConfigured)
    }

    fn list_models(&self) -> GatewayResult<Vec<String>> {
        Err(GatewayError::NotConfigured)
    }
}

/// Mock gateway for testing: returns a canned reply and records prompts.
pub struct MockGateway {
    reply: GatewayResult<String>,
    models: Vec<String>,
    prompts: Mutex<Vec<String>>,
}

impl MockGateway {
    pub fn new(reply: &str) -> Self {
        Self {
            reply: Ok(reply.to_string()),
            models: vec!["models/mock-1".to_string()],
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(error: GatewayError) -> Self {
        Self {
            reply: Err(error),
            models: Vec::new(),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn with_models(mut self, models: Vec<String>) -> Self {
        self.models = models;
        self
    }

    /// Prompts received so far, oldest first.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts
            .lock()
            .map(|p| p.clone())
            .unwrap_or_default()
    }
}

impl AssistantGateway for MockGateway {
    fn generate(&self, prompt: &str) -> GatewayResult<String> {
        if let Ok(mut prompts) = self.prompts.lock() {
            prompts.push(prompt.to_string());
        }
        self.reply.clone()
    }

    fn list_models(&self) -> GatewayResult<Vec<String>> {
        match &self.reply {
            Ok(_) => Ok(self.models.clone()),
            Err(e) => Err(e.clone()),
        }
    }
}
