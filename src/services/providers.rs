//! Remote text-completion backends.
//!
//! Every backend exposes the same capability: turn a prompt into completion
//! text. The request shape, auth headers and the place the text lives in the
//! response differ per vendor and stay inside each implementation.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use serde_json::{json, Value};

use super::http::JsonHttpClient;
use crate::{
    config::{AiProvider, EstimatorConfig},
    error::{EstimatorError, Result},
};

const MAX_TOKENS: u32 = 1000;
const TEMPERATURE: f64 = 0.3;
const ANTHROPIC_VERSION: &str = "2023-06-01";
const JSON_ONLY_SYSTEM_PROMPT: &str =
    "You are a travel cost estimation expert. Always respond with valid JSON only.";

/// A backend that can complete a prompt.
#[async_trait]
pub trait CompletionProvider: Send + Sync + std::fmt::Debug {
    /// Short provider name used in logs
    fn name(&self) -> &'static str;

    /// Send `prompt` and return the raw completion text
    async fn complete(&self, prompt: &str) -> Result<String>;
}

/// Build the backend selected by `config`.
///
/// Fails with a configuration error when no API key is set.
pub fn build_provider(config: &EstimatorConfig) -> Result<Box<dyn CompletionProvider>> {
    let api_key = config.api_key().ok_or_else(|| {
        EstimatorError::Config(format!("no API key configured for {}", config.provider))
    })?;
    let http = JsonHttpClient::new(config.base_url(), config.timeout, config.max_retries)?;
    let model = config.model().to_string();

    let provider: Box<dyn CompletionProvider> = match config.provider {
        AiProvider::OpenAI => Box::new(OpenAIProvider::new(http, api_key, model)?),
        AiProvider::Anthropic => Box::new(AnthropicProvider::new(http, api_key, model)?),
        AiProvider::Cohere => Box::new(CohereProvider::new(http, api_key, model)?),
        AiProvider::Mistral => Box::new(MistralProvider::new(http, api_key, model)?),
    };

    Ok(provider)
}

fn bearer_headers(api_key: &str) -> Result<HeaderMap> {
    let mut headers = HeaderMap::new();
    headers.insert(AUTHORIZATION, header_value(&format!("Bearer {api_key}"))?);
    Ok(headers)
}

fn header_value(value: &str) -> Result<HeaderValue> {
    HeaderValue::from_str(value)
        .map_err(|_| EstimatorError::Config("API key contains invalid header characters".into()))
}

/// Follow a JSON pointer to the completion text.
fn completion_text(response: &Value, pointer: &str, provider: &str) -> Result<String> {
    response
        .pointer(pointer)
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| {
            EstimatorError::Provider(format!(
                "{provider} response has no completion text at `{pointer}`"
            ))
        })
}

/// OpenAI chat completions.
#[derive(Debug)]
pub struct OpenAIProvider {
    http: JsonHttpClient,
    headers: HeaderMap,
    model: String,
}

impl OpenAIProvider {
    pub fn new(http: JsonHttpClient, api_key: &str, model: impl Into<String>) -> Result<Self> {
        Ok(Self {
            http,
            headers: bearer_headers(api_key)?,
            model: model.into(),
        })
    }
}

#[async_trait]
impl CompletionProvider for OpenAIProvider {
    fn name(&self) -> &'static str {
        "openai"
    }

    async fn complete(&self, prompt: &str) -> Result<String> {
        let body = json!({
            "model": self.model,
            "messages": [
                { "role": "system", "content": JSON_ONLY_SYSTEM_PROMPT },
                { "role": "user", "content": prompt }
            ],
            "temperature": TEMPERATURE,
            "max_tokens": MAX_TOKENS,
        });

        let response = self
            .http
            .post_json("/chat/completions", self.headers.clone(), &body)
            .await?;
        completion_text(&response, "/choices/0/message/content", self.name())
    }
}

/// Anthropic messages API.
#[derive(Debug)]
pub struct AnthropicProvider {
    http: JsonHttpClient,
    headers: HeaderMap,
    model: String,
}

impl AnthropicProvider {
    pub fn new(http: JsonHttpClient, api_key: &str, model: impl Into<String>) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert("x-api-key", header_value(api_key)?);
        headers.insert(
            "anthropic-version",
            HeaderValue::from_static(ANTHROPIC_VERSION),
        );

        Ok(Self {
            http,
            headers,
            model: model.into(),
        })
    }
}

#[async_trait]
impl CompletionProvider for AnthropicProvider {
    fn name(&self) -> &'static str {
        "anthropic"
    }

    async fn complete(&self, prompt: &str) -> Result<String> {
        let body = json!({
            "model": self.model,
            "max_tokens": MAX_TOKENS,
            "messages": [
                { "role": "user", "content": prompt }
            ],
        });

        let response = self
            .http
            .post_json("/messages", self.headers.clone(), &body)
            .await?;
        completion_text(&response, "/content/0/text", self.name())
    }
}

/// Cohere generate API.
#[derive(Debug)]
pub struct CohereProvider {
    http: JsonHttpClient,
    headers: HeaderMap,
    model: String,
}

impl CohereProvider {
    pub fn new(http: JsonHttpClient, api_key: &str, model: impl Into<String>) -> Result<Self> {
        Ok(Self {
            http,
            headers: bearer_headers(api_key)?,
            model: model.into(),
        })
    }
}

#[async_trait]
impl CompletionProvider for CohereProvider {
    fn name(&self) -> &'static str {
        "cohere"
    }

    async fn complete(&self, prompt: &str) -> Result<String> {
        let body = json!({
            "model": self.model,
            "prompt": prompt,
            "max_tokens": MAX_TOKENS,
            "temperature": TEMPERATURE,
        });

        let response = self
            .http
            .post_json("/generate", self.headers.clone(), &body)
            .await?;
        completion_text(&response, "/generations/0/text", self.name())
    }
}

/// Mistral chat completions.
#[derive(Debug)]
pub struct MistralProvider {
    http: JsonHttpClient,
    headers: HeaderMap,
    model: String,
}

impl MistralProvider {
    pub fn new(http: JsonHttpClient, api_key: &str, model: impl Into<String>) -> Result<Self> {
        Ok(Self {
            http,
            headers: bearer_headers(api_key)?,
            model: model.into(),
        })
    }
}

#[async_trait]
impl CompletionProvider for MistralProvider {
    fn name(&self) -> &'static str {
        "mistral"
    }

    async fn complete(&self, prompt: &str) -> Result<String> {
        let body = json!({
            "model": self.model,
            "messages": [
                { "role": "user", "content": prompt }
            ],
            "temperature": TEMPERATURE,
            "max_tokens": MAX_TOKENS,
        });

        let response = self
            .http
            .post_json("/chat/completions", self.headers.clone(), &body)
            .await?;
        completion_text(&response, "/choices/0/message/content", self.name())
    }
}
