//! Chat model clients and the platform selector.
//!
//! The lab runs against either a local Ollama endpoint or the hosted OpenAI
//! API; `get_models` picks one from a platform string. Clients are plain
//! owned handles: nothing is cached across calls, and callers decide the
//! lifetime.

use std::collections::VecDeque;
use std::str::FromStr;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::config::ModelConfig;
use crate::error::{DaytripError, Result};

pub const OLLAMA_HOST: &str = "http://127.0.0.1:11434";
pub const OLLAMA_MODEL: &str = "llama3.1:8b";
pub const OPENAI_MODEL: &str = "gpt-3.5-turbo";
pub const DEFAULT_TEMPERATURE: f64 = 0.7;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Ollama,
    OpenAI,
}

impl FromStr for Platform {
    type Err = DaytripError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "ollama" => Ok(Platform::Ollama),
            "openai" => Ok(Platform::OpenAI),
            other => Err(DaytripError::LanguageModel(format!(
                "unsupported platform `{other}`: choose `ollama` or `openai`"
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// Minimal abstraction around a chat completion provider.
#[async_trait]
pub trait LanguageModel: Send + Sync {
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String>;
}

fn coalesce_error(status: reqwest::StatusCode, body: &str, provider: &str) -> DaytripError {
    if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
        return DaytripError::LanguageModel(format!("{provider} rate limit exceeded: {body}"));
    }
    DaytripError::LanguageModel(format!("{provider} request failed with {status}: {body}"))
}

// ─────────────────────────────────────────────────────────────────────────────
// Ollama Client (Local LLM)
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct OllamaClient {
    http: reqwest::Client,
    model: String,
    base_url: String,
    temperature: f64,
}

impl OllamaClient {
    pub fn new() -> Self {
        Self {
            http: reqwest::Client::builder()
                .timeout(Duration::from_secs(300)) // Local models can be slow
                .build()
                .expect("failed to build http client"),
            model: OLLAMA_MODEL.to_string(),
            base_url: OLLAMA_HOST.to_string(),
            temperature: DEFAULT_TEMPERATURE,
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.base_url = host.into();
        self
    }

    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl Default for OllamaClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LanguageModel for OllamaClient {
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String> {
        let body = json!({
            "model": self.model,
            "messages": messages,
            "stream": false,
            "options": { "temperature": self.temperature },
        });

        let resp = self
            .http
            .post(format!("{}/api/chat", self.base_url))
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| DaytripError::LanguageModel(format!("Ollama request failed: {e}")))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(coalesce_error(status, &body, "Ollama"));
        }

        let json: Value = resp
            .json()
            .await
            .map_err(|e| DaytripError::LanguageModel(format!("Ollama parse error: {e}")))?;

        json["message"]["content"]
            .as_str()
            .map(String::from)
            .ok_or_else(|| DaytripError::LanguageModel("Ollama returned no content".into()))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// OpenAI Client (Hosted API)
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct OpenAIClient {
    http: reqwest::Client,
    model: String,
    api_key: Option<String>,
    base_url: String,
    temperature: f64,
}

impl OpenAIClient {
    /// Reads `OPENAI_API_KEY` if present; the key is only required once a
    /// request is actually made, so constructing a client never fails.
    pub fn new() -> Self {
        Self {
            http: reqwest::Client::builder()
                .timeout(Duration::from_secs(60))
                .build()
                .expect("failed to build http client"),
            model: OPENAI_MODEL.to_string(),
            api_key: std::env::var("OPENAI_API_KEY").ok(),
            base_url: "https://api.openai.com/v1".to_string(),
            temperature: DEFAULT_TEMPERATURE,
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl Default for OpenAIClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LanguageModel for OpenAIClient {
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String> {
        let api_key = self.api_key.as_deref().ok_or_else(|| {
            DaytripError::LanguageModel("OPENAI_API_KEY is not set".into())
        })?;

        let body = json!({
            "model": self.model,
            "messages": messages,
            "temperature": self.temperature,
        });

        let resp = self
            .http
            .post(format!("{}/chat/completions", self.base_url))
            .header(
                reqwest::header::AUTHORIZATION,
                format!("Bearer {api_key}"),
            )
            .json(&body)
            .send()
            .await
            .map_err(|e| DaytripError::LanguageModel(format!("OpenAI request error: {e}")))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(coalesce_error(status, &body, "openai"));
        }

        let json: Value = resp
            .json()
            .await
            .map_err(|e| DaytripError::LanguageModel(format!("OpenAI parse error: {e}")))?;

        json["choices"]
            .as_array()
            .and_then(|choices| choices.first())
            .and_then(|choice| choice["message"]["content"].as_str())
            .map(String::from)
            .ok_or_else(|| DaytripError::LanguageModel("OpenAI returned no choices".into()))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Platform selector
// ─────────────────────────────────────────────────────────────────────────────

/// A chat client bound to one platform. The wrapped clients are explicitly
/// owned; callers that want reuse hold on to the value themselves.
#[derive(Clone)]
pub enum ChatClient {
    Ollama(OllamaClient),
    OpenAI(OpenAIClient),
}

impl ChatClient {
    pub fn platform(&self) -> Platform {
        match self {
            ChatClient::Ollama(_) => Platform::Ollama,
            ChatClient::OpenAI(_) => Platform::OpenAI,
        }
    }

    pub fn model(&self) -> &str {
        match self {
            ChatClient::Ollama(client) => client.model(),
            ChatClient::OpenAI(client) => client.model(),
        }
    }

    /// Build a client from configuration instead of the baked-in constants.
    pub fn from_config(cfg: &ModelConfig) -> Result<Self> {
        match cfg.platform.parse::<Platform>()? {
            Platform::Ollama => Ok(ChatClient::Ollama(
                OllamaClient::new()
                    .with_host(cfg.ollama.host.clone())
                    .with_model(cfg.ollama.model.clone())
                    .with_temperature(cfg.temperature),
            )),
            Platform::OpenAI => {
                let mut client = OpenAIClient::new()
                    .with_model(cfg.openai.model.clone())
                    .with_temperature(cfg.temperature);
                if let Some(key) = &cfg.openai.api_key {
                    client = client.with_api_key(key.clone());
                }
                if let Some(url) = &cfg.openai.base_url {
                    client = client.with_base_url(url.clone());
                }
                Ok(ChatClient::OpenAI(client))
            }
        }
    }
}

#[async_trait]
impl LanguageModel for ChatClient {
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String> {
        match self {
            ChatClient::Ollama(client) => client.complete(messages).await,
            ChatClient::OpenAI(client) => client.complete(messages).await,
        }
    }
}

/// Platform-string factory: `"ollama"` or `"openai"`, anything else errors.
/// An unsupported platform is a deployment mistake, the one failure in this
/// crate that is allowed to be loud.
pub fn get_models(platform: &str) -> Result<ChatClient> {
    match platform.parse::<Platform>()? {
        Platform::Ollama => Ok(ChatClient::Ollama(OllamaClient::new())),
        Platform::OpenAI => Ok(ChatClient::OpenAI(OpenAIClient::new())),
    }
}

/// A deterministic model used for tests and demos.
pub struct StubModel {
    responses: Mutex<VecDeque<String>>,
}

impl StubModel {
    pub fn new(responses: Vec<String>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
        }
    }
}

#[async_trait]
impl LanguageModel for StubModel {
    async fn complete(&self, _messages: &[ChatMessage]) -> Result<String> {
        let mut locked = self.responses.lock().expect("stub model poisoned");
        locked.pop_front().ok_or_else(|| {
            DaytripError::LanguageModel("StubModel ran out of scripted responses".into())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selects_each_supported_platform() {
        let ollama = get_models("ollama").unwrap();
        assert_eq!(ollama.platform(), Platform::Ollama);
        assert_eq!(ollama.model(), OLLAMA_MODEL);

        let openai = get_models("openai").unwrap();
        assert_eq!(openai.platform(), Platform::OpenAI);
        assert_eq!(openai.model(), OPENAI_MODEL);
    }

    #[test]
    fn rejects_unknown_platforms() {
        let err = match get_models("mars") {
            Err(err) => err,
            Ok(_) => panic!("mars should not resolve to a client"),
        };
        assert!(matches!(err, DaytripError::LanguageModel(msg) if msg.contains("mars")));
    }

    #[tokio::test]
    async fn stub_model_replays_scripted_responses() {
        let stub = StubModel::new(vec!["first".into(), "second".into()]);
        let messages = [ChatMessage::user("hi")];
        assert_eq!(stub.complete(&messages).await.unwrap(), "first");
        assert_eq!(stub.complete(&messages).await.unwrap(), "second");
        assert!(stub.complete(&messages).await.is_err());
    }
}
