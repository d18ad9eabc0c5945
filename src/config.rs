use std::env;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{DaytripError, Result};
use crate::llm;
use crate::tools::WeatherConfig;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OllamaConfig {
    #[serde(default = "default_ollama_host")]
    pub host: String,
    #[serde(default = "default_ollama_model")]
    pub model: String,
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            host: default_ollama_host(),
            model: default_ollama_model(),
        }
    }
}

fn default_ollama_host() -> String {
    llm::OLLAMA_HOST.to_string()
}

fn default_ollama_model() -> String {
    llm::OLLAMA_MODEL.to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OpenAIConfig {
    #[serde(default = "default_openai_model")]
    pub model: String,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub base_url: Option<String>,
}

impl Default for OpenAIConfig {
    fn default() -> Self {
        Self {
            model: default_openai_model(),
            api_key: None,
            base_url: None,
        }
    }
}

fn default_openai_model() -> String {
    llm::OPENAI_MODEL.to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ModelConfig {
    #[serde(default = "default_platform")]
    pub platform: String,
    #[serde(default = "default_temperature")]
    pub temperature: f64,
    #[serde(default)]
    pub ollama: OllamaConfig,
    #[serde(default)]
    pub openai: OpenAIConfig,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            platform: default_platform(),
            temperature: default_temperature(),
            ollama: OllamaConfig::default(),
            openai: OpenAIConfig::default(),
        }
    }
}

fn default_platform() -> String {
    "ollama".to_string()
}

fn default_temperature() -> f64 {
    llm::DEFAULT_TEMPERATURE
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub model: ModelConfig,
    #[serde(default)]
    pub weather: WeatherConfig,
}

impl AppConfig {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let raw = fs::read_to_string(path)?;
        let cfg: Self = toml::from_str(&raw)
            .map_err(|err| DaytripError::Protocol(format!("failed to parse configuration: {err}")))?;
        Ok(cfg)
    }

    pub fn from_env_or_file(path: impl AsRef<Path>) -> Result<Self> {
        let mut cfg = Self::from_file(path)?;
        if let Ok(platform) = env::var("DAYTRIP_PLATFORM") {
            cfg.model.platform = platform;
        }
        if let Ok(temperature) = env::var("DAYTRIP_TEMPERATURE") {
            if let Ok(parsed) = temperature.parse::<f64>() {
                cfg.model.temperature = parsed;
            }
        }
        if let Ok(host) = env::var("DAYTRIP_OLLAMA_HOST") {
            cfg.model.ollama.host = host;
        }
        if let Ok(model) = env::var("DAYTRIP_OLLAMA_MODEL") {
            cfg.model.ollama.model = model;
        }
        if let Ok(model) = env::var("DAYTRIP_OPENAI_MODEL") {
            cfg.model.openai.model = model;
        }
        if let Ok(key) = env::var("DAYTRIP_OPENAI_API_KEY") {
            cfg.model.openai.api_key = Some(key);
        }
        if let Ok(url) = env::var("DAYTRIP_WEATHER_URL") {
            cfg.weather.weather_url = url;
        }
        if let Ok(url) = env::var("DAYTRIP_GEOCODE_URL") {
            cfg.weather.geocode_url = url;
        }
        if let Ok(timeout) = env::var("DAYTRIP_WEATHER_TIMEOUT") {
            if let Ok(parsed) = timeout.parse::<u64>() {
                cfg.weather.timeout_secs = parsed;
            }
        }
        Ok(cfg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn loads_file_with_defaults() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[model]\nplatform='openai'").unwrap();

        let cfg = AppConfig::from_file(file.path()).unwrap();
        assert_eq!(cfg.model.platform, "openai");
        assert_eq!(cfg.model.temperature, llm::DEFAULT_TEMPERATURE);
        assert_eq!(cfg.model.ollama.host, llm::OLLAMA_HOST);
        assert_eq!(cfg.weather.timeout_secs, 10);
    }

    #[test]
    fn env_overrides_win() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[model]\nplatform='ollama'\n[model.ollama]\nhost='http://10.0.0.5:11434'\nmodel='llama3.1:8b'"
        )
        .unwrap();

        env::set_var("DAYTRIP_OLLAMA_MODEL", "qwen2.5:7b");
        let cfg = AppConfig::from_env_or_file(file.path()).unwrap();
        env::remove_var("DAYTRIP_OLLAMA_MODEL");

        assert_eq!(cfg.model.ollama.host, "http://10.0.0.5:11434");
        assert_eq!(cfg.model.ollama.model, "qwen2.5:7b");
    }

    #[test]
    fn rejects_malformed_toml() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[model\nplatform=").unwrap();

        let err = AppConfig::from_file(file.path()).unwrap_err();
        assert!(matches!(err, DaytripError::Protocol(_)));
    }
}
