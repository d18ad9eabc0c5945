//! Weather lookup tool.
//!
//! Resolves a free-text city to a canonical place name through a geocoding
//! service, then fetches a one-line report from a wttr.in-style endpoint.
//! Every failure path degrades to a fixed mild/clear fallback sentence.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::tool::{Tool, ToolId};

/// Endpoints and timeout for the weather tool.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct WeatherConfig {
    #[serde(default = "default_geocode_url")]
    pub geocode_url: String,
    #[serde(default = "default_weather_url")]
    pub weather_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            geocode_url: default_geocode_url(),
            weather_url: default_weather_url(),
            timeout_secs: default_timeout_secs(),
            user_agent: default_user_agent(),
        }
    }
}

impl WeatherConfig {
    pub fn with_geocode_url(mut self, url: impl Into<String>) -> Self {
        self.geocode_url = url.into();
        self
    }

    pub fn with_weather_url(mut self, url: impl Into<String>) -> Self {
        self.weather_url = url.into();
        self
    }

    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

fn default_geocode_url() -> String {
    "https://nominatim.openstreetmap.org/search".to_string()
}

fn default_weather_url() -> String {
    "http://wttr.in".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_user_agent() -> String {
    "daytrip/0.1 (+https://github.com/daytrip-rs/daytrip)".to_string()
}

pub struct WeatherTool {
    config: WeatherConfig,
    http: reqwest::Client,
}

impl WeatherTool {
    pub fn new(config: WeatherConfig) -> Self {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .expect("failed to build http client");
        Self { config, http }
    }

    /// Canonical place name from the geocoder, or `None` when the lookup
    /// misses or the service is unreachable. Callers fall back to the
    /// normalized input in that case.
    async fn resolve_place(&self, city: &str) -> Option<String> {
        let response = self
            .http
            .get(&self.config.geocode_url)
            .query(&[("q", city), ("format", "json"), ("limit", "1")])
            .header(reqwest::header::USER_AGENT, &self.config.user_agent)
            .send()
            .await
            .ok()?;

        if !response.status().is_success() {
            return None;
        }

        let hits: Vec<Value> = response.json().await.ok()?;
        let display_name = hits.first()?.get("display_name")?.as_str()?;
        let place = display_name.split(',').next()?.trim();
        if place.is_empty() {
            None
        } else {
            Some(place.to_string())
        }
    }

    async fn fetch_report(&self, place: &str) -> Option<String> {
        let url = format!(
            "{}/{}?format=3",
            self.config.weather_url.trim_end_matches('/'),
            urlencoding::encode(place)
        );
        let response = self.http.get(&url).send().await.ok()?;
        if response.status() != reqwest::StatusCode::OK {
            return None;
        }
        let body = response.text().await.ok()?;
        Some(body.trim().to_string())
    }
}

#[async_trait]
impl Tool for WeatherTool {
    fn id(&self) -> ToolId {
        ToolId::GetWeather
    }

    fn description(&self) -> &str {
        "Get a one-line weather report for a city. Input: city name (e.g., 'Paris')."
    }

    fn parameters(&self) -> Option<Value> {
        Some(json!({
            "type": "object",
            "properties": {
                "input": {"type": "string", "description": "City name, arbitrary case and quoting"}
            },
            "required": ["input"]
        }))
    }

    async fn call(&self, input: &str) -> String {
        let requested = normalize_city(input);
        let place = self
            .resolve_place(&requested)
            .await
            .unwrap_or_else(|| requested.clone());
        tracing::debug!(%place, "looking up weather");

        match self.fetch_report(&place).await {
            Some(report) => sanitize(&demojize(&report)),
            None => sanitize(&format!(
                "No weather found for {requested}: assume mild 22 C and clear skies for the demo"
            )),
        }
    }
}

fn normalize_city(input: &str) -> String {
    input
        .trim()
        .chars()
        .filter(|c| !matches!(c, '\'' | '"'))
        .collect::<String>()
        .to_lowercase()
}

/// Replace each emoji codepoint with its `:shortcode:` textual name.
/// Non-emoji characters pass through untouched.
fn demojize(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut buf = [0u8; 4];
    for c in text.chars() {
        match emojis::get(c.encode_utf8(&mut buf)) {
            Some(emoji) => {
                let name = emoji
                    .shortcode()
                    .map(str::to_string)
                    .unwrap_or_else(|| emoji.name().replace(' ', "_"));
                out.push(':');
                out.push_str(&name);
                out.push(':');
            }
            None => out.push(c),
        }
    }
    out
}

/// Keep alphanumerics, whitespace, and the report punctuation set.
fn sanitize(text: &str) -> String {
    text.chars()
        .filter(|c| c.is_alphanumeric() || c.is_whitespace() || "CF%mhp/:-+".contains(*c))
        .collect()
}
