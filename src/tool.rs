use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{DaytripError, Result};

/// The closed set of tools this crate ships. The agent framework addresses
/// tools by these wire names; anything else fails at the registry boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToolId {
    GetWeather,
    Calculator,
    MiniWiki,
    SuggestCityActivities,
}

impl ToolId {
    pub const ALL: [ToolId; 4] = [
        ToolId::GetWeather,
        ToolId::Calculator,
        ToolId::MiniWiki,
        ToolId::SuggestCityActivities,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ToolId::GetWeather => "get_weather",
            ToolId::Calculator => "calculator",
            ToolId::MiniWiki => "mini_wiki",
            ToolId::SuggestCityActivities => "suggest_city_activities",
        }
    }

    pub fn parse(name: &str) -> Option<ToolId> {
        match name {
            "get_weather" => Some(ToolId::GetWeather),
            "calculator" => Some(ToolId::Calculator),
            "mini_wiki" => Some(ToolId::MiniWiki),
            "suggest_city_activities" => Some(ToolId::SuggestCityActivities),
            _ => None,
        }
    }
}

impl fmt::Display for ToolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A single-string-in, single-string-out tool.
///
/// `call` is total over its input: user mistakes, network failures, and
/// evaluation failures all come back as descriptive text, never as an error.
/// The single-string shape is what the orchestrating framework's
/// action-input parser expects.
#[async_trait]
pub trait Tool: Send + Sync {
    fn id(&self) -> ToolId;
    fn description(&self) -> &str;

    /// Optionally return a JSON Schema-like object describing the expected input.
    fn parameters(&self) -> Option<Value> {
        None
    }

    async fn call(&self, input: &str) -> String;
}

/// Static description of a tool that can be embedded in prompts.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ToolDescription {
    pub name: String,
    pub description: String,
    pub parameters: Option<Value>,
}

#[derive(Default, Clone)]
pub struct ToolRegistry {
    tools: HashMap<ToolId, Arc<dyn Tool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self {
            tools: HashMap::new(),
        }
    }

    pub fn register<T: Tool + 'static>(&mut self, tool: T) {
        self.tools.insert(tool.id(), Arc::new(tool));
    }

    pub fn get(&self, id: ToolId) -> Option<Arc<dyn Tool>> {
        self.tools.get(&id).cloned()
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.tools.keys().map(|id| id.name()).collect()
    }

    pub fn describe(&self) -> Vec<ToolDescription> {
        let mut descriptions: Vec<ToolDescription> = self
            .tools
            .values()
            .map(|tool| ToolDescription {
                name: tool.id().name().to_string(),
                description: tool.description().to_string(),
                parameters: tool.parameters(),
            })
            .collect();

        descriptions.sort_by(|a, b| a.name.cmp(&b.name));
        descriptions
    }

    pub async fn call(&self, name: &str, input: &str) -> Result<String> {
        let tool = ToolId::parse(name)
            .and_then(|id| self.tools.get(&id))
            .ok_or_else(|| DaytripError::ToolNotFound(name.to_string()))?;
        Ok(tool.call(input).await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    struct Upper;

    #[async_trait]
    impl Tool for Upper {
        fn id(&self) -> ToolId {
            ToolId::MiniWiki
        }

        fn description(&self) -> &str {
            "Uppercase the input"
        }

        async fn call(&self, input: &str) -> String {
            input.to_uppercase()
        }
    }

    #[test]
    fn tool_ids_round_trip_through_wire_names() {
        for id in ToolId::ALL {
            assert_eq!(ToolId::parse(id.name()), Some(id));
        }
        assert_eq!(ToolId::parse("file_search"), None);
    }

    #[tokio::test]
    async fn dispatches_by_wire_name() {
        let mut registry = ToolRegistry::new();
        registry.register(Upper);

        let out = registry.call("mini_wiki", "hello").await.unwrap();
        assert_eq!(out, "HELLO");
    }

    #[tokio::test]
    async fn unknown_names_are_rejected() {
        let registry = ToolRegistry::new();
        let err = registry.call("sql_query", "select 1").await.unwrap_err();
        assert!(matches!(err, DaytripError::ToolNotFound(name) if name == "sql_query"));
    }
}
