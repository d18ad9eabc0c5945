//! Mini-encyclopedia tool: a tiny offline topic table for when the agent
//! has no internet access.

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::tool::{Tool, ToolId};

const NOT_FOUND: &str =
    "No entry found in mini_wiki. Try 'Alan Turing', 'Agentic AI', or 'LangChain'.";

fn entry(topic: &str) -> Option<&'static str> {
    match topic {
        "alan turing" => Some(
            "Alan Turing (1912-1954) was a mathematician and pioneer of computer science who \
             formalized computation and contributed to codebreaking in WWII.",
        ),
        "agentic ai" => Some(
            "Agentic AI refers to systems that can plan, choose tools/actions, and adapt using \
             feedback, rather than only producing text responses.",
        ),
        "langchain" => Some(
            "LangChain is a framework that provides building blocks for LLM apps: prompts, \
             chains, tools, memory, and agents.",
        ),
        _ => None,
    }
}

pub struct MiniWikiTool;

#[async_trait]
impl Tool for MiniWikiTool {
    fn id(&self) -> ToolId {
        ToolId::MiniWiki
    }

    fn description(&self) -> &str {
        "Return a short summary from a tiny offline encyclopedia. Useful for quick references when internet is unavailable."
    }

    fn parameters(&self) -> Option<Value> {
        Some(json!({
            "type": "object",
            "properties": {
                "input": {"type": "string", "description": "Topic to look up"}
            },
            "required": ["input"]
        }))
    }

    async fn call(&self, input: &str) -> String {
        let topic: String = input
            .trim()
            .chars()
            .filter(|c| !matches!(c, '\'' | '"'))
            .collect::<String>()
            .to_lowercase();
        tracing::debug!(%topic, "mini_wiki lookup");
        entry(&topic).unwrap_or(NOT_FOUND).to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn lookup_is_case_insensitive() {
        let tool = MiniWikiTool;
        let exact = tool.call("alan turing").await;
        let mixed = tool.call("Alan Turing").await;
        assert_eq!(exact, mixed);
        assert!(exact.contains("mathematician"));
    }

    #[tokio::test]
    async fn strips_quotes_before_lookup() {
        let tool = MiniWikiTool;
        let out = tool.call("  \"LangChain\" ").await;
        assert!(out.contains("building blocks"));
    }

    #[tokio::test]
    async fn unknown_topics_get_the_fixed_message() {
        let tool = MiniWikiTool;
        assert_eq!(tool.call("quantum computing").await, NOT_FOUND);
    }
}
