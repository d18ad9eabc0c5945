//! String-in/string-out tools for agent runtimes.
//!
//! The crate provides the callable side of a small tool-using assistant:
//! - A closed tool set (`ToolId`, `Tool`, `ToolRegistry`) the orchestrating
//!   framework dispatches into by name.
//! - Four deterministic tools: weather lookup, a restricted calculator, a
//!   mini encyclopedia, and a city-activity recommender.
//! - Chat model clients selected by platform (`get_models`, `ChatClient`).
//!
//! The agent loop, memory, and prompt templating live in the external
//! framework; nothing here holds state across calls.

mod config;
mod error;
mod llm;
pub mod telemetry;
mod tool;
pub mod tools;

pub use config::{AppConfig, ModelConfig, OllamaConfig, OpenAIConfig};
pub use error::{DaytripError, Result};
pub use llm::{
    get_models, ChatClient, ChatMessage, LanguageModel, OllamaClient, OpenAIClient, Platform,
    Role, StubModel, DEFAULT_TEMPERATURE, OLLAMA_HOST, OLLAMA_MODEL, OPENAI_MODEL,
};
pub use tool::{Tool, ToolDescription, ToolId, ToolRegistry};
pub use tools::{demo_toolkit, CalculatorTool, CityActivitiesTool, MiniWikiTool, WeatherConfig, WeatherTool};
