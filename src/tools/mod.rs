//! Tool implementations dispatched by the agent runtime.
//!
//! Each tool takes a single string and returns a single string:
//! - Weather: one-line report from a public text-weather endpoint
//! - Calculator: restricted arithmetic evaluation
//! - MiniWiki: tiny offline encyclopedia
//! - CityActivities: weather-aware indoor/outdoor recommendation

pub mod activities;
pub mod calculator;
pub mod weather;
pub mod wiki;

pub use activities::CityActivitiesTool;
pub use calculator::CalculatorTool;
pub use weather::{WeatherConfig, WeatherTool};
pub use wiki::MiniWikiTool;

use crate::tool::ToolRegistry;

/// Registry holding all four demo tools, the set the lab agents bind.
pub fn demo_toolkit(weather: WeatherConfig) -> ToolRegistry {
    let mut registry = ToolRegistry::new();
    registry.register(WeatherTool::new(weather));
    registry.register(CalculatorTool);
    registry.register(MiniWikiTool);
    registry.register(CityActivitiesTool);
    registry
}
