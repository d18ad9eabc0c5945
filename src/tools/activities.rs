//! City-activity recommender.
//!
//! Parses a single free-text query into a city and an optional weather
//! descriptor, looks the city up in a static indoor/outdoor catalog, and
//! orders the recommendation with simple weather-keyword tiers.

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::tool::{Tool, ToolId};

const CITY_PROMPT: &str =
    "Please provide a city name (e.g., 'city=Paris; weather=sunny, 24°C').";

const GENERIC_SUGGESTION: &str = "General suggestions (city not in catalog): Indoor - visit a \
     local museum or aquarium. Outdoor - take a riverfront/park walk if conditions allow.";

struct CityGuide {
    indoor: &'static [&'static str],
    outdoor: &'static [&'static str],
}

fn catalog(city: &str) -> Option<CityGuide> {
    match city {
        "chicago" => Some(CityGuide {
            indoor: &[
                "Art Institute of Chicago",
                "Museum of Science and Industry",
                "Field Museum",
            ],
            outdoor: &["Chicago Riverwalk", "Millennium Park", "Navy Pier"],
        }),
        "paris" => Some(CityGuide {
            indoor: &["Louvre Museum", "Musée d'Orsay"],
            outdoor: &["Seine River Walk", "Jardin du Luxembourg"],
        }),
        "london" => Some(CityGuide {
            indoor: &["British Museum", "Tate Modern"],
            outdoor: &["Hyde Park", "South Bank Walk"],
        }),
        "tokyo" => Some(CityGuide {
            indoor: &["teamLab Planets", "Tokyo National Museum"],
            outdoor: &["Ueno Park", "Shibuya Crossing Walk"],
        }),
        "mumbai" => Some(CityGuide {
            indoor: &[
                "Chhatrapati Shivaji Maharaj Vastu Sangrahalaya",
                "Phoenix Mall",
            ],
            outdoor: &["Marine Drive", "Sanjay Gandhi National Park"],
        }),
        _ => None,
    }
}

/// Extract `(city, weather)` from a single query string.
///
/// Accepts `Paris`, `city=Paris`, or `city=Paris; weather=sunny, 24°C`.
/// When a separator is present but no `city=` key parses, the first
/// `;`/`,` segment stripped of the literal `city` and `=` tokens is used.
fn parse_city_weather(query: &str) -> (String, String) {
    let q = query.trim();
    if !q.contains(';') && !q.to_lowercase().contains("city=") {
        return (q.to_string(), String::new());
    }

    let mut city = String::new();
    let mut weather = String::new();
    for part in q.split(';') {
        if let Some((key, value)) = part.trim().split_once('=') {
            match key.trim().to_lowercase().as_str() {
                "city" => city = value.trim().to_string(),
                "weather" => weather = value.trim().to_string(),
                _ => {}
            }
        }
    }

    if city.is_empty() {
        city = q
            .split([';', ','])
            .next()
            .unwrap_or_default()
            .replace("city", "")
            .replace('=', "")
            .trim()
            .to_string();
    }
    (city, weather)
}

pub struct CityActivitiesTool;

#[async_trait]
impl Tool for CityActivitiesTool {
    fn id(&self) -> ToolId {
        ToolId::SuggestCityActivities
    }

    fn description(&self) -> &str {
        "Recommend ONE indoor and ONE outdoor activity. Input: SINGLE string, e.g. 'Paris', 'city=Paris', or 'city=Paris; weather=sunny, 24°C'."
    }

    fn parameters(&self) -> Option<Value> {
        Some(json!({
            "type": "object",
            "properties": {
                "input": {"type": "string", "description": "City, optionally with a weather descriptor: city=<name>; weather=<desc>"}
            },
            "required": ["input"]
        }))
    }

    async fn call(&self, input: &str) -> String {
        let (city, weather) = parse_city_weather(input);
        let key = city
            .trim()
            .trim_matches(|c| matches!(c, '\'' | '"' | '`'))
            .to_lowercase();
        if key.is_empty() {
            return CITY_PROMPT.to_string();
        }

        let Some(guide) = catalog(&key) else {
            return GENERIC_SUGGESTION.to_string();
        };
        let indoor = guide.indoor[0];
        let outdoor = guide.outdoor[0];

        let hint = weather.to_lowercase();
        let indoor_first = ["rain", "storm"].iter().any(|k| hint.contains(k))
            || (hint.contains("overcast") && hint.contains("cold"));
        let outdoor_first =
            !indoor_first && ["sunny", "clear"].iter().any(|k| hint.contains(k));

        if outdoor_first {
            format!("City: {city}. Outdoor: {outdoor}. Indoor: {indoor}. (Weather-aware heuristics.)")
        } else {
            format!("City: {city}. Indoor: {indoor}. Outdoor: {outdoor}. (Weather-aware heuristics.)")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_all_three_query_shapes() {
        assert_eq!(parse_city_weather("Paris"), ("Paris".into(), String::new()));
        assert_eq!(
            parse_city_weather("city=Paris"),
            ("Paris".into(), String::new())
        );
        assert_eq!(
            parse_city_weather("city=Paris; weather=sunny, 24°C"),
            ("Paris".into(), "sunny, 24°C".into())
        );
    }

    #[test]
    fn falls_back_to_the_first_segment_without_a_city_key() {
        let (city, weather) = parse_city_weather("London; weather=rain");
        assert_eq!(city, "London");
        assert_eq!(weather, "rain");
    }

    #[tokio::test]
    async fn sunny_weather_emphasizes_outdoor() {
        let tool = CityActivitiesTool;
        let out = tool.call("city=Paris; weather=sunny, 24°C").await;
        let outdoor_at = out.find("Seine River Walk").expect("outdoor venue named");
        let indoor_at = out.find("Louvre Museum").expect("indoor venue named");
        assert!(outdoor_at < indoor_at, "outdoor should lead: {out}");
    }

    #[tokio::test]
    async fn rain_emphasizes_indoor() {
        let tool = CityActivitiesTool;
        let out = tool.call("city=Paris; weather=rain").await;
        let indoor_at = out.find("Louvre Museum").expect("indoor venue named");
        let outdoor_at = out.find("Seine River Walk").expect("outdoor venue named");
        assert!(indoor_at < outdoor_at, "indoor should lead: {out}");
    }

    #[tokio::test]
    async fn overcast_and_cold_together_mean_indoor() {
        let tool = CityActivitiesTool;
        let out = tool.call("city=London; weather=overcast and cold").await;
        assert!(out.find("British Museum").unwrap() < out.find("Hyde Park").unwrap());
        // Overcast alone does not trip the indoor tier, the default does.
        let out = tool.call("city=London; weather=overcast").await;
        assert!(out.find("British Museum").unwrap() < out.find("Hyde Park").unwrap());
    }

    #[tokio::test]
    async fn no_hint_defaults_to_indoor_first() {
        let tool = CityActivitiesTool;
        let out = tool.call("Tokyo").await;
        assert!(out.find("teamLab Planets").unwrap() < out.find("Ueno Park").unwrap());
        assert!(out.contains("City: Tokyo."));
    }

    #[tokio::test]
    async fn empty_city_asks_for_one() {
        let tool = CityActivitiesTool;
        assert_eq!(tool.call("").await, CITY_PROMPT);
        assert_eq!(tool.call("city=; weather=sunny").await, CITY_PROMPT);
    }

    #[tokio::test]
    async fn unknown_city_gets_the_generic_suggestion() {
        let tool = CityActivitiesTool;
        assert_eq!(tool.call("Atlantis").await, GENERIC_SUGGESTION);
    }
}
