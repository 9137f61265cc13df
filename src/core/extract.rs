//! Locate and decode the JSON object embedded in a model response.
//!
//! Models tend to wrap the requested JSON in commentary or code fences, so the
//! extractor takes the span from the first `{` to the last `}` and decodes
//! that. The span is greedy across the whole text. A response carrying two
//! separate JSON blocks, or prose with stray braces after the object, yields
//! a span that is not valid JSON and is reported as a decode error; no
//! attempt is made to pick one block out.

use regex::Regex;
use std::sync::OnceLock;
use tracing::debug;

use crate::{
    error::{PlannerError, Result},
    types::ItineraryResponse,
};

/// Extract the itinerary mapping from raw model output.
///
/// Errors are `PlannerError::NoJsonFound` (with the trimmed response) or
/// `PlannerError::JsonDecode` (with the offending substring). The decoded
/// mapping is returned as-is, without any schema checks.
pub fn extract_itinerary(raw: &str) -> Result<ItineraryResponse> {
    let trimmed = raw.trim();

    let Some(found) = json_span().find(trimmed) else {
        return Err(PlannerError::NoJsonFound {
            raw_response: trimmed.to_string(),
        });
    };

    let snippet = found.as_str();
    debug!(
        target: "trip_planner::extract",
        start = found.start(),
        end = found.end(),
        "found JSON span in model response"
    );

    serde_json::from_str::<ItineraryResponse>(snippet).map_err(|err| PlannerError::JsonDecode {
        message: err.to_string(),
        snippet: snippet.to_string(),
    })
}

fn json_span() -> &'static Regex {
    static JSON_SPAN: OnceLock<Regex> = OnceLock::new();
    JSON_SPAN.get_or_init(|| Regex::new(r"(?s)\{.*\}").expect("JSON span pattern compiles"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_object_between_narrative() {
        let raw = r#"
            Sure! Here is your itinerary:
            ```json
            {"itinerary": [{"day": "Day 1", "activities": [{"title": "Museum", "cost": "$12"}]}]}
            ```
            Enjoy your trip!
        "#;

        let decoded = extract_itinerary(raw).unwrap();
        assert_eq!(
            serde_json::Value::Object(decoded),
            json!({"itinerary": [{"day": "Day 1", "activities": [{"title": "Museum", "cost": "$12"}]}]})
        );
    }

    #[test]
    fn test_multiline_object() {
        let raw = "{\n  \"itinerary\": [],\n  \"notes\": \"pack light\"\n}";
        let decoded = extract_itinerary(raw).unwrap();
        assert_eq!(decoded["notes"], "pack light");
        assert_eq!(decoded["itinerary"], json!([]));
    }

    #[test]
    fn test_no_braces() {
        let err = extract_itinerary("  I could not plan this trip.  ").unwrap_err();
        match err {
            PlannerError::NoJsonFound { raw_response } => {
                assert_eq!(raw_response, "I could not plan this trip.");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_closing_brace_before_opening() {
        assert!(matches!(
            extract_itinerary("} nothing here {"),
            Err(PlannerError::NoJsonFound { .. })
        ));
    }

    #[test]
    fn test_trailing_comma_reports_snippet() {
        let raw = r#"Here you go: {"itinerary": [],} Thanks"#;
        let err = extract_itinerary(raw).unwrap_err();
        match &err {
            PlannerError::JsonDecode { snippet, .. } => {
                assert_eq!(snippet, r#"{"itinerary": [],}"#);
            }
            other => panic!("unexpected error: {:?}", other),
        }
        assert!(err.to_string().contains(r#"{"itinerary": [],}"#));
        assert_eq!(err.error_code(), "JSON_DECODE_ERROR");
    }

    #[test]
    fn test_two_blocks_are_a_decode_error() {
        let raw = r#"{"a": 1} and also {"b": 2}"#;
        match extract_itinerary(raw) {
            Err(PlannerError::JsonDecode { snippet, .. }) => assert_eq!(snippet, raw),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_idempotent() {
        let raw = r#"Plan: {"itinerary": [{"day": "Day 1", "activities": []}]} done"#;
        let first = extract_itinerary(raw).unwrap();
        let second = extract_itinerary(raw).unwrap();
        assert_eq!(first, second);
    }
}
