use serde::Serialize;
use std::time::Duration;

use super::{ItineraryResponse, TripRequest};
use crate::core::aggregate::ItinerarySummary;

/// Severity of a message shown alongside the itinerary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Info,
    Success,
    Warning,
    Error,
}

/// A user-facing message produced while running the pipeline
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            message: message.into(),
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            message: message.into(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Warning,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }

    pub fn describe(&self) -> String {
        let label = match self.level {
            NoticeLevel::Info => "Info",
            NoticeLevel::Success => "Success",
            NoticeLevel::Warning => "Warning",
            NoticeLevel::Error => "Error",
        };
        format!("[{}] {}", label, self.message)
    }
}

/// Outcome of one itinerary submission
#[derive(Debug, Clone, Serialize)]
pub struct PlanResult {
    pub request: TripRequest,
    /// Prompt sent to the model
    pub prompt: String,
    /// Raw model text, absent when the model call failed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw_response: Option<String>,
    /// Decoded JSON mapping; empty when the response could not be used
    pub itinerary: ItineraryResponse,
    pub summary: ItinerarySummary,
    /// Serialized iCalendar document, present only after a successful export
    #[serde(skip_serializing_if = "Option::is_none")]
    pub calendar: Option<String>,
    pub notices: Vec<Notice>,
    pub currency: String,
    pub duration: Duration,
}

impl PlanResult {
    /// True when the model produced a decodable itinerary mapping
    pub fn is_success(&self) -> bool {
        !self.itinerary.is_empty()
    }

    pub fn errors(&self) -> impl Iterator<Item = &Notice> {
        self.notices
            .iter()
            .filter(|notice| notice.level == NoticeLevel::Error)
    }

    /// Text page: notices first, then the itinerary when one was produced
    pub fn render(&self) -> String {
        let mut lines: Vec<String> = self.notices.iter().map(Notice::describe).collect();

        if self.is_success() {
            if !lines.is_empty() {
                lines.push(String::new());
            }
            lines.push(self.summary.render(&self.currency));
        }

        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::aggregate::aggregate_itinerary;
    use chrono::NaiveDate;
    use serde_json::json;

    fn result_with(itinerary: ItineraryResponse, notices: Vec<Notice>) -> PlanResult {
        let start = NaiveDate::from_ymd_opt(2025, 1, 10).unwrap();
        PlanResult {
            request: TripRequest::new("Rome", start, start),
            prompt: "prompt".to_string(),
            raw_response: None,
            summary: aggregate_itinerary(&itinerary),
            itinerary,
            calendar: None,
            notices,
            currency: "USD".to_string(),
            duration: Duration::from_millis(5),
        }
    }

    #[test]
    fn test_failed_result_renders_only_notices() {
        let result = result_with(
            ItineraryResponse::new(),
            vec![Notice::error("Could not find JSON in the response.")],
        );
        assert!(!result.is_success());
        assert_eq!(result.errors().count(), 1);
        assert_eq!(
            result.render(),
            "[Error] Could not find JSON in the response."
        );
    }

    #[test]
    fn test_successful_result_renders_itinerary() {
        let itinerary = json!({
            "itinerary": [ { "day": "Day 1", "activities": [ { "title": "Colosseum", "cost": "$25" } ] } ]
        })
        .as_object()
        .cloned()
        .unwrap();
        let result = result_with(itinerary, vec![Notice::success("saved")]);
        let rendered = result.render();
        assert!(result.is_success());
        assert!(rendered.starts_with("[Success] saved\n\nYour Personalized Itinerary"));
        assert!(rendered.contains("Estimated Total Cost: 25.00 USD"));
    }

    #[test]
    fn test_serializes_notice_levels() {
        let value = serde_json::to_value(Notice::warning("careful")).unwrap();
        assert_eq!(value, json!({ "level": "warning", "message": "careful" }));
    }
}
