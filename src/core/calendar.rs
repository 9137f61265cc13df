//! iCalendar (RFC 5545) export of itinerary activities.

use chrono::{NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info};

use crate::{
    error::{PlannerError, Result},
    types::{
        itinerary::{DEFAULT_DESCRIPTION, DEFAULT_LOCATION, DEFAULT_TITLE},
        Itinerary,
    },
};

pub const CALENDAR_FILE_NAME: &str = "itinerary.ics";
pub const CALENDAR_MIME_TYPE: &str = "text/calendar";

pub const DEFAULT_START_TIME: &str = "2024-01-01T00:00:00";
pub const DEFAULT_END_TIME: &str = "2024-01-01T01:00:00";

/// Start and end of the placeholder window used for every activity
const PLACEHOLDER_START: &str = "10:00:00";
const PLACEHOLDER_END: &str = "12:00:00";

const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";
const PRODID: &str = "-//trip-planner//Itinerary//EN";
const MAX_LINE_OCTETS: usize = 75;

/// Loosely-typed event input. Any missing field takes its default on export.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EventRecord {
    pub title: Option<String>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
}

impl EventRecord {
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Self::default()
        }
    }
}

/// A fully resolved calendar event.
#[derive(Debug, Clone, PartialEq)]
pub struct CalendarEvent {
    pub title: String,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub description: String,
    pub location: String,
}

impl CalendarEvent {
    pub fn from_record(record: &EventRecord) -> Result<Self> {
        let start = parse_timestamp(record.start_time.as_deref().unwrap_or(DEFAULT_START_TIME))?;
        let end = parse_timestamp(record.end_time.as_deref().unwrap_or(DEFAULT_END_TIME))?;
        if end < start {
            return Err(PlannerError::Calendar(format!(
                "event ends ({}) before it begins ({})",
                end, start
            )));
        }

        Ok(Self {
            title: record.title.clone().unwrap_or_else(|| DEFAULT_TITLE.to_string()),
            start,
            end,
            description: record
                .description
                .clone()
                .unwrap_or_else(|| DEFAULT_DESCRIPTION.to_string()),
            location: record
                .location
                .clone()
                .unwrap_or_else(|| DEFAULT_LOCATION.to_string()),
        })
    }
}

/// One record per activity, in itinerary order, all placed on `start_date` 10:00-12:00.
pub fn events_from_itinerary(itinerary: &Itinerary, start_date: NaiveDate) -> Vec<EventRecord> {
    itinerary
        .activities()
        .map(|activity| EventRecord {
            title: Some(activity.title.clone()),
            start_time: Some(format!("{}T{}", start_date, PLACEHOLDER_START)),
            end_time: Some(format!("{}T{}", start_date, PLACEHOLDER_END)),
            description: Some(activity.description.clone()),
            location: Some(activity.location.clone()),
        })
        .collect()
}

/// Serialize records into an iCalendar document, one VEVENT per record.
pub fn export_calendar(records: &[EventRecord]) -> Result<String> {
    let events = records
        .iter()
        .map(CalendarEvent::from_record)
        .collect::<Result<Vec<_>>>()?;

    let stamp = Utc::now().format("%Y%m%dT%H%M%SZ").to_string();
    let mut lines = vec![
        "BEGIN:VCALENDAR".to_string(),
        "VERSION:2.0".to_string(),
        format!("PRODID:{}", PRODID),
        "CALSCALE:GREGORIAN".to_string(),
    ];

    for event in &events {
        lines.push("BEGIN:VEVENT".to_string());
        lines.push(format!("UID:{}@trip-planner", uuid::Uuid::new_v4()));
        lines.push(format!("DTSTAMP:{}", stamp));
        lines.push(format!("DTSTART:{}", event.start.format("%Y%m%dT%H%M%S")));
        lines.push(format!("DTEND:{}", event.end.format("%Y%m%dT%H%M%S")));
        lines.push(format!("SUMMARY:{}", escape_text(&event.title)));
        lines.push(format!("DESCRIPTION:{}", escape_text(&event.description)));
        lines.push(format!("LOCATION:{}", escape_text(&event.location)));
        lines.push("END:VEVENT".to_string());
    }
    lines.push("END:VCALENDAR".to_string());

    debug!(target: "trip_planner::calendar", events = events.len(), "serialized calendar");

    let mut document = String::new();
    for line in &lines {
        document.push_str(&fold_line(line));
        document.push_str("\r\n");
    }
    Ok(document)
}

/// Write a serialized calendar to disk.
pub fn save_calendar(path: &Path, document: &str) -> Result<()> {
    std::fs::write(path, document)
        .map_err(|err| PlannerError::Calendar(format!("{}: {}", path.display(), err)))?;
    info!(target: "trip_planner::calendar", path = %path.display(), "calendar saved");
    Ok(())
}

fn parse_timestamp(value: &str) -> Result<NaiveDateTime> {
    NaiveDateTime::parse_from_str(value, TIMESTAMP_FORMAT).map_err(|err| {
        PlannerError::Calendar(format!("invalid timestamp {:?}: {}", value, err))
    })
}

fn escape_text(input: &str) -> String {
    input
        .replace('\\', "\\\\")
        .replace(';', "\\;")
        .replace(',', "\\,")
        .replace("\r\n", "\\n")
        .replace('\n', "\\n")
}

/// Fold a content line at 75 octets without splitting a UTF-8 character.
fn fold_line(line: &str) -> String {
    if line.len() <= MAX_LINE_OCTETS {
        return line.to_string();
    }

    let mut folded = String::with_capacity(line.len() + line.len() / MAX_LINE_OCTETS * 3);
    let mut width = 0;
    for ch in line.chars() {
        let len = ch.len_utf8();
        if width + len > MAX_LINE_OCTETS {
            folded.push_str("\r\n ");
            // the leading space counts toward the continuation line
            width = 1;
        }
        folded.push(ch);
        width += len;
    }
    folded
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Activity, CostField, DayPlan};

    fn unfold(document: &str) -> String {
        document.replace("\r\n ", "")
    }

    #[test]
    fn test_title_only_record_uses_defaults() {
        let document = export_calendar(&[EventRecord::titled("Museum")]).unwrap();
        assert_eq!(document.matches("BEGIN:VEVENT").count(), 1);
        assert!(document.contains("SUMMARY:Museum\r\n"));
        assert!(document.contains("DTSTART:20240101T000000\r\n"));
        assert!(document.contains("DTEND:20240101T010000\r\n"));
        assert!(document.contains("DESCRIPTION:No Description\r\n"));
        assert!(document.contains("LOCATION:No Location\r\n"));
        assert!(document.starts_with("BEGIN:VCALENDAR\r\n"));
        assert!(document.ends_with("END:VCALENDAR\r\n"));
    }

    #[test]
    fn test_empty_record_gets_default_title() {
        let event = CalendarEvent::from_record(&EventRecord::default()).unwrap();
        assert_eq!(event.title, "No Title");
    }

    #[test]
    fn test_duplicates_are_kept_in_order() {
        let records = vec![
            EventRecord::titled("Second"),
            EventRecord::titled("First"),
            EventRecord::titled("Second"),
        ];
        let document = export_calendar(&records).unwrap();
        assert_eq!(document.matches("BEGIN:VEVENT").count(), 3);
        let second = document.find("SUMMARY:Second").unwrap();
        let first = document.find("SUMMARY:First").unwrap();
        assert!(second < first);
    }

    #[test]
    fn test_empty_input_is_an_empty_calendar() {
        let document = export_calendar(&[]).unwrap();
        assert!(!document.contains("BEGIN:VEVENT"));
        assert!(document.contains("VERSION:2.0"));
    }

    #[test]
    fn test_bad_timestamp_fails() {
        let record = EventRecord {
            start_time: Some("tomorrow morning".to_string()),
            ..EventRecord::titled("Brunch")
        };
        let err = export_calendar(&[record]).unwrap_err();
        assert_eq!(err.error_code(), "CALENDAR_ERROR");
        assert!(err.to_string().contains("tomorrow morning"));
    }

    #[test]
    fn test_end_before_start_fails() {
        let record = EventRecord {
            start_time: Some("2025-05-01T12:00:00".to_string()),
            end_time: Some("2025-05-01T10:00:00".to_string()),
            ..EventRecord::default()
        };
        assert!(export_calendar(&[record]).is_err());
    }

    #[test]
    fn test_placeholder_window_on_start_date() {
        let itinerary = Itinerary {
            days: vec![
                DayPlan {
                    label: "Day 1".to_string(),
                    activities: vec![Activity {
                        title: "Cathedral".to_string(),
                        timing: "Morning".to_string(),
                        location: "Old Town".to_string(),
                        description: "Guided visit".to_string(),
                        cost: CostField::text("$15"),
                    }],
                },
                DayPlan {
                    label: "Day 2".to_string(),
                    activities: vec![],
                },
            ],
            skipped: vec![],
        };
        let start = NaiveDate::from_ymd_opt(2025, 9, 14).unwrap();
        let records = events_from_itinerary(&itinerary, start);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].start_time.as_deref(), Some("2025-09-14T10:00:00"));
        assert_eq!(records[0].end_time.as_deref(), Some("2025-09-14T12:00:00"));
        assert_eq!(records[0].location.as_deref(), Some("Old Town"));

        let document = export_calendar(&records).unwrap();
        assert!(document.contains("DTSTART:20250914T100000\r\n"));
        assert!(document.contains("DTEND:20250914T120000\r\n"));
    }

    #[test]
    fn test_text_is_escaped() {
        let record = EventRecord {
            description: Some("Tapas, wine; then\nflamenco".to_string()),
            ..EventRecord::titled("Night out")
        };
        let document = export_calendar(&[record]).unwrap();
        assert!(document.contains("DESCRIPTION:Tapas\\, wine\\; then\\nflamenco\r\n"));
    }

    #[test]
    fn test_long_lines_are_folded() {
        let long = "é".repeat(80);
        let record = EventRecord {
            description: Some(long.clone()),
            ..EventRecord::titled("Long")
        };
        let document = export_calendar(&[record]).unwrap();
        for line in document.split("\r\n") {
            assert!(line.len() <= 75, "line too long: {} octets", line.len());
        }
        assert!(unfold(&document).contains(&format!("DESCRIPTION:{}", long)));
    }
}
