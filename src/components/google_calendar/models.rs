use chrono::NaiveDateTime;
use serde_json::Value;

/// Simplified calendar event representation
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize, Default, PartialEq)]
pub struct CalendarEvent {
    pub id: String,
    pub summary: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
    pub start_date_time: Option<String>,
    pub start_date: Option<String>,
    pub end_date_time: Option<String>,
    pub end_date: Option<String>,
}

impl CalendarEvent {
    /// Build from an item of the Calendar API `events` resource
    pub fn from_api(event: &Value) -> Self {
        let text = |key: &str| event.get(key).and_then(|v| v.as_str()).map(|s| s.to_string());
        let nested = |outer: &str, inner: &str| {
            event
                .get(outer)
                .and_then(|o| o.as_object())
                .and_then(|o| o.get(inner))
                .and_then(|v| v.as_str())
                .map(|s| s.to_string())
        };

        CalendarEvent {
            id: text("id").unwrap_or_default(),
            summary: text("summary"),
            description: text("description"),
            location: text("location"),
            start_date_time: nested("start", "dateTime"),
            start_date: nested("start", "date"),
            end_date_time: nested("end", "dateTime"),
            end_date: nested("end", "date"),
        }
    }
}

/// Event to be created, times are wall-clock times in the calendar's timezone
#[derive(Debug, Clone, PartialEq)]
pub struct NewCalendarEvent {
    pub summary: String,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub location: String,
    pub description: String,
}

/// Half-open range `[start, end)` of wall-clock times
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl TimeWindow {
    pub fn new(start: NaiveDateTime, end: NaiveDateTime) -> Self {
        Self { start, end }
    }
}
