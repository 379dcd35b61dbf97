#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use sheet_calendar_sync::components::{
    CalendarEvent, CalendarService, CellValue, Grid, NewCalendarEvent, SheetSource, TimeWindow,
};
use sheet_calendar_sync::error::{google_calendar_error, google_sheets_error, BotResult, Error};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;

/// In-memory spreadsheet with named ranges and sheets
#[derive(Debug, Clone, Default)]
pub struct MockSheet {
    named_ranges: HashMap<String, CellValue>,
    sheets: HashMap<String, Grid>,
}

impl MockSheet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_named_range(mut self, name: &str, value: CellValue) -> Self {
        self.named_ranges.insert(name.to_string(), value);
        self
    }

    pub fn with_sheet(mut self, name: &str, grid: Grid) -> Self {
        self.sheets.insert(name.to_string(), grid);
        self
    }
}

#[async_trait]
impl SheetSource for MockSheet {
    async fn resolve_named_range(&self, name: &str) -> BotResult<CellValue> {
        self.named_ranges
            .get(name)
            .cloned()
            .ok_or_else(|| Error::NamedRangeNotFound(name.to_string()))
    }

    async fn read_sheet(&self, name: &str) -> BotResult<Grid> {
        self.sheets
            .get(name)
            .cloned()
            .ok_or_else(|| google_sheets_error(&format!("No sheet named {}", name)))
    }
}

#[derive(Debug, Default)]
struct MockCalendarState {
    events: Vec<(String, CalendarEvent)>,
    created: Vec<(String, NewCalendarEvent)>,
    deleted: Vec<String>,
    next_id: usize,
    fail_on_create: Option<usize>,
}

/// In-memory calendar, event times are stored as UTC
#[derive(Debug, Clone, Default)]
pub struct MockCalendar {
    state: Arc<Mutex<MockCalendarState>>,
}

impl MockCalendar {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the n-th (0-based) create call fail
    pub async fn fail_on_create(&self, n: usize) {
        self.state.lock().await.fail_on_create = Some(n);
    }

    /// Put an existing zero-length event into a calendar
    pub async fn seed(&self, calendar_id: &str, summary: &str, start: NaiveDateTime) {
        self.seed_spanning(calendar_id, summary, start, start).await;
    }

    /// Put an existing event running from `start` to `end` into a calendar
    pub async fn seed_spanning(
        &self,
        calendar_id: &str,
        summary: &str,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) {
        let mut state = self.state.lock().await;
        state.next_id += 1;
        let event = CalendarEvent {
            id: format!("seed{}", state.next_id),
            summary: Some(summary.to_string()),
            start_date_time: Some(utc_timestamp(&start)),
            end_date_time: Some(utc_timestamp(&end)),
            ..Default::default()
        };
        state.events.push((calendar_id.to_string(), event));
    }

    /// Events currently stored in a calendar
    pub async fn events(&self, calendar_id: &str) -> Vec<CalendarEvent> {
        let state = self.state.lock().await;
        state
            .events
            .iter()
            .filter(|(cal, _)| cal == calendar_id)
            .map(|(_, event)| event.clone())
            .collect()
    }

    /// Every successful create call, in order
    pub async fn created(&self) -> Vec<(String, NewCalendarEvent)> {
        self.state.lock().await.created.clone()
    }

    /// Ids of deleted events, in order
    pub async fn deleted(&self) -> Vec<String> {
        self.state.lock().await.deleted.clone()
    }
}

#[async_trait]
impl CalendarService for MockCalendar {
    async fn create_event(
        &self,
        calendar_id: &str,
        event: &NewCalendarEvent,
    ) -> BotResult<CalendarEvent> {
        let mut state = self.state.lock().await;
        if state.fail_on_create == Some(state.created.len()) {
            return Err(google_calendar_error("Rate limit exceeded"));
        }

        state.next_id += 1;
        let stored = CalendarEvent {
            id: format!("event{}", state.next_id),
            summary: Some(event.summary.clone()),
            description: Some(event.description.clone()),
            location: Some(event.location.clone()),
            start_date_time: Some(utc_timestamp(&event.start)),
            end_date_time: Some(utc_timestamp(&event.end)),
            ..Default::default()
        };

        state.created.push((calendar_id.to_string(), event.clone()));
        state.events.push((calendar_id.to_string(), stored.clone()));
        Ok(stored)
    }

    async fn list_events(
        &self,
        calendar_id: &str,
        window: &TimeWindow,
    ) -> BotResult<Vec<CalendarEvent>> {
        let state = self.state.lock().await;
        let mut events = Vec::new();
        for (cal, event) in &state.events {
            if cal != calendar_id {
                continue;
            }
            // Like timeMin/timeMax, select events that overlap the window
            let (Some(start), Some(end)) = (
                parse_time(&event.start_date_time, &event.start_date)?,
                parse_time(&event.end_date_time, &event.end_date)?,
            ) else {
                continue;
            };
            if start < window.end && (end > window.start || start >= window.start) {
                events.push(event.clone());
            }
        }
        Ok(events)
    }

    async fn delete_event(&self, calendar_id: &str, event_id: &str) -> BotResult<()> {
        let mut state = self.state.lock().await;
        let position = state
            .events
            .iter()
            .position(|(cal, event)| cal == calendar_id && event.id == event_id)
            .ok_or_else(|| google_calendar_error(&format!("HTTP 404 - {} not found", event_id)))?;
        state.events.remove(position);
        state.deleted.push(event_id.to_string());
        Ok(())
    }
}

fn utc_timestamp(value: &NaiveDateTime) -> String {
    format!("{}Z", value.format("%Y-%m-%dT%H:%M:%S"))
}

/// Parse the `dateTime` (RFC 3339) or `date` field of an event boundary as UTC
fn parse_time(
    date_time: &Option<String>,
    date: &Option<String>,
) -> BotResult<Option<NaiveDateTime>> {
    if let Some(date_time) = date_time {
        let parsed = DateTime::parse_from_rfc3339(date_time)
            .map_err(|e| google_calendar_error(&format!("Failed to parse datetime: {}", e)))?;
        return Ok(Some(parsed.naive_utc()));
    }
    if let Some(date) = date {
        let parsed = NaiveDate::parse_from_str(date, "%Y-%m-%d")
            .map_err(|e| google_calendar_error(&format!("Failed to parse date: {}", e)))?;
        return Ok(parsed.and_hms_opt(0, 0, 0));
    }
    Ok(None)
}
