use super::extractor::{extract_records, EventRecord};
use super::rate_limit::RateLimiter;
use crate::components::google_calendar::{NewCalendarEvent, TimeWindow};
use crate::components::{CalendarService, SheetSource};
use crate::config::{ClearWindow, Config, RateLimitPolicy, SyncFileSettings};
use crate::error::{config_error, BotResult};
use crate::utils::time::start_of_year;
use tracing::{debug, info, warn};

/// What the synchronizer needs to know besides its services
#[derive(Debug, Clone, PartialEq)]
pub struct SyncSettings {
    /// Sheet holding one event per row
    pub events_sheet: String,
    /// Named range whose first cell holds the calendar id
    pub calendar_id_range: String,
    /// Calendar id that bypasses the named range
    pub calendar_id: Option<String>,
    pub rate_limit: RateLimitPolicy,
    pub clear_window: ClearWindow,
}

impl Default for SyncSettings {
    fn default() -> Self {
        Self::from_file_settings(&SyncFileSettings::default(), None)
    }
}

impl SyncSettings {
    pub fn from_config(config: &Config) -> Self {
        Self::from_file_settings(&config.sync, config.calendar_id.clone())
    }

    fn from_file_settings(file: &SyncFileSettings, calendar_id: Option<String>) -> Self {
        Self {
            events_sheet: file.events_sheet.clone(),
            calendar_id_range: file.calendar_id_range.clone(),
            calendar_id,
            rate_limit: file.rate_limit,
            clear_window: file.clear_window,
        }
    }
}

/// Outcome of a create or clear run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SyncReport {
    /// Events created or deleted
    pub processed: usize,
    /// Rate limit pauses taken
    pub pauses: usize,
}

impl EventRecord {
    /// The calendar event for this record, the category stays in the sheet
    pub fn to_calendar_event(&self) -> NewCalendarEvent {
        NewCalendarEvent {
            summary: self.title.clone(),
            start: self.start_time,
            end: self.end_time,
            location: self.location.clone(),
            description: self.description.clone(),
        }
    }
}

/// Copies the rows of the events sheet into a calendar, or empties the calendar
pub struct Synchronizer<S, C> {
    sheets: S,
    calendar: C,
    settings: SyncSettings,
}

impl<S: SheetSource, C: CalendarService> Synchronizer<S, C> {
    pub fn new(sheets: S, calendar: C, settings: SyncSettings) -> Self {
        Self {
            sheets,
            calendar,
            settings,
        }
    }

    pub fn calendar(&self) -> &C {
        &self.calendar
    }

    /// Calendar to write to, from the settings or the spreadsheet's named range
    pub async fn calendar_id(&self) -> BotResult<String> {
        if let Some(id) = &self.settings.calendar_id {
            return Ok(id.clone());
        }

        let value = self
            .sheets
            .resolve_named_range(&self.settings.calendar_id_range)
            .await?;
        debug!("{} = {:?}", self.settings.calendar_id_range, value);

        let id = value.display().trim().to_string();
        if id.is_empty() {
            return Err(config_error(&format!(
                "Named range {} does not contain a calendar id",
                self.settings.calendar_id_range
            )));
        }
        Ok(id)
    }

    /// Event records read from the events sheet
    pub async fn event_records(&self) -> BotResult<Vec<EventRecord>> {
        let grid = self.sheets.read_sheet(&self.settings.events_sheet).await?;
        extract_records(&grid)
    }

    /// Create one calendar event per record. Stops at the first failure, events
    /// created before it stay in the calendar.
    pub async fn create_events(&self) -> BotResult<SyncReport> {
        let calendar_id = self.calendar_id().await?;
        let records = self.event_records().await?;
        info!("Creating {} events in calendar {}", records.len(), calendar_id);

        let mut limiter = RateLimiter::new(self.settings.rate_limit);
        for (index, record) in records.iter().enumerate() {
            self.calendar
                .create_event(&calendar_id, &record.to_calendar_event())
                .await?;
            limiter.after_operation(index).await;
        }

        let report = SyncReport {
            processed: records.len(),
            pauses: limiter.pauses(),
        };
        info!("Created {} events", report.processed);
        Ok(report)
    }

    /// Delete every event in the clear window, whoever created it
    pub async fn clear_calendar(&self) -> BotResult<SyncReport> {
        let calendar_id = self.calendar_id().await?;
        let window = self.clear_window()?;

        let events = self.calendar.list_events(&calendar_id, &window).await?;
        warn!(
            "Deleting all {} events between {} and {} from calendar {}",
            events.len(),
            window.start,
            window.end,
            calendar_id
        );

        let mut limiter = RateLimiter::new(self.settings.rate_limit);
        for (index, event) in events.iter().enumerate() {
            self.calendar.delete_event(&calendar_id, &event.id).await?;
            limiter.after_operation(index).await;
        }

        let report = SyncReport {
            processed: events.len(),
            pauses: limiter.pauses(),
        };
        info!("Deleted {} events", report.processed);
        Ok(report)
    }

    fn clear_window(&self) -> BotResult<TimeWindow> {
        let ClearWindow {
            start_year,
            end_year,
        } = self.settings.clear_window;
        if start_year >= end_year {
            return Err(config_error(&format!(
                "Clear window start year {} is not before end year {}",
                start_year, end_year
            )));
        }
        let start = start_of_year(start_year)
            .ok_or_else(|| config_error(&format!("Invalid year {}", start_year)))?;
        let end = start_of_year(end_year)
            .ok_or_else(|| config_error(&format!("Invalid year {}", end_year)))?;
        Ok(TimeWindow::new(start, end))
    }
}
