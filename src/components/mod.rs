use crate::error::BotResult;
use async_trait::async_trait;

pub mod google_calendar;
pub mod google_sheets;
pub mod sync;

pub use google_calendar::{CalendarEvent, GoogleCalendarClient, NewCalendarEvent, TimeWindow};
pub use google_sheets::{CellValue, GoogleSheetsClient, Grid};
pub use sync::{EventRecord, SyncReport, SyncSettings, Synchronizer};

/// Read access to the spreadsheet that describes the events
#[async_trait]
pub trait SheetSource: Send + Sync {
    /// Value of the first cell of a named range
    async fn resolve_named_range(&self, name: &str) -> BotResult<CellValue>;

    /// All rows of a sheet, including its header row
    async fn read_sheet(&self, name: &str) -> BotResult<Grid>;
}

/// Write access to the target calendar
#[async_trait]
pub trait CalendarService: Send + Sync {
    /// Create an event and return it as stored by the calendar
    async fn create_event(
        &self,
        calendar_id: &str,
        event: &NewCalendarEvent,
    ) -> BotResult<CalendarEvent>;

    /// Events that fall inside `window`
    async fn list_events(&self, calendar_id: &str, window: &TimeWindow)
        -> BotResult<Vec<CalendarEvent>>;

    /// Delete one event by id
    async fn delete_event(&self, calendar_id: &str, event_id: &str) -> BotResult<()>;
}
