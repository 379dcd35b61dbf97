use crate::components::google_sheets::{CellValue, Grid};
use crate::error::{extraction_error, BotResult};
use crate::utils::time::{date_only, hours_and_minutes, hours_minutes_duration, minutes_duration, parse_time};
use chrono::{Duration, NaiveDateTime};
use tracing::debug;

const TITLE: usize = 0;
const DESCRIPTION: usize = 1;
const DATE: usize = 2;
const START_TIME: usize = 3;
const DURATION: usize = 4;
const CATEGORY: usize = 5;
const LOCATION: usize = 6;

/// One event described by a row of the events sheet
#[derive(Debug, Clone, PartialEq)]
pub struct EventRecord {
    pub title: String,
    pub description: String,
    pub start_time: NaiveDateTime,
    pub end_time: NaiveDateTime,
    /// Free-form tag, not sent to the calendar
    pub category: String,
    pub location: String,
}

/// Turn the rows of the events sheet into event records.
///
/// Row 0 is the header. Reading stops at the first row whose title cell is
/// blank, even if rows below it are filled in.
pub fn extract_records(grid: &Grid) -> BotResult<Vec<EventRecord>> {
    let mut records = Vec::new();

    for (index, row) in grid.iter().enumerate().skip(1) {
        if cell(row, TITLE).is_blank() {
            break;
        }
        let record = parse_row(index + 1, row)?;
        debug!("Parsed event record: {:?}", record);
        records.push(record);
    }

    Ok(records)
}

fn cell(row: &[CellValue], column: usize) -> &CellValue {
    const EMPTY: &CellValue = &CellValue::Empty;
    row.get(column).unwrap_or(EMPTY)
}

/// `row_number` is the 1-based row number shown by the spreadsheet
fn parse_row(row_number: usize, row: &[CellValue]) -> BotResult<EventRecord> {
    let date = datetime_cell(row_number, row, DATE, "event date")?;
    let time = datetime_cell(row_number, row, START_TIME, "start time")?;

    // The date cell carries a zero time and the time cell an epoch date, keep the right half of each
    let start_time = date_only(date)
        .checked_add_signed(hours_and_minutes(time))
        .ok_or_else(|| extraction_error(row_number, START_TIME + 1, "start time out of range"))?;

    let duration = resolve_duration(row_number, cell(row, DURATION))?;
    let end_time = start_time
        .checked_add_signed(duration)
        .ok_or_else(|| extraction_error(row_number, DURATION + 1, "end time out of range"))?;

    Ok(EventRecord {
        title: cell(row, TITLE).display(),
        description: cell(row, DESCRIPTION).display(),
        start_time,
        end_time,
        category: cell(row, CATEGORY).display(),
        location: cell(row, LOCATION).display(),
    })
}

fn datetime_cell<'a>(
    row_number: usize,
    row: &'a [CellValue],
    column: usize,
    what: &str,
) -> BotResult<&'a NaiveDateTime> {
    let value = cell(row, column);
    value.as_datetime().ok_or_else(|| {
        extraction_error(
            row_number,
            column + 1,
            &format!("expected {} but found {}", what, value.describe()),
        )
    })
}

/// A time-formatted cell gives hours and minutes, anything else is a number of minutes
fn resolve_duration(row_number: usize, value: &CellValue) -> BotResult<Duration> {
    let invalid = || {
        extraction_error(
            row_number,
            DURATION + 1,
            &format!("expected a duration but found {}", value.describe()),
        )
    };

    match value {
        CellValue::DateTime(dt) => Ok(hours_and_minutes(dt)),
        CellValue::Number(minutes) => minutes_duration(*minutes).ok_or_else(invalid),
        CellValue::Empty => Ok(Duration::zero()),
        CellValue::Text(text) if text.trim().is_empty() => Ok(Duration::zero()),
        CellValue::Text(text) => {
            if let Ok(minutes) = text.trim().parse::<f64>() {
                return minutes_duration(minutes).ok_or_else(invalid);
            }
            parse_time(text.trim())
                .map(|(hours, minutes)| hours_minutes_duration(hours, minutes))
                .ok_or_else(invalid)
        }
        CellValue::Bool(_) => Err(invalid()),
    }
}
