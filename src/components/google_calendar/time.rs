use crate::error::{google_calendar_error, BotResult};
use chrono::{NaiveDateTime, TimeZone};
use chrono_tz::Tz;

/// Wall-clock format sent together with an explicit `timeZone`
const LOCAL_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Format a wall-clock time for the `dateTime` field of an event
pub fn format_local(value: &NaiveDateTime) -> String {
    value.format(LOCAL_FORMAT).to_string()
}

/// RFC 3339 timestamp of a wall-clock time in `tz`, as required by `timeMin`/`timeMax`
pub fn to_rfc3339_in(tz: &Tz, value: &NaiveDateTime) -> BotResult<String> {
    tz.from_local_datetime(value)
        .earliest()
        .map(|dt| dt.to_rfc3339())
        .ok_or_else(|| {
            google_calendar_error(&format!("{} does not exist in timezone {}", value, tz))
        })
}
