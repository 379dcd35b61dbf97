use chrono::{Duration, NaiveDate, NaiveDateTime};
use std::fmt;

const MILLISECONDS_PER_DAY: f64 = 86_400_000.0;

/// A single spreadsheet cell as read from the sheet
#[derive(Debug, Clone, PartialEq, Default)]
pub enum CellValue {
    #[default]
    Empty,
    Text(String),
    Number(f64),
    Bool(bool),
    /// A number formatted as a date, time or date-time
    DateTime(NaiveDateTime),
}

/// Rows of cells, row 0 is the header
pub type Grid = Vec<Vec<CellValue>>;

impl CellValue {
    /// True for an empty cell or an empty string. Unlike a loose `== ""`
    /// comparison, a numeric 0 or `false` is not blank.
    pub fn is_blank(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Text(text) => text.is_empty(),
            _ => false,
        }
    }

    /// The timestamp, if this is a well-formed date/time cell
    pub fn as_datetime(&self) -> Option<&NaiveDateTime> {
        match self {
            CellValue::DateTime(value) => Some(value),
            _ => None,
        }
    }

    /// Render the cell the way it is used in event text fields
    pub fn display(&self) -> String {
        self.to_string()
    }

    fn kind(&self) -> &'static str {
        match self {
            CellValue::Empty => "empty",
            CellValue::Text(_) => "text",
            CellValue::Number(_) => "number",
            CellValue::Bool(_) => "boolean",
            CellValue::DateTime(_) => "date",
        }
    }

    /// Short description used in error messages
    pub fn describe(&self) -> String {
        match self {
            CellValue::Empty => "an empty cell".to_string(),
            other => format!("{} value '{}'", other.kind(), other),
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Empty => Ok(()),
            CellValue::Text(text) => f.write_str(text),
            CellValue::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => {
                write!(f, "{}", *n as i64)
            }
            CellValue::Number(n) => write!(f, "{}", n),
            CellValue::Bool(b) => write!(f, "{}", b),
            CellValue::DateTime(dt) => write!(f, "{}", dt.format("%Y-%m-%d %H:%M:%S")),
        }
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::Text(value.to_string())
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        CellValue::Number(value)
    }
}

impl From<NaiveDateTime> for CellValue {
    fn from(value: NaiveDateTime) -> Self {
        CellValue::DateTime(value)
    }
}

/// Day zero of spreadsheet serial numbers
pub fn serial_epoch() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(1899, 12, 30)
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .unwrap_or_default()
}

/// Decode a spreadsheet serial number (days since 1899-12-30, fraction = time of day)
pub fn serial_to_datetime(serial: f64) -> Option<NaiveDateTime> {
    let millis = (serial * MILLISECONDS_PER_DAY).round();
    if !millis.is_finite() || millis.abs() >= i64::MAX as f64 {
        return None;
    }
    serial_epoch().checked_add_signed(Duration::try_milliseconds(millis as i64)?)
}
