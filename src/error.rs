use miette::Diagnostic;
use thiserror::Error;

/// Main error type for the application
#[derive(Debug, Error, Diagnostic)]
pub enum Error {
    #[error("Environment error: {0}")]
    #[diagnostic(code(sheet_calendar_sync::environment))]
    Environment(String),

    #[error("Configuration error: {0}")]
    #[diagnostic(code(sheet_calendar_sync::config))]
    Config(String),

    #[error("Google Sheets API error: {0}")]
    #[diagnostic(code(sheet_calendar_sync::google_sheets))]
    GoogleSheets(String),

    #[error("Google Calendar API error: {0}")]
    #[diagnostic(code(sheet_calendar_sync::google_calendar))]
    GoogleCalendar(String),

    #[error("Row {row}, column {column}: {message}")]
    #[diagnostic(
        code(sheet_calendar_sync::extraction),
        help("Fix the cell in the events sheet and run the command again")
    )]
    Extraction {
        row: usize,
        column: usize,
        message: String,
    },

    #[error("Named range not found: {0}")]
    #[diagnostic(code(sheet_calendar_sync::named_range))]
    NamedRangeNotFound(String),

    #[error(transparent)]
    #[diagnostic(code(sheet_calendar_sync::io))]
    Io(#[from] std::io::Error),

    #[error("HTTP error: {0}")]
    #[diagnostic(code(sheet_calendar_sync::http))]
    Http(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    #[diagnostic(code(sheet_calendar_sync::serialization))]
    Serialization(String),

    #[error("Other error: {0}")]
    #[diagnostic(code(sheet_calendar_sync::other))]
    Other(String),
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}

/// Type alias for Result with our Error type
pub type BotResult<T> = Result<T, Error>;

/// Helper to create environment errors
pub fn env_error(var: &str) -> Error {
    Error::Environment(format!("Missing environment variable: {}", var))
}

/// Helper to create configuration errors
pub fn config_error(message: &str) -> Error {
    Error::Config(message.to_string())
}

/// Helper to create Google Sheets errors
pub fn google_sheets_error(message: &str) -> Error {
    Error::GoogleSheets(message.to_string())
}

/// Helper to create Google Calendar errors
pub fn google_calendar_error(message: &str) -> Error {
    Error::GoogleCalendar(message.to_string())
}

/// Helper to create extraction errors for a spreadsheet cell
pub fn extraction_error(row: usize, column: usize, message: &str) -> Error {
    Error::Extraction {
        row,
        column,
        message: message.to_string(),
    }
}

/// Helper to create other errors
pub fn other_error(message: &str) -> Error {
    Error::Other(message.to_string())
}
