use crate::error::{config_error, env_error, BotResult};
use chrono_tz::Tz;
use dotenvy::dotenv;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Default location of the OAuth token store
pub const DEFAULT_TOKEN_PATH: &str = "config/google_token.json";
/// Default location of the settings file
pub const DEFAULT_SETTINGS_PATH: &str = "config/sync.toml";

/// Fixed pause inserted after every batch of calendar writes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RateLimitPolicy {
    /// Number of operations between pauses, 0 disables pausing
    pub batch_size: usize,
    /// Pause length in milliseconds
    pub pause_ms: u64,
}

impl Default for RateLimitPolicy {
    fn default() -> Self {
        Self {
            batch_size: 10,
            pause_ms: 3000,
        }
    }
}

impl RateLimitPolicy {
    pub fn pause_duration(&self) -> Duration {
        Duration::from_millis(self.pause_ms)
    }
}

/// Years bounding the window that "clear" deletes from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClearWindow {
    pub start_year: i32,
    pub end_year: i32,
}

impl Default for ClearWindow {
    fn default() -> Self {
        Self {
            start_year: 1999,
            end_year: 2099,
        }
    }
}

/// Contents of the optional settings file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncFileSettings {
    /// Sheet holding one event per row
    pub events_sheet: String,
    /// Named range whose first cell holds the calendar id
    pub calendar_id_range: String,
    pub rate_limit: RateLimitPolicy,
    pub clear_window: ClearWindow,
}

impl Default for SyncFileSettings {
    fn default() -> Self {
        Self {
            events_sheet: "events".to_string(),
            calendar_id_range: "calendarID".to_string(),
            rate_limit: RateLimitPolicy::default(),
            clear_window: ClearWindow::default(),
        }
    }
}

impl SyncFileSettings {
    /// Read settings from a TOML file, falling back to defaults if it does not exist
    pub fn load_from(path: &Path) -> BotResult<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }
}

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Google API client ID
    pub google_client_id: String,
    /// Google API client secret
    pub google_client_secret: String,
    /// Spreadsheet holding the events sheet and the calendar id range
    pub spreadsheet_id: String,
    /// Calendar ID, overrides the named range lookup when set
    pub calendar_id: Option<String>,
    /// Timezone event times are interpreted in
    pub timezone: String,
    /// Where the OAuth token is stored
    pub token_path: String,
    /// Settings from the settings file
    pub sync: SyncFileSettings,
}

impl Config {
    /// Load configuration from environment and settings file
    pub fn load() -> BotResult<Self> {
        // Load .env file if it exists
        dotenv().ok();

        let google_client_id =
            env::var("GOOGLE_CLIENT_ID").map_err(|_| env_error("GOOGLE_CLIENT_ID"))?;
        let google_client_secret =
            env::var("GOOGLE_CLIENT_SECRET").map_err(|_| env_error("GOOGLE_CLIENT_SECRET"))?;
        let spreadsheet_id =
            env::var("SPREADSHEET_ID").map_err(|_| env_error("SPREADSHEET_ID"))?;

        let calendar_id = env::var("GOOGLE_CALENDAR_ID")
            .ok()
            .filter(|id| !id.trim().is_empty());

        let timezone = env::var("TIMEZONE").unwrap_or_else(|_| String::from("UTC"));
        let token_path =
            env::var("TOKEN_PATH").unwrap_or_else(|_| String::from(DEFAULT_TOKEN_PATH));
        let settings_path =
            env::var("SYNC_CONFIG").unwrap_or_else(|_| String::from(DEFAULT_SETTINGS_PATH));

        let sync = SyncFileSettings::load_from(Path::new(&settings_path))?;

        let config = Config {
            google_client_id,
            google_client_secret,
            spreadsheet_id,
            calendar_id,
            timezone,
            token_path,
            sync,
        };

        // Fail early on a bad timezone rather than on the first API call
        config.tz()?;

        Ok(config)
    }

    /// Parse the configured timezone
    pub fn tz(&self) -> BotResult<Tz> {
        self.timezone
            .parse::<Tz>()
            .map_err(|_| config_error(&format!("Invalid timezone: {}", self.timezone)))
    }
}
