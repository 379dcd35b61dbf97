mod client;
pub mod models;
pub mod time;
pub mod token;

pub use client::GoogleCalendarClient;
pub use models::{CalendarEvent, NewCalendarEvent, TimeWindow};
pub use token::TokenManager;
