mod client;
pub mod models;

pub use client::GoogleSheetsClient;
pub use models::{CellValue, Grid};
