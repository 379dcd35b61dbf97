mod extractor;
mod rate_limit;
mod synchronizer;

pub use extractor::{extract_records, EventRecord};
pub use rate_limit::RateLimiter;
pub use synchronizer::{SyncReport, SyncSettings, Synchronizer};
