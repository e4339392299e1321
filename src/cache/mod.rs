// Summary cache module.
// Memoizes AI-generated project summaries in a single JSON file with expiry.

#![allow(dead_code)]

pub mod store;

pub use store::{CACHE_FILE, CACHE_TTL_DAYS, CacheEntry, SummaryCache};
