// GitHub Trending scraping module.
// Provides the HTTP client, HTML parsing, and project record types.

pub mod client;
pub mod parse;
pub mod types;

pub use client::TrendingClient;
pub use types::{Project, Since};
