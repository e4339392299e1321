// Trending listing types.

use serde::{Deserialize, Serialize};

/// Time window of a trending listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Since {
    Daily,
    Weekly,
    Monthly,
}

impl Since {
    /// Query-parameter value used by github.com/trending.
    pub fn as_str(&self) -> &'static str {
        match self {
            Since::Daily => "daily",
            Since::Weekly => "weekly",
            Since::Monthly => "monthly",
        }
    }

    /// Section heading used in the rendered report.
    pub fn section_title(&self) -> &'static str {
        match self {
            Since::Daily => "今日趋势",
            Since::Weekly => "本周热门",
            Since::Monthly => "月度榜单",
        }
    }
}

/// A project scraped from a trending page.
///
/// Star counts are kept as the display strings GitHub renders ("12,345",
/// "1,234 stars today") since the report reproduces them verbatim.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    pub name: String,
    pub link: String,
    pub desc: String,
    pub user_name: String,
    pub language: String,
    pub total_stars: String,
    pub added_stars: String,
}
