// Published-page URL discovery.
// Derives the GitHub Pages base URL from the repository's git remote,
// falling back to a fixed default when the remote is missing or foreign.

use std::process::Command;
use std::sync::LazyLock;

use chrono::{DateTime, FixedOffset};
use regex::Regex;
use tracing::debug;

use crate::report;

const DEFAULT_PAGES_URL: &str = "https://sixs.github.io/github_trending/";

static HTTPS_REMOTE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^https://github\.com/([^/]+)/([^/]+?)(?:\.git)?$").expect("invalid regex")
});
static SSH_REMOTE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^git@github\.com:([^/]+)/([^/]+?)(?:\.git)?$").expect("invalid regex")
});

/// Base URL the reports are published under.
///
/// An explicit override wins; otherwise the `origin` remote is inspected.
pub fn pages_base_url(override_url: Option<&str>) -> String {
    if let Some(url) = override_url {
        return url.to_string();
    }
    match url_from_git_remote() {
        Some(url) => url,
        None => {
            debug!("could not derive pages URL from git remote, using default");
            DEFAULT_PAGES_URL.to_string()
        }
    }
}

/// Full URL of the report page for a run date.
pub fn report_page_url(base_url: &str, date: DateTime<FixedOffset>) -> String {
    format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        report::page_filename(date)
    )
}

fn url_from_git_remote() -> Option<String> {
    let output = Command::new("git")
        .args(["remote", "get-url", "origin"])
        .output()
        .ok()?;
    if !output.status.success() {
        return None;
    }
    let remote = String::from_utf8(output.stdout).ok()?;
    pages_url_from_remote(remote.trim())
}

/// Map an HTTPS or SSH GitHub remote URL to its Pages URL.
fn pages_url_from_remote(remote: &str) -> Option<String> {
    let caps = HTTPS_REMOTE
        .captures(remote)
        .or_else(|| SSH_REMOTE.captures(remote))?;
    Some(format!("https://{}.github.io/{}/", &caps[1], &caps[2]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_https_remote() {
        assert_eq!(
            pages_url_from_remote("https://github.com/alice/trending.git"),
            Some("https://alice.github.io/trending/".to_string())
        );
        assert_eq!(
            pages_url_from_remote("https://github.com/alice/trending"),
            Some("https://alice.github.io/trending/".to_string())
        );
    }

    #[test]
    fn test_ssh_remote() {
        assert_eq!(
            pages_url_from_remote("git@github.com:alice/trending.git"),
            Some("https://alice.github.io/trending/".to_string())
        );
    }

    #[test]
    fn test_foreign_remote_rejected() {
        assert_eq!(pages_url_from_remote("https://gitlab.com/alice/trending"), None);
        assert_eq!(pages_url_from_remote("not a url"), None);
    }

    #[test]
    fn test_report_page_url_handles_trailing_slash() {
        let date = FixedOffset::east_opt(8 * 3600)
            .unwrap()
            .with_ymd_and_hms(2026, 8, 25, 9, 0, 0)
            .unwrap();
        assert_eq!(
            report_page_url("https://alice.github.io/trending/", date),
            "https://alice.github.io/trending/trending-2026-08-25.html"
        );
        assert_eq!(
            report_page_url("https://alice.github.io/trending", date),
            "https://alice.github.io/trending/trending-2026-08-25.html"
        );
    }

    #[test]
    fn test_override_wins() {
        assert_eq!(
            pages_base_url(Some("https://example.com/reports/")),
            "https://example.com/reports/"
        );
    }
}
