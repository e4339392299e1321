// Daily report page rendering.
// Produces one self-contained HTML page with daily/weekly/monthly sections,
// memoizing each project's generated summary through the cache.

use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, FixedOffset};
use tracing::debug;

use crate::cache::SummaryCache;
use crate::error::Result;
use crate::summary::{Summarize, markdown};
use crate::trending::{Project, Since};

const REPORT_STYLE: &str = r#"
        :root {
            --primary-color: #0366d6;
            --background-color: #f6f8fa;
            --card-background: #ffffff;
            --text-color: #333333;
            --border-color: #e1e4e8;
        }
        * {
            box-sizing: border-box;
            margin: 0;
            padding: 0;
        }
        body {
            font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Helvetica, Arial, sans-serif;
            line-height: 1.6;
            color: var(--text-color);
            background-color: var(--background-color);
        }
        .content {
            max-width: 1200px;
            margin: 0 auto;
            padding: 20px;
        }
        .project {
            background: var(--card-background);
            margin-bottom: 20px;
            padding: 20px;
            border-radius: 6px;
            box-shadow: 0 1px 3px rgba(0,0,0,0.1);
        }
        .project-title {
            font-size: 24px;
            font-weight: 600;
            margin-bottom: 10px;
            color: #24292e;
        }
        .project-stats {
            font-size: 14px;
            color: #586069;
            margin-bottom: 15px;
        }
        .project-content {
            margin-bottom: 15px;
        }
        .project-link {
            display: inline-block;
            color: var(--primary-color);
            text-decoration: none;
            font-size: 14px;
        }
        .project-link:hover {
            text-decoration: underline;
        }
        .section-title {
            font-size: 28px;
            font-weight: 600;
            margin: 30px 0 20px 0;
            padding-bottom: 10px;
            border-bottom: 2px solid var(--border-color);
            color: #24292e;
        }
        .rank-number {
            font-size: 20px;
            font-weight: bold;
            color: #666;
            margin-right: 10px;
        }
        .footer {
            text-align: center;
            padding: 20px;
            color: #666;
            font-size: 14px;
            border-top: 1px solid var(--border-color);
            margin-top: 30px;
        }
"#;

/// Report page filename for a run date, e.g. `trending-2026-08-25.html`.
pub fn page_filename(date: DateTime<FixedOffset>) -> String {
    format!("trending-{}.html", date.format("%Y-%m-%d"))
}

/// Build the full report page for the three trending windows.
///
/// Empty sections are skipped. Summaries are served from the cache when a
/// valid entry exists; misses invoke the summarizer and the result is stored
/// immediately.
pub async fn build_report<S: Summarize>(
    daily: &[Project],
    weekly: &[Project],
    monthly: &[Project],
    date: DateTime<FixedOffset>,
    cache: &SummaryCache,
    summarizer: &S,
) -> String {
    let date_str = date.format("%Y / %m / %d").to_string();

    let mut html = format!(
        r#"<!DOCTYPE html>
<html lang="zh-CN">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>GitHub Trending - {date_str}</title>
    <style>{REPORT_STYLE}    </style>
</head>
<body>
    <div class="content">
        <div style="text-align: center; margin-bottom: 20px; color: #666;">
            <p>{date_str}</p>
        </div>
"#
    );

    let sections = [
        (Since::Daily, daily),
        (Since::Weekly, weekly),
        (Since::Monthly, monthly),
    ];

    for (since, projects) in sections {
        if projects.is_empty() {
            continue;
        }

        let _ = write!(
            html,
            r#"        <div class="section-title">{}</div>
"#,
            since.section_title()
        );

        for (rank, project) in projects.iter().enumerate() {
            let summary = rich_summary(cache, summarizer, project).await;
            let summary = markdown::clean_md_to_html(&summary);
            html.push_str(&project_card(rank + 1, project, &summary));
        }
    }

    html.push_str(
        r#"        <div style="text-align: center; margin: 30px 0;">
            <a href="index.html" style="display: inline-block; padding: 10px 20px; background-color: var(--primary-color); color: white; text-decoration: none; border-radius: 4px; font-size: 16px;">← 返回历史日报首页</a>
        </div>
        <div class="footer">
            <p>© 2026 GitHub Trending 日报 | 数据来源于 GitHub Trending</p>
        </div>
    </div>
</body>
</html>
"#,
    );

    html
}

/// Cache-aware summary lookup: cache hit wins, miss calls the summarizer and
/// stores the result right away.
async fn rich_summary<S: Summarize>(
    cache: &SummaryCache,
    summarizer: &S,
    project: &Project,
) -> String {
    if let Some(cached) = cache.get(&project.name) {
        debug!(project = %project.name, "summary served from cache");
        return cached;
    }

    let summary = summarizer.summarize(project).await;
    cache.put(&project.name, &summary);
    summary
}

fn project_card(rank: usize, project: &Project, summary: &str) -> String {
    let paragraphs: String = summary
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| {
            format!(
                r#"<p class="project-content">&nbsp;&nbsp;&nbsp;&nbsp;{}</p>"#,
                line.trim()
            )
        })
        .collect();

    let user_link = if project.user_name.is_empty() {
        String::new()
    } else {
        format!(
            r#" | <a href="https://github.com/{}" class="project-link" target="_blank">用户主页</a>"#,
            project.user_name
        )
    };

    format!(
        r#"        <div class="project">
            <div>
                <span class="rank-number">#{rank}</span>
                <span class="project-title">{name}</span>
            </div>
            <div class="project-stats">
                <span>总星标: {total_stars}</span> |
                <span>新增星标: {added_stars}</span>
            </div>
            <div>
                {paragraphs}
            </div>
            <div>
                <a href="{link}" class="project-link" target="_blank">查看项目详情 →</a>{user_link}
            </div>
        </div>
"#,
        name = project.name,
        total_stars = project.total_stars,
        added_stars = project.added_stars,
        link = project.link,
    )
}

/// Write the report page under the output directory, creating it if needed.
pub fn save_report(
    output_dir: &Path,
    html: &str,
    date: DateTime<FixedOffset>,
) -> Result<PathBuf> {
    fs::create_dir_all(output_dir)?;
    let path = output_dir.join(page_filename(date));
    fs::write(&path, html)?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use tempfile::TempDir;

    struct CannedSummarizer(&'static str);

    impl Summarize for CannedSummarizer {
        async fn summarize(&self, _project: &Project) -> String {
            self.0.to_string()
        }
    }

    fn project(name: &str) -> Project {
        Project {
            name: name.to_string(),
            link: format!("https://github.com/{}", name),
            desc: "a test project".to_string(),
            user_name: name.split('/').next().unwrap_or_default().to_string(),
            language: "Rust".to_string(),
            total_stars: "1,000".to_string(),
            added_stars: "50 stars today".to_string(),
        }
    }

    fn run_date() -> DateTime<FixedOffset> {
        FixedOffset::east_opt(8 * 3600)
            .unwrap()
            .with_ymd_and_hms(2026, 8, 25, 9, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_page_filename() {
        assert_eq!(page_filename(run_date()), "trending-2026-08-25.html");
    }

    #[tokio::test]
    async fn test_report_contains_sections_and_cards() {
        let dir = TempDir::new().unwrap();
        let cache = SummaryCache::new(dir.path().join("cache.json"), chrono::Duration::days(7));
        let summarizer = CannedSummarizer("【项目背景】解决测试问题");

        let daily = vec![project("rust-lang/rust")];
        let weekly = vec![project("tokio-rs/tokio")];

        let html = build_report(&daily, &weekly, &[], run_date(), &cache, &summarizer).await;

        assert!(html.contains("今日趋势"));
        assert!(html.contains("本周热门"));
        // Empty monthly section is skipped entirely.
        assert!(!html.contains("月度榜单"));
        assert!(html.contains("rust-lang/rust"));
        assert!(html.contains(r#"<span class="rank-number">#1</span>"#));
        assert!(html.contains("2026 / 08 / 25"));
    }

    #[tokio::test]
    async fn test_summary_cached_after_first_build() {
        let dir = TempDir::new().unwrap();
        let cache = SummaryCache::new(dir.path().join("cache.json"), chrono::Duration::days(7));
        let summarizer = CannedSummarizer("generated once");

        let daily = vec![project("rust-lang/rust")];
        build_report(&daily, &[], &[], run_date(), &cache, &summarizer).await;

        assert_eq!(cache.get("rust-lang/rust"), Some("generated once".to_string()));

        // A second build is served from the cache even with a different backend.
        let other = CannedSummarizer("should not appear");
        let html = build_report(&daily, &[], &[], run_date(), &cache, &other).await;
        assert!(html.contains("generated once"));
        assert!(!html.contains("should not appear"));
    }

    #[tokio::test]
    async fn test_save_report_writes_file() {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("public");

        let path = save_report(&out, "<html></html>", run_date()).unwrap();
        assert!(path.ends_with("trending-2026-08-25.html"));
        assert_eq!(fs::read_to_string(&path).unwrap(), "<html></html>");
    }
}
