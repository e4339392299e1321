// History index page generation.
// Scans the output directory for report pages and renders a year/month
// grouped navigation index for GitHub Pages.

use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::fs;
use std::path::Path;
use std::sync::LazyLock;

use chrono::{Datelike, NaiveDate};
use regex::Regex;
use tracing::info;

use crate::error::Result;

static PAGE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^trending-(\d{4})-(\d{2})-(\d{2})\.html$").expect("invalid regex"));

const WEEKDAYS: [&str; 7] = [
    "星期一", "星期二", "星期三", "星期四", "星期五", "星期六", "星期日",
];

const INDEX_STYLE: &str = r#"
        :root {
            --primary-color: #0366d6;
            --background-color: #f6f8fa;
            --card-background: #ffffff;
            --text-color: #333333;
            --border-color: #e1e4e8;
            --header-height: 60px;
        }
        * {
            box-sizing: border-box;
            margin: 0;
            padding: 0;
        }
        html, body {
            height: 100%;
        }
        body {
            font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Helvetica, Arial, sans-serif;
            line-height: 1.6;
            color: var(--text-color);
            background-color: var(--background-color);
        }
        .header {
            display: flex;
            justify-content: space-between;
            align-items: center;
            padding: 0 20px;
            background: var(--card-background);
            border-bottom: 1px solid var(--border-color);
            height: var(--header-height);
            min-height: var(--header-height);
            position: sticky;
            top: 0;
            z-index: 10;
        }
        .header h1 {
            font-size: 28px;
            color: var(--text-color);
        }
        .year-month-nav {
            display: flex;
            gap: 15px;
            margin: 20px 0;
            flex-wrap: wrap;
        }
        .year-month-item {
            background: var(--card-background);
            border: 1px solid var(--border-color);
            border-radius: 4px;
            padding: 8px 15px;
            text-decoration: none;
            color: var(--text-color);
            transition: all 0.2s ease;
        }
        .year-month-item:hover {
            background: var(--primary-color);
            color: white;
            border-color: var(--primary-color);
        }
        .content {
            max-width: 1200px;
            margin: 0 auto;
            padding: 20px;
        }
        .year-group {
            margin-bottom: 40px;
        }
        .year-header {
            font-size: 24px;
            font-weight: 600;
            margin-bottom: 20px;
            padding-bottom: 10px;
            border-bottom: 2px solid var(--border-color);
            color: #24292e;
        }
        .month-group {
            margin-bottom: 30px;
        }
        .month-header {
            font-size: 20px;
            font-weight: 500;
            margin-bottom: 15px;
            color: #24292e;
        }
        .date-list {
            display: grid;
            grid-template-columns: repeat(auto-fill, minmax(200px, 1fr));
            gap: 15px;
        }
        .date-item {
            background: var(--card-background);
            border: 1px solid var(--border-color);
            border-radius: 6px;
            padding: 15px;
            text-align: center;
            text-decoration: none;
            color: var(--text-color);
            transition: all 0.2s ease;
            box-shadow: 0 1px 3px rgba(0,0,0,0.1);
        }
        .date-item:hover {
            transform: translateY(-2px);
            box-shadow: 0 4px 8px rgba(0,0,0,0.15);
            border-color: var(--primary-color);
        }
        .date-item .date {
            font-size: 18px;
            font-weight: 600;
            margin-bottom: 5px;
        }
        .date-item .weekday {
            font-size: 14px;
            color: #666;
        }
        .footer {
            text-align: center;
            padding: 20px;
            color: #666;
            font-size: 14px;
            border-top: 1px solid var(--border-color);
            margin-top: 30px;
        }
        @media (max-width: 768px) {
            :root {
                --header-height: 80px;
            }
            .header {
                flex-direction: column;
                height: auto;
                padding: 10px;
            }
            .header h1 {
                font-size: 24px;
            }
            .year-month-nav {
                margin: 10px 0;
            }
            .date-list {
                grid-template-columns: repeat(auto-fill, minmax(150px, 1fr));
            }
        }
"#;

struct PageInfo {
    filename: String,
    display_date: String,
    weekday: String,
}

/// Report pages in the output directory, newest first.
pub fn list_report_pages(out_dir: &Path) -> Vec<String> {
    let Ok(entries) = fs::read_dir(out_dir) else {
        return Vec::new();
    };

    let mut files: Vec<String> = entries
        .filter_map(|entry| entry.ok())
        .filter_map(|entry| entry.file_name().into_string().ok())
        .filter(|name| PAGE_RE.is_match(name))
        .collect();
    files.sort_by(|a, b| b.cmp(a));
    files
}

/// Regenerate `index.html` from the report pages present in the output
/// directory. A directory with no pages is left without an index.
pub fn generate_index(out_dir: &Path) -> Result<()> {
    let pages = list_report_pages(out_dir);
    if pages.is_empty() {
        info!(dir = %out_dir.display(), "no report pages found, skipping index");
        return Ok(());
    }

    // grouped[year][month], each month keeping the newest-first page order.
    let mut grouped: BTreeMap<String, BTreeMap<String, Vec<PageInfo>>> = BTreeMap::new();
    for page in &pages {
        let Some(caps) = PAGE_RE.captures(page) else {
            continue;
        };
        let (year, month, day) = (&caps[1], &caps[2], &caps[3]);

        grouped
            .entry(year.to_string())
            .or_default()
            .entry(month.to_string())
            .or_default()
            .push(PageInfo {
                filename: page.clone(),
                display_date: format!("{}月{}日", month, day),
                weekday: weekday_label(year, month, day),
            });
    }

    let mut nav = String::new();
    let mut content = String::new();

    for (year, months) in grouped.iter().rev() {
        let _ = write!(
            content,
            r#"        <div class="year-group">
            <div class="year-header" id="{year}">{year}年</div>
"#
        );

        for (month, month_pages) in months.iter().rev() {
            let _ = write!(
                nav,
                r##"            <a href="#{year}-{month}" class="year-month-item">{year}年{month}月</a>
"##
            );

            let _ = write!(
                content,
                r#"            <div class="month-group">
                <div class="month-header" id="{year}-{month}">{month}月</div>
                <div class="date-list">
"#
            );

            for page in month_pages {
                let _ = write!(
                    content,
                    r#"                    <a href="{}" class="date-item">
                        <div class="date">{}</div>
                        <div class="weekday">{}</div>
                    </a>
"#,
                    page.filename, page.display_date, page.weekday
                );
            }

            content.push_str(
                r#"                </div>
            </div>
"#,
            );
        }

        content.push_str(
            r#"        </div>
"#,
        );
    }

    let html = format!(
        r#"<!DOCTYPE html>
<html lang="zh-CN">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>GitHub Trending - 历史日报</title>
    <style>{INDEX_STYLE}    </style>
</head>
<body>
    <div class="header">
        <h1>GitHub Trending 历史日报</h1>
    </div>
    <div class="content">
        <div class="year-month-nav">
{nav}        </div>
{content}    </div>
    <div class="footer">
        <p>© 2026 GitHub Trending 日报 | 数据来源于 GitHub Trending</p>
    </div>
</body>
</html>
"#
    );

    fs::write(out_dir.join("index.html"), html)?;
    Ok(())
}

fn weekday_label(year: &str, month: &str, day: &str) -> String {
    let date = match (year.parse(), month.parse(), day.parse()) {
        (Ok(y), Ok(m), Ok(d)) => NaiveDate::from_ymd_opt(y, m, d),
        _ => None,
    };
    match date {
        Some(date) => WEEKDAYS[date.weekday().num_days_from_monday() as usize].to_string(),
        None => "未知".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn touch(dir: &Path, name: &str) {
        fs::write(dir.join(name), "<html></html>").unwrap();
    }

    #[test]
    fn test_list_pages_filters_and_sorts_newest_first() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "trending-2026-07-01.html");
        touch(dir.path(), "trending-2026-08-25.html");
        touch(dir.path(), "index.html");
        touch(dir.path(), "trending-notadate.html");

        let pages = list_report_pages(dir.path());
        assert_eq!(
            pages,
            vec!["trending-2026-08-25.html", "trending-2026-07-01.html"]
        );
    }

    #[test]
    fn test_list_pages_missing_dir() {
        let dir = TempDir::new().unwrap();
        assert!(list_report_pages(&dir.path().join("nope")).is_empty());
    }

    #[test]
    fn test_generate_index_groups_by_year_and_month() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "trending-2026-08-25.html");
        touch(dir.path(), "trending-2026-07-01.html");
        touch(dir.path(), "trending-2025-12-31.html");

        generate_index(dir.path()).unwrap();

        let index = fs::read_to_string(dir.path().join("index.html")).unwrap();
        assert!(index.contains(r##"<a href="#2026-08" class="year-month-item">2026年08月</a>"##));
        assert!(index.contains(r#"<div class="year-header" id="2026">2026年</div>"#));
        assert!(index.contains(r#"<div class="year-header" id="2025">2025年</div>"#));
        assert!(index.contains(r#"<a href="trending-2026-08-25.html" class="date-item">"#));
        assert!(index.contains("08月25日"));
        // 2026-08-25 is a Tuesday.
        assert!(index.contains("星期二"));
    }

    #[test]
    fn test_generate_index_skips_empty_dir() {
        let dir = TempDir::new().unwrap();
        generate_index(dir.path()).unwrap();
        assert!(!dir.path().join("index.html").exists());
    }
}
