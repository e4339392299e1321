// Trending page HTML parsing.
// Extracts project rows from the github.com/trending markup.

use scraper::{ElementRef, Html, Selector};

use super::types::Project;

/// One parsed trending page.
#[derive(Debug)]
pub struct TrendingPage {
    pub projects: Vec<Project>,
    pub has_next_page: bool,
}

/// Parse a trending listing page. Rows missing the title anchor are skipped.
pub fn parse_page(html: &str) -> TrendingPage {
    let document = Html::parse_document(html);
    let row = Selector::parse("article.Box-row").expect("invalid selector");
    let next = Selector::parse("a.next_page").expect("invalid selector");

    let projects = document
        .select(&row)
        .filter_map(parse_row)
        .collect();

    TrendingPage {
        projects,
        has_next_page: document.select(&next).next().is_some(),
    }
}

fn parse_row(row: ElementRef<'_>) -> Option<Project> {
    let title = Selector::parse("h2 a").expect("invalid selector");
    let desc = Selector::parse("p").expect("invalid selector");
    let language = Selector::parse(r#"span[itemprop="programmingLanguage"]"#).expect("invalid selector");
    let stars = Selector::parse("a.Link--muted").expect("invalid selector");
    let added = Selector::parse("span.d-inline-block.float-sm-right").expect("invalid selector");

    let anchor = row.select(&title).next()?;
    let href = anchor.value().attr("href")?;

    // GitHub renders the title as "owner /\n  repo"; collapse all whitespace.
    let name: String = anchor
        .text()
        .collect::<String>()
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();

    let user_name = match name.split_once('/') {
        Some((owner, _)) => owner.to_string(),
        None => String::new(),
    };

    Some(Project {
        link: format!("https://github.com{}", href),
        desc: text_of(row, &desc).unwrap_or_default(),
        user_name,
        language: text_of(row, &language).unwrap_or_default(),
        total_stars: text_of(row, &stars).unwrap_or_else(|| "0".to_string()),
        added_stars: text_of(row, &added).unwrap_or_else(|| "0 stars".to_string()),
        name,
    })
}

/// Trimmed text content of the first element matching the selector.
fn text_of(scope: ElementRef<'_>, selector: &Selector) -> Option<String> {
    scope
        .select(selector)
        .next()
        .map(|el| el.text().collect::<String>().trim().to_string())
}
