// Markdown cleanup for model output.
// The WeChat renderer only understands inline HTML, so `**bold**` spans and
// the fixed section headers are rewritten to styled <strong> tags.

use std::sync::LazyLock;

use regex::Regex;

static BOLD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\*\*(.*?)\*\*").expect("invalid regex"));

const SECTION_HEADERS: [&str; 3] = ["【项目背景】", "【核心介绍】", "【关键特性】"];

pub fn clean_md_to_html(text: &str) -> String {
    let mut text = BOLD
        .replace_all(text, r#"<strong style="color:#000;">$1</strong>"#)
        .into_owned();

    for header in SECTION_HEADERS {
        text = text.replace(
            header,
            &format!(r#"<strong style="color:#1a1a1a;">{}</strong>"#, header),
        );
    }
    text
}
