// WeChat relay delivery.
// Posts the rendered report HTML to a relay server that handles the actual
// official-account publishing. Failures are logged, never propagated.

use std::time::Duration;

use chrono::{DateTime, FixedOffset};
use reqwest::Client;
use serde_json::{Value, json};
use tracing::{info, warn};

use crate::config::{Config, WechatConfig};

use super::report_title;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);
const DIGEST: &str = "全方位解析今日热门 GitHub 项目：背景、架构与核心特性。";

/// Push the report to the WeChat relay, if configured.
pub async fn publish(config: &Config, html: &str, date: DateTime<FixedOffset>) {
    let Some(wechat) = &config.wechat else {
        info!("wechat relay not configured, skipping");
        return;
    };

    let client = match Client::builder().timeout(REQUEST_TIMEOUT).build() {
        Ok(client) => client,
        Err(err) => {
            warn!(error = %err, "failed to build wechat http client");
            return;
        }
    };

    let response = client
        .post(&wechat.server_url)
        .header("X-Api-Key", &wechat.api_key)
        .json(&payload(wechat, html, date))
        .send()
        .await;

    match response {
        Ok(response) => match response.json::<Value>().await {
            Ok(body) => info!(result = %body, "wechat relay responded"),
            Err(err) => warn!(error = %err, "wechat relay returned unreadable response"),
        },
        Err(err) => warn!(error = %err, "wechat relay delivery failed"),
    }
}

fn payload(wechat: &WechatConfig, html: &str, date: DateTime<FixedOffset>) -> Value {
    json!({
        "title": report_title(date),
        "content": html,
        "thumb_id": wechat.thumb_id,
        "digest": DIGEST,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_payload_shape() {
        let wechat = WechatConfig {
            server_url: "https://relay.example.com/publish".to_string(),
            api_key: "secret".to_string(),
            thumb_id: Some("thumb-1".to_string()),
        };
        let date = FixedOffset::east_opt(8 * 3600)
            .unwrap()
            .with_ymd_and_hms(2026, 8, 25, 9, 0, 0)
            .unwrap();

        let body = payload(&wechat, "<html></html>", date);
        assert_eq!(body["title"], "【0825】GitHub 热门项目日报");
        assert_eq!(body["content"], "<html></html>");
        assert_eq!(body["thumb_id"], "thumb-1");
        assert_eq!(body["digest"], DIGEST);
    }

    #[test]
    fn test_payload_without_thumb() {
        let wechat = WechatConfig {
            server_url: "https://relay.example.com/publish".to_string(),
            api_key: "secret".to_string(),
            thumb_id: None,
        };
        let date = FixedOffset::east_opt(8 * 3600)
            .unwrap()
            .with_ymd_and_hms(2026, 8, 25, 9, 0, 0)
            .unwrap();

        assert!(payload(&wechat, "", date)["thumb_id"].is_null());
    }
}
