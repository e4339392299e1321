// Feishu notification delivery.
// Two independent paths: a webhook bot and app-credential direct messages.
// Both send an interactive card linking to the published report page.

use std::time::{Duration as StdDuration, Instant};

use chrono::{DateTime, FixedOffset};
use reqwest::Client;
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::{info, warn};

use crate::config::{Config, FeishuAppConfig};

use super::{pages, report_title};

const TOKEN_URL: &str = "https://open.feishu.cn/open-apis/auth/v3/tenant_access_token/internal/";
const MESSAGE_URL: &str = "https://open.feishu.cn/open-apis/im/v1/messages";
const REQUEST_TIMEOUT: StdDuration = StdDuration::from_secs(30);
/// Treat a cached token as expired this long before its real expiry.
const TOKEN_EXPIRY_MARGIN: StdDuration = StdDuration::from_secs(300);

/// Generic Feishu API response envelope.
#[derive(Debug, Deserialize)]
struct ApiStatus {
    #[serde(default)]
    code: i64,
    #[serde(default)]
    msg: String,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    #[serde(default)]
    code: i64,
    #[serde(default)]
    msg: String,
    tenant_access_token: Option<String>,
    expire: Option<u64>,
}

/// Push the report notification to Feishu over every configured path.
pub async fn publish(config: &Config, date: DateTime<FixedOffset>) {
    let base_url = pages::pages_base_url(config.pages_base_url.as_deref());
    let page_url = pages::report_page_url(&base_url, date);

    if let Some(webhook_url) = &config.feishu_webhook_url {
        publish_webhook(webhook_url, date, &page_url).await;
    }
    if let Some(app) = &config.feishu_app {
        publish_app(app, date, &page_url).await;
    }
    if config.feishu_webhook_url.is_none() && config.feishu_app.is_none() {
        info!("feishu not configured, skipping");
    }
}

/// Interactive card with a blue header and a button to the report page.
fn card(date: DateTime<FixedOffset>, page_url: &str) -> Value {
    json!({
        "config": { "wide_screen_mode": true },
        "header": {
            "template": "blue",
            "title": { "content": report_title(date), "tag": "plain_text" }
        },
        "elements": [
            {
                "tag": "div",
                "text": {
                    "content": "GitHub Trending 日报已生成，请点击下方按钮查看完整内容",
                    "tag": "lark_md"
                }
            },
            {
                "tag": "action",
                "actions": [
                    {
                        "tag": "button",
                        "text": { "content": "查看日报", "tag": "plain_text" },
                        "type": "primary",
                        "url": page_url
                    }
                ]
            }
        ]
    })
}

async fn publish_webhook(webhook_url: &str, date: DateTime<FixedOffset>, page_url: &str) {
    let client = match Client::builder().timeout(REQUEST_TIMEOUT).build() {
        Ok(client) => client,
        Err(err) => {
            warn!(error = %err, "failed to build feishu http client");
            return;
        }
    };

    let payload = json!({
        "msg_type": "interactive",
        "card": card(date, page_url),
    });

    let response = client.post(webhook_url).json(&payload).send().await;
    match response {
        Ok(response) if response.status().is_success() => {
            match response.json::<ApiStatus>().await {
                Ok(status) if status.code == 0 => info!("feishu webhook delivery succeeded"),
                Ok(status) => {
                    warn!(code = status.code, msg = %status.msg, "feishu webhook delivery rejected");
                }
                Err(err) => warn!(error = %err, "feishu webhook returned unreadable response"),
            }
        }
        Ok(response) => {
            warn!(status = %response.status(), "feishu webhook delivery failed");
        }
        Err(err) => warn!(error = %err, "feishu webhook delivery failed"),
    }
}

async fn publish_app(app: &FeishuAppConfig, date: DateTime<FixedOffset>, page_url: &str) {
    let Some(raw_ids) = &app.receive_ids else {
        warn!("feishu receiver list not configured, skipping app delivery");
        return;
    };

    let receive_ids: Vec<String> = match serde_json::from_str(raw_ids) {
        Ok(ids) => ids,
        Err(err) => {
            warn!(error = %err, "feishu receiver list is not a JSON array of strings");
            return;
        }
    };
    if receive_ids.is_empty() {
        warn!("feishu receiver list is empty");
        return;
    }

    let mut client = match FeishuClient::new(app.app_id.clone(), app.app_secret.clone()) {
        Ok(client) => client,
        Err(err) => {
            warn!(error = %err, "failed to build feishu http client");
            return;
        }
    };

    let card = card(date, page_url);
    let mut succeeded = 0usize;
    let mut failed = 0usize;

    for receive_id in &receive_ids {
        if client.send_card(receive_id, &card).await {
            succeeded += 1;
        } else {
            failed += 1;
        }
    }

    info!(succeeded, failed, "feishu app delivery complete");
}

/// Feishu app API client that caches its tenant access token for the
/// duration of the run.
struct FeishuClient {
    client: Client,
    app_id: String,
    app_secret: String,
    token: Option<CachedToken>,
}

struct CachedToken {
    value: String,
    expires_at: Instant,
}

impl FeishuClient {
    fn new(app_id: String, app_secret: String) -> reqwest::Result<Self> {
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            client,
            app_id,
            app_secret,
            token: None,
        })
    }

    /// Current tenant access token, fetched on first use and refreshed when
    /// within the expiry margin.
    async fn tenant_access_token(&mut self) -> Option<String> {
        if let Some(cached) = &self.token {
            if cached.expires_at > Instant::now() + TOKEN_EXPIRY_MARGIN {
                return Some(cached.value.clone());
            }
        }

        let payload = json!({
            "app_id": self.app_id,
            "app_secret": self.app_secret,
        });

        let response = match self.client.post(TOKEN_URL).json(&payload).send().await {
            Ok(response) => response,
            Err(err) => {
                warn!(error = %err, "feishu token request failed");
                return None;
            }
        };

        let body: TokenResponse = match response.json().await {
            Ok(body) => body,
            Err(err) => {
                warn!(error = %err, "feishu token response unreadable");
                return None;
            }
        };

        if body.code != 0 {
            warn!(code = body.code, msg = %body.msg, "feishu token request rejected");
            return None;
        }

        let token = body.tenant_access_token?;
        let lifetime = StdDuration::from_secs(body.expire.unwrap_or(7200));
        self.token = Some(CachedToken {
            value: token.clone(),
            expires_at: Instant::now() + lifetime,
        });
        Some(token)
    }

    /// Send an interactive card to one receiver. Returns delivery success.
    async fn send_card(&mut self, receive_id: &str, card: &Value) -> bool {
        let Some(token) = self.tenant_access_token().await else {
            return false;
        };

        let payload = json!({
            "receive_id": receive_id,
            "msg_type": "interactive",
            // The messages API expects the card as a JSON-encoded string.
            "content": card.to_string(),
        });

        let response = self
            .client
            .post(MESSAGE_URL)
            .query(&[("receive_id_type", "open_id")])
            .bearer_auth(&token)
            .json(&payload)
            .send()
            .await;

        match response {
            Ok(response) if response.status().is_success() => {
                match response.json::<ApiStatus>().await {
                    Ok(status) if status.code == 0 => true,
                    Ok(status) => {
                        warn!(
                            receive_id,
                            code = status.code,
                            msg = %status.msg,
                            "feishu message rejected"
                        );
                        false
                    }
                    Err(err) => {
                        warn!(receive_id, error = %err, "feishu message response unreadable");
                        false
                    }
                }
            }
            Ok(response) => {
                warn!(receive_id, status = %response.status(), "feishu message delivery failed");
                false
            }
            Err(err) => {
                warn!(receive_id, error = %err, "feishu message delivery failed");
                false
            }
        }
    }
}
