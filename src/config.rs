// Runtime configuration.
// Every external input comes from environment variables; delivery targets are
// optional and simply skipped when unconfigured.

use std::env;
use std::path::PathBuf;

use crate::cache;

/// WeChat relay server credentials.
#[derive(Debug, Clone)]
pub struct WechatConfig {
    pub server_url: String,
    pub api_key: String,
    pub thumb_id: Option<String>,
}

/// Feishu app credentials for direct message delivery.
#[derive(Debug, Clone)]
pub struct FeishuAppConfig {
    pub app_id: String,
    pub app_secret: String,
    /// Raw JSON array of receiver open_ids; parsed at publish time so a bad
    /// value is reported there instead of aborting startup.
    pub receive_ids: Option<String>,
}

/// Full job configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory the report pages are written to.
    pub output_dir: PathBuf,
    /// Location of the summary cache file.
    pub cache_file: PathBuf,
    pub dashscope_api_key: Option<String>,
    pub wechat: Option<WechatConfig>,
    pub feishu_webhook_url: Option<String>,
    pub feishu_app: Option<FeishuAppConfig>,
    /// Overrides GitHub Pages URL discovery from the git remote.
    pub pages_base_url: Option<String>,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// - `OUTPUT_DIR` - report output directory (default: `public`)
    /// - `CACHE_FILE` - summary cache path (default: `data/project_summaries_cache.json`)
    /// - `DASHSCOPE_API_KEY` - text-generation credentials
    /// - `SERVER_URL`, `SERVER_API_KEY`, `THUMB_ID` - WeChat relay
    /// - `FEISHU_WEBHOOK_URL` - Feishu webhook bot
    /// - `FEISHU_APP_ID`, `FEISHU_APP_SECRET`, `FEISHU_RECEIVE_IDS` - Feishu app
    /// - `PAGES_BASE_URL` - published site base URL override
    pub fn from_env() -> Self {
        let wechat = match (non_empty("SERVER_URL"), non_empty("SERVER_API_KEY")) {
            (Some(server_url), Some(api_key)) => Some(WechatConfig {
                server_url,
                api_key,
                thumb_id: non_empty("THUMB_ID"),
            }),
            _ => None,
        };

        let feishu_app = match (non_empty("FEISHU_APP_ID"), non_empty("FEISHU_APP_SECRET")) {
            (Some(app_id), Some(app_secret)) => Some(FeishuAppConfig {
                app_id,
                app_secret,
                receive_ids: non_empty("FEISHU_RECEIVE_IDS"),
            }),
            _ => None,
        };

        Self {
            output_dir: non_empty("OUTPUT_DIR").unwrap_or_else(|| "public".to_string()).into(),
            cache_file: non_empty("CACHE_FILE")
                .unwrap_or_else(|| cache::CACHE_FILE.to_string())
                .into(),
            dashscope_api_key: non_empty("DASHSCOPE_API_KEY"),
            wechat,
            feishu_webhook_url: non_empty("FEISHU_WEBHOOK_URL"),
            feishu_app,
            pages_base_url: non_empty("PAGES_BASE_URL"),
        }
    }
}

fn non_empty(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}
