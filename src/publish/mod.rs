// Notification delivery module.
// Pushes the finished report to the WeChat relay and to Feishu.

pub mod feishu;
pub mod pages;
pub mod wechat;

use chrono::{DateTime, FixedOffset};

/// Notification title shared by both delivery channels, e.g.
/// `【0825】GitHub 热门项目日报`.
pub fn report_title(date: DateTime<FixedOffset>) -> String {
    format!("【{}】GitHub 热门项目日报", date.format("%m%d"))
}
