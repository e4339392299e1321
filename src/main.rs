// GitHub Trending daily digest generator.
// One batch run: scrape the trending listings, summarize each project through
// the on-disk cache, render the report page, regenerate the index, notify.

mod cache;
mod config;
mod error;
mod publish;
mod report;
mod summary;
mod trending;

use std::process::ExitCode;

use chrono::{DateTime, Duration, FixedOffset, Utc};
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cache::{CACHE_TTL_DAYS, SummaryCache};
use config::Config;
use summary::DashScope;
use trending::{Since, TrendingClient};

/// The run date is pinned once, in Beijing time, so filenames, titles, and
/// notifications agree even when the run crosses midnight.
fn beijing_now() -> DateTime<FixedOffset> {
    let beijing = FixedOffset::east_opt(8 * 3600).expect("valid UTC+8 offset");
    Utc::now().with_timezone(&beijing)
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "trending_digest=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env();
    let run_date = beijing_now();

    let client = match TrendingClient::new() {
        Ok(client) => client,
        Err(err) => {
            error!(error = %err, "failed to build trending client");
            return ExitCode::FAILURE;
        }
    };

    info!("collecting GitHub trending listings");
    let daily = client.fetch(Since::Daily).await;
    let weekly = client.fetch(Since::Weekly).await;
    let monthly = client.fetch(Since::Monthly).await;

    if daily.is_empty() && weekly.is_empty() && monthly.is_empty() {
        error!("no trending data could be fetched");
        return ExitCode::FAILURE;
    }
    info!(
        daily = daily.len(),
        weekly = weekly.len(),
        monthly = monthly.len(),
        "data collected, generating report"
    );

    let cache = SummaryCache::new(&config.cache_file, Duration::days(CACHE_TTL_DAYS));
    let summarizer = DashScope::new(config.dashscope_api_key.as_deref());

    let html = report::build_report(&daily, &weekly, &monthly, run_date, &cache, &summarizer).await;

    let path = match report::save_report(&config.output_dir, &html, run_date) {
        Ok(path) => path,
        Err(err) => {
            error!(error = %err, "failed to save report page");
            return ExitCode::FAILURE;
        }
    };
    info!(path = %path.display(), "report saved");

    match report::generate_index(&config.output_dir) {
        Ok(()) => info!("pages index regenerated"),
        Err(err) => warn!(error = %err, "failed to regenerate pages index"),
    }

    publish::wechat::publish(&config, &html, run_date).await;
    publish::feishu::publish(&config, run_date).await;

    info!("all tasks complete");
    ExitCode::SUCCESS
}
