// Trending page HTTP client.
// Walks the paginated listing until GitHub runs out of rows.

use std::time::Duration;

use reqwest::{
    Client,
    header::{HeaderMap, HeaderValue, USER_AGENT},
};
use tracing::{debug, warn};

use crate::error::{DigestError, Result};

use super::parse;
use super::types::{Project, Since};

const TRENDING_URL: &str = "https://github.com/trending";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// HTTP client for the github.com/trending listing pages.
pub struct TrendingClient {
    client: Client,
}

impl TrendingClient {
    /// Create a client with a browser User-Agent (GitHub serves a reduced
    /// page to unknown agents).
    pub fn new() -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static("Mozilla/5.0"));

        let client = Client::builder()
            .default_headers(headers)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(DigestError::Http)?;

        Ok(Self { client })
    }

    /// Fetch every page of a trending listing.
    ///
    /// A failed request or an empty page ends the walk; whatever was
    /// collected so far is returned rather than failing the run.
    pub async fn fetch(&self, since: Since) -> Vec<Project> {
        let mut projects = Vec::new();
        let mut page = 1u32;

        loop {
            let html = match self.fetch_page(since, page).await {
                Ok(html) => html,
                Err(err) => {
                    warn!(error = %err, since = since.as_str(), page, "trending page fetch failed");
                    break;
                }
            };

            let parsed = parse::parse_page(&html);
            if parsed.projects.is_empty() {
                break;
            }
            projects.extend(parsed.projects);

            if !parsed.has_next_page {
                break;
            }
            page += 1;
        }

        debug!(since = since.as_str(), count = projects.len(), "trending listing fetched");
        projects
    }

    async fn fetch_page(&self, since: Since, page: u32) -> Result<String> {
        let page_param = page.to_string();
        let response = self
            .client
            .get(TRENDING_URL)
            .query(&[("since", since.as_str()), ("page", page_param.as_str())])
            .send()
            .await?
            .error_for_status()?;

        Ok(response.text().await?)
    }
}
