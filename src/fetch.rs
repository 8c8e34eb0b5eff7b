//! Single-page retrieval over HTTP(S).

use std::time::{Duration, Instant};

use tracing::{debug, info};
use url::Url;

use crate::error::Result;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);
pub const DEFAULT_MAX_REDIRECTS: usize = 10;
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

#[derive(Debug, Clone)]
pub struct FetchConfig {
    pub timeout: Duration,
    pub user_agent: String,
    pub max_redirects: usize,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            max_redirects: DEFAULT_MAX_REDIRECTS,
        }
    }
}

#[derive(Debug, Clone)]
pub struct FetchedPage {
    pub requested_url: Url,
    /// URL after following redirects; relative links resolve against this.
    pub final_url: Url,
    pub status: u16,
    pub html: String,
    pub response_time: u128,
}

/// Fetches one page per call. Cheap to clone; clones share the connection pool.
#[derive(Debug, Clone)]
pub struct PageFetcher {
    client: reqwest::Client,
}

impl PageFetcher {
    pub fn new(config: &FetchConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(config.timeout)
            .redirect(reqwest::redirect::Policy::limited(config.max_redirects))
            .build()?;
        Ok(Self { client })
    }

    /// GETs `url`, following redirects. Non-2xx statuses are errors; nothing is retried.
    pub async fn fetch(&self, url: &Url) -> Result<FetchedPage> {
        let started = Instant::now();
        debug!(%url, "fetching page");
        let response = self
            .client
            .get(url.clone())
            .send()
            .await?
            .error_for_status()?;
        let final_url = response.url().clone();
        let status = response.status().as_u16();
        let html = response.text().await?;
        let response_time = started.elapsed().as_millis();

        info!(
            requested = %url,
            final_url = %final_url,
            status,
            bytes = html.len(),
            response_time_ms = response_time as u64,
            "fetched page"
        );
        Ok(FetchedPage {
            requested_url: url.clone(),
            final_url,
            status,
            html,
            response_time,
        })
    }
}
