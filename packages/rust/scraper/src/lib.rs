//! Page scraping for competitor and audit pages.
//!
//! A scrape never fails at this boundary: network and decoding errors come
//! back as a short human-readable sentence, so the text can be folded into a
//! prompt and the pipeline keeps going with degraded input.

mod extract;

use std::time::Duration;

use reqwest::Client;
use tracing::{debug, instrument, warn};

use seoforge_shared::{DEFAULT_USER_AGENT, Result, ScrapeConfig, SeoForgeError};

pub use extract::{collapse_whitespace, extract_visible_text, truncate_chars};

/// Default timeout in seconds for page requests.
const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Default per-page character budget.
const DEFAULT_CHAR_LIMIT: usize = 2000;

// ---------------------------------------------------------------------------
// Options
// ---------------------------------------------------------------------------

/// Configuration for a [`Scraper`].
#[derive(Debug, Clone)]
pub struct ScrapeOptions {
    /// Timeout for each HTTP request in seconds.
    pub timeout_secs: u64,
    /// Maximum characters returned per page.
    pub char_limit: usize,
    /// User-Agent header sent with every request.
    pub user_agent: String,
}

impl Default for ScrapeOptions {
    fn default() -> Self {
        Self {
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            char_limit: DEFAULT_CHAR_LIMIT,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl ScrapeOptions {
    /// Build options from the `[scrape]` section and a character budget.
    pub fn from_config(config: &ScrapeConfig, char_limit: usize) -> Self {
        Self {
            timeout_secs: config.timeout_secs,
            char_limit,
            user_agent: config.user_agent.clone(),
        }
    }
}

// ---------------------------------------------------------------------------
// Scraper
// ---------------------------------------------------------------------------

/// Fetches pages and reduces them to truncated visible text.
pub struct Scraper {
    client: Client,
    char_limit: usize,
}

impl Scraper {
    /// Create a scraper with the given options.
    pub fn new(opts: ScrapeOptions) -> Result<Self> {
        let client = Client::builder()
            .user_agent(opts.user_agent.as_str())
            .timeout(Duration::from_secs(opts.timeout_secs))
            .build()
            .map_err(|e| SeoForgeError::Network(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            char_limit: opts.char_limit,
        })
    }

    /// The per-page character budget this scraper enforces.
    pub fn char_limit(&self) -> usize {
        self.char_limit
    }

    /// Scrape `url` into at most `char_limit` characters of visible text.
    ///
    /// On failure the returned text is `Could not scrape {url}: {error}`,
    /// held to the same budget.
    #[instrument(skip(self), fields(limit = self.char_limit))]
    pub async fn scrape(&self, url: &str) -> String {
        let text = match self.try_scrape(url).await {
            Ok(text) => {
                debug!(chars = text.chars().count(), "page scraped");
                text
            }
            Err(e) => {
                warn!(error = %e, "scrape failed, folding error into prompt");
                format!("Could not scrape {url}: {e}")
            }
        };
        truncate_chars(&text, self.char_limit).to_string()
    }

    async fn try_scrape(&self, url: &str) -> Result<String> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| SeoForgeError::Network(format!("{url}: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            warn!(%status, "non-success response, scraping body anyway");
        }

        let body = response
            .text()
            .await
            .map_err(|e| SeoForgeError::Network(format!("{url}: body read failed: {e}")))?;

        Ok(extract_visible_text(&body))
    }
}
