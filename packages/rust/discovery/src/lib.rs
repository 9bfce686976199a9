//! Sitemap discovery: the closed set of real URLs an article may link to.
//!
//! The internal-linking phase only trusts URLs that the site itself publishes
//! in its sitemap. Fetching is best-effort: every failure (network, timeout,
//! non-200 status, malformed XML) yields an empty list, and the caller decides
//! how to phrase the absence.

mod parser;

use std::time::Duration;

use reqwest::Client;
use tracing::{debug, info, instrument, warn};

use seoforge_shared::{Result, SeoForgeError};

/// Default timeout in seconds for fetching a sitemap.
const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Upper bound on URLs handed to the link prompt.
pub const MAX_SITEMAP_URLS: usize = 500;

/// User-Agent string for sitemap requests.
const USER_AGENT: &str = concat!("SeoForge/", env!("CARGO_PKG_VERSION"));

// ---------------------------------------------------------------------------
// Options
// ---------------------------------------------------------------------------

/// Configuration for a sitemap fetch.
#[derive(Debug, Clone)]
pub struct SitemapOptions {
    /// Timeout for the HTTP request in seconds.
    pub timeout_secs: u64,
    /// Maximum number of URLs to return.
    pub max_urls: usize,
}

impl Default for SitemapOptions {
    fn default() -> Self {
        Self {
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            max_urls: MAX_SITEMAP_URLS,
        }
    }
}

// ---------------------------------------------------------------------------
// Main entry point
// ---------------------------------------------------------------------------

/// Fetch a sitemap and return its page URLs in document order.
///
/// Never fails: any error is logged and an empty list is returned.
#[instrument(skip_all, fields(url = %url))]
pub async fn fetch_sitemap(url: &str, opts: &SitemapOptions) -> Vec<String> {
    match try_fetch_sitemap(url, opts).await {
        Ok(urls) => {
            info!(count = urls.len(), "sitemap loaded");
            urls
        }
        Err(e) => {
            warn!(error = %e, "sitemap unavailable, continuing without it");
            Vec::new()
        }
    }
}

/// Parse a sitemap document already in memory, applying the URL cap.
pub fn parse_sitemap(xml: &str, max_urls: usize) -> Result<Vec<String>> {
    let mut urls = parser::parse_sitemap(xml)?;
    if urls.len() > max_urls {
        debug!(found = urls.len(), kept = max_urls, "truncating sitemap URL list");
        urls.truncate(max_urls);
    }
    Ok(urls)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn try_fetch_sitemap(url: &str, opts: &SitemapOptions) -> Result<Vec<String>> {
    let client = build_client(opts)?;

    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| SeoForgeError::Network(format!("{url}: {e}")))?;

    let status = response.status();
    if status != reqwest::StatusCode::OK {
        return Err(SeoForgeError::Network(format!("{url}: HTTP {status}")));
    }

    let body = response
        .text()
        .await
        .map_err(|e| SeoForgeError::Network(format!("{url}: failed to read body: {e}")))?;

    parse_sitemap(&body, opts.max_urls)
}

/// Build a reqwest client with the sitemap timeout applied.
fn build_client(opts: &SitemapOptions) -> Result<Client> {
    Client::builder()
        .user_agent(USER_AGENT)
        .timeout(Duration::from_secs(opts.timeout_secs))
        .build()
        .map_err(|e| SeoForgeError::Network(format!("failed to build HTTP client: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    const TWO_URLS: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
  <url><loc>https://example.com/services/</loc></url>
  <url><loc>https://example.com/blog/remote-teams/</loc></url>
</urlset>"#;

    fn big_sitemap(n: usize) -> String {
        let mut xml = String::from("<urlset>");
        for i in 0..n {
            xml.push_str(&format!("<url><loc>https://example.com/p/{i}</loc></url>"));
        }
        xml.push_str("</urlset>");
        xml
    }

    async fn serve(status: u16, body: &str) -> wiremock::MockServer {
        let server = wiremock::MockServer::start().await;
        wiremock::Mock::given(wiremock::matchers::method("GET"))
            .and(wiremock::matchers::path("/sitemap.xml"))
            .respond_with(wiremock::ResponseTemplate::new(status).set_body_string(body))
            .mount(&server)
            .await;
        server
    }

    #[test]
    fn parse_applies_cap() {
        let urls = parse_sitemap(&big_sitemap(600), MAX_SITEMAP_URLS).unwrap();
        assert_eq!(urls.len(), 500);
        assert_eq!(urls[0], "https://example.com/p/0");
        assert_eq!(urls[499], "https://example.com/p/499");
    }

    #[tokio::test]
    async fn fetch_returns_urls_in_order() {
        let server = serve(200, TWO_URLS).await;
        let url = format!("{}/sitemap.xml", server.uri());

        let urls = fetch_sitemap(&url, &SitemapOptions::default()).await;
        assert_eq!(
            urls,
            vec![
                "https://example.com/services/",
                "https://example.com/blog/remote-teams/",
            ]
        );
    }

    #[tokio::test]
    async fn fetch_never_exceeds_cap() {
        let server = serve(200, &big_sitemap(750)).await;
        let url = format!("{}/sitemap.xml", server.uri());

        let urls = fetch_sitemap(&url, &SitemapOptions::default()).await;
        assert_eq!(urls.len(), MAX_SITEMAP_URLS);
    }

    #[tokio::test]
    async fn fetch_non_200_is_empty() {
        for status in [404, 500, 301, 204] {
            let server = serve(status, TWO_URLS).await;
            let url = format!("{}/sitemap.xml", server.uri());
            let urls = fetch_sitemap(&url, &SitemapOptions::default()).await;
            assert!(urls.is_empty(), "status {status} should yield no URLs");
        }
    }

    #[tokio::test]
    async fn fetch_malformed_is_empty() {
        let server = serve(200, "<urlset><url><loc>https://a.com</loc>").await;
        let url = format!("{}/sitemap.xml", server.uri());

        let urls = fetch_sitemap(&url, &SitemapOptions::default()).await;
        assert!(urls.is_empty());
    }

    #[tokio::test]
    async fn fetch_trailing_junk_is_empty() {
        let server = serve(
            200,
            "<urlset><url><loc>https://a.com</loc></url></urlset><!-- ok -->trailing junk",
        )
        .await;
        let url = format!("{}/sitemap.xml", server.uri());

        let urls = fetch_sitemap(&url, &SitemapOptions::default()).await;
        assert!(urls.is_empty());
    }

    #[tokio::test]
    async fn fetch_unreachable_is_empty() {
        // Nothing listens on the discard port.
        let urls = fetch_sitemap("http://127.0.0.1:9/sitemap.xml", &SitemapOptions {
            timeout_secs: 2,
            max_urls: MAX_SITEMAP_URLS,
        })
        .await;
        assert!(urls.is_empty());
    }

    #[tokio::test]
    async fn fetch_timeout_is_empty() {
        let server = wiremock::MockServer::start().await;
        wiremock::Mock::given(wiremock::matchers::path("/sitemap.xml"))
            .respond_with(
                wiremock::ResponseTemplate::new(200)
                    .set_body_string(TWO_URLS)
                    .set_delay(Duration::from_secs(3)),
            )
            .mount(&server)
            .await;

        let url = format!("{}/sitemap.xml", server.uri());
        let opts = SitemapOptions {
            timeout_secs: 1,
            max_urls: MAX_SITEMAP_URLS,
        };
        assert!(fetch_sitemap(&url, &opts).await.is_empty());
    }
}
