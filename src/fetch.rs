//! Single-article retrieval.
//!
//! [`ArticleFetcher`] issues one GET per article with a realistic browser
//! user agent (WeChat rejects default-agent requests) and a fixed timeout,
//! then hands the body to the field extractor. Every failure mode — network,
//! timeout, non-200 status, unrecognizable markup — is folded into an error
//! *record* rather than a propagated error, so one bad link can never take
//! down a batch. Nothing here persists anything.

use crate::extract::extract_fields;
use crate::models::{Article, ArticleStatus};
use crate::utils::now_iso;
use std::error::Error;
use std::time::Duration;
use tracing::{info, instrument, warn};

/// WeChat serves an interstitial or rejects the request outright for
/// default library user agents, so fetches present as a desktop browser.
pub const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

/// Per-request timeout covering connect and body read.
pub const FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// Retrieves article pages and classifies each attempt as a success or
/// error record.
pub struct ArticleFetcher {
    client: reqwest::Client,
}

impl ArticleFetcher {
    /// Build the shared HTTP client with the fixed headers and timeout.
    pub fn new() -> Result<Self, Box<dyn Error>> {
        let client = reqwest::Client::builder()
            .user_agent(BROWSER_USER_AGENT)
            .timeout(FETCH_TIMEOUT)
            .build()?;
        Ok(ArticleFetcher { client })
    }

    /// Fetch one article page and extract its fields.
    ///
    /// Never fails: any transport or status problem becomes an error record
    /// carrying the stringified cause and a `scraped_at` stamp.
    #[instrument(level = "info", skip_all, fields(%url))]
    pub async fn fetch(&self, url: &str) -> Article {
        match self.retrieve(url).await {
            Ok(html) => {
                let article = assemble(url, &html);
                match &article.error {
                    None => info!(title = article.title.as_deref().unwrap_or("<untitled>"), "Scraped article"),
                    Some(e) => warn!(error = %e, "Page retrieved but not recognized as an article"),
                }
                article
            }
            Err(e) => {
                warn!(error = %e, "Fetch failed");
                Article::failed(url, e, now_iso())
            }
        }
    }

    /// One GET, body decoded as UTF-8 regardless of the declared server
    /// encoding (WeChat pages occasionally declare variants that are UTF-8
    /// in practice).
    async fn retrieve(&self, url: &str) -> Result<String, Box<dyn Error>> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(format!("HTTP {status}").into());
        }
        let bytes = response.bytes().await?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}

/// Turn a retrieved page into an article record.
///
/// A page that yields neither title nor body is classified as an error
/// record, keeping it retry-eligible for the next run (anti-bot
/// interstitials look exactly like this).
fn assemble(url: &str, html: &str) -> Article {
    let fields = extract_fields(html);
    if !fields.is_recognized() {
        return Article::failed(url, "no article fields extracted", now_iso());
    }
    Article {
        url: url.to_string(),
        status: ArticleStatus::Success,
        title: fields.title,
        author: fields.author,
        publish_time: fields.publish_time,
        digest: fields.digest,
        content: fields.content,
        content_length: fields.content_length,
        scraped_at: now_iso(),
        source_email: None,
        error: None,
    }
}
