//! Ad-hoc scrape of a plain URL list, for spot-checking extraction.
//!
//! Reads `test_links.txt` (one URL per line, blank lines skipped), scrapes
//! each with the usual pacing, and writes timestamped
//! `articles_<YYYYmmdd_HHMMSS>.json` and `.md` files instead of touching the
//! incremental stores. The URL list is a required input (exit code 1 when
//! missing).

use chrono::Local;
use std::error::Error;
use tokio::time::sleep;
use tracing::{info, instrument, warn};
use tracing_subscriber::{fmt as tfmt, EnvFilter};
use wechat_mail_digest::fetch::ArticleFetcher;
use wechat_mail_digest::outputs::markdown::digest_markdown;
use wechat_mail_digest::pipeline::FETCH_DELAY;
use wechat_mail_digest::utils::now_iso;

const LIST_FILE: &str = "test_links.txt";

#[tokio::main]
#[instrument]
async fn main() -> Result<(), Box<dyn Error>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("scrape_list starting up");

    let raw = tokio::fs::read_to_string(LIST_FILE)
        .await
        .map_err(|e| format!("cannot read {LIST_FILE}: {e}"))?;
    let urls: Vec<&str> = raw
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect();
    info!(count = urls.len(), "Loaded URL list");

    let fetcher = ArticleFetcher::new()?;
    let mut articles = Vec::with_capacity(urls.len());
    let total = urls.len();
    for (i, url) in urls.into_iter().enumerate() {
        info!(position = i + 1, total, %url, "Fetching article");
        let article = fetcher.fetch(url).await;
        if !article.is_success() {
            warn!(%url, error = article.error.as_deref().unwrap_or("unknown"), "Scrape failed");
        }
        articles.push(article);
        if i + 1 < total {
            sleep(FETCH_DELAY).await;
        }
    }

    let succeeded = articles.iter().filter(|a| a.is_success()).count();
    info!(succeeded, total, "Scraped URL list");

    let stamp = Local::now().format("%Y%m%d_%H%M%S");
    let json_path = format!("articles_{stamp}.json");
    let md_path = format!("articles_{stamp}.md");

    let json = serde_json::to_string_pretty(&articles)?;
    tokio::fs::write(&json_path, json).await?;
    info!(path = %json_path, "Wrote articles");

    let md = digest_markdown(&articles, &now_iso());
    tokio::fs::write(&md_path, md).await?;
    info!(path = %md_path, "Wrote digest");

    info!(elapsed = ?start_time.elapsed(), "scrape_list complete");
    Ok(())
}
