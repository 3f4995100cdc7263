//! Stage 2: scrape every not-yet-successful link and refresh the digest.
//!
//! Runs the ingestion pipeline from `articles_links.json` into
//! `articles_content.json`, then renders the whole store as
//! `articles_summary.md`. A missing link store is fatal (exit code 1);
//! per-link fetch failures are captured as error records and never abort
//! the batch.

use chrono::Local;
use std::error::Error;
use std::path::Path;
use tracing::{info, instrument};
use tracing_subscriber::{fmt as tfmt, EnvFilter};
use wechat_mail_digest::outputs::markdown::digest_markdown;
use wechat_mail_digest::utils::now_iso;
use wechat_mail_digest::{pipeline, store};

const LINKS_JSON: &str = "articles_links.json";
const ARTICLES_JSON: &str = "articles_content.json";
const SUMMARY_MD: &str = "articles_summary.md";

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
    info!(started = %Local::now().format("%Y-%m-%d %H:%M:%S"), "scrape_articles starting up");

    let report = pipeline::run(Path::new(LINKS_JSON), Path::new(ARTICLES_JSON)).await?;
    info!(new = report.new, total = report.total, "Scrape finished");

    let articles = store::read_articles_or_empty(Path::new(ARTICLES_JSON)).await;
    let md = digest_markdown(&articles, &now_iso());
    tokio::fs::write(SUMMARY_MD, md).await?;
    info!(path = SUMMARY_MD, articles = articles.len(), "Wrote digest");

    info!(elapsed = ?start_time.elapsed(), "scrape_articles complete");
    Ok(())
}
