//! Stage 1: discover WeChat article links in recent mail and merge them
//! into the persisted link store.
//!
//! Reads the decoded message dump (`inbox.json`, or `$WECHAT_INBOX`),
//! extracts article URLs from every body, and appends the unseen ones to
//! `articles_links.json` plus its plain-text mirror. A missing inbox is
//! fatal (exit code 1); a missing prior link store is just a cold start.

use std::error::Error;
use std::path::Path;
use tracing::{info, instrument};
use tracing_subscriber::{fmt as tfmt, EnvFilter};
use wechat_mail_digest::links::{extract_article_links, merge_links};
use wechat_mail_digest::mail::{JsonInbox, MailSource};
use wechat_mail_digest::models::Link;
use wechat_mail_digest::store;
use wechat_mail_digest::utils::now_iso;

const LINKS_JSON: &str = "articles_links.json";
const LINKS_TXT: &str = "articles_links.txt";

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
    info!("fetch_links starting up");

    let mut inbox = JsonInbox::from_env();
    info!(path = %inbox.path().display(), "Reading inbox");
    let messages = inbox.messages()?;

    let mut discovered: Vec<Link> = Vec::new();
    for message in &messages {
        let urls = extract_article_links(&message.body);
        if !urls.is_empty() {
            info!(subject = %message.subject, count = urls.len(), "Found article links");
        }
        for url in urls {
            discovered.push(Link {
                url,
                email_subject: message.subject.clone(),
                email_from: message.from.clone(),
                email_date: message.date.clone(),
                fetched_at: now_iso(),
            });
        }
    }
    info!(
        messages = messages.len(),
        links = discovered.len(),
        "Scanned mail bodies"
    );

    let existing = store::read_links_or_empty(Path::new(LINKS_JSON)).await;
    let prior = existing.len();
    let (merged, added) = merge_links(existing, discovered);
    store::write_links(Path::new(LINKS_JSON), Path::new(LINKS_TXT), &merged).await?;

    info!(prior, added, total = merged.len(), "Link store updated");
    info!(elapsed = ?start_time.elapsed(), "fetch_links complete");
    Ok(())
}
