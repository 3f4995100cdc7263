//! The incremental ingestion pipeline: load, plan, fetch, persist.
//!
//! One run works through the persisted link store sequentially. URLs that
//! already have a *success* record are skipped; error records and unseen
//! URLs are (re-)fetched with a fixed pause between requests, since WeChat
//! rate-limits bursts. Individual fetch failures never halt the run — they
//! land in the store as error records and become retry candidates next time.
//!
//! Stores are read once at the start and written once at the end; concurrent
//! runs against the same files are not supported.

use crate::fetch::ArticleFetcher;
use crate::models::{Article, Link, SourceEmail};
use crate::store;
use futures::stream::{self, StreamExt};
use std::collections::HashMap;
use std::error::Error;
use std::path::Path;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{info, instrument};

/// Minimum pause between consecutive article fetches.
pub const FETCH_DELAY: Duration = Duration::from_secs(2);

/// Aggregate counts reported at the end of a run.
#[derive(Debug, PartialEq, Eq)]
pub struct PipelineReport {
    /// Articles fetched (or re-fetched) this run.
    pub new: usize,
    /// Records in the store after the run.
    pub total: usize,
}

/// Ordered URL → article index.
///
/// Rebuilt from persisted state at run start and serialized back to an
/// ordered sequence at run end, so store order stays deterministic across
/// runs: existing records keep their position, new ones append.
#[derive(Debug, Default)]
pub struct ArticleIndex {
    order: Vec<String>,
    by_url: HashMap<String, Article>,
}

impl ArticleIndex {
    /// Rebuild the index from the persisted sequence.
    pub fn from_records(records: Vec<Article>) -> Self {
        let mut index = ArticleIndex::default();
        for article in records {
            index.upsert(article);
        }
        index
    }

    pub fn get(&self, url: &str) -> Option<&Article> {
        self.by_url.get(url)
    }

    /// Insert or overwrite by URL; first insertion fixes the position.
    pub fn upsert(&mut self, article: Article) {
        if !self.by_url.contains_key(&article.url) {
            self.order.push(article.url.clone());
        }
        self.by_url.insert(article.url.clone(), article);
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Consume the index back into an ordered sequence.
    pub fn into_records(self) -> Vec<Article> {
        let mut by_url = self.by_url;
        self.order
            .into_iter()
            .filter_map(|url| by_url.remove(&url))
            .collect()
    }
}

/// Select the links that need a fetch this run.
///
/// A link is enqueued unless the index already holds a success record for
/// its URL; missing and error records are both eligible.
pub fn plan(links: &[Link], index: &ArticleIndex) -> Vec<Link> {
    links
        .iter()
        .filter(|link| !index.get(&link.url).is_some_and(Article::is_success))
        .cloned()
        .collect()
}

/// Run one ingestion batch from the link store into the article store.
///
/// The link store is a required input; the prior article store is optional
/// state (cold start when missing or corrupt). Returns the `{new, total}`
/// counts for the run.
#[instrument(level = "info", skip_all, fields(links = %links_path.display(), articles = %articles_path.display()))]
pub async fn run(links_path: &Path, articles_path: &Path) -> Result<PipelineReport, Box<dyn Error>> {
    let links = store::read_links(links_path).await?;
    info!(count = links.len(), "Loaded link store");

    let mut index = ArticleIndex::from_records(store::read_articles_or_empty(articles_path).await);
    info!(count = index.len(), "Loaded prior articles");

    let queue = plan(&links, &index);
    info!(
        queued = queue.len(),
        skipped = links.len() - queue.len(),
        "Planned fetch queue"
    );

    let fetcher = ArticleFetcher::new()?;
    let fetcher = &fetcher;
    let queued = queue.len();
    let fetched: Vec<Article> = stream::iter(queue.into_iter().enumerate())
        .then(move |(i, link)| async move {
            if i > 0 {
                sleep(FETCH_DELAY).await;
            }
            info!(position = i + 1, total = queued, url = %link.url, "Fetching article");
            let mut article = fetcher.fetch(&link.url).await;
            article.source_email = Some(SourceEmail {
                subject: link.email_subject,
                from: link.email_from,
                date: link.email_date,
            });
            article
        })
        .collect()
        .await;
    for article in fetched {
        index.upsert(article);
    }

    let records = index.into_records();
    store::write_articles(articles_path, &records).await?;

    let report = PipelineReport {
        new: queued,
        total: records.len(),
    };
    info!(new = report.new, total = report.total, "Ingestion run complete");
    Ok(report)
}
