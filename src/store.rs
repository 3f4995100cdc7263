//! On-disk persistence for the link and article stores.
//!
//! Both stores are JSON arrays, pretty-printed with raw non-ASCII preserved.
//! The link store is additionally mirrored as a plain-text file, one URL per
//! line in the same order, for external tooling.
//!
//! Reads come in two flavors: required inputs (missing file is fatal to the
//! stage) and prior state (missing or corrupt file is a cold start — treated
//! as empty, logged, never propagated).

use crate::models::{Article, Link};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::error::Error;
use std::fmt::Write as _;
use std::io::ErrorKind;
use std::path::Path;
use tokio::fs;
use tracing::{info, warn};

/// Read the link store as a required input.
///
/// Used by the ingestion stage, for which a missing link store means there
/// is nothing to do and the invocation is a user error.
pub async fn read_links(path: &Path) -> Result<Vec<Link>, Box<dyn Error>> {
    let raw = fs::read_to_string(path)
        .await
        .map_err(|e| format!("cannot read link store {}: {e}", path.display()))?;
    let links = serde_json::from_str(&raw)
        .map_err(|e| format!("malformed link store {}: {e}", path.display()))?;
    Ok(links)
}

/// Read the link store as prior state; cold start on missing or corrupt.
pub async fn read_links_or_empty(path: &Path) -> Vec<Link> {
    read_or_empty(path, "link").await
}

/// Read the article store as prior state; cold start on missing or corrupt.
pub async fn read_articles_or_empty(path: &Path) -> Vec<Article> {
    read_or_empty(path, "article").await
}

async fn read_or_empty<T: DeserializeOwned>(path: &Path, store: &str) -> Vec<T> {
    match fs::read_to_string(path).await {
        Ok(raw) => match serde_json::from_str(&raw) {
            Ok(records) => records,
            Err(e) => {
                warn!(path = %path.display(), store, error = %e, "Corrupt store; starting empty");
                Vec::new()
            }
        },
        Err(e) if e.kind() == ErrorKind::NotFound => {
            info!(path = %path.display(), store, "No prior store; cold start");
            Vec::new()
        }
        Err(e) => {
            warn!(path = %path.display(), store, error = %e, "Unreadable store; starting empty");
            Vec::new()
        }
    }
}

/// Write the link store and its plain-text mirror.
pub async fn write_links(
    json_path: &Path,
    txt_path: &Path,
    links: &[Link],
) -> Result<(), Box<dyn Error>> {
    write_pretty(json_path, links).await?;

    let mut txt = String::new();
    for link in links {
        writeln!(txt, "{}", link.url).unwrap();
    }
    fs::write(txt_path, txt).await?;
    info!(path = %txt_path.display(), count = links.len(), "Wrote link mirror");
    Ok(())
}

/// Write the article store as the full merged sequence, insertion order.
pub async fn write_articles(path: &Path, articles: &[Article]) -> Result<(), Box<dyn Error>> {
    write_pretty(path, articles).await
}

async fn write_pretty<T: Serialize>(path: &Path, records: &[T]) -> Result<(), Box<dyn Error>> {
    let json = serde_json::to_string_pretty(records)?;
    fs::write(path, json).await?;
    info!(path = %path.display(), count = records.len(), "Wrote store");
    Ok(())
}
