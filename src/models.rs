//! Data models for discovered links and scraped articles.
//!
//! This module defines the records persisted between runs:
//! - [`Link`]: an article URL discovered in a mail body, plus its provenance
//! - [`Article`]: the extracted representation of one article page, or an
//!   error placeholder when retrieval failed
//! - [`ArticleStatus`]: explicit success/error tag on every article record
//! - [`SourceEmail`]: the originating email metadata carried on an article
//!
//! Field names match the on-disk JSON store layout, so the serde derives are
//! the single source of truth for the file formats.

use serde::{Deserialize, Serialize};

/// A WeChat article link discovered in an email body.
///
/// Identity is the exact `url` string; two URLs differing only in query
/// parameters are distinct links. Records are immutable once stored:
/// rediscovering a known URL never updates its email metadata.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct Link {
    /// The article URL, exactly as it appeared in the mail body.
    pub url: String,
    /// Subject line of the email the link was found in.
    pub email_subject: String,
    /// `From` header of that email.
    pub email_from: String,
    /// `Date` header of that email, verbatim.
    pub email_date: String,
    /// Local ISO-8601 timestamp of the discovery run.
    pub fetched_at: String,
}

/// Outcome tag for an [`Article`] record.
///
/// Stored explicitly rather than inferred from field presence, so a success
/// record with every optional field absent is still unambiguous. Only
/// `Success` records are skipped by later runs; `Error` records stay
/// eligible for retry.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ArticleStatus {
    Success,
    Error,
}

/// Email provenance attached to an article by the ingestion pipeline.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct SourceEmail {
    pub subject: String,
    pub from: String,
    pub date: String,
}

/// One scraped article, or the error placeholder left by a failed fetch.
///
/// Identity is `url`; the article store holds at most one record per URL and
/// a re-fetch (retry of a prior error) overwrites in place. Optional fields
/// are omitted from the JSON output when absent rather than serialized as
/// null, mirroring how extraction misses are silent.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct Article {
    pub url: String,
    pub status: ArticleStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub publish_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub digest: Option<String>,
    /// Body text, truncated to [`crate::extract::CONTENT_MAX_CHARS`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    /// Character count of the body text before truncation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_length: Option<usize>,
    /// Local ISO-8601 timestamp of the fetch attempt.
    pub scraped_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_email: Option<SourceEmail>,
    /// Stringified failure cause; present only on error records.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Article {
    /// Whether a later run may skip re-fetching this URL.
    pub fn is_success(&self) -> bool {
        self.status == ArticleStatus::Success
    }

    /// Build an error record for a failed fetch attempt.
    pub fn failed(url: &str, error: impl ToString, scraped_at: String) -> Self {
        Article {
            url: url.to_string(),
            status: ArticleStatus::Error,
            title: None,
            author: None,
            publish_time: None,
            digest: None,
            content: None,
            content_length: None,
            scraped_at,
            source_email: None,
            error: Some(error.to_string()),
        }
    }
}
