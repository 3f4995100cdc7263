//! Link discovery and link-store merging.
//!
//! [`extract_article_links`] scans arbitrary mail-body text (plain text or
//! raw HTML) for WeChat article URLs. [`merge_links`] folds a discovery
//! run's links into the persisted collection without ever mutating records
//! already present.

use crate::models::Link;
use itertools::Itertools;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;
use tracing::debug;
use url::Url;

/// Matches a WeChat public-account article URL embedded in text.
///
/// Greedy up to, but excluding, whitespace and the delimiters `<` `>` `"` `'`
/// that bound URLs in HTML attributes and quoted mail bodies.
static ARTICLE_URL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"https?://mp\.weixin\.qq\.com/s[^\s<>"']*"#).expect("ARTICLE_URL regex")
});

/// Extract WeChat article URLs from a mail body.
///
/// Pure function of the input text. Deduplication is exact-string (no query
/// canonicalization: two URLs differing only in tracking parameters are
/// distinct), and first-occurrence order is preserved.
pub fn extract_article_links(body: &str) -> Vec<String> {
    let links: Vec<String> = ARTICLE_URL
        .find_iter(body)
        .map(|m| m.as_str().to_string())
        .filter(|candidate| is_article_url(candidate))
        .unique()
        .collect();
    debug!(count = links.len(), "Extracted article links from body");
    links
}

/// Second-pass check that a regex candidate really is a well-formed URL on
/// the article host with an article path.
fn is_article_url(candidate: &str) -> bool {
    Url::parse(candidate)
        .is_ok_and(|url| url.host_str() == Some("mp.weixin.qq.com") && url.path().starts_with("/s"))
}

/// Merge newly discovered links into the persisted sequence.
///
/// Preserves the existing order and appends unseen URLs in discovery order.
/// A URL already present is never touched, even when the accompanying email
/// metadata differs on rediscovery: first-seen metadata wins. A missing
/// prior store is just the empty sequence.
///
/// Returns the merged sequence and the number of links appended.
pub fn merge_links(existing: Vec<Link>, discovered: Vec<Link>) -> (Vec<Link>, usize) {
    let mut seen: HashSet<String> = existing.iter().map(|l| l.url.clone()).collect();
    let mut merged = existing;
    let mut added = 0usize;
    for link in discovered {
        if seen.insert(link.url.clone()) {
            merged.push(link);
            added += 1;
        }
    }
    (merged, added)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn link(url: &str, subject: &str) -> Link {
        Link {
            url: url.to_string(),
            email_subject: subject.to_string(),
            email_from: "friend@example.com".to_string(),
            email_date: "Wed, 1 Jan 2025 00:00:00 +0800".to_string(),
            fetched_at: "2025-01-01T00:00:00".to_string(),
        }
    }

    #[test]
    fn test_extracts_link_bounded_by_whitespace() {
        let body = "Check this out: https://mp.weixin.qq.com/s/abc123 thanks";
        assert_eq!(
            extract_article_links(body),
            vec!["https://mp.weixin.qq.com/s/abc123".to_string()]
        );
    }

    #[test]
    fn test_extracts_link_from_html_attribute() {
        let body = r#"<a href="https://mp.weixin.qq.com/s/abc123?from=timeline">read</a>"#;
        assert_eq!(
            extract_article_links(body),
            vec!["https://mp.weixin.qq.com/s/abc123?from=timeline".to_string()]
        );
    }

    #[test]
    fn test_stops_at_quote_and_angle_delimiters() {
        let body = "<https://mp.weixin.qq.com/s/one> and 'https://mp.weixin.qq.com/s/two'";
        assert_eq!(
            extract_article_links(body),
            vec![
                "https://mp.weixin.qq.com/s/one".to_string(),
                "https://mp.weixin.qq.com/s/two".to_string()
            ]
        );
    }

    #[test]
    fn test_ignores_other_hosts() {
        let body = "https://example.com/s/abc https://weixin.qq.com/other";
        assert!(extract_article_links(body).is_empty());
    }

    #[test]
    fn test_dedup_preserves_first_occurrence_order() {
        let body = "https://mp.weixin.qq.com/s/b https://mp.weixin.qq.com/s/a https://mp.weixin.qq.com/s/b";
        assert_eq!(
            extract_article_links(body),
            vec![
                "https://mp.weixin.qq.com/s/b".to_string(),
                "https://mp.weixin.qq.com/s/a".to_string()
            ]
        );
    }

    #[test]
    fn test_tracking_parameters_stay_distinct() {
        let body = "https://mp.weixin.qq.com/s/a?x=1 https://mp.weixin.qq.com/s/a?x=2";
        assert_eq!(extract_article_links(body).len(), 2);
    }

    #[test]
    fn test_merge_appends_in_discovery_order() {
        let existing = vec![link("https://mp.weixin.qq.com/s/a", "old")];
        let discovered = vec![
            link("https://mp.weixin.qq.com/s/b", "new"),
            link("https://mp.weixin.qq.com/s/c", "new"),
        ];
        let (merged, added) = merge_links(existing, discovered);
        assert_eq!(added, 2);
        let urls: Vec<&str> = merged.iter().map(|l| l.url.as_str()).collect();
        assert_eq!(
            urls,
            vec![
                "https://mp.weixin.qq.com/s/a",
                "https://mp.weixin.qq.com/s/b",
                "https://mp.weixin.qq.com/s/c"
            ]
        );
    }

    #[test]
    fn test_merge_first_seen_metadata_wins() {
        let existing = vec![link("https://mp.weixin.qq.com/s/a", "original subject")];
        let discovered = vec![link("https://mp.weixin.qq.com/s/a", "different subject")];
        let (merged, added) = merge_links(existing, discovered);
        assert_eq!(added, 0);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].email_subject, "original subject");
    }

    #[test]
    fn test_merge_is_idempotent() {
        let discovered = vec![
            link("https://mp.weixin.qq.com/s/a", "s"),
            link("https://mp.weixin.qq.com/s/b", "s"),
        ];
        let (first, added_first) = merge_links(Vec::new(), discovered.clone());
        assert_eq!(added_first, 2);
        let (second, added_second) = merge_links(first.clone(), discovered);
        assert_eq!(added_second, 0);
        assert_eq!(second, first);
    }

    #[test]
    fn test_merge_empty_inputs() {
        let (merged, added) = merge_links(Vec::new(), Vec::new());
        assert!(merged.is_empty());
        assert_eq!(added, 0);
    }
}
