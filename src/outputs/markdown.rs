//! Markdown digest rendering.
//!
//! One section per article in store order: title, author, publish time and
//! digest when present, the link, word count, and a short content preview.
//! Error records get their failure cause as a bullet instead of content —
//! error text is never mixed into content fields.

use crate::models::Article;
use crate::utils::char_prefix;
use std::fmt::Write;

/// Characters of body text shown in the per-article preview.
const PREVIEW_CHARS: usize = 200;

/// Render the full article store as a Markdown digest.
///
/// `generated_at` is the run's local timestamp, passed in so rendering
/// stays a pure function of its inputs.
pub fn digest_markdown(articles: &[Article], generated_at: &str) -> String {
    let mut md = String::new();

    writeln!(md, "# WeChat Article Digest\n").unwrap();
    writeln!(md, "Updated: {generated_at}\n").unwrap();
    writeln!(md, "Total: {} articles\n", articles.len()).unwrap();
    writeln!(md, "---\n").unwrap();

    for (i, article) in articles.iter().enumerate() {
        let title = article.title.as_deref().unwrap_or("Untitled");
        writeln!(md, "## {}. {title}\n", i + 1).unwrap();
        writeln!(
            md,
            "- **Author**: {}",
            article.author.as_deref().unwrap_or("Unknown")
        )
        .unwrap();
        if let Some(publish_time) = &article.publish_time {
            writeln!(md, "- **Published**: {publish_time}").unwrap();
        }
        if let Some(digest) = &article.digest {
            writeln!(md, "- **Digest**: {digest}").unwrap();
        }
        writeln!(md, "- **Link**: [Original article]({})", article.url).unwrap();
        if let Some(length) = article.content_length {
            writeln!(md, "- **Word count**: {length}").unwrap();
        }
        if let Some(error) = &article.error {
            writeln!(md, "- **Error**: {error}").unwrap();
        }
        writeln!(md).unwrap();

        if let Some(content) = &article.content {
            writeln!(
                md,
                "**Preview**:\n\n{}...\n",
                char_prefix(content, PREVIEW_CHARS)
            )
            .unwrap();
        }

        writeln!(md, "---\n").unwrap();
    }

    md
}
