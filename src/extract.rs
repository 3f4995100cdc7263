//! Field extraction from WeChat article pages.
//!
//! WeChat serves at least two markup variants: one with semantic classes
//! (`rich_media_title`, `rich_media_content`, ...) and one where the same
//! data only appears as JavaScript variable assignments in an inline script.
//! Each field therefore has an ordered chain of strategies, each a pure
//! `fn(&str) -> Option<String>`, tried in priority order with the first
//! non-empty hit winning. Fields are extracted independently: a page may
//! yield its title from the class variant and its author from the script
//! variant.
//!
//! Extraction misses are silent. A malformed fragment never aborts the
//! other fields, and nothing in this module performs I/O.

use crate::utils::{char_prefix, collapse_whitespace};
use chrono::{Local, TimeZone};
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{Html, Selector};

/// Stored body text is capped at this many characters; the pre-truncation
/// count is kept separately in `content_length`.
pub const CONTENT_MAX_CHARS: usize = 5000;

// ---- JavaScript-variable variant patterns ----

static MSG_TITLE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"var msg_title = "(.*?)";"#).expect("MSG_TITLE regex"));

static NICKNAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"var nickname = "(.*?)";"#).expect("NICKNAME regex"));

static PUBLISH_TIME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"var publish_time = "(\d+)""#).expect("PUBLISH_TIME regex"));

static MSG_DESC: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"var msg_desc = "(.*?)";"#).expect("MSG_DESC regex"));

// ---- Semantic-class variant selectors ----

static TITLE_HEADING: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("h1.rich_media_title, h2.rich_media_title").expect("TITLE_HEADING selector")
});

static AUTHOR_META: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("span.rich_media_meta.rich_media_meta_text").expect("AUTHOR_META selector")
});

static CONTENT_CONTAINER: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("#js_content, div.rich_media_content").expect("CONTENT_CONTAINER selector")
});

/// One fallback rule for one field.
type FieldStrategy = fn(&str) -> Option<String>;

const TITLE_CHAIN: &[FieldStrategy] = &[title_from_heading, title_from_script];
const AUTHOR_CHAIN: &[FieldStrategy] = &[author_from_meta, author_from_script];
const PUBLISH_TIME_CHAIN: &[FieldStrategy] = &[publish_time_from_script];
const DIGEST_CHAIN: &[FieldStrategy] = &[digest_from_script];
const CONTENT_CHAIN: &[FieldStrategy] = &[content_from_container];

/// The five optional fields recovered from one article page.
#[derive(Debug, Default, PartialEq)]
pub struct ArticleFields {
    pub title: Option<String>,
    pub author: Option<String>,
    pub publish_time: Option<String>,
    pub digest: Option<String>,
    /// Truncated to [`CONTENT_MAX_CHARS`].
    pub content: Option<String>,
    /// Character count before truncation.
    pub content_length: Option<usize>,
}

impl ArticleFields {
    /// A page counts as recognized when it yielded at least a title or body.
    pub fn is_recognized(&self) -> bool {
        self.title.is_some() || self.content.is_some()
    }
}

/// Run every field's strategy chain over one HTML document.
pub fn extract_fields(html: &str) -> ArticleFields {
    let (content, content_length) = match first_hit(html, CONTENT_CHAIN) {
        Some(text) => {
            let full_len = text.chars().count();
            (Some(char_prefix(&text, CONTENT_MAX_CHARS)), Some(full_len))
        }
        None => (None, None),
    };

    ArticleFields {
        title: first_hit(html, TITLE_CHAIN),
        author: first_hit(html, AUTHOR_CHAIN),
        publish_time: first_hit(html, PUBLISH_TIME_CHAIN),
        digest: first_hit(html, DIGEST_CHAIN),
        content,
        content_length,
    }
}

/// Try strategies in order, short-circuiting on the first hit.
fn first_hit(html: &str, chain: &[FieldStrategy]) -> Option<String> {
    chain.iter().find_map(|strategy| strategy(html))
}

/// Text of the first element matching `selector`, tags stripped and
/// whitespace collapsed. Empty results count as a miss.
fn select_text(html: &str, selector: &Selector) -> Option<String> {
    let document = Html::parse_document(html);
    let element = document.select(selector).next()?;
    let text = collapse_whitespace(&element.text().collect::<Vec<_>>().join(" "));
    (!text.is_empty()).then_some(text)
}

/// Trimmed first capture group of `pattern`. Empty captures count as a miss.
fn capture_group(html: &str, pattern: &Regex) -> Option<String> {
    let value = pattern.captures(html)?.get(1)?.as_str().trim().to_string();
    (!value.is_empty()).then_some(value)
}

fn title_from_heading(html: &str) -> Option<String> {
    select_text(html, &TITLE_HEADING)
}

fn title_from_script(html: &str) -> Option<String> {
    capture_group(html, &MSG_TITLE)
}

fn author_from_meta(html: &str) -> Option<String> {
    select_text(html, &AUTHOR_META)
}

fn author_from_script(html: &str) -> Option<String> {
    capture_group(html, &NICKNAME)
}

/// `var publish_time = "<unix seconds>"`, converted to local ISO-8601.
/// No fallback: an absent timestamp stays absent, never defaulted to now.
fn publish_time_from_script(html: &str) -> Option<String> {
    let seconds: i64 = capture_group(html, &PUBLISH_TIME)?.parse().ok()?;
    let stamp = Local.timestamp_opt(seconds, 0).single()?;
    Some(stamp.format("%Y-%m-%dT%H:%M:%S").to_string())
}

fn digest_from_script(html: &str) -> Option<String> {
    capture_group(html, &MSG_DESC)
}

fn content_from_container(html: &str) -> Option<String> {
    select_text(html, &CONTENT_CONTAINER)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn iso_local(seconds: i64) -> String {
        Local
            .timestamp_opt(seconds, 0)
            .single()
            .unwrap()
            .format("%Y-%m-%dT%H:%M:%S")
            .to_string()
    }

    #[test]
    fn test_title_from_class_heading() {
        let html = r#"<html><body><h1 class="rich_media_title"> Hello <em>World</em> </h1></body></html>"#;
        assert_eq!(extract_fields(html).title.as_deref(), Some("Hello World"));
    }

    #[test]
    fn test_title_falls_back_to_script_variable() {
        let html = r#"<html><script>var msg_title = "Script Title";</script></html>"#;
        assert_eq!(extract_fields(html).title.as_deref(), Some("Script Title"));
    }

    #[test]
    fn test_heading_outranks_script_variable() {
        let html = r#"<h2 class="rich_media_title">Heading Title</h2>
                      <script>var msg_title = "Script Title";</script>"#;
        assert_eq!(extract_fields(html).title.as_deref(), Some("Heading Title"));
    }

    #[test]
    fn test_author_from_meta_span_then_script() {
        let meta = r#"<span class="rich_media_meta rich_media_meta_text">张三</span>"#;
        assert_eq!(extract_fields(meta).author.as_deref(), Some("张三"));

        let script = r#"<script>var nickname = "某某公众号";</script>"#;
        assert_eq!(extract_fields(script).author.as_deref(), Some("某某公众号"));
    }

    #[test]
    fn test_publish_time_converted_to_local_iso() {
        let html = r#"<script>var publish_time = "1700000000" || "";</script>"#;
        assert_eq!(
            extract_fields(html).publish_time,
            Some(iso_local(1_700_000_000))
        );
    }

    #[test]
    fn test_publish_time_absent_is_never_defaulted() {
        let html = r#"<h1 class="rich_media_title">t</h1>"#;
        assert_eq!(extract_fields(html).publish_time, None);
    }

    #[test]
    fn test_digest_from_script_variable() {
        let html = r#"<script>var msg_desc = "A short summary.";</script>"#;
        assert_eq!(
            extract_fields(html).digest.as_deref(),
            Some("A short summary.")
        );
    }

    #[test]
    fn test_content_strips_tags_and_collapses_whitespace() {
        let html = r#"<div class="rich_media_content extra">
            <p>First   paragraph.</p>
            <p>Second <strong>bold</strong> paragraph.</p>
        </div>"#;
        let fields = extract_fields(html);
        assert_eq!(
            fields.content.as_deref(),
            Some("First paragraph. Second bold paragraph.")
        );
        assert_eq!(fields.content_length, Some(39));
    }

    #[test]
    fn test_content_found_by_js_content_id() {
        let html = r#"<div id="js_content">body text here</div>"#;
        assert_eq!(
            extract_fields(html).content.as_deref(),
            Some("body text here")
        );
    }

    #[test]
    fn test_content_truncated_but_length_is_pretruncation() {
        let body = "字".repeat(6000);
        let html = format!(r#"<div id="js_content">{body}</div>"#);
        let fields = extract_fields(&html);
        let content = fields.content.unwrap();
        assert_eq!(content.chars().count(), CONTENT_MAX_CHARS);
        assert_eq!(fields.content_length, Some(6000));
    }

    #[test]
    fn test_short_content_not_truncated() {
        let html = r#"<div id="js_content">short</div>"#;
        let fields = extract_fields(html);
        assert_eq!(fields.content.as_deref(), Some("short"));
        assert_eq!(fields.content_length, Some(5));
    }

    #[test]
    fn test_fields_extracted_independently_across_variants() {
        // Title only in the class variant, author only in the script variant.
        let html = r#"<h1 class="rich_media_title">Mixed</h1>
                      <script>var nickname = "Publisher";</script>"#;
        let fields = extract_fields(html);
        assert_eq!(fields.title.as_deref(), Some("Mixed"));
        assert_eq!(fields.author.as_deref(), Some("Publisher"));
    }

    #[test]
    fn test_malformed_fragment_does_not_abort_other_fields() {
        let html = r#"<h1 class="rich_media_title">Still There</h1>
                      <script>var publish_time = "not-a-number"</script>
                      <div class="rich_media_content"><p>unclosed"#;
        let fields = extract_fields(html);
        assert_eq!(fields.title.as_deref(), Some("Still There"));
        assert_eq!(fields.publish_time, None);
    }

    #[test]
    fn test_empty_document_yields_nothing() {
        let fields = extract_fields("");
        assert_eq!(fields, ArticleFields::default());
        assert!(!fields.is_recognized());
    }
}
