//! # WeChat Mail Digest
//!
//! An incremental pipeline that turns WeChat article links shared over email
//! into a structured archive and a readable Markdown digest.
//!
//! ## Stages
//!
//! Each stage is a standalone binary with no flags; configuration is via
//! environment variables and fixed filenames in the working directory:
//!
//! 1. **`fetch_links`** — scans decoded mail bodies (`inbox.json`, or
//!    `$WECHAT_INBOX`) for article links and merges them into
//!    `articles_links.json` (+ `articles_links.txt` mirror)
//! 2. **`scrape_articles`** — fetches every link without a successful prior
//!    record, extracts the article fields, updates `articles_content.json`,
//!    and renders `articles_summary.md`
//! 3. **`scrape_list`** — ad-hoc scrape of `test_links.txt` into timestamped
//!    output files
//!
//! ## Design
//!
//! - Runs are idempotent: successfully scraped URLs are never re-fetched;
//!   failed ones stay eligible for retry
//! - Extraction tolerates WeChat's inconsistent markup through per-field
//!   fallback chains; a field that cannot be recovered is simply omitted
//! - Fetching is sequential with a fixed pause between requests, since the
//!   article host rate-limits bursts
//! - Missing or corrupt prior state is a cold start, never a crash

pub mod extract;
pub mod fetch;
pub mod links;
pub mod mail;
pub mod models;
pub mod outputs;
pub mod pipeline;
pub mod store;
pub mod utils;
