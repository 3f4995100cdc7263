//! Output rendering for downstream consumers.
//!
//! The JSON stores are written by [`crate::store`]; this module covers the
//! human-readable side:
//!
//! - [`markdown`]: renders the article store as a Markdown digest

pub mod markdown;
