//! The mailbox collaborator seam.
//!
//! The mailbox protocol itself (IMAP connect / search / fetch, multipart
//! MIME assembly, charset decoding) is out of scope here; this module pins
//! down only the record shape a transport must deliver and the trait behind
//! which it lives. A transport implementation is opened per run and dropped
//! when the run ends — no long-lived global session.
//!
//! The shipped implementation, [`JsonInbox`], reads an already-decoded
//! message dump, which is what an external mailbox client produces and what
//! the tests feed in.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::path::{Path, PathBuf};
use tracing::info;

/// Environment variable overriding the inbox dump location.
pub const INBOX_ENV: &str = "WECHAT_INBOX";

/// Default inbox dump filename, relative to the working directory.
pub const DEFAULT_INBOX: &str = "inbox.json";

/// One raw mail message, body already decoded to text.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct MailMessage {
    pub subject: String,
    pub from: String,
    pub date: String,
    pub body: String,
}

/// A source of recent mail messages, ordered oldest first.
pub trait MailSource {
    fn messages(&mut self) -> Result<Vec<MailMessage>, Box<dyn Error>>;
}

/// File-backed mail source reading a JSON array of [`MailMessage`].
#[derive(Debug)]
pub struct JsonInbox {
    path: PathBuf,
}

impl JsonInbox {
    pub fn open(path: impl Into<PathBuf>) -> Self {
        JsonInbox { path: path.into() }
    }

    /// Open the inbox at `$WECHAT_INBOX`, falling back to `inbox.json`.
    pub fn from_env() -> Self {
        let path = std::env::var(INBOX_ENV).unwrap_or_else(|_| DEFAULT_INBOX.to_string());
        JsonInbox::open(path)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl MailSource for JsonInbox {
    /// A missing or malformed inbox is a configuration error: the stage has
    /// no input, so the caller should abort rather than cold-start.
    fn messages(&mut self) -> Result<Vec<MailMessage>, Box<dyn Error>> {
        let raw = std::fs::read_to_string(&self.path)
            .map_err(|e| format!("cannot read inbox {}: {e}", self.path.display()))?;
        let messages: Vec<MailMessage> = serde_json::from_str(&raw)
            .map_err(|e| format!("malformed inbox {}: {e}", self.path.display()))?;
        info!(path = %self.path.display(), count = messages.len(), "Loaded inbox");
        Ok(messages)
    }
}
