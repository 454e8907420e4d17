//! Invalidation Message Module
//!
//! Wire format of inbound invalidation requests:
//! `{ "selectorKind": "plain" | "pattern", "selector": "<string>" }`.

use serde::{Deserialize, Serialize};

use crate::cache::Selector;
use crate::error::{CacheError, Result};

/// How the `selector` field of a message is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SelectorKind {
    /// Verbatim logical key
    Plain,
    /// Regular-expression source matched against logical keys
    Pattern,
}

// == Invalidation Message ==
/// A request to remove the entries matching a selector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvalidationMessage {
    pub selector_kind: SelectorKind,
    pub selector: String,
}

impl InvalidationMessage {
    /// Creates a message that removes a single logical key.
    pub fn plain(key: impl Into<String>) -> Self {
        Self {
            selector_kind: SelectorKind::Plain,
            selector: key.into(),
        }
    }

    /// Creates a message that removes every key matching `source`.
    pub fn pattern(source: impl Into<String>) -> Self {
        Self {
            selector_kind: SelectorKind::Pattern,
            selector: source.into(),
        }
    }

    // == Decode ==
    /// Parses a message from its JSON text form.
    pub fn decode(text: &str) -> Result<Self> {
        serde_json::from_str(text).map_err(|e| CacheError::MalformedMessage(e.to_string()))
    }

    // == Encode ==
    /// Serializes the message to its JSON text form.
    pub fn encode(&self) -> Result<String> {
        serde_json::to_string(self).map_err(|e| CacheError::Internal(e.to_string()))
    }

    // == To Selector ==
    /// Builds the local selector, compiling pattern sources.
    pub fn to_selector(&self) -> Result<Selector> {
        match self.selector_kind {
            SelectorKind::Plain => Ok(Selector::plain(self.selector.clone())),
            SelectorKind::Pattern => Selector::pattern(&self.selector),
        }
    }
}

/// Decodes raw message text straight into a selector.
///
/// Invalid pattern sources are reported as malformed messages.
pub fn decode_selector(text: &str) -> Result<Selector> {
    InvalidationMessage::decode(text)?
        .to_selector()
        .map_err(|e| CacheError::MalformedMessage(e.to_string()))
}
