//! crates/memopad_core/src/domain.rs
//!
//! Defines the pure, core data structures for the application.
//! These structs are independent of any transport or serialization format.

use chrono::{DateTime, Utc};
use std::fmt;

/// Backend-assigned memo identifier. Immutable once the memo exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MemoId(pub u64);

impl fmt::Display for MemoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Where the memo's text first came from. Set at creation, never changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MemoSource {
    #[default]
    Manual,
    Ocr,
}

impl MemoSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            MemoSource::Manual => "manual",
            MemoSource::Ocr => "ocr",
        }
    }

    /// Parses the wire tag. Unknown tags fall back to `Manual`, which is what
    /// the backend stores when no source is given.
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "ocr" => MemoSource::Ocr,
            _ => MemoSource::Manual,
        }
    }
}

/// A persisted note.
#[derive(Debug, Clone, PartialEq)]
pub struct Memo {
    pub id: MemoId,
    pub content: String,
    pub source: MemoSource,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Payload for creating a memo.
#[derive(Debug, Clone, PartialEq)]
pub struct NewMemo {
    pub content: String,
    pub source: MemoSource,
}

/// Payload for updating a memo. Only the content is editable.
#[derive(Debug, Clone, PartialEq)]
pub struct MemoPatch {
    pub content: String,
}
