//! crates/memopad_core/src/list.rs
//!
//! The memo list: the collection as last fetched from the backend, keyword
//! search, and confirmed deletion. Also the small formatting helpers used to
//! render a row.

use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::info;

use crate::domain::{Memo, MemoId};
use crate::ports::{MemoBackend, PortResult, Ports, UserPrompt};

const PREVIEW_CHARS: usize = 50;

pub struct MemoListView {
    backend: Arc<dyn MemoBackend>,
    prompt: Arc<dyn UserPrompt>,
    memos: Vec<Memo>,
    keyword: String,
}

impl MemoListView {
    pub fn new(ports: &Ports) -> Self {
        Self {
            backend: ports.backend.clone(),
            prompt: ports.prompt.clone(),
            memos: Vec::new(),
            keyword: String::new(),
        }
    }

    /// Memos in the order the backend returned them.
    pub fn memos(&self) -> &[Memo] {
        &self.memos
    }

    pub fn is_empty(&self) -> bool {
        self.memos.is_empty()
    }

    /// The keyword behind the current collection; empty when unfiltered.
    pub fn keyword(&self) -> &str {
        &self.keyword
    }

    pub fn find(&self, id: MemoId) -> Option<&Memo> {
        self.memos.iter().find(|memo| memo.id == id)
    }

    /// Fetches the full, unfiltered collection.
    pub async fn reload(&mut self) -> PortResult<()> {
        let memos = self.backend.list_memos().await?;
        info!(count = memos.len(), "memo list loaded");
        self.memos = memos;
        self.keyword.clear();
        Ok(())
    }

    /// Refetches the collection filtered by `keyword`. A blank keyword reloads
    /// everything.
    pub async fn search(&mut self, keyword: &str) -> PortResult<()> {
        let keyword = keyword.trim();
        if keyword.is_empty() {
            return self.reload().await;
        }
        let memos = self.backend.search_memos(keyword).await?;
        info!(keyword, count = memos.len(), "memo search finished");
        self.memos = memos;
        self.keyword = keyword.to_string();
        Ok(())
    }

    /// Asks for confirmation, deletes, then refetches. Returns `false` if the
    /// user declined.
    pub async fn delete(&mut self, id: MemoId) -> PortResult<bool> {
        if !self.prompt.confirm("Delete this memo?").await {
            return Ok(false);
        }
        self.backend.delete_memo(id).await?;
        info!(memo = %id, "memo deleted");
        self.reload().await?;
        Ok(true)
    }
}

/// First non-blank line, cut to 50 characters.
pub fn preview(content: &str) -> String {
    let Some(line) = content.lines().find(|line| !line.trim().is_empty()) else {
        return String::new();
    };
    if line.chars().count() > PREVIEW_CHARS {
        let cut: String = line.chars().take(PREVIEW_CHARS).collect();
        format!("{cut}...")
    } else {
        line.to_string()
    }
}

/// Human-friendly age of a timestamp relative to `now`.
pub fn relative_age(at: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let elapsed = (now - at).max(chrono::Duration::zero());
    let days = elapsed.num_days();
    match days {
        0 => match (elapsed.num_hours(), elapsed.num_minutes()) {
            (0, 0) => "just now".to_string(),
            (0, 1) => "1 minute ago".to_string(),
            (0, m) => format!("{m} minutes ago"),
            (1, _) => "1 hour ago".to_string(),
            (h, _) => format!("{h} hours ago"),
        },
        1 => "yesterday".to_string(),
        2..=6 => format!("{days} days ago"),
        _ => at.format("%b %-d").to_string(),
    }
}
