//! crates/memopad_core/src/ports.rs
//!
//! Defines the service contracts (traits) for the application's core logic.
//! These traits form the boundary of the hexagonal architecture, allowing the core
//! to be independent of the REST backend, the OCR service, the platform clipboard
//! and whatever front-end shows alerts to the user.

use async_trait::async_trait;
use bytes::Bytes;
use std::sync::Arc;

use crate::domain::{Memo, MemoId, MemoPatch, NewMemo};

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for all port operations.
/// This abstracts away the specific errors from external services (e.g., HTTP, processes).
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PortError {
    #[error("Item not found: {0}")]
    NotFound(String),
    #[error("{0}")]
    Unexpected(String),
    #[error("Permission denied: {0}")]
    PermissionDenied(String),
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

/// The REST-shaped memo store. Every call may fail with a transport error.
#[async_trait]
pub trait MemoBackend: Send + Sync {
    async fn list_memos(&self) -> PortResult<Vec<Memo>>;

    async fn get_memo(&self, id: MemoId) -> PortResult<Memo>;

    async fn create_memo(&self, memo: NewMemo) -> PortResult<Memo>;

    async fn update_memo(&self, id: MemoId, patch: MemoPatch) -> PortResult<Memo>;

    async fn delete_memo(&self, id: MemoId) -> PortResult<()>;

    async fn search_memos(&self, keyword: &str) -> PortResult<Vec<Memo>>;
}

#[async_trait]
pub trait OcrService: Send + Sync {
    /// Extracts text from a base64-encoded image (standard alphabet, no data-URL prefix).
    async fn extract_text(&self, image_base64: &str) -> PortResult<String>;
}

/// One item on the platform clipboard and the MIME types it can be read as.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClipboardEntry {
    pub index: usize,
    pub types: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ClipboardError {
    #[error("clipboard access was denied")]
    PermissionDenied,
    #[error("clipboard is unavailable: {0}")]
    Unavailable(String),
}

/// Active read access to the system clipboard (not a paste event).
#[async_trait]
pub trait ClipboardReader: Send + Sync {
    async fn entries(&self) -> Result<Vec<ClipboardEntry>, ClipboardError>;

    async fn load(&self, entry: &ClipboardEntry, mime: &str) -> Result<Bytes, ClipboardError>;
}

/// Blocking notifications and confirmations shown to the user.
#[async_trait]
pub trait UserPrompt: Send + Sync {
    async fn alert(&self, message: &str);

    async fn confirm(&self, question: &str) -> bool;
}

//=========================================================================================
// Port Bundle
//=========================================================================================

/// The collaborators the core talks to, created once at startup.
#[derive(Clone)]
pub struct Ports {
    pub backend: Arc<dyn MemoBackend>,
    pub ocr: Arc<dyn OcrService>,
    pub clipboard: Arc<dyn ClipboardReader>,
    pub prompt: Arc<dyn UserPrompt>,
}
