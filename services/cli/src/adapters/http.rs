//! services/cli/src/adapters/http.rs
//!
//! This module contains the REST adapter, the concrete implementation of the
//! `MemoBackend` and `OcrService` ports from the `core` crate. It talks JSON to
//! the memo server using `reqwest`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use memopad_core::domain::{Memo, MemoId, MemoPatch, MemoSource, NewMemo};
use memopad_core::ports::{MemoBackend, OcrService, PortError, PortResult};
use reqwest::{Client, Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, instrument};

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// An HTTP adapter that implements the `MemoBackend` and `OcrService` ports.
#[derive(Clone)]
pub struct HttpBackend {
    client: Client,
    base: String,
}

impl HttpBackend {
    /// Creates a new `HttpBackend` rooted at `base` (e.g. `http://localhost:8080/api`).
    /// Every request is bounded by `timeout`.
    pub fn new(base: &Url, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base: base.as_str().trim_end_matches('/').to_string(),
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }
}

//=========================================================================================
// Wire Records
//=========================================================================================

#[derive(Debug, Deserialize)]
struct MemoRecord {
    id: u64,
    content: String,
    #[serde(default)]
    source: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}
impl MemoRecord {
    fn to_domain(self) -> Memo {
        Memo {
            id: MemoId(self.id),
            content: self.content,
            source: MemoSource::from_tag(&self.source),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[derive(Serialize)]
struct CreateMemoBody<'a> {
    content: &'a str,
    source: &'static str,
}

#[derive(Serialize)]
struct UpdateMemoBody<'a> {
    content: &'a str,
}

#[derive(Serialize)]
struct OcrRequest<'a> {
    image_data: &'a str,
}

#[derive(Deserialize)]
struct OcrResponse {
    text: String,
}

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

//=========================================================================================
// Response Handling
//=========================================================================================

fn transport_error(e: reqwest::Error) -> PortError {
    if e.is_timeout() {
        PortError::Unexpected("The request timed out".to_string())
    } else {
        PortError::Unexpected(format!("Could not reach the memo server: {}", e))
    }
}

/// Maps a non-success status to a `PortError`, preferring the server's own
/// `{"error": ...}` message when the body carries one.
fn status_error(status: StatusCode, body: &str) -> PortError {
    let message = serde_json::from_str::<ErrorBody>(body)
        .map(|b| b.error)
        .unwrap_or_else(|_| format!("Server responded with {}", status));
    match status {
        StatusCode::NOT_FOUND => PortError::NotFound(message),
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => PortError::PermissionDenied(message),
        _ => PortError::Unexpected(message),
    }
}

async fn ensure_success(response: Response) -> PortResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(status_error(status, &body))
}

async fn decode<T: DeserializeOwned>(response: Response) -> PortResult<T> {
    ensure_success(response)
        .await?
        .json::<T>()
        .await
        .map_err(|e| PortError::Unexpected(format!("Malformed response: {}", e)))
}

fn to_memos(records: Vec<MemoRecord>) -> Vec<Memo> {
    records.into_iter().map(MemoRecord::to_domain).collect()
}

//=========================================================================================
// `MemoBackend` Trait Implementation
//=========================================================================================

#[async_trait]
impl MemoBackend for HttpBackend {
    #[instrument(skip(self))]
    async fn list_memos(&self) -> PortResult<Vec<Memo>> {
        let response = self
            .client
            .get(self.endpoint("/memos"))
            .send()
            .await
            .map_err(transport_error)?;
        let records: Vec<MemoRecord> = decode(response).await?;
        debug!(count = records.len(), "memos fetched");
        Ok(to_memos(records))
    }

    #[instrument(skip(self))]
    async fn get_memo(&self, id: MemoId) -> PortResult<Memo> {
        let response = self
            .client
            .get(self.endpoint(&format!("/memos/{}", id)))
            .send()
            .await
            .map_err(transport_error)?;
        let record: MemoRecord = decode(response).await?;
        Ok(record.to_domain())
    }

    #[instrument(skip(self, memo), fields(chars = memo.content.chars().count(), source = memo.source.as_str()))]
    async fn create_memo(&self, memo: NewMemo) -> PortResult<Memo> {
        let body = CreateMemoBody {
            content: &memo.content,
            source: memo.source.as_str(),
        };
        let response = self
            .client
            .post(self.endpoint("/memos"))
            .json(&body)
            .send()
            .await
            .map_err(transport_error)?;
        let record: MemoRecord = decode(response).await?;
        Ok(record.to_domain())
    }

    #[instrument(skip(self, patch), fields(chars = patch.content.chars().count()))]
    async fn update_memo(&self, id: MemoId, patch: MemoPatch) -> PortResult<Memo> {
        let response = self
            .client
            .put(self.endpoint(&format!("/memos/{}", id)))
            .json(&UpdateMemoBody {
                content: &patch.content,
            })
            .send()
            .await
            .map_err(transport_error)?;
        let record: MemoRecord = decode(response).await?;
        Ok(record.to_domain())
    }

    #[instrument(skip(self))]
    async fn delete_memo(&self, id: MemoId) -> PortResult<()> {
        let response = self
            .client
            .delete(self.endpoint(&format!("/memos/{}", id)))
            .send()
            .await
            .map_err(transport_error)?;
        ensure_success(response).await?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn search_memos(&self, keyword: &str) -> PortResult<Vec<Memo>> {
        let response = self
            .client
            .get(self.endpoint("/memos/search"))
            .query(&[("q", keyword)])
            .send()
            .await
            .map_err(transport_error)?;
        let records: Vec<MemoRecord> = decode(response).await?;
        Ok(to_memos(records))
    }
}

//=========================================================================================
// `OcrService` Trait Implementation
//=========================================================================================

#[async_trait]
impl OcrService for HttpBackend {
    #[instrument(skip(self, image_base64), fields(payload_len = image_base64.len()))]
    async fn extract_text(&self, image_base64: &str) -> PortResult<String> {
        let response = self
            .client
            .post(self.endpoint("/ocr/process"))
            .json(&OcrRequest {
                image_data: image_base64,
            })
            .send()
            .await
            .map_err(transport_error)?;
        let reply: OcrResponse = decode(response).await?;
        Ok(reply.text)
    }
}
