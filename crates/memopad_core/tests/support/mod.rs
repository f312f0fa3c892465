//! In-memory stand-ins for every port, recording what the core asked of them.

#![allow(dead_code)]

use async_trait::async_trait;
use bytes::Bytes;
use chrono::{TimeZone, Utc};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use memopad_core::{
    ClipboardEntry, ClipboardError, ClipboardReader, Memo, MemoBackend, MemoId, MemoPatch,
    MemoSource, NewMemo, OcrService, PortError, PortResult, Ports, UserPrompt,
};

pub fn memo(id: u64, content: &str) -> Memo {
    let at = Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap();
    Memo {
        id: MemoId(id),
        content: content.to_string(),
        source: MemoSource::Manual,
        created_at: at,
        updated_at: at,
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    List,
    Get(MemoId),
    Create(NewMemo),
    Update(MemoId, MemoPatch),
    Delete(MemoId),
    Search(String),
}

impl Call {
    pub fn is_write(&self) -> bool {
        matches!(self, Call::Create(_) | Call::Update(..) | Call::Delete(_))
    }
}

//=========================================================================================
// Backend
//=========================================================================================

pub struct FakeBackend {
    memos: Mutex<Vec<Memo>>,
    calls: Mutex<Vec<Call>>,
    next_id: AtomicU64,
    fail_writes: AtomicBool,
}

impl FakeBackend {
    pub fn new(memos: Vec<Memo>) -> Self {
        let next_id = memos.iter().map(|m| m.id.0).max().unwrap_or(0) + 1;
        Self {
            memos: Mutex::new(memos),
            calls: Mutex::new(Vec::new()),
            next_id: AtomicU64::new(next_id),
            fail_writes: AtomicBool::new(false),
        }
    }

    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn writes(&self) -> Vec<Call> {
        self.calls().into_iter().filter(Call::is_write).collect()
    }

    pub fn stored(&self) -> Vec<Memo> {
        self.memos.lock().unwrap().clone()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    fn check_write(&self) -> PortResult<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            Err(PortError::Unexpected("backend unavailable".to_string()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl MemoBackend for FakeBackend {
    async fn list_memos(&self) -> PortResult<Vec<Memo>> {
        self.record(Call::List);
        Ok(self.stored())
    }

    async fn get_memo(&self, id: MemoId) -> PortResult<Memo> {
        self.record(Call::Get(id));
        self.stored()
            .into_iter()
            .find(|m| m.id == id)
            .ok_or_else(|| PortError::NotFound(format!("memo {id}")))
    }

    async fn create_memo(&self, new: NewMemo) -> PortResult<Memo> {
        self.record(Call::Create(new.clone()));
        self.check_write()?;
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let mut created = memo(id, &new.content);
        created.source = new.source;
        self.memos.lock().unwrap().push(created.clone());
        Ok(created)
    }

    async fn update_memo(&self, id: MemoId, patch: MemoPatch) -> PortResult<Memo> {
        self.record(Call::Update(id, patch.clone()));
        self.check_write()?;
        let mut memos = self.memos.lock().unwrap();
        let stored = memos
            .iter_mut()
            .find(|m| m.id == id)
            .ok_or_else(|| PortError::NotFound(format!("memo {id}")))?;
        stored.content = patch.content;
        Ok(stored.clone())
    }

    async fn delete_memo(&self, id: MemoId) -> PortResult<()> {
        self.record(Call::Delete(id));
        self.check_write()?;
        self.memos.lock().unwrap().retain(|m| m.id != id);
        Ok(())
    }

    async fn search_memos(&self, keyword: &str) -> PortResult<Vec<Memo>> {
        self.record(Call::Search(keyword.to_string()));
        Ok(self
            .stored()
            .into_iter()
            .filter(|m| m.content.contains(keyword))
            .collect())
    }
}

//=========================================================================================
// OCR
//=========================================================================================

pub struct FakeOcr {
    reply: Mutex<PortResult<String>>,
    payloads: Mutex<Vec<String>>,
}

impl FakeOcr {
    pub fn replying(text: &str) -> Self {
        Self {
            reply: Mutex::new(Ok(text.to_string())),
            payloads: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            reply: Mutex::new(Err(PortError::Unexpected(message.to_string()))),
            payloads: Mutex::new(Vec::new()),
        }
    }

    pub fn payloads(&self) -> Vec<String> {
        self.payloads.lock().unwrap().clone()
    }
}

#[async_trait]
impl OcrService for FakeOcr {
    async fn extract_text(&self, image_base64: &str) -> PortResult<String> {
        self.payloads.lock().unwrap().push(image_base64.to_string());
        self.reply.lock().unwrap().clone()
    }
}

//=========================================================================================
// Clipboard
//=========================================================================================

pub struct FakeClipboard {
    entries: Result<Vec<ClipboardEntry>, ClipboardError>,
    data: Bytes,
    loaded: Mutex<Vec<String>>,
}

impl FakeClipboard {
    pub fn empty() -> Self {
        Self::with_entries(Ok(Vec::new()))
    }

    pub fn with_entries(entries: Result<Vec<ClipboardEntry>, ClipboardError>) -> Self {
        Self {
            entries,
            data: Bytes::from_static(b"\x89PNG clipboard"),
            loaded: Mutex::new(Vec::new()),
        }
    }

    pub fn holding(types: &[&str]) -> Self {
        Self::with_entries(Ok(vec![ClipboardEntry {
            index: 0,
            types: types.iter().map(|t| t.to_string()).collect(),
        }]))
    }

    pub fn loaded(&self) -> Vec<String> {
        self.loaded.lock().unwrap().clone()
    }
}

#[async_trait]
impl ClipboardReader for FakeClipboard {
    async fn entries(&self) -> Result<Vec<ClipboardEntry>, ClipboardError> {
        self.entries.clone()
    }

    async fn load(&self, _entry: &ClipboardEntry, mime: &str) -> Result<Bytes, ClipboardError> {
        self.loaded.lock().unwrap().push(mime.to_string());
        Ok(self.data.clone())
    }
}

//=========================================================================================
// Prompt
//=========================================================================================

pub struct RecordingPrompt {
    alerts: Mutex<Vec<String>>,
    questions: Mutex<Vec<String>>,
    answer: AtomicBool,
}

impl RecordingPrompt {
    pub fn new(answer: bool) -> Self {
        Self {
            alerts: Mutex::new(Vec::new()),
            questions: Mutex::new(Vec::new()),
            answer: AtomicBool::new(answer),
        }
    }

    pub fn answer(&self, answer: bool) {
        self.answer.store(answer, Ordering::SeqCst);
    }

    pub fn alerts(&self) -> Vec<String> {
        self.alerts.lock().unwrap().clone()
    }

    pub fn questions(&self) -> Vec<String> {
        self.questions.lock().unwrap().clone()
    }
}

#[async_trait]
impl UserPrompt for RecordingPrompt {
    async fn alert(&self, message: &str) {
        self.alerts.lock().unwrap().push(message.to_string());
    }

    async fn confirm(&self, question: &str) -> bool {
        self.questions.lock().unwrap().push(question.to_string());
        self.answer.load(Ordering::SeqCst)
    }
}

//=========================================================================================
// Harness
//=========================================================================================

pub struct Harness {
    pub backend: Arc<FakeBackend>,
    pub ocr: Arc<FakeOcr>,
    pub clipboard: Arc<FakeClipboard>,
    pub prompt: Arc<RecordingPrompt>,
}

impl Harness {
    pub fn new() -> Self {
        Self::build(FakeBackend::new(Vec::new()), FakeOcr::replying("OCR TEXT"), FakeClipboard::empty())
    }

    pub fn build(backend: FakeBackend, ocr: FakeOcr, clipboard: FakeClipboard) -> Self {
        Self {
            backend: Arc::new(backend),
            ocr: Arc::new(ocr),
            clipboard: Arc::new(clipboard),
            prompt: Arc::new(RecordingPrompt::new(true)),
        }
    }

    pub fn with_memos(memos: Vec<Memo>) -> Self {
        Self::build(FakeBackend::new(memos), FakeOcr::replying("OCR TEXT"), FakeClipboard::empty())
    }

    pub fn with_ocr(ocr: FakeOcr) -> Self {
        Self::build(FakeBackend::new(Vec::new()), ocr, FakeClipboard::empty())
    }

    pub fn with_clipboard(clipboard: FakeClipboard) -> Self {
        Self::build(FakeBackend::new(Vec::new()), FakeOcr::replying("OCR TEXT"), clipboard)
    }

    pub fn ports(&self) -> Ports {
        Ports {
            backend: self.backend.clone(),
            ocr: self.ocr.clone(),
            clipboard: self.clipboard.clone(),
            prompt: self.prompt.clone(),
        }
    }
}
