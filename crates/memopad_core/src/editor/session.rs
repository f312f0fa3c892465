//! crates/memopad_core/src/editor/session.rs
//!
//! The editing session: owns the draft of one memo, tracks whether it differs
//! from what was last persisted, autosaves after input goes quiet, and turns
//! images into text through the OCR port.
//!
//! Saves and OCR round trips are split into `begin_*` / `finish_*` transitions
//! around the network call. `save` and `process_image_file` drive both halves
//! in sequence; front-ends that keep accepting keystrokes while a call is in
//! flight can drive them separately.

use std::time::Duration;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::domain::{Memo, MemoId, MemoPatch, MemoSource, NewMemo};
use crate::editor::debounce::{Debouncer, Tick};
use crate::editor::error::{ErrorClass, SessionError};
use crate::editor::ingest::{self, ImageFile, PasteEvent, PastePick};
use crate::editor::selection::{self, Selection};
use crate::ports::{MemoBackend, PortResult, Ports};

/// Quiet period after the last edit before the draft is saved.
pub const DEFAULT_AUTOSAVE_DELAY: Duration = Duration::from_secs(2);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EditorSettings {
    pub autosave: bool,
    pub autosave_delay: Duration,
}

impl Default for EditorSettings {
    fn default() -> Self {
        Self {
            autosave: true,
            autosave_delay: DEFAULT_AUTOSAVE_DELAY,
        }
    }
}

/// What the status indicator shows, highest priority first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorStatus {
    Processing,
    Saving,
    Unsaved,
    Saved,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SaveOutcome {
    /// Nothing to persist: the draft is clean, blank, or another save is in flight.
    Skipped,
    Created(Memo),
    Updated(Memo),
}

impl SaveOutcome {
    pub fn persisted(&self) -> Option<&Memo> {
        match self {
            SaveOutcome::Skipped => None,
            SaveOutcome::Created(memo) | SaveOutcome::Updated(memo) => Some(memo),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
enum SaveTarget {
    Create(MemoSource),
    Update(MemoId),
}

/// A save that has been started but whose backend call has not completed.
#[derive(Debug, Clone, PartialEq)]
pub struct SaveJob {
    snapshot: String,
    target: SaveTarget,
}

impl SaveJob {
    /// The draft as it was when the save started.
    pub fn snapshot(&self) -> &str {
        &self.snapshot
    }

    /// What is sent to the backend.
    pub fn payload(&self) -> &str {
        self.snapshot.trim()
    }

    pub async fn send(&self, backend: &dyn MemoBackend) -> PortResult<Memo> {
        let content = self.payload().to_string();
        match self.target {
            SaveTarget::Create(source) => backend.create_memo(NewMemo { content, source }).await,
            SaveTarget::Update(id) => backend.update_memo(id, MemoPatch { content }).await,
        }
    }
}

/// An image conversion that has been started.
#[derive(Debug, Clone, PartialEq)]
pub struct OcrJob {
    file_name: String,
    payload: String,
}

impl OcrJob {
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn payload(&self) -> &str {
        &self.payload
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum IngestOutcome {
    /// OCR text was spliced in; `caret` sits right after it.
    Inserted { text: String, caret: Selection },
    /// No usable image was found. Not an error.
    NoImage,
    /// The input was declined without telling the user.
    Rejected,
    /// The failure was reported to the user; the draft is unchanged.
    Failed,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PasteOutcome {
    /// No image in the paste; the default text paste should go ahead.
    AllowDefault,
    /// The default paste must not happen.
    Suppressed(IngestOutcome),
}

pub struct EditingSession {
    id: Uuid,
    memo_id: Option<MemoId>,
    source: MemoSource,
    content: String,
    saved_content: String,
    has_changes: bool,
    is_processing: bool,
    is_saving: bool,
    is_dragging: bool,
    selection: Selection,
    settings: EditorSettings,
    autosave: Debouncer,
    ports: Ports,
}

impl EditingSession {
    /// Opens an empty draft for a memo that does not exist yet.
    pub fn new_draft(ports: Ports, settings: EditorSettings) -> Self {
        Self::with_content(None, String::new(), ports, settings)
    }

    /// Opens an existing memo for editing.
    pub fn open(memo: &Memo, ports: Ports, settings: EditorSettings) -> Self {
        Self::with_content(Some(memo.id), memo.content.clone(), ports, settings)
    }

    fn with_content(
        memo_id: Option<MemoId>,
        content: String,
        ports: Ports,
        settings: EditorSettings,
    ) -> Self {
        let id = Uuid::new_v4();
        let caret = Selection::caret(content.chars().count());
        info!(session = %id, memo = ?memo_id, "editing session opened");
        Self {
            id,
            memo_id,
            source: MemoSource::Manual,
            saved_content: content.clone(),
            content,
            has_changes: false,
            is_processing: false,
            is_saving: false,
            is_dragging: false,
            selection: caret,
            settings,
            autosave: Debouncer::new(settings.autosave_delay),
            ports,
        }
    }

    //=====================================================================================
    // Accessors
    //=====================================================================================

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn memo_id(&self) -> Option<MemoId> {
        self.memo_id
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn saved_content(&self) -> &str {
        &self.saved_content
    }

    pub fn has_changes(&self) -> bool {
        self.has_changes
    }

    pub fn is_processing(&self) -> bool {
        self.is_processing
    }

    pub fn is_saving(&self) -> bool {
        self.is_saving
    }

    pub fn is_dragging(&self) -> bool {
        self.is_dragging
    }

    pub fn selection(&self) -> Selection {
        self.selection
    }

    pub fn autosave_pending(&self) -> bool {
        self.autosave.is_armed()
    }

    pub fn status(&self) -> EditorStatus {
        if self.is_processing {
            EditorStatus::Processing
        } else if self.is_saving {
            EditorStatus::Saving
        } else if self.has_changes {
            EditorStatus::Unsaved
        } else {
            EditorStatus::Saved
        }
    }

    //=====================================================================================
    // Editing and autosave
    //=====================================================================================

    fn refresh_dirty(&mut self) {
        self.has_changes = self.content != self.saved_content;
    }

    fn reschedule(&mut self) {
        self.autosave.cancel();
        if self.has_changes && self.settings.autosave {
            self.autosave.arm();
        }
    }

    /// Replaces the whole draft and puts the caret at its end. Every edit
    /// restarts the autosave timer; outside a tokio runtime the draft still
    /// changes but no timer is armed.
    pub fn edit(&mut self, text: impl Into<String>) -> Result<(), SessionError> {
        if self.is_processing {
            return Err(SessionError::Busy);
        }
        self.content = text.into();
        self.selection = Selection::caret(self.content.chars().count());
        self.refresh_dirty();
        self.reschedule();
        Ok(())
    }

    /// Inserts plain text over the selection, as a default paste does, and
    /// leaves the caret right after it.
    pub fn insert_text(&mut self, text: &str) -> Result<Selection, SessionError> {
        if self.is_processing {
            return Err(SessionError::Busy);
        }
        let (content, caret) = selection::splice(&self.content, self.selection, text);
        self.content = content;
        self.selection = caret;
        self.refresh_dirty();
        self.reschedule();
        Ok(caret)
    }

    pub fn set_selection(&mut self, selection: Selection) {
        self.selection = selection.clamp(self.content.chars().count());
    }

    /// Resolves when the autosave timer fires. Pending forever while disarmed.
    pub async fn autosave_due(&mut self) -> Tick {
        self.autosave.fired().await
    }

    /// Runs the save a fired timer asked for. A tick that was superseded by a
    /// later edit is ignored.
    pub async fn autosave(&mut self, tick: Tick) -> Result<SaveOutcome, SessionError> {
        if !self.autosave.take(tick) {
            return Ok(SaveOutcome::Skipped);
        }
        if self.is_processing {
            debug!(session = %self.id, "autosave deferred until OCR finishes");
            self.autosave.arm();
            return Ok(SaveOutcome::Skipped);
        }
        self.save().await
    }

    /// Starts a save, or returns `None` when there is nothing to persist.
    pub fn begin_save(&mut self) -> Result<Option<SaveJob>, SessionError> {
        if self.is_processing {
            return Err(SessionError::Busy);
        }
        if self.is_saving || !self.has_changes || self.content.trim().is_empty() {
            return Ok(None);
        }

        let target = match self.memo_id {
            Some(id) => SaveTarget::Update(id),
            None => SaveTarget::Create(self.source),
        };
        self.is_saving = true;
        Ok(Some(SaveJob {
            snapshot: self.content.clone(),
            target,
        }))
    }

    /// Completes a save. Dirtiness is recomputed against the current draft,
    /// which may have moved on while the call was in flight.
    pub fn finish_save(
        &mut self,
        job: SaveJob,
        result: PortResult<Memo>,
    ) -> Result<SaveOutcome, SessionError> {
        self.is_saving = false;
        match result {
            Ok(memo) => {
                let outcome = match job.target {
                    SaveTarget::Create(_) => {
                        self.memo_id = Some(memo.id);
                        SaveOutcome::Created(memo)
                    }
                    SaveTarget::Update(_) => SaveOutcome::Updated(memo),
                };
                self.saved_content = job.snapshot;
                self.refresh_dirty();
                if self.has_changes && !self.autosave.is_armed() {
                    self.reschedule();
                }
                info!(session = %self.id, memo = ?self.memo_id, dirty = self.has_changes, "memo saved");
                Ok(outcome)
            }
            Err(e) => {
                self.refresh_dirty();
                error!(session = %self.id, "Failed to save memo: {}", e);
                Err(SessionError::Save(e))
            }
        }
    }

    /// Persists the draft if it is dirty and not blank.
    pub async fn save(&mut self) -> Result<SaveOutcome, SessionError> {
        let Some(job) = self.begin_save()? else {
            return Ok(SaveOutcome::Skipped);
        };
        let backend = self.ports.backend.clone();
        let result = job.send(backend.as_ref()).await;
        self.finish_save(job, result)
    }

    /// Leaves the editor. The pending timer is dropped in favour of an
    /// immediate save; on any error the caller should stay in the editor and
    /// the timer is armed again.
    ///
    /// Fails with [`SessionError::Unsaved`] when a save started through
    /// [`EditingSession::begin_save`] is still in flight and the draft has
    /// changed since, as that save cannot cover the newer text.
    pub async fn exit(&mut self) -> Result<SaveOutcome, SessionError> {
        self.autosave.cancel();
        if self.is_processing {
            self.reschedule();
            return Err(SessionError::Busy);
        }
        if !self.has_changes || self.content.trim().is_empty() {
            return Ok(SaveOutcome::Skipped);
        }
        if self.is_saving {
            warn!(session = %self.id, "cannot leave while a save is in flight");
            self.reschedule();
            return Err(SessionError::Unsaved);
        }

        info!(session = %self.id, "flushing unsaved changes before leaving");
        let result = self.save().await;
        if result.is_err() {
            self.reschedule();
        }
        result
    }

    //=====================================================================================
    // Image ingestion
    //=====================================================================================

    pub fn begin_ocr(&mut self, file: &ImageFile) -> Result<OcrJob, SessionError> {
        if self.is_processing {
            return Err(SessionError::Busy);
        }
        if file.is_empty() {
            return Err(SessionError::EmptyImage(file.name.clone()));
        }
        self.is_processing = true;
        Ok(OcrJob {
            file_name: file.name.clone(),
            payload: file.to_base64(),
        })
    }

    /// Splices OCR text over the current selection. On failure the draft is
    /// left exactly as it was.
    pub fn finish_ocr(
        &mut self,
        job: OcrJob,
        result: PortResult<String>,
    ) -> Result<IngestOutcome, SessionError> {
        self.is_processing = false;
        let text = result.map_err(SessionError::Ocr)?;

        let (content, caret) = selection::splice(&self.content, self.selection, &text);
        self.content = content;
        self.selection = caret;
        if self.memo_id.is_none() && !text.is_empty() {
            self.source = MemoSource::Ocr;
        }
        self.refresh_dirty();
        self.reschedule();
        info!(
            session = %self.id,
            file = job.file_name(),
            chars = text.chars().count(),
            "OCR text inserted"
        );
        Ok(IngestOutcome::Inserted { text, caret })
    }

    /// Converts one image to text and inserts it at the cursor. Every trigger
    /// funnels into this.
    pub async fn process_image_file(
        &mut self,
        file: ImageFile,
    ) -> Result<IngestOutcome, SessionError> {
        let job = self.begin_ocr(&file)?;
        info!(
            session = %self.id,
            file = %file.name,
            mime = %file.mime,
            bytes = file.data.len(),
            "Starting OCR processing..."
        );
        let ocr = self.ports.ocr.clone();
        let result = ocr.extract_text(job.payload()).await;
        self.finish_ocr(job, result)
    }

    /// Runs one ingestion and reports failures to the user, so no trigger can
    /// take the session down.
    async fn ingest(&mut self, file: ImageFile) -> IngestOutcome {
        match self.process_image_file(file).await {
            Ok(outcome) => outcome,
            Err(e) => self.report(e).await,
        }
    }

    async fn report(&self, err: SessionError) -> IngestOutcome {
        match err.class() {
            ErrorClass::Validation => {
                debug!(session = %self.id, "image declined: {}", err);
                IngestOutcome::Rejected
            }
            ErrorClass::Transport | ErrorClass::Permission => {
                error!(session = %self.id, "image ingestion failed: {}", err);
                self.ports.prompt.alert(&err.user_message()).await;
                IngestOutcome::Failed
            }
        }
    }

    pub async fn handle_paste(&mut self, event: &PasteEvent) -> PasteOutcome {
        match ingest::pick_pasted(event) {
            PastePick::PlainText => {
                debug!(session = %self.id, "no image in paste, allowing default");
                PasteOutcome::AllowDefault
            }
            PastePick::Image(file) => PasteOutcome::Suppressed(self.ingest(file).await),
            PastePick::Unreadable => {
                error!(session = %self.id, "Image was detected but could not be extracted");
                PasteOutcome::Suppressed(IngestOutcome::NoImage)
            }
        }
    }

    pub fn drag_enter(&mut self) {
        self.is_dragging = true;
    }

    pub fn drag_leave(&mut self) {
        self.is_dragging = false;
    }

    pub async fn handle_drop(&mut self, files: &[ImageFile]) -> IngestOutcome {
        self.is_dragging = false;
        match ingest::pick_dropped(files) {
            Some(file) => self.ingest(file.clone()).await,
            None => {
                info!(session = %self.id, dropped = files.len(), "No image files found in dropped files");
                IngestOutcome::NoImage
            }
        }
    }

    /// Handles the file picker. `None` means the user closed it without a choice.
    pub async fn handle_picked_file(&mut self, file: Option<ImageFile>) -> IngestOutcome {
        let Some(file) = file else {
            return IngestOutcome::NoImage;
        };
        if !ingest::accepts_picked(&file) {
            warn!(session = %self.id, mime = %file.mime, "picked file is not an image");
            return self.report(SessionError::NotAnImage(file.name)).await;
        }
        self.ingest(file).await
    }

    /// Actively reads the system clipboard and converts the first image on it.
    pub async fn pull_clipboard(&mut self) -> IngestOutcome {
        if self.is_processing {
            return IngestOutcome::Rejected;
        }
        let clipboard = self.ports.clipboard.clone();

        let entries = match clipboard.entries().await {
            Ok(entries) => entries,
            Err(e) => return self.report(e.into()).await,
        };
        let found = entries
            .iter()
            .find_map(|entry| ingest::first_image_type(entry).map(|mime| (entry, mime.to_string())));
        let Some((entry, mime)) = found else {
            info!(session = %self.id, "no image on the clipboard");
            return IngestOutcome::NoImage;
        };

        match clipboard.load(entry, &mime).await {
            Ok(data) => {
                let file = ImageFile::new(ingest::clipboard_file_name(&mime), mime, data);
                self.ingest(file).await
            }
            Err(e) => self.report(e.into()).await,
        }
    }
}

impl Drop for EditingSession {
    fn drop(&mut self) {
        if self.has_changes {
            warn!(session = %self.id, "editing session dropped with unsaved changes");
        }
    }
}
