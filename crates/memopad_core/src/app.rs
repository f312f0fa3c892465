//! crates/memopad_core/src/app.rs
//!
//! The composition root: switches between the memo list and the editor, owns
//! the memo collection, and refetches it after every mutation.

use tracing::{error, info};

use crate::domain::MemoId;
use crate::editor::{EditingSession, EditorSettings, SaveOutcome, SessionError, Tick};
use crate::list::MemoListView;
use crate::ports::{PortError, Ports};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewMode {
    List,
    Editor,
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("no memo is open in the editor")]
    NoEditor,
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error(transparent)]
    Port(#[from] PortError),
}

pub struct App {
    ports: Ports,
    settings: EditorSettings,
    list: MemoListView,
    editor: Option<EditingSession>,
}

impl App {
    pub fn new(ports: Ports, settings: EditorSettings) -> Self {
        let list = MemoListView::new(&ports);
        Self {
            ports,
            settings,
            list,
            editor: None,
        }
    }

    pub fn mode(&self) -> ViewMode {
        if self.editor.is_some() {
            ViewMode::Editor
        } else {
            ViewMode::List
        }
    }

    pub fn list(&self) -> &MemoListView {
        &self.list
    }

    pub fn editor(&self) -> Option<&EditingSession> {
        self.editor.as_ref()
    }

    pub fn editor_mut(&mut self) -> Option<&mut EditingSession> {
        self.editor.as_mut()
    }

    /// Initial fetch of the collection.
    pub async fn start(&mut self) -> bool {
        self.reload().await
    }

    /// Full refetch. Failures are reported and the previous collection kept.
    async fn reload(&mut self) -> bool {
        match self.list.reload().await {
            Ok(()) => true,
            Err(e) => {
                self.report_port_error("Failed to load memos", &e).await;
                false
            }
        }
    }

    async fn report_port_error(&self, context: &str, err: &PortError) {
        error!("{}: {}", context, err);
        self.ports.prompt.alert(&format!("{context}.\n{err}")).await;
    }

    async fn report_session_error(&self, err: &SessionError) {
        error!("{}", err);
        self.ports.prompt.alert(&err.user_message()).await;
    }

    //=====================================================================================
    // List mode
    //=====================================================================================

    pub async fn search(&mut self, keyword: &str) -> bool {
        match self.list.search(keyword).await {
            Ok(()) => true,
            Err(e) => {
                self.report_port_error("Failed to search memos", &e).await;
                false
            }
        }
    }

    /// Deletes after confirmation. Returns whether the memo was deleted.
    pub async fn delete(&mut self, id: MemoId) -> bool {
        match self.list.delete(id).await {
            Ok(deleted) => deleted,
            Err(e) => {
                self.report_port_error("Failed to delete memo", &e).await;
                false
            }
        }
    }

    pub fn new_memo(&mut self) {
        self.editor = Some(EditingSession::new_draft(self.ports.clone(), self.settings));
    }

    /// Opens a memo from the current collection, falling back to the backend
    /// for ids that are not listed (e.g. filtered out by a search).
    pub async fn open_memo(&mut self, id: MemoId) -> Result<(), AppError> {
        let memo = match self.list.find(id) {
            Some(memo) => memo.clone(),
            None => match self.ports.backend.get_memo(id).await {
                Ok(memo) => memo,
                Err(e) => {
                    self.report_port_error("Failed to open memo", &e).await;
                    return Err(e.into());
                }
            },
        };
        self.editor = Some(EditingSession::open(&memo, self.ports.clone(), self.settings));
        Ok(())
    }

    //=====================================================================================
    // Editor mode
    //=====================================================================================

    /// Resolves when the open editor's autosave timer fires; pending forever in
    /// list mode.
    pub async fn autosave_due(&mut self) -> Tick {
        match self.editor.as_mut() {
            Some(editor) => editor.autosave_due().await,
            None => std::future::pending().await,
        }
    }

    pub async fn autosave(&mut self, tick: Tick) -> Result<SaveOutcome, AppError> {
        let editor = self.editor.as_mut().ok_or(AppError::NoEditor)?;
        let result = editor.autosave(tick).await;
        self.after_save(result).await
    }

    /// Saves right away instead of waiting for the timer.
    pub async fn save(&mut self) -> Result<SaveOutcome, AppError> {
        let editor = self.editor.as_mut().ok_or(AppError::NoEditor)?;
        let result = editor.save().await;
        self.after_save(result).await
    }

    async fn after_save(
        &mut self,
        result: Result<SaveOutcome, SessionError>,
    ) -> Result<SaveOutcome, AppError> {
        match result {
            Ok(outcome) => {
                if outcome.persisted().is_some() {
                    self.reload().await;
                }
                Ok(outcome)
            }
            Err(e) => {
                self.report_session_error(&e).await;
                Err(e.into())
            }
        }
    }

    /// Flushes the draft and returns to the list. If the flush fails, or the
    /// draft is still not persisted afterwards, the editor stays open with the
    /// draft intact.
    pub async fn back(&mut self) -> Result<SaveOutcome, AppError> {
        let editor = self.editor.as_mut().ok_or(AppError::NoEditor)?;
        let result = match editor.exit().await {
            Ok(_) if editor.has_changes() && !editor.content().trim().is_empty() => {
                Err(SessionError::Unsaved)
            }
            other => other,
        };
        let outcome = match result {
            Ok(outcome) => outcome,
            Err(e) => {
                self.report_session_error(&e).await;
                return Err(e.into());
            }
        };
        if let Some(editor) = self.editor.take() {
            info!(session = %editor.id(), "editing session closed");
        }
        self.reload().await;
        Ok(outcome)
    }
}
