//! Errors raised by the editing session, grouped by how the user should see them.

use crate::ports::{ClipboardError, PortError};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SessionError {
    /// An image conversion is outstanding; edits and saves wait for it.
    #[error("the editor is busy converting an image")]
    Busy,

    #[error("not an image file: {0}")]
    NotAnImage(String),

    #[error("image file is empty: {0}")]
    EmptyImage(String),

    #[error("failed to save memo: {0}")]
    Save(PortError),

    /// A save is still in flight and the draft has moved on since it started.
    #[error("a save is still in progress and the latest changes are not saved yet")]
    Unsaved,

    #[error("OCR failed: {0}")]
    Ocr(PortError),

    #[error("clipboard access was denied")]
    ClipboardPermission,

    #[error("failed to read the clipboard: {0}")]
    ClipboardRead(String),
}

/// How an error is surfaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// The action is declined without interrupting the user.
    Validation,
    /// Backend or OCR failure, reported and left for the user to retry.
    Transport,
    /// Reported together with remediation guidance.
    Permission,
}

impl SessionError {
    pub fn class(&self) -> ErrorClass {
        match self {
            SessionError::Busy | SessionError::NotAnImage(_) | SessionError::EmptyImage(_) => {
                ErrorClass::Validation
            }
            SessionError::Save(_)
            | SessionError::Unsaved
            | SessionError::Ocr(_)
            | SessionError::ClipboardRead(_) => ErrorClass::Transport,
            SessionError::ClipboardPermission => ErrorClass::Permission,
        }
    }

    /// The text shown in the blocking notification.
    pub fn user_message(&self) -> String {
        match self {
            SessionError::Ocr(e) => format!("OCR processing failed.\n{e}"),
            SessionError::Save(e) => {
                format!("Could not save the memo. Your text is kept; try again.\n{e}")
            }
            SessionError::Unsaved => {
                "A save is still in progress. Wait for it to finish before leaving.".to_string()
            }
            SessionError::ClipboardPermission => "Clipboard access was denied. \
                 Allow clipboard access, or use the image button to pick a file instead."
                .to_string(),
            SessionError::ClipboardRead(msg) => format!("Could not read the clipboard.\n{msg}"),
            other => other.to_string(),
        }
    }
}

impl From<ClipboardError> for SessionError {
    fn from(err: ClipboardError) -> Self {
        match err {
            ClipboardError::PermissionDenied => SessionError::ClipboardPermission,
            ClipboardError::Unavailable(msg) => SessionError::ClipboardRead(msg),
        }
    }
}
