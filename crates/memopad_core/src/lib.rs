pub mod app;
pub mod domain;
pub mod editor;
pub mod list;
pub mod ports;

pub use app::{App, AppError, ViewMode};
pub use domain::{Memo, MemoId, MemoPatch, MemoSource, NewMemo};
pub use editor::{
    EditingSession, EditorSettings, EditorStatus, ImageFile, IngestOutcome, PasteEvent,
    PasteOutcome, SaveOutcome, Selection, SessionError,
};
pub use ports::{
    ClipboardEntry, ClipboardError, ClipboardReader, MemoBackend, OcrService, PortError,
    PortResult, Ports, UserPrompt,
};
