pub mod debounce;
pub mod error;
pub mod ingest;
pub mod selection;
pub mod session;

pub use debounce::{Debouncer, Tick};
pub use error::{ErrorClass, SessionError};
pub use ingest::{ClipboardItem, ImageFile, ItemKind, PasteEvent, PastePick};
pub use selection::Selection;
pub use session::{
    EditingSession, EditorSettings, EditorStatus, IngestOutcome, OcrJob, PasteOutcome,
    SaveJob, SaveOutcome, DEFAULT_AUTOSAVE_DELAY,
};
