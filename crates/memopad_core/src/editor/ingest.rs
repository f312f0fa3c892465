//! crates/memopad_core/src/editor/ingest.rs
//!
//! Image detection shared by every way an image can reach the editor: paste
//! events, drag-and-drop, the file picker and an explicit clipboard read. Each
//! trigger only *locates* an image here; conversion and OCR happen in one place,
//! `EditingSession::process_image_file`.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use bytes::Bytes;
use regex::Regex;
use std::sync::LazyLock;

use crate::ports::ClipboardEntry;

static IMAGE_EXTENSION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\.(png|jpg|jpeg|gif|webp|bmp)$").expect("image extension pattern is valid")
});

/// A file handed to the editor by one of the triggers.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageFile {
    pub name: String,
    /// MIME type as reported by the source. May be empty or wrong.
    pub mime: String,
    pub data: Bytes,
}

impl ImageFile {
    pub fn new(name: impl Into<String>, mime: impl Into<String>, data: impl Into<Bytes>) -> Self {
        Self {
            name: name.into(),
            mime: mime.into(),
            data: data.into(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// The payload the OCR service expects.
    pub fn to_base64(&self) -> String {
        STANDARD.encode(&self.data)
    }
}

pub fn is_image_mime(mime: &str) -> bool {
    mime.starts_with("image/")
}

pub fn has_image_extension(name: &str) -> bool {
    IMAGE_EXTENSION.is_match(name)
}

/// MIME prefix first, file name second for sources that leave the type blank.
pub fn looks_like_image(file: &ImageFile) -> bool {
    is_image_mime(&file.mime) || has_image_extension(&file.name)
}

//=========================================================================================
// Paste
//=========================================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemKind {
    File,
    String,
}

/// One entry of a paste event's item list.
#[derive(Debug, Clone, PartialEq)]
pub struct ClipboardItem {
    pub kind: ItemKind,
    pub mime: String,
    /// The file behind a `File` item, when the platform could produce one.
    pub file: Option<ImageFile>,
}

impl ClipboardItem {
    pub fn text(mime: impl Into<String>) -> Self {
        Self {
            kind: ItemKind::String,
            mime: mime.into(),
            file: None,
        }
    }

    pub fn file(file: ImageFile) -> Self {
        Self {
            kind: ItemKind::File,
            mime: file.mime.clone(),
            file: Some(file),
        }
    }
}

/// What a paste delivered: the rich item list plus the flat file list.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PasteEvent {
    pub items: Vec<ClipboardItem>,
    pub files: Vec<ImageFile>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PastePick {
    /// No image anywhere; the default text paste goes ahead.
    PlainText,
    /// An image was found; the default paste must be suppressed.
    Image(ImageFile),
    /// Something looked like an image but no file could be extracted. The
    /// default paste is still suppressed so raw image data never lands as text.
    Unreadable,
}

impl PastePick {
    pub fn suppresses_default(&self) -> bool {
        !matches!(self, PastePick::PlainText)
    }
}

pub fn pick_pasted(event: &PasteEvent) -> PastePick {
    let detected = event.items.iter().any(|item| is_image_mime(&item.mime))
        || event.files.iter().any(looks_like_image);
    if !detected {
        return PastePick::PlainText;
    }

    let from_items = event
        .items
        .iter()
        .filter(|item| item.kind == ItemKind::File && is_image_mime(&item.mime))
        .find_map(|item| item.file.clone());
    if let Some(file) = from_items {
        return PastePick::Image(file);
    }

    match event.files.iter().find(|file| looks_like_image(file)) {
        Some(file) => PastePick::Image(file.clone()),
        None => PastePick::Unreadable,
    }
}

//=========================================================================================
// Drop, file picker, clipboard read
//=========================================================================================

/// The first dropped file that looks like an image. The rest are ignored.
pub fn pick_dropped(files: &[ImageFile]) -> Option<&ImageFile> {
    files.iter().find(|file| looks_like_image(file))
}

/// The picker only trusts the declared MIME type.
pub fn accepts_picked(file: &ImageFile) -> bool {
    is_image_mime(&file.mime)
}

pub fn first_image_type(entry: &ClipboardEntry) -> Option<&str> {
    entry
        .types
        .iter()
        .map(String::as_str)
        .find(|mime| is_image_mime(mime))
}

/// Synthesises a file name for clipboard payloads, which have none.
pub fn clipboard_file_name(mime: &str) -> String {
    let ext = mime
        .strip_prefix("image/")
        .filter(|sub| !sub.is_empty())
        .unwrap_or("png");
    format!("clipboard.{ext}")
}
