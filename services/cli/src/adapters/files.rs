//! services/cli/src/adapters/files.rs
//!
//! Reads files from disk for the file-picker and drop commands.

use memopad_core::editor::ImageFile;
use std::path::Path;

/// MIME type by extension, the way a file manager reports it. Unknown
/// extensions yield an empty type and are left to the name-based check.
pub fn guess_mime(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();
    match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "bmp" => "image/bmp",
        "svg" => "image/svg+xml",
        "txt" | "md" => "text/plain",
        "pdf" => "application/pdf",
        _ => "",
    }
}

pub async fn load_file(path: &Path) -> std::io::Result<ImageFile> {
    let data = tokio::fs::read(path).await?;
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    Ok(ImageFile::new(name, guess_mime(path), data))
}
