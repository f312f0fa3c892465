//! services/cli/src/adapters/clipboard.rs
//!
//! Implements the `ClipboardReader` port by shelling out to the desktop's
//! clipboard tool: `wl-paste` on Wayland, `xclip` on X11.

use async_trait::async_trait;
use bytes::Bytes;
use memopad_core::ports::{ClipboardEntry, ClipboardError, ClipboardReader};
use std::io::ErrorKind;
use tokio::process::Command;
use tracing::debug;

use crate::config::ClipboardBackend;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tool {
    WlPaste,
    Xclip,
}

impl Tool {
    fn program(self) -> &'static str {
        match self {
            Tool::WlPaste => "wl-paste",
            Tool::Xclip => "xclip",
        }
    }

    fn list_args(self) -> Vec<String> {
        match self {
            Tool::WlPaste => vec!["--list-types".into()],
            Tool::Xclip => ["-selection", "clipboard", "-t", "TARGETS", "-o"]
                .map(String::from)
                .to_vec(),
        }
    }

    fn read_args(self, mime: &str) -> Vec<String> {
        match self {
            Tool::WlPaste => vec!["--no-newline".into(), "--type".into(), mime.to_string()],
            Tool::Xclip => vec![
                "-selection".into(),
                "clipboard".into(),
                "-t".into(),
                mime.to_string(),
                "-o".into(),
            ],
        }
    }
}

/// A clipboard adapter backed by an external command.
#[derive(Debug, Clone)]
pub struct CommandClipboard {
    tool: Tool,
}

impl CommandClipboard {
    /// Picks the tool for the configured backend. `Auto` follows `WAYLAND_DISPLAY`.
    pub fn new(backend: ClipboardBackend) -> Self {
        let tool = match backend {
            ClipboardBackend::Wayland => Tool::WlPaste,
            ClipboardBackend::X11 => Tool::Xclip,
            ClipboardBackend::Auto => {
                if std::env::var_os("WAYLAND_DISPLAY").is_some() {
                    Tool::WlPaste
                } else {
                    Tool::Xclip
                }
            }
        };
        Self { tool }
    }

    async fn run(&self, args: Vec<String>) -> Result<Vec<u8>, ClipboardError> {
        let program = self.tool.program();
        let output = Command::new(program)
            .args(&args)
            .output()
            .await
            .map_err(|e| match e.kind() {
                ErrorKind::PermissionDenied => ClipboardError::PermissionDenied,
                ErrorKind::NotFound => {
                    ClipboardError::Unavailable(format!("`{}` is not installed", program))
                }
                _ => ClipboardError::Unavailable(e.to_string()),
            })?;

        if output.status.success() {
            return Ok(output.stdout);
        }
        let stderr = String::from_utf8_lossy(&output.stderr);
        debug!(program, status = ?output.status, stderr = %stderr.trim(), "clipboard tool failed");
        Err(classify_failure(&stderr))
    }
}

fn classify_failure(stderr: &str) -> ClipboardError {
    let lower = stderr.to_lowercase();
    if lower.contains("permission") || lower.contains("not authorized") {
        ClipboardError::PermissionDenied
    } else {
        ClipboardError::Unavailable(stderr.trim().to_string())
    }
}

fn is_empty_clipboard(stderr: &str) -> bool {
    let lower = stderr.to_lowercase();
    lower.contains("nothing is copied") || lower.contains("no selection")
}

/// One MIME type or target per line; blank lines are dropped.
fn parse_types(listing: &str) -> Vec<String> {
    listing
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(String::from)
        .collect()
}

#[async_trait]
impl ClipboardReader for CommandClipboard {
    async fn entries(&self) -> Result<Vec<ClipboardEntry>, ClipboardError> {
        let listing = match self.run(self.tool.list_args()).await {
            Ok(stdout) => stdout,
            // Both tools exit non-zero on an empty clipboard.
            Err(ClipboardError::Unavailable(msg)) if is_empty_clipboard(&msg) => {
                return Ok(Vec::new())
            }
            Err(e) => return Err(e),
        };
        let types = parse_types(&String::from_utf8_lossy(&listing));
        if types.is_empty() {
            return Ok(Vec::new());
        }
        Ok(vec![ClipboardEntry { index: 0, types }])
    }

    async fn load(&self, _entry: &ClipboardEntry, mime: &str) -> Result<Bytes, ClipboardError> {
        let data = self.run(self.tool.read_args(mime)).await?;
        Ok(Bytes::from(data))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn listing_is_split_into_types() {
        assert_eq!(
            parse_types("TARGETS\nimage/png\n\ntext/plain\n"),
            vec!["TARGETS", "image/png", "text/plain"]
        );
    }

    #[test]
    fn permission_messages_are_recognised() {
        assert_eq!(
            classify_failure("Error: Not authorized to access the clipboard"),
            ClipboardError::PermissionDenied
        );
        assert_eq!(
            classify_failure("Error: target image/png not available\n"),
            ClipboardError::Unavailable("Error: target image/png not available".into())
        );
    }

    #[test]
    fn empty_clipboard_is_not_a_failure() {
        assert!(is_empty_clipboard("Nothing is copied"));
        assert!(!is_empty_clipboard("Error: Can't open display: (null)"));
    }

    #[test]
    fn explicit_backend_wins_over_environment() {
        assert_eq!(CommandClipboard::new(ClipboardBackend::X11).tool, Tool::Xclip);
        assert_eq!(CommandClipboard::new(ClipboardBackend::Wayland).tool, Tool::WlPaste);
    }
}
