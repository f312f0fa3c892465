//! services/cli/src/shell/prompt.rs
//!
//! The terminal implementation of the `UserPrompt` port. Alerts are printed;
//! confirmations read the next input line, shared with the main loop.

use async_trait::async_trait;
use memopad_core::ports::UserPrompt;
use std::io::Write;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader, Lines, Stdin};
use tokio::sync::Mutex;
use tracing::warn;

/// Input lines shared between the shell loop and confirmation prompts.
pub type SharedLines<R> = Arc<Mutex<Lines<BufReader<R>>>>;

pub fn stdin_lines() -> SharedLines<Stdin> {
    shared_lines(tokio::io::stdin())
}

pub fn shared_lines<R: AsyncRead + Unpin>(reader: R) -> SharedLines<R> {
    Arc::new(Mutex::new(BufReader::new(reader).lines()))
}

pub fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

pub struct TerminalPrompt<R> {
    input: SharedLines<R>,
}

impl<R> TerminalPrompt<R> {
    pub fn new(input: SharedLines<R>) -> Self {
        Self { input }
    }
}

#[async_trait]
impl<R> UserPrompt for TerminalPrompt<R>
where
    R: AsyncRead + Unpin + Send + 'static,
{
    async fn alert(&self, message: &str) {
        for line in message.lines() {
            println!("! {}", line);
        }
    }

    /// Anything but an explicit yes declines, including end of input.
    async fn confirm(&self, question: &str) -> bool {
        print!("{} [y/N] ", question);
        let _ = std::io::stdout().flush();
        match self.input.lock().await.next_line().await {
            Ok(Some(answer)) => is_yes(&answer),
            Ok(None) => false,
            Err(e) => {
                warn!("Failed to read confirmation: {}", e);
                false
            }
        }
    }
}
