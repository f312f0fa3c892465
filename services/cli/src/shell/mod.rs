pub mod command;
pub mod prompt;
pub mod runner;

pub use prompt::{stdin_lines, SharedLines, TerminalPrompt};
pub use runner::Shell;
