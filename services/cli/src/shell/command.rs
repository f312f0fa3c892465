//! services/cli/src/shell/command.rs
//!
//! Parses one line of terminal input into a command for the current view.

use memopad_core::domain::MemoId;
use std::path::PathBuf;

//=========================================================================================
// Commands Accepted in the Memo List
//=========================================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListCommand {
    /// Refetch and show the whole collection.
    List,
    /// Server-side keyword search. An empty keyword reloads everything.
    Search(String),
    New,
    Open(MemoId),
    Remove(MemoId),
    Help,
    Quit,
}

//=========================================================================================
// Commands Accepted in the Editor
//=========================================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorCommand {
    /// A plain line of text, appended to the draft.
    Append(String),
    /// Replace the whole draft.
    Set(String),
    /// Move the selection. A single offset places the caret.
    Select(usize, Option<usize>),
    /// Hand a file to the editor as if chosen in a file picker.
    Image(PathBuf),
    /// Drop one or more files onto the editor.
    Drop(Vec<PathBuf>),
    /// Paste a file as a clipboard item.
    Paste(PathBuf),
    /// Read an image from the system clipboard.
    Clip,
    Save,
    Show,
    Back,
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("Unknown command: {0}. Type `help` for a list.")]
    Unknown(String),
    #[error("`{0}` needs an argument")]
    MissingArgument(&'static str),
    #[error("'{0}' is not a memo id")]
    InvalidId(String),
    #[error("'{0}' is not a character offset")]
    InvalidOffset(String),
}

fn split_command(line: &str) -> (&str, &str) {
    let line = line.trim();
    match line.split_once(char::is_whitespace) {
        Some((head, rest)) => (head, rest.trim()),
        None => (line, ""),
    }
}

fn parse_id(command: &'static str, raw: &str) -> Result<MemoId, ParseError> {
    if raw.is_empty() {
        return Err(ParseError::MissingArgument(command));
    }
    raw.trim_start_matches('#')
        .parse::<u64>()
        .map(MemoId)
        .map_err(|_| ParseError::InvalidId(raw.to_string()))
}

fn parse_offset(raw: &str) -> Result<usize, ParseError> {
    raw.parse::<usize>()
        .map_err(|_| ParseError::InvalidOffset(raw.to_string()))
}

fn require_path(command: &'static str, raw: &str) -> Result<PathBuf, ParseError> {
    if raw.is_empty() {
        Err(ParseError::MissingArgument(command))
    } else {
        Ok(PathBuf::from(raw))
    }
}

impl ListCommand {
    pub fn parse(line: &str) -> Result<Self, ParseError> {
        let (head, rest) = split_command(line);
        match head {
            "" | "ls" | "list" => Ok(Self::List),
            "search" | "/" => Ok(Self::Search(rest.to_string())),
            "new" => Ok(Self::New),
            "open" => parse_id("open", rest).map(Self::Open),
            "rm" | "delete" => parse_id("rm", rest).map(Self::Remove),
            "help" | "?" => Ok(Self::Help),
            "quit" | "exit" | "q" => Ok(Self::Quit),
            other => Err(ParseError::Unknown(other.to_string())),
        }
    }
}

impl EditorCommand {
    /// Lines starting with `:` are commands; anything else is text. A leading
    /// `::` escapes a literal colon.
    pub fn parse(line: &str) -> Result<Self, ParseError> {
        if let Some(escaped) = line.strip_prefix("::") {
            return Ok(Self::Append(format!(":{escaped}")));
        }
        let Some(command) = line.strip_prefix(':') else {
            if line.trim() == "quit" {
                return Ok(Self::Quit);
            }
            return Ok(Self::Append(line.to_string()));
        };

        let (head, rest) = split_command(command);
        match head {
            "set" => Ok(Self::Set(rest.to_string())),
            "sel" => {
                let mut offsets = rest.split_whitespace();
                let start = offsets.next().ok_or(ParseError::MissingArgument("sel"))?;
                let end = offsets.next().map(parse_offset).transpose()?;
                Ok(Self::Select(parse_offset(start)?, end))
            }
            "image" => require_path("image", rest).map(Self::Image),
            "drop" => {
                let paths: Vec<PathBuf> = rest.split_whitespace().map(PathBuf::from).collect();
                if paths.is_empty() {
                    return Err(ParseError::MissingArgument("drop"));
                }
                Ok(Self::Drop(paths))
            }
            "paste" => require_path("paste", rest).map(Self::Paste),
            "clip" => Ok(Self::Clip),
            "save" | "w" => Ok(Self::Save),
            "show" | "p" => Ok(Self::Show),
            "back" => Ok(Self::Back),
            "help" => Ok(Self::Help),
            "quit" | "q" => Ok(Self::Quit),
            other => Err(ParseError::Unknown(format!(":{other}"))),
        }
    }
}
