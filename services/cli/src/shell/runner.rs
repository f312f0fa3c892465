//! services/cli/src/shell/runner.rs
//!
//! The main control loop of the terminal client. It waits on two things at
//! once, the next input line and the open editor's autosave timer, and hands
//! whichever arrives first to the `App`.

use chrono::{DateTime, Utc};
use memopad_core::domain::{Memo, MemoSource};
use memopad_core::editor::Selection;
use memopad_core::editor::{
    ClipboardItem, EditorStatus, ImageFile, IngestOutcome, PasteEvent, Tick,
};
use memopad_core::list::{preview, relative_age};
use memopad_core::{App, PasteOutcome, SaveOutcome, ViewMode};
use std::io::Write;
use std::path::Path;
use tokio::io::AsyncRead;
use tracing::{info, warn};

use crate::adapters::files::load_file;
use crate::error::CliError;
use crate::shell::command::{EditorCommand, ListCommand};
use crate::shell::prompt::SharedLines;

const LIST_HELP: &str = "\
  ls                 show all memos
  search <keyword>   search memos (empty keyword shows all)
  new                write a new memo
  open <id>          edit a memo
  rm <id>            delete a memo
  quit               leave";

const EDITOR_HELP: &str = "\
  <text>             append a line to the memo
  :set <text>        replace the whole memo
  :sel <a> [b]       place the caret at a, or select a..b (characters)
  :image <path>      convert an image file to text at the caret
  :drop <paths...>   drop files; the first image is converted
  :paste <path>      paste a file as if copied to the clipboard
  :clip              convert the image on the system clipboard
  :save              save now
  :show              print the memo
  :back              save and return to the list
  quit               save and leave";

enum Event {
    Line(Option<String>),
    Autosave(Tick),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

pub struct Shell<R> {
    app: App,
    input: SharedLines<R>,
}

impl<R> Shell<R>
where
    R: AsyncRead + Unpin + Send + 'static,
{
    pub fn new(app: App, input: SharedLines<R>) -> Self {
        Self { app, input }
    }

    pub async fn run(&mut self) -> Result<(), CliError> {
        self.app.start().await;
        self.print_list();

        loop {
            self.print_prompt();
            let event = {
                let input = self.input.clone();
                tokio::select! {
                    line = async move { input.lock().await.next_line().await } => Event::Line(line?),
                    tick = self.app.autosave_due() => Event::Autosave(tick),
                }
            };

            match event {
                Event::Autosave(tick) => self.on_autosave(tick).await,
                Event::Line(Some(line)) => {
                    if self.on_line(&line).await == Flow::Quit {
                        break;
                    }
                }
                Event::Line(None) => {
                    info!("Input closed.");
                    if self.app.mode() == ViewMode::Editor && self.app.back().await.is_err() {
                        warn!("Leaving with unsaved changes.");
                    }
                    break;
                }
            }
        }
        Ok(())
    }

    fn print_list(&self) {
        let list = self.app.list();
        println!("{}", render_list(list.memos(), list.keyword(), Utc::now()));
    }

    fn print_prompt(&self) {
        match self.app.editor() {
            Some(editor) => print!("[{}] > ", status_label(editor.status())),
            None => print!("memopad> "),
        }
        let _ = std::io::stdout().flush();
    }

    async fn on_autosave(&mut self, tick: Tick) {
        if let Ok(outcome) = self.app.autosave(tick).await {
            if let Some(memo) = outcome.persisted() {
                println!();
                println!("(autosaved memo #{})", memo.id);
                self.print_prompt();
            }
        }
    }

    async fn on_line(&mut self, line: &str) -> Flow {
        match self.app.mode() {
            ViewMode::List => match ListCommand::parse(line) {
                Ok(command) => self.on_list_command(command).await,
                Err(e) => {
                    println!("{}", e);
                    Flow::Continue
                }
            },
            ViewMode::Editor => match EditorCommand::parse(line) {
                Ok(command) => self.on_editor_command(command).await,
                Err(e) => {
                    println!("{}", e);
                    Flow::Continue
                }
            },
        }
    }

    //=====================================================================================
    // List mode
    //=====================================================================================

    async fn on_list_command(&mut self, command: ListCommand) -> Flow {
        match command {
            ListCommand::List => {
                self.app.search("").await;
                self.print_list();
            }
            ListCommand::Search(keyword) => {
                if self.app.search(&keyword).await {
                    self.print_list();
                }
            }
            ListCommand::New => {
                self.app.new_memo();
                println!("New memo. Type text, or `:help` for commands.");
            }
            ListCommand::Open(id) => {
                if self.app.open_memo(id).await.is_ok() {
                    self.show_draft();
                }
            }
            ListCommand::Remove(id) => {
                if self.app.delete(id).await {
                    println!("Deleted memo #{}.", id);
                    self.print_list();
                }
            }
            ListCommand::Help => println!("{}", LIST_HELP),
            ListCommand::Quit => return Flow::Quit,
        }
        Flow::Continue
    }

    //=====================================================================================
    // Editor mode
    //=====================================================================================

    async fn on_editor_command(&mut self, command: EditorCommand) -> Flow {
        let Some(editor) = self.app.editor_mut() else {
            return Flow::Continue;
        };
        match command {
            EditorCommand::Append(text) => {
                let next = if editor.content().is_empty() {
                    text
                } else {
                    format!("{}\n{}", editor.content(), text)
                };
                if let Err(e) = editor.edit(next) {
                    println!("{}", e.user_message());
                }
            }
            EditorCommand::Set(text) => {
                if let Err(e) = editor.edit(text) {
                    println!("{}", e.user_message());
                }
            }
            EditorCommand::Select(start, end) => {
                editor.set_selection(Selection::new(start, end.unwrap_or(start)));
                let sel = editor.selection();
                println!("Selection {}..{}", sel.start, sel.end);
            }
            EditorCommand::Image(path) => {
                let file = read_file(&path).await;
                let outcome = editor.handle_picked_file(file).await;
                print_ingest(&outcome);
            }
            EditorCommand::Drop(paths) => {
                editor.drag_enter();
                let mut files = Vec::with_capacity(paths.len());
                for path in &paths {
                    if let Some(file) = read_file(path).await {
                        files.push(file);
                    }
                }
                let outcome = editor.handle_drop(&files).await;
                print_ingest(&outcome);
            }
            EditorCommand::Paste(path) => {
                let Some(file) = read_file(&path).await else {
                    return Flow::Continue;
                };
                let event = PasteEvent {
                    items: vec![ClipboardItem::file(file.clone())],
                    files: vec![file.clone()],
                };
                match editor.handle_paste(&event).await {
                    PasteOutcome::Suppressed(outcome) => print_ingest(&outcome),
                    PasteOutcome::AllowDefault => {
                        // Plain paste: the file's text goes in at the selection.
                        let text = String::from_utf8_lossy(&file.data);
                        if let Err(e) = editor.insert_text(&text) {
                            println!("{}", e.user_message());
                        }
                    }
                }
            }
            EditorCommand::Clip => {
                let outcome = editor.pull_clipboard().await;
                print_ingest(&outcome);
            }
            EditorCommand::Save => match self.app.save().await {
                Ok(SaveOutcome::Skipped) => println!("Nothing to save."),
                Ok(_) => println!("Saved."),
                Err(_) => {}
            },
            EditorCommand::Show => self.show_draft(),
            EditorCommand::Back => {
                if self.app.back().await.is_ok() {
                    self.print_list();
                }
            }
            EditorCommand::Help => println!("{}", EDITOR_HELP),
            EditorCommand::Quit => {
                if self.app.back().await.is_ok() {
                    return Flow::Quit;
                }
            }
        }
        Flow::Continue
    }

    fn show_draft(&self) {
        if let Some(editor) = self.app.editor() {
            let title = match editor.memo_id() {
                Some(id) => format!("memo #{}", id),
                None => "new memo".to_string(),
            };
            println!("--- {} [{}] ---", title, status_label(editor.status()));
            println!("{}", editor.content());
            println!("---");
        }
    }
}

async fn read_file(path: &Path) -> Option<ImageFile> {
    match load_file(path).await {
        Ok(file) => Some(file),
        Err(e) => {
            println!("Could not read {}: {}", path.display(), e);
            None
        }
    }
}

fn print_ingest(outcome: &IngestOutcome) {
    match outcome {
        IngestOutcome::Inserted { text, .. } => {
            println!("Inserted {} characters of recognised text.", text.chars().count())
        }
        IngestOutcome::NoImage => println!("No image found."),
        IngestOutcome::Rejected => println!("Only image files can be converted."),
        // Already reported through the prompt.
        IngestOutcome::Failed => {}
    }
}

pub fn status_label(status: EditorStatus) -> &'static str {
    match status {
        EditorStatus::Processing => "processing image...",
        EditorStatus::Saving => "saving...",
        EditorStatus::Unsaved => "unsaved",
        EditorStatus::Saved => "saved",
    }
}

/// One line per memo: id, preview, age, and an OCR marker.
pub fn render_list(memos: &[Memo], keyword: &str, now: DateTime<Utc>) -> String {
    if memos.is_empty() {
        return if keyword.is_empty() {
            "No memos yet. Type `new` to write one.".to_string()
        } else {
            format!("No memos match \"{}\".", keyword)
        };
    }

    let mut lines = Vec::with_capacity(memos.len() + 1);
    if !keyword.is_empty() {
        lines.push(format!("Results for \"{}\":", keyword));
    }
    for memo in memos {
        let marker = match memo.source {
            MemoSource::Ocr => " [ocr]",
            MemoSource::Manual => "",
        };
        lines.push(format!(
            "#{:<5} {:<53} {}{}",
            memo.id.to_string(),
            preview(&memo.content),
            relative_age(memo.updated_at, now),
            marker
        ));
    }
    lines.join("\n")
}
