mod support;

use rstest::rstest;

use memopad_core::editor::{ClipboardItem, ImageFile, ItemKind};
use memopad_core::{
    ClipboardError, EditingSession, EditorSettings, IngestOutcome, MemoSource, NewMemo,
    PasteEvent, PasteOutcome, Selection, SessionError,
};
use support::{memo, Call, FakeClipboard, FakeOcr, Harness};

fn png(name: &str) -> ImageFile {
    ImageFile::new(name, "image/png", b"\x89PNG fake".to_vec())
}

fn image_paste() -> PasteEvent {
    PasteEvent {
        items: vec![ClipboardItem::file(png("image.png"))],
        files: vec![],
    }
}

fn editor_with(h: &Harness, content: &str) -> EditingSession {
    EditingSession::open(&memo(1, content), h.ports(), EditorSettings::default())
}

#[tokio::test]
async fn pasted_image_is_converted_instead_of_pasted() {
    let h = Harness::new();
    let mut session = editor_with(&h, "");

    let outcome = session.handle_paste(&image_paste()).await;

    assert!(matches!(outcome, PasteOutcome::Suppressed(IngestOutcome::Inserted { .. })));
    assert_eq!(h.ocr.payloads().len(), 1);
    assert_eq!(session.content(), "OCR TEXT");
    assert!(!session.is_processing());
}

#[tokio::test]
async fn text_paste_goes_through_untouched() {
    let h = Harness::new();
    let mut session = editor_with(&h, "draft");
    let event = PasteEvent {
        items: vec![ClipboardItem::text("text/plain")],
        files: vec![],
    };

    assert_eq!(session.handle_paste(&event).await, PasteOutcome::AllowDefault);
    assert!(h.ocr.payloads().is_empty());
    assert_eq!(session.content(), "draft");
}

#[tokio::test]
async fn plain_text_paste_leaves_caret_after_insert() {
    let h = Harness::new();
    let mut session = editor_with(&h, "Hello World");
    session.set_selection(Selection::caret(6));

    let caret = session.insert_text("big ").unwrap();

    assert_eq!(session.content(), "Hello big World");
    assert_eq!(caret, Selection::caret(10));
    assert_eq!(session.selection(), Selection::caret(10));
    assert!(session.has_changes());
}

#[tokio::test]
async fn unreadable_image_still_suppresses_default() {
    let h = Harness::new();
    let mut session = editor_with(&h, "draft");
    let event = PasteEvent {
        items: vec![ClipboardItem {
            kind: ItemKind::File,
            mime: "image/png".into(),
            file: None,
        }],
        files: vec![],
    };

    let outcome = session.handle_paste(&event).await;
    assert_eq!(outcome, PasteOutcome::Suppressed(IngestOutcome::NoImage));
    assert!(h.ocr.payloads().is_empty());
}

#[tokio::test]
async fn ocr_failure_alerts_and_leaves_draft_alone() {
    let h = Harness::with_ocr(FakeOcr::failing("network down"));
    let mut session = editor_with(&h, "before");
    session.set_selection(Selection::caret(3));

    let outcome = session.handle_paste(&image_paste()).await;

    assert_eq!(outcome, PasteOutcome::Suppressed(IngestOutcome::Failed));
    let alerts = h.prompt.alerts();
    assert_eq!(alerts.len(), 1);
    assert!(alerts[0].contains("network down"));
    assert!(!session.is_processing());
    assert_eq!(session.content(), "before");
    assert!(!session.has_changes());
}

#[tokio::test]
async fn drop_processes_only_the_first_image() {
    let h = Harness::new();
    let mut session = editor_with(&h, "");
    let notes = ImageFile::new("notes.txt", "text/plain", b"plain".to_vec());
    let shot = ImageFile::new("shot.png", "", b"\x89PNG shot".to_vec());
    let later = png("later.png");

    session.drag_enter();
    assert!(session.is_dragging());
    let outcome = session.handle_drop(&[notes, shot.clone(), later]).await;

    assert!(matches!(outcome, IngestOutcome::Inserted { .. }));
    assert!(!session.is_dragging());
    assert_eq!(h.ocr.payloads(), vec![shot.to_base64()]);
}

#[tokio::test]
async fn drop_without_images_does_nothing() {
    let h = Harness::new();
    let mut session = editor_with(&h, "keep");
    let files = [ImageFile::new("a.txt", "text/plain", b"a".to_vec())];

    assert_eq!(session.handle_drop(&files).await, IngestOutcome::NoImage);
    assert!(h.ocr.payloads().is_empty());
    assert_eq!(session.content(), "keep");
}

#[rstest]
#[case::caret_in_middle(Selection::caret(6), "Hello OCR TEXTWorld", 14)]
#[case::replaces_selection(Selection::new(6, 11), "Hello OCR TEXT", 14)]
#[case::at_start(Selection::caret(0), "OCR TEXTHello World", 8)]
#[tokio::test]
async fn text_lands_on_the_selection(
    #[case] selection: Selection,
    #[case] expected: &str,
    #[case] caret: usize,
) {
    let h = Harness::new();
    let mut session = editor_with(&h, "Hello World");
    session.set_selection(selection);

    let outcome = session.process_image_file(png("scan.png")).await.unwrap();

    assert_eq!(session.content(), expected);
    assert_eq!(session.selection(), Selection::caret(caret));
    assert_eq!(
        outcome,
        IngestOutcome::Inserted {
            text: "OCR TEXT".into(),
            caret: Selection::caret(caret),
        }
    );
    assert!(session.has_changes());
    assert!(session.autosave_pending());
}

#[tokio::test]
async fn picker_rejects_non_images_silently() {
    let h = Harness::new();
    let mut session = editor_with(&h, "draft");
    let text = ImageFile::new("notes.png.txt", "text/plain", b"x".to_vec());

    assert_eq!(session.handle_picked_file(Some(text)).await, IngestOutcome::Rejected);
    assert!(h.ocr.payloads().is_empty());
    assert!(h.prompt.alerts().is_empty());
    assert_eq!(session.content(), "draft");
}

#[tokio::test]
async fn picker_with_no_file_or_empty_file_is_ignored() {
    let h = Harness::new();
    let mut session = editor_with(&h, "draft");

    assert_eq!(session.handle_picked_file(None).await, IngestOutcome::NoImage);
    let empty = ImageFile::new("blank.png", "image/png", Vec::<u8>::new());
    assert_eq!(session.handle_picked_file(Some(empty)).await, IngestOutcome::Rejected);
    assert!(h.ocr.payloads().is_empty());
    assert!(h.prompt.alerts().is_empty());
}

#[tokio::test]
async fn picker_accepts_image_mime() {
    let h = Harness::new();
    let mut session = editor_with(&h, "");
    let photo = ImageFile::new("IMG_0001", "image/jpeg", b"jpeg".to_vec());

    let outcome = session.handle_picked_file(Some(photo)).await;
    assert!(matches!(outcome, IngestOutcome::Inserted { .. }));
}

#[tokio::test]
async fn clipboard_pull_converts_first_image_entry() {
    let h = Harness::with_clipboard(FakeClipboard::holding(&["text/plain", "image/png"]));
    let mut session = editor_with(&h, "");

    let outcome = session.pull_clipboard().await;

    assert!(matches!(outcome, IngestOutcome::Inserted { .. }));
    assert_eq!(h.clipboard.loaded(), vec!["image/png".to_string()]);
    assert_eq!(h.ocr.payloads().len(), 1);
}

#[tokio::test]
async fn clipboard_without_image_is_not_an_error() {
    let h = Harness::with_clipboard(FakeClipboard::holding(&["text/plain"]));
    let mut session = editor_with(&h, "");

    assert_eq!(session.pull_clipboard().await, IngestOutcome::NoImage);
    assert!(h.prompt.alerts().is_empty());
    assert!(h.clipboard.loaded().is_empty());
}

#[tokio::test]
async fn clipboard_permission_and_read_failures_read_differently() {
    let denied = Harness::with_clipboard(FakeClipboard::with_entries(Err(
        ClipboardError::PermissionDenied,
    )));
    let broken = Harness::with_clipboard(FakeClipboard::with_entries(Err(
        ClipboardError::Unavailable("no display".into()),
    )));

    let mut a = editor_with(&denied, "");
    let mut b = editor_with(&broken, "");
    assert_eq!(a.pull_clipboard().await, IngestOutcome::Failed);
    assert_eq!(b.pull_clipboard().await, IngestOutcome::Failed);

    let denied_alerts = denied.prompt.alerts();
    let broken_alerts = broken.prompt.alerts();
    let denied_msg = &denied_alerts[0];
    let broken_msg = &broken_alerts[0];
    assert!(denied_msg.contains("denied"));
    assert!(denied_msg.contains("pick a file"));
    assert!(broken_msg.contains("no display"));
    assert_ne!(denied_msg, broken_msg);
}

#[tokio::test]
async fn edits_and_saves_wait_for_ocr() {
    let h = Harness::new();
    let mut session = editor_with(&h, "abc");
    session.edit("abcd").unwrap();

    let job = session.begin_ocr(&png("x.png")).unwrap();
    assert!(session.is_processing());
    assert_eq!(session.edit("nope"), Err(SessionError::Busy));
    assert_eq!(session.begin_save(), Err(SessionError::Busy));
    assert_eq!(session.begin_ocr(&png("y.png")), Err(SessionError::Busy));
    assert_eq!(session.pull_clipboard().await, IngestOutcome::Rejected);

    session.finish_ocr(job, Ok("!".into())).unwrap();
    assert!(!session.is_processing());
    assert_eq!(session.content(), "abcd!");
    session.edit("abcd!?").unwrap();
}

#[tokio::test]
async fn new_memo_filled_by_ocr_is_created_as_ocr() {
    let h = Harness::new();
    let mut session = EditingSession::new_draft(h.ports(), EditorSettings::default());

    session.handle_paste(&image_paste()).await;
    session.save().await.unwrap();

    assert_eq!(
        h.backend.writes(),
        vec![Call::Create(NewMemo {
            content: "OCR TEXT".into(),
            source: MemoSource::Ocr,
        })]
    );
}
