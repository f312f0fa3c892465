//! Cursor and selection handling for the draft buffer.
//!
//! Offsets count Unicode scalar values, so OCR output in any script lands on a
//! character boundary.

/// A selected range of the draft, `start <= end`. A collapsed range is a caret.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Selection {
    pub start: usize,
    pub end: usize,
}

impl Selection {
    pub fn caret(at: usize) -> Self {
        Self { start: at, end: at }
    }

    /// Builds a selection from two offsets in either order.
    pub fn new(a: usize, b: usize) -> Self {
        Self {
            start: a.min(b),
            end: a.max(b),
        }
    }

    pub fn is_collapsed(&self) -> bool {
        self.start == self.end
    }

    /// Clamps both bounds into a buffer of `len` characters.
    pub fn clamp(self, len: usize) -> Self {
        Self::new(self.start.min(len), self.end.min(len))
    }
}

fn byte_offset(text: &str, chars: usize) -> usize {
    text.char_indices()
        .nth(chars)
        .map(|(idx, _)| idx)
        .unwrap_or(text.len())
}

/// Replaces the selected range of `content` with `insert`.
///
/// Returns the new text and the caret position right after the inserted text.
pub fn splice(content: &str, selection: Selection, insert: &str) -> (String, Selection) {
    let selection = selection.clamp(content.chars().count());
    let start = byte_offset(content, selection.start);
    let end = byte_offset(content, selection.end);

    let mut out = String::with_capacity(content.len() - (end - start) + insert.len());
    out.push_str(&content[..start]);
    out.push_str(insert);
    out.push_str(&content[end..]);

    let caret = selection.start + insert.chars().count();
    (out, Selection::caret(caret))
}
