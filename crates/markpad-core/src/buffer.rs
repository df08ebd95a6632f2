/// Text buffer wrapping `ropey::Rope`, with a caret and one selection span.
///
/// Offsets are char indices. Every offset handed in from outside is clamped
/// to `[0, len_chars]`, so no operation here can fail.
use std::fmt;

use ropey::Rope;

/// The authoritative document text plus caret/selection offsets.
#[derive(Debug, Clone)]
pub struct TextBuffer {
    rope: Rope,
    caret: usize,
    selection_end: usize,
}

impl Default for TextBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl From<&str> for TextBuffer {
    fn from(text: &str) -> Self {
        Self {
            rope: Rope::from_str(text),
            caret: 0,
            selection_end: 0,
        }
    }
}

impl fmt::Display for TextBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.rope)
    }
}

impl TextBuffer {
    /// Creates an empty text buffer with the caret at 0.
    pub fn new() -> Self {
        Self {
            rope: Rope::new(),
            caret: 0,
            selection_end: 0,
        }
    }

    /// Returns the full document as an owned string.
    pub fn text(&self) -> String {
        self.rope.to_string()
    }

    /// Returns the total number of characters in the buffer.
    pub fn len_chars(&self) -> usize {
        self.rope.len_chars()
    }

    /// Returns true if the buffer is empty.
    pub fn is_empty(&self) -> bool {
        self.rope.len_chars() == 0
    }

    /// Caret offset.
    pub fn caret(&self) -> usize {
        self.caret
    }

    /// Secondary selection offset; equals the caret when nothing is selected.
    pub fn selection_end(&self) -> usize {
        self.selection_end
    }

    /// Returns the ordered selection bounds `(start, end)`.
    pub fn selection_range(&self) -> (usize, usize) {
        (
            self.caret.min(self.selection_end),
            self.caret.max(self.selection_end),
        )
    }

    /// Returns true when a non-empty span is selected.
    pub fn has_selection(&self) -> bool {
        self.caret != self.selection_end
    }

    /// Sets caret and selection end, clamping both to the buffer.
    pub fn set_selection(&mut self, caret: usize, selection_end: usize) {
        self.caret = self.clamp(caret);
        self.selection_end = self.clamp(selection_end);
    }

    /// Moves the caret and collapses the selection.
    pub fn set_caret(&mut self, offset: usize) {
        let offset = self.clamp(offset);
        self.caret = offset;
        self.selection_end = offset;
    }

    /// Returns the selected substring, or an empty string if none.
    pub fn selected_text(&self) -> String {
        let (start, end) = self.selection_range();
        self.rope.slice(start..end).to_string()
    }

    /// Returns the text between the last `\n` before `offset` and `offset`.
    pub fn line_before(&self, offset: usize) -> String {
        let end = self.clamp(offset);
        let mut start = end;
        let mut chars = self.rope.chars_at(end);
        while let Some(c) = chars.prev() {
            if c == '\n' {
                break;
            }
            start -= 1;
        }
        self.rope.slice(start..end).to_string()
    }

    /// Replaces the selection (or inserts at the caret) with `text`.
    ///
    /// The caret ends up directly after the inserted text, with no selection.
    pub fn insert(&mut self, text: &str) {
        let (start, end) = self.selection_range();
        self.splice(start, end, text);
        self.set_caret(start + text.chars().count());
    }

    /// Wraps the selection as `before + selection + after`.
    ///
    /// The caret lands after `after` and the selection collapses.
    pub fn replace_selection(&mut self, before: &str, after: &str) {
        let selected = self.selected_text();
        let mut wrapped = String::with_capacity(before.len() + selected.len() + after.len());
        wrapped.push_str(before);
        wrapped.push_str(&selected);
        wrapped.push_str(after);
        self.insert(&wrapped);
    }

    /// Deletes the selection, or the char before the caret.
    ///
    /// Returns true if the text changed.
    pub fn delete_backward(&mut self) -> bool {
        let (start, end) = self.selection_range();
        if start != end {
            self.splice(start, end, "");
            self.set_caret(start);
            return true;
        }
        if start == 0 {
            return false;
        }
        self.splice(start - 1, start, "");
        self.set_caret(start - 1);
        true
    }

    /// Deletes the selection, or the char after the caret.
    ///
    /// Returns true if the text changed.
    pub fn delete_forward(&mut self) -> bool {
        let (start, end) = self.selection_range();
        if start != end {
            self.splice(start, end, "");
            self.set_caret(start);
            return true;
        }
        if start >= self.rope.len_chars() {
            return false;
        }
        self.splice(start, start + 1, "");
        self.set_caret(start);
        true
    }

    /// Moves the caret one char left, or collapses the selection to its start.
    pub fn move_left(&mut self) {
        let (start, end) = self.selection_range();
        if start != end {
            self.set_caret(start);
        } else {
            self.set_caret(start.saturating_sub(1));
        }
    }

    /// Moves the caret one char right, or collapses the selection to its end.
    pub fn move_right(&mut self) {
        let (start, end) = self.selection_range();
        if start != end {
            self.set_caret(end);
        } else {
            self.set_caret(end + 1);
        }
    }

    /// Replaces the whole document and resets the caret to 0.
    pub fn set_text(&mut self, text: &str) {
        self.rope = Rope::from_str(text);
        self.set_caret(0);
    }

    fn clamp(&self, offset: usize) -> usize {
        offset.min(self.rope.len_chars())
    }

    /// Removes `[start, end)` and inserts `text` there. Bounds are pre-clamped.
    fn splice(&mut self, start: usize, end: usize, text: &str) {
        if start < end {
            self.rope.remove(start..end);
        }
        if !text.is_empty() {
            self.rope.insert(start, text);
        }
    }
}
