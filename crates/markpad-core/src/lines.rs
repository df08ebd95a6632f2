//! Line numbering derived from document text.
//!
//! Only `\n` counts as a line break. Everything is recomputed from scratch on
//! each call; documents are editor-widget sized, so no incremental index is kept.

/// A 1-based line/column pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Position {
    /// 1-based line number.
    pub line: usize,
    /// 1-based column (chars from the start of the line, plus one).
    pub column: usize,
}

impl Position {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl PartialOrd for Position {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Position {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.line.cmp(&other.line).then(self.column.cmp(&other.column))
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Ln {}, Col {}", self.line, self.column)
    }
}

/// Number of lines in `content`; an empty document has one line.
pub fn line_count(content: &str) -> usize {
    content.bytes().filter(|&b| b == b'\n').count() + 1
}

/// 1-based line of the char `offset`: newlines strictly before it, plus one.
///
/// Offsets past the end behave like the end of the document.
pub fn line_of_offset(content: &str, offset: usize) -> usize {
    content.chars().take(offset).filter(|&c| c == '\n').count() + 1
}

/// 1-based line and column of the char `offset`.
pub fn position_of_offset(content: &str, offset: usize) -> Position {
    let mut line = 1;
    let mut column = 1;
    for c in content.chars().take(offset) {
        if c == '\n' {
            line += 1;
            column = 1;
        } else {
            column += 1;
        }
    }
    Position { line, column }
}

/// Gutter text for `count` lines: each number followed by a newline.
pub fn gutter_text(count: usize) -> String {
    let mut out = String::with_capacity(count * 4);
    for n in 1..=count {
        out.push_str(&n.to_string());
        out.push('\n');
    }
    out
}
