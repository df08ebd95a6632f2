//! Keystroke interception: Tab, Enter, bracket pairing and global shortcuts.
//!
//! [`KeyRouter::route`] turns a key event into a [`KeyAction`] without touching
//! the buffer; [`KeyAction::apply`] performs it. Keys that are not special
//! come back as [`KeyAction::PassThrough`] and are left to native input.

use crate::buffer::TextBuffer;
use crate::indent::{next_line_indent, IndentStyle};

/// A logical key, already decoded from the host's key event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Tab,
    Enter,
    Backspace,
    Delete,
    Left,
    Right,
    Char(char),
    /// Anything the editor never intercepts (function keys, Escape, ...).
    Other,
}

/// Modifier state at the time of the key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Modifiers {
    pub ctrl: bool,
    pub alt: bool,
    pub shift: bool,
}

/// A key press as delivered by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    pub key: Key,
    pub modifiers: Modifiers,
}

impl KeyEvent {
    /// A key press with no modifiers.
    pub fn plain(key: Key) -> Self {
        Self {
            key,
            modifiers: Modifiers::default(),
        }
    }

    /// A key press with Ctrl held.
    pub fn ctrl(key: Key) -> Self {
        Self {
            key,
            modifiers: Modifiers {
                ctrl: true,
                ..Modifiers::default()
            },
        }
    }
}

impl From<char> for KeyEvent {
    fn from(c: char) -> Self {
        match c {
            '\t' => Self::plain(Key::Tab),
            '\n' => Self::plain(Key::Enter),
            c => Self::plain(Key::Char(c)),
        }
    }
}

/// Document-level shortcuts, checked before any text interception.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shortcut {
    /// Ctrl+Enter.
    Preview,
    /// Ctrl+S.
    SaveSnapshot,
}

/// The text mutation a special key resolves to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyAction {
    /// Not intercepted; native input handles the key.
    PassThrough,
    /// Replace the selection with `text`. If `caret` is set, the caret is
    /// moved there afterwards instead of staying after the inserted text.
    Insert { text: String, caret: Option<usize> },
    /// Wrap the selection in `open`/`close`, caret after `close`.
    Wrap { open: char, close: char },
}

impl KeyAction {
    /// Returns true unless this is [`KeyAction::PassThrough`].
    pub fn is_handled(&self) -> bool {
        !matches!(self, Self::PassThrough)
    }

    /// Performs the mutation on `buffer`. Returns true if anything changed.
    pub fn apply(&self, buffer: &mut TextBuffer) -> bool {
        match self {
            Self::PassThrough => false,
            Self::Insert { text, caret } => {
                buffer.insert(text);
                if let Some(caret) = caret {
                    buffer.set_caret(*caret);
                }
                true
            }
            Self::Wrap { open, close } => {
                buffer.replace_selection(&open.to_string(), &close.to_string());
                true
            }
        }
    }
}

/// Returns the closing partner of an auto-paired opener.
pub fn closing_pair(open: char) -> Option<char> {
    match open {
        '(' => Some(')'),
        '{' => Some('}'),
        '[' => Some(']'),
        '"' => Some('"'),
        '\'' => Some('\''),
        _ => None,
    }
}

/// Decides which keystrokes become editor-computed mutations.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeyRouter {
    indent: IndentStyle,
}

impl KeyRouter {
    pub fn new(indent: IndentStyle) -> Self {
        Self { indent }
    }

    /// Recognizes Ctrl+Enter and Ctrl+S.
    pub fn shortcut(&self, event: &KeyEvent) -> Option<Shortcut> {
        if !event.modifiers.ctrl {
            return None;
        }
        match event.key {
            Key::Enter => Some(Shortcut::Preview),
            Key::Char('s') | Key::Char('S') => Some(Shortcut::SaveSnapshot),
            _ => None,
        }
    }

    /// Resolves `event` against the current buffer state, in priority order:
    /// Tab, Enter, bracket/quote opener, everything else.
    pub fn route(&self, buffer: &TextBuffer, event: &KeyEvent) -> KeyAction {
        if event.modifiers.ctrl || event.modifiers.alt {
            return KeyAction::PassThrough;
        }
        match event.key {
            Key::Tab => KeyAction::Insert {
                text: self.indent.indent_text(),
                caret: None,
            },
            Key::Enter => {
                let (start, _) = buffer.selection_range();
                let line = buffer.line_before(start);
                KeyAction::Insert {
                    text: format!("\n{}", next_line_indent(&line, self.indent)),
                    caret: None,
                }
            }
            Key::Char(open) => match closing_pair(open) {
                Some(close) if buffer.has_selection() => KeyAction::Wrap { open, close },
                Some(close) => {
                    let (start, _) = buffer.selection_range();
                    KeyAction::Insert {
                        text: format!("{open}{close}"),
                        caret: Some(start + 1),
                    }
                }
                None => KeyAction::PassThrough,
            },
            _ => KeyAction::PassThrough,
        }
    }
}
