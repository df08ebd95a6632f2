/// Text state engine of a single code editor widget.
///
/// The `Editor` owns a caret-aware `TextBuffer` and derives the line gutter
/// and the highlighted overlay from it. Special keys are rewritten by a
/// `KeyRouter`; scrolling of the overlay and gutter follows the viewport.
/// Persistence and preview are reached through the `CodeStore` and
/// `PreviewSurface` traits.
pub mod buffer;
pub mod collab;
pub mod editor;
pub mod highlight;
pub mod indent;
pub mod keys;
pub mod lines;
pub mod notice;
pub mod schedule;
pub mod scroll;
pub mod snapshot;

pub use buffer::TextBuffer;
pub use collab::{CodeStore, MemoryStore, PreviewSurface};
pub use editor::{Editor, InputEvent};
pub use highlight::{escape_html, HighlightRule, Highlighter};
pub use indent::IndentStyle;
pub use keys::{Key, KeyAction, KeyEvent, KeyRouter, Modifiers, Shortcut};
pub use lines::Position;
pub use notice::{Notice, NoticeKind, StatusLine};
pub use schedule::Debounce;
pub use scroll::{ScrollMetrics, ScrollOffset, ScrollSync};
pub use snapshot::{SavedSnapshot, SnapshotList};
