// Integration tests for the editor engine.
//
// These drive an Editor through realistic keystroke sequences and exercise
// collaborator failures (store unavailable, preview blocked).

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::{Duration, Instant};

use anyhow::{anyhow, Result};
use markpad_config::AppConfig;
use markpad_core::{
    CodeStore, Editor, InputEvent, Key, KeyEvent, MemoryStore, NoticeKind, Position,
    PreviewSurface, SavedSnapshot, SnapshotList,
};

/// A store whose every operation fails, counting the attempts.
#[derive(Default)]
struct BrokenStore {
    attempts: Rc<Cell<usize>>,
}

impl CodeStore for BrokenStore {
    fn save_current(&self, _content: &str) -> Result<()> {
        self.attempts.set(self.attempts.get() + 1);
        Err(anyhow!("quota exceeded"))
    }
    fn load_current(&self) -> Result<Option<String>> {
        Err(anyhow!("store unavailable"))
    }
    fn list_snapshots(&self) -> Result<SnapshotList> {
        Err(anyhow!("store unavailable"))
    }
    fn save_snapshot(&self, _title: Option<&str>, _content: &str) -> Result<SavedSnapshot> {
        Err(anyhow!("quota exceeded"))
    }
    fn delete_snapshot(&self, _id: i64) -> Result<Option<SavedSnapshot>> {
        Err(anyhow!("store unavailable"))
    }
}

struct BlockedPreview;

impl PreviewSurface for BlockedPreview {
    fn open_preview(&self, _content: &str) -> Result<()> {
        Err(anyhow!("popup blocked"))
    }
}

#[derive(Default)]
struct RecordingPreview(Rc<RefCell<Vec<String>>>);

impl PreviewSurface for RecordingPreview {
    fn open_preview(&self, content: &str) -> Result<()> {
        self.0.borrow_mut().push(content.to_string());
        Ok(())
    }
}

fn editor() -> Editor {
    Editor::new(
        &AppConfig::default(),
        Box::new(MemoryStore::new(10)),
        Box::new(RecordingPreview::default()),
    )
    .unwrap()
}

/// Types `text`, letting the editor intercept what it wants.
fn type_text(editor: &mut Editor, text: &str, now: Instant) {
    for c in text.chars() {
        if !editor.handle_key(KeyEvent::from(c), now) {
            editor.handle_input(InputEvent::Text(c.to_string()), now);
        }
        editor.run_deferred();
    }
}

// ── Typing workflows ───────────────────────────────────────────────────

#[test]
fn test_typing_an_html_block() {
    let mut ed = editor();
    let now = Instant::now();
    type_text(&mut ed, "<div>\n<p>hi</p>", now);
    assert_eq!(ed.text(), "<div>\n  <p>hi</p>");
    assert_eq!(ed.line_count(), 2);
    assert_eq!(ed.gutter(), "1\n2\n");
    assert!(ed.overlay().contains("html-tag"));
}

#[test]
fn test_typing_a_function_body() {
    let mut ed = editor();
    let now = Instant::now();
    type_text(&mut ed, "function f", now);
    type_text(&mut ed, "(", now);
    assert_eq!(ed.text(), "function f()");

    ed.handle_key(KeyEvent::plain(Key::Right), now);
    ed.move_right();
    type_text(&mut ed, " {\nreturn 1;", now);
    assert_eq!(ed.text(), "function f() {\n  return 1;}");
    assert_eq!(ed.caret_position(), Position::new(2, 12));
    assert!(ed
        .overlay()
        .starts_with("<span class=\"js-keyword\">function</span> f"));
}

#[test]
fn test_wrapping_a_selection_in_quotes() {
    let mut ed = editor();
    let now = Instant::now();
    ed.load_text("value");
    ed.set_selection(0, 5);
    assert!(ed.handle_key(KeyEvent::from('"'), now));
    assert_eq!(ed.text(), "\"value\"");
    assert_eq!(ed.buffer().caret(), 7);
    assert!(!ed.buffer().has_selection());
}

#[test]
fn test_tab_then_backspace() {
    let mut ed = editor();
    let now = Instant::now();
    ed.handle_key(KeyEvent::plain(Key::Tab), now);
    assert_eq!(ed.text(), "  ");
    ed.handle_input(InputEvent::DeleteBackward, now);
    assert_eq!(ed.text(), " ");
}

#[test]
fn test_tab_indent_from_config() {
    let config = AppConfig {
        indent_with_tabs: true,
        ..AppConfig::default()
    };
    let mut ed = Editor::new(
        &config,
        Box::new(MemoryStore::new(10)),
        Box::new(RecordingPreview::default()),
    )
    .unwrap();
    let now = Instant::now();
    ed.handle_key(KeyEvent::plain(Key::Tab), now);
    assert_eq!(ed.text(), "\t");

    ed.load_text("\tx {");
    ed.set_selection(4, 4);
    ed.handle_key(KeyEvent::plain(Key::Enter), now);
    assert_eq!(ed.text(), "\tx {\n\t\t");
}

#[test]
fn test_ctrl_char_passes_through() {
    let mut ed = editor();
    let now = Instant::now();
    assert!(!ed.handle_key(KeyEvent::ctrl(Key::Char('(')), now));
    assert_eq!(ed.text(), "");
}

// ── Autosave timing ────────────────────────────────────────────────────

#[test]
fn test_special_keys_also_reschedule_autosave() {
    let store = Rc::new(MemoryStore::new(10));
    let mut ed = Editor::new(
        &AppConfig::default(),
        Box::new(Forward(Rc::clone(&store))),
        Box::new(RecordingPreview::default()),
    )
    .unwrap();
    let start = Instant::now();
    ed.handle_input(InputEvent::Text("a".into()), start);
    ed.handle_key(KeyEvent::plain(Key::Tab), start + Duration::from_millis(900));
    ed.tick(start + Duration::from_millis(1500));
    assert_eq!(store.current_writes(), 0);
    ed.tick(start + Duration::from_millis(1900));
    assert_eq!(store.current_writes(), 1);
    assert_eq!(store.load_current().unwrap().as_deref(), Some("a  "));
}

#[test]
fn test_custom_autosave_delay() {
    let store = Rc::new(MemoryStore::new(10));
    let config = AppConfig {
        autosave_delay_ms: 250,
        ..AppConfig::default()
    };
    let mut ed = Editor::new(
        &config,
        Box::new(Forward(Rc::clone(&store))),
        Box::new(RecordingPreview::default()),
    )
    .unwrap();
    let start = Instant::now();
    ed.handle_input(InputEvent::Text("a".into()), start);
    ed.tick(start + Duration::from_millis(250));
    assert_eq!(store.current_writes(), 1);
}

/// Forwards to a shared `MemoryStore` so the test can inspect it.
struct Forward(Rc<MemoryStore>);

impl CodeStore for Forward {
    fn save_current(&self, content: &str) -> Result<()> {
        self.0.save_current(content)
    }
    fn load_current(&self) -> Result<Option<String>> {
        self.0.load_current()
    }
    fn list_snapshots(&self) -> Result<SnapshotList> {
        self.0.list_snapshots()
    }
    fn save_snapshot(&self, title: Option<&str>, content: &str) -> Result<SavedSnapshot> {
        self.0.save_snapshot(title, content)
    }
    fn delete_snapshot(&self, id: i64) -> Result<Option<SavedSnapshot>> {
        self.0.delete_snapshot(id)
    }
}

// ── Collaborator failures ──────────────────────────────────────────────

#[test]
fn test_failed_autosave_is_reported_not_retried() {
    let store = BrokenStore::default();
    let attempts = Rc::clone(&store.attempts);
    let mut ed = Editor::new(
        &AppConfig::default(),
        Box::new(store),
        Box::new(RecordingPreview::default()),
    )
    .unwrap();
    let start = Instant::now();
    ed.handle_input(InputEvent::Text("keep me".into()), start);

    let fired = start + Duration::from_millis(1000);
    ed.tick(fired);
    assert_eq!(attempts.get(), 1);
    let notice = ed.notice(fired).unwrap();
    assert_eq!(notice.kind, NoticeKind::Error);
    assert!(notice.message.contains("quota exceeded"));

    // In-memory state is untouched and nothing retries
    assert_eq!(ed.text(), "keep me");
    ed.tick(fired + Duration::from_millis(10_000));
    assert_eq!(attempts.get(), 1);
}

#[test]
fn test_restore_from_broken_store_starts_empty() {
    let mut ed = Editor::new(
        &AppConfig::default(),
        Box::new(BrokenStore::default()),
        Box::new(RecordingPreview::default()),
    )
    .unwrap();
    let now = Instant::now();
    ed.restore(now);
    assert_eq!(ed.text(), "");
    assert_eq!(ed.notice(now).unwrap().kind, NoticeKind::Error);
}

#[test]
fn test_failed_snapshot_save() {
    let mut ed = Editor::new(
        &AppConfig::default(),
        Box::new(BrokenStore::default()),
        Box::new(RecordingPreview::default()),
    )
    .unwrap();
    let now = Instant::now();
    ed.load_text("code");
    assert!(ed.save_snapshot(None, now).is_none());
    assert_eq!(ed.notice(now).unwrap().kind, NoticeKind::Error);
    assert_eq!(ed.text(), "code");
}

#[test]
fn test_blocked_preview_is_reported() {
    let mut ed = Editor::new(
        &AppConfig::default(),
        Box::new(MemoryStore::new(10)),
        Box::new(BlockedPreview),
    )
    .unwrap();
    let now = Instant::now();
    ed.load_text("<b>x</b>");
    ed.preview(now);
    let notice = ed.notice(now).unwrap();
    assert_eq!(notice.kind, NoticeKind::Error);
    assert!(notice.message.contains("popup blocked"));
}

// ── Notices ────────────────────────────────────────────────────────────

#[test]
fn test_notice_expires_after_tick() {
    let mut ed = editor();
    let now = Instant::now();
    ed.load_text("x");
    ed.save_snapshot(Some("t"), now);
    assert!(ed.notice(now + Duration::from_millis(2999)).is_some());

    ed.tick(now + Duration::from_millis(3000));
    assert!(ed.notice(now).is_none());
    assert!(ed.last_notice().is_none());
}

#[test]
fn test_custom_notice_duration() {
    let config = AppConfig {
        notice_duration_ms: 500,
        ..AppConfig::default()
    };
    let mut ed = Editor::new(
        &config,
        Box::new(MemoryStore::new(10)),
        Box::new(RecordingPreview::default()),
    )
    .unwrap();
    let now = Instant::now();
    ed.preview(now);
    assert!(ed.notice(now + Duration::from_millis(499)).is_some());
    assert!(ed.notice(now + Duration::from_millis(500)).is_none());
}
