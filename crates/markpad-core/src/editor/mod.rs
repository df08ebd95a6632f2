//! Editor instance combining buffer, derived views, scroll state and collaborators.
//!
//! An `Editor` owns its `TextBuffer`, the derived gutter and overlay strings,
//! the scroll state of all three layers, the autosave timer and the status
//! notice. Every host event goes through a method here; after any content
//! change the same cascade runs: recompute gutter and overlay, sync layer
//! scroll, request a deferred caret scroll, reschedule autosave.
//!
//! Snapshot and preview workflows are in the `snapshots` submodule.

mod snapshots;

use std::time::{Duration, Instant};

use anyhow::Result;
use markpad_config::AppConfig;

use crate::buffer::TextBuffer;
use crate::collab::{CodeStore, PreviewSurface};
use crate::highlight::Highlighter;
use crate::indent::IndentStyle;
use crate::keys::{Key, KeyEvent, KeyRouter, Shortcut};
use crate::lines::{self, Position};
use crate::notice::{Notice, NoticeKind, StatusLine};
use crate::schedule::Debounce;
use crate::scroll::{ScrollMetrics, ScrollSync};

/// Viewport height used until the host reports a real one.
const DEFAULT_CLIENT_HEIGHT: f32 = 600.0;

/// Native input the host applies itself, reported after the fact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEvent {
    /// Typed or pasted text replacing the selection.
    Text(String),
    DeleteBackward,
    DeleteForward,
}

/// A single editor widget.
pub struct Editor {
    buffer: TextBuffer,
    router: KeyRouter,
    highlighter: Highlighter,
    scroll: ScrollSync,
    gutter: String,
    overlay: String,
    line_count: usize,
    /// Caret scroll requested by the last event, run by [`Editor::run_deferred`].
    scroll_pending: bool,
    autosave: Debounce,
    status: StatusLine,
    store: Box<dyn CodeStore>,
    preview: Box<dyn PreviewSurface>,
    /// Bumped on every buffer mutation.
    content_version: u64,
}

impl std::fmt::Debug for Editor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Editor")
            .field("buffer", &self.buffer)
            .field("line_count", &self.line_count)
            .field("scroll", &self.scroll)
            .field("scroll_pending", &self.scroll_pending)
            .field("autosave", &self.autosave)
            .field("content_version", &self.content_version)
            .finish_non_exhaustive()
    }
}

impl Editor {
    /// Creates an empty editor wired to `store` and `preview`.
    ///
    /// # Errors
    ///
    /// Returns an error if a highlight rule fails to compile.
    pub fn new(
        config: &AppConfig,
        store: Box<dyn CodeStore>,
        preview: Box<dyn PreviewSurface>,
    ) -> Result<Self> {
        let mut editor = Self {
            buffer: TextBuffer::new(),
            router: KeyRouter::new(IndentStyle::from_config(config)),
            highlighter: Highlighter::new()?,
            scroll: ScrollSync::new(ScrollMetrics::from(config), DEFAULT_CLIENT_HEIGHT),
            gutter: String::new(),
            overlay: String::new(),
            line_count: 1,
            scroll_pending: false,
            autosave: Debounce::new(Duration::from_millis(config.autosave_delay_ms)),
            status: StatusLine::new(Duration::from_millis(config.notice_duration_ms)),
            store,
            preview,
            content_version: 0,
        };
        editor.refresh();
        Ok(editor)
    }

    // ── accessors ──────────────────────────────────────────────────────

    pub fn buffer(&self) -> &TextBuffer {
        &self.buffer
    }

    pub fn text(&self) -> String {
        self.buffer.text()
    }

    /// Highlighted overlay markup for the current text.
    pub fn overlay(&self) -> &str {
        &self.overlay
    }

    /// Line-number gutter text for the current text.
    pub fn gutter(&self) -> &str {
        &self.gutter
    }

    pub fn line_count(&self) -> usize {
        self.line_count
    }

    /// 1-based line/column of the caret.
    pub fn caret_position(&self) -> Position {
        lines::position_of_offset(&self.buffer.text(), self.buffer.caret())
    }

    pub fn scroll(&self) -> &ScrollSync {
        &self.scroll
    }

    pub fn content_version(&self) -> u64 {
        self.content_version
    }

    pub fn scroll_pending(&self) -> bool {
        self.scroll_pending
    }

    pub fn autosave_pending(&self) -> bool {
        self.autosave.is_pending()
    }

    /// The notice visible at `now`, if any.
    pub fn notice(&self, now: Instant) -> Option<&Notice> {
        self.status.visible(now)
    }

    /// The most recent notice, expired or not.
    pub fn last_notice(&self) -> Option<&Notice> {
        self.status.last()
    }

    pub(crate) fn store(&self) -> &dyn CodeStore {
        self.store.as_ref()
    }

    // ── host events ────────────────────────────────────────────────────

    /// Restores the autosaved current code (startup).
    pub fn restore(&mut self, now: Instant) {
        match self.store.load_current() {
            Ok(Some(code)) => {
                tracing::debug!("Restored {} chars of current code", code.chars().count());
                self.replace_text(&code);
            }
            Ok(None) => self.replace_text(""),
            Err(e) => {
                tracing::warn!("Failed to restore current code: {e:#}");
                self.notify(format!("Could not restore the last session: {e}"), NoticeKind::Error, now);
                self.replace_text("");
            }
        }
    }

    /// Replaces the document without scheduling an autosave (file open).
    pub fn load_text(&mut self, text: &str) {
        self.replace_text(text);
    }

    /// Handles a key press. Returns true if the editor consumed it; false
    /// means the host should apply its native behavior and then report it
    /// through [`Editor::handle_input`].
    pub fn handle_key(&mut self, event: KeyEvent, now: Instant) -> bool {
        if let Some(shortcut) = self.router.shortcut(&event) {
            match shortcut {
                Shortcut::Preview => self.preview(now),
                Shortcut::SaveSnapshot => {
                    self.save_snapshot(None, now);
                }
            }
            return true;
        }

        let action = self.router.route(&self.buffer, &event);
        if !action.is_handled() {
            match event.key {
                Key::Left | Key::Right => self.request_scroll(),
                _ => {}
            }
            return false;
        }
        if action.apply(&mut self.buffer) {
            self.after_edit(now);
        }
        true
    }

    /// Applies a native input event and runs the cascade.
    pub fn handle_input(&mut self, input: InputEvent, now: Instant) {
        let changed = match input {
            InputEvent::Text(text) => {
                if text.is_empty() && !self.buffer.has_selection() {
                    false
                } else {
                    self.buffer.insert(&text);
                    true
                }
            }
            InputEvent::DeleteBackward => self.buffer.delete_backward(),
            InputEvent::DeleteForward => self.buffer.delete_forward(),
        };
        if changed {
            self.after_edit(now);
        }
    }

    /// Moves the caret/selection (click, arrow keys handled by the host).
    pub fn set_selection(&mut self, caret: usize, selection_end: usize) {
        self.buffer.set_selection(caret, selection_end);
        self.scroll.sync_overlay_scroll();
        self.request_scroll();
    }

    /// Collapses the selection one char to the left.
    pub fn move_left(&mut self) {
        self.buffer.move_left();
        self.request_scroll();
    }

    /// Collapses the selection one char to the right.
    pub fn move_right(&mut self) {
        self.buffer.move_right();
        self.request_scroll();
    }

    /// Native scroll of the text viewport.
    pub fn on_scroll(&mut self, top: f32, left: f32) {
        self.scroll.set_viewport_scroll(top, left);
    }

    /// Viewport resize.
    pub fn resize(&mut self, client_height: f32) {
        self.scroll.resize(client_height);
        self.request_scroll();
    }

    /// Runs the caret scroll requested since the last call, after the host
    /// has applied layout. Returns true if the viewport moved.
    pub fn run_deferred(&mut self) -> bool {
        if !std::mem::take(&mut self.scroll_pending) {
            return false;
        }
        let caret_line = lines::line_of_offset(&self.buffer.text(), self.buffer.caret());
        self.scroll.scroll_to_caret(caret_line, self.line_count)
    }

    /// Advances timers: fires a due autosave and expires old notices.
    pub fn tick(&mut self, now: Instant) {
        if self.autosave.fire_if_due(now) {
            self.persist_current(now);
        }
        self.status.prune(now);
    }

    /// Writes a pending autosave immediately (shutdown).
    pub fn flush(&mut self, now: Instant) {
        if self.autosave.is_pending() {
            self.autosave.cancel();
            self.persist_current(now);
        }
    }

    // ── cascade ────────────────────────────────────────────────────────

    fn after_edit(&mut self, now: Instant) {
        self.bump_version();
        self.refresh();
        self.scroll.sync_overlay_scroll();
        self.request_scroll();
        self.autosave.reschedule(now);
    }

    /// Recomputes line count, gutter and overlay from the buffer.
    fn refresh(&mut self) {
        let text = self.buffer.text();
        self.line_count = lines::line_count(&text);
        self.gutter = lines::gutter_text(self.line_count);
        self.overlay = self.highlighter.render(&text);
    }

    fn request_scroll(&mut self) {
        self.scroll_pending = true;
    }

    #[inline]
    fn bump_version(&mut self) {
        self.content_version = self.content_version.wrapping_add(1);
    }

    pub(crate) fn replace_text(&mut self, text: &str) {
        self.buffer.set_text(text);
        self.bump_version();
        self.refresh();
        self.scroll.set_viewport_scroll(0.0, 0.0);
        self.request_scroll();
    }

    /// Autosave write. Failures become an error notice.
    fn persist_current(&mut self, now: Instant) {
        if let Err(e) = self.write_current() {
            tracing::warn!("Autosave failed: {e:#}");
            self.notify(format!("Autosave failed: {e}"), NoticeKind::Error, now);
        }
    }

    pub(crate) fn write_current(&self) -> Result<()> {
        let text = self.buffer.text();
        self.store.save_current(&text)?;
        tracing::debug!("Saved {} chars of current code", text.chars().count());
        Ok(())
    }

    pub(crate) fn notify(&mut self, message: impl Into<String>, kind: NoticeKind, now: Instant) {
        self.status.notify(message, kind, now);
    }
}
