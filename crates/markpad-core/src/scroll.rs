/// Scroll synchronization between the text viewport, overlay and gutter.
use markpad_config::AppConfig;

/// A vertical/horizontal scroll position in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScrollOffset {
    pub top: f32,
    pub left: f32,
}

/// Fixed line geometry used to map lines to pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollMetrics {
    /// Pixel height of one line.
    pub line_height: f32,
    /// Vertical padding inside the viewport (top + bottom).
    pub padding: f32,
    /// Lines kept above the caret when scrolling up to it.
    pub margin_above: f32,
    /// Lines from the visible bottom that already count as hidden.
    pub trigger_below: f32,
    /// Lines kept below the caret when scrolling down to it.
    pub margin_below: f32,
}

impl Default for ScrollMetrics {
    fn default() -> Self {
        Self {
            line_height: 21.0,
            padding: 32.0,
            margin_above: 2.0,
            trigger_below: 3.0,
            margin_below: 5.0,
        }
    }
}

impl From<&AppConfig> for ScrollMetrics {
    fn from(config: &AppConfig) -> Self {
        Self {
            line_height: config.line_height_px,
            padding: config.viewport_padding_px,
            ..Self::default()
        }
    }
}

/// Scroll state of the editable viewport and the two layers that follow it.
#[derive(Debug, Clone)]
pub struct ScrollSync {
    metrics: ScrollMetrics,
    client_height: f32,
    viewport: ScrollOffset,
    overlay: ScrollOffset,
    gutter: ScrollOffset,
}

impl ScrollSync {
    pub fn new(metrics: ScrollMetrics, client_height: f32) -> Self {
        Self {
            metrics,
            client_height: client_height.max(0.0),
            viewport: ScrollOffset::default(),
            overlay: ScrollOffset::default(),
            gutter: ScrollOffset::default(),
        }
    }

    pub fn viewport(&self) -> ScrollOffset {
        self.viewport
    }

    pub fn overlay(&self) -> ScrollOffset {
        self.overlay
    }

    pub fn gutter(&self) -> ScrollOffset {
        self.gutter
    }

    /// Updates the viewport height (window resize).
    pub fn resize(&mut self, client_height: f32) {
        self.client_height = client_height.max(0.0);
    }

    /// Records a native scroll of the viewport and syncs the layers.
    pub fn set_viewport_scroll(&mut self, top: f32, left: f32) {
        self.viewport = ScrollOffset {
            top: top.max(0.0),
            left: left.max(0.0),
        };
        self.sync_overlay_scroll();
    }

    /// Copies the viewport's offsets onto the overlay and the gutter.
    pub fn sync_overlay_scroll(&mut self) {
        self.overlay = self.viewport;
        self.gutter = self.viewport;
    }

    /// Largest reachable scroll top for a document of `line_count` lines.
    pub fn max_scroll_top(&self, line_count: usize) -> f32 {
        let content = line_count as f32 * self.metrics.line_height + self.metrics.padding;
        (content - self.client_height).max(0.0)
    }

    /// Nudges the viewport so the caret's line stays inside the visible band.
    ///
    /// `caret_line` is 1-based. Returns true if the viewport scrolled. The
    /// layers are synced either way.
    pub fn scroll_to_caret(&mut self, caret_line: usize, line_count: usize) -> bool {
        let lh = self.metrics.line_height;
        let caret_y = caret_line.saturating_sub(1) as f32 * lh;
        let visible = self.client_height - self.metrics.padding;
        let top = self.viewport.top;

        let target = if caret_y < top {
            Some((caret_y - lh * self.metrics.margin_above).max(0.0))
        } else if caret_y > top + visible - lh * self.metrics.trigger_below {
            Some(caret_y - visible + lh * self.metrics.margin_below)
        } else {
            None
        };

        let moved = match target {
            Some(target) => {
                let clamped = target.clamp(0.0, self.max_scroll_top(line_count));
                let changed = (clamped - top).abs() > f32::EPSILON;
                self.viewport.top = clamped;
                changed
            }
            None => false,
        };
        self.sync_overlay_scroll();
        moved
    }
}
