/// Short-lived status notices ("saved", "preview blocked", ...).
use std::time::{Duration, Instant};

/// Whether a notice reports success or failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
}

impl std::fmt::Display for NoticeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Success => write!(f, "success"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// One status message with its expiry time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub message: String,
    pub kind: NoticeKind,
    pub expires_at: Instant,
}

/// The single visible notice slot. A newer notice replaces the current one.
#[derive(Debug, Clone)]
pub struct StatusLine {
    ttl: Duration,
    current: Option<Notice>,
}

impl StatusLine {
    pub fn new(ttl: Duration) -> Self {
        Self { ttl, current: None }
    }

    /// Shows `message` until `now + ttl`. Fire-and-forget.
    pub fn notify(&mut self, message: impl Into<String>, kind: NoticeKind, now: Instant) {
        let message = message.into();
        match kind {
            NoticeKind::Success => tracing::info!("{message}"),
            NoticeKind::Error => tracing::warn!("{message}"),
        }
        self.current = Some(Notice {
            message,
            kind,
            expires_at: now + self.ttl,
        });
    }

    /// The notice still visible at `now`, if any.
    pub fn visible(&self, now: Instant) -> Option<&Notice> {
        self.current.as_ref().filter(|n| now < n.expires_at)
    }

    /// Drops the notice once it has expired.
    pub fn prune(&mut self, now: Instant) {
        if self.current.as_ref().is_some_and(|n| now >= n.expires_at) {
            self.current = None;
        }
    }

    /// The most recent notice regardless of expiry.
    pub fn last(&self) -> Option<&Notice> {
        self.current.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TTL: Duration = Duration::from_millis(3000);

    #[test]
    fn test_notice_visible_until_expiry() {
        let now = Instant::now();
        let mut status = StatusLine::new(TTL);
        status.notify("Saved", NoticeKind::Success, now);

        let visible = status.visible(now + Duration::from_millis(2999)).unwrap();
        assert_eq!(visible.message, "Saved");
        assert_eq!(visible.kind, NoticeKind::Success);
        assert!(status.visible(now + TTL).is_none());
    }

    #[test]
    fn test_newer_notice_replaces_and_extends() {
        let now = Instant::now();
        let mut status = StatusLine::new(TTL);
        status.notify("first", NoticeKind::Success, now);
        status.notify("second", NoticeKind::Error, now + Duration::from_millis(2000));

        let visible = status.visible(now + Duration::from_millis(4000)).unwrap();
        assert_eq!(visible.message, "second");
        assert_eq!(visible.kind, NoticeKind::Error);
    }

    #[test]
    fn test_prune() {
        let now = Instant::now();
        let mut status = StatusLine::new(TTL);
        status.notify("x", NoticeKind::Success, now);
        status.prune(now + Duration::from_millis(10));
        assert!(status.last().is_some());
        status.prune(now + TTL);
        assert!(status.last().is_none());
    }

    #[test]
    fn test_kind_display() {
        assert_eq!(NoticeKind::Success.to_string(), "success");
        assert_eq!(NoticeKind::Error.to_string(), "error");
    }
}
