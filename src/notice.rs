use std::time::{Duration, Instant};

pub const NOTICE_DURATION: Duration = Duration::from_secs(4);

/// A transient message shown over the editor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub message: String,
    pub shown_at: Instant,
}

/// Notices currently on screen, oldest first
#[derive(Debug, Default)]
pub struct Notices {
    active: Vec<Notice>,
}

impl Notices {
    pub fn push(&mut self, message: impl Into<String>, now: Instant) {
        let message = message.into();
        tracing::debug!(%message, "notice");
        self.active.push(Notice {
            message,
            shown_at: now,
        });
    }

    /// Drop notices older than [`NOTICE_DURATION`]. Returns true if any expired.
    pub fn expire(&mut self, now: Instant) -> bool {
        let before = self.active.len();
        self.active
            .retain(|n| now.saturating_duration_since(n.shown_at) < NOTICE_DURATION);
        self.active.len() != before
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &Notice> {
        self.active.iter()
    }

    pub fn latest(&self) -> Option<&Notice> {
        self.active.last()
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }
}
