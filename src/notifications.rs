use chrono::{DateTime, Duration, Utc};
use log::debug;
use std::collections::VecDeque;

pub const DEFAULT_TIMEOUT_SECS: i64 = 3;
/// Longest a toast may stay on screen.
pub const MAX_TIMEOUT_SECS: i64 = 3600;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Info,
    Destructive,
}

/// A toast shown in the corner of the screen until it expires.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub title: String,
    pub text: String,
    pub kind: NoticeKind,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug)]
pub struct Notifications {
    queue: VecDeque<Notice>,
    timeout: Duration,
}

impl Default for Notifications {
    fn default() -> Self {
        Self::new(DEFAULT_TIMEOUT_SECS)
    }
}

impl Notifications {
    /// `timeout_secs` is clamped to `1..=MAX_TIMEOUT_SECS`.
    pub fn new(timeout_secs: i64) -> Self {
        Notifications {
            queue: VecDeque::new(),
            timeout: Duration::seconds(timeout_secs.clamp(1, MAX_TIMEOUT_SECS)),
        }
    }

    pub fn push(&mut self, kind: NoticeKind, title: &str, text: impl Into<String>) {
        let notice = Notice {
            title: title.to_string(),
            text: text.into(),
            kind,
            created_at: Utc::now(),
        };
        debug!("Notice [{:?}] {}: {}", notice.kind, notice.title, notice.text);
        self.queue.push_back(notice);
    }

    pub fn info(&mut self, title: &str, text: impl Into<String>) {
        self.push(NoticeKind::Info, title, text);
    }

    pub fn destructive(&mut self, title: &str, text: impl Into<String>) {
        self.push(NoticeKind::Destructive, title, text);
    }

    /// Most recent notice still on screen.
    pub fn current(&self) -> Option<&Notice> {
        self.queue.back()
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Removes the notice on screen, returning whether there was one.
    pub fn dismiss(&mut self) -> bool {
        self.queue.pop_back().is_some()
    }

    pub fn expire(&mut self) {
        self.expire_at(Utc::now());
    }

    pub fn expire_at(&mut self, now: DateTime<Utc>) {
        let timeout = self.timeout;
        self.queue.retain(|n| now - n.created_at < timeout);
    }
}
