//! User-visible notifications.
//!
//! Three kinds of feedback share one surface: a progress line while a
//! request is in flight (dismissed by its owner the moment the request
//! terminates, on both paths), a success toast that expires on its own, and
//! an error notice that stays until the user dismisses it. Methods take the
//! current `Instant` so expiry is testable.

use std::time::{Duration, Instant};

/// How long a success toast stays up.
pub const TOAST_DURATION: Duration = Duration::from_secs(4);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Success,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NotificationId(u64);

#[derive(Debug, Clone)]
pub struct Notification {
    id: NotificationId,
    severity: Severity,
    text: String,
    expires_at: Option<Instant>,
}

impl Notification {
    #[must_use]
    pub const fn id(&self) -> NotificationId {
        self.id
    }

    #[must_use]
    pub const fn severity(&self) -> Severity {
        self.severity
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }
}

#[derive(Debug, Default)]
pub struct Notifications {
    items: Vec<Notification>,
    next_id: u64,
}

impl Notifications {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn push(
        &mut self,
        severity: Severity,
        text: impl Into<String>,
        expires_at: Option<Instant>,
    ) -> NotificationId {
        let id = NotificationId(self.next_id);
        self.next_id += 1;
        self.items.push(Notification {
            id,
            severity,
            text: text.into(),
            expires_at,
        });
        id
    }

    /// In-flight indicator. Sticky: the owning slot dismisses it by id when
    /// the request reaches a terminal state.
    pub fn push_progress(&mut self, text: impl Into<String>) -> NotificationId {
        self.push(Severity::Info, text, None)
    }

    /// Transient toast; expires [`TOAST_DURATION`] after `now`.
    pub fn push_success(&mut self, text: impl Into<String>, now: Instant) -> NotificationId {
        self.push(Severity::Success, text, Some(now + TOAST_DURATION))
    }

    /// Persistent notice; stays until explicitly dismissed.
    pub fn push_error(&mut self, text: impl Into<String>) -> NotificationId {
        self.push(Severity::Error, text, None)
    }

    pub fn dismiss(&mut self, id: NotificationId) {
        self.items.retain(|item| item.id != id);
    }

    /// Drop expired toasts.
    pub fn tick(&mut self, now: Instant) {
        self.items
            .retain(|item| item.expires_at.is_none_or(|deadline| now < deadline));
    }

    pub fn iter(&self) -> impl Iterator<Item = &Notification> {
        self.items.iter()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
