//! Unread badge for the collapsed chat surface.
//!
//! Derived state only: set when an assistant message lands while the
//! surface is closed, cleared the moment the surface opens. No timers.

#[derive(Debug, Default)]
pub struct UnreadSignal {
    surface_open: bool,
    unread: bool,
}

impl UnreadSignal {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn open_surface(&mut self) {
        self.surface_open = true;
        self.unread = false;
    }

    pub fn close_surface(&mut self) {
        self.surface_open = false;
    }

    /// Record an assistant message landing in the log.
    pub fn note_assistant_message(&mut self) {
        if !self.surface_open {
            self.unread = true;
        }
    }

    /// Forget any unread state (the log it referred to was replaced).
    pub fn clear(&mut self) {
        self.unread = false;
    }

    #[must_use]
    pub const fn is_surface_open(&self) -> bool {
        self.surface_open
    }

    #[must_use]
    pub const fn has_unread(&self) -> bool {
        self.unread
    }
}
