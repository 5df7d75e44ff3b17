//! Chat message domain model.
//!
//! Constructors take `SystemTime` explicitly; callers own the clock.

use std::time::SystemTime;

use serde::{Deserialize, Serialize};

use crate::NonEmptyString;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

/// One entry in the append-only chat log.
///
/// Insertion order is display order; the log is cleared wholesale when a new
/// plan replaces the session, never edited in place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    role: Role,
    content: NonEmptyString,
    timestamp: SystemTime,
}

impl ChatMessage {
    #[must_use]
    pub fn user(content: NonEmptyString, timestamp: SystemTime) -> Self {
        Self {
            role: Role::User,
            content,
            timestamp,
        }
    }

    #[must_use]
    pub fn assistant(content: NonEmptyString, timestamp: SystemTime) -> Self {
        Self {
            role: Role::Assistant,
            content,
            timestamp,
        }
    }

    #[must_use]
    pub const fn role(&self) -> Role {
        self.role
    }

    #[must_use]
    pub fn content(&self) -> &str {
        self.content.as_str()
    }

    #[must_use]
    pub const fn timestamp(&self) -> SystemTime {
        self.timestamp
    }
}
