//! Operation slot state machine.
//!
//! Each asynchronous operation (plan generation, chat turn) runs through one
//! [`OperationSlot`]. The slot is the single concurrency control in the
//! system: at most one request is in flight per slot, and a submit against a
//! loading slot is refused outright rather than queued or raced.

use std::mem;

use thiserror::Error;

/// Lifecycle of one asynchronous operation.
///
/// `Loading` carries the pending input (the trip request, or the chat
/// question) so the completion path needs no side channel to find what the
/// call was about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestState<P> {
    Idle,
    Loading(P),
    Succeeded,
    Failed(String),
}

/// Refused submit: the slot already has a request in flight.
#[derive(Debug, Error)]
#[error("a request is already in flight for this operation")]
pub struct SlotBusy;

#[derive(Debug)]
pub struct OperationSlot<P> {
    state: RequestState<P>,
}

impl<P> Default for OperationSlot<P> {
    fn default() -> Self {
        Self {
            state: RequestState::Idle,
        }
    }
}

impl<P> OperationSlot<P> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn state(&self) -> &RequestState<P> {
        &self.state
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        matches!(self.state, RequestState::Loading(_))
    }

    /// Transition into `Loading`, guarding against a concurrent submit.
    ///
    /// Any non-loading state (initial or terminal) may begin a new request;
    /// a loading slot refuses and is left untouched.
    pub fn begin(&mut self, pending: P) -> Result<(), SlotBusy> {
        if self.is_loading() {
            return Err(SlotBusy);
        }
        self.state = RequestState::Loading(pending);
        Ok(())
    }

    /// Terminal success. Only meaningful from `Loading`; a stray completion
    /// against an idle slot is ignored so it cannot fabricate a success.
    pub fn succeed(&mut self) -> Option<P> {
        if !self.is_loading() {
            return None;
        }
        match mem::replace(&mut self.state, RequestState::Succeeded) {
            RequestState::Loading(pending) => Some(pending),
            _ => None,
        }
    }

    /// Terminal failure. Valid from any state: a submit can be short-circuited
    /// into `Failed` before it ever starts loading (missing configuration).
    /// Returns the pending input if the slot was loading.
    pub fn fail(&mut self, reason: impl Into<String>) -> Option<P> {
        match mem::replace(&mut self.state, RequestState::Failed(reason.into())) {
            RequestState::Loading(pending) => Some(pending),
            _ => None,
        }
    }

    /// Back to `Idle`, discarding any terminal state.
    pub fn reset(&mut self) {
        self.state = RequestState::Idle;
    }
}
