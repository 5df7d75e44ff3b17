//! Committed session state for one generated plan.
//!
//! A [`PlanSession`] exists only after plan generation succeeds, and a new
//! successful generation replaces it wholesale: sections are never patched
//! in place, and the chat log starts empty again. Within a session the chat
//! log is append-only.

use itinera_types::{ChatMessage, TravelPlanSections, TripRequest};

#[derive(Debug)]
pub struct PlanSession {
    request: TripRequest,
    sections: TravelPlanSections,
    chat_log: Vec<ChatMessage>,
}

impl PlanSession {
    #[must_use]
    pub fn new(request: TripRequest, sections: TravelPlanSections) -> Self {
        Self {
            request,
            sections,
            chat_log: Vec::new(),
        }
    }

    #[must_use]
    pub fn request(&self) -> &TripRequest {
        &self.request
    }

    #[must_use]
    pub fn sections(&self) -> &TravelPlanSections {
        &self.sections
    }

    /// Messages in insertion order (= display order).
    #[must_use]
    pub fn messages(&self) -> &[ChatMessage] {
        &self.chat_log
    }

    pub fn push_message(&mut self, message: ChatMessage) {
        self.chat_log.push(message);
    }
}
