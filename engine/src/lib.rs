//! Application state machine for Itinera.
//!
//! [`App`] owns every piece of mutable state: the two operation slots (plan
//! generation and chat), the committed session, the notification surface,
//! and the unread badge. All mutation goes through `begin_*`/`finish_*`
//! pairs, which keeps the lifecycle fully unit-testable: `begin_*` runs the
//! single-flight guard and configuration checks and hands back the prompt to
//! send; the caller performs the model call; `finish_*` commits the outcome.
//!
//! The engine itself is synchronous. Responsiveness comes from the caller
//! awaiting the model call between `begin` and `finish` on the async
//! runtime, not from threads inside the engine.

mod config;
mod notifications;
mod session;
mod state;
mod unread;

#[cfg(test)]
mod tests;

pub use config::{API_KEY_ENV, ApiKeys, AppSection, ConfigError, ItineraConfig, config_path,
    config_path_hint, expand_env_vars};
pub use notifications::{
    Notification, NotificationId, Notifications, Severity, TOAST_DURATION,
};
pub use session::PlanSession;
pub use state::{OperationSlot, RequestState, SlotBusy};
pub use unread::UnreadSignal;

use std::time::{Instant, SystemTime};

use thiserror::Error;

use itinera_plan::{SectionParser, chat_prompt, plan_prompt};
use itinera_providers::GenerateError;
use itinera_types::{
    ApiKey, ChatMessage, EmptyStringError, ModelName, NonEmptyString, TripRequest,
};

/// Shown when a failure has no message of its own.
pub const GENERIC_FAILURE: &str =
    "Something went wrong while talking to the travel assistant. Please try again.";

const PLAN_PROGRESS: &str = "Generating your travel plan...";
const CHAT_PROGRESS: &str = "Travel assistant is typing...";
const PLAN_READY: &str = "Your travel plan is ready.";
const CHAT_REPLIED: &str = "Travel assistant replied.";

/// Why a submit was refused before any call was made.
#[derive(Debug, Error)]
pub enum SubmitError {
    #[error(transparent)]
    AlreadyLoading(#[from] SlotBusy),
    #[error(
        "No Gemini API key configured. Set GEMINI_API_KEY or add it to {config_hint} under [api_keys], then try again."
    )]
    MissingApiKey { config_hint: String },
    #[error("Generate a travel plan to start chatting")]
    NoPlanYet,
    #[error(transparent)]
    EmptyQuestion(#[from] EmptyStringError),
}

#[derive(Debug)]
pub struct App {
    api_key: Option<ApiKey>,
    model: ModelName,
    parser: SectionParser,
    session: Option<PlanSession>,
    plan_slot: OperationSlot<TripRequest>,
    chat_slot: OperationSlot<NonEmptyString>,
    // At most one progress indicator per slot, dismissed on both terminal
    // paths before any other notification is shown.
    plan_progress: Option<NotificationId>,
    chat_progress: Option<NotificationId>,
    notifications: Notifications,
    unread: UnreadSignal,
}

impl App {
    #[must_use]
    pub fn new(config: &ItineraConfig) -> Self {
        let model = config.model().unwrap_or_else(|e| {
            tracing::warn!("Configured model rejected: {e}; using the default model");
            ModelName::default()
        });
        Self::with_credentials(config.api_key(), model)
    }

    #[must_use]
    pub fn with_credentials(api_key: Option<ApiKey>, model: ModelName) -> Self {
        Self {
            api_key,
            model,
            parser: SectionParser::default(),
            session: None,
            plan_slot: OperationSlot::new(),
            chat_slot: OperationSlot::new(),
            plan_progress: None,
            chat_progress: None,
            notifications: Notifications::new(),
            unread: UnreadSignal::new(),
        }
    }

    // ------------------------------------------------------------------
    // Plan slot
    // ------------------------------------------------------------------

    /// Start a plan-generation request.
    ///
    /// Runs the single-flight guard and the credential check, then returns
    /// the prompt for the caller to send. A missing API key short-circuits
    /// into `Failed` before any call could be made.
    pub fn begin_plan(&mut self, request: TripRequest) -> Result<String, SubmitError> {
        if self.plan_slot.is_loading() {
            return Err(SlotBusy.into());
        }

        if self.api_key.is_none() {
            let err = SubmitError::MissingApiKey {
                config_hint: config_path_hint(),
            };
            let message = err.to_string();
            self.plan_slot.fail(message.clone());
            self.notifications.push_error(message);
            tracing::warn!("Plan submit refused: no API key configured");
            return Err(err);
        }

        let prompt = plan_prompt(&request);
        self.plan_slot.begin(request)?;
        self.plan_progress = Some(self.notifications.push_progress(PLAN_PROGRESS));
        tracing::debug!("Plan request started");
        Ok(prompt)
    }

    /// Commit the outcome of a plan-generation call.
    ///
    /// The progress indicator is cleared first, on both paths. Success
    /// parses the reply (fail-open: unmatched sections become placeholders,
    /// never an error) and replaces the session wholesale, which also resets
    /// the chat slot and log.
    pub fn finish_plan(&mut self, outcome: Result<String, GenerateError>) {
        if let Some(id) = self.plan_progress.take() {
            self.notifications.dismiss(id);
        }
        match outcome {
            Ok(reply) => {
                let Some(request) = self.plan_slot.succeed() else {
                    tracing::warn!("Plan completion arrived with no request in flight; dropping");
                    return;
                };
                let sections = self.parser.parse(&reply);
                self.session = Some(PlanSession::new(request, sections));
                self.chat_slot.reset();
                if let Some(id) = self.chat_progress.take() {
                    self.notifications.dismiss(id);
                }
                self.unread.clear();
                self.notifications.push_success(PLAN_READY, Instant::now());
                tracing::debug!("Plan committed; chat log reset");
            }
            Err(error) => {
                let message = failure_message(&error);
                self.plan_slot.fail(message.clone());
                self.notifications.push_error(message);
                tracing::warn!("Plan request failed: {error}");
            }
        }
    }

    // ------------------------------------------------------------------
    // Chat slot
    // ------------------------------------------------------------------

    /// Start a chat turn.
    ///
    /// The question is committed to the log immediately (it is the user's
    /// action, not the operation's payload); the assistant reply is the
    /// payload and only lands on success. Returns the grounded prompt.
    pub fn begin_chat(&mut self, question: &str) -> Result<String, SubmitError> {
        let Some(session) = self.session.as_mut() else {
            return Err(SubmitError::NoPlanYet);
        };
        if self.chat_slot.is_loading() {
            return Err(SlotBusy.into());
        }
        let question = NonEmptyString::new(question.trim())?;

        let prompt = chat_prompt(session.request(), session.sections(), &question);
        session.push_message(ChatMessage::user(question.clone(), SystemTime::now()));
        self.chat_slot.begin(question)?;
        self.chat_progress = Some(self.notifications.push_progress(CHAT_PROGRESS));
        tracing::debug!("Chat turn started");
        Ok(prompt)
    }

    /// Commit the outcome of a chat call.
    ///
    /// A completion for a turn that is no longer in flight (the session was
    /// replaced by a new plan in the meantime) is dropped rather than
    /// applied to the wrong log.
    pub fn finish_chat(&mut self, outcome: Result<String, GenerateError>) {
        if let Some(id) = self.chat_progress.take() {
            self.notifications.dismiss(id);
        }
        match outcome {
            Ok(reply) => match NonEmptyString::new(reply) {
                Ok(content) => {
                    if self.chat_slot.succeed().is_none() {
                        tracing::warn!("Chat completion arrived with no turn in flight; dropping");
                        return;
                    }
                    let Some(session) = self.session.as_mut() else {
                        return;
                    };
                    session.push_message(ChatMessage::assistant(content, SystemTime::now()));
                    self.unread.note_assistant_message();
                    self.notifications.push_success(CHAT_REPLIED, Instant::now());
                }
                Err(EmptyStringError) => self.fail_chat(GENERIC_FAILURE.to_string()),
            },
            Err(error) => {
                tracing::warn!("Chat turn failed: {error}");
                self.fail_chat(failure_message(&error));
            }
        }
    }

    fn fail_chat(&mut self, message: String) {
        self.chat_slot.fail(message.clone());
        self.notifications.push_error(message);
    }

    // ------------------------------------------------------------------
    // Surfaces
    // ------------------------------------------------------------------

    pub fn open_chat_surface(&mut self) {
        self.unread.open_surface();
    }

    pub fn close_chat_surface(&mut self) {
        self.unread.close_surface();
    }

    /// Advance time-driven state (toast expiry).
    pub fn tick(&mut self) {
        self.notifications.tick(Instant::now());
    }

    pub fn dismiss_notification(&mut self, id: NotificationId) {
        if self.plan_progress == Some(id) {
            self.plan_progress = None;
        }
        if self.chat_progress == Some(id) {
            self.chat_progress = None;
        }
        self.notifications.dismiss(id);
    }

    // ------------------------------------------------------------------
    // Read surfaces for the presentation layer
    // ------------------------------------------------------------------

    #[must_use]
    pub fn plan_state(&self) -> &RequestState<TripRequest> {
        self.plan_slot.state()
    }

    #[must_use]
    pub fn chat_state(&self) -> &RequestState<NonEmptyString> {
        self.chat_slot.state()
    }

    #[must_use]
    pub fn session(&self) -> Option<&PlanSession> {
        self.session.as_ref()
    }

    #[must_use]
    pub fn notifications(&self) -> &Notifications {
        &self.notifications
    }

    /// True while any slot has its in-flight indicator up.
    #[must_use]
    pub fn has_progress(&self) -> bool {
        self.plan_progress.is_some() || self.chat_progress.is_some()
    }

    #[must_use]
    pub fn has_unread(&self) -> bool {
        self.unread.has_unread()
    }

    #[must_use]
    pub fn model(&self) -> &ModelName {
        &self.model
    }
}

/// Human-readable failure text, with a generic fallback for causes that
/// carry no message of their own.
fn failure_message(error: &GenerateError) -> String {
    let text = error.to_string();
    if text.trim().is_empty() {
        GENERIC_FAILURE.to_string()
    } else {
        text
    }
}
