//! Lifecycle tests for the application state machine.

use std::collections::BTreeSet;
use std::num::NonZeroU32;

use chrono::NaiveDate;

use itinera_providers::GenerateError;
use itinera_types::{ApiKey, Interest, ModelName, Role, SectionId, TripRequest};

use crate::{App, RequestState, Severity, SubmitError};

fn request() -> TripRequest {
    TripRequest {
        source: "Helsinki".to_string(),
        destination: "Valletta".to_string(),
        start_date: NaiveDate::from_ymd_opt(2025, 10, 2).unwrap(),
        end_date: NaiveDate::from_ymd_opt(2025, 10, 9).unwrap(),
        budget: "1800".to_string(),
        travelers: NonZeroU32::new(2).unwrap(),
        interests: BTreeSet::from([Interest::History, Interest::Relaxation]),
    }
}

fn app() -> App {
    App::with_credentials(Some(ApiKey::new("test-key")), ModelName::default())
}

fn app_without_key() -> App {
    App::with_credentials(None, ModelName::default())
}

fn app_with_plan() -> App {
    let mut app = app();
    app.begin_plan(request()).unwrap();
    app.finish_plan(Ok(
        "1. Best Travel Options\nFerry from Sicily.\n2. Accommodation Suggestions\nStay in Sliema.".to_string(),
    ));
    app
}

// ----------------------------------------------------------------------
// Plan slot
// ----------------------------------------------------------------------

#[test]
fn plan_happy_path_commits_sections_and_toast() {
    let mut app = app();

    let prompt = app.begin_plan(request()).unwrap();
    assert!(prompt.contains("From: Helsinki"));
    assert!(prompt.contains("1. Best Travel Options (flights/trains)"));
    assert!(app.has_progress());
    assert!(matches!(app.plan_state(), RequestState::Loading(_)));

    app.finish_plan(Ok("3. Daily Itinerary\nDay 1: walk the old town.".to_string()));

    assert!(matches!(app.plan_state(), RequestState::Succeeded));
    assert!(!app.has_progress());

    let session = app.session().unwrap();
    assert_eq!(
        session.sections().get(SectionId::Itinerary),
        "Day 1: walk the old town."
    );
    assert!(session.sections().is_placeholder(SectionId::Dining));

    let severities: Vec<Severity> = app
        .notifications()
        .iter()
        .map(crate::Notification::severity)
        .collect();
    assert_eq!(severities, vec![Severity::Success]);
}

#[test]
fn plan_failure_sets_failed_state_and_persistent_notice() {
    let mut app = app();
    app.begin_plan(request()).unwrap();
    app.finish_plan(Err(GenerateError::Empty));

    assert!(matches!(app.plan_state(), RequestState::Failed(reason)
        if reason.contains("no usable text")));
    assert!(!app.has_progress());
    assert!(app.session().is_none());

    // The failure notice is persistent, not a toast.
    app.tick();
    let severities: Vec<Severity> = app
        .notifications()
        .iter()
        .map(crate::Notification::severity)
        .collect();
    assert_eq!(severities, vec![Severity::Error]);
}

#[test]
fn submit_while_loading_is_refused_without_side_effects() {
    let mut app = app();
    app.begin_plan(request()).unwrap();

    let refused = app.begin_plan(request());
    assert!(matches!(refused, Err(SubmitError::AlreadyLoading(_))));
    assert!(matches!(app.plan_state(), RequestState::Loading(_)));

    // Only one completion commits.
    app.finish_plan(Ok("2. Accommodation Suggestions\nAnywhere central.".to_string()));
    assert!(app.session().is_some());
    assert!(matches!(app.plan_state(), RequestState::Succeeded));
}

#[test]
fn missing_api_key_short_circuits_to_failed() {
    let mut app = app_without_key();

    let refused = app.begin_plan(request());
    assert!(matches!(refused, Err(SubmitError::MissingApiKey { .. })));

    // Failed without ever loading; the message names the fix.
    match app.plan_state() {
        RequestState::Failed(reason) => {
            assert!(reason.contains("GEMINI_API_KEY"));
            assert!(reason.contains("[api_keys]"));
        }
        other => panic!("expected Failed, got {other:?}"),
    }
    assert!(!app.has_progress());
    assert!(app.session().is_none());
}

#[test]
fn stray_plan_completion_is_dropped() {
    let mut app = app();
    app.finish_plan(Ok("1. Best Travel Options\nWalk.".to_string()));
    assert!(app.session().is_none());
    assert!(matches!(app.plan_state(), RequestState::Idle));
}

#[test]
fn unparseable_reply_still_succeeds_with_placeholders() {
    let mut app = app();
    app.begin_plan(request()).unwrap();
    app.finish_plan(Ok("I could not produce a structured plan, sorry!".to_string()));

    // Degradation is not an error: the lifecycle succeeds.
    assert!(matches!(app.plan_state(), RequestState::Succeeded));
    let sections = app.session().unwrap().sections();
    for id in SectionId::ALL {
        assert!(sections.is_placeholder(id));
    }
}

// ----------------------------------------------------------------------
// Chat slot
// ----------------------------------------------------------------------

#[test]
fn chat_before_plan_is_refused() {
    let mut app = app();
    let refused = app.begin_chat("Is the ferry daily?");
    assert!(matches!(refused, Err(SubmitError::NoPlanYet)));
    assert_eq!(
        SubmitError::NoPlanYet.to_string(),
        "Generate a travel plan to start chatting"
    );
}

#[test]
fn chat_turn_commits_question_then_reply() {
    let mut app = app_with_plan();

    let prompt = app.begin_chat("Is the ferry daily?").unwrap();
    assert!(prompt.contains("Ferry from Sicily."));
    assert!(prompt.contains("Question: Is the ferry daily?"));
    assert!(app.has_progress());

    let messages = app.session().unwrap().messages();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].role(), Role::User);

    app.finish_chat(Ok("Yes, twice a day in October.".to_string()));

    let messages = app.session().unwrap().messages();
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[1].role(), Role::Assistant);
    assert_eq!(messages[1].content(), "Yes, twice a day in October.");
    assert!(matches!(app.chat_state(), RequestState::Succeeded));
    assert!(!app.has_progress());
}

#[test]
fn chat_failure_commits_no_assistant_message() {
    let mut app = app_with_plan();
    app.begin_chat("Any vegan restaurants?").unwrap();
    app.finish_chat(Err(GenerateError::Blocked("SAFETY".to_string())));

    assert!(matches!(app.chat_state(), RequestState::Failed(_)));
    // The user's question stays; no reply was committed.
    let messages = app.session().unwrap().messages();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].role(), Role::User);
}

#[test]
fn blank_chat_input_is_refused_without_touching_the_slot() {
    let mut app = app_with_plan();
    let refused = app.begin_chat("   ");
    assert!(matches!(refused, Err(SubmitError::EmptyQuestion(_))));
    assert!(matches!(app.chat_state(), RequestState::Idle));
    assert!(app.session().unwrap().messages().is_empty());
}

#[test]
fn chat_submit_while_loading_is_refused() {
    let mut app = app_with_plan();
    app.begin_chat("First question").unwrap();

    let refused = app.begin_chat("Second question");
    assert!(matches!(refused, Err(SubmitError::AlreadyLoading(_))));

    // Only the first question is in the log.
    assert_eq!(app.session().unwrap().messages().len(), 1);
}

#[test]
fn new_plan_resets_chat_and_drops_inflight_reply() {
    let mut app = app_with_plan();
    app.begin_chat("Old question").unwrap();

    // A new plan lands while the chat call is outstanding.
    app.begin_plan(request()).unwrap();
    app.finish_plan(Ok("4. Food & Dining Options\nTry pastizzi.".to_string()));

    assert!(app.session().unwrap().messages().is_empty());
    assert!(matches!(app.chat_state(), RequestState::Idle));

    // The stale reply must not land in the fresh log.
    app.finish_chat(Ok("Stale answer".to_string()));
    assert!(app.session().unwrap().messages().is_empty());
}

// ----------------------------------------------------------------------
// Unread signal
// ----------------------------------------------------------------------

#[test]
fn reply_with_surface_closed_sets_unread_and_opening_clears_it() {
    let mut app = app_with_plan();
    app.begin_chat("When is sunset?").unwrap();
    app.finish_chat(Ok("Around 18:30 in October.".to_string()));

    assert!(app.has_unread());
    app.open_chat_surface();
    assert!(!app.has_unread());
}

#[test]
fn reply_with_surface_open_never_sets_unread() {
    let mut app = app_with_plan();
    app.open_chat_surface();
    app.begin_chat("When is sunset?").unwrap();
    app.finish_chat(Ok("Around 18:30.".to_string()));

    assert!(!app.has_unread());
}

#[test]
fn new_plan_clears_stale_unread() {
    let mut app = app_with_plan();
    app.begin_chat("Q").unwrap();
    app.finish_chat(Ok("A".to_string()));
    assert!(app.has_unread());

    app.begin_plan(request()).unwrap();
    app.finish_plan(Ok("1. Best Travel Options\nBus.".to_string()));
    assert!(!app.has_unread());
}
