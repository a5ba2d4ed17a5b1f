//! Property-based tests for the dialog state machine
//!
//! These tests verify key invariants hold across all possible inputs.

use super::transition::*;
use super::*;
use crate::speech::Utterance;
use proptest::prelude::*;

// ============================================================================
// Test Helpers
// ============================================================================

fn test_context() -> CallContext {
    CallContext::new("test-call")
}

// ============================================================================
// Arbitrary Generators
// ============================================================================

fn arb_state() -> impl Strategy<Value = DialogState> {
    prop_oneof![
        Just(DialogState::AwaitingTopicChoice),
        Just(DialogState::AwaitingCarModel),
        Just(DialogState::AwaitingDocumentType),
        Just(DialogState::Terminal),
    ]
}

fn arb_open_state() -> impl Strategy<Value = DialogState> {
    prop_oneof![
        Just(DialogState::AwaitingTopicChoice),
        Just(DialogState::AwaitingCarModel),
        Just(DialogState::AwaitingDocumentType),
    ]
}

/// Free text mixed with the keywords the engine listens for
fn arb_phrase() -> impl Strategy<Value = String> {
    prop_oneof![
        "[a-zA-Z ]{0,30}",
        Just("car".to_string()),
        Just("Documents".to_string()),
        Just("repeat".to_string()),
        Just("mustang please".to_string()),
        Just("FERRARI".to_string()),
        Just("credit card".to_string()),
        Just("driving licence".to_string()),
    ]
}

/// Text containing none of the topic keywords
fn arb_off_topic() -> impl Strategy<Value = String> {
    "[a-zA-Z ]{1,30}".prop_filter("must not contain a topic keyword", |text| {
        let upper = text.to_uppercase();
        !text.trim().is_empty()
            && !upper.contains("CAR")
            && !upper.contains("DOCUMENT")
            && !upper.contains("REPEAT")
    })
}

fn arb_utterance() -> impl Strategy<Value = Utterance> {
    prop_oneof![
        4 => arb_phrase().prop_map(Utterance::recognized),
        1 => Just(Utterance::silent()),
    ]
}

fn arb_event() -> impl Strategy<Value = Event> {
    prop_oneof![
        6 => arb_utterance().prop_map(|utterance| Event::Transcribed { utterance }),
        1 => "[a-z ]{1,20}".prop_map(|reason| Event::RecordingFailed { reason }),
        1 => "[a-z ]{1,20}".prop_map(|error| Event::TranscriptionFailed { error }),
        1 => Just(Event::CallStarted),
    ]
}

// ============================================================================
// Property Tests
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    // Hangup, when present, is always the last action
    #[test]
    fn prop_hangup_is_last(state in arb_state(), event in arb_event()) {
        if let Ok(result) = transition(state, &test_context(), event) {
            let hangups = result.actions.iter().filter(|a| a.is_hangup()).count();
            prop_assert!(hangups <= 1, "More than one hangup: {:?}", result.actions);
            if hangups == 1 {
                prop_assert!(result.actions.last().is_some_and(Action::is_hangup));
            }
        }
    }

    // Entering Terminal always hangs up, and Terminal never records
    #[test]
    fn prop_terminal_hangs_up_without_recording(state in arb_state(), event in arb_event()) {
        if let Ok(result) = transition(state, &test_context(), event) {
            if result.new_state.is_terminal() {
                prop_assert!(result.actions.last().is_some_and(Action::is_hangup));
                prop_assert!(!result.actions.iter().any(Action::is_record));
            } else {
                prop_assert!(!result.actions.iter().any(Action::is_hangup));
            }
        }
    }

    // Terminal is absorbing: nothing moves a finished call
    #[test]
    fn prop_terminal_is_absorbing(event in arb_event()) {
        prop_assert!(transition(DialogState::Terminal, &test_context(), event).is_err());
    }

    // Every Record is tagged with the state the session ends the turn in
    #[test]
    fn prop_record_tag_matches_new_state(state in arb_state(), event in arb_event()) {
        if let Ok(result) = transition(state, &test_context(), event) {
            for action in &result.actions {
                if let Action::Record { tag, .. } = action {
                    prop_assert_eq!(*tag, result.new_state);
                }
            }
        }
    }

    // Off-topic or silent input never advances topic choice
    #[test]
    fn prop_topic_choice_needs_a_keyword(text in arb_off_topic(), silent in any::<bool>()) {
        let utterance = if silent { Utterance::silent() } else { Utterance::recognized(text) };
        let result = transition(
            DialogState::AwaitingTopicChoice,
            &test_context(),
            Event::Transcribed { utterance },
        ).unwrap();
        prop_assert_eq!(result.new_state, DialogState::AwaitingTopicChoice);
        prop_assert_eq!(result.actions.len(), 1);
        prop_assert!(result.actions[0].is_record());
    }

    // Silence never moves any open state
    #[test]
    fn prop_silence_keeps_state(state in arb_open_state()) {
        let result = transition(
            state,
            &test_context(),
            Event::Transcribed { utterance: Utterance::silent() },
        ).unwrap();
        prop_assert_eq!(result.new_state, state);
    }

    // Provider failures apologise and keep the state
    #[test]
    fn prop_failures_keep_state(state in arb_open_state(), reason in "[a-z ]{1,20}") {
        for event in [
            Event::RecordingFailed { reason: reason.clone() },
            Event::TranscriptionFailed { error: reason.clone() },
        ] {
            let result = transition(state, &test_context(), event).unwrap();
            prop_assert_eq!(result.new_state, state);
            prop_assert_eq!(result.actions.len(), 1);
            let apologised = matches!(&result.actions[0], Action::Prompt { text, .. } if text == RECORDING_ISSUE);
            prop_assert!(apologised, "expected apology prompt, got {:?}", result.actions);
        }
    }

    // Any sequence of events reaches Terminal at most once and never leaves it
    #[test]
    fn prop_sequences_never_leave_terminal(events in proptest::collection::vec(arb_event(), 0..20)) {
        let ctx = test_context();
        let mut state = DialogState::AwaitingTopicChoice;

        for event in events {
            match transition(state, &ctx, event) {
                Ok(result) => {
                    prop_assert!(!state.is_terminal(), "Transition out of Terminal");
                    state = result.new_state;
                }
                Err(_) => { /* Invalid transition is OK */ }
            }
        }
    }

    // Operation IDs are unique within one action list
    #[test]
    fn prop_operation_ids_unique(state in arb_state(), event in arb_event()) {
        if let Ok(result) = transition(state, &test_context(), event) {
            let mut ids: Vec<_> = result.actions.iter().map(Action::operation_id).collect();
            let len = ids.len();
            ids.sort_unstable();
            ids.dedup();
            prop_assert_eq!(ids.len(), len);
        }
    }
}
