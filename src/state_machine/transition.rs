//! Pure state transition function
//!
//! Given the current dialog state and one event, decide the next state and the
//! actions to hand to the transport. No I/O happens here: transcription has
//! already been resolved into an event by the runtime.

use super::intent::{classify, Intent};
use super::{Action, ActionList, CallContext, DialogState, Event};
use thiserror::Error;

pub const GREETING: &str = "Hello! It's mega ultra super B A D Sparrows bot! How may I help you?";
pub const TOPIC_QUESTION: &str = "You can choose documents or car.";
pub const CAR_QUESTION: &str = "what kind of car do you want?";
pub const DOCUMENT_QUESTION: &str = "what kind of docs do you want to send?";
pub const REPEAT_CHOICE: &str = "please repeat your choice";
pub const NO_SPEECH_TOPIC: &str =
    "We couldn't recognize your message. You should choose either Documents or Car. Please repeat.";
pub const RECORDING_ISSUE: &str = "Sorry, there was an issue.";
pub const INTERNAL_FAILURE: &str =
    "Sorry, something went wrong on our side. Please call again later. Goodbye!";
pub const RETRIES_EXHAUSTED: &str =
    "We still couldn't understand your choice. Please call again later. Goodbye!";

const MUSTANG_DONE: &str = "Your mustang will arrive soon. Thank you for using our service.";
const FERRARI_DONE: &str = "Your Ferrari will arrive soon. Thank you for using our service.";
const CAR_FALLBACK: &str = "We weren't able to understand your request (you didn't choose Mustang or Ferrari), so you will get a fiat multipla. see ya!";
const CREDIT_CARD_DONE: &str =
    "Your credit card info will be sent soon. Thank you for using our service.";
const DRIVING_LICENCE_DONE: &str =
    "Your driving licence info will be sent soon. Thank you for using our service.";
const DOCUMENT_FALLBACK: &str = "We weren't able to understand your request (you didn't choose Credit card or Driving licence), so you will get some spam. See ya!";

/// Result of a state transition
#[derive(Debug)]
pub struct TransitionResult {
    pub new_state: DialogState,
    pub actions: ActionList,
}

impl TransitionResult {
    pub fn new(state: DialogState) -> Self {
        Self {
            new_state: state,
            actions: vec![],
        }
    }

    pub fn with_action(mut self, action: Action) -> Self {
        self.actions.push(action);
        self
    }

    /// Closing prompt followed by hangup, ending in `Terminal`
    pub fn finish(text: &str) -> Self {
        Self::new(DialogState::Terminal)
            .with_action(Action::prompt(text))
            .with_action(Action::hangup())
    }

    /// Whether this turn asked the topic question again
    pub fn is_topic_retry(&self, from: DialogState) -> bool {
        from == DialogState::AwaitingTopicChoice
            && self.new_state == DialogState::AwaitingTopicChoice
            && self.actions.iter().any(Action::is_record)
    }
}

/// Errors that can occur during transition
#[derive(Debug, Error)]
pub enum TransitionError {
    #[error("call {0} already started")]
    AlreadyStarted(String),
    #[error("call {0} has already finished")]
    CallFinished(String),
}

/// Pure transition function
pub fn transition(
    state: DialogState,
    context: &CallContext,
    event: Event,
) -> Result<TransitionResult, TransitionError> {
    let record = |text: &str, tag: DialogState| {
        Action::record(text, tag, context.max_record_seconds, context.recording_format)
    };

    match (state, event) {
        // Terminal is absorbing
        (DialogState::Terminal, _) => Err(TransitionError::CallFinished(context.call_id.clone())),

        (DialogState::AwaitingTopicChoice, Event::CallStarted) => {
            Ok(TransitionResult::new(DialogState::AwaitingTopicChoice)
                .with_action(Action::prompt(GREETING))
                .with_action(record(TOPIC_QUESTION, DialogState::AwaitingTopicChoice)))
        }

        (_, Event::CallStarted) => Err(TransitionError::AlreadyStarted(context.call_id.clone())),

        // Provider failures leave the state untouched
        (state, Event::RecordingFailed { .. } | Event::TranscriptionFailed { .. }) => {
            Ok(TransitionResult::new(state).with_action(Action::prompt(RECORDING_ISSUE)))
        }

        (state, Event::Transcribed { utterance }) => {
            let intent = classify(state, &utterance);
            Ok(match (state, intent) {
                (DialogState::AwaitingTopicChoice, Intent::Car) => {
                    TransitionResult::new(DialogState::AwaitingCarModel)
                        .with_action(record(CAR_QUESTION, DialogState::AwaitingCarModel))
                }
                (DialogState::AwaitingTopicChoice, Intent::Document) => {
                    TransitionResult::new(DialogState::AwaitingDocumentType)
                        .with_action(record(DOCUMENT_QUESTION, DialogState::AwaitingDocumentType))
                }
                (DialogState::AwaitingTopicChoice, Intent::RepeatRequested) => {
                    TransitionResult::new(DialogState::AwaitingTopicChoice)
                        .with_action(record(REPEAT_CHOICE, DialogState::AwaitingTopicChoice))
                }

                // Nothing heard: ask the same question again
                (state, Intent::NoSpeech) => {
                    TransitionResult::new(state).with_action(record(no_speech_prompt(state), state))
                }

                (DialogState::AwaitingTopicChoice, Intent::Unrecognized(text)) => {
                    TransitionResult::new(DialogState::AwaitingTopicChoice).with_action(record(
                        &format!("we couldn't recognize '{text}'. Choose Documents or Car."),
                        DialogState::AwaitingTopicChoice,
                    ))
                }

                (DialogState::AwaitingCarModel, Intent::Mustang) => TransitionResult::finish(MUSTANG_DONE),
                (DialogState::AwaitingCarModel, Intent::Ferrari) => TransitionResult::finish(FERRARI_DONE),
                (DialogState::AwaitingCarModel, _) => TransitionResult::finish(CAR_FALLBACK),

                (DialogState::AwaitingDocumentType, Intent::CreditCard) => {
                    TransitionResult::finish(CREDIT_CARD_DONE)
                }
                (DialogState::AwaitingDocumentType, Intent::DrivingLicence) => {
                    TransitionResult::finish(DRIVING_LICENCE_DONE)
                }
                (DialogState::AwaitingDocumentType, _) => TransitionResult::finish(DOCUMENT_FALLBACK),

                // classify() only yields topic intents in AwaitingTopicChoice, and
                // Terminal was rejected above
                (DialogState::AwaitingTopicChoice | DialogState::Terminal, _) => {
                    return Err(TransitionError::CallFinished(context.call_id.clone()))
                }
            })
        }
    }
}

/// Outcome when the caller keeps failing to choose a topic
pub fn retries_exhausted() -> TransitionResult {
    TransitionResult::finish(RETRIES_EXHAUSTED)
}

/// Apology plus hangup for a turn that failed internally; the cause is logged, not spoken
pub fn internal_failure() -> TransitionResult {
    TransitionResult::finish(INTERNAL_FAILURE)
}

fn no_speech_prompt(state: DialogState) -> &'static str {
    match state {
        DialogState::AwaitingCarModel => "We couldn't hear you. what kind of car do you want?",
        DialogState::AwaitingDocumentType => {
            "We couldn't hear you. what kind of docs do you want to send?"
        }
        DialogState::AwaitingTopicChoice | DialogState::Terminal => NO_SPEECH_TOPIC,
    }
}
