//! Keyword matching of utterances against the choices valid in each state

use super::state::DialogState;
use crate::speech::Utterance;

/// Outcome of matching one utterance in one state
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    Car,
    Document,
    Mustang,
    Ferrari,
    CreditCard,
    DrivingLicence,
    /// Caller explicitly asked to hear the question again
    RepeatRequested,
    /// Provider heard nothing usable
    NoSpeech,
    /// Speech was recognized but matched no keyword for this state
    Unrecognized(String),
}

/// Keywords are checked in order; the first hit wins.
const TOPIC_KEYWORDS: &[(&str, Intent)] = &[
    ("CAR", Intent::Car),
    ("DOCUMENT", Intent::Document),
    ("REPEAT", Intent::RepeatRequested),
];

const CAR_KEYWORDS: &[(&str, Intent)] = &[("MUSTANG", Intent::Mustang), ("FERRARI", Intent::Ferrari)];

const DOCUMENT_KEYWORDS: &[(&str, Intent)] = &[
    ("CREDIT CARD", Intent::CreditCard),
    ("DRIVING LICENCE", Intent::DrivingLicence),
];

/// Classify `utterance` using the keyword set of `state`.
///
/// Matching is a case-insensitive substring search. `Terminal` accepts no
/// keywords, so anything said there is `Unrecognized`.
pub fn classify(state: DialogState, utterance: &Utterance) -> Intent {
    if !utterance.recognized || utterance.text.trim().is_empty() {
        return Intent::NoSpeech;
    }

    let keywords = match state {
        DialogState::AwaitingTopicChoice => TOPIC_KEYWORDS,
        DialogState::AwaitingCarModel => CAR_KEYWORDS,
        DialogState::AwaitingDocumentType => DOCUMENT_KEYWORDS,
        DialogState::Terminal => &[],
    };

    let upper = utterance.text.to_uppercase();
    keywords
        .iter()
        .find(|(keyword, _)| upper.contains(keyword))
        .map_or_else(
            || Intent::Unrecognized(utterance.text.trim().to_string()),
            |(_, intent)| intent.clone(),
        )
}
