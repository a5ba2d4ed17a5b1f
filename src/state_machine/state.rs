//! Dialog state types

use serde::{Deserialize, Serialize};
use std::fmt;

/// Where a call is in the conversation.
///
/// Also used as the correlation tag on `Record` actions: the transport echoes
/// it back with the recording outcome so the transcript is interpreted
/// against the question that was actually asked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub enum DialogState {
    /// Greeting played, waiting for "car" or "documents"
    #[default]
    AwaitingTopicChoice,
    /// Asked which car the caller wants
    AwaitingCarModel,
    /// Asked which documents the caller wants sent
    AwaitingDocumentType,
    /// Closing prompt and hangup issued; absorbing
    Terminal,
}

impl DialogState {
    pub fn is_terminal(self) -> bool {
        matches!(self, DialogState::Terminal)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            DialogState::AwaitingTopicChoice => "awaiting_topic_choice",
            DialogState::AwaitingCarModel => "awaiting_car_model",
            DialogState::AwaitingDocumentType => "awaiting_document_type",
            DialogState::Terminal => "terminal",
        }
    }
}

impl fmt::Display for DialogState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Opaque recording format passed through to every `Record` action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RecordingFormat {
    #[default]
    Wav,
    Wma,
    Mp3,
}

impl RecordingFormat {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "wav" => Some(RecordingFormat::Wav),
            "wma" => Some(RecordingFormat::Wma),
            "mp3" => Some(RecordingFormat::Mp3),
            _ => None,
        }
    }
}

/// Per-call configuration (immutable for the lifetime of the call)
#[derive(Debug, Clone)]
pub struct CallContext {
    pub call_id: String,
    /// Cap applied to every recording
    pub max_record_seconds: u32,
    pub recording_format: RecordingFormat,
    /// Consecutive topic-choice retries allowed before giving up; `None` = unbounded
    pub max_topic_retries: Option<u32>,
}

/// Default recording cap in seconds
pub const DEFAULT_MAX_RECORD_SECONDS: u32 = 2;

impl CallContext {
    pub fn new(call_id: impl Into<String>) -> Self {
        Self {
            call_id: call_id.into(),
            max_record_seconds: DEFAULT_MAX_RECORD_SECONDS,
            recording_format: RecordingFormat::default(),
            max_topic_retries: None,
        }
    }

    pub fn with_max_record_seconds(mut self, seconds: u32) -> Self {
        self.max_record_seconds = seconds;
        self
    }

    pub fn with_recording_format(mut self, format: RecordingFormat) -> Self {
        self.recording_format = format;
        self
    }

    pub fn with_max_topic_retries(mut self, retries: Option<u32>) -> Self {
        self.max_topic_retries = retries;
        self
    }
}
