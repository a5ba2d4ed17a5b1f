//! Events that can occur during a call

use crate::speech::Utterance;

/// Events that trigger state transitions
#[derive(Debug, Clone)]
pub enum Event {
    /// The transport answered a new call
    CallStarted,

    /// The transport reported that the recording itself failed
    RecordingFailed { reason: String },

    /// Audio was recorded but the speech provider could not transcribe it
    TranscriptionFailed { error: String },

    /// Audio was recorded and transcribed (possibly to nothing)
    Transcribed { utterance: Utterance },
}

impl Event {
    /// Short name used in logs
    pub fn kind(&self) -> &'static str {
        match self {
            Event::CallStarted => "call_started",
            Event::RecordingFailed { .. } => "recording_failed",
            Event::TranscriptionFailed { .. } => "transcription_failed",
            Event::Transcribed { .. } => "transcribed",
        }
    }

    /// Failure cause carried by the event, if any
    pub fn detail(&self) -> Option<&str> {
        match self {
            Event::RecordingFailed { reason } => Some(reason),
            Event::TranscriptionFailed { error } => Some(error),
            Event::CallStarted | Event::Transcribed { .. } => None,
        }
    }
}
