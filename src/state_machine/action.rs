//! Call-control actions produced by state transitions
//!
//! Actions are plain data: the transport executes them in order against the
//! telephony provider. Every constructor allocates a fresh operation ID so the
//! transport can match provider outcomes back to the request that caused them.

use super::state::{DialogState, RecordingFormat};
use serde::{Deserialize, Serialize};

/// Ordered list of actions for one turn
pub type ActionList = Vec<Action>;

/// A primitive call-control instruction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum Action {
    /// Play a message; no caller input expected afterward
    #[serde(rename_all = "camelCase")]
    Prompt { operation_id: String, text: String },

    /// Play `prompt`, then capture caller audio
    #[serde(rename_all = "camelCase")]
    Record {
        operation_id: String,
        prompt: String,
        max_duration_seconds: u32,
        play_prompt: bool,
        play_beep: bool,
        recording_format: RecordingFormat,
        /// State the resulting transcript belongs to
        tag: DialogState,
    },

    /// Terminate the call; always last in its list
    #[serde(rename_all = "camelCase")]
    Hangup { operation_id: String },
}

impl Action {
    pub fn prompt(text: impl Into<String>) -> Self {
        Action::Prompt {
            operation_id: new_operation_id(),
            text: text.into(),
        }
    }

    pub fn record(
        prompt: impl Into<String>,
        tag: DialogState,
        max_duration_seconds: u32,
        recording_format: RecordingFormat,
    ) -> Self {
        Action::Record {
            operation_id: new_operation_id(),
            prompt: prompt.into(),
            max_duration_seconds,
            play_prompt: true,
            play_beep: false,
            recording_format,
            tag,
        }
    }

    pub fn hangup() -> Self {
        Action::Hangup {
            operation_id: new_operation_id(),
        }
    }

    pub fn operation_id(&self) -> &str {
        match self {
            Action::Prompt { operation_id, .. }
            | Action::Record { operation_id, .. }
            | Action::Hangup { operation_id } => operation_id,
        }
    }

    pub fn is_record(&self) -> bool {
        matches!(self, Action::Record { .. })
    }

    pub fn is_hangup(&self) -> bool {
        matches!(self, Action::Hangup { .. })
    }
}

fn new_operation_id() -> String {
    uuid::Uuid::new_v4().to_string()
}
