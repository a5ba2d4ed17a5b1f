//! API request and response types

use crate::runtime::RecordOutcome;
use crate::state_machine::{ActionList, DialogState};
use base64::Engine;
use serde::{Deserialize, Serialize};

/// Recording outcome reported by the telephony transport
#[derive(Debug, Deserialize)]
#[serde(tag = "outcome", rename_all = "camelCase")]
pub enum RecordingRequest {
    Success {
        /// Base64-encoded audio
        audio: String,
        #[serde(default)]
        tag: Option<DialogState>,
    },
    Failure {
        #[serde(default)]
        reason: Option<String>,
        #[serde(default)]
        tag: Option<DialogState>,
    },
}

impl RecordingRequest {
    pub fn tag(&self) -> Option<DialogState> {
        match self {
            RecordingRequest::Success { tag, .. } | RecordingRequest::Failure { tag, .. } => *tag,
        }
    }

    /// Decode into the engine's outcome type
    pub fn into_outcome(self) -> Result<RecordOutcome, String> {
        match self {
            RecordingRequest::Success { audio, .. } => base64::engine::general_purpose::STANDARD
                .decode(audio.trim())
                .map(|audio| RecordOutcome::Success { audio })
                .map_err(|e| format!("Invalid base64 audio: {e}")),
            RecordingRequest::Failure { reason, .. } => Ok(RecordOutcome::Failure {
                reason: reason.unwrap_or_else(|| "unspecified".to_string()),
            }),
        }
    }
}

/// Actions the transport should perform next, in order
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionsResponse {
    pub call_id: String,
    pub actions: ActionList,
}

/// Simple success response
#[derive(Debug, Serialize)]
pub struct SuccessResponse {
    pub ok: bool,
}

/// Error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }
}
