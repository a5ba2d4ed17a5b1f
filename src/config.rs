//! Environment configuration

use crate::speech::DEFAULT_TRANSCRIPTION_TIMEOUT;
use crate::state_machine::state::DEFAULT_MAX_RECORD_SECONDS;
use crate::state_machine::{CallContext, RecordingFormat};
use std::time::Duration;

pub const DEFAULT_RECOGNITION_URI: &str =
    "https://speech.platform.bing.com/speech/recognition/interactive/cognitiveservices/v1";
pub const DEFAULT_TOKEN_URI: &str = "https://api.cognitive.microsoft.com/sts/v1.0/issueToken";

/// Dialog and server settings
#[derive(Debug, Clone)]
pub struct IvrConfig {
    pub port: u16,
    pub recording_format: RecordingFormat,
    pub max_record_seconds: u32,
    /// `None` leaves topic-choice retries unbounded
    pub max_topic_retries: Option<u32>,
}

impl Default for IvrConfig {
    fn default() -> Self {
        Self {
            port: 8000,
            recording_format: RecordingFormat::Wav,
            max_record_seconds: DEFAULT_MAX_RECORD_SECONDS,
            max_topic_retries: None,
        }
    }
}

impl IvrConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            port: lookup("IVR_PORT")
                .and_then(|p| p.parse().ok())
                .unwrap_or(defaults.port),
            recording_format: lookup("IVR_RECORDING_FORMAT")
                .and_then(|f| RecordingFormat::parse(&f))
                .unwrap_or(defaults.recording_format),
            max_record_seconds: lookup("IVR_MAX_RECORD_SECONDS")
                .and_then(|s| s.parse().ok())
                .filter(|s| *s > 0)
                .unwrap_or(defaults.max_record_seconds),
            max_topic_retries: lookup("IVR_MAX_TOPIC_RETRIES").and_then(|r| r.parse().ok()),
        }
    }

    /// Build the per-call context for a new call
    pub fn call_context(&self, call_id: &str) -> CallContext {
        CallContext::new(call_id)
            .with_max_record_seconds(self.max_record_seconds)
            .with_recording_format(self.recording_format)
            .with_max_topic_retries(self.max_topic_retries)
    }
}

/// Speech provider settings
#[derive(Debug, Clone)]
pub struct SpeechConfig {
    pub api_key: Option<String>,
    pub recognition_uri: String,
    pub token_uri: String,
    pub locale: String,
    pub timeout: Duration,
}

impl SpeechConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            api_key: lookup("SPEECH_API_KEY").filter(|k| !k.is_empty()),
            recognition_uri: lookup("SPEECH_RECOGNITION_URI")
                .unwrap_or_else(|| DEFAULT_RECOGNITION_URI.to_string()),
            token_uri: lookup("SPEECH_TOKEN_URI").unwrap_or_else(|| DEFAULT_TOKEN_URI.to_string()),
            locale: lookup("SPEECH_LOCALE").unwrap_or_else(|| "en-US".to_string()),
            timeout: lookup("SPEECH_TIMEOUT_SECS")
                .and_then(|s| s.parse().ok())
                .map_or(DEFAULT_TRANSCRIPTION_TIMEOUT, Duration::from_secs),
        }
    }
}
