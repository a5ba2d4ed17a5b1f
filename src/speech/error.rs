//! Transcription error types

use thiserror::Error;

/// Transcription error with classification
#[derive(Debug, Clone, Error)]
#[error("{kind}: {message}")]
pub struct TranscriptionError {
    pub kind: TranscriptionErrorKind,
    pub message: String,
}

impl TranscriptionError {
    pub fn new(kind: TranscriptionErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::new(TranscriptionErrorKind::Network, message)
    }

    pub fn timeout(message: impl Into<String>) -> Self {
        Self::new(TranscriptionErrorKind::Timeout, message)
    }

    pub fn auth(message: impl Into<String>) -> Self {
        Self::new(TranscriptionErrorKind::Auth, message)
    }

    pub fn rate_limit(message: impl Into<String>) -> Self {
        Self::new(TranscriptionErrorKind::RateLimit, message)
    }

    pub fn provider(message: impl Into<String>) -> Self {
        Self::new(TranscriptionErrorKind::Provider, message)
    }

    pub fn invalid_audio(message: impl Into<String>) -> Self {
        Self::new(TranscriptionErrorKind::InvalidAudio, message)
    }

    /// Classify a non-success HTTP status from the provider
    pub fn from_status(status: u16, body: &str) -> Self {
        let message = format!("HTTP {status}: {body}");
        match status {
            401 | 403 => Self::auth(message),
            429 => Self::rate_limit(message),
            _ => Self::provider(message),
        }
    }
}

/// Error classification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TranscriptionErrorKind {
    /// Connection failures
    Network,
    /// The round trip exceeded the configured bound
    Timeout,
    /// Subscription key or token rejected (401, 403)
    Auth,
    /// Rate limited (429)
    RateLimit,
    /// Any other non-success response
    Provider,
    /// Audio rejected before sending (empty or oversized)
    InvalidAudio,
}

impl std::fmt::Display for TranscriptionErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Network => "network",
            Self::Timeout => "timeout",
            Self::Auth => "auth",
            Self::RateLimit => "rate_limit",
            Self::Provider => "provider",
            Self::InvalidAudio => "invalid_audio",
        };
        f.write_str(name)
    }
}

impl From<reqwest::Error> for TranscriptionError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            Self::timeout(e.to_string())
        } else {
            Self::network(e.to_string())
        }
    }
}
