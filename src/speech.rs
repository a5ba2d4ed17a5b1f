//! Speech-to-text abstraction
//!
//! The dialog engine only ever sees `TranscriptionGateway`, which puts a size
//! cap, a timeout, and logging around whichever provider is configured.

mod auth;
mod cognitive;
mod error;
mod types;

pub use cognitive::CognitiveSpeechService;
pub use error::{TranscriptionError, TranscriptionErrorKind};
pub use types::{RecognitionResponse, Utterance};

use async_trait::async_trait;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Maximum audio accepted for one recording (10 MiB)
pub const MAX_AUDIO_BYTES: usize = 10 * 1024 * 1024;

/// Default bound on one provider round trip
pub const DEFAULT_TRANSCRIPTION_TIMEOUT: Duration = Duration::from_secs(10);

/// Common interface for speech providers
#[async_trait]
pub trait Transcriber: Send + Sync {
    /// Turn recorded audio into an utterance
    async fn transcribe(&self, audio: &[u8]) -> Result<Utterance, TranscriptionError>;

    /// Provider name for logs
    fn provider_name(&self) -> &str;
}

#[async_trait]
impl<T: Transcriber + ?Sized> Transcriber for Arc<T> {
    async fn transcribe(&self, audio: &[u8]) -> Result<Utterance, TranscriptionError> {
        (**self).transcribe(audio).await
    }

    fn provider_name(&self) -> &str {
        (**self).provider_name()
    }
}

/// Bounded, logged access to a provider
#[derive(Clone)]
pub struct TranscriptionGateway {
    inner: Arc<dyn Transcriber>,
    timeout: Duration,
}

impl TranscriptionGateway {
    pub fn new(inner: Arc<dyn Transcriber>) -> Self {
        Self {
            inner,
            timeout: DEFAULT_TRANSCRIPTION_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub async fn transcribe(&self, audio: &[u8]) -> Result<Utterance, TranscriptionError> {
        if audio.is_empty() {
            return Err(TranscriptionError::invalid_audio("recording is empty"));
        }
        if audio.len() > MAX_AUDIO_BYTES {
            return Err(TranscriptionError::invalid_audio(format!(
                "recording is {} bytes (limit: {MAX_AUDIO_BYTES} bytes)",
                audio.len()
            )));
        }

        let start = Instant::now();
        let result = match tokio::time::timeout(self.timeout, self.inner.transcribe(audio)).await {
            Ok(result) => result,
            Err(_) => Err(TranscriptionError::timeout(format!(
                "no response after {} ms",
                self.timeout.as_millis()
            ))),
        };
        let duration = start.elapsed();

        match &result {
            Ok(utterance) => {
                tracing::info!(
                    provider = %self.inner.provider_name(),
                    duration_ms = %duration.as_millis(),
                    audio_bytes = audio.len(),
                    recognized = utterance.recognized,
                    "Transcription completed"
                );
            }
            Err(e) => {
                tracing::error!(
                    provider = %self.inner.provider_name(),
                    duration_ms = %duration.as_millis(),
                    kind = %e.kind,
                    error = %e.message,
                    "Transcription failed"
                );
            }
        }

        result
    }
}
