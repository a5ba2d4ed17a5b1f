//! Cognitive Services speech recognition provider

use super::auth::TokenProvider;
use super::{RecognitionResponse, Transcriber, TranscriptionError, TranscriptionErrorKind, Utterance};
use crate::config::SpeechConfig;
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

const AUDIO_CONTENT_TYPE: &str = "audio/wav; codec=\"audio/pcm\"; samplerate=16000";

/// REST speech-to-text client
pub struct CognitiveSpeechService {
    client: Client,
    recognition_uri: String,
    subscription_key: String,
    locale: String,
    tokens: TokenProvider,
}

impl CognitiveSpeechService {
    pub fn new(config: &SpeechConfig, api_key: String) -> Result<Self, TranscriptionError> {
        let client = Client::builder()
            .timeout(config.timeout + Duration::from_secs(5))
            .build()
            .map_err(|e| TranscriptionError::network(format!("failed to create HTTP client: {e}")))?;

        let tokens = TokenProvider::new(client.clone(), config.token_uri.clone(), api_key.clone());

        Ok(Self {
            client,
            recognition_uri: config.recognition_uri.clone(),
            subscription_key: api_key,
            locale: config.locale.clone(),
            tokens,
        })
    }

    async fn recognize(&self, audio: &[u8], token: &str) -> Result<Utterance, TranscriptionError> {
        let request_id = uuid::Uuid::new_v4().to_string();
        let response = self
            .client
            .post(&self.recognition_uri)
            .query(&[
                ("language", self.locale.as_str()),
                ("format", "simple"),
                ("requestid", request_id.as_str()),
            ])
            .bearer_auth(token)
            .header("Ocp-Apim-Subscription-Key", &self.subscription_key)
            .header(reqwest::header::CONTENT_TYPE, AUDIO_CONTENT_TYPE)
            .body(audio.to_vec())
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(TranscriptionError::from_status(status.as_u16(), &body));
        }

        let parsed = RecognitionResponse::parse(&body)
            .map_err(|e| TranscriptionError::provider(format!("unreadable recognition response: {e}")))?;
        tracing::debug!(
            request_id = %request_id,
            status = ?parsed.recognition_status,
            "Recognition response decoded"
        );
        Ok(parsed.transcript().into())
    }
}

#[async_trait]
impl Transcriber for CognitiveSpeechService {
    async fn transcribe(&self, audio: &[u8]) -> Result<Utterance, TranscriptionError> {
        let token = self.tokens.access_token().await?;
        let result = self.recognize(audio, &token).await;
        if let Err(e) = &result {
            if e.kind == TranscriptionErrorKind::Auth {
                self.tokens.invalidate().await;
            }
        }
        result
    }

    fn provider_name(&self) -> &str {
        "cognitive-speech"
    }
}
