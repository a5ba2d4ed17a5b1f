//! Recognition result types

use serde::Deserialize;

/// Raw recognition result for one recording turn
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Utterance {
    pub text: String,
    /// False when the provider returned no usable transcript
    pub recognized: bool,
}

impl Utterance {
    pub fn recognized(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            recognized: true,
        }
    }

    /// Provider signalled that no speech was detected
    pub fn silent() -> Self {
        Self {
            text: String::new(),
            recognized: false,
        }
    }
}

/// Typed view of the provider's "simple" recognition response.
///
/// Both fields are optional: the provider omits `DisplayText` when it hears
/// nothing.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RecognitionResponse {
    #[serde(rename = "RecognitionStatus", default)]
    pub recognition_status: Option<String>,
    #[serde(rename = "DisplayText", default)]
    pub display_text: Option<String>,
}

/// Decoded transcript
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transcript {
    pub text: String,
    pub found: bool,
}

impl RecognitionResponse {
    /// Parse a response body; an empty body means no transcript
    pub fn parse(body: &str) -> Result<Self, serde_json::Error> {
        if body.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_json::from_str(body)
    }

    pub fn transcript(&self) -> Transcript {
        match self.display_text.as_deref().map(str::trim) {
            Some(text) if !text.is_empty() => Transcript {
                text: text.to_string(),
                found: true,
            },
            _ => Transcript {
                text: String::new(),
                found: false,
            },
        }
    }
}

impl From<Transcript> for Utterance {
    fn from(t: Transcript) -> Self {
        if t.found {
            Utterance::recognized(t.text)
        } else {
            Utterance::silent()
        }
    }
}
