//! Extraction of the canonical audio payload from provider output.
//!
//! The provider's handlers have shipped several output layouts over time.
//! Each known layout is one rule; rules are tried in order and the first
//! match wins.

use super::error::TtsServiceError;
use super::payload::AudioPayload;
use serde_json::Value;

/// Where the audio for a completed job lives
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AudioSource {
    Inline(AudioPayload),
    /// The output only references the audio; the body of this URL is the raw audio
    Remote(String),
}

pub struct ExtractionRule {
    pub name: &'static str,
    extract: fn(&Value) -> Option<AudioPayload>,
}

impl ExtractionRule {
    pub fn apply(&self, body: &Value) -> Option<AudioPayload> {
        (self.extract)(body)
    }
}

/// Inline rules in priority order
pub const EXTRACTION_RULES: [ExtractionRule; 6] = [
    ExtractionRule {
        name: "output.audio_base64",
        extract: output_audio_base64,
    },
    ExtractionRule {
        name: "output.output.audio_base64",
        extract: double_wrapped_audio_base64,
    },
    ExtractionRule {
        name: "output.audio",
        extract: output_audio,
    },
    ExtractionRule {
        name: "output.b64",
        extract: output_b64,
    },
    ExtractionRule {
        name: "audio_base64",
        extract: top_level_audio_base64,
    },
    ExtractionRule {
        name: "audio",
        extract: top_level_audio,
    },
];

fn decode_at(body: &Value, path: &[&str]) -> Option<AudioPayload> {
    let mut node = body;
    for key in path {
        node = node.get(key)?;
    }
    node.as_str()
        .filter(|s| !s.trim().is_empty())
        .and_then(AudioPayload::from_base64)
}

fn output_audio_base64(body: &Value) -> Option<AudioPayload> {
    decode_at(body, &["output", "audio_base64"])
}

fn double_wrapped_audio_base64(body: &Value) -> Option<AudioPayload> {
    decode_at(body, &["output", "output", "audio_base64"])
}

fn output_audio(body: &Value) -> Option<AudioPayload> {
    decode_at(body, &["output", "audio"])
}

fn output_b64(body: &Value) -> Option<AudioPayload> {
    decode_at(body, &["output", "b64"])
}

fn top_level_audio_base64(body: &Value) -> Option<AudioPayload> {
    decode_at(body, &["audio_base64"])
}

fn top_level_audio(body: &Value) -> Option<AudioPayload> {
    decode_at(body, &["audio"])
}

fn remote_reference(body: &Value) -> Option<String> {
    let output = body.get("output")?;
    let candidate = match output {
        Value::String(url) => url.as_str(),
        other => other.get("url")?.as_str()?,
    };
    let candidate = candidate.trim();
    if candidate.starts_with("https://") || candidate.starts_with("http://") {
        Some(candidate.to_string())
    } else {
        None
    }
}

/// Find the audio in a completed provider response.
///
/// `body` is the whole response since some layouts put the audio next to
/// `output` rather than inside it.
pub fn normalize(body: &Value) -> Result<AudioSource, TtsServiceError> {
    for rule in &EXTRACTION_RULES {
        if let Some(payload) = rule.apply(body) {
            tracing::debug!(
                rule = rule.name,
                audio_size = payload.data.len(),
                "Provider output normalized"
            );
            return Ok(AudioSource::Inline(payload));
        }
    }

    if let Some(url) = remote_reference(body) {
        return Ok(AudioSource::Remote(url));
    }

    Err(TtsServiceError::unrecognized(
        "no decodable audio in provider output",
        &body.to_string(),
    ))
}
