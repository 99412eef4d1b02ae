use super::payload::AudioPayload;
use serde::{Deserialize, Serialize};

/// Request for POST /api/tts
#[derive(Debug, Serialize, Deserialize)]
pub struct TtsRequest {
    #[serde(default)]
    pub text: String,
}

/// Response for POST /api/tts
#[derive(Debug, Serialize, Deserialize)]
pub struct TtsResponse {
    pub audio_base64: String,
    #[serde(rename = "mimeType")]
    pub mime_type: String,
}

impl From<&AudioPayload> for TtsResponse {
    fn from(payload: &AudioPayload) -> Self {
        Self {
            audio_base64: payload.to_base64(),
            mime_type: payload.mime_type.to_string(),
        }
    }
}
