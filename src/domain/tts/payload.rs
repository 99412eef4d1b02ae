use base64::{
    alphabet,
    engine::{general_purpose::STANDARD, DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig},
    Engine,
};
use serde::{Deserialize, Serialize};

/// MIME type of every payload the provider produces
pub const AUDIO_MPEG: &str = "audio/mpeg";

/// Accepts base64 with or without trailing padding
const LENIENT: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AudioEncoding {
    Base64,
}

/// Canonical audio returned to callers, decoupled from whichever provider
/// shape it was extracted from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioPayload {
    pub encoding: AudioEncoding,
    pub mime_type: &'static str,
    pub data: Vec<u8>,
}

impl AudioPayload {
    pub fn from_bytes(data: Vec<u8>) -> Self {
        Self {
            encoding: AudioEncoding::Base64,
            mime_type: AUDIO_MPEG,
            data,
        }
    }

    /// Decode a provider base64 string. A `data:<mime>;base64,` prefix is
    /// stripped first. Returns `None` for undecodable or empty audio.
    pub fn from_base64(encoded: &str) -> Option<Self> {
        let encoded = strip_data_uri(encoded.trim());
        let data = LENIENT.decode(encoded).ok()?;
        if data.is_empty() {
            return None;
        }
        Some(Self::from_bytes(data))
    }

    /// Canonical padded standard base64
    pub fn to_base64(&self) -> String {
        STANDARD.encode(&self.data)
    }
}

fn strip_data_uri(value: &str) -> &str {
    if !value.starts_with("data:") {
        return value;
    }
    match value.find(";base64,") {
        Some(idx) => &value[idx + ";base64,".len()..],
        None => value,
    }
}
