use super::error::TtsServiceError;
use super::payload::AudioPayload;
use crate::infrastructure::repositories::TtsRepository;
use async_trait::async_trait;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

pub struct TtsService {
    tts_repo: Arc<dyn TtsRepository>,
    max_text_chars: usize,
}

impl TtsService {
    pub fn new(tts_repo: Arc<dyn TtsRepository>, max_text_chars: usize) -> Self {
        Self {
            tts_repo,
            max_text_chars,
        }
    }
}

#[async_trait]
pub trait TtsServiceApi: Send + Sync {
    /// Synthesize text to speech
    ///
    /// This operation:
    /// - Rejects blank or oversized text without calling the provider
    /// - Submits the text and waits for the provider's job to finish
    /// - Returns the normalized audio
    ///
    /// `cancel` stops any outstanding polling when triggered.
    async fn synthesize(
        &self,
        text: String,
        cancel: CancellationToken,
    ) -> Result<AudioPayload, TtsServiceError>;
}

#[async_trait]
impl TtsServiceApi for TtsService {
    async fn synthesize(
        &self,
        text: String,
        cancel: CancellationToken,
    ) -> Result<AudioPayload, TtsServiceError> {
        let text = self.validate(&text)?;

        tracing::info!(
            text_length = text.chars().count(),
            "TTS synthesis request"
        );

        let start_time = std::time::Instant::now();
        let payload = self.tts_repo.synthesize(text, &cancel).await?;

        tracing::info!(
            latency_ms = start_time.elapsed().as_millis(),
            audio_size_bytes = payload.data.len(),
            "TTS synthesis completed"
        );

        Ok(payload)
    }
}

impl TtsService {
    fn validate<'a>(&self, text: &'a str) -> Result<&'a str, TtsServiceError> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(TtsServiceError::InvalidInput("Text is required".to_string()));
        }

        if trimmed.chars().count() > self.max_text_chars {
            return Err(TtsServiceError::InvalidInput(format!(
                "Text must be {} characters or less",
                self.max_text_chars
            )));
        }

        Ok(trimmed)
    }
}
