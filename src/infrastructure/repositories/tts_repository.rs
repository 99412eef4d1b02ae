use crate::domain::tts::{AudioPayload, TtsServiceError};
use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

/// Repository for TTS synthesis operations.
/// Abstracts the hosted inference provider.
///
/// Implementations are responsible for:
/// - Choosing between the provider's synchronous and asynchronous endpoints
/// - Waiting for queued jobs to finish
/// - Normalizing whatever output layout the provider returns
#[async_trait]
pub trait TtsRepository: Send + Sync {
    /// Synthesize text to speech
    ///
    /// Returns the canonical MP3 payload
    ///
    /// # Arguments
    /// * `text` - Trimmed, validated text
    /// * `cancel` - Stops polling when triggered
    ///
    /// # Errors
    /// Returns a terminal error; there is never a partial payload
    async fn synthesize(
        &self,
        text: &str,
        cancel: &CancellationToken,
    ) -> Result<AudioPayload, TtsServiceError>;
}
