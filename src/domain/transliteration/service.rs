use super::error::TransliterationError;
use crate::infrastructure::repositories::TransliterationRepository;
use moka::future::Cache;
use std::sync::Arc;
use std::time::Duration;

pub struct TransliterationService {
    repo: Arc<dyn TransliterationRepository>,
    cache: Option<Cache<String, String>>,
}

impl TransliterationService {
    pub fn new(repo: Arc<dyn TransliterationRepository>, cache_enabled: bool) -> Self {
        let cache = if cache_enabled {
            Some(
                Cache::builder()
                    .max_capacity(10_000)
                    .time_to_idle(Duration::from_secs(60 * 60))
                    .build(),
            )
        } else {
            None
        };

        Self { repo, cache }
    }

    /// First suggestion for `text`, or `text` itself when the lookup has none
    pub async fn transliterate(&self, text: &str) -> Result<String, TransliterationError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(TransliterationError::Invalid("Text required".to_string()));
        }

        if let Some(cache) = &self.cache {
            if let Some(cached) = cache.get(text).await {
                tracing::debug!(text_length = text.len(), "Transliteration cache hit");
                return Ok(cached);
            }
        }

        let result = match self.repo.first_suggestion(text).await? {
            Some(suggestion) => suggestion,
            None => {
                tracing::debug!("No transliteration suggestion, echoing input");
                text.to_string()
            }
        };

        if let Some(cache) = &self.cache {
            cache.insert(text.to_string(), result.clone()).await;
        }

        Ok(result)
    }
}
