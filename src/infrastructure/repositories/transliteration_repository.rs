use crate::domain::transliteration::TransliterationError;
use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;

/// Lookup service turning romanized text into the target script
#[async_trait]
pub trait TransliterationRepository: Send + Sync {
    /// First suggestion for `text`, `None` when the service has none
    async fn first_suggestion(&self, text: &str) -> Result<Option<String>, TransliterationError>;
}

/// Google Input Tools implementation
pub struct GoogleInputToolsRepository {
    http_client: reqwest::Client,
    base_url: String,
    input_tool: String,
    timeout: Duration,
}

impl GoogleInputToolsRepository {
    pub fn new(
        http_client: reqwest::Client,
        base_url: String,
        input_tool: String,
        timeout: Duration,
    ) -> Self {
        Self {
            http_client,
            base_url,
            input_tool,
            timeout,
        }
    }

    fn request_url(&self, text: &str) -> String {
        format!(
            "{}?text={}&itc={}&num=1&cp=0&cs=1&ie=utf-8&oe=utf-8&app=demopage",
            self.base_url,
            urlencoding::encode(text),
            urlencoding::encode(&self.input_tool)
        )
    }
}

/// Responses look like `["SUCCESS",[["namaste",["నమస్తే",…],…]]]`
pub fn parse_suggestion(body: &Value) -> Option<String> {
    if body.get(0)?.as_str()? != "SUCCESS" {
        return None;
    }
    body.get(1)?
        .get(0)?
        .get(1)?
        .get(0)?
        .as_str()
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

#[async_trait]
impl TransliterationRepository for GoogleInputToolsRepository {
    async fn first_suggestion(&self, text: &str) -> Result<Option<String>, TransliterationError> {
        let response = self
            .http_client
            .get(self.request_url(text))
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Transliteration request failed");
                TransliterationError::Dependency(format!("network error: {}", e))
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(TransliterationError::Dependency(format!(
                "lookup returned {}",
                status
            )));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| TransliterationError::Dependency(format!("parse error: {}", e)))?;

        Ok(parse_suggestion(&body))
    }
}
