use secrecy::SecretString;
use std::env;
use std::time::Duration;

#[derive(Debug)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub environment: Environment,
    pub log_format: LogFormat,
    // RunPod provider
    pub runpod_base_url: String,
    pub runpod_endpoint_id: String,
    pub runpod_api_key: SecretString,
    // Synthesis
    pub submission_mode: SubmissionMode,
    pub sync_timeout_secs: u64,
    pub request_timeout_secs: u64,
    pub poll_interval_ms: u64,
    pub poll_max_attempts: u32,
    pub max_text_chars: usize,
    pub max_audio_bytes: usize,
    // Transliteration
    pub transliteration_url: String,
    pub transliteration_input_tool: String,
    pub transliteration_cache_enabled: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Environment {
    Development,
    Production,
}

#[derive(Debug, Clone, PartialEq)]
pub enum LogFormat {
    Pretty,
    Json,
}

/// Which provider endpoint receives the first submission
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionMode {
    /// `runsync` first, `run` on provider unavailability
    Sync,
    /// `run` only
    Async,
}

impl SubmissionMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubmissionMode::Sync => "sync",
            SubmissionMode::Async => "async",
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    Missing(&'static str),
    #[error("invalid value for {key}: {value:?}")]
    Invalid { key: &'static str, value: String },
}

impl Config {
    pub fn from_env() -> Result<Self, Box<dyn std::error::Error>> {
        dotenvy::dotenv().ok();

        Ok(Self::from_lookup(|key| env::var(key).ok())?)
    }

    /// Build the configuration from any key/value source
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &'static str, default: &str| -> String {
            lookup(key).unwrap_or_else(|| default.to_string())
        };
        let required = |key: &'static str| -> Result<String, ConfigError> {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .ok_or(ConfigError::Missing(key))
        };

        let config = Config {
            host: var("HOST", "0.0.0.0"),
            port: parse("PORT", var("PORT", "8080"))?,
            environment: match var("ENVIRONMENT", "development").as_str() {
                "production" => Environment::Production,
                _ => Environment::Development,
            },
            log_format: match var("LOG_FORMAT", "pretty").as_str() {
                "json" => LogFormat::Json,
                _ => LogFormat::Pretty,
            },
            runpod_base_url: var("RUNPOD_BASE_URL", "https://api.runpod.ai/v2")
                .trim_end_matches('/')
                .to_string(),
            runpod_endpoint_id: required("RUNPOD_ENDPOINT_ID")?,
            runpod_api_key: SecretString::from(required("RUNPOD_API_KEY")?),
            submission_mode: match var("TTS_SUBMISSION_MODE", "sync").to_lowercase().as_str() {
                "sync" => SubmissionMode::Sync,
                "async" => SubmissionMode::Async,
                other => {
                    return Err(ConfigError::Invalid {
                        key: "TTS_SUBMISSION_MODE",
                        value: other.to_string(),
                    })
                }
            },
            sync_timeout_secs: positive("TTS_SYNC_TIMEOUT_SECS", var("TTS_SYNC_TIMEOUT_SECS", "90"))?,
            request_timeout_secs: positive(
                "TTS_REQUEST_TIMEOUT_SECS",
                var("TTS_REQUEST_TIMEOUT_SECS", "30"),
            )?,
            poll_interval_ms: positive("TTS_POLL_INTERVAL_MS", var("TTS_POLL_INTERVAL_MS", "2000"))?,
            poll_max_attempts: positive(
                "TTS_POLL_MAX_ATTEMPTS",
                var("TTS_POLL_MAX_ATTEMPTS", "60"),
            )?,
            max_text_chars: positive("TTS_MAX_TEXT_CHARS", var("TTS_MAX_TEXT_CHARS", "10000"))?,
            max_audio_bytes: positive(
                "TTS_MAX_AUDIO_BYTES",
                var("TTS_MAX_AUDIO_BYTES", "20971520"),
            )?,
            transliteration_url: var(
                "TRANSLITERATION_URL",
                "https://inputtools.google.com/request",
            ),
            transliteration_input_tool: var("TRANSLITERATION_INPUT_TOOL", "te-t-i0-und"),
            transliteration_cache_enabled: var("TRANSLITERATION_CACHE_ENABLED", "false")
                .to_lowercase()
                == "true",
        };

        if config
            .poll_interval()
            .checked_mul(config.poll_max_attempts)
            .is_none()
        {
            return Err(ConfigError::Invalid {
                key: "TTS_POLL_MAX_ATTEMPTS",
                value: config.poll_max_attempts.to_string(),
            });
        }

        Ok(config)
    }

    pub fn is_development(&self) -> bool {
        self.environment == Environment::Development
    }

    /// `{base}/{endpoint_id}`, the prefix of every provider route
    pub fn runpod_endpoint_url(&self) -> String {
        format!("{}/{}", self.runpod_base_url, self.runpod_endpoint_id)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    /// Longest time a single request may spend polling
    pub fn poll_budget(&self) -> Duration {
        self.poll_interval().saturating_mul(self.poll_max_attempts)
    }
}

fn parse<T: std::str::FromStr>(key: &'static str, value: String) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::Invalid { key, value })
}

fn positive<T>(key: &'static str, value: String) -> Result<T, ConfigError>
where
    T: std::str::FromStr + PartialOrd + Default,
{
    let parsed: T = parse(key, value.clone())?;
    if parsed <= T::default() {
        return Err(ConfigError::Invalid { key, value });
    }
    Ok(parsed)
}
