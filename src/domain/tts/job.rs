use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;

/// An asynchronous job accepted by the provider. Lives only as long as the
/// poll loop that tracks it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderJob {
    pub id: String,
    pub submitted_at: DateTime<Utc>,
}

impl ProviderJob {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            submitted_at: Utc::now(),
        }
    }
}

/// Job status as reported by the provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobStatus {
    Queued,
    Running,
    Completed,
    Failed(String),
}

/// Body of `/run`, `/runsync` and `/status/{id}` responses.
///
/// Only the fields that steer the protocol are typed; the full body is kept
/// in `raw` because audio may also sit at the top level.
#[derive(Debug, Clone)]
pub struct ProviderResponse {
    pub id: Option<String>,
    pub status: Option<String>,
    pub output: Option<Value>,
    pub error: Option<Value>,
    pub raw: Value,
}

#[derive(Deserialize)]
struct Envelope {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    output: Option<Value>,
    #[serde(default)]
    error: Option<Value>,
}

impl ProviderResponse {
    /// Parse a provider body. Non-object JSON and invalid JSON are both
    /// rejected so callers can report the raw text.
    pub fn parse(body: &str) -> Result<Self, serde_json::Error> {
        let raw: Value = serde_json::from_str(body)?;
        if !raw.is_object() {
            return Err(serde::de::Error::custom("provider response is not a JSON object"));
        }
        let envelope: Envelope = serde_json::from_value(raw.clone())?;
        Ok(Self {
            id: envelope.id.filter(|id| !id.is_empty()),
            status: envelope.status,
            output: envelope.output.filter(|v| !v.is_null()),
            error: envelope.error.filter(|v| !v.is_null()),
            raw,
        })
    }

    /// Interpret the response. `None` means the shape says nothing about the
    /// job's progress.
    pub fn job_status(&self) -> Option<JobStatus> {
        match self.status.as_deref() {
            Some("COMPLETED") => Some(JobStatus::Completed),
            Some("FAILED") | Some("CANCELLED") | Some("TIMED_OUT") => {
                Some(JobStatus::Failed(self.failure_reason()))
            }
            Some("IN_QUEUE") => Some(JobStatus::Queued),
            Some("IN_PROGRESS") => Some(JobStatus::Running),
            _ => self.status_from_shape(),
        }
    }

    fn status_from_shape(&self) -> Option<JobStatus> {
        if self.output.is_some() || self.has_top_level_audio() {
            Some(JobStatus::Completed)
        } else if self.error.is_some() && self.id.is_none() {
            Some(JobStatus::Failed(self.failure_reason()))
        } else if self.id.is_some() && self.status.is_none() {
            Some(JobStatus::Queued)
        } else {
            None
        }
    }

    fn has_top_level_audio(&self) -> bool {
        ["audio_base64", "audio"]
            .iter()
            .any(|key| self.raw.get(key).and_then(Value::as_str).is_some_and(|s| !s.is_empty()))
    }

    fn failure_reason(&self) -> String {
        match &self.error {
            Some(Value::String(message)) => message.clone(),
            Some(other) => other.to_string(),
            None => match &self.status {
                Some(status) => format!("job ended with status {}", status),
                None => "unknown failure".to_string(),
            },
        }
    }
}
