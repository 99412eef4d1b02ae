use crate::error::AppError;
use std::time::Duration;

/// Longest raw provider body carried in a diagnostic
const MAX_RAW_DIAGNOSTIC: usize = 4096;

#[derive(Debug, thiserror::Error)]
pub enum TtsServiceError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("provider rejected the request with status {status}")]
    ProviderRejected { status: u16, body: String },
    #[error("provider unavailable: {0}")]
    ProviderUnavailable(String),
    #[error("provider job failed: {0}")]
    ProviderJobFailed(String),
    #[error("unrecognized provider output: {reason}")]
    UnrecognizedOutputShape { reason: String, raw: String },
    #[error("no result after {} polls ({}s budget)", .attempts, .budget.as_secs())]
    Timeout { attempts: u32, budget: Duration },
    #[error("synthesis cancelled")]
    Cancelled,
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl TtsServiceError {
    pub fn unrecognized(reason: impl Into<String>, raw: &str) -> Self {
        Self::UnrecognizedOutputShape {
            reason: reason.into(),
            raw: truncate(raw, MAX_RAW_DIAGNOSTIC),
        }
    }
}

fn truncate(raw: &str, max: usize) -> String {
    if raw.len() <= max {
        return raw.to_string();
    }
    let mut end = max;
    while !raw.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}…", &raw[..end])
}

impl From<TtsServiceError> for AppError {
    fn from(err: TtsServiceError) -> Self {
        match err {
            TtsServiceError::InvalidInput(msg) => AppError::BadRequest(msg),
            TtsServiceError::ProviderRejected { status, body } => AppError::BadGateway {
                message: format!("Provider rejected the request ({})", status),
                details: Some(truncate(&body, MAX_RAW_DIAGNOSTIC)).filter(|b| !b.is_empty()),
            },
            TtsServiceError::ProviderUnavailable(msg) => AppError::BadGateway {
                message: "Provider unavailable".to_string(),
                details: Some(msg),
            },
            TtsServiceError::ProviderJobFailed(reason) => AppError::BadGateway {
                message: "Provider job failed".to_string(),
                details: Some(reason),
            },
            TtsServiceError::UnrecognizedOutputShape { reason, raw } => AppError::BadGateway {
                message: format!("Unrecognized provider output: {}", reason),
                details: Some(raw),
            },
            err @ TtsServiceError::Timeout { .. } => AppError::GatewayTimeout(err.to_string()),
            TtsServiceError::Cancelled => {
                AppError::ServiceUnavailable("synthesis cancelled".to_string())
            }
            TtsServiceError::Other(e) => AppError::Internal(format!("{:#}", e)),
        }
    }
}
