use super::runpod_tts_repository::RunpodEndpoint;
use crate::domain::tts::{JobStatus, ProviderJob, ProviderResponse, TtsServiceError};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Fixed-cadence poll budget. `interval × max_attempts` is the longest a
/// request waits for a queued job.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollSettings {
    pub interval: Duration,
    pub max_attempts: u32,
}

impl PollSettings {
    pub fn timeout_budget(&self) -> Duration {
        self.interval.saturating_mul(self.max_attempts)
    }
}

/// Outcome of one status request that did not yield a usable response
enum PollFailure {
    /// Retry on the next attempt
    Transient(String),
    Terminal(TtsServiceError),
}

pub struct RunpodJobPoller {
    endpoint: Arc<RunpodEndpoint>,
    settings: PollSettings,
}

impl RunpodJobPoller {
    pub(super) fn new(endpoint: Arc<RunpodEndpoint>, settings: PollSettings) -> Self {
        Self { endpoint, settings }
    }

    /// Poll `/status/{id}` until the job completes or fails, the attempt
    /// budget runs out, or `cancel` fires.
    ///
    /// Always waits one interval before the first poll. Returns the
    /// completed response for normalization.
    pub async fn poll_until_done(
        &self,
        job: &ProviderJob,
        cancel: &CancellationToken,
    ) -> Result<ProviderResponse, TtsServiceError> {
        let route = format!("status/{}", urlencoding::encode(&job.id));
        let max_attempts = self.settings.max_attempts;

        for attempt in 1..=max_attempts {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    tracing::info!(job_id = %job.id, attempt, "Polling cancelled");
                    return Err(TtsServiceError::Cancelled);
                }
                _ = tokio::time::sleep(self.settings.interval) => {}
            }

            let fetched = tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    tracing::info!(job_id = %job.id, attempt, "Polling cancelled mid-request");
                    return Err(TtsServiceError::Cancelled);
                }
                fetched = self.fetch_status(&route) => fetched,
            };

            let response = match fetched {
                Ok(response) => response,
                Err(PollFailure::Transient(reason)) => {
                    tracing::warn!(
                        job_id = %job.id,
                        attempt,
                        max_attempts,
                        reason = %reason,
                        "Status poll failed, will retry"
                    );
                    continue;
                }
                Err(PollFailure::Terminal(err)) => return Err(err),
            };

            match response.job_status() {
                Some(JobStatus::Completed) => {
                    tracing::info!(
                        job_id = %job.id,
                        attempt,
                        elapsed_ms = (chrono::Utc::now() - job.submitted_at).num_milliseconds(),
                        "Provider job completed"
                    );
                    return Ok(response);
                }
                Some(JobStatus::Failed(reason)) => {
                    tracing::error!(job_id = %job.id, attempt, reason = %reason, "Provider job failed");
                    return Err(TtsServiceError::ProviderJobFailed(reason));
                }
                status => {
                    tracing::debug!(
                        job_id = %job.id,
                        attempt,
                        max_attempts,
                        status = ?status,
                        "Provider job pending"
                    );
                }
            }
        }

        tracing::error!(
            job_id = %job.id,
            max_attempts,
            budget_secs = self.settings.timeout_budget().as_secs(),
            "Provider job did not finish within the poll budget"
        );

        Err(TtsServiceError::Timeout {
            attempts: max_attempts,
            budget: self.settings.timeout_budget(),
        })
    }

    async fn fetch_status(&self, route: &str) -> Result<ProviderResponse, PollFailure> {
        let response = self
            .endpoint
            .get(route)
            .send()
            .await
            .map_err(|e| PollFailure::Transient(format!("request failed: {}", e)))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| PollFailure::Transient(format!("body unreadable: {}", e)))?;

        if status.is_client_error() {
            return Err(PollFailure::Terminal(TtsServiceError::ProviderRejected {
                status: status.as_u16(),
                body,
            }));
        }

        if !status.is_success() {
            return Err(PollFailure::Transient(format!("status endpoint returned {}", status)));
        }

        ProviderResponse::parse(&body)
            .map_err(|e| PollFailure::Transient(format!("malformed status body: {}", e)))
    }
}
