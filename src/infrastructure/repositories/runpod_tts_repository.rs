use super::runpod_job_poller::{PollSettings, RunpodJobPoller};
use super::tts_repository::TtsRepository;
use crate::domain::tts::{
    normalize, AudioPayload, AudioSource, JobStatus, ProviderJob, ProviderResponse,
    TtsServiceError,
};
use crate::infrastructure::config::{Config, SubmissionMode};
use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Everything the RunPod client needs, detached from the process config
pub struct RunpodSettings {
    pub endpoint_url: String,
    pub api_key: SecretString,
    pub submission_mode: SubmissionMode,
    pub sync_timeout: Duration,
    pub request_timeout: Duration,
    pub poll: PollSettings,
    /// Ceiling for audio downloaded from a provider output URL
    pub max_audio_bytes: usize,
}

impl RunpodSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            endpoint_url: config.runpod_endpoint_url(),
            api_key: SecretString::from(config.runpod_api_key.expose_secret()),
            submission_mode: config.submission_mode,
            sync_timeout: Duration::from_secs(config.sync_timeout_secs),
            request_timeout: Duration::from_secs(config.request_timeout_secs),
            poll: PollSettings {
                interval: config.poll_interval(),
                max_attempts: config.poll_max_attempts,
            },
            max_audio_bytes: config.max_audio_bytes,
        }
    }
}

/// Authenticated access to one RunPod serverless endpoint
pub(super) struct RunpodEndpoint {
    http_client: reqwest::Client,
    endpoint_url: String,
    api_key: SecretString,
    pub(super) request_timeout: Duration,
}

impl RunpodEndpoint {
    pub(super) fn url(&self, route: &str) -> String {
        format!("{}/{}", self.endpoint_url, route)
    }

    pub(super) fn get(&self, route: &str) -> reqwest::RequestBuilder {
        self.http_client
            .get(self.url(route))
            .bearer_auth(self.api_key.expose_secret())
            .timeout(self.request_timeout)
    }

    fn post(&self, route: &str) -> reqwest::RequestBuilder {
        self.http_client
            .post(self.url(route))
            .bearer_auth(self.api_key.expose_secret())
    }
}

#[derive(Serialize)]
struct RunRequest<'a> {
    input: RunInput<'a>,
}

#[derive(Serialize)]
struct RunInput<'a> {
    text: &'a str,
}

/// RunPod implementation of the TTS repository
pub struct RunpodTtsRepository {
    endpoint: Arc<RunpodEndpoint>,
    http_client: reqwest::Client,
    submission_mode: SubmissionMode,
    sync_timeout: Duration,
    max_audio_bytes: usize,
    poller: RunpodJobPoller,
}

impl RunpodTtsRepository {
    pub fn new(http_client: reqwest::Client, settings: RunpodSettings) -> Self {
        let endpoint = Arc::new(RunpodEndpoint {
            http_client: http_client.clone(),
            endpoint_url: settings.endpoint_url,
            api_key: settings.api_key,
            request_timeout: settings.request_timeout,
        });
        let poller = RunpodJobPoller::new(endpoint.clone(), settings.poll);

        Self {
            endpoint,
            http_client,
            submission_mode: settings.submission_mode,
            sync_timeout: settings.sync_timeout,
            max_audio_bytes: settings.max_audio_bytes,
            poller,
        }
    }

    /// Submit the text, falling back from `runsync` to `run` when the sync
    /// endpoint is unavailable
    async fn submit_with_fallback(&self, text: &str) -> Result<ProviderResponse, TtsServiceError> {
        match self.submission_mode {
            SubmissionMode::Async => self.submit("run", text, self.endpoint.request_timeout).await,
            SubmissionMode::Sync => match self.submit("runsync", text, self.sync_timeout).await {
                Err(TtsServiceError::ProviderUnavailable(reason)) => {
                    tracing::warn!(
                        reason = %reason,
                        "Sync endpoint unavailable, falling back to async submission"
                    );
                    self.submit("run", text, self.endpoint.request_timeout).await
                }
                other => other,
            },
        }
    }

    /// POST one submission. 4xx is terminal, 5xx and transport failures are
    /// reported as `ProviderUnavailable`.
    async fn submit(
        &self,
        route: &str,
        text: &str,
        timeout: Duration,
    ) -> Result<ProviderResponse, TtsServiceError> {
        tracing::info!(
            route = route,
            text_length = text.chars().count(),
            timeout_secs = timeout.as_secs(),
            "Submitting synthesis job"
        );

        let body = RunRequest {
            input: RunInput { text },
        };

        let response = self
            .endpoint
            .post(route)
            .timeout(timeout)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(route = route, timed_out = e.is_timeout(), error = %e, "Provider request failed");
                TtsServiceError::ProviderUnavailable(format!("/{} request failed: {}", route, e))
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            TtsServiceError::ProviderUnavailable(format!("/{} body unreadable: {}", route, e))
        })?;

        if status.is_client_error() {
            tracing::error!(route = route, status = status.as_u16(), "Provider rejected submission");
            return Err(TtsServiceError::ProviderRejected {
                status: status.as_u16(),
                body,
            });
        }

        if status.is_server_error() {
            return Err(TtsServiceError::ProviderUnavailable(format!(
                "/{} returned {}",
                route, status
            )));
        }

        if !status.is_success() {
            return Err(TtsServiceError::unrecognized(
                format!("unexpected status {} from /{}", status, route),
                &body,
            ));
        }

        ProviderResponse::parse(&body).map_err(|e| {
            TtsServiceError::unrecognized(format!("non-JSON response from /{}: {}", route, e), &body)
        })
    }

    /// Wait for a queued job and return its normalized audio
    pub async fn await_completion(
        &self,
        job: &ProviderJob,
        cancel: &CancellationToken,
    ) -> Result<AudioPayload, TtsServiceError> {
        let response = self.poller.poll_until_done(job, cancel).await?;
        self.resolve(&response, cancel).await
    }

    async fn resolve(
        &self,
        response: &ProviderResponse,
        cancel: &CancellationToken,
    ) -> Result<AudioPayload, TtsServiceError> {
        match normalize(&response.raw)? {
            AudioSource::Inline(payload) => Ok(payload),
            AudioSource::Remote(url) => tokio::select! {
                biased;
                _ = cancel.cancelled() => Err(TtsServiceError::Cancelled),
                payload = self.fetch_remote_audio(&url) => payload,
            },
        }
    }

    /// Download audio the provider only linked to. The provider credential is
    /// not sent to the link's host.
    async fn fetch_remote_audio(&self, url: &str) -> Result<AudioPayload, TtsServiceError> {
        tracing::info!(url = url, "Fetching audio from provider output URL");

        let mut response = self
            .http_client
            .get(url)
            .timeout(self.endpoint.request_timeout)
            .send()
            .await
            .map_err(|e| TtsServiceError::ProviderUnavailable(format!("audio download failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(TtsServiceError::ProviderUnavailable(format!(
                "audio download returned {}",
                status
            )));
        }

        let too_large = || {
            TtsServiceError::unrecognized(
                format!("audio URL body exceeds {} bytes", self.max_audio_bytes),
                url,
            )
        };

        if response
            .content_length()
            .is_some_and(|len| len > self.max_audio_bytes as u64)
        {
            return Err(too_large());
        }

        // Content-Length is optional, so the cap also applies per chunk
        let mut data = Vec::new();
        while let Some(chunk) = response
            .chunk()
            .await
            .map_err(|e| TtsServiceError::ProviderUnavailable(format!("audio download failed: {}", e)))?
        {
            if data.len() + chunk.len() > self.max_audio_bytes {
                return Err(too_large());
            }
            data.extend_from_slice(&chunk);
        }

        if data.is_empty() {
            return Err(TtsServiceError::unrecognized("audio URL returned no bytes", url));
        }

        Ok(AudioPayload::from_bytes(data))
    }
}

#[async_trait]
impl TtsRepository for RunpodTtsRepository {
    async fn synthesize(
        &self,
        text: &str,
        cancel: &CancellationToken,
    ) -> Result<AudioPayload, TtsServiceError> {
        let response = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(TtsServiceError::Cancelled),
            response = self.submit_with_fallback(text) => response?,
        };

        match response.job_status() {
            Some(JobStatus::Completed) => self.resolve(&response, cancel).await,
            Some(JobStatus::Failed(reason)) => {
                tracing::error!(reason = %reason, "Provider reported immediate failure");
                Err(TtsServiceError::ProviderJobFailed(reason))
            }
            Some(JobStatus::Queued) | Some(JobStatus::Running) => match response.id {
                Some(id) => {
                    let job = ProviderJob::new(id);
                    tracing::info!(job_id = %job.id, "Provider queued job, polling for completion");
                    self.await_completion(&job, cancel).await
                }
                None => Err(TtsServiceError::unrecognized(
                    "pending status without a job id",
                    &response.raw.to_string(),
                )),
            },
            None => Err(TtsServiceError::unrecognized(
                "response carries no job id, status or output",
                &response.raw.to_string(),
            )),
        }
    }
}
