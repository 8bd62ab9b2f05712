//! API client: the only module in the crate that performs network I/O
//! against the ATS backend.
//!
//! Reads (`GET`) are idempotent and retried on 429 / 5xx with exponential
//! backoff. Writes (`POST`) are sent exactly once; an accepted write is
//! reported as an [`Ack`] and callers refetch to see its effect.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::errors::TrackerError;
use crate::models::requirement::SuggestedRequirement;
use crate::models::screening::{ScreeningRequest, ScreeningResult};
use crate::models::{CandidateId, RequirementId, StageUpdate, TrackerRecord};

pub mod wire;

pub use wire::Ack;

const TRACKER_PATH: &str = "/api/candidate-tracker";
const UPDATE_STAGE_PATH: &str = "/api/update-stage-status";
const SCREEN_PATH: &str = "/api/screen-candidate";
const JD_TO_REQUIREMENT_PATH: &str = "/api/ai/jd-to-requirement";
const DEFAULT_RETRY_DELAY: Duration = Duration::from_millis(500);

/// Everything the tracker needs from the backend. [`TrackerSyncClient`] is
/// the HTTP implementation; tests drive the controller with in-memory fakes.
#[async_trait]
pub trait TrackerBackend: Send + Sync {
    async fn fetch_tracker(
        &self,
        candidate_id: &CandidateId,
    ) -> Result<Vec<TrackerRecord>, TrackerError>;

    async fn submit_stage_update(&self, update: &StageUpdate) -> Result<Ack, TrackerError>;

    async fn screen_candidate(
        &self,
        candidate_id: &CandidateId,
        requirement_id: &RequirementId,
    ) -> Result<ScreeningResult, TrackerError>;

    async fn suggest_requirement(&self, jd_text: &str)
        -> Result<SuggestedRequirement, TrackerError>;
}

#[derive(Serialize)]
struct JdRequest<'a> {
    jd_text: &'a str,
}

#[derive(Clone)]
pub struct TrackerSyncClient {
    client: Client,
    base_url: String,
    fetch_retries: u32,
    retry_delay: Duration,
}

impl TrackerSyncClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, TrackerError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| TrackerError::Validation(format!("HTTP client setup failed: {e}")))?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            fetch_retries: 3,
            retry_delay: DEFAULT_RETRY_DELAY,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, TrackerError> {
        Ok(Self::new(
            config.api_base_url.clone(),
            Duration::from_secs(config.request_timeout_secs),
        )?
        .with_fetch_retries(config.fetch_retries))
    }

    pub fn with_fetch_retries(mut self, retries: u32) -> Self {
        self.fetch_retries = retries;
        self
    }

    /// Base delay of the backoff; attempt `n` waits `delay * 2^(n-1)`.
    pub fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = delay;
        self
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// GET with retry on transport errors, 429 and 5xx. Returns status and raw body.
    async fn get_with_retry(&self, url: &str) -> Result<(u16, String), TrackerError> {
        let mut last_error: Option<TrackerError> = None;

        for attempt in 0..=self.fetch_retries {
            if attempt > 0 {
                let delay = self.retry_delay * (1u32 << (attempt - 1).min(16));
                warn!(
                    "GET {} attempt {} failed, retrying after {}ms...",
                    url,
                    attempt,
                    delay.as_millis()
                );
                tokio::time::sleep(delay).await;
            }

            let response = match self.client.get(url).send().await {
                Ok(r) => r,
                Err(e) => {
                    last_error = Some(TrackerError::from(e));
                    continue;
                }
            };

            let status = response.status();
            let body = match response.text().await {
                Ok(body) => body,
                Err(e) => {
                    last_error = Some(TrackerError::from(e));
                    continue;
                }
            };

            if status.as_u16() == 429 || status.is_server_error() {
                warn!("GET {} returned {}", url, status);
                last_error = Some(wire::bad_response(status.as_u16(), "server error", &body));
                continue;
            }

            return Ok((status.as_u16(), body));
        }

        Err(last_error.unwrap_or_else(|| {
            TrackerError::Unreachable(format!("no attempt was made for {url}"))
        }))
    }

    /// Single-shot POST. Returns status and raw body.
    async fn post_json<B: Serialize + ?Sized>(
        &self,
        url: &str,
        body: &B,
    ) -> Result<(u16, String), TrackerError> {
        let response = self.client.post(url).json(body).send().await?;
        let status = response.status().as_u16();
        let text = response.text().await?;
        Ok((status, text))
    }
}

#[async_trait]
impl TrackerBackend for TrackerSyncClient {
    async fn fetch_tracker(
        &self,
        candidate_id: &CandidateId,
    ) -> Result<Vec<TrackerRecord>, TrackerError> {
        let url = self.url(&format!("{TRACKER_PATH}/{candidate_id}"));
        let (status, body) = self.get_with_retry(&url).await?;
        let records = wire::decode_tracker(status, &body)?;
        debug!(
            "Fetched tracker for candidate {}: {} record(s)",
            candidate_id,
            records.len()
        );
        Ok(records)
    }

    async fn submit_stage_update(&self, update: &StageUpdate) -> Result<Ack, TrackerError> {
        let url = self.url(UPDATE_STAGE_PATH);
        let (status, body) = self.post_json(&url, update).await?;
        let ack = wire::decode_ack(status, &body)?;
        info!(
            "Stage update accepted: candidate={} requirement={} stage={} status={}",
            update.candidate_id, update.requirement_id, update.stage_id, update.status
        );
        Ok(ack)
    }

    async fn screen_candidate(
        &self,
        candidate_id: &CandidateId,
        requirement_id: &RequirementId,
    ) -> Result<ScreeningResult, TrackerError> {
        let url = self.url(SCREEN_PATH);
        let request = ScreeningRequest {
            candidate_id: candidate_id.clone(),
            requirement_id: requirement_id.clone(),
        };
        let (status, body) = self.post_json(&url, &request).await?;
        wire::decode_screening(status, &body)
    }

    async fn suggest_requirement(
        &self,
        jd_text: &str,
    ) -> Result<SuggestedRequirement, TrackerError> {
        let url = self.url(JD_TO_REQUIREMENT_PATH);
        let (status, body) = self.post_json(&url, &JdRequest { jd_text }).await?;
        wire::decode_suggestion(status, &body)
    }
}
