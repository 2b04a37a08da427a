use std::time::{Duration, Instant};

use log::debug;
use reqwest::StatusCode;

use crate::auth::Token;
use crate::error::{Result, SonarEvidenceError};

use super::types::{AnalysisResponse, QualityGateStatus, SonarTask, TaskResponse};

/// Quality gate endpoint template; `$analysisId` is replaced per request.
pub const ANALYSIS_URL: &str =
    "https://sonarcloud.io/api/qualitygates/project_status?analysisId=$analysisId";

const ANALYSIS_ID_TOKEN: &str = "$analysisId";
const HTTP_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
const POOL_IDLE_TIMEOUT: Duration = Duration::from_secs(10);

/// SonarQube web API client for the two status endpoints the pipeline needs.
///
/// One instance is built at startup and reused for both requests. Every
/// request honors the shared pipeline deadline in addition to the per-request
/// cap, so a stalled server cannot hold the process past its deadline.
pub struct SonarClient {
    client: reqwest::Client,
    token: Token,
    analysis_url: String,
}

impl SonarClient {
    pub fn new(token: Token) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("sonar-evidence/", env!("CARGO_PKG_VERSION")))
            .timeout(HTTP_REQUEST_TIMEOUT)
            .pool_idle_timeout(POOL_IDLE_TIMEOUT)
            .build()
            .map_err(|e| {
                SonarEvidenceError::Config(format!("Failed to create HTTP client: {e}"))
            })?;

        Ok(Self {
            client,
            token,
            analysis_url: ANALYSIS_URL.to_owned(),
        })
    }

    /// Override the quality gate endpoint template. The template must contain
    /// `$analysisId` exactly once.
    pub fn with_analysis_url(mut self, template: impl Into<String>) -> Self {
        self.analysis_url = template.into();
        self
    }

    /// Fetch the compute-engine task descriptor from `task_url`.
    pub async fn fetch_task(&self, task_url: &str, deadline: Instant) -> Result<SonarTask> {
        let body = self.get(task_url, deadline).await?;
        let response: TaskResponse =
            serde_json::from_str(&body).map_err(|source| SonarEvidenceError::Parse {
                url: task_url.to_owned(),
                body,
                source,
            })?;
        Ok(response.task)
    }

    /// Fetch the quality gate verdict for `analysis_id`.
    ///
    /// The id is substituted into the endpoint template with a single
    /// first-occurrence replace; it must not contain the literal `$analysisId`
    /// token. An empty id is passed through untouched and fails remotely.
    pub async fn fetch_quality_gate(
        &self,
        analysis_id: &str,
        deadline: Instant,
    ) -> Result<QualityGateStatus> {
        let url = self.analysis_url.replacen(ANALYSIS_ID_TOKEN, analysis_id, 1);
        let body = self.get(&url, deadline).await?;
        let response: AnalysisResponse =
            serde_json::from_str(&body).map_err(|source| SonarEvidenceError::Parse {
                url,
                body,
                source,
            })?;
        Ok(response.project_status)
    }

    /// Authenticated GET bounded by the remaining pipeline deadline.
    ///
    /// The body is read in full before the status code is inspected so that
    /// non-200 errors carry it for diagnostics.
    async fn get(&self, url: &str, deadline: Instant) -> Result<String> {
        let remaining = deadline.saturating_duration_since(Instant::now());
        let response = self
            .client
            .get(url)
            .bearer_auth(self.token.as_str())
            .timeout(remaining.min(HTTP_REQUEST_TIMEOUT))
            .send()
            .await
            .map_err(|source| SonarEvidenceError::Transport {
                url: url.to_owned(),
                source,
            })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|source| SonarEvidenceError::Transport {
                url: url.to_owned(),
                source,
            })?;

        if status != StatusCode::OK {
            return Err(SonarEvidenceError::RemoteStatus {
                url: url.to_owned(),
                status: status.as_u16(),
                body,
            });
        }

        debug!("GET {url} returned {status}");
        Ok(body)
    }
}
