//! Async HTTP client wrapping the Roster JSON API.

use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::{Client, RequestBuilder, StatusCode};
use roster_core::{
  assessment::Assessment,
  candidate::{Candidate, CandidatePatch, Stage, TimelineEvent},
  job::{Job, JobPatch, JobSort, JobStatus, NewJob},
  page::Page,
  store::BoardStats,
  validation::ValidationErrors,
};
use serde::{Deserialize, de::DeserializeOwned};
use serde_json::json;
use uuid::Uuid;

/// Connection settings for the Roster API.
#[derive(Debug, Clone)]
pub struct ApiConfig {
  pub base_url: String,
}

/// A non-success response, decoded from the API's `{"error", "fields"}` body.
#[derive(Debug, thiserror::Error)]
#[error("{status}: {message}")]
pub struct ApiFailure {
  pub status:  StatusCode,
  pub message: String,
  pub fields:  ValidationErrors,
}

impl ApiFailure {
  pub fn is_not_found(&self) -> bool { self.status == StatusCode::NOT_FOUND }
}

/// `true` if `err` is an API 404.
pub fn is_not_found(err: &anyhow::Error) -> bool {
  err
    .downcast_ref::<ApiFailure>()
    .is_some_and(ApiFailure::is_not_found)
}

#[derive(Deserialize, Default)]
struct ErrorBody {
  #[serde(default)]
  error:  String,
  #[serde(default)]
  fields: ValidationErrors,
}

/// Query for `GET /jobs`.
#[derive(Debug, Clone, Default)]
pub struct JobFilter {
  pub search:    String,
  pub status:    Option<JobStatus>,
  pub sort:      JobSort,
  pub page:      u32,
  pub page_size: u32,
}

/// Async HTTP client for the Roster JSON REST API.
///
/// Cheap to clone: the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct ApiClient {
  client: Client,
  config: ApiConfig,
}

impl ApiClient {
  pub fn new(config: ApiConfig) -> Result<Self> {
    let client = Client::builder()
      .timeout(Duration::from_secs(30))
      .build()
      .context("failed to build HTTP client")?;
    Ok(Self { client, config })
  }

  fn url(&self, path: &str) -> String {
    format!(
      "{}/api{}",
      self.config.base_url.trim_end_matches('/'),
      path
    )
  }

  /// Send `req`, turning a non-success status into an [`ApiFailure`].
  async fn send(&self, req: RequestBuilder, what: &str) -> Result<reqwest::Response> {
    let resp = req.send().await.with_context(|| format!("{what} failed"))?;
    let status = resp.status();
    if status.is_success() {
      return Ok(resp);
    }
    let body: ErrorBody = resp.json().await.unwrap_or_default();
    tracing::debug!(what, %status, error = %body.error, "request rejected");
    Err(
      ApiFailure {
        status,
        message: if body.error.is_empty() {
          status.to_string()
        } else {
          body.error
        },
        fields: body.fields,
      }
      .into(),
    )
  }

  async fn fetch<T: DeserializeOwned>(&self, req: RequestBuilder, what: &str) -> Result<T> {
    let resp = self.send(req, what).await?;
    resp
      .json()
      .await
      .with_context(|| format!("deserialising {what}"))
  }

  // ── Jobs ──────────────────────────────────────────────────────────────────

  /// `GET /api/jobs`
  pub async fn list_jobs(&self, filter: &JobFilter) -> Result<Page<Job>> {
    let mut query = vec![
      ("search", filter.search.clone()),
      ("sort", filter.sort.to_string()),
      ("page", filter.page.to_string()),
      ("pageSize", filter.page_size.to_string()),
    ];
    if let Some(status) = filter.status {
      query.push(("status", status.to_string()));
    }
    let req = self.client.get(self.url("/jobs")).query(&query);
    self.fetch(req, "GET /jobs").await
  }

  /// `GET /api/jobs/{id}`
  pub async fn get_job(&self, id: Uuid) -> Result<Job> {
    let req = self.client.get(self.url(&format!("/jobs/{id}")));
    self.fetch(req, "GET /jobs/{id}").await
  }

  /// `POST /api/jobs`
  pub async fn create_job(&self, job: &NewJob) -> Result<Job> {
    let req = self.client.post(self.url("/jobs")).json(job);
    self.fetch(req, "POST /jobs").await
  }

  /// `PATCH /api/jobs/{id}`
  pub async fn update_job(&self, id: Uuid, patch: &JobPatch) -> Result<Job> {
    let req = self.client.patch(self.url(&format!("/jobs/{id}"))).json(patch);
    self.fetch(req, "PATCH /jobs/{id}").await
  }

  /// `DELETE /api/jobs/{id}`
  pub async fn delete_job(&self, id: Uuid) -> Result<()> {
    let req = self.client.delete(self.url(&format!("/jobs/{id}")));
    self.send(req, "DELETE /jobs/{id}").await?;
    Ok(())
  }

  /// `PATCH /api/jobs/{id}/reorder`
  pub async fn reorder_job(&self, id: Uuid, from_order: i64, to_order: i64) -> Result<Job> {
    let req = self
      .client
      .patch(self.url(&format!("/jobs/{id}/reorder")))
      .json(&json!({ "fromOrder": from_order, "toOrder": to_order }));
    self.fetch(req, "PATCH /jobs/{id}/reorder").await
  }

  // ── Candidates ────────────────────────────────────────────────────────────

  /// `GET /api/candidates`, one large page.
  pub async fn list_candidates(
    &self,
    stage: Option<Stage>,
    job_id: Option<Uuid>,
    page_size: u32,
  ) -> Result<Page<Candidate>> {
    let mut query = vec![("pageSize", page_size.to_string())];
    if let Some(stage) = stage {
      query.push(("stage", stage.to_string()));
    }
    if let Some(job_id) = job_id {
      query.push(("jobId", job_id.to_string()));
    }
    let req = self.client.get(self.url("/candidates")).query(&query);
    self.fetch(req, "GET /candidates").await
  }

  /// `GET /api/candidates/{id}`
  pub async fn get_candidate(&self, id: Uuid) -> Result<Candidate> {
    let req = self.client.get(self.url(&format!("/candidates/{id}")));
    self.fetch(req, "GET /candidates/{id}").await
  }

  /// `PATCH /api/candidates/{id}`
  pub async fn update_candidate(&self, id: Uuid, patch: &CandidatePatch) -> Result<Candidate> {
    let req = self
      .client
      .patch(self.url(&format!("/candidates/{id}")))
      .json(patch);
    self.fetch(req, "PATCH /candidates/{id}").await
  }

  /// `GET /api/candidates/{id}/timeline`
  pub async fn timeline(&self, id: Uuid) -> Result<Vec<TimelineEvent>> {
    let req = self.client.get(self.url(&format!("/candidates/{id}/timeline")));
    self.fetch(req, "GET /candidates/{id}/timeline").await
  }

  // ── Assessments ───────────────────────────────────────────────────────────

  /// `GET /api/assessments/{jobId}`; `None` when the job has none yet.
  pub async fn get_assessment(&self, job_id: Uuid) -> Result<Option<Assessment>> {
    let req = self.client.get(self.url(&format!("/assessments/{job_id}")));
    match self.fetch(req, "GET /assessments/{jobId}").await {
      Ok(a) => Ok(Some(a)),
      Err(e) if is_not_found(&e) => Ok(None),
      Err(e) => Err(e),
    }
  }

  /// `PUT /api/assessments/{jobId}`
  pub async fn save_assessment(&self, assessment: &Assessment) -> Result<Assessment> {
    let req = self
      .client
      .put(self.url(&format!("/assessments/{}", assessment.job_id)))
      .json(assessment);
    self.fetch(req, "PUT /assessments/{jobId}").await
  }

  // ── Dashboard ─────────────────────────────────────────────────────────────

  /// `GET /api/stats`
  pub async fn stats(&self) -> Result<BoardStats> {
    let req = self.client.get(self.url("/stats"));
    self.fetch(req, "GET /stats").await
  }
}
