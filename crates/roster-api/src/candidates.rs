//! Handlers for `/candidates` endpoints.
//!
//! | Method  | Path | Notes |
//! |---------|------|-------|
//! | `GET`   | `/candidates` | `?search&stage&jobId&page&pageSize` |
//! | `POST`  | `/candidates` | Body: [`NewCandidate`]; 201 |
//! | `GET`   | `/candidates/{id}` | 404 if not found |
//! | `PATCH` | `/candidates/{id}` | Body: `{stage?, notes?, note?}` |
//! | `GET`   | `/candidates/{id}/timeline` | Oldest event first |

use std::sync::Arc;

use axum::{
  Json,
  extract::State,
  http::StatusCode,
  response::IntoResponse,
};
use roster_core::{
  candidate::{Candidate, CandidatePatch, NewCandidate, Stage, TimelineEvent},
  page::Page,
  store::{CandidateQuery, HiringStore},
  validation::{ValidationErrors, field_errors},
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{
  error::ApiError,
  extract::{JsonBody, Path, Query},
  query::{empty_string_as_none, page_request},
};

fn not_found(id: Uuid) -> ApiError {
  ApiError::NotFound(format!("candidate {id} not found"))
}

// ─── List ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListParams {
  #[serde(default, deserialize_with = "empty_string_as_none")]
  pub search:    Option<String>,
  #[serde(default, deserialize_with = "empty_string_as_none")]
  pub stage:     Option<Stage>,
  #[serde(default, deserialize_with = "empty_string_as_none")]
  pub job_id:    Option<Uuid>,
  #[serde(default, deserialize_with = "empty_string_as_none")]
  pub page:      Option<u32>,
  #[serde(default, deserialize_with = "empty_string_as_none")]
  pub page_size: Option<u32>,
}

/// `GET /candidates`
pub async fn list<S: HiringStore>(
  State(store): State<Arc<S>>,
  Query(params): Query<ListParams>,
) -> Result<Json<Page<Candidate>>, ApiError> {
  let query = CandidateQuery {
    search: params.search,
    stage:  params.stage,
    job_id: params.job_id,
    page:   page_request(params.page, params.page_size)?,
  };
  let page = store.list_candidates(&query).await.map_err(ApiError::store)?;
  Ok(Json(page))
}

// ─── Create ───────────────────────────────────────────────────────────────────

/// `POST /candidates`
pub async fn create<S: HiringStore>(
  State(store): State<Arc<S>>,
  JsonBody(body): JsonBody<NewCandidate>,
) -> Result<impl IntoResponse, ApiError> {
  let mut errs = field_errors(&body);
  if store
    .get_job(body.job_id)
    .await
    .map_err(ApiError::store)?
    .is_none()
  {
    errs.add("jobId", "Job does not exist");
  }
  ApiError::check(errs)?;

  let candidate = store.create_candidate(body).await.map_err(ApiError::store)?;
  tracing::info!(candidate_id = %candidate.id, job_id = %candidate.job_id, "candidate created");
  Ok((StatusCode::CREATED, Json(candidate)))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /candidates/{id}`
pub async fn get_one<S: HiringStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<Candidate>, ApiError> {
  let candidate = store
    .get_candidate(id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| not_found(id))?;
  Ok(Json(candidate))
}

// ─── Update ───────────────────────────────────────────────────────────────────

/// `PATCH /candidates/{id}`
///
/// A `stage` different from the current one appends a timeline event
/// carrying `note`.
pub async fn update<S: HiringStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
  JsonBody(patch): JsonBody<CandidatePatch>,
) -> Result<Json<Candidate>, ApiError> {
  if patch.stage.is_none() && patch.notes.is_none() {
    let mut errs = ValidationErrors::new();
    errs.add("stage", "Nothing to update");
    return Err(ApiError::Validation(errs));
  }

  let stage = patch.stage;
  let candidate = store
    .update_candidate(id, patch)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| not_found(id))?;

  if let Some(stage) = stage {
    tracing::info!(candidate_id = %id, %stage, "candidate stage set");
  }
  Ok(Json(candidate))
}

// ─── Timeline ─────────────────────────────────────────────────────────────────

/// `GET /candidates/{id}/timeline`
pub async fn timeline<S: HiringStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<Vec<TimelineEvent>>, ApiError> {
  store
    .get_candidate(id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| not_found(id))?;

  let events = store.timeline(id).await.map_err(ApiError::store)?;
  Ok(Json(events))
}
