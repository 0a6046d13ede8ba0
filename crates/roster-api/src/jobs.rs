//! Handlers for `/jobs` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/jobs` | `?search&status&page&pageSize&sort` |
//! | `POST`   | `/jobs` | Body: [`NewJob`]; 201 |
//! | `GET`    | `/jobs/{id}` | 404 if not found |
//! | `PATCH`  | `/jobs/{id}` | Body: [`JobPatch`] |
//! | `DELETE` | `/jobs/{id}` | 204 |
//! | `PATCH`  | `/jobs/{id}/reorder` | Body: `{"fromOrder":3,"toOrder":1}`; 409 on a stale `fromOrder` |

use std::sync::Arc;

use axum::{
  Json,
  extract::State,
  http::StatusCode,
  response::IntoResponse,
};
use roster_core::{
  job::{Job, JobPatch, JobSort, JobStatus, NewJob},
  page::Page,
  store::{HiringStore, JobQuery},
  validation::field_errors,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{
  error::ApiError,
  extract::{JsonBody, Path, Query},
  query::{empty_string_as_none, page_request},
};

fn not_found(id: Uuid) -> ApiError { ApiError::NotFound(format!("job {id} not found")) }

// ─── List ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListParams {
  #[serde(default, deserialize_with = "empty_string_as_none")]
  pub search:    Option<String>,
  #[serde(default, deserialize_with = "empty_string_as_none")]
  pub status:    Option<JobStatus>,
  #[serde(default, deserialize_with = "empty_string_as_none")]
  pub sort:      Option<JobSort>,
  #[serde(default, deserialize_with = "empty_string_as_none")]
  pub page:      Option<u32>,
  #[serde(default, deserialize_with = "empty_string_as_none")]
  pub page_size: Option<u32>,
}

/// `GET /jobs`
pub async fn list<S: HiringStore>(
  State(store): State<Arc<S>>,
  Query(params): Query<ListParams>,
) -> Result<Json<Page<Job>>, ApiError> {
  let query = JobQuery {
    search: params.search,
    status: params.status,
    sort:   params.sort.unwrap_or_default(),
    page:   page_request(params.page, params.page_size)?,
  };
  let page = store.list_jobs(&query).await.map_err(ApiError::store)?;
  Ok(Json(page))
}

// ─── Create ───────────────────────────────────────────────────────────────────

/// `POST /jobs`
pub async fn create<S: HiringStore>(
  State(store): State<Arc<S>>,
  JsonBody(body): JsonBody<NewJob>,
) -> Result<impl IntoResponse, ApiError> {
  ApiError::check(field_errors(&body))?;
  let job = store.create_job(body).await.map_err(ApiError::store)?;
  tracing::info!(job_id = %job.id, title = %job.title, "job created");
  Ok((StatusCode::CREATED, Json(job)))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /jobs/{id}`
pub async fn get_one<S: HiringStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<Job>, ApiError> {
  let job = store
    .get_job(id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| not_found(id))?;
  Ok(Json(job))
}

// ─── Update ───────────────────────────────────────────────────────────────────

/// `PATCH /jobs/{id}`
pub async fn update<S: HiringStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
  JsonBody(patch): JsonBody<JobPatch>,
) -> Result<Json<Job>, ApiError> {
  ApiError::check(field_errors(&patch))?;
  let job = store
    .update_job(id, patch)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| not_found(id))?;
  Ok(Json(job))
}

// ─── Delete ───────────────────────────────────────────────────────────────────

/// `DELETE /jobs/{id}`
pub async fn delete<S: HiringStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
  if store.delete_job(id).await.map_err(ApiError::store)? {
    tracing::info!(job_id = %id, "job deleted");
    Ok(StatusCode::NO_CONTENT)
  } else {
    Err(not_found(id))
  }
}

// ─── Reorder ──────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReorderBody {
  pub from_order: i64,
  pub to_order:   i64,
}

/// `PATCH /jobs/{id}/reorder`: 404 for an unknown job, 409 when it is no
/// longer at `fromOrder`.
pub async fn reorder<S: HiringStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
  JsonBody(body): JsonBody<ReorderBody>,
) -> Result<Json<Job>, ApiError> {
  let job = store
    .reorder_job(id, body.from_order, body.to_order)
    .await
    .map_err(ApiError::store)?;
  Ok(Json(job))
}
