//! Handlers for `/assessments/{jobId}`.
//!
//! There is at most one assessment per job. `GET` answers 404 until the first
//! `PUT`; clients start from [`Assessment::draft`] in that case.

use std::sync::Arc;

use axum::{Json, extract::State};
use roster_core::{assessment::Assessment, store::HiringStore};
use uuid::Uuid;

use crate::{
  error::ApiError,
  extract::{JsonBody, Path},
};

/// `GET /assessments/{jobId}`
pub async fn get_one<S: HiringStore>(
  State(store): State<Arc<S>>,
  Path(job_id): Path<Uuid>,
) -> Result<Json<Assessment>, ApiError> {
  let assessment = store
    .get_assessment(job_id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound(format!("no assessment for job {job_id}")))?;
  Ok(Json(assessment))
}

/// `PUT /assessments/{jobId}`: replace the whole document. The path's job id
/// overrides whatever the body says.
pub async fn put<S: HiringStore>(
  State(store): State<Arc<S>>,
  Path(job_id): Path<Uuid>,
  JsonBody(body): JsonBody<Assessment>,
) -> Result<Json<Assessment>, ApiError> {
  store
    .get_job(job_id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound(format!("job {job_id} not found")))?;

  let saved = store
    .save_assessment(Assessment { job_id, ..body })
    .await
    .map_err(ApiError::store)?;

  tracing::info!(
    %job_id,
    sections = saved.sections.len(),
    questions = saved.question_count(),
    "assessment saved"
  );
  Ok(Json(saved))
}
