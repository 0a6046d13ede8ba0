//! `GET /stats`: counters for the landing dashboard.

use std::sync::Arc;

use axum::{Json, extract::State};
use roster_core::store::{BoardStats, HiringStore};

use crate::error::ApiError;

pub async fn handler<S: HiringStore>(
  State(store): State<Arc<S>>,
) -> Result<Json<BoardStats>, ApiError> {
  let stats = store.stats().await.map_err(ApiError::store)?;
  Ok(Json(stats))
}
