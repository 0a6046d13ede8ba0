//! JSON REST API for Roster.
//!
//! Exposes an axum [`Router`] backed by any [`roster_core::store::HiringStore`].
//! Logging layers and transport concerns are the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", roster_api::api_router(store.clone()))
//! ```

pub mod assessments;
pub mod candidates;
pub mod error;
pub mod extract;
pub mod jobs;
pub mod query;
pub mod stats;

use std::sync::Arc;

use axum::{
  Router,
  routing::{get, patch},
};
use roster_core::store::HiringStore;

pub use error::ApiError;

/// Build a fully-materialised API router for `store`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(store: Arc<S>) -> Router<()>
where
  S: HiringStore + 'static,
{
  Router::new()
    // Jobs
    .route("/jobs", get(jobs::list::<S>).post(jobs::create::<S>))
    .route(
      "/jobs/{id}",
      get(jobs::get_one::<S>)
        .patch(jobs::update::<S>)
        .delete(jobs::delete::<S>),
    )
    .route("/jobs/{id}/reorder", patch(jobs::reorder::<S>))
    // Candidates
    .route(
      "/candidates",
      get(candidates::list::<S>).post(candidates::create::<S>),
    )
    .route(
      "/candidates/{id}",
      get(candidates::get_one::<S>).patch(candidates::update::<S>),
    )
    .route("/candidates/{id}/timeline", get(candidates::timeline::<S>))
    // Assessments
    .route(
      "/assessments/{job_id}",
      get(assessments::get_one::<S>).put(assessments::put::<S>),
    )
    // Dashboard
    .route("/stats", get(stats::handler::<S>))
    .with_state(store)
}

#[cfg(test)]
mod tests;
