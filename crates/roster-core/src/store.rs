//! The `HiringStore` trait and supporting query types.
//!
//! The trait is implemented by storage backends (e.g. `roster-store-sqlite`).
//! Higher layers (`roster-api`, `roster-server`) depend on this abstraction,
//! not on any concrete backend.

use std::future::Future;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
  assessment::Assessment,
  candidate::{Candidate, CandidatePatch, NewCandidate, Stage, TimelineEvent},
  job::{Job, JobPatch, JobSort, JobStatus, NewJob},
  page::{Page, PageRequest},
  seed::SeedData,
};

// ─── Query types ─────────────────────────────────────────────────────────────

/// Parameters for [`HiringStore::list_jobs`].
#[derive(Debug, Clone, Default)]
pub struct JobQuery {
  /// Case-insensitive substring matched against the title and every tag.
  pub search: Option<String>,
  pub status: Option<JobStatus>,
  pub sort:   JobSort,
  pub page:   PageRequest,
}

/// Parameters for [`HiringStore::list_candidates`].
#[derive(Debug, Clone, Default)]
pub struct CandidateQuery {
  /// Case-insensitive substring matched against name and email.
  pub search: Option<String>,
  pub stage:  Option<Stage>,
  pub job_id: Option<Uuid>,
  pub page:   PageRequest,
}

/// Headline counters for the landing dashboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardStats {
  pub total_jobs:       u64,
  pub active_jobs:      u64,
  pub total_candidates: u64,
  pub hired_candidates: u64,
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// A store failure. Some carry a domain [`crate::Error`] that callers map to
/// a specific response; the rest are infrastructure faults.
pub trait StoreError: std::error::Error + Send + Sync + 'static {
  fn domain(&self) -> Option<&crate::Error>;
}

/// Abstraction over a Roster store backend.
///
/// Timeline events are append-only: nothing in this trait updates or deletes
/// one. Multi-record writes (reorder, stage change plus timeline append,
/// fixture loading) are expected to be atomic.
///
/// All methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes (e.g. tokio with `axum`).
pub trait HiringStore: Send + Sync {
  type Error: StoreError;

  // ── Jobs ──────────────────────────────────────────────────────────────

  fn list_jobs<'a>(
    &'a self,
    query: &'a JobQuery,
  ) -> impl Future<Output = Result<Page<Job>, Self::Error>> + Send + 'a;

  /// Retrieve a job by id. Returns `None` if not found.
  fn get_job(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Job>, Self::Error>> + Send + '_;

  /// Persist a new job at the end of the board (`order = max + 1`).
  fn create_job(
    &self,
    input: NewJob,
  ) -> impl Future<Output = Result<Job, Self::Error>> + Send + '_;

  /// Apply a partial update. Returns `None` if the job does not exist.
  fn update_job(
    &self,
    id: Uuid,
    patch: JobPatch,
  ) -> impl Future<Output = Result<Option<Job>, Self::Error>> + Send + '_;

  /// Returns `false` if there was nothing to delete.
  fn delete_job(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  /// Move a job from `from_order` to `to_order`, shifting the jobs in
  /// between (see [`crate::ordering::ShiftPlan`]).
  ///
  /// Fails if the job does not exist or is no longer at `from_order`.
  fn reorder_job(
    &self,
    id: Uuid,
    from_order: i64,
    to_order: i64,
  ) -> impl Future<Output = Result<Job, Self::Error>> + Send + '_;

  // ── Candidates ────────────────────────────────────────────────────────

  fn list_candidates<'a>(
    &'a self,
    query: &'a CandidateQuery,
  ) -> impl Future<Output = Result<Page<Candidate>, Self::Error>> + Send + 'a;

  fn get_candidate(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Candidate>, Self::Error>> + Send + '_;

  /// Persist a candidate and its first timeline event.
  fn create_candidate(
    &self,
    input: NewCandidate,
  ) -> impl Future<Output = Result<Candidate, Self::Error>> + Send + '_;

  /// Apply a partial update; a changed stage appends exactly one timeline
  /// event in the same transaction. Returns `None` if not found.
  fn update_candidate(
    &self,
    id: Uuid,
    patch: CandidatePatch,
  ) -> impl Future<Output = Result<Option<Candidate>, Self::Error>> + Send + '_;

  /// All events for a candidate, oldest first.
  fn timeline(
    &self,
    candidate_id: Uuid,
  ) -> impl Future<Output = Result<Vec<TimelineEvent>, Self::Error>> + Send + '_;

  // ── Assessments ───────────────────────────────────────────────────────

  fn get_assessment(
    &self,
    job_id: Uuid,
  ) -> impl Future<Output = Result<Option<Assessment>, Self::Error>> + Send + '_;

  /// Replace the job's assessment wholesale. `updated_at` is set by the
  /// store; `created_at` of an existing document is preserved.
  fn save_assessment(
    &self,
    assessment: Assessment,
  ) -> impl Future<Output = Result<Assessment, Self::Error>> + Send + '_;

  // ── Misc ──────────────────────────────────────────────────────────────

  fn stats(&self) -> impl Future<Output = Result<BoardStats, Self::Error>> + Send + '_;

  /// Clear every collection and load `data` in its place.
  fn load_fixture(
    &self,
    data: SeedData,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;
}
