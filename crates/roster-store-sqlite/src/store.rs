//! [`SqliteStore`], the SQLite implementation of [`HiringStore`].

use std::path::Path;

use chrono::{DateTime, SubsecRound as _, Utc};
use rusqlite::{OptionalExtension as _, functions::FunctionFlags, params};
use uuid::Uuid;

use roster_core::{
  Error as CoreError,
  assessment::Assessment,
  candidate::{Candidate, CandidatePatch, NewCandidate, TimelineEvent, next_event_time},
  job::{Job, JobPatch, JobSort, NewJob},
  ordering::ShiftPlan,
  page::{Page, Pagination},
  seed::SeedData,
  store::{BoardStats, CandidateQuery, HiringStore, JobQuery},
};

use crate::{
  Error, Result,
  encode::{
    ASSESSMENT_COLUMNS, CANDIDATE_COLUMNS, EVENT_COLUMNS, JOB_COLUMNS, RawAssessment,
    RawCandidate, RawEvent, RawJob, decode_dt_sql, encode_dt, encode_stage,
    encode_status, encode_uuid, like_pattern,
  },
  schema::SCHEMA,
};

// ─── Row writers ─────────────────────────────────────────────────────────────

fn insert_job(conn: &rusqlite::Connection, row: &RawJob) -> rusqlite::Result<()> {
  conn
    .prepare_cached(
      "INSERT INTO jobs (
         job_id, title, slug, status, tags, sort_order,
         description, requirements, created_at, updated_at
       ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
    )?
    .execute(params![
      row.job_id,
      row.title,
      row.slug,
      row.status,
      row.tags,
      row.sort_order,
      row.description,
      row.requirements,
      row.created_at,
      row.updated_at,
    ])?;
  Ok(())
}

fn insert_candidate(
  conn: &rusqlite::Connection,
  row: &RawCandidate,
) -> rusqlite::Result<()> {
  conn
    .prepare_cached(
      "INSERT INTO candidates (
         candidate_id, name, email, stage, job_id, applied_at, updated_at, notes
       ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
    )?
    .execute(params![
      row.candidate_id,
      row.name,
      row.email,
      row.stage,
      row.job_id,
      row.applied_at,
      row.updated_at,
      row.notes,
    ])?;
  Ok(())
}

fn insert_event(conn: &rusqlite::Connection, row: &RawEvent) -> rusqlite::Result<()> {
  conn
    .prepare_cached(
      "INSERT INTO candidate_timeline (event_id, candidate_id, stage, recorded_at, note)
       VALUES (?1, ?2, ?3, ?4, ?5)",
    )?
    .execute(params![
      row.event_id,
      row.candidate_id,
      row.stage,
      row.recorded_at,
      row.note,
    ])?;
  Ok(())
}

fn insert_assessment(
  conn: &rusqlite::Connection,
  row: &RawAssessment,
) -> rusqlite::Result<()> {
  conn
    .prepare_cached(
      "INSERT INTO assessments (
         assessment_id, job_id, title, sections_json, created_at, updated_at
       ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
    )?
    .execute(params![
      row.assessment_id,
      row.job_id,
      row.title,
      row.sections_json,
      row.created_at,
      row.updated_at,
    ])?;
  Ok(())
}

/// Current time at the precision timestamps are stored with, so values
/// handed back to callers compare equal to what a later read returns.
fn now() -> DateTime<Utc> { Utc::now().trunc_subsecs(6) }

/// Unicode lowercase, applied to both sides of a search. SQLite's own `LIKE`
/// only ignores case for ASCII.
fn fold(s: &str) -> String { s.to_lowercase() }

/// Register `fold(text)` on `conn`. `NULL` passes through.
fn register_fold(conn: &rusqlite::Connection) -> rusqlite::Result<()> {
  conn.create_scalar_function(
    "fold",
    1,
    FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC,
    |ctx| Ok(ctx.get::<Option<String>>(0)?.as_deref().map(fold)),
  )
}

fn job_order_by(sort: JobSort) -> &'static str {
  match sort {
    JobSort::Order => "sort_order ASC",
    JobSort::Title => "title COLLATE NOCASE ASC, sort_order ASC",
    JobSort::CreatedAt => "created_at DESC, sort_order ASC",
  }
}

/// Outcome of the reorder transaction, decided before any row changes.
enum Reorder {
  Moved,
  Missing,
  Mismatch(i64),
}

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Roster hiring store backed by a single SQLite file.
///
/// Cloning is cheap: the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store, mostly for tests.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        register_fold(conn)?;
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

// ─── HiringStore impl ────────────────────────────────────────────────────────

impl HiringStore for SqliteStore {
  type Error = Error;

  // ── Jobs ──────────────────────────────────────────────────────────────────

  async fn list_jobs(&self, query: &JobQuery) -> Result<Page<Job>> {
    let search = query
      .search
      .as_deref()
      .map(str::trim)
      .filter(|s| !s.is_empty())
      .map(|s| like_pattern(&fold(s)));
    let status = query.status.map(|s| encode_status(s).to_owned());
    let limit = query.page.limit() as i64;
    let offset = query.page.offset() as i64;
    let order_by = job_order_by(query.sort);

    let (total, raws): (i64, Vec<RawJob>) = self
      .conn
      .call(move |conn| {
        let filter = "(?1 IS NULL OR fold(title) LIKE ?1 ESCAPE '\\'
                       OR EXISTS (SELECT 1 FROM json_each(jobs.tags)
                                  WHERE fold(value) LIKE ?1 ESCAPE '\\'))
                      AND (?2 IS NULL OR status = ?2)";

        let total: i64 = conn.query_row(
          &format!("SELECT COUNT(*) FROM jobs WHERE {filter}"),
          params![search, status],
          |r| r.get(0),
        )?;

        let mut stmt = conn.prepare(&format!(
          "SELECT {JOB_COLUMNS} FROM jobs WHERE {filter}
           ORDER BY {order_by} LIMIT ?3 OFFSET ?4"
        ))?;
        let rows = stmt
          .query_map(params![search, status, limit, offset], RawJob::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok((total, rows))
      })
      .await?;

    let data = raws
      .into_iter()
      .map(RawJob::into_job)
      .collect::<Result<Vec<_>>>()?;

    Ok(Page {
      data,
      pagination: Pagination::new(query.page, total as u64),
    })
  }

  async fn get_job(&self, id: Uuid) -> Result<Option<Job>> {
    let id_str = encode_uuid(id);
    let raw: Option<RawJob> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!("SELECT {JOB_COLUMNS} FROM jobs WHERE job_id = ?1"),
              params![id_str],
              RawJob::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawJob::into_job).transpose()
  }

  async fn create_job(&self, input: NewJob) -> Result<Job> {
    // Order is assigned inside the transaction, so encode with a placeholder.
    let job = input.into_job(Uuid::new_v4(), 0, now());
    let mut row = RawJob::from_job(&job)?;

    let order: i64 = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        row.sort_order = tx.query_row(
          "SELECT COALESCE(MAX(sort_order) + 1, 0) FROM jobs",
          [],
          |r| r.get(0),
        )?;
        insert_job(&tx, &row)?;
        tx.commit()?;
        Ok(row.sort_order)
      })
      .await?;

    tracing::debug!(job_id = %job.id, order, "created job");
    Ok(Job { order, ..job })
  }

  async fn update_job(&self, id: Uuid, patch: JobPatch) -> Result<Option<Job>> {
    let Some(mut job) = self.get_job(id).await? else {
      return Ok(None);
    };
    patch.apply(&mut job, now());
    let row = RawJob::from_job(&job)?;

    // sort_order is owned by reorder_job and never written here.
    let changed: usize = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE jobs SET title = ?2, slug = ?3, status = ?4, tags = ?5,
             description = ?6, requirements = ?7, updated_at = ?8
           WHERE job_id = ?1",
          params![
            row.job_id,
            row.title,
            row.slug,
            row.status,
            row.tags,
            row.description,
            row.requirements,
            row.updated_at,
          ],
        )?)
      })
      .await?;

    if changed == 0 {
      return Ok(None);
    }
    self.get_job(id).await
  }

  async fn delete_job(&self, id: Uuid) -> Result<bool> {
    let id_str = encode_uuid(id);
    let changed: usize = self
      .conn
      .call(move |conn| {
        Ok(conn.execute("DELETE FROM jobs WHERE job_id = ?1", params![id_str])?)
      })
      .await?;
    Ok(changed > 0)
  }

  async fn reorder_job(&self, id: Uuid, from_order: i64, to_order: i64) -> Result<Job> {
    let id_str = encode_uuid(id);
    let now_str = encode_dt(now());

    let outcome = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let current: Option<i64> = tx
          .query_row(
            "SELECT sort_order FROM jobs WHERE job_id = ?1",
            params![id_str],
            |r| r.get(0),
          )
          .optional()?;

        let outcome = match current {
          None => Reorder::Missing,
          Some(actual) if actual != from_order => Reorder::Mismatch(actual),
          Some(_) => {
            if let Some(plan) = ShiftPlan::new(from_order, to_order) {
              tx.execute(
                "UPDATE jobs SET sort_order = sort_order + ?1
                 WHERE sort_order BETWEEN ?2 AND ?3 AND job_id != ?4",
                params![plan.delta, plan.lo, plan.hi, id_str],
              )?;
              tx.execute(
                "UPDATE jobs SET sort_order = ?1, updated_at = ?2 WHERE job_id = ?3",
                params![to_order, now_str, id_str],
              )?;
            }
            Reorder::Moved
          }
        };
        tx.commit()?;
        Ok(outcome)
      })
      .await?;

    match outcome {
      Reorder::Missing => Err(CoreError::JobNotFound(id).into()),
      Reorder::Mismatch(actual) => Err(
        CoreError::OrderMismatch {
          id,
          expected: from_order,
          actual,
        }
        .into(),
      ),
      Reorder::Moved => {
        tracing::debug!(job_id = %id, from_order, to_order, "reordered job");
        self.get_job(id).await?.ok_or(CoreError::JobNotFound(id).into())
      }
    }
  }

  // ── Candidates ────────────────────────────────────────────────────────────

  async fn list_candidates(&self, query: &CandidateQuery) -> Result<Page<Candidate>> {
    let search = query
      .search
      .as_deref()
      .map(str::trim)
      .filter(|s| !s.is_empty())
      .map(|s| like_pattern(&fold(s)));
    let stage = query.stage.map(encode_stage);
    let job_id = query.job_id.map(encode_uuid);
    let limit = query.page.limit() as i64;
    let offset = query.page.offset() as i64;

    let (total, raws): (i64, Vec<RawCandidate>) = self
      .conn
      .call(move |conn| {
        let filter = "(?1 IS NULL OR fold(name) LIKE ?1 ESCAPE '\\' OR fold(email) LIKE ?1 ESCAPE '\\')
                      AND (?2 IS NULL OR stage = ?2)
                      AND (?3 IS NULL OR job_id = ?3)";

        let total: i64 = conn.query_row(
          &format!("SELECT COUNT(*) FROM candidates WHERE {filter}"),
          params![search, stage, job_id],
          |r| r.get(0),
        )?;

        let mut stmt = conn.prepare(&format!(
          "SELECT {CANDIDATE_COLUMNS} FROM candidates WHERE {filter}
           ORDER BY applied_at DESC, candidate_id ASC LIMIT ?4 OFFSET ?5"
        ))?;
        let rows = stmt
          .query_map(
            params![search, stage, job_id, limit, offset],
            RawCandidate::from_row,
          )?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok((total, rows))
      })
      .await?;

    let data = raws
      .into_iter()
      .map(RawCandidate::into_candidate)
      .collect::<Result<Vec<_>>>()?;

    Ok(Page {
      data,
      pagination: Pagination::new(query.page, total as u64),
    })
  }

  async fn get_candidate(&self, id: Uuid) -> Result<Option<Candidate>> {
    let id_str = encode_uuid(id);
    let raw: Option<RawCandidate> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!(
                "SELECT {CANDIDATE_COLUMNS} FROM candidates WHERE candidate_id = ?1"
              ),
              params![id_str],
              RawCandidate::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawCandidate::into_candidate).transpose()
  }

  async fn create_candidate(&self, input: NewCandidate) -> Result<Candidate> {
    let now = now();
    let candidate = Candidate {
      id:         Uuid::new_v4(),
      name:       input.name.trim().to_owned(),
      email:      input.email.trim().to_owned(),
      stage:      input.stage,
      job_id:     input.job_id,
      applied_at: now,
      updated_at: now,
      notes:      input.notes.filter(|n| !n.trim().is_empty()),
    };
    let first_event = TimelineEvent {
      id:           Uuid::new_v4(),
      candidate_id: candidate.id,
      stage:        candidate.stage,
      timestamp:    now,
      note:         None,
    };

    let row = RawCandidate::from_candidate(&candidate);
    let event = RawEvent::from_event(&first_event);
    self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        insert_candidate(&tx, &row)?;
        insert_event(&tx, &event)?;
        tx.commit()?;
        Ok(())
      })
      .await?;

    Ok(candidate)
  }

  async fn update_candidate(
    &self,
    id: Uuid,
    patch: CandidatePatch,
  ) -> Result<Option<Candidate>> {
    let id_str = encode_uuid(id);
    let now = now();
    let new_stage = patch.stage.map(encode_stage);
    let notes = patch.notes.map(|n| Some(n).filter(|n| !n.trim().is_empty()));
    let note = patch.note.filter(|n| !n.trim().is_empty());
    let event_id = encode_uuid(Uuid::new_v4());

    let appended = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let current: Option<String> = tx
          .query_row(
            "SELECT stage FROM candidates WHERE candidate_id = ?1",
            params![id_str],
            |r| r.get(0),
          )
          .optional()?;
        let Some(current) = current else {
          return Ok(None);
        };

        let mut appended = false;
        if let Some(stage) = new_stage.filter(|s| *s != current) {
          let latest: Option<String> = tx.query_row(
            "SELECT MAX(recorded_at) FROM candidate_timeline WHERE candidate_id = ?1",
            params![id_str],
            |r| r.get(0),
          )?;
          let latest = latest.as_deref().map(|s| decode_dt_sql(s, 0)).transpose()?;
          let at = encode_dt(next_event_time(now, latest));

          insert_event(&tx, &RawEvent {
            event_id,
            candidate_id: id_str.clone(),
            stage: stage.clone(),
            recorded_at: at,
            note,
          })?;
          tx.execute(
            "UPDATE candidates SET stage = ?2 WHERE candidate_id = ?1",
            params![id_str, stage],
          )?;
          appended = true;
        }

        if let Some(notes) = notes {
          tx.execute(
            "UPDATE candidates SET notes = ?2 WHERE candidate_id = ?1",
            params![id_str, notes],
          )?;
        }

        tx.execute(
          "UPDATE candidates SET updated_at = ?2 WHERE candidate_id = ?1",
          params![id_str, encode_dt(now)],
        )?;
        tx.commit()?;
        Ok(Some(appended))
      })
      .await?;

    let Some(appended) = appended else {
      return Ok(None);
    };
    if appended {
      tracing::debug!(candidate_id = %id, "stage changed, timeline event appended");
    }
    self.get_candidate(id).await
  }

  async fn timeline(&self, candidate_id: Uuid) -> Result<Vec<TimelineEvent>> {
    let id_str = encode_uuid(candidate_id);
    let raws: Vec<RawEvent> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {EVENT_COLUMNS} FROM candidate_timeline
           WHERE candidate_id = ?1 ORDER BY recorded_at ASC, rowid ASC"
        ))?;
        let rows = stmt
          .query_map(params![id_str], RawEvent::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawEvent::into_event).collect()
  }

  // ── Assessments ───────────────────────────────────────────────────────────

  async fn get_assessment(&self, job_id: Uuid) -> Result<Option<Assessment>> {
    let id_str = encode_uuid(job_id);
    let raw: Option<RawAssessment> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!("SELECT {ASSESSMENT_COLUMNS} FROM assessments WHERE job_id = ?1"),
              params![id_str],
              RawAssessment::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawAssessment::into_assessment).transpose()
  }

  async fn save_assessment(&self, assessment: Assessment) -> Result<Assessment> {
    let job_id = assessment.job_id;
    let row = RawAssessment::from_assessment(&Assessment {
      updated_at: now(),
      ..assessment
    })?;

    // An existing document keeps its id and created_at.
    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO assessments (
             assessment_id, job_id, title, sections_json, created_at, updated_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)
           ON CONFLICT(job_id) DO UPDATE SET
             title         = excluded.title,
             sections_json = excluded.sections_json,
             updated_at    = excluded.updated_at",
          params![
            row.assessment_id,
            row.job_id,
            row.title,
            row.sections_json,
            row.created_at,
            row.updated_at,
          ],
        )?;
        Ok(())
      })
      .await?;

    self
      .get_assessment(job_id)
      .await?
      .ok_or(CoreError::JobNotFound(job_id).into())
  }

  // ── Misc ──────────────────────────────────────────────────────────────────

  async fn stats(&self) -> Result<BoardStats> {
    let counts: [i64; 4] = self
      .conn
      .call(|conn| {
        Ok(conn.query_row(
          "SELECT
             (SELECT COUNT(*) FROM jobs),
             (SELECT COUNT(*) FROM jobs WHERE status = 'active'),
             (SELECT COUNT(*) FROM candidates),
             (SELECT COUNT(*) FROM candidates WHERE stage = 'hired')",
          [],
          |r| Ok([r.get(0)?, r.get(1)?, r.get(2)?, r.get(3)?]),
        )?)
      })
      .await?;

    let [total_jobs, active_jobs, total_candidates, hired_candidates] =
      counts.map(|c| c as u64);
    Ok(BoardStats {
      total_jobs,
      active_jobs,
      total_candidates,
      hired_candidates,
    })
  }

  async fn load_fixture(&self, data: SeedData) -> Result<()> {
    let jobs = data
      .jobs
      .iter()
      .map(RawJob::from_job)
      .collect::<Result<Vec<_>>>()?;
    let candidates: Vec<_> = data.candidates.iter().map(RawCandidate::from_candidate).collect();
    let events: Vec<_> = data.timeline.iter().map(RawEvent::from_event).collect();
    let assessments = data
      .assessments
      .iter()
      .map(RawAssessment::from_assessment)
      .collect::<Result<Vec<_>>>()?;

    let (job_count, candidate_count) = (jobs.len(), candidates.len());
    self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        tx.execute_batch(
          "DELETE FROM assessment_responses;
           DELETE FROM assessments;
           DELETE FROM candidate_timeline;
           DELETE FROM candidates;
           DELETE FROM jobs;",
        )?;
        for row in &jobs {
          insert_job(&tx, row)?;
        }
        for row in &candidates {
          insert_candidate(&tx, row)?;
        }
        for row in &events {
          insert_event(&tx, row)?;
        }
        for row in &assessments {
          insert_assessment(&tx, row)?;
        }
        tx.commit()?;
        Ok(())
      })
      .await?;

    tracing::info!(jobs = job_count, candidates = candidate_count, "loaded fixture");
    Ok(())
  }
}
