//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as fixed-width RFC 3339 strings (microseconds, `Z`
//! suffix) so that text ordering matches chronological ordering. Tags,
//! requirements and assessment sections are stored as compact JSON. UUIDs are
//! stored as hyphenated lowercase strings.

use std::str::FromStr;

use chrono::{DateTime, SecondsFormat, Utc};
use roster_core::{
  assessment::{Assessment, Section},
  candidate::{Candidate, Stage, TimelineEvent},
  job::{Job, JobStatus},
};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Uuid ─────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String {
  dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

/// [`decode_dt`] for use inside a `Connection::call` closure, where only
/// rusqlite errors can be raised.
pub fn decode_dt_sql(s: &str, column: usize) -> rusqlite::Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| {
      rusqlite::Error::FromSqlConversionFailure(
        column,
        rusqlite::types::Type::Text,
        Box::new(e),
      )
    })
}

// ─── Enums ───────────────────────────────────────────────────────────────────

fn decode_variant<T: FromStr>(column: &'static str, s: &str) -> Result<T> {
  s.parse().map_err(|_| Error::Decode { column, value: s.to_owned() })
}

pub fn encode_status(status: JobStatus) -> &'static str {
  match status {
    JobStatus::Active => "active",
    JobStatus::Archived => "archived",
  }
}

pub fn decode_status(s: &str) -> Result<JobStatus> { decode_variant("status", s) }

pub fn encode_stage(stage: Stage) -> String { stage.as_ref().to_owned() }

pub fn decode_stage(s: &str) -> Result<Stage> { decode_variant("stage", s) }

// ─── JSON columns ────────────────────────────────────────────────────────────

pub fn encode_list(items: &[String]) -> Result<String> {
  Ok(serde_json::to_string(items)?)
}

pub fn decode_list(s: &str) -> Result<Vec<String>> { Ok(serde_json::from_str(s)?) }

/// `LIKE` pattern matching `needle` anywhere, with `%`, `_` and the escape
/// character itself escaped. Pair with `ESCAPE '\'`.
pub fn like_pattern(needle: &str) -> String {
  let mut out = String::with_capacity(needle.len() + 2);
  out.push('%');
  for c in needle.chars() {
    if matches!(c, '%' | '_' | '\\') {
      out.push('\\');
    }
    out.push(c);
  }
  out.push('%');
  out
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Column strings of a `jobs` row, in both directions.
pub struct RawJob {
  pub job_id:       String,
  pub title:        String,
  pub slug:         String,
  pub status:       String,
  pub tags:         String,
  pub sort_order:   i64,
  pub description:  Option<String>,
  pub requirements: Option<String>,
  pub created_at:   String,
  pub updated_at:   String,
}

/// Column list matching [`RawJob::from_row`].
pub const JOB_COLUMNS: &str = "job_id, title, slug, status, tags, sort_order, \
                               description, requirements, created_at, updated_at";

impl RawJob {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      job_id:       row.get(0)?,
      title:        row.get(1)?,
      slug:         row.get(2)?,
      status:       row.get(3)?,
      tags:         row.get(4)?,
      sort_order:   row.get(5)?,
      description:  row.get(6)?,
      requirements: row.get(7)?,
      created_at:   row.get(8)?,
      updated_at:   row.get(9)?,
    })
  }

  pub fn from_job(job: &Job) -> Result<Self> {
    Ok(Self {
      job_id:       encode_uuid(job.id),
      title:        job.title.clone(),
      slug:         job.slug.clone(),
      status:       encode_status(job.status).to_owned(),
      tags:         encode_list(&job.tags)?,
      sort_order:   job.order,
      description:  job.description.clone(),
      requirements: job.requirements.as_deref().map(encode_list).transpose()?,
      created_at:   encode_dt(job.created_at),
      updated_at:   encode_dt(job.updated_at),
    })
  }

  pub fn into_job(self) -> Result<Job> {
    Ok(Job {
      id:           decode_uuid(&self.job_id)?,
      title:        self.title,
      slug:         self.slug,
      status:       decode_status(&self.status)?,
      tags:         decode_list(&self.tags)?,
      order:        self.sort_order,
      description:  self.description,
      requirements: self.requirements.as_deref().map(decode_list).transpose()?,
      created_at:   decode_dt(&self.created_at)?,
      updated_at:   decode_dt(&self.updated_at)?,
    })
  }
}

/// Column strings of a `candidates` row.
pub struct RawCandidate {
  pub candidate_id: String,
  pub name:         String,
  pub email:        String,
  pub stage:        String,
  pub job_id:       String,
  pub applied_at:   String,
  pub updated_at:   String,
  pub notes:        Option<String>,
}

pub const CANDIDATE_COLUMNS: &str =
  "candidate_id, name, email, stage, job_id, applied_at, updated_at, notes";

impl RawCandidate {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      candidate_id: row.get(0)?,
      name:         row.get(1)?,
      email:        row.get(2)?,
      stage:        row.get(3)?,
      job_id:       row.get(4)?,
      applied_at:   row.get(5)?,
      updated_at:   row.get(6)?,
      notes:        row.get(7)?,
    })
  }

  pub fn from_candidate(c: &Candidate) -> Self {
    Self {
      candidate_id: encode_uuid(c.id),
      name:         c.name.clone(),
      email:        c.email.clone(),
      stage:        encode_stage(c.stage),
      job_id:       encode_uuid(c.job_id),
      applied_at:   encode_dt(c.applied_at),
      updated_at:   encode_dt(c.updated_at),
      notes:        c.notes.clone(),
    }
  }

  pub fn into_candidate(self) -> Result<Candidate> {
    Ok(Candidate {
      id:         decode_uuid(&self.candidate_id)?,
      name:       self.name,
      email:      self.email,
      stage:      decode_stage(&self.stage)?,
      job_id:     decode_uuid(&self.job_id)?,
      applied_at: decode_dt(&self.applied_at)?,
      updated_at: decode_dt(&self.updated_at)?,
      notes:      self.notes,
    })
  }
}

/// Column strings of a `candidate_timeline` row.
pub struct RawEvent {
  pub event_id:     String,
  pub candidate_id: String,
  pub stage:        String,
  pub recorded_at:  String,
  pub note:         Option<String>,
}

pub const EVENT_COLUMNS: &str = "event_id, candidate_id, stage, recorded_at, note";

impl RawEvent {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      event_id:     row.get(0)?,
      candidate_id: row.get(1)?,
      stage:        row.get(2)?,
      recorded_at:  row.get(3)?,
      note:         row.get(4)?,
    })
  }

  pub fn from_event(e: &TimelineEvent) -> Self {
    Self {
      event_id:     encode_uuid(e.id),
      candidate_id: encode_uuid(e.candidate_id),
      stage:        encode_stage(e.stage),
      recorded_at:  encode_dt(e.timestamp),
      note:         e.note.clone(),
    }
  }

  pub fn into_event(self) -> Result<TimelineEvent> {
    Ok(TimelineEvent {
      id:           decode_uuid(&self.event_id)?,
      candidate_id: decode_uuid(&self.candidate_id)?,
      stage:        decode_stage(&self.stage)?,
      timestamp:    decode_dt(&self.recorded_at)?,
      note:         self.note,
    })
  }
}

/// Column strings of an `assessments` row.
pub struct RawAssessment {
  pub assessment_id: String,
  pub job_id:        String,
  pub title:         String,
  pub sections_json: String,
  pub created_at:    String,
  pub updated_at:    String,
}

pub const ASSESSMENT_COLUMNS: &str =
  "assessment_id, job_id, title, sections_json, created_at, updated_at";

impl RawAssessment {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      assessment_id: row.get(0)?,
      job_id:        row.get(1)?,
      title:         row.get(2)?,
      sections_json: row.get(3)?,
      created_at:    row.get(4)?,
      updated_at:    row.get(5)?,
    })
  }

  pub fn from_assessment(a: &Assessment) -> Result<Self> {
    Ok(Self {
      assessment_id: encode_uuid(a.id),
      job_id:        encode_uuid(a.job_id),
      title:         a.title.clone(),
      sections_json: serde_json::to_string(&a.sections)?,
      created_at:    encode_dt(a.created_at),
      updated_at:    encode_dt(a.updated_at),
    })
  }

  pub fn into_assessment(self) -> Result<Assessment> {
    let sections: Vec<Section> = serde_json::from_str(&self.sections_json)?;
    Ok(Assessment {
      id: decode_uuid(&self.assessment_id)?,
      job_id: decode_uuid(&self.job_id)?,
      title: self.title,
      sections,
      created_at: decode_dt(&self.created_at)?,
      updated_at: decode_dt(&self.updated_at)?,
    })
  }
}
