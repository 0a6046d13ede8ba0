//! Job postings: the rows of the jobs board.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};
use uuid::Uuid;
use validator::Validate;

use crate::validation::{no_blank_entries, not_blank};

// ─── Status ──────────────────────────────────────────────────────────────────

/// Whether a job is open on the board.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  Default,
  Serialize,
  Deserialize,
  Display,
  EnumString,
  AsRefStr,
  EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum JobStatus {
  #[default]
  Active,
  Archived,
}

impl JobStatus {
  /// The status an archive/unarchive toggle moves to.
  pub fn toggled(self) -> Self {
    match self {
      Self::Active => Self::Archived,
      Self::Archived => Self::Active,
    }
  }
}

// ─── Job ─────────────────────────────────────────────────────────────────────

/// A job posting. `order` fixes its position on the board; the set of all
/// `order` values is kept free of duplicates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Job {
  pub id:           Uuid,
  pub title:        String,
  pub slug:         String,
  pub status:       JobStatus,
  pub tags:         Vec<String>,
  pub order:        i64,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub description:  Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub requirements: Option<Vec<String>>,
  pub created_at:   DateTime<Utc>,
  pub updated_at:   DateTime<Utc>,
}

/// Lowercase the title and collapse each whitespace run into a single `-`.
pub fn slugify(title: &str) -> String {
  title
    .to_lowercase()
    .split_whitespace()
    .collect::<Vec<_>>()
    .join("-")
}

// ─── NewJob ──────────────────────────────────────────────────────────────────

/// Input to [`crate::store::HiringStore::create_job`].
///
/// `id`, `slug`, `order`, `status` and timestamps are assigned by the store.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewJob {
  #[validate(custom(function = "not_blank", message = "Title is required"))]
  pub title:        String,
  #[serde(default)]
  pub description:  Option<String>,
  #[serde(default)]
  #[validate(custom(function = "no_blank_entries", message = "All requirements must be filled"))]
  pub requirements: Vec<String>,
  #[serde(default)]
  #[validate(custom(function = "no_blank_entries", message = "All tags must be filled"))]
  pub tags:         Vec<String>,
}

impl NewJob {
  /// Build the stored job. Blank descriptions and empty requirement lists are
  /// stored as absent.
  pub fn into_job(self, id: Uuid, order: i64, now: DateTime<Utc>) -> Job {
    Job {
      id,
      slug: slugify(&self.title),
      title: self.title,
      status: JobStatus::Active,
      tags: self.tags,
      order,
      description: self.description.filter(|d| !d.trim().is_empty()),
      requirements: Some(self.requirements).filter(|r| !r.is_empty()),
      created_at: now,
      updated_at: now,
    }
  }
}

// ─── JobPatch ────────────────────────────────────────────────────────────────

/// Partial update accepted by `PATCH /jobs/{id}`. Absent fields are left
/// untouched. Any client-sent slug is ignored; it is always derived.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct JobPatch {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  #[validate(custom(function = "not_blank", message = "Title is required"))]
  pub title:        Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub description:  Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  #[validate(custom(function = "no_blank_entries", message = "All requirements must be filled"))]
  pub requirements: Option<Vec<String>>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  #[validate(custom(function = "no_blank_entries", message = "All tags must be filled"))]
  pub tags:         Option<Vec<String>>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub status:       Option<JobStatus>,
}

impl JobPatch {
  pub fn status(status: JobStatus) -> Self {
    Self { status: Some(status), ..Self::default() }
  }

  pub fn apply(self, job: &mut Job, now: DateTime<Utc>) {
    if let Some(title) = self.title {
      job.slug = slugify(&title);
      job.title = title;
    }
    if let Some(description) = self.description {
      job.description = Some(description).filter(|d| !d.trim().is_empty());
    }
    if let Some(requirements) = self.requirements {
      job.requirements = Some(requirements).filter(|r| !r.is_empty());
    }
    if let Some(tags) = self.tags {
      job.tags = tags;
    }
    if let Some(status) = self.status {
      job.status = status;
    }
    job.updated_at = now;
  }
}

// ─── Sorting ─────────────────────────────────────────────────────────────────

/// Sort keys accepted by `GET /jobs?sort=`.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Default,
  Serialize,
  Deserialize,
  Display,
  EnumString,
  AsRefStr,
)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase")]
pub enum JobSort {
  #[default]
  Order,
  Title,
  CreatedAt,
}

#[cfg(test)]
mod tests {
  use std::str::FromStr;

  use super::*;
  use crate::validation::field_errors;

  fn job() -> Job {
    NewJob {
      title:        "Senior Rust Engineer".into(),
      description:  Some("  ".into()),
      requirements: vec![],
      tags:         vec!["backend".into()],
    }
    .into_job(Uuid::new_v4(), 4, Utc::now())
  }

  #[test]
  fn slug_collapses_whitespace_runs() {
    assert_eq!(slugify("Senior  Rust\tEngineer"), "senior-rust-engineer");
    assert_eq!(slugify("  Padded Title "), "padded-title");
  }

  #[test]
  fn blank_title_is_rejected() {
    let draft = NewJob { title: "   ".into(), ..NewJob::default() };
    let errs = field_errors(&draft);
    assert_eq!(errs.get("title"), Some("Title is required"));
  }

  #[test]
  fn blank_tag_or_requirement_is_rejected() {
    let draft = NewJob {
      title:        "Designer".into(),
      requirements: vec!["Portfolio".into(), " ".into()],
      tags:         vec![String::new()],
      ..NewJob::default()
    };
    let errs = field_errors(&draft);
    assert!(errs.get("requirements").is_some());
    assert!(errs.get("tags").is_some());
    assert!(errs.get("title").is_none());
  }

  #[test]
  fn patch_only_checks_fields_it_carries() {
    assert!(field_errors(&JobPatch::status(JobStatus::Archived)).is_empty());

    let patch = JobPatch {
      title: Some(" ".into()),
      tags: Some(vec!["ok".into(), String::new()]),
      ..JobPatch::default()
    };
    let errs = field_errors(&patch);
    assert_eq!(errs.get("title"), Some("Title is required"));
    assert_eq!(errs.get("tags"), Some("All tags must be filled"));
    assert!(errs.get("requirements").is_none());
  }

  #[test]
  fn new_job_drops_blank_optional_fields() {
    let job = job();
    assert_eq!(job.slug, "senior-rust-engineer");
    assert_eq!(job.status, JobStatus::Active);
    assert_eq!(job.order, 4);
    assert!(job.description.is_none());
    assert!(job.requirements.is_none());
  }

  #[test]
  fn patch_rederives_slug_and_leaves_order_alone() {
    let mut job = job();
    JobPatch {
      title: Some("Staff Rust Engineer".into()),
      status: Some(JobStatus::Archived),
      ..JobPatch::default()
    }
    .apply(&mut job, Utc::now());

    assert_eq!(job.slug, "staff-rust-engineer");
    assert_eq!(job.status, JobStatus::Archived);
    assert_eq!(job.order, 4);
    assert_eq!(job.tags, vec!["backend".to_string()]);
  }

  #[test]
  fn status_toggles_and_parses() {
    assert_eq!(JobStatus::Active.toggled(), JobStatus::Archived);
    assert_eq!(JobStatus::from_str("archived").unwrap(), JobStatus::Archived);
    assert_eq!(JobSort::from_str("createdAt").unwrap(), JobSort::CreatedAt);
  }

  #[test]
  fn wire_format_is_camel_case() {
    let value = serde_json::to_value(job()).unwrap();
    assert!(value.get("createdAt").is_some());
    assert!(value.get("description").is_none());
    assert_eq!(value["status"], "active");
  }
}
