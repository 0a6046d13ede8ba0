//! Candidates, their hiring stage, and the append-only stage timeline.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString, IntoEnumIterator};
use uuid::Uuid;
use validator::Validate;

use crate::validation::not_blank;

// ─── Stage ───────────────────────────────────────────────────────────────────

/// A candidate's position in the hiring funnel. Any stage may move to any
/// other stage.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  PartialOrd,
  Ord,
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
pub enum Stage {
  #[default]
  Applied,
  Screen,
  Tech,
  Offer,
  Hired,
  Rejected,
}

impl Stage {
  /// Funnel order; also the column order of the pipeline board.
  pub const ALL: [Stage; 6] = [
    Stage::Applied,
    Stage::Screen,
    Stage::Tech,
    Stage::Offer,
    Stage::Hired,
    Stage::Rejected,
  ];

  /// Position within [`Stage::ALL`].
  pub fn index(self) -> usize {
    Self::iter().position(|s| s == self).unwrap_or_default()
  }

  pub fn from_index(index: usize) -> Option<Self> { Self::ALL.get(index).copied() }

  /// Column heading.
  pub fn title(self) -> &'static str {
    match self {
      Self::Applied => "Applied",
      Self::Screen => "Screening",
      Self::Tech => "Technical",
      Self::Offer => "Offer",
      Self::Hired => "Hired",
      Self::Rejected => "Rejected",
    }
  }
}

// ─── Candidate ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
  pub id:         Uuid,
  pub name:       String,
  pub email:      String,
  pub stage:      Stage,
  pub job_id:     Uuid,
  pub applied_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub notes:      Option<String>,
}

/// Input to [`crate::store::HiringStore::create_candidate`].
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewCandidate {
  #[validate(custom(function = "not_blank", message = "Name is required"))]
  pub name:   String,
  #[validate(email(message = "A valid email is required"))]
  pub email:  String,
  pub job_id: Uuid,
  #[serde(default)]
  pub stage:  Stage,
  #[serde(default)]
  pub notes:  Option<String>,
}

/// Partial update accepted by `PATCH /candidates/{id}`.
///
/// A `stage` different from the current one appends a [`TimelineEvent`]
/// carrying `note`. An empty `notes` string clears the notes.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidatePatch {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub stage: Option<Stage>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub notes: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub note:  Option<String>,
}

impl CandidatePatch {
  pub fn stage(stage: Stage) -> Self {
    Self { stage: Some(stage), ..Self::default() }
  }

  pub fn notes(notes: impl Into<String>) -> Self {
    Self { notes: Some(notes.into()), ..Self::default() }
  }
}

// ─── Timeline ────────────────────────────────────────────────────────────────

/// An immutable record of a candidate entering a stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineEvent {
  pub id:           Uuid,
  pub candidate_id: Uuid,
  pub stage:        Stage,
  pub timestamp:    DateTime<Utc>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub note:         Option<String>,
}

/// Timestamp for an event appended after `latest`: never earlier than it.
pub fn next_event_time(
  now: DateTime<Utc>,
  latest: Option<DateTime<Utc>>,
) -> DateTime<Utc> {
  match latest {
    Some(l) if l > now => l,
    _ => now,
  }
}

// ─── Stage summary ───────────────────────────────────────────────────────────

/// One row of the per-stage distribution shown under the candidate list.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StageShare {
  pub stage:   Stage,
  pub count:   usize,
  /// Share of the whole set, 0–100.
  pub percent: f64,
}

/// Per-stage counts and percentages across all six stages.
#[derive(Debug, Clone, PartialEq)]
pub struct StageSummary {
  pub total:  usize,
  pub shares: Vec<StageShare>,
}

impl StageSummary {
  pub fn from_candidates<'a>(
    candidates: impl IntoIterator<Item = &'a Candidate>,
  ) -> Self {
    let mut counts = [0usize; 6];
    for c in candidates {
      counts[c.stage.index()] += 1;
    }
    let total: usize = counts.iter().sum();
    let shares = Stage::ALL
      .iter()
      .zip(counts)
      .map(|(&stage, count)| StageShare {
        stage,
        count,
        percent: if total == 0 {
          0.0
        } else {
          count as f64 * 100.0 / total as f64
        },
      })
      .collect();
    Self { total, shares }
  }

  pub fn count(&self, stage: Stage) -> usize {
    self.shares[stage.index()].count
  }
}
