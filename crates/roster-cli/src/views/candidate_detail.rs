//! Candidate profile: stage transitions, the event timeline and notes.

use roster_core::candidate::{Candidate, CandidatePatch, Stage, TimelineEvent};

use super::input::TextInput;

#[derive(Debug, Clone)]
pub struct CandidateDetail {
  pub candidate:     Candidate,
  pub job_title:     Option<String>,
  pub timeline:      Vec<TimelineEvent>,
  /// Index into [`Stage::ALL`] of the highlighted transition target.
  pub target:        usize,
  pub notes:         TextInput,
  pub editing_notes: bool,
}

impl CandidateDetail {
  pub fn new(candidate: Candidate, job_title: Option<String>, timeline: Vec<TimelineEvent>) -> Self {
    let notes = TextInput::new(candidate.notes.clone().unwrap_or_default());
    Self {
      target: candidate.stage.index(),
      candidate,
      job_title,
      timeline,
      notes,
      editing_notes: false,
    }
  }

  /// Every stage, paired with whether moving there is allowed.
  pub fn targets(&self) -> impl Iterator<Item = (Stage, bool)> + '_ {
    Stage::ALL.iter().map(|&s| (s, s != self.candidate.stage))
  }

  pub fn move_target(&mut self, forward: bool) {
    let len = Stage::ALL.len();
    self.target = if forward {
      (self.target + 1) % len
    } else {
      (self.target + len - 1) % len
    };
  }

  /// The patch for the highlighted stage, unless it is the current one.
  pub fn transition(&self) -> Option<CandidatePatch> {
    let stage = Stage::from_index(self.target)?;
    (stage != self.candidate.stage).then(|| CandidatePatch::stage(stage))
  }

  pub fn notes_patch(&self) -> CandidatePatch { CandidatePatch::notes(self.notes.value.trim()) }

  pub fn cancel_notes(&mut self) {
    self.notes = TextInput::new(self.candidate.notes.clone().unwrap_or_default());
    self.editing_notes = false;
  }

  /// Replace the candidate and timeline after a successful update.
  pub fn refresh(&mut self, candidate: Candidate, timeline: Vec<TimelineEvent>) {
    self.notes = TextInput::new(candidate.notes.clone().unwrap_or_default());
    self.candidate = candidate;
    self.timeline = timeline;
    self.editing_notes = false;
  }
}

#[cfg(test)]
mod tests {
  use chrono::Utc;
  use uuid::Uuid;

  use super::*;

  fn detail(stage: Stage) -> CandidateDetail {
    let candidate = Candidate {
      id: Uuid::new_v4(),
      name: "Ada".into(),
      email: "ada@example.com".into(),
      stage,
      job_id: Uuid::new_v4(),
      applied_at: Utc::now(),
      updated_at: Utc::now(),
      notes: Some("strong".into()),
    };
    CandidateDetail::new(candidate, None, Vec::new())
  }

  #[test]
  fn current_stage_is_disabled() {
    let d = detail(Stage::Screen);
    let disabled: Vec<_> = d.targets().filter(|(_, ok)| !ok).map(|(s, _)| s).collect();
    assert_eq!(disabled, [Stage::Screen]);
    assert!(d.transition().is_none());
  }

  #[test]
  fn moving_target_yields_stage_patch() {
    let mut d = detail(Stage::Rejected);
    d.move_target(true);
    let patch = d.transition().unwrap();
    assert_eq!(patch.stage, Some(Stage::Applied));
    assert_eq!(patch.notes, None);
  }

  #[test]
  fn notes_edit_and_cancel() {
    let mut d = detail(Stage::Applied);
    assert_eq!(d.notes.value, "strong");
    d.notes = TextInput::new("  ");
    assert_eq!(d.notes_patch().notes.as_deref(), Some(""));
    d.cancel_notes();
    assert_eq!(d.notes.value, "strong");
  }
}
