//! Kanban board: one column per stage. A candidate is picked up, carried to
//! another column and dropped; the drop is applied locally at once and then
//! persisted.

use roster_core::candidate::{Candidate, CandidatePatch, Stage};
use uuid::Uuid;

/// A stage change produced by a drop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StageMove {
  pub id:   Uuid,
  pub from: Stage,
  pub to:   Stage,
}

impl StageMove {
  /// The update sent for the move, with its timeline note.
  pub fn patch(&self) -> CandidatePatch {
    CandidatePatch {
      note: Some(format!("Moved to {}", self.to)),
      ..CandidatePatch::stage(self.to)
    }
  }
}

#[derive(Debug, Clone, Default)]
pub struct PipelineBoard {
  pub candidates: Vec<Candidate>,
  pub column:     usize,
  pub row:        usize,
  /// The candidate being carried, if any.
  pub carrying:   Option<Uuid>,
}

impl PipelineBoard {
  pub fn set_candidates(&mut self, candidates: Vec<Candidate>) {
    self.candidates = candidates;
    if self
      .carrying
      .is_some_and(|id| !self.candidates.iter().any(|c| c.id == id))
    {
      self.carrying = None;
    }
    self.clamp_row();
  }

  pub fn column_stage(&self) -> Stage { Stage::ALL[self.column] }

  pub fn in_stage(&self, stage: Stage) -> Vec<&Candidate> {
    self.candidates.iter().filter(|c| c.stage == stage).collect()
  }

  pub fn selected(&self) -> Option<&Candidate> {
    self.in_stage(self.column_stage()).get(self.row).copied()
  }

  pub fn carried(&self) -> Option<&Candidate> {
    let id = self.carrying?;
    self.candidates.iter().find(|c| c.id == id)
  }

  pub fn move_column(&mut self, right: bool) {
    self.column = if right {
      (self.column + 1).min(Stage::ALL.len() - 1)
    } else {
      self.column.saturating_sub(1)
    };
    self.clamp_row();
  }

  pub fn move_row(&mut self, down: bool) {
    if down {
      self.row += 1;
    } else {
      self.row = self.row.saturating_sub(1);
    }
    self.clamp_row();
  }

  fn clamp_row(&mut self) {
    let len = self.in_stage(self.column_stage()).len();
    self.row = self.row.min(len.saturating_sub(1));
  }

  /// Start carrying the selected candidate.
  pub fn pick_up(&mut self) -> bool {
    self.carrying = self.selected().map(|c| c.id);
    self.carrying.is_some()
  }

  pub fn cancel(&mut self) { self.carrying = None; }

  /// Drop the carried candidate on the current column. Dropping on its own
  /// column is a no-op.
  pub fn drop_here(&mut self) -> Option<StageMove> {
    let id = self.carrying.take()?;
    let to = self.column_stage();
    let candidate = self.candidates.iter_mut().find(|c| c.id == id)?;
    if candidate.stage == to {
      return None;
    }
    let from = candidate.stage;
    candidate.stage = to;
    if let Some(row) = self.in_stage(to).iter().position(|c| c.id == id) {
      self.row = row;
    }
    Some(StageMove { id, from, to })
  }
}
