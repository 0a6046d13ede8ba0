//! A single job with the candidates who applied to it.

use roster_core::{
  candidate::{Candidate, StageSummary},
  job::Job,
};

#[derive(Debug, Clone)]
pub struct JobDetail {
  pub job:        Job,
  pub candidates: Vec<Candidate>,
  pub cursor:     usize,
}

impl JobDetail {
  pub fn new(job: Job, candidates: Vec<Candidate>) -> Self {
    Self { job, candidates, cursor: 0 }
  }

  pub fn summary(&self) -> StageSummary { StageSummary::from_candidates(&self.candidates) }

  pub fn selected(&self) -> Option<&Candidate> { self.candidates.get(self.cursor) }

  pub fn move_cursor(&mut self, down: bool) {
    if down {
      if self.cursor + 1 < self.candidates.len() {
        self.cursor += 1;
      }
    } else {
      self.cursor = self.cursor.saturating_sub(1);
    }
  }
}
