//! Candidate list: the whole set is held client-side and narrowed by a text
//! search and a stage filter without further requests.

use std::collections::HashMap;

use roster_core::candidate::{Candidate, Stage, StageSummary};
use uuid::Uuid;

use super::input::TextInput;

/// Page size used to fetch the held set in one request.
pub const HELD_PAGE_SIZE: u32 = 5000;

#[derive(Debug, Clone, Default)]
pub struct CandidateList {
  pub all:        Vec<Candidate>,
  /// Job titles for display, keyed by job id.
  pub job_titles: HashMap<Uuid, String>,
  pub search:     TextInput,
  pub searching:  bool,
  pub stage:      Option<Stage>,
  pub cursor:     usize,
}

impl CandidateList {
  pub fn set_candidates(&mut self, candidates: Vec<Candidate>) {
    self.all = candidates;
    self.clamp();
  }

  /// Candidates matching the search (name or email, case-insensitive) and
  /// the stage filter.
  pub fn visible(&self) -> Vec<&Candidate> {
    let needle = self.search.value.trim().to_lowercase();
    self
      .all
      .iter()
      .filter(|c| self.stage.is_none_or(|s| c.stage == s))
      .filter(|c| {
        needle.is_empty()
          || c.name.to_lowercase().contains(&needle)
          || c.email.to_lowercase().contains(&needle)
      })
      .collect()
  }

  /// Distribution across the whole held set.
  pub fn summary(&self) -> StageSummary { StageSummary::from_candidates(&self.all) }

  pub fn selected(&self) -> Option<&Candidate> { self.visible().get(self.cursor).copied() }

  pub fn move_cursor(&mut self, delta: isize) {
    let len = self.visible().len();
    if len == 0 {
      self.cursor = 0;
      return;
    }
    self.cursor = self.cursor.saturating_add_signed(delta).min(len - 1);
  }

  /// All → applied → … → rejected → all.
  pub fn cycle_stage(&mut self) {
    self.stage = match self.stage {
      None => Stage::from_index(0),
      Some(s) => Stage::from_index(s.index() + 1),
    };
    self.cursor = 0;
  }

  /// Call after the search text changes.
  pub fn search_changed(&mut self) { self.cursor = 0; }

  fn clamp(&mut self) {
    self.cursor = self.cursor.min(self.visible().len().saturating_sub(1));
  }

  pub fn job_title(&self, job_id: Uuid) -> &str {
    self.job_titles.get(&job_id).map_or("Unknown job", String::as_str)
  }
}
