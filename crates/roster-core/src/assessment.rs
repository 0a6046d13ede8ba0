//! Per-job assessments: a title and an ordered tree of sections and
//! questions.
//!
//! The editing helpers here are what the builder view drives. They never
//! discard data the user typed: switching a question's type keeps every
//! type-specific field, so switching back restores it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString, IntoEnumIterator};
use uuid::Uuid;

// ─── Question kind ───────────────────────────────────────────────────────────

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
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum QuestionKind {
  #[default]
  ShortText,
  LongText,
  SingleChoice,
  MultiChoice,
  Numeric,
  FileUpload,
}

impl QuestionKind {
  pub fn is_choice(self) -> bool {
    matches!(self, Self::SingleChoice | Self::MultiChoice)
  }

  pub fn is_text(self) -> bool { matches!(self, Self::ShortText | Self::LongText) }

  pub fn is_numeric(self) -> bool { matches!(self, Self::Numeric) }

  pub fn label(self) -> &'static str {
    match self {
      Self::ShortText => "Short Text",
      Self::LongText => "Long Text",
      Self::SingleChoice => "Single Choice",
      Self::MultiChoice => "Multiple Choice",
      Self::Numeric => "Numeric",
      Self::FileUpload => "File Upload",
    }
  }

  /// The next kind in declaration order, wrapping around.
  pub fn cycled(self) -> Self {
    let all: Vec<_> = Self::iter().collect();
    let i = all.iter().position(|&k| k == self).unwrap_or_default();
    all[(i + 1) % all.len()]
  }
}

// ─── Tree ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
  pub id:         Uuid,
  #[serde(rename = "type")]
  pub kind:       QuestionKind,
  pub question:   String,
  pub required:   bool,
  /// Choice kinds only.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub options:    Option<Vec<String>>,
  /// Numeric only.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub min:        Option<i64>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub max:        Option<i64>,
  /// Text kinds only.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub max_length: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
  pub id:        Uuid,
  pub title:     String,
  pub questions: Vec<Question>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Assessment {
  pub id:         Uuid,
  pub job_id:     Uuid,
  pub title:      String,
  pub sections:   Vec<Section>,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

// ─── Construction ────────────────────────────────────────────────────────────

impl Question {
  pub fn new() -> Self {
    Self {
      id:         Uuid::new_v4(),
      kind:       QuestionKind::ShortText,
      question:   "New Question".into(),
      required:   true,
      options:    None,
      min:        None,
      max:        None,
      max_length: None,
    }
  }
}

impl Default for Question {
  fn default() -> Self { Self::new() }
}

impl Section {
  pub fn new() -> Self {
    Self {
      id:        Uuid::new_v4(),
      title:     "New Section".into(),
      questions: Vec::new(),
    }
  }
}

impl Default for Section {
  fn default() -> Self { Self::new() }
}

impl Assessment {
  /// The unsaved draft shown when a job has no assessment yet.
  pub fn draft(job_id: Uuid, now: DateTime<Utc>) -> Self {
    Self {
      id: Uuid::new_v4(),
      job_id,
      title: "Assessment".into(),
      sections: Vec::new(),
      created_at: now,
      updated_at: now,
    }
  }

  pub fn question_count(&self) -> usize {
    self.sections.iter().map(|s| s.questions.len()).sum()
  }
}

// ─── Editing ─────────────────────────────────────────────────────────────────

impl Assessment {
  pub fn add_section(&mut self) -> Uuid {
    let section = Section::new();
    let id = section.id;
    self.sections.push(section);
    id
  }

  pub fn remove_section(&mut self, section_id: Uuid) -> bool {
    let before = self.sections.len();
    self.sections.retain(|s| s.id != section_id);
    self.sections.len() != before
  }

  pub fn section_mut(&mut self, section_id: Uuid) -> Option<&mut Section> {
    self.sections.iter_mut().find(|s| s.id == section_id)
  }

  /// Append a fresh question to the section. `None` if no such section.
  pub fn add_question(&mut self, section_id: Uuid) -> Option<Uuid> {
    let section = self.section_mut(section_id)?;
    let question = Question::new();
    let id = question.id;
    section.questions.push(question);
    Some(id)
  }

  pub fn remove_question(&mut self, section_id: Uuid, question_id: Uuid) -> bool {
    let Some(section) = self.section_mut(section_id) else {
      return false;
    };
    let before = section.questions.len();
    section.questions.retain(|q| q.id != question_id);
    section.questions.len() != before
  }

  pub fn question_mut(
    &mut self,
    section_id: Uuid,
    question_id: Uuid,
  ) -> Option<&mut Question> {
    self
      .section_mut(section_id)?
      .questions
      .iter_mut()
      .find(|q| q.id == question_id)
  }
}

impl Question {
  /// Change the kind only. Options, bounds and max length are kept.
  pub fn set_kind(&mut self, kind: QuestionKind) { self.kind = kind; }

  /// Options as the newline-delimited text the editor shows.
  pub fn options_text(&self) -> String {
    self.options.as_deref().unwrap_or_default().join("\n")
  }

  /// Replace options from newline-delimited text; blank lines are dropped.
  pub fn set_options_text(&mut self, text: &str) {
    let options: Vec<String> = text
      .lines()
      .map(str::trim)
      .filter(|l| !l.is_empty())
      .map(str::to_owned)
      .collect();
    self.options = Some(options);
  }

  pub fn set_min_text(&mut self, text: &str) { self.min = parse_number(text); }

  pub fn set_max_text(&mut self, text: &str) { self.max = parse_number(text); }

  pub fn set_max_length_text(&mut self, text: &str) {
    self.max_length = parse_number(text);
  }
}

/// Empty or unparsable input clears the field.
fn parse_number<T: std::str::FromStr>(text: &str) -> Option<T> {
  text.trim().parse().ok()
}
