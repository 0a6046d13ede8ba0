//! Assessment builder: the section/question tree flattened into rows, inline
//! field editing and a live preview of the form a candidate would see.

use roster_core::assessment::{Assessment, Question, QuestionKind};
use uuid::Uuid;

use super::input::TextInput;

/// One selectable line of the builder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Row {
  Title,
  Section(Uuid),
  Question(Uuid, Uuid),
}

/// Which property of the current row an edit targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditTarget {
  Text,
  Options,
  Min,
  Max,
  MaxLength,
}

#[derive(Debug, Clone)]
pub struct FieldEdit {
  pub row:    Row,
  pub target: EditTarget,
  pub input:  TextInput,
}

impl FieldEdit {
  /// Options are entered one per line.
  pub fn is_multiline(&self) -> bool { self.target == EditTarget::Options }

  pub fn label(&self) -> &'static str {
    match (self.row, self.target) {
      (Row::Title, _) => "Assessment title",
      (Row::Section(_), _) => "Section title",
      (Row::Question(..), EditTarget::Text) => "Question",
      (_, EditTarget::Options) => "Options (one per line)",
      (_, EditTarget::Min) => "Minimum",
      (_, EditTarget::Max) => "Maximum",
      (_, EditTarget::MaxLength) => "Max length",
    }
  }
}

#[derive(Debug, Clone)]
pub struct AssessmentBuilder {
  pub assessment: Assessment,
  pub job_title:  String,
  pub cursor:     usize,
  pub editing:    Option<FieldEdit>,
  pub preview:    bool,
  /// Unsaved changes exist.
  pub dirty:      bool,
  /// The assessment has been stored at least once.
  pub persisted:  bool,
}

impl AssessmentBuilder {
  pub fn new(assessment: Assessment, job_title: String, persisted: bool) -> Self {
    Self {
      assessment,
      job_title,
      cursor: 0,
      editing: None,
      preview: false,
      dirty: false,
      persisted,
    }
  }

  pub fn rows(&self) -> Vec<Row> {
    let mut rows = vec![Row::Title];
    for section in &self.assessment.sections {
      rows.push(Row::Section(section.id));
      rows.extend(section.questions.iter().map(|q| Row::Question(section.id, q.id)));
    }
    rows
  }

  pub fn current(&self) -> Row {
    self.rows().get(self.cursor).copied().unwrap_or(Row::Title)
  }

  fn select(&mut self, row: Row) {
    if let Some(i) = self.rows().iter().position(|&r| r == row) {
      self.cursor = i;
    }
  }

  pub fn move_cursor(&mut self, down: bool) {
    let len = self.rows().len();
    self.cursor = if down {
      (self.cursor + 1).min(len - 1)
    } else {
      self.cursor.saturating_sub(1)
    };
  }

  fn current_question(&self) -> Option<&Question> {
    let Row::Question(sid, qid) = self.current() else {
      return None;
    };
    self
      .assessment
      .sections
      .iter()
      .find(|s| s.id == sid)?
      .questions
      .iter()
      .find(|q| q.id == qid)
  }

  fn current_question_mut(&mut self) -> Option<&mut Question> {
    let Row::Question(sid, qid) = self.current() else {
      return None;
    };
    self.assessment.question_mut(sid, qid)
  }

  // ── Structure ─────────────────────────────────────────────────────────────

  pub fn add_section(&mut self) {
    let id = self.assessment.add_section();
    self.dirty = true;
    self.select(Row::Section(id));
  }

  /// Add a question to the section under the cursor.
  pub fn add_question(&mut self) -> bool {
    let section_id = match self.current() {
      Row::Section(sid) | Row::Question(sid, _) => sid,
      Row::Title => return false,
    };
    let Some(qid) = self.assessment.add_question(section_id) else {
      return false;
    };
    self.dirty = true;
    self.select(Row::Question(section_id, qid));
    true
  }

  /// Remove the section or question under the cursor.
  pub fn remove_current(&mut self) -> bool {
    let removed = match self.current() {
      Row::Title => false,
      Row::Section(sid) => self.assessment.remove_section(sid),
      Row::Question(sid, qid) => self.assessment.remove_question(sid, qid),
    };
    if removed {
      self.dirty = true;
      self.cursor = self.cursor.min(self.rows().len() - 1);
    }
    removed
  }

  pub fn toggle_required(&mut self) -> bool {
    let Some(q) = self.current_question_mut() else {
      return false;
    };
    q.required = !q.required;
    self.dirty = true;
    true
  }

  pub fn cycle_kind(&mut self) -> bool {
    let Some(q) = self.current_question_mut() else {
      return false;
    };
    q.set_kind(q.kind.cycled());
    self.dirty = true;
    true
  }

  // ── Field editing ─────────────────────────────────────────────────────────

  /// Open an editor on the current row. Type-specific targets are only
  /// offered for questions of a kind that uses them.
  pub fn begin_edit(&mut self, target: EditTarget) -> bool {
    let row = self.current();
    let value = match (row, target) {
      (Row::Title, EditTarget::Text) => self.assessment.title.clone(),
      (Row::Section(sid), EditTarget::Text) => {
        match self.assessment.sections.iter().find(|s| s.id == sid) {
          Some(s) => s.title.clone(),
          None => return false,
        }
      }
      (Row::Question(..), _) => {
        let Some(q) = self.current_question() else {
          return false;
        };
        match target {
          EditTarget::Text => q.question.clone(),
          EditTarget::Options if q.kind.is_choice() => q.options_text(),
          EditTarget::Min if q.kind.is_numeric() => number_text(q.min),
          EditTarget::Max if q.kind.is_numeric() => number_text(q.max),
          EditTarget::MaxLength if q.kind.is_text() => number_text(q.max_length),
          _ => return false,
        }
      }
      _ => return false,
    };
    self.editing = Some(FieldEdit { row, target, input: TextInput::new(value) });
    true
  }

  pub fn commit_edit(&mut self) {
    if let Some(edit) = self.editing.take() {
      apply_edit(&mut self.assessment, &edit);
      self.dirty = true;
    }
  }

  pub fn cancel_edit(&mut self) { self.editing = None; }

  /// Record a successful save.
  pub fn saved(&mut self, assessment: Assessment) {
    self.assessment = assessment;
    self.dirty = false;
    self.persisted = true;
    self.cursor = self.cursor.min(self.rows().len() - 1);
  }

  // ── Preview ───────────────────────────────────────────────────────────────

  /// The form as a candidate would see it, including any edit in progress.
  pub fn preview_lines(&self) -> Vec<PreviewLine> {
    match &self.editing {
      Some(edit) => {
        let mut pending = self.assessment.clone();
        apply_edit(&mut pending, edit);
        render_preview(&pending)
      }
      None => render_preview(&self.assessment),
    }
  }
}

fn number_text<T: ToString>(n: Option<T>) -> String {
  n.map(|n| n.to_string()).unwrap_or_default()
}

fn apply_edit(assessment: &mut Assessment, edit: &FieldEdit) {
  let text = edit.input.as_str();
  match edit.row {
    Row::Title => assessment.title = text.trim().to_owned(),
    Row::Section(sid) => {
      if let Some(s) = assessment.section_mut(sid) {
        s.title = text.trim().to_owned();
      }
    }
    Row::Question(sid, qid) => {
      let Some(q) = assessment.question_mut(sid, qid) else {
        return;
      };
      match edit.target {
        EditTarget::Text => q.question = text.trim().to_owned(),
        EditTarget::Options => q.set_options_text(text),
        EditTarget::Min => q.set_min_text(text),
        EditTarget::Max => q.set_max_text(text),
        EditTarget::MaxLength => q.set_max_length_text(text),
      }
    }
  }
}

// ─── Preview rendering ────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreviewStyle {
  Heading,
  Section,
  Label,
  Control,
  Hint,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewLine {
  pub indent: u16,
  pub style:  PreviewStyle,
  pub text:   String,
}

impl PreviewLine {
  fn new(indent: u16, style: PreviewStyle, text: impl Into<String>) -> Self {
    Self { indent, style, text: text.into() }
  }
}

fn render_preview(assessment: &Assessment) -> Vec<PreviewLine> {
  use PreviewStyle::*;

  let mut lines = vec![PreviewLine::new(0, Heading, assessment.title.clone())];
  if assessment.sections.is_empty() {
    lines.push(PreviewLine::new(0, Hint, "No sections yet"));
  }
  for section in &assessment.sections {
    lines.push(PreviewLine::new(0, Section, section.title.clone()));
    for (n, q) in section.questions.iter().enumerate() {
      let marker = if q.required { " *" } else { "" };
      lines.push(PreviewLine::new(1, Label, format!("{}. {}{marker}", n + 1, q.question)));
      lines.extend(question_controls(q));
    }
  }
  lines
}

fn question_controls(q: &Question) -> Vec<PreviewLine> {
  use PreviewStyle::*;

  let options = q.options.as_deref().unwrap_or_default();
  match q.kind {
    QuestionKind::ShortText => {
      let mut lines = vec![PreviewLine::new(2, Control, "[ Your answer...                ]")];
      lines.extend(length_hint(q));
      lines
    }
    QuestionKind::LongText => {
      let mut lines = vec![
        PreviewLine::new(2, Control, "┌ Your answer...                 ┐"),
        PreviewLine::new(2, Control, "│                                │"),
        PreviewLine::new(2, Control, "└                                ┘"),
      ];
      lines.extend(length_hint(q));
      lines
    }
    QuestionKind::SingleChoice => options
      .iter()
      .map(|o| PreviewLine::new(2, Control, format!("( ) {o}")))
      .collect(),
    QuestionKind::MultiChoice => options
      .iter()
      .map(|o| PreviewLine::new(2, Control, format!("[ ] {o}")))
      .collect(),
    QuestionKind::Numeric => {
      let mut lines = vec![PreviewLine::new(2, Control, "[ Enter number... ]")];
      let bounds: Vec<String> = [("min", q.min), ("max", q.max)]
        .into_iter()
        .filter_map(|(name, v)| v.map(|v| format!("{name} {v}")))
        .collect();
      if !bounds.is_empty() {
        lines.push(PreviewLine::new(2, Hint, bounds.join(", ")));
      }
      lines
    }
    QuestionKind::FileUpload => vec![PreviewLine::new(2, Control, "[ File upload area ]")],
  }
}

fn length_hint(q: &Question) -> Option<PreviewLine> {
  q.max_length
    .map(|n| PreviewLine::new(2, PreviewStyle::Hint, format!("max {n} characters")))
}

#[cfg(test)]
mod tests {
  use chrono::Utc;

  use super::*;

  fn builder() -> AssessmentBuilder {
    AssessmentBuilder::new(Assessment::draft(Uuid::new_v4(), Utc::now()), "Engineer".into(), false)
  }

  fn texts(lines: &[PreviewLine]) -> Vec<&str> { lines.iter().map(|l| l.text.as_str()).collect() }

  #[test]
  fn rows_follow_the_tree() {
    let mut b = builder();
    assert!(!b.add_question());
    b.add_section();
    assert!(b.add_question());
    assert!(b.add_question());
    b.add_section();

    let rows = b.rows();
    assert_eq!(rows.len(), 5);
    assert!(matches!(rows[1], Row::Section(_)));
    assert!(matches!(rows[3], Row::Question(..)));
    assert_eq!(b.current(), rows[4]);
    assert!(b.dirty);
  }

  #[test]
  fn removing_a_section_drops_its_questions() {
    let mut b = builder();
    b.add_section();
    b.add_question();
    b.move_cursor(false);
    assert!(b.remove_current());
    assert_eq!(b.rows(), [Row::Title]);
    assert_eq!(b.cursor, 0);
    assert!(!b.remove_current());
  }

  #[test]
  fn type_specific_edits_follow_the_kind() {
    let mut b = builder();
    b.add_section();
    b.add_question();

    assert!(!b.begin_edit(EditTarget::Options));
    assert!(b.begin_edit(EditTarget::MaxLength));
    b.editing.as_mut().unwrap().input = TextInput::new("200");
    b.commit_edit();

    // short-text → long-text → single-choice
    b.cycle_kind();
    b.cycle_kind();
    assert!(b.begin_edit(EditTarget::Options));
    assert!(b.editing.as_ref().unwrap().is_multiline());
    b.editing.as_mut().unwrap().input = TextInput::new("Yes\n\nNo\n");
    b.commit_edit();

    let q = b.current_question().unwrap();
    assert_eq!(q.kind, QuestionKind::SingleChoice);
    assert_eq!(q.options.as_deref().unwrap(), ["Yes", "No"]);
    assert_eq!(q.max_length, Some(200));
    assert!(!b.begin_edit(EditTarget::Min));
  }

  #[test]
  fn preview_reflects_pending_edit() {
    let mut b = builder();
    b.add_section();
    b.add_question();
    b.begin_edit(EditTarget::Text);
    b.editing.as_mut().unwrap().input = TextInput::new("Why Rust?");

    let preview = b.preview_lines();
    assert!(texts(&preview).contains(&"1. Why Rust? *"));
    assert_eq!(b.current_question().unwrap().question, "New Question");

    b.cancel_edit();
    b.toggle_required();
    assert!(texts(&b.preview_lines()).contains(&"1. New Question"));
  }

  #[test]
  fn preview_controls_by_kind() {
    let mut b = builder();
    b.add_section();
    b.add_question();
    for _ in 0..3 {
      b.cycle_kind();
    }
    b.begin_edit(EditTarget::Options);
    b.editing.as_mut().unwrap().input = TextInput::new("Rust\nGo");
    b.commit_edit();
    assert!(texts(&b.preview_lines()).ends_with(&["[ ] Rust", "[ ] Go"]));

    b.cycle_kind();
    b.begin_edit(EditTarget::Min);
    b.editing.as_mut().unwrap().input = TextInput::new("1");
    b.commit_edit();
    let preview = b.preview_lines();
    assert!(texts(&preview).ends_with(&["[ Enter number... ]", "min 1"]));

    b.cycle_kind();
    assert_eq!(texts(&b.preview_lines()).last(), Some(&"[ File upload area ]"));
  }

  #[test]
  fn save_clears_dirty_flag() {
    let mut b = builder();
    b.add_section();
    let saved = b.assessment.clone();
    b.saved(saved);
    assert!(!b.dirty);
    assert!(b.persisted);
  }
}
