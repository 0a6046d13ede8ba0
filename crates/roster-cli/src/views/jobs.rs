//! Jobs board: paginated list, filters, the create/edit form and reorder.

use roster_core::{
  job::{Job, JobPatch, JobSort, JobStatus, NewJob},
  page::{DEFAULT_PAGE_SIZE, Page, Pagination},
  validation::{ValidationErrors, field_errors},
};
use uuid::Uuid;

use super::input::TextInput;
use crate::client::JobFilter;

// ─── Form ─────────────────────────────────────────────────────────────────────

pub const FORM_LABELS: [&str; 4] = [
  "Title",
  "Description",
  "Tags (comma separated)",
  "Requirements (; separated)",
];

const TITLE: usize = 0;
const DESCRIPTION: usize = 1;
const TAGS: usize = 2;
const REQUIREMENTS: usize = 3;

/// What a valid form turns into.
#[derive(Debug, Clone)]
pub enum Submission {
  Create(NewJob),
  Update(Uuid, JobPatch),
}

/// Create/edit form. Lists are entered on one line; every listed entry must
/// be non-blank, so `"a,,b"` fails validation rather than dropping the gap.
#[derive(Debug, Clone, Default)]
pub struct JobForm {
  pub editing: Option<Uuid>,
  pub fields:  [TextInput; 4],
  pub focus:   usize,
  pub errors:  ValidationErrors,
}

fn split_list(text: &str, sep: char) -> Vec<String> {
  if text.trim().is_empty() {
    return Vec::new();
  }
  text.split(sep).map(|s| s.trim().to_owned()).collect()
}

impl JobForm {
  pub fn new() -> Self { Self::default() }

  pub fn edit(job: &Job) -> Self {
    Self {
      editing: Some(job.id),
      fields: [
        TextInput::new(job.title.clone()),
        TextInput::new(job.description.clone().unwrap_or_default()),
        TextInput::new(job.tags.join(", ")),
        TextInput::new(job.requirements.clone().unwrap_or_default().join("; ")),
      ],
      focus: 0,
      errors: ValidationErrors::new(),
    }
  }

  pub fn focused(&mut self) -> &mut TextInput { &mut self.fields[self.focus] }

  pub fn next_field(&mut self) { self.focus = (self.focus + 1) % self.fields.len(); }

  pub fn prev_field(&mut self) {
    self.focus = (self.focus + self.fields.len() - 1) % self.fields.len();
  }

  fn new_job(&self) -> NewJob {
    NewJob {
      title:        self.fields[TITLE].value.trim().to_owned(),
      description:  Some(self.fields[DESCRIPTION].value.trim().to_owned()),
      requirements: split_list(&self.fields[REQUIREMENTS].value, ';'),
      tags:         split_list(&self.fields[TAGS].value, ','),
    }
  }

  /// Validate and build the request. On failure the field errors are kept
  /// on the form and nothing should be sent.
  pub fn submit(&mut self) -> Option<Submission> {
    let job = self.new_job();
    self.errors = field_errors(&job);
    if !self.errors.is_empty() {
      return None;
    }
    Some(match self.editing {
      None => Submission::Create(job),
      Some(id) => Submission::Update(id, JobPatch {
        title:        Some(job.title),
        description:  job.description,
        requirements: Some(job.requirements),
        tags:         Some(job.tags),
        status:       None,
      }),
    })
  }

  /// Field errors as returned by the API, keyed the same way.
  pub fn set_errors(&mut self, errors: ValidationErrors) { self.errors = errors; }

  pub fn error_for(&self, index: usize) -> Option<&str> {
    let key = match index {
      TITLE => "title",
      DESCRIPTION => "description",
      TAGS => "tags",
      _ => "requirements",
    };
    self.errors.get(key)
  }
}

// ─── Board ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default)]
pub enum JobsMode {
  #[default]
  Browse,
  Search,
  Form(JobForm),
  ConfirmDelete(Uuid),
}

/// A reorder request: move `id` from `from_order` onto its neighbour's slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reorder {
  pub id:         Uuid,
  pub from_order: i64,
  pub to_order:   i64,
}

#[derive(Debug, Clone)]
pub struct JobsBoard {
  pub jobs:       Vec<Job>,
  pub pagination: Option<Pagination>,
  pub cursor:     usize,
  pub search:     TextInput,
  pub status:     Option<JobStatus>,
  pub sort:       JobSort,
  pub page:       u32,
  pub mode:       JobsMode,
}

impl Default for JobsBoard {
  fn default() -> Self {
    Self {
      jobs:       Vec::new(),
      pagination: None,
      cursor:     0,
      search:     TextInput::default(),
      status:     None,
      sort:       JobSort::Order,
      page:       1,
      mode:       JobsMode::Browse,
    }
  }
}

impl JobsBoard {
  pub fn filter(&self) -> JobFilter {
    JobFilter {
      search:    self.search.value.trim().to_owned(),
      status:    self.status,
      sort:      self.sort,
      page:      self.page,
      page_size: DEFAULT_PAGE_SIZE,
    }
  }

  pub fn set_page(&mut self, page: Page<Job>) {
    self.jobs = page.data;
    self.pagination = Some(page.pagination);
    self.cursor = self.cursor.min(self.jobs.len().saturating_sub(1));
  }

  pub fn selected(&self) -> Option<&Job> { self.jobs.get(self.cursor) }

  /// Put the cursor on `id` if it is on this page.
  pub fn select(&mut self, id: Uuid) {
    if let Some(i) = self.jobs.iter().position(|j| j.id == id) {
      self.cursor = i;
    }
  }

  pub fn move_cursor(&mut self, down: bool) {
    if down {
      if self.cursor + 1 < self.jobs.len() {
        self.cursor += 1;
      }
    } else {
      self.cursor = self.cursor.saturating_sub(1);
    }
  }

  /// All → active → archived → all. Resets to the first page.
  pub fn cycle_status(&mut self) {
    self.status = match self.status {
      None => Some(JobStatus::Active),
      Some(JobStatus::Active) => Some(JobStatus::Archived),
      Some(JobStatus::Archived) => None,
    };
    self.page = 1;
  }

  pub fn cycle_sort(&mut self) {
    self.sort = match self.sort {
      JobSort::Order => JobSort::Title,
      JobSort::Title => JobSort::CreatedAt,
      JobSort::CreatedAt => JobSort::Order,
    };
    self.page = 1;
  }

  /// Returns `true` if the page changed.
  pub fn turn_page(&mut self, forward: bool) -> bool {
    let last = self.pagination.map_or(1, |p| p.total_pages as u32);
    let next = if forward {
      (self.page + 1).min(last)
    } else {
      self.page.saturating_sub(1).max(1)
    };
    let changed = next != self.page;
    self.page = next;
    if changed {
      self.cursor = 0;
    }
    changed
  }

  /// Dropping the selected job onto the neighbour above (or below) sends the
  /// neighbour's `order` as the target. Only meaningful in board order.
  pub fn reorder_target(&self, up: bool) -> Option<Reorder> {
    if self.sort != JobSort::Order {
      return None;
    }
    let job = self.selected()?;
    let neighbour = if up {
      self.jobs.get(self.cursor.checked_sub(1)?)?
    } else {
      self.jobs.get(self.cursor + 1)?
    };
    Some(Reorder {
      id:         job.id,
      from_order: job.order,
      to_order:   neighbour.order,
    })
  }
}
