//! Application state machine and event dispatcher.

use std::{collections::HashMap, sync::Arc};

use chrono::Utc;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use roster_core::{assessment::Assessment, job::JobPatch, store::BoardStats};
use uuid::Uuid;

use crate::{
  client::{ApiClient, ApiFailure, JobFilter, is_not_found},
  views::{
    assessment::{AssessmentBuilder, EditTarget},
    candidate_detail::CandidateDetail,
    candidates::{CandidateList, HELD_PAGE_SIZE},
    job_detail::JobDetail,
    jobs::{JobForm, JobsBoard, JobsMode, Submission},
    pipeline::PipelineBoard,
  },
};

// ─── Screen ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
  Dashboard,
  Jobs,
  JobDetail,
  Candidates,
  CandidateDetail,
  Pipeline,
  Assessment,
  /// A 404 from the API; the message says what was missing.
  NotFound,
}

// ─── App ──────────────────────────────────────────────────────────────────────

/// Top-level application state.
pub struct App {
  /// Current screen / keyboard focus.
  pub screen: Screen,

  /// Screens to return to on Esc.
  back: Vec<Screen>,

  pub stats:            Option<BoardStats>,
  pub jobs:             JobsBoard,
  pub job_detail:       Option<JobDetail>,
  pub candidates:       CandidateList,
  pub candidate_detail: Option<CandidateDetail>,
  pub pipeline:         PipelineBoard,
  pub builder:          Option<AssessmentBuilder>,

  /// Message for the not-found pane.
  pub not_found: String,

  /// One-line status message shown in the status bar.
  pub status_msg: String,

  /// Shared HTTP client.
  pub client: Arc<ApiClient>,
}

impl App {
  pub fn new(client: ApiClient) -> Self {
    Self {
      screen: Screen::Dashboard,
      back: Vec::new(),
      stats: None,
      jobs: JobsBoard::default(),
      job_detail: None,
      candidates: CandidateList::default(),
      candidate_detail: None,
      pipeline: PipelineBoard::default(),
      builder: None,
      not_found: String::new(),
      status_msg: String::new(),
      client: Arc::new(client),
    }
  }

  /// `true` while keystrokes go into a text field.
  pub fn is_typing(&self) -> bool {
    match self.screen {
      Screen::Jobs => matches!(self.jobs.mode, JobsMode::Search | JobsMode::Form(_)),
      Screen::Candidates => self.candidates.searching,
      Screen::CandidateDetail => self
        .candidate_detail
        .as_ref()
        .is_some_and(|d| d.editing_notes),
      Screen::Assessment => self.builder.as_ref().is_some_and(|b| b.editing.is_some()),
      _ => false,
    }
  }

  // ── Navigation ────────────────────────────────────────────────────────────

  /// Jump to a top-level screen, forgetting the back stack.
  async fn go_to(&mut self, screen: Screen) -> anyhow::Result<()> {
    self.back.clear();
    match screen {
      Screen::Dashboard => self.load_dashboard().await?,
      Screen::Jobs => self.load_jobs().await?,
      Screen::Candidates => self.load_candidates().await?,
      Screen::Pipeline => self.load_pipeline().await?,
      _ => {}
    }
    self.screen = screen;
    Ok(())
  }

  fn push(&mut self, screen: Screen) {
    if self.screen != Screen::NotFound {
      self.back.push(self.screen);
    }
    self.screen = screen;
  }

  fn go_back(&mut self) {
    self.screen = self.back.pop().unwrap_or(Screen::Dashboard);
  }

  // ── Data loading ──────────────────────────────────────────────────────────

  pub async fn load_dashboard(&mut self) -> anyhow::Result<()> {
    self.stats = Some(self.client.stats().await?);
    Ok(())
  }

  async fn load_jobs(&mut self) -> anyhow::Result<()> {
    let page = self.client.list_jobs(&self.jobs.filter()).await?;
    self.jobs.set_page(page);
    Ok(())
  }

  /// Titles of every job, for labelling candidates.
  async fn job_titles(&self) -> anyhow::Result<HashMap<Uuid, String>> {
    let filter = JobFilter { page: 1, page_size: HELD_PAGE_SIZE, ..JobFilter::default() };
    let page = self.client.list_jobs(&filter).await?;
    Ok(page.data.into_iter().map(|j| (j.id, j.title)).collect())
  }

  async fn load_candidates(&mut self) -> anyhow::Result<()> {
    let page = self.client.list_candidates(None, None, HELD_PAGE_SIZE).await?;
    self.candidates.job_titles = self.job_titles().await?;
    self.candidates.set_candidates(page.data);
    Ok(())
  }

  async fn load_pipeline(&mut self) -> anyhow::Result<()> {
    let page = self.client.list_candidates(None, None, HELD_PAGE_SIZE).await?;
    self.pipeline.set_candidates(page.data);
    Ok(())
  }

  async fn open_job(&mut self, id: Uuid) -> anyhow::Result<()> {
    let job = self.client.get_job(id).await?;
    let candidates = self
      .client
      .list_candidates(None, Some(id), HELD_PAGE_SIZE)
      .await?;
    self.job_detail = Some(JobDetail::new(job, candidates.data));
    self.push(Screen::JobDetail);
    Ok(())
  }

  async fn open_candidate(&mut self, id: Uuid) -> anyhow::Result<()> {
    let candidate = self.client.get_candidate(id).await?;
    let timeline = self.client.timeline(id).await?;
    let job_title = match self.client.get_job(candidate.job_id).await {
      Ok(job) => Some(job.title),
      Err(e) if is_not_found(&e) => None,
      Err(e) => return Err(e),
    };
    self.candidate_detail = Some(CandidateDetail::new(candidate, job_title, timeline));
    self.push(Screen::CandidateDetail);
    Ok(())
  }

  async fn open_assessment(&mut self, job_id: Uuid, job_title: String) -> anyhow::Result<()> {
    let builder = match self.client.get_assessment(job_id).await? {
      Some(a) => AssessmentBuilder::new(a, job_title, true),
      None => AssessmentBuilder::new(Assessment::draft(job_id, Utc::now()), job_title, false),
    };
    self.builder = Some(builder);
    self.push(Screen::Assessment);
    Ok(())
  }

  // ── Errors ────────────────────────────────────────────────────────────────

  /// Surface a failed request. 404s get their own pane; field errors go back
  /// to an open form; anything else lands in the status bar.
  fn report(&mut self, err: anyhow::Error) {
    if is_not_found(&err) {
      self.not_found = err
        .downcast_ref::<ApiFailure>()
        .map_or_else(|| err.to_string(), |f| f.message.clone());
      self.push(Screen::NotFound);
      return;
    }
    if let Some(failure) = err.downcast_ref::<ApiFailure>()
      && !failure.fields.is_empty()
      && let JobsMode::Form(form) = &mut self.jobs.mode
    {
      form.set_errors(failure.fields.clone());
    }
    self.status_msg = format!("Error: {err:#}");
  }

  // ── Key handling ──────────────────────────────────────────────────────────

  /// Process a key event. Returns `true` to continue, `false` to quit.
  pub async fn handle_key(&mut self, key: KeyEvent) -> anyhow::Result<bool> {
    // Global: Ctrl-C quits from anywhere.
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
      return Ok(false);
    }
    self.status_msg.clear();

    if !self.is_typing() {
      let top = match key.code {
        KeyCode::Char('q') => return Ok(false),
        KeyCode::Char('1') => Some(Screen::Dashboard),
        KeyCode::Char('2') => Some(Screen::Jobs),
        KeyCode::Char('3') => Some(Screen::Candidates),
        KeyCode::Char('4') => Some(Screen::Pipeline),
        _ => None,
      };
      if let Some(screen) = top {
        if let Err(e) = self.go_to(screen).await {
          self.report(e);
        }
        return Ok(true);
      }
    }

    let result = match self.screen {
      Screen::Dashboard => self.handle_dashboard_key(key).await,
      Screen::Jobs => self.handle_jobs_key(key).await,
      Screen::JobDetail => self.handle_job_detail_key(key).await,
      Screen::Candidates => self.handle_candidates_key(key).await,
      Screen::CandidateDetail => self.handle_candidate_detail_key(key).await,
      Screen::Pipeline => self.handle_pipeline_key(key).await,
      Screen::Assessment => self.handle_assessment_key(key).await,
      Screen::NotFound => {
        if matches!(key.code, KeyCode::Esc | KeyCode::Enter) {
          self.go_back();
        }
        Ok(())
      }
    };
    if let Err(e) = result {
      self.report(e);
    }
    Ok(true)
  }

  async fn handle_dashboard_key(&mut self, key: KeyEvent) -> anyhow::Result<()> {
    if key.code == KeyCode::Char('r') {
      self.load_dashboard().await?;
      self.status_msg = "Refreshed".into();
    }
    Ok(())
  }

  // ── Jobs ──────────────────────────────────────────────────────────────────

  async fn handle_jobs_key(&mut self, key: KeyEvent) -> anyhow::Result<()> {
    match &mut self.jobs.mode {
      JobsMode::Browse => self.handle_jobs_browse_key(key).await,
      JobsMode::Search => {
        match key.code {
          KeyCode::Enter => {
            self.jobs.mode = JobsMode::Browse;
            self.jobs.page = 1;
            self.jobs.cursor = 0;
            self.load_jobs().await?;
          }
          KeyCode::Esc => {
            self.jobs.mode = JobsMode::Browse;
            self.jobs.search.clear();
            self.jobs.page = 1;
            self.load_jobs().await?;
          }
          code => {
            self.jobs.search.handle(code);
          }
        }
        Ok(())
      }
      JobsMode::Form(form) => {
        match key.code {
          KeyCode::Esc => self.jobs.mode = JobsMode::Browse,
          KeyCode::Tab | KeyCode::Down => form.next_field(),
          KeyCode::BackTab | KeyCode::Up => form.prev_field(),
          KeyCode::Enter => {
            if let Some(submission) = form.submit() {
              self.submit_job(submission).await?;
            }
          }
          code => {
            form.focused().handle(code);
          }
        }
        Ok(())
      }
      JobsMode::ConfirmDelete(id) => {
        let id = *id;
        self.jobs.mode = JobsMode::Browse;
        if key.code == KeyCode::Char('y') {
          self.client.delete_job(id).await?;
          self.status_msg = "Job deleted".into();
          self.load_jobs().await?;
        }
        Ok(())
      }
    }
  }

  async fn submit_job(&mut self, submission: Submission) -> anyhow::Result<()> {
    let job = match submission {
      Submission::Create(new_job) => self.client.create_job(&new_job).await?,
      Submission::Update(id, patch) => self.client.update_job(id, &patch).await?,
    };
    self.status_msg = format!("Saved \"{}\"", job.title);
    self.jobs.mode = JobsMode::Browse;
    self.load_jobs().await?;
    self.jobs.select(job.id);
    Ok(())
  }

  async fn handle_jobs_browse_key(&mut self, key: KeyEvent) -> anyhow::Result<()> {
    match key.code {
      KeyCode::Down | KeyCode::Char('j') => self.jobs.move_cursor(true),
      KeyCode::Up | KeyCode::Char('k') => self.jobs.move_cursor(false),
      KeyCode::Char(']') | KeyCode::PageDown => {
        if self.jobs.turn_page(true) {
          self.load_jobs().await?;
        }
      }
      KeyCode::Char('[') | KeyCode::PageUp => {
        if self.jobs.turn_page(false) {
          self.load_jobs().await?;
        }
      }
      KeyCode::Char('/') => self.jobs.mode = JobsMode::Search,
      KeyCode::Char('s') => {
        self.jobs.cycle_status();
        self.load_jobs().await?;
      }
      KeyCode::Char('o') => {
        self.jobs.cycle_sort();
        self.load_jobs().await?;
      }
      KeyCode::Char('n') => self.jobs.mode = JobsMode::Form(JobForm::new()),
      KeyCode::Char('e') => {
        if let Some(job) = self.jobs.selected() {
          self.jobs.mode = JobsMode::Form(JobForm::edit(job));
        }
      }
      KeyCode::Char('d') => {
        if let Some(job) = self.jobs.selected() {
          self.jobs.mode = JobsMode::ConfirmDelete(job.id);
        }
      }
      KeyCode::Char('a') => {
        if let Some(job) = self.jobs.selected() {
          let (id, status) = (job.id, job.status.toggled());
          self
            .client
            .update_job(id, &JobPatch::status(status))
            .await?;
          self.status_msg = format!("Job {status}");
          self.load_jobs().await?;
        }
      }
      KeyCode::Char('K') | KeyCode::Char('J') => {
        if let Some(mv) = self.jobs.reorder_target(key.code == KeyCode::Char('K')) {
          let result = self
            .client
            .reorder_job(mv.id, mv.from_order, mv.to_order)
            .await;
          // Reload either way: the server's order is authoritative.
          let reload = self.load_jobs().await;
          self.jobs.select(mv.id);
          after_reload(result, reload)?;
        }
      }
      KeyCode::Enter | KeyCode::Char('l') => {
        if let Some(id) = self.jobs.selected().map(|j| j.id) {
          self.open_job(id).await?;
        }
      }
      KeyCode::Char('t') => {
        if let Some(job) = self.jobs.selected() {
          let (id, title) = (job.id, job.title.clone());
          self.open_assessment(id, title).await?;
        }
      }
      KeyCode::Esc => self.go_back(),
      _ => {}
    }
    Ok(())
  }

  async fn handle_job_detail_key(&mut self, key: KeyEvent) -> anyhow::Result<()> {
    let Some(detail) = &mut self.job_detail else {
      self.go_back();
      return Ok(());
    };
    match key.code {
      KeyCode::Down | KeyCode::Char('j') => detail.move_cursor(true),
      KeyCode::Up | KeyCode::Char('k') => detail.move_cursor(false),
      KeyCode::Enter => {
        if let Some(id) = detail.selected().map(|c| c.id) {
          self.open_candidate(id).await?;
        }
      }
      KeyCode::Char('t') => {
        let (id, title) = (detail.job.id, detail.job.title.clone());
        self.open_assessment(id, title).await?;
      }
      KeyCode::Esc | KeyCode::Char('h') => self.go_back(),
      _ => {}
    }
    Ok(())
  }

  // ── Candidates ────────────────────────────────────────────────────────────

  async fn handle_candidates_key(&mut self, key: KeyEvent) -> anyhow::Result<()> {
    let list = &mut self.candidates;
    if list.searching {
      match key.code {
        KeyCode::Enter => list.searching = false,
        KeyCode::Esc => {
          list.searching = false;
          list.search.clear();
          list.search_changed();
        }
        code => {
          if list.search.handle(code) {
            list.search_changed();
          }
        }
      }
      return Ok(());
    }
    match key.code {
      KeyCode::Down | KeyCode::Char('j') => list.move_cursor(1),
      KeyCode::Up | KeyCode::Char('k') => list.move_cursor(-1),
      KeyCode::PageDown => list.move_cursor(20),
      KeyCode::PageUp => list.move_cursor(-20),
      KeyCode::Char('/') => list.searching = true,
      KeyCode::Char('s') => list.cycle_stage(),
      KeyCode::Char('r') => self.load_candidates().await?,
      KeyCode::Enter | KeyCode::Char('l') => {
        if let Some(id) = list.selected().map(|c| c.id) {
          self.open_candidate(id).await?;
        }
      }
      KeyCode::Esc => self.go_back(),
      _ => {}
    }
    Ok(())
  }

  async fn handle_candidate_detail_key(&mut self, key: KeyEvent) -> anyhow::Result<()> {
    let Some(detail) = &mut self.candidate_detail else {
      self.go_back();
      return Ok(());
    };
    let id = detail.candidate.id;

    if detail.editing_notes {
      match key.code {
        KeyCode::Esc => detail.cancel_notes(),
        KeyCode::Enter => {
          let patch = detail.notes_patch();
          let candidate = self.client.update_candidate(id, &patch).await?;
          let timeline = self.client.timeline(id).await?;
          if let Some(detail) = &mut self.candidate_detail {
            detail.refresh(candidate, timeline);
          }
          self.status_msg = "Notes saved".into();
        }
        code => {
          detail.notes.handle(code);
        }
      }
      return Ok(());
    }

    match key.code {
      KeyCode::Right | KeyCode::Char('l') => detail.move_target(true),
      KeyCode::Left | KeyCode::Char('h') => detail.move_target(false),
      KeyCode::Char('n') => detail.editing_notes = true,
      KeyCode::Enter => {
        if let Some(patch) = detail.transition() {
          let candidate = self.client.update_candidate(id, &patch).await?;
          let timeline = self.client.timeline(id).await?;
          self.status_msg = format!("Moved to {}", candidate.stage.title());
          if let Some(detail) = &mut self.candidate_detail {
            detail.refresh(candidate, timeline);
          }
        }
      }
      KeyCode::Esc => {
        self.go_back();
        self.reload_current().await?;
      }
      _ => {}
    }
    Ok(())
  }

  /// Refresh the screen we returned to, so edits made deeper are visible.
  async fn reload_current(&mut self) -> anyhow::Result<()> {
    match self.screen {
      Screen::Candidates => self.load_candidates().await,
      Screen::Pipeline => self.load_pipeline().await,
      Screen::JobDetail => {
        if let Some(id) = self.job_detail.as_ref().map(|d| d.job.id) {
          let candidates = self
            .client
            .list_candidates(None, Some(id), HELD_PAGE_SIZE)
            .await?;
          if let Some(detail) = &mut self.job_detail {
            detail.candidates = candidates.data;
          }
        }
        Ok(())
      }
      _ => Ok(()),
    }
  }

  // ── Pipeline ──────────────────────────────────────────────────────────────

  async fn handle_pipeline_key(&mut self, key: KeyEvent) -> anyhow::Result<()> {
    let board = &mut self.pipeline;
    match key.code {
      KeyCode::Left | KeyCode::Char('h') => board.move_column(false),
      KeyCode::Right | KeyCode::Char('l') => board.move_column(true),
      KeyCode::Down | KeyCode::Char('j') => board.move_row(true),
      KeyCode::Up | KeyCode::Char('k') => board.move_row(false),
      KeyCode::Char(' ') => {
        if board.carrying.is_none() {
          board.pick_up();
        } else if let Some(mv) = board.drop_here() {
          if let Err(e) = self.client.update_candidate(mv.id, &mv.patch()).await {
            // Discard the optimistic move.
            self.load_pipeline().await?;
            return Err(e);
          }
          self.status_msg = format!("{} → {}", mv.from.title(), mv.to.title());
        }
      }
      KeyCode::Enter => {
        if board.carrying.is_none()
          && let Some(id) = board.selected().map(|c| c.id)
        {
          self.open_candidate(id).await?;
        }
      }
      KeyCode::Char('r') => self.load_pipeline().await?,
      KeyCode::Esc => {
        if board.carrying.is_some() {
          board.cancel();
        } else {
          self.go_back();
        }
      }
      _ => {}
    }
    Ok(())
  }

  // ── Assessment builder ────────────────────────────────────────────────────

  async fn handle_assessment_key(&mut self, key: KeyEvent) -> anyhow::Result<()> {
    let Some(builder) = &mut self.builder else {
      self.go_back();
      return Ok(());
    };

    if let Some(edit) = &mut builder.editing {
      let multiline = edit.is_multiline();
      match key.code {
        KeyCode::Esc => builder.cancel_edit(),
        KeyCode::Tab => builder.commit_edit(),
        KeyCode::Enter if multiline => edit.input.value.push('\n'),
        KeyCode::Enter => builder.commit_edit(),
        code => {
          edit.input.handle(code);
        }
      }
      return Ok(());
    }

    let target = match key.code {
      KeyCode::Char('e') => Some(EditTarget::Text),
      KeyCode::Char('o') => Some(EditTarget::Options),
      KeyCode::Char('m') => Some(EditTarget::Min),
      KeyCode::Char('M') => Some(EditTarget::Max),
      KeyCode::Char('L') => Some(EditTarget::MaxLength),
      _ => None,
    };
    if let Some(target) = target {
      if !builder.begin_edit(target) {
        self.status_msg = "Not editable for this row".into();
      }
      return Ok(());
    }

    match key.code {
      KeyCode::Down | KeyCode::Char('j') => builder.move_cursor(true),
      KeyCode::Up | KeyCode::Char('k') => builder.move_cursor(false),
      KeyCode::Char('S') => builder.add_section(),
      KeyCode::Char('a') => {
        if !builder.add_question() {
          self.status_msg = "Add a section first".into();
        }
      }
      KeyCode::Char('x') | KeyCode::Delete => {
        builder.remove_current();
      }
      KeyCode::Char('r') => {
        builder.toggle_required();
      }
      KeyCode::Char('T') => {
        builder.cycle_kind();
      }
      KeyCode::Char('p') => builder.preview = !builder.preview,
      KeyCode::Char('w') => {
        let saved = self.client.save_assessment(&builder.assessment).await?;
        self.status_msg = format!(
          "Saved {} questions in {} sections",
          saved.question_count(),
          saved.sections.len()
        );
        if let Some(builder) = &mut self.builder {
          builder.saved(saved);
        }
      }
      KeyCode::Esc => {
        if builder.dirty {
          self.status_msg = "Unsaved assessment changes discarded".into();
        }
        self.builder = None;
        self.go_back();
      }
      _ => {}
    }
    Ok(())
  }
}

/// Outcome of a write followed by a reload. The write's error wins; a reload
/// failure after a successful write is still reported.
fn after_reload<T>(write: anyhow::Result<T>, reload: anyhow::Result<()>) -> anyhow::Result<()> {
  match (write, reload) {
    (Err(e), Err(reload)) => Err(e.context(format!("reload also failed: {reload:#}"))),
    (Err(e), Ok(())) => Err(e),
    (Ok(_), reload) => reload,
  }
}
