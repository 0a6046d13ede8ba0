//! TUI rendering: header, the active screen, status bar.

pub mod assessment;
pub mod candidates;
pub mod dashboard;
pub mod jobs;
pub mod pipeline;
pub mod widgets;

use chrono::Local;
use ratatui::{
  Frame,
  layout::{Constraint, Direction, Layout, Rect},
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Paragraph},
};

use crate::{
  app::{App, Screen},
  views::jobs::JobsMode,
};

// ─── Root draw ────────────────────────────────────────────────────────────────

/// Main draw function called each frame.
pub fn draw(f: &mut Frame, app: &App) {
  let area = f.area();

  // Vertical stack: header, body, status bar.
  let rows = Layout::default()
    .direction(Direction::Vertical)
    .constraints([
      Constraint::Length(1), // header
      Constraint::Min(0),    // body
      Constraint::Length(1), // status bar
    ])
    .split(area);

  draw_header(f, rows[0], app);
  draw_body(f, rows[1], app);
  draw_status(f, rows[2], app);
}

// ─── Header ───────────────────────────────────────────────────────────────────

const TABS: [(&str, Screen); 4] = [
  ("1 Dashboard", Screen::Dashboard),
  ("2 Jobs", Screen::Jobs),
  ("3 Candidates", Screen::Candidates),
  ("4 Pipeline", Screen::Pipeline),
];

/// The tab a screen belongs under.
fn tab_of(screen: Screen) -> Screen {
  match screen {
    Screen::JobDetail | Screen::Assessment => Screen::Jobs,
    Screen::CandidateDetail => Screen::Candidates,
    other => other,
  }
}

fn draw_header(f: &mut Frame, area: Rect, app: &App) {
  let date = Local::now().format("%Y-%m-%d").to_string();
  let current = tab_of(app.screen);

  let mut spans = vec![Span::styled(
    " roster ",
    Style::default()
      .fg(Color::White)
      .add_modifier(Modifier::BOLD),
  )];
  for (name, screen) in TABS {
    let style = if screen == current {
      Style::default().fg(Color::Black).bg(Color::Cyan)
    } else {
      Style::default().fg(Color::Gray)
    };
    spans.push(Span::raw(" "));
    spans.push(Span::styled(format!(" {name} "), style));
  }

  let left_width: usize = spans.iter().map(|s| s.content.chars().count()).sum();
  let right = Span::styled(format!("{date} "), Style::default().fg(Color::Gray));
  let pad = (area.width as usize)
    .saturating_sub(left_width)
    .saturating_sub(right.content.len());
  spans.push(Span::raw(" ".repeat(pad)));
  spans.push(right);

  let block = Block::default().style(Style::default().bg(Color::DarkGray));
  let inner = block.inner(area);
  f.render_widget(block, area);
  f.render_widget(Paragraph::new(Line::from(spans)), inner);
}

// ─── Body ─────────────────────────────────────────────────────────────────────

fn draw_body(f: &mut Frame, area: Rect, app: &App) {
  match app.screen {
    Screen::Dashboard => dashboard::draw(f, area, app),
    Screen::Jobs => jobs::draw_board(f, area, &app.jobs),
    Screen::JobDetail => match &app.job_detail {
      Some(detail) => jobs::draw_detail(f, area, detail),
      None => widgets::draw_message(f, area, "Job", "No job selected."),
    },
    Screen::Candidates => candidates::draw_list(f, area, &app.candidates),
    Screen::CandidateDetail => match &app.candidate_detail {
      Some(detail) => candidates::draw_detail(f, area, detail),
      None => widgets::draw_message(f, area, "Candidate", "No candidate selected."),
    },
    Screen::Pipeline => pipeline::draw(f, area, &app.pipeline),
    Screen::Assessment => match &app.builder {
      Some(builder) => assessment::draw(f, area, builder),
      None => widgets::draw_message(f, area, "Assessment", "No assessment open."),
    },
    Screen::NotFound => widgets::draw_message(
      f,
      area,
      "Not found",
      &format!("{}\n\nPress Esc to go back.", app.not_found),
    ),
  }
}

// ─── Status bar ───────────────────────────────────────────────────────────────

fn hints(app: &App) -> (&'static str, &'static str) {
  match app.screen {
    Screen::Dashboard => ("HOME", "1-4 switch view  r refresh  q quit"),
    Screen::Jobs => match app.jobs.mode {
      JobsMode::Browse => (
        "JOBS",
        "↑↓ move  Enter open  / search  s status  o sort  n new  e edit  a archive  d delete  J/K reorder  [ ] page  t assessment",
      ),
      JobsMode::Search => ("SEARCH", "Type to search  Enter apply  Esc clear"),
      JobsMode::Form(_) => ("FORM", "Tab next field  Enter save  Esc cancel"),
      JobsMode::ConfirmDelete(_) => ("DELETE", "y confirm  any other key cancels"),
    },
    Screen::JobDetail => ("JOB", "↑↓ move  Enter candidate  t assessment  Esc back"),
    Screen::Candidates if app.candidates.searching => {
      ("SEARCH", "Type to filter  Enter keep  Esc clear")
    }
    Screen::Candidates => ("CANDIDATES", "↑↓ move  Enter open  / search  s stage  r reload  Esc back"),
    Screen::CandidateDetail
      if app.candidate_detail.as_ref().is_some_and(|d| d.editing_notes) =>
    {
      ("NOTES", "Type notes  Enter save  Esc cancel")
    }
    Screen::CandidateDetail => ("CANDIDATE", "←→ pick stage  Enter move  n notes  Esc back"),
    Screen::Pipeline if app.pipeline.carrying.is_some() => {
      ("CARRY", "←→ choose column  Space drop  Esc cancel")
    }
    Screen::Pipeline => ("PIPELINE", "←→↑↓ move  Space pick up  Enter open  r reload  Esc back"),
    Screen::Assessment => match app.builder.as_ref().and_then(|b| b.editing.as_ref()) {
      Some(edit) if edit.is_multiline() => ("EDIT", "Enter new line  Tab done  Esc cancel"),
      Some(_) => ("EDIT", "Enter done  Esc cancel"),
      None => (
        "BUILDER",
        "S section  a question  x remove  e edit  r required  T type  o options  m/M min/max  L max length  p preview  w save",
      ),
    },
    Screen::NotFound => ("NOT FOUND", "Esc back"),
  }
}

fn draw_status(f: &mut Frame, area: Rect, app: &App) {
  let (mode_label, hints) = hints(app);

  let status = if app.status_msg.is_empty() {
    hints.to_string()
  } else {
    app.status_msg.clone()
  };

  let mode_span = Span::styled(
    format!(" {mode_label} "),
    Style::default()
      .fg(Color::Black)
      .bg(Color::Cyan)
      .add_modifier(Modifier::BOLD),
  );
  let hint_span = Span::styled(
    format!("  {status}"),
    Style::default().fg(Color::DarkGray),
  );

  let line = Line::from(vec![mode_span, hint_span]);
  f.render_widget(
    Paragraph::new(line).style(Style::default().bg(Color::Black)),
    area,
  );
}
