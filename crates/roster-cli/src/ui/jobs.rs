//! Jobs board and job detail.

use ratatui::{
  Frame,
  layout::{Constraint, Direction, Layout, Rect},
  style::{Color, Style},
  text::{Line, Span},
  widgets::{List, ListItem, ListState, Paragraph, Wrap},
};

use super::widgets::{dim, highlight, input_line, label, pane, stage_badge, status_badge};
use crate::views::{
  job_detail::JobDetail,
  jobs::{FORM_LABELS, JobForm, JobsBoard, JobsMode},
};

// ─── Board ────────────────────────────────────────────────────────────────────

pub fn draw_board(f: &mut Frame, area: Rect, board: &JobsBoard) {
  let (list_area, form_area) = match &board.mode {
    JobsMode::Form(form) => {
      let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);
      (cols[0], Some((cols[1], form)))
    }
    _ => (area, None),
  };

  let total = board.pagination.map_or(0, |p| p.total);
  let block = pane(format!("Jobs ({total})"), form_area.is_none());
  let inner = block.inner(list_area);
  f.render_widget(block, list_area);

  let rows = Layout::default()
    .direction(Direction::Vertical)
    .constraints([
      Constraint::Length(1),
      Constraint::Min(0),
      Constraint::Length(1),
    ])
    .split(inner);

  // Filter line.
  let status = board.status.map_or("all".to_string(), |s| s.to_string());
  let searching = matches!(board.mode, JobsMode::Search);
  let mut filter = input_line("Search", &board.search, searching);
  filter.spans.push(Span::styled(
    format!("   status: {status}   sort: {}", board.sort),
    dim(),
  ));
  f.render_widget(Paragraph::new(filter), rows[0]);

  // Job rows.
  let items: Vec<ListItem> = board
    .jobs
    .iter()
    .map(|job| {
      let mut spans = vec![
        Span::styled(format!("{:>4} ", job.order), dim()),
        Span::raw(job.title.clone()),
        Span::raw(" "),
        status_badge(job.status),
      ];
      if !job.tags.is_empty() {
        spans.push(Span::styled(format!("  {}", job.tags.join(" · ")), dim()));
      }
      ListItem::new(Line::from(spans))
    })
    .collect();

  if items.is_empty() {
    f.render_widget(Paragraph::new("No jobs match.").style(dim()), rows[1]);
  } else {
    let mut state = ListState::default();
    state.select(Some(board.cursor));
    f.render_stateful_widget(List::new(items).highlight_style(highlight()), rows[1], &mut state);
  }

  // Footer: pager, or the delete confirmation.
  let footer = match &board.mode {
    JobsMode::ConfirmDelete(id) => {
      let title = board
        .jobs
        .iter()
        .find(|j| j.id == *id)
        .map_or("this job", |j| j.title.as_str());
      Line::from(Span::styled(
        format!("Delete \"{title}\"? y to confirm"),
        Style::default().fg(Color::Red),
      ))
    }
    _ => match board.pagination {
      Some(p) => Line::from(Span::styled(
        format!("page {} of {}  ·  {} per page", p.page, p.total_pages, p.page_size),
        dim(),
      )),
      None => Line::from(""),
    },
  };
  f.render_widget(Paragraph::new(footer), rows[2]);

  if let Some((area, form)) = form_area {
    draw_form(f, area, form);
  }
}

fn draw_form(f: &mut Frame, area: Rect, form: &JobForm) {
  let title = if form.editing.is_some() { "Edit job" } else { "New job" };
  let block = pane(title, true);
  let inner = block.inner(area);
  f.render_widget(block, area);

  let mut lines = Vec::new();
  for (i, input) in form.fields.iter().enumerate() {
    lines.push(input_line(FORM_LABELS[i], input, i == form.focus));
    if let Some(err) = form.error_for(i) {
      lines.push(Line::from(Span::styled(
        format!("  {err}"),
        Style::default().fg(Color::Red),
      )));
    }
    lines.push(Line::from(""));
  }
  f.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), inner);
}

// ─── Detail ───────────────────────────────────────────────────────────────────

pub fn draw_detail(f: &mut Frame, area: Rect, detail: &JobDetail) {
  let job = &detail.job;
  let cols = Layout::default()
    .direction(Direction::Horizontal)
    .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
    .split(area);

  let mut lines = vec![
    Line::from(vec![
      Span::styled(job.title.clone(), label()),
      Span::raw("  "),
      status_badge(job.status),
    ]),
    Line::from(Span::styled(format!("/{}  ·  position {}", job.slug, job.order), dim())),
    Line::from(""),
  ];
  if let Some(description) = &job.description {
    lines.push(Line::from(description.clone()));
    lines.push(Line::from(""));
  }
  if let Some(requirements) = &job.requirements {
    lines.push(Line::from(Span::styled("Requirements", label())));
    lines.extend(requirements.iter().map(|r| Line::from(format!("  • {r}"))));
    lines.push(Line::from(""));
  }
  if !job.tags.is_empty() {
    lines.push(Line::from(vec![
      Span::styled("Tags  ", label()),
      Span::raw(job.tags.join(", ")),
    ]));
  }
  lines.push(Line::from(Span::styled(
    format!("Created {}", job.created_at.format("%Y-%m-%d")),
    dim(),
  )));

  let block = pane("Job", false);
  let inner = block.inner(cols[0]);
  f.render_widget(block, cols[0]);
  f.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), inner);

  // Candidates for this job, with a one-line stage breakdown.
  let summary = detail.summary();
  let block = pane(format!("Candidates ({})", summary.total), true);
  let inner = block.inner(cols[1]);
  f.render_widget(block, cols[1]);

  let rows = Layout::default()
    .direction(Direction::Vertical)
    .constraints([Constraint::Length(1), Constraint::Min(0)])
    .split(inner);

  let breakdown: Vec<Span> = summary
    .shares
    .iter()
    .flat_map(|s| {
      [
        Span::styled(format!("{} {}", s.stage.title(), s.count), dim()),
        Span::raw("  "),
      ]
    })
    .collect();
  f.render_widget(Paragraph::new(Line::from(breakdown)), rows[0]);

  let items: Vec<ListItem> = detail
    .candidates
    .iter()
    .map(|c| {
      ListItem::new(Line::from(vec![
        stage_badge(c.stage),
        Span::raw(format!(" {}", c.name)),
        Span::styled(format!("  {}", c.email), dim()),
      ]))
    })
    .collect();
  let mut state = ListState::default();
  state.select((!items.is_empty()).then_some(detail.cursor));
  f.render_stateful_widget(List::new(items).highlight_style(highlight()), rows[1], &mut state);
}
