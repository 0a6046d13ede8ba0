//! Candidate list with its stage summary, and the candidate detail pane.

use ratatui::{
  Frame,
  layout::{Constraint, Direction, Layout, Rect},
  style::{Modifier, Style},
  text::{Line, Span},
  widgets::{Gauge, List, ListItem, ListState, Paragraph, Wrap},
};

use super::widgets::{dim, highlight, input_line, label, pane, stage_badge, stage_color};
use crate::views::{candidate_detail::CandidateDetail, candidates::CandidateList};

// ─── List ─────────────────────────────────────────────────────────────────────

pub fn draw_list(f: &mut Frame, area: Rect, list: &CandidateList) {
  let cols = Layout::default()
    .direction(Direction::Horizontal)
    .constraints([Constraint::Min(40), Constraint::Length(34)])
    .split(area);

  let visible = list.visible();
  let title = if visible.len() == list.all.len() {
    format!("Candidates ({})", list.all.len())
  } else {
    format!("Candidates ({}/{})", visible.len(), list.all.len())
  };
  let block = pane(title, true);
  let inner = block.inner(cols[0]);
  f.render_widget(block, cols[0]);

  let rows = Layout::default()
    .direction(Direction::Vertical)
    .constraints([Constraint::Length(1), Constraint::Min(0)])
    .split(inner);

  let stage = list.stage.map_or("all", |s| s.title());
  let mut filter = input_line("Search", &list.search, list.searching);
  filter.spans.push(Span::styled(format!("   stage: {stage}"), dim()));
  f.render_widget(Paragraph::new(filter), rows[0]);

  let items: Vec<ListItem> = visible
    .iter()
    .map(|c| {
      ListItem::new(Line::from(vec![
        stage_badge(c.stage),
        Span::raw(format!(" {}", c.name)),
        Span::styled(format!("  {}", c.email), dim()),
        Span::styled(format!("  {}", list.job_title(c.job_id)), dim()),
      ]))
    })
    .collect();
  if items.is_empty() {
    f.render_widget(Paragraph::new("No candidates match.").style(dim()), rows[1]);
  } else {
    let mut state = ListState::default();
    state.select(Some(list.cursor));
    f.render_stateful_widget(List::new(items).highlight_style(highlight()), rows[1], &mut state);
  }

  draw_summary(f, cols[1], list);
}

/// One gauge per stage: count and share of the held set.
fn draw_summary(f: &mut Frame, area: Rect, list: &CandidateList) {
  let summary = list.summary();
  let block = pane("By stage", false);
  let inner = block.inner(area);
  f.render_widget(block, area);

  let rows = Layout::default()
    .direction(Direction::Vertical)
    .constraints([Constraint::Length(2); 6])
    .split(inner);

  for (share, row) in summary.shares.iter().zip(rows.iter()) {
    let parts = Layout::default()
      .direction(Direction::Vertical)
      .constraints([Constraint::Length(1), Constraint::Length(1)])
      .split(*row);
    f.render_widget(
      Paragraph::new(Line::from(vec![
        Span::styled(format!("{:<10}", share.stage.title()), label()),
        Span::raw(format!("{:>5}", share.count)),
      ])),
      parts[0],
    );
    f.render_widget(
      Gauge::default()
        .gauge_style(Style::default().fg(stage_color(share.stage)))
        .ratio((share.percent / 100.0).clamp(0.0, 1.0))
        .label(format!("{:.1}%", share.percent)),
      parts[1],
    );
  }
}

// ─── Detail ───────────────────────────────────────────────────────────────────

pub fn draw_detail(f: &mut Frame, area: Rect, detail: &CandidateDetail) {
  let c = &detail.candidate;
  let cols = Layout::default()
    .direction(Direction::Horizontal)
    .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
    .split(area);

  let left = Layout::default()
    .direction(Direction::Vertical)
    .constraints([Constraint::Length(7), Constraint::Length(3), Constraint::Min(0)])
    .split(cols[0]);

  // Profile.
  let job = detail.job_title.as_deref().unwrap_or("Unknown job");
  let profile = vec![
    Line::from(vec![
      Span::styled(c.name.clone(), label()),
      Span::raw("  "),
      stage_badge(c.stage),
    ]),
    Line::from(c.email.clone()),
    Line::from(vec![Span::styled("Job  ", dim()), Span::raw(job.to_owned())]),
    Line::from(Span::styled(
      format!("Applied {}", c.applied_at.format("%Y-%m-%d")),
      dim(),
    )),
  ];
  let block = pane("Candidate", false);
  let inner = block.inner(left[0]);
  f.render_widget(block, left[0]);
  f.render_widget(Paragraph::new(profile), inner);

  // Stage targets; the current stage is shown but cannot be chosen.
  let mut spans = Vec::new();
  for (i, (stage, enabled)) in detail.targets().enumerate() {
    let mut style = if enabled { Style::default() } else { dim().add_modifier(Modifier::CROSSED_OUT) };
    if i == detail.target {
      style = style.add_modifier(Modifier::REVERSED);
    }
    spans.push(Span::styled(format!(" {} ", stage.title()), style));
    spans.push(Span::raw(" "));
  }
  let block = pane("Move to", !detail.editing_notes);
  let inner = block.inner(left[1]);
  f.render_widget(block, left[1]);
  f.render_widget(Paragraph::new(Line::from(spans)), inner);

  // Notes.
  let block = pane("Notes", detail.editing_notes);
  let inner = block.inner(left[2]);
  f.render_widget(block, left[2]);
  let notes = if detail.editing_notes {
    input_line("Notes", &detail.notes, true)
  } else if detail.notes.is_blank() {
    Line::from(Span::styled("No notes. Press n to add.", dim()))
  } else {
    Line::from(detail.notes.as_str())
  };
  f.render_widget(Paragraph::new(notes).wrap(Wrap { trim: false }), inner);

  // Timeline, oldest first.
  let lines: Vec<Line> = detail
    .timeline
    .iter()
    .flat_map(|event| {
      let mut lines = vec![Line::from(vec![
        Span::styled(event.timestamp.format("%Y-%m-%d %H:%M  ").to_string(), dim()),
        stage_badge(event.stage),
      ])];
      if let Some(note) = &event.note {
        lines.push(Line::from(Span::raw(format!("                   {note}"))));
      }
      lines
    })
    .collect();
  let block = pane(format!("Timeline ({})", detail.timeline.len()), false);
  let inner = block.inner(cols[1]);
  f.render_widget(block, cols[1]);
  f.render_widget(Paragraph::new(lines), inner);
}
