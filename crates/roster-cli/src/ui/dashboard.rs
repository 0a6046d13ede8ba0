//! Landing dashboard: headline counts and the ways into the other views.

use ratatui::{
  Frame,
  layout::{Constraint, Direction, Layout, Rect},
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::Paragraph,
};

use super::widgets::{dim, pane};
use crate::app::App;

pub fn draw(f: &mut Frame, area: Rect, app: &App) {
  let rows = Layout::default()
    .direction(Direction::Vertical)
    .constraints([Constraint::Length(5), Constraint::Min(0)])
    .split(area);

  let tiles = Layout::default()
    .direction(Direction::Horizontal)
    .constraints([Constraint::Ratio(1, 4); 4])
    .split(rows[0]);

  let counts = app.stats.map(|s| {
    [
      ("Total jobs", s.total_jobs),
      ("Active jobs", s.active_jobs),
      ("Candidates", s.total_candidates),
      ("Hired", s.hired_candidates),
    ]
  });
  for (i, tile) in tiles.iter().enumerate() {
    let (title, value) = match counts {
      Some(c) => (c[i].0, c[i].1.to_string()),
      None => (["Total jobs", "Active jobs", "Candidates", "Hired"][i], "…".to_string()),
    };
    let block = pane(title, false);
    let inner = block.inner(*tile);
    f.render_widget(block, *tile);
    f.render_widget(
      Paragraph::new(Line::from(Span::styled(
        value,
        Style::default()
          .fg(Color::White)
          .add_modifier(Modifier::BOLD),
      )))
      .centered(),
      inner,
    );
  }

  let links = vec![
    Line::from("Track openings and candidates from application to offer."),
    Line::from(""),
    Line::from(vec![Span::styled("2 ", Style::default().fg(Color::Cyan)), Span::raw("Jobs board: create, archive and reorder postings")]),
    Line::from(vec![Span::styled("3 ", Style::default().fg(Color::Cyan)), Span::raw("Candidates: search and review applicants")]),
    Line::from(vec![Span::styled("4 ", Style::default().fg(Color::Cyan)), Span::raw("Pipeline: move candidates between stages")]),
    Line::from(""),
    Line::from(Span::styled("Assessments are opened from a job with t.", dim())),
  ];
  let block = pane("Roster", false);
  let inner = block.inner(rows[1]);
  f.render_widget(block, rows[1]);
  f.render_widget(Paragraph::new(links), inner);
}
