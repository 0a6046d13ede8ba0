//! Presentational helpers shared by every screen.

use ratatui::{
  Frame,
  layout::Rect,
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Borders, Paragraph, Wrap},
};
use roster_core::{candidate::Stage, job::JobStatus};

use crate::views::input::TextInput;

/// Style of the row under the cursor.
pub fn highlight() -> Style {
  Style::default()
    .bg(Color::Blue)
    .fg(Color::White)
    .add_modifier(Modifier::BOLD)
}

pub fn dim() -> Style { Style::default().fg(Color::DarkGray) }

pub fn label() -> Style { Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD) }

/// A bordered pane; focused panes get a brighter border.
pub fn pane(title: impl Into<String>, focused: bool) -> Block<'static> {
  let border = if focused {
    Style::default().fg(Color::Cyan)
  } else {
    dim()
  };
  Block::default()
    .title(format!(" {} ", title.into()))
    .borders(Borders::ALL)
    .border_style(border)
}

pub fn stage_color(stage: Stage) -> Color {
  match stage {
    Stage::Applied => Color::Gray,
    Stage::Screen => Color::LightBlue,
    Stage::Tech => Color::Magenta,
    Stage::Offer => Color::Yellow,
    Stage::Hired => Color::Green,
    Stage::Rejected => Color::Red,
  }
}

pub fn stage_badge(stage: Stage) -> Span<'static> {
  Span::styled(
    format!(" {} ", stage.title()),
    Style::default().fg(Color::Black).bg(stage_color(stage)),
  )
}

pub fn status_badge(status: JobStatus) -> Span<'static> {
  let bg = match status {
    JobStatus::Active => Color::Green,
    JobStatus::Archived => Color::DarkGray,
  };
  Span::styled(format!(" {status} "), Style::default().fg(Color::Black).bg(bg))
}

/// `label: value_` with a cursor block while `active`.
pub fn input_line<'a>(label_text: &'a str, input: &'a TextInput, active: bool) -> Line<'a> {
  let value_style = if active {
    Style::default().fg(Color::Yellow)
  } else {
    Style::default()
  };
  let mut spans = vec![
    Span::styled(format!("{label_text}: "), label()),
    Span::styled(input.as_str(), value_style),
  ];
  if active {
    spans.push(Span::styled("_", Style::default().fg(Color::Yellow)));
  }
  Line::from(spans)
}

/// A pane holding one wrapped, dimmed message.
pub fn draw_message(f: &mut Frame, area: Rect, title: &str, message: &str) {
  let block = pane(title, false);
  let inner = block.inner(area);
  f.render_widget(block, area);
  f.render_widget(
    Paragraph::new(message.to_owned())
      .style(dim())
      .wrap(Wrap { trim: true }),
    inner,
  );
}
