//! Kanban board: six stage columns.

use ratatui::{
  Frame,
  layout::{Constraint, Direction, Layout, Rect},
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{List, ListItem, ListState},
};
use roster_core::candidate::Stage;

use super::widgets::{highlight, pane, stage_color};
use crate::views::pipeline::PipelineBoard;

pub fn draw(f: &mut Frame, area: Rect, board: &PipelineBoard) {
  let cols = Layout::default()
    .direction(Direction::Horizontal)
    .constraints([Constraint::Ratio(1, 6); 6])
    .split(area);

  let carried = board.carried().map(|c| c.id);
  for (i, (&stage, col)) in Stage::ALL.iter().zip(cols.iter()).enumerate() {
    let candidates = board.in_stage(stage);
    let focused = i == board.column;
    let block = pane(format!("{} ({})", stage.title(), candidates.len()), focused)
      .title_style(Style::default().fg(stage_color(stage)).add_modifier(Modifier::BOLD));

    let items: Vec<ListItem> = candidates
      .iter()
      .map(|c| {
        let style = if Some(c.id) == carried {
          Style::default().fg(Color::Black).bg(Color::Yellow)
        } else {
          Style::default()
        };
        ListItem::new(Line::from(Span::styled(c.name.clone(), style)))
      })
      .collect();

    let mut state = ListState::default();
    if focused && !items.is_empty() {
      state.select(Some(board.row));
    }
    f.render_stateful_widget(
      List::new(items).block(block).highlight_style(highlight()),
      *col,
      &mut state,
    );
  }
}
