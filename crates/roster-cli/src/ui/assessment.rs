//! Assessment builder tree, field editor and live preview.

use ratatui::{
  Frame,
  layout::{Constraint, Direction, Layout, Rect},
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{List, ListItem, ListState, Paragraph, Wrap},
};
use roster_core::assessment::{Assessment, Question};

use super::widgets::{dim, highlight, label, pane};
use crate::views::assessment::{AssessmentBuilder, PreviewStyle, Row};

pub fn draw(f: &mut Frame, area: Rect, builder: &AssessmentBuilder) {
  let (tree_area, preview_area) = if builder.preview {
    let cols = Layout::default()
      .direction(Direction::Horizontal)
      .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
      .split(area);
    (cols[0], Some(cols[1]))
  } else {
    (area, None)
  };

  let editor_height = match &builder.editing {
    Some(edit) if edit.is_multiline() => 8,
    Some(_) => 3,
    None => 0,
  };
  let rows = Layout::default()
    .direction(Direction::Vertical)
    .constraints([Constraint::Min(0), Constraint::Length(editor_height)])
    .split(tree_area);

  draw_tree(f, rows[0], builder);
  if let Some(edit) = &builder.editing {
    let block = pane(edit.label(), true);
    let inner = block.inner(rows[1]);
    f.render_widget(block, rows[1]);
    let mut text = edit.input.as_str().to_owned();
    text.push('_');
    f.render_widget(
      Paragraph::new(text)
        .style(Style::default().fg(Color::Yellow))
        .wrap(Wrap { trim: false }),
      inner,
    );
  }
  if let Some(area) = preview_area {
    draw_preview(f, area, builder);
  }
}

fn draw_tree(f: &mut Frame, area: Rect, builder: &AssessmentBuilder) {
  let a = &builder.assessment;
  let mut title = format!("Assessment · {}", builder.job_title);
  if !builder.persisted {
    title.push_str(" · new");
  } else if builder.dirty {
    title.push_str(" · unsaved");
  }
  let block = pane(title, builder.editing.is_none());

  let items: Vec<ListItem> = builder
    .rows()
    .into_iter()
    .map(|row| ListItem::new(row_line(a, row)))
    .collect();
  let mut state = ListState::default();
  state.select(Some(builder.cursor));
  f.render_stateful_widget(
    List::new(items).block(block).highlight_style(highlight()),
    area,
    &mut state,
  );
}

fn row_line(a: &Assessment, row: Row) -> Line<'static> {
  match row {
    Row::Title => Line::from(vec![
      Span::styled("Title  ", label()),
      Span::raw(a.title.clone()),
      Span::styled(
        format!("  ({} questions)", a.question_count()),
        dim(),
      ),
    ]),
    Row::Section(sid) => {
      let Some(section) = a.sections.iter().find(|s| s.id == sid) else {
        return Line::from("");
      };
      Line::from(vec![
        Span::styled("▸ ", label()),
        Span::styled(section.title.clone(), Style::default().add_modifier(Modifier::BOLD)),
        Span::styled(format!("  ({})", section.questions.len()), dim()),
      ])
    }
    Row::Question(sid, qid) => {
      let Some(q) = a
        .sections
        .iter()
        .find(|s| s.id == sid)
        .and_then(|s| s.questions.iter().find(|q| q.id == qid))
      else {
        return Line::from("");
      };
      let mut spans = vec![
        Span::raw(format!("    {}", q.question)),
        Span::styled(format!("  [{}]", q.kind.label()), Style::default().fg(Color::Magenta)),
      ];
      if q.required {
        spans.push(Span::styled(" required", Style::default().fg(Color::Red)));
      }
      if let Some(extra) = question_extra(q) {
        spans.push(Span::styled(format!("  {extra}"), dim()));
      }
      Line::from(spans)
    }
  }
}

/// The type-specific settings that apply to the question's current kind.
fn question_extra(q: &Question) -> Option<String> {
  if q.kind.is_choice() {
    let n = q.options.as_ref().map_or(0, Vec::len);
    return Some(format!("{n} options"));
  }
  if q.kind.is_numeric() {
    let bound = |v: Option<i64>| v.map_or("–".to_string(), |v| v.to_string());
    return Some(format!("{}..{}", bound(q.min), bound(q.max)));
  }
  if q.kind.is_text() {
    return q.max_length.map(|n| format!("max {n}"));
  }
  None
}

fn draw_preview(f: &mut Frame, area: Rect, builder: &AssessmentBuilder) {
  let lines: Vec<Line> = builder
    .preview_lines()
    .into_iter()
    .map(|l| {
      let style = match l.style {
        PreviewStyle::Heading => Style::default()
          .fg(Color::White)
          .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
        PreviewStyle::Section => label(),
        PreviewStyle::Label => Style::default(),
        PreviewStyle::Control => dim(),
        PreviewStyle::Hint => dim().add_modifier(Modifier::ITALIC),
      };
      let indent = "  ".repeat(usize::from(l.indent));
      Line::from(Span::styled(format!("{indent}{}", l.text), style))
    })
    .collect();

  let block = pane("Preview", false);
  let inner = block.inner(area);
  f.render_widget(block, area);
  f.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), inner);
}
