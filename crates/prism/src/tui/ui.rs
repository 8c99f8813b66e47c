//! Drawing the browser with ratatui.

use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{
  Block, Borders, Cell, Clear, List, ListItem, ListState, Paragraph, Row, Table, TableState, Tabs,
};
use ratatui::Frame;

use super::app::{App, DetailModal, RowAction, RowActionMenu};
use crate::detail::{DetailTab, TabContent};
use crate::search::match_ranges;
use crate::table::{ColumnWidth, TableBody, SEARCH_PLACEHOLDER};
use crate::tree::{TokenKind, TreeLine};

const MATCH_STYLE: Style = Style::new().fg(Color::Yellow).add_modifier(Modifier::BOLD);
const DIM: Style = Style::new().fg(Color::DarkGray);

pub fn draw(frame: &mut Frame, app: &App) {
  let chunks = Layout::default()
    .direction(Direction::Vertical)
    .constraints([
      Constraint::Length(3),
      Constraint::Min(3),
      Constraint::Length(1),
      Constraint::Length(1),
    ])
    .split(frame.area());

  draw_search_box(frame, app, chunks[0]);
  draw_table(frame, app, chunks[1]);
  draw_status(frame, app, chunks[2]);
  draw_help(frame, app, chunks[3]);

  if let Some(modal) = &app.overlays.detail {
    draw_detail(frame, modal, app.config.panel_height);
  }
  if let Some(menu) = &app.overlays.menu {
    draw_menu(frame, menu);
  }
}

fn draw_search_box(frame: &mut Frame, app: &App, area: Rect) {
  let query = app.table.search_query();
  let line = if query.is_empty() {
    Line::from(Span::styled(SEARCH_PLACEHOLDER, DIM))
  } else {
    Line::from(vec![Span::raw(query.to_string()), Span::styled("▏", DIM)])
  };

  let block = Block::default().borders(Borders::ALL).title(" Search ");
  frame.render_widget(Paragraph::new(line).block(block), area);
}

fn draw_table(frame: &mut Frame, app: &App, area: Rect) {
  let view = app.table.view();
  let with_query = app.table.with_query();
  let query = app.config.highlight_query(app.table.search_query());

  let widths: Vec<Constraint> = view
    .columns
    .iter()
    .map(|column| match column.width(with_query) {
      ColumnWidth::Fixed(n) => Constraint::Length(n),
      ColumnWidth::Percent(p) => Constraint::Percentage(p),
      ColumnWidth::Fill => Constraint::Fill(1),
    })
    .collect();

  let header = Row::new(view.columns.iter().map(|c| Cell::from(c.title())))
    .style(Style::default().add_modifier(Modifier::BOLD))
    .bottom_margin(1);

  let rows: Vec<Row> = match &view.body {
    TableBody::Rows(rows) => rows
      .iter()
      .map(|row| Row::new(row.cells.iter().map(|cell| Cell::from(highlight_line(cell, query)))))
      .collect(),
    TableBody::NoMatches { .. } => Vec::new(),
  };

  let block = Block::default().borders(Borders::ALL).title(" Records ");
  let inner = block.inner(area);

  let table = Table::new(rows, widths)
    .header(header)
    .block(block)
    .row_highlight_style(Style::default().add_modifier(Modifier::REVERSED));

  let mut state = TableState::default().with_selected(app.table.selected());
  frame.render_stateful_widget(table, area, &mut state);

  if let TableBody::NoMatches { message, .. } = &view.body {
    // Below the header and its margin, across every column.
    if inner.height > 2 {
      let message_area = Rect { y: inner.y + 2, height: 1, ..inner };
      let placeholder = Paragraph::new(Span::styled(message.clone(), DIM)).alignment(Alignment::Center);
      frame.render_widget(placeholder, message_area);
    }
  }
}

fn draw_status(frame: &mut Frame, app: &App, area: Rect) {
  let text = app.status.clone().or_else(|| app.table.view().footer).unwrap_or_default();
  frame.render_widget(Paragraph::new(Span::styled(text, DIM)), area);
}

fn draw_help(frame: &mut Frame, app: &App, area: Rect) {
  let help = if app.overlays.menu.is_some() {
    "↑/↓: choose  Enter: run  Esc: cancel"
  } else if app.overlays.detail.is_some() {
    "Tab/←/→: switch tab  ↑/↓: scroll  Enter: expand/collapse  Esc: close"
  } else {
    "type: search  ↑/↓: select  Enter: open  Tab: row actions  Esc: clear/quit"
  };
  frame.render_widget(Paragraph::new(Span::styled(help, DIM)), area);
}

/// Areas of the detail modal within the terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DetailLayout {
  pub popup: Rect,
  pub tabs: Rect,
  pub body: Rect,
}

/// Where the detail modal and its tab body land in `area`. The body is
/// `panel_height` plus two rows tall, less when the terminal is short.
pub fn detail_layout(area: Rect, panel_height: u16) -> DetailLayout {
  let popup = centered_rect(80, area, panel_height.saturating_add(6));
  let inner = Block::default().borders(Borders::ALL).inner(popup);

  let chunks = Layout::default()
    .direction(Direction::Vertical)
    .constraints([Constraint::Length(2), Constraint::Min(1)])
    .split(inner);

  DetailLayout { popup, tabs: chunks[0], body: chunks[1] }
}

fn draw_detail(frame: &mut Frame, modal: &DetailModal, panel_height: u16) {
  let layout = detail_layout(frame.area(), panel_height);
  frame.render_widget(Clear, layout.popup);

  let block = Block::default()
    .borders(Borders::ALL)
    .title(Span::styled(format!(" {} ", modal.title), Style::default().add_modifier(Modifier::BOLD)));
  frame.render_widget(block, layout.popup);

  let view = &modal.view;
  let titles: Vec<Line> = DetailTab::ALL.iter().map(|tab| Line::from(tab.title())).collect();
  let tabs = Tabs::new(titles)
    .select(view.active_tab().index())
    .highlight_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
    .block(Block::default().borders(Borders::BOTTOM));
  frame.render_widget(tabs, layout.tabs);

  let scroll = view.scroll_offset(view.active_tab()).min(u16::MAX as usize) as u16;
  let body = match view.active_content() {
    TabContent::Text(_) => {
      Paragraph::new(view.document_lines().into_iter().map(Line::from).collect::<Vec<_>>())
    }
    TabContent::Items(items) => {
      Paragraph::new(items.into_iter().map(|item| Line::from(format!("• {item}"))).collect::<Vec<_>>())
    }
    TabContent::Tree(lines) => {
      let cursor = view.tree_cursor();
      Paragraph::new(
        lines.iter().enumerate().map(|(i, line)| tree_line(line, i == cursor)).collect::<Vec<_>>(),
      )
    }
    TabContent::Placeholder(message) => Paragraph::new(Span::styled(message, DIM)),
  };
  frame.render_widget(body.scroll((scroll, 0)), layout.body);
}

fn draw_menu(frame: &mut Frame, menu: &RowActionMenu) {
  let area = centered_rect(30, frame.area(), RowAction::ALL.len() as u16 + 2);
  frame.render_widget(Clear, area);

  let items: Vec<ListItem> = RowAction::ALL.iter().map(|a| ListItem::new(a.label())).collect();
  let list = List::new(items)
    .block(Block::default().borders(Borders::ALL).title(" Row actions "))
    .highlight_style(Style::default().add_modifier(Modifier::REVERSED));

  let mut state = ListState::default();
  state.select(Some(menu.selected));
  frame.render_stateful_widget(list, area, &mut state);
}

fn tree_line(line: &TreeLine, is_cursor: bool) -> Line<'static> {
  let mut spans = vec![Span::raw("  ".repeat(line.depth))];
  spans.extend(line.tokens.iter().map(|token| {
    let style = match token.kind {
      TokenKind::Key => Style::default().fg(Color::Blue),
      TokenKind::String => Style::default().fg(Color::Green),
      TokenKind::Number => Style::default().fg(Color::Yellow),
      TokenKind::Bool => Style::default().fg(Color::Magenta),
      TokenKind::Null | TokenKind::Ellipsis => DIM,
      TokenKind::Punctuation => Style::default(),
    };
    Span::styled(token.text.clone(), style)
  }));

  let line = Line::from(spans);
  if is_cursor {
    line.style(Style::default().add_modifier(Modifier::REVERSED))
  } else {
    line
  }
}

/// Spans of `text` with the parts the filter matched for `query` emphasised.
fn highlight_line(text: &str, query: &str) -> Line<'static> {
  let flat: String = text.chars().map(|c| if c.is_control() { ' ' } else { c }).collect();

  let mut spans = Vec::new();
  let mut end = 0;
  for range in match_ranges(&flat, query) {
    if range.start > end {
      spans.push(Span::raw(flat[end..range.start].to_string()));
    }
    spans.push(Span::styled(flat[range.clone()].to_string(), MATCH_STYLE));
    end = range.end;
  }
  if end < flat.len() || spans.is_empty() {
    spans.push(Span::raw(flat[end..].to_string()));
  }
  Line::from(spans)
}

fn centered_rect(percent_x: u16, r: Rect, height: u16) -> Rect {
  let height = height.min(r.height);
  let vertical = Layout::default()
    .direction(Direction::Vertical)
    .constraints([Constraint::Fill(1), Constraint::Length(height), Constraint::Fill(1)])
    .split(r);

  Layout::default()
    .direction(Direction::Horizontal)
    .constraints([
      Constraint::Percentage((100 - percent_x) / 2),
      Constraint::Percentage(percent_x),
      Constraint::Percentage((100 - percent_x) / 2),
    ])
    .split(vertical[1])[1]
}
