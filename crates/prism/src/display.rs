//! Display formatting utilities for CLI output

use colored::*;

use crate::detail::{DetailTab, RecordDetail, TabContent};
use crate::format::{detail_title, wrap_text};
use crate::search::match_ranges;
use crate::table::{ColumnWidth, TableBody, TableView};
use crate::tree::{Token, TokenKind};

const COLUMN_GAP: &str = "  ";

/// Highlight every part of `text` the filter matched for `query`.
pub fn highlight_query(text: &str, query: &str) -> String {
  let mut highlighted = String::new();
  let mut end = 0;

  for range in match_ranges(text, query) {
    highlighted.push_str(&text[end..range.start]);
    highlighted.push_str(&text[range.clone()].yellow().bold().to_string());
    end = range.end;
  }

  highlighted.push_str(&text[end..]);
  highlighted
}

/// Fit `text` into exactly `width` characters, cutting with an ellipsis.
pub fn fit_cell(text: &str, width: usize) -> String {
  let flat: String = text.chars().map(|c| if c.is_control() { ' ' } else { c }).collect();
  let count = flat.chars().count();

  if count <= width {
    return format!("{flat}{}", " ".repeat(width - count));
  }
  if width == 0 {
    return String::new();
  }

  let mut cut: String = flat.chars().take(width - 1).collect();
  cut.push('…');
  cut
}

/// Resolve column widths for a terminal `total` characters wide.
pub fn column_widths(widths: &[ColumnWidth], total: usize) -> Vec<usize> {
  let gaps = COLUMN_GAP.len() * widths.len().saturating_sub(1);
  let available = total.saturating_sub(gaps);

  let mut resolved: Vec<usize> = widths
    .iter()
    .map(|width| match width {
      ColumnWidth::Fixed(n) => *n as usize,
      ColumnWidth::Percent(p) => available * (*p as usize) / 100,
      ColumnWidth::Fill => 0,
    })
    .collect();

  let used: usize = resolved.iter().sum();
  let remaining = available.saturating_sub(used);
  for (slot, width) in resolved.iter_mut().zip(widths) {
    if *width == ColumnWidth::Fill {
      *slot = remaining;
    }
  }

  resolved
}

/// Plain-text lines of a table view: header, body rows or placeholder, footer.
pub fn render_table_lines(view: &TableView, with_query: bool, total_width: usize) -> Vec<String> {
  let widths: Vec<ColumnWidth> = view.columns.iter().map(|c| c.width(with_query)).collect();
  let resolved = column_widths(&widths, total_width);

  let join = |cells: Vec<String>| cells.join(COLUMN_GAP).trim_end().to_string();

  let mut lines = Vec::new();
  lines.push(join(
    view.columns.iter().zip(&resolved).map(|(column, w)| fit_cell(column.title(), *w)).collect(),
  ));

  match &view.body {
    TableBody::Rows(rows) => {
      for row in rows {
        lines.push(join(row.cells.iter().zip(&resolved).map(|(cell, w)| fit_cell(cell, *w)).collect()));
      }
    }
    TableBody::NoMatches { message, .. } => {
      let span = total_width.max(message.chars().count());
      let padding = (span - message.chars().count()) / 2;
      lines.push(format!("{}{}", " ".repeat(padding), message));
    }
  }

  if let Some(footer) = &view.footer {
    lines.push(String::new());
    lines.push(footer.clone());
  }

  lines
}

/// Print a table view with the header in bold and query matches highlighted.
pub fn print_table(view: &TableView, with_query: bool, query: &str, total_width: usize) {
  let lines = render_table_lines(view, with_query, total_width);
  let row_count = view.row_count();

  for (i, line) in lines.iter().enumerate() {
    if i == 0 {
      println!("{}", line.bold());
    } else if i <= row_count {
      println!("{}", highlight_query(line, query));
    } else {
      println!("{}", line.dimmed());
    }
  }
}

pub fn style_token(token: &Token) -> ColoredString {
  match token.kind {
    TokenKind::Key => token.text.blue(),
    TokenKind::String => token.text.green(),
    TokenKind::Number => token.text.yellow(),
    TokenKind::Bool => token.text.magenta(),
    TokenKind::Null | TokenKind::Ellipsis => token.text.dimmed(),
    TokenKind::Punctuation => token.text.normal(),
  }
}

/// Plain-text lines of one tab of a detail view.
pub fn render_tab_lines(content: &TabContent, width: usize) -> Vec<String> {
  match content {
    TabContent::Text(text) => wrap_text(text, width),
    TabContent::Items(items) => items.iter().map(|item| format!("• {item}")).collect(),
    TabContent::Tree(lines) => lines.iter().map(|line| line.indented()).collect(),
    TabContent::Placeholder(message) => vec![message.to_string()],
  }
}

/// Print the header, tab bar and active tab of a detail view.
pub fn print_detail(detail: &RecordDetail, width: usize) {
  let header = format!("=== {} ===", detail_title(detail.record()).yellow().bold());
  println!("{header}");

  let tabs: Vec<String> = DetailTab::ALL
    .iter()
    .map(|tab| {
      if *tab == detail.active_tab() {
        format!("[{}]", tab.title()).cyan().bold().to_string()
      } else {
        format!(" {} ", tab.title()).dimmed().to_string()
      }
    })
    .collect();
  println!("{}", tabs.join(" "));
  println!();

  match detail.active_content() {
    TabContent::Tree(lines) => {
      for line in lines {
        let styled: String = line.tokens.iter().map(|t| style_token(t).to_string()).collect();
        println!("{}{}", "  ".repeat(line.depth), styled);
      }
    }
    TabContent::Placeholder(message) => println!("{}", message.dimmed()),
    content => {
      for line in render_tab_lines(&content, width) {
        println!("{line}");
      }
    }
  }
}
