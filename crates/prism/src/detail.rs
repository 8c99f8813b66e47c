//! Tabbed detail view of a single record.

use crate::format::{format_document, format_number, wrap_text};
use crate::model::Record;
use crate::tree::{MetadataTree, TreeLine, TreeOptions};

pub const NO_METADATA: &str = "No metadata available";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, clap::ValueEnum)]
pub enum DetailTab {
  #[default]
  Document,
  Embedding,
  Metadata,
}

impl DetailTab {
  pub const ALL: [DetailTab; 3] = [DetailTab::Document, DetailTab::Embedding, DetailTab::Metadata];

  pub fn title(self) -> &'static str {
    match self {
      DetailTab::Document => "Document",
      DetailTab::Embedding => "Embedding",
      DetailTab::Metadata => "Metadata",
    }
  }

  pub fn index(self) -> usize {
    match self {
      DetailTab::Document => 0,
      DetailTab::Embedding => 1,
      DetailTab::Metadata => 2,
    }
  }

  pub fn next(self) -> Self {
    Self::ALL[(self.index() + 1) % Self::ALL.len()]
  }

  pub fn previous(self) -> Self {
    Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
  }
}

/// What a tab draws.
#[derive(Debug, Clone, PartialEq)]
pub enum TabContent {
  Text(String),
  Items(Vec<String>),
  Tree(Vec<TreeLine>),
  Placeholder(&'static str),
}

impl TabContent {
  /// Number of content lines; text counts its source lines, before wrapping.
  pub fn len(&self) -> usize {
    match self {
      TabContent::Text(text) => text.lines().count(),
      TabContent::Items(items) => items.len(),
      TabContent::Tree(lines) => lines.len(),
      TabContent::Placeholder(_) => 1,
    }
  }

  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }
}

/// Size of the area a tab body is drawn into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
  pub width: usize,
  pub height: usize,
}

impl Default for Viewport {
  fn default() -> Self {
    Self { width: 80, height: 12 }
  }
}

/// State of an open detail view: the active tab, one scroll offset per tab and
/// the metadata tree's expansion and cursor.
#[derive(Debug, Clone)]
pub struct RecordDetail {
  record: Record,
  active: DetailTab,
  scroll: [usize; 3],
  tree: MetadataTree,
  tree_cursor: usize,
  viewport: Viewport,
}

impl RecordDetail {
  pub fn new(record: Record, tree_options: TreeOptions) -> Self {
    Self {
      record,
      active: DetailTab::default(),
      scroll: [0; 3],
      tree: MetadataTree::new(tree_options),
      tree_cursor: 0,
      viewport: Viewport::default(),
    }
  }

  pub fn record(&self) -> &Record {
    &self.record
  }

  pub fn active_tab(&self) -> DetailTab {
    self.active
  }

  pub fn select_tab(&mut self, tab: DetailTab) {
    self.active = tab;
  }

  pub fn next_tab(&mut self) {
    self.active = self.active.next();
  }

  pub fn previous_tab(&mut self) {
    self.active = self.active.previous();
  }

  pub fn viewport(&self) -> Viewport {
    self.viewport
  }

  /// Resize the tab body, re-clamping every scroll offset to the new layout.
  pub fn set_viewport(&mut self, width: usize, height: usize) {
    self.viewport = Viewport { width: width.max(1), height: height.max(1) };

    for tab in DetailTab::ALL {
      let max = self.rows(tab).saturating_sub(1);
      let offset = &mut self.scroll[tab.index()];
      *offset = (*offset).min(max);
    }
    let len = self.content(DetailTab::Metadata).len();
    self.keep_cursor_visible(len);
  }

  /// Screen rows a tab occupies at the current viewport width.
  pub fn rows(&self, tab: DetailTab) -> usize {
    match tab {
      DetailTab::Document => self.document_lines().len(),
      _ => self.content(tab).len(),
    }
  }

  /// The document wrapped to the viewport width.
  pub fn document_lines(&self) -> Vec<String> {
    wrap_text(format_document(&self.record), self.viewport.width)
  }

  pub fn scroll_offset(&self, tab: DetailTab) -> usize {
    self.scroll[tab.index()]
  }

  /// Scroll the active tab by `delta` rows, clamped to the content.
  pub fn scroll_by(&mut self, delta: isize) {
    let max = self.rows(self.active).saturating_sub(1);
    let offset = &mut self.scroll[self.active.index()];
    *offset = offset.saturating_add_signed(delta).min(max);
  }

  pub fn scroll_to_top(&mut self) {
    self.scroll[self.active.index()] = 0;
  }

  pub fn content(&self, tab: DetailTab) -> TabContent {
    match tab {
      DetailTab::Document => TabContent::Text(format_document(&self.record).to_string()),
      DetailTab::Embedding => {
        TabContent::Items(self.record.embedding.iter().map(|v| format_number(*v)).collect())
      }
      DetailTab::Metadata => match &self.record.metadata {
        Some(metadata) if !metadata.is_blank() => TabContent::Tree(self.tree.lines(metadata)),
        _ => TabContent::Placeholder(NO_METADATA),
      },
    }
  }

  pub fn active_content(&self) -> TabContent {
    self.content(self.active)
  }

  pub fn tree_cursor(&self) -> usize {
    self.tree_cursor
  }

  /// Move the metadata cursor, keeping it on an existing line and in view.
  pub fn move_tree_cursor(&mut self, delta: isize) {
    let len = self.content(DetailTab::Metadata).len();
    if len == 0 {
      return;
    }
    self.tree_cursor = self.tree_cursor.saturating_add_signed(delta).min(len - 1);
    self.keep_cursor_visible(len);
  }

  /// Toggle the metadata line under the cursor. Returns false when the line
  /// has nothing to toggle.
  pub fn toggle_at_cursor(&mut self) -> bool {
    let TabContent::Tree(lines) = self.content(DetailTab::Metadata) else {
      return false;
    };

    let Some(line) = lines.get(self.tree_cursor) else {
      return false;
    };

    if line.toggle.is_none() {
      return false;
    }

    let path = line.path.clone();
    self.tree.toggle(&path);
    let len = self.content(DetailTab::Metadata).len();
    self.tree_cursor = self.tree_cursor.min(len.saturating_sub(1));
    true
  }

  fn keep_cursor_visible(&mut self, len: usize) {
    let viewport = self.viewport.height;
    let offset = &mut self.scroll[DetailTab::Metadata.index()];
    if self.tree_cursor < *offset {
      *offset = self.tree_cursor;
    } else if self.tree_cursor >= *offset + viewport {
      *offset = self.tree_cursor + 1 - viewport;
    }
    *offset = (*offset).min(len.saturating_sub(1));
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::model::MetadataValue;
  use std::collections::BTreeMap;

  fn detail(record: Record) -> RecordDetail {
    RecordDetail::new(record, TreeOptions::default())
  }

  fn sample() -> Record {
    Record::new("r1", "line one\nline two\nline three", vec![0.1, 0.2, 0.3])
      .with_metadata(serde_json::from_str(r#"{"a": 1, "nested": {"b": 2}}"#).unwrap())
  }

  #[test]
  fn test_starts_on_document_tab() {
    let view = detail(sample());
    assert_eq!(view.active_tab(), DetailTab::Document);
    assert_eq!(
      view.active_content(),
      TabContent::Text("line one\nline two\nline three".to_string())
    );
  }

  #[test]
  fn test_tab_transitions() {
    let mut view = detail(sample());

    view.next_tab();
    assert_eq!(view.active_tab(), DetailTab::Embedding);
    view.next_tab();
    assert_eq!(view.active_tab(), DetailTab::Metadata);
    view.next_tab();
    assert_eq!(view.active_tab(), DetailTab::Document);

    view.previous_tab();
    assert_eq!(view.active_tab(), DetailTab::Metadata);

    view.select_tab(DetailTab::Embedding);
    assert_eq!(view.active_tab(), DetailTab::Embedding);
  }

  #[test]
  fn test_embedding_items_in_order() {
    let view = detail(sample());
    assert_eq!(
      view.content(DetailTab::Embedding),
      TabContent::Items(vec!["0.1".to_string(), "0.2".to_string(), "0.3".to_string()])
    );
  }

  #[test]
  fn test_empty_embedding_is_empty_list() {
    let view = detail(Record::new("r", "doc", vec![]));
    assert_eq!(view.content(DetailTab::Embedding), TabContent::Items(vec![]));
  }

  #[test]
  fn test_missing_metadata_shows_placeholder() {
    let view = detail(Record::new("r", "doc", vec![]));
    assert_eq!(view.content(DetailTab::Metadata), TabContent::Placeholder(NO_METADATA));

    let view = detail(Record::new("r", "doc", vec![]).with_metadata(MetadataValue::Null));
    assert_eq!(view.content(DetailTab::Metadata), TabContent::Placeholder(NO_METADATA));

    let empty = MetadataValue::Map(BTreeMap::new());
    let view = detail(Record::new("r", "doc", vec![]).with_metadata(empty));
    assert_eq!(view.content(DetailTab::Metadata), TabContent::Placeholder(NO_METADATA));
  }

  #[test]
  fn test_missing_document_renders_empty_text() {
    let mut record = Record::new("r", "", vec![]);
    record.document = None;
    assert_eq!(detail(record).content(DetailTab::Document), TabContent::Text(String::new()));
  }

  #[test]
  fn test_scroll_offsets_are_independent_and_clamped() {
    let mut view = detail(sample());

    view.scroll_by(1);
    assert_eq!(view.scroll_offset(DetailTab::Document), 1);

    view.select_tab(DetailTab::Embedding);
    assert_eq!(view.scroll_offset(DetailTab::Embedding), 0);
    view.scroll_by(10);
    assert_eq!(view.scroll_offset(DetailTab::Embedding), 2);
    view.scroll_by(-5);
    assert_eq!(view.scroll_offset(DetailTab::Embedding), 0);

    view.select_tab(DetailTab::Document);
    assert_eq!(view.scroll_offset(DetailTab::Document), 1);
  }

  #[test]
  fn test_long_single_line_document_scrolls() {
    let mut view = detail(Record::new("r", "word ".repeat(2000), vec![]));
    assert_eq!(view.content(DetailTab::Document).len(), 1);

    view.scroll_by(5);
    assert_eq!(view.scroll_offset(DetailTab::Document), 5);

    view.set_viewport(40, 10);
    // 2000 five-character words, eight per 40-column row.
    assert_eq!(view.rows(DetailTab::Document), 250);
    view.scroll_by(10_000);
    assert_eq!(view.scroll_offset(DetailTab::Document), 249);
  }

  #[test]
  fn test_widening_viewport_reclamps_document_scroll() {
    let mut view = detail(Record::new("r", "word ".repeat(100), vec![]));
    view.set_viewport(10, 5);
    view.scroll_by(40);
    assert_eq!(view.scroll_offset(DetailTab::Document), 40);

    view.set_viewport(500, 5);
    assert_eq!(view.rows(DetailTab::Document), 1);
    assert_eq!(view.scroll_offset(DetailTab::Document), 0);
  }

  #[test]
  fn test_toggle_at_cursor_expands_nested() {
    let mut view = detail(sample());
    view.select_tab(DetailTab::Metadata);

    assert_eq!(view.content(DetailTab::Metadata).len(), 4);

    // Line 0 is "{", line 1 is "a", line 2 is the collapsed "nested".
    view.move_tree_cursor(1);
    assert!(!view.toggle_at_cursor());

    view.move_tree_cursor(1);
    assert!(view.toggle_at_cursor());
    assert_eq!(view.content(DetailTab::Metadata).len(), 6);

    assert!(view.toggle_at_cursor());
    assert_eq!(view.content(DetailTab::Metadata).len(), 4);
  }

  #[test]
  fn test_tree_cursor_stays_in_bounds_and_visible() {
    let mut view = detail(sample());
    view.set_viewport(40, 2);
    view.move_tree_cursor(100);
    assert_eq!(view.tree_cursor(), 3);
    assert_eq!(view.scroll_offset(DetailTab::Metadata), 2);

    view.move_tree_cursor(-100);
    assert_eq!(view.tree_cursor(), 0);
    assert_eq!(view.scroll_offset(DetailTab::Metadata), 0);
  }

  #[test]
  fn test_collapsing_root_clamps_cursor() {
    let mut view = detail(sample());
    view.move_tree_cursor(3);
    // Line 3 is the closing brace, which has no toggle.
    assert!(!view.toggle_at_cursor());

    view.move_tree_cursor(-3);
    assert!(view.toggle_at_cursor());
    assert_eq!(view.content(DetailTab::Metadata).len(), 1);
    assert_eq!(view.tree_cursor(), 0);
  }
}
