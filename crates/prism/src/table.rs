//! Searchable record table.
//!
//! [`RecordTable`] holds the page it was given, the search query and the
//! keyboard selection. [`RecordTable::view`] is a pure function of that state
//! and produces everything a front end needs to draw: columns, rows or the
//! no-match placeholder, and the footer.

use crate::format::{detail_title, format_distance, format_document, format_embedding, format_metadata};
use crate::model::{Record, RecordsPage};
use crate::search::{filter_indices, SearchOptions};

pub const SEARCH_PLACEHOLDER: &str = "Search in all columns...";

/// Where the table sends row activations and row actions.
#[cfg_attr(test, mockall::automock)]
pub trait RecordActions {
  /// Show the detail view for `record` under `title`.
  fn open_detail(&mut self, title: String, record: &Record);

  /// Offer the per-row action menu for a record's embedding, already joined by `", "`.
  fn request_row_action(&mut self, formatted_embedding: String);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
  Actions,
  Distance,
  Id,
  Document,
  Metadata,
  Embedding,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnWidth {
  Fixed(u16),
  Percent(u16),
  Fill,
}

impl Column {
  pub fn title(self) -> &'static str {
    match self {
      Column::Actions => "",
      Column::Distance => "Distance",
      Column::Id => "ID",
      Column::Document => "Document",
      Column::Metadata => "Metadata",
      Column::Embedding => "Embedding",
    }
  }

  pub fn width(self, with_query: bool) -> ColumnWidth {
    match self {
      Column::Actions => ColumnWidth::Fixed(3),
      Column::Distance | Column::Id => ColumnWidth::Percent(10),
      Column::Document => ColumnWidth::Percent(40),
      Column::Metadata => ColumnWidth::Percent(if with_query { 20 } else { 30 }),
      Column::Embedding => ColumnWidth::Fill,
    }
  }

  pub fn for_mode(with_query: bool) -> Vec<Column> {
    let mut columns = vec![Column::Actions];
    if with_query {
      columns.push(Column::Distance);
    }
    columns.extend([Column::Id, Column::Document, Column::Metadata, Column::Embedding]);
    columns
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRow {
  /// Position of the record in the page.
  pub index: usize,
  /// One cell per column, in column order.
  pub cells: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableBody {
  Rows(Vec<TableRow>),
  /// A single row spanning every column.
  NoMatches { message: String, colspan: usize },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableView {
  pub columns: Vec<Column>,
  pub body: TableBody,
  pub footer: Option<String>,
}

impl TableView {
  pub fn row_count(&self) -> usize {
    match &self.body {
      TableBody::Rows(rows) => rows.len(),
      TableBody::NoMatches { .. } => 0,
    }
  }
}

pub fn no_matches_message(query: &str) -> String {
  format!("No records found matching \"{query}\"")
}

pub fn footer_text(visible: usize, total: usize) -> String {
  format!("Showing {visible} of {total} records")
}

#[derive(Debug, Clone)]
pub struct RecordTable {
  page: RecordsPage,
  with_query: bool,
  search_query: String,
  visible: Vec<usize>,
  selected: Option<usize>,
}

impl RecordTable {
  /// A missing page is treated as empty.
  pub fn new(page: Option<RecordsPage>, with_query: bool) -> Self {
    let page = page.unwrap_or_default();
    let visible = (0..page.len()).collect();
    let mut table = Self { page, with_query, search_query: String::new(), visible, selected: None };
    table.clamp_selection();
    table
  }

  pub fn page(&self) -> &RecordsPage {
    &self.page
  }

  pub fn with_query(&self) -> bool {
    self.with_query
  }

  pub fn search_query(&self) -> &str {
    &self.search_query
  }

  pub fn set_search_query(&mut self, query: impl Into<String>) {
    self.search_query = query.into();
    self.refilter();
  }

  pub fn push_query_char(&mut self, c: char) {
    self.search_query.push(c);
    self.refilter();
  }

  pub fn pop_query_char(&mut self) {
    if self.search_query.pop().is_some() {
      self.refilter();
    }
  }

  pub fn clear_query(&mut self) {
    self.set_search_query(String::new());
  }

  fn refilter(&mut self) {
    let options = SearchOptions { with_query: self.with_query };
    self.visible = filter_indices(self.page.records(), &self.search_query, options);
    tracing::debug!(
      query = %self.search_query,
      visible = self.visible.len(),
      total = self.page.len(),
      "Filtered records"
    );
    self.clamp_selection();
  }

  pub fn visible_records(&self) -> impl Iterator<Item = &Record> + '_ {
    self.visible.iter().map(|&index| &self.page.records()[index])
  }

  pub fn visible_count(&self) -> usize {
    self.visible.len()
  }

  pub fn columns(&self) -> Vec<Column> {
    Column::for_mode(self.with_query)
  }

  pub fn view(&self) -> TableView {
    let columns = self.columns();
    let body = if self.visible.is_empty() && !self.search_query.is_empty() {
      TableBody::NoMatches {
        message: no_matches_message(&self.search_query),
        colspan: columns.len(),
      }
    } else {
      TableBody::Rows(
        self
          .visible
          .iter()
          .map(|&index| TableRow { index, cells: row_cells(&self.page.records()[index], &columns) })
          .collect(),
      )
    };
    let footer = (!self.visible.is_empty())
      .then(|| footer_text(self.visible.len(), self.page.len()));

    TableView { columns, body, footer }
  }

  /// Position of the selection within the visible rows.
  pub fn selected(&self) -> Option<usize> {
    self.selected
  }

  pub fn selected_record(&self) -> Option<&Record> {
    self.selected.map(|position| &self.page.records()[self.visible[position]])
  }

  /// Move the selection by `delta` visible rows, clamped to the ends.
  pub fn move_selection(&mut self, delta: isize) {
    if let Some(position) = self.selected {
      let last = self.visible.len() - 1;
      self.selected = Some(position.saturating_add_signed(delta).min(last));
    }
  }

  pub fn select_first(&mut self) {
    if !self.visible.is_empty() {
      self.selected = Some(0);
    }
  }

  pub fn select_last(&mut self) {
    self.selected = self.visible.len().checked_sub(1);
  }

  fn clamp_selection(&mut self) {
    self.selected = match (self.selected, self.visible.len()) {
      (_, 0) => None,
      (None, _) => Some(0),
      (Some(position), len) => Some(position.min(len - 1)),
    };
  }

  /// Activate the visible row at `position`: the collaborator receives the
  /// full record and an `ID: <id>` title.
  pub fn open_detail(&self, position: usize, actions: &mut dyn RecordActions) -> bool {
    let Some(&index) = self.visible.get(position) else {
      return false;
    };
    let record = &self.page.records()[index];
    actions.open_detail(detail_title(record), record);
    true
  }

  pub fn open_selected(&self, actions: &mut dyn RecordActions) -> bool {
    self.selected.is_some_and(|position| self.open_detail(position, actions))
  }

  pub fn request_row_action(&self, position: usize, actions: &mut dyn RecordActions) -> bool {
    let Some(&index) = self.visible.get(position) else {
      return false;
    };
    actions.request_row_action(format_embedding(&self.page.records()[index].embedding));
    true
  }

  pub fn request_selected_action(&self, actions: &mut dyn RecordActions) -> bool {
    self.selected.is_some_and(|position| self.request_row_action(position, actions))
  }
}

fn row_cells(record: &Record, columns: &[Column]) -> Vec<String> {
  columns
    .iter()
    .map(|column| match column {
      Column::Actions => "⋮".to_string(),
      Column::Distance => format_distance(record.distance),
      Column::Id => record.id.clone(),
      Column::Document => format_document(record).to_string(),
      Column::Metadata => format_metadata(record),
      Column::Embedding => format_embedding(&record.embedding),
    })
    .collect()
}
