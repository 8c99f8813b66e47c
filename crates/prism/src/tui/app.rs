//! Interactive browser state and key handling.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::layout::Rect;

use crate::config::BrowserConfig;
use crate::detail::{DetailTab, RecordDetail};
use crate::model::Record;
use crate::table::{RecordActions, RecordTable};
use crate::tree::TreeOptions;

use super::ui;

const PAGE_STEP: isize = 10;

/// Actions offered by the row action menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowAction {
  CopyEmbedding,
}

impl RowAction {
  pub const ALL: [RowAction; 1] = [RowAction::CopyEmbedding];

  pub fn label(self) -> &'static str {
    match self {
      RowAction::CopyEmbedding => "Copy embedding",
    }
  }
}

#[derive(Debug, Clone)]
pub struct RowActionMenu {
  pub embedding: String,
  pub selected: usize,
}

#[derive(Debug, Clone)]
pub struct DetailModal {
  pub title: String,
  pub view: RecordDetail,
}

/// The collaborator side of the table: the detail modal and the row menu.
#[derive(Debug, Default)]
pub struct Overlays {
  tree_options: TreeOptions,
  pub detail: Option<DetailModal>,
  pub menu: Option<RowActionMenu>,
}

impl Overlays {
  pub fn new(tree_options: TreeOptions) -> Self {
    Self { tree_options, detail: None, menu: None }
  }
}

impl RecordActions for Overlays {
  fn open_detail(&mut self, title: String, record: &Record) {
    tracing::debug!(id = %record.id, "Opening record detail");
    self.detail = Some(DetailModal { title, view: RecordDetail::new(record.clone(), self.tree_options) });
  }

  fn request_row_action(&mut self, formatted_embedding: String) {
    self.menu = Some(RowActionMenu { embedding: formatted_embedding, selected: 0 });
  }
}

pub struct App {
  pub table: RecordTable,
  pub overlays: Overlays,
  pub config: BrowserConfig,
  pub status: Option<String>,
  pub should_quit: bool,
  clipboard: Option<String>,
  area: Rect,
}

impl App {
  pub fn new(table: RecordTable, config: BrowserConfig) -> Self {
    Self {
      table,
      overlays: Overlays::new(config.tree_options()),
      config,
      status: None,
      should_quit: false,
      clipboard: None,
      area: Rect::default(),
    }
  }

  /// Record the terminal size the next frame is drawn at.
  pub fn resize(&mut self, width: u16, height: u16) {
    self.area = Rect::new(0, 0, width, height);
    self.sync_detail_viewport();
  }

  /// Give the open detail view the size of the body it is drawn into.
  fn sync_detail_viewport(&mut self) {
    if self.area.is_empty() {
      return;
    }
    let body = ui::detail_layout(self.area, self.config.panel_height).body;
    if let Some(modal) = self.overlays.detail.as_mut() {
      modal.view.set_viewport(body.width as usize, body.height as usize);
    }
  }

  /// Text waiting to be written to the terminal clipboard.
  pub fn take_clipboard(&mut self) -> Option<String> {
    self.clipboard.take()
  }

  pub fn handle_key(&mut self, key: KeyEvent) {
    if key.kind != KeyEventKind::Press {
      return;
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
      self.should_quit = true;
      return;
    }

    if self.overlays.menu.is_some() {
      self.handle_menu_key(key);
    } else if self.overlays.detail.is_some() {
      self.handle_detail_key(key);
    } else {
      self.handle_table_key(key);
    }
    self.sync_detail_viewport();
  }

  fn handle_table_key(&mut self, key: KeyEvent) {
    self.status = None;

    match key.code {
      KeyCode::Esc if !self.table.search_query().is_empty() => self.table.clear_query(),
      KeyCode::Esc => self.should_quit = true,
      KeyCode::Enter => {
        self.table.open_selected(&mut self.overlays);
      }
      KeyCode::Tab => {
        self.table.request_selected_action(&mut self.overlays);
      }
      KeyCode::Up => self.table.move_selection(-1),
      KeyCode::Down => self.table.move_selection(1),
      KeyCode::PageUp => self.table.move_selection(-PAGE_STEP),
      KeyCode::PageDown => self.table.move_selection(PAGE_STEP),
      KeyCode::Home => self.table.select_first(),
      KeyCode::End => self.table.select_last(),
      KeyCode::Backspace => self.table.pop_query_char(),
      KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
        self.table.push_query_char(c)
      }
      _ => {}
    }
  }

  fn handle_detail_key(&mut self, key: KeyEvent) {
    let Some(modal) = self.overlays.detail.as_mut() else {
      return;
    };
    let view = &mut modal.view;
    let on_metadata = view.active_tab() == DetailTab::Metadata;
    let page = view.viewport().height as isize;

    match key.code {
      KeyCode::Esc | KeyCode::Char('q') => self.overlays.detail = None,
      KeyCode::Tab | KeyCode::Right | KeyCode::Char('l') => view.next_tab(),
      KeyCode::BackTab | KeyCode::Left | KeyCode::Char('h') => view.previous_tab(),
      KeyCode::Char('1') => view.select_tab(DetailTab::Document),
      KeyCode::Char('2') => view.select_tab(DetailTab::Embedding),
      KeyCode::Char('3') => view.select_tab(DetailTab::Metadata),
      KeyCode::Up | KeyCode::Char('k') if on_metadata => view.move_tree_cursor(-1),
      KeyCode::Down | KeyCode::Char('j') if on_metadata => view.move_tree_cursor(1),
      KeyCode::Up | KeyCode::Char('k') => view.scroll_by(-1),
      KeyCode::Down | KeyCode::Char('j') => view.scroll_by(1),
      KeyCode::PageUp => view.scroll_by(-page),
      KeyCode::PageDown => view.scroll_by(page),
      KeyCode::Home => view.scroll_to_top(),
      KeyCode::Enter | KeyCode::Char(' ') if on_metadata => {
        view.toggle_at_cursor();
      }
      _ => {}
    }
  }

  fn handle_menu_key(&mut self, key: KeyEvent) {
    let Some(menu) = self.overlays.menu.as_mut() else {
      return;
    };

    match key.code {
      KeyCode::Esc => self.overlays.menu = None,
      KeyCode::Up => menu.selected = menu.selected.saturating_sub(1),
      KeyCode::Down => menu.selected = (menu.selected + 1).min(RowAction::ALL.len() - 1),
      KeyCode::Enter => {
        let action = RowAction::ALL[menu.selected];
        let embedding = menu.embedding.clone();
        self.overlays.menu = None;
        self.perform(action, embedding);
      }
      _ => {}
    }
  }

  fn perform(&mut self, action: RowAction, embedding: String) {
    match action {
      RowAction::CopyEmbedding => {
        let values = if embedding.is_empty() { 0 } else { embedding.split(", ").count() };
        self.clipboard = Some(embedding);
        self.status = Some(format!("Copied embedding ({values} values) to clipboard"));
      }
    }
  }
}
