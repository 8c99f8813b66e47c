use std::path::Path;

use crate::config::BrowserConfig;
use crate::detail::{DetailTab, RecordDetail};
use crate::display::{print_detail, print_table};
use crate::error::{PrismError, Result};
use crate::model::RecordsPage;
use crate::table::RecordTable;
use crate::tree::TreeOptions;
use crate::tui;

fn load_table(page_path: &Path, with_query: bool, search: &str) -> Result<RecordTable> {
  let page = RecordsPage::load(page_path)?;
  let with_query = with_query || page.infer_with_query();

  let mut table = RecordTable::new(Some(page), with_query);
  table.set_search_query(search);
  Ok(table)
}

/// Open the interactive browser on a page
pub fn browse(page_path: &Path, with_query: bool, search: &str, config: BrowserConfig) -> Result<()> {
  let table = load_table(page_path, with_query, search)?;
  tui::run(table, config)
}

/// Print the filtered table of a page
pub fn list_records(
  page_path: &Path,
  with_query: bool,
  search: &str,
  config: &BrowserConfig,
  width: usize,
) -> Result<()> {
  let table = load_table(page_path, with_query, search)?;
  let highlight = config.highlight_query(table.search_query());
  print_table(&table.view(), table.with_query(), highlight, width);
  Ok(())
}

/// Print one tab of a record's detail view
pub fn show_record(
  page_path: &Path,
  id: &str,
  tab: DetailTab,
  expand_all: bool,
  config: &BrowserConfig,
  width: usize,
) -> Result<()> {
  let page = RecordsPage::load(page_path)?;
  let record = page.get(id).ok_or_else(|| PrismError::record_not_found(id))?;

  let tree_options = if expand_all { TreeOptions::expanded() } else { config.tree_options() };
  let mut detail = RecordDetail::new(record.clone(), tree_options);
  detail.select_tab(tab);

  print_detail(&detail, width);
  Ok(())
}
