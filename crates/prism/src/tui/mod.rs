//! Interactive terminal browser.

pub mod app;
pub mod ui;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use crossterm::cursor;
use crossterm::event::{self, Event};
use crossterm::execute;
use crossterm::terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen};
use ratatui::backend::CrosstermBackend;
use std::io::{self, Write};

use crate::config::BrowserConfig;
use crate::error::Result;
use crate::table::RecordTable;
use app::App;

/// Run the browser until the user quits.
pub fn run(table: RecordTable, config: BrowserConfig) -> Result<()> {
  enable_raw_mode()?;
  let mut stdout = io::stdout();
  execute!(stdout, EnterAlternateScreen, cursor::Hide)?;

  // Restore the terminal on every exit path, errors included.
  struct TerminalRestore;
  impl Drop for TerminalRestore {
    fn drop(&mut self) {
      let _ = disable_raw_mode();
      let _ = execute!(io::stdout(), LeaveAlternateScreen, cursor::Show);
    }
  }
  let _restore = TerminalRestore;

  let backend = CrosstermBackend::new(stdout);
  let mut terminal = ratatui::Terminal::new(backend)?;
  let mut app = App::new(table, config);

  tracing::info!(records = app.table.page().len(), "Browser started");

  while !app.should_quit {
    let size = terminal.size()?;
    app.resize(size.width, size.height);
    terminal.draw(|f| ui::draw(f, &app))?;

    if let Event::Key(key) = event::read()? {
      app.handle_key(key);
    }

    if let Some(text) = app.take_clipboard() {
      let out = terminal.backend_mut();
      out.write_all(osc52_sequence(&text).as_bytes())?;
      out.flush()?;
    }
  }

  Ok(())
}

/// OSC 52 escape asking the terminal to place `text` on the system clipboard.
pub fn osc52_sequence(text: &str) -> String {
  format!("\x1b]52;c;{}\x07", STANDARD.encode(text))
}
