use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::{filter::EnvFilter, fmt, prelude::*};

use prism::commands;
use prism::config::BrowserConfig;
use prism::detail::DetailTab;

#[derive(Parser)]
#[command(name = "prism")]
#[command(
  about = "Prism - Record Browser\nSearch and inspect vector database records from the terminal"
)]
#[command(version)]
struct Cli {
  /// Configuration file (default: ./.prism.json, then the user config directory)
  #[arg(long, global = true, env = "PRISM_CONFIG")]
  config: Option<PathBuf>,

  /// Enable debug logging
  #[arg(short, long, global = true)]
  verbose: bool,

  /// Write logs to a file instead of stderr
  #[arg(long, global = true)]
  log_file: Option<PathBuf>,

  #[command(subcommand)]
  command: Command,
}

/// Common page arguments
#[derive(Args)]
struct PageArgs {
  /// JSON page of records, or - to read standard input
  page: PathBuf,
  /// Treat the page as similarity query results (adds the Distance column)
  #[arg(long)]
  with_query: bool,
  /// Initial search query
  #[arg(short, long, default_value = "")]
  search: String,
}

#[derive(Subcommand)]
enum Command {
  /// Browse a page of records interactively
  Browse {
    #[command(flatten)]
    page: PageArgs,
  },
  /// Print the (filtered) record table
  List {
    #[command(flatten)]
    page: PageArgs,
    /// Output width in characters (default: terminal width)
    #[arg(long)]
    width: Option<usize>,
  },
  /// Print one tab of a record's detail view
  Show {
    /// JSON page of records, or - to read standard input
    page: PathBuf,
    /// Identifier of the record
    id: String,
    /// Tab to print
    #[arg(short, long, value_enum, default_value = "document")]
    tab: DetailTab,
    /// Expand every metadata node and show long strings in full
    #[arg(long)]
    expand_all: bool,
    /// Output width in characters (default: terminal width)
    #[arg(long)]
    width: Option<usize>,
  },
}

fn init_logging(verbose: bool, log_file: Option<&Path>, interactive: bool) -> Result<()> {
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
    if verbose {
      EnvFilter::new("prism=debug,warn")
    } else {
      EnvFilter::new("warn")
    }
  });

  match log_file {
    Some(path) => {
      let file = File::create(path)
        .with_context(|| format!("Failed to create log file {}", path.display()))?;
      tracing_subscriber::registry()
        .with(fmt::layer().with_writer(Mutex::new(file)).with_ansi(false))
        .with(filter)
        .init();
    }
    // The browser owns the terminal; stderr output would corrupt the screen.
    None if interactive => {}
    None => {
      tracing_subscriber::registry().with(fmt::layer().with_writer(std::io::stderr)).with(filter).init();
    }
  }

  Ok(())
}

fn terminal_width(requested: Option<usize>) -> usize {
  requested.unwrap_or_else(|| console::Term::stdout().size().1 as usize)
}

fn handle(command: Command, config: BrowserConfig) -> Result<()> {
  match command {
    Command::Browse { page } => {
      commands::browse(&page.page, page.with_query, &page.search, config)?;
    }
    Command::List { page, width } => {
      commands::list_records(
        &page.page,
        page.with_query,
        &page.search,
        &config,
        terminal_width(width),
      )?;
    }
    Command::Show { page, id, tab, expand_all, width } => {
      commands::show_record(&page, &id, tab, expand_all, &config, terminal_width(width))?;
    }
  }
  Ok(())
}

fn main() -> Result<()> {
  let cli = Cli::parse();

  let interactive = matches!(cli.command, Command::Browse { .. });
  init_logging(cli.verbose, cli.log_file.as_deref(), interactive)?;

  let config = BrowserConfig::load(cli.config.as_deref()).context("Failed to load configuration")?;

  handle(cli.command, config)
}
