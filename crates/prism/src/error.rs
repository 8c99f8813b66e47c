use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PrismError {
  #[error("Failed to read {path}: {source}")]
  Io {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("Failed to parse {path}: {source}")]
  Parse {
    path: PathBuf,
    #[source]
    source: serde_json::Error,
  },

  #[error("Record id '{id}' appears more than once in the page")]
  DuplicateId { id: String },

  #[error("Record '{id}' not found")]
  RecordNotFound { id: String },

  #[error("Invalid configuration: {message}")]
  Config { message: String },

  #[error("Terminal error: {0}")]
  Terminal(#[from] std::io::Error),
}

impl PrismError {
  pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
    Self::Io { path: path.into(), source }
  }

  pub fn parse(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
    Self::Parse { path: path.into(), source }
  }

  pub fn record_not_found(id: impl Into<String>) -> Self {
    Self::RecordNotFound { id: id.into() }
  }

  pub fn config(message: impl Into<String>) -> Self {
    Self::Config { message: message.into() }
  }
}

pub type Result<T> = std::result::Result<T, PrismError>;
