//! Prism - Record Browser
//!
//! Search and inspect pages of vector database records: a filterable record
//! table, a tabbed detail view for a single record, and an interactive
//! terminal front end that ties the two together.

pub mod commands;
pub mod config;
pub mod detail;
pub mod display;
pub mod error;
pub mod format;
pub mod model;
pub mod search;
pub mod table;
pub mod tree;
pub mod tui;

pub use error::{PrismError, Result};
