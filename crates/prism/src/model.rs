//! Records as delivered by the data source, and the pages that carry them.

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::io::Read;
use std::path::Path;

use crate::error::{PrismError, Result};

/// Structured metadata attached to a record.
///
/// Map keys are kept sorted; the source ordering carries no meaning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetadataValue {
  Null,
  Bool(bool),
  #[serde(deserialize_with = "integral_number")]
  Number(serde_json::Number),
  String(String),
  List(Vec<MetadataValue>),
  Map(BTreeMap<String, MetadataValue>),
}

impl MetadataValue {
  /// Compact JSON text, the same form used for the table cell and for search.
  pub fn to_json(&self) -> String {
    serde_json::to_string(self).unwrap_or_default()
  }

  /// True for values that carry nothing worth drawing as a tree.
  pub fn is_blank(&self) -> bool {
    match self {
      MetadataValue::Null => true,
      MetadataValue::Map(map) => map.is_empty(),
      _ => false,
    }
  }

  pub fn is_container(&self) -> bool {
    matches!(self, MetadataValue::List(_) | MetadataValue::Map(_))
  }
}

/// Whole-valued floats read as integers, so `1.0` renders and matches as `1`.
fn integral_number<'de, D>(deserializer: D) -> std::result::Result<serde_json::Number, D::Error>
where
  D: Deserializer<'de>,
{
  let number = serde_json::Number::deserialize(deserializer)?;
  Ok(normalize_number(number))
}

fn normalize_number(number: serde_json::Number) -> serde_json::Number {
  const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

  match number.as_f64() {
    Some(value) if number.is_f64() && value.fract() == 0.0 && value.abs() <= MAX_SAFE_INTEGER => {
      serde_json::Number::from(value as i64)
    }
    _ => number,
  }
}

/// One entry of the browsed collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
  pub id: String,
  #[serde(default)]
  pub document: Option<String>,
  #[serde(default, deserialize_with = "null_as_empty")]
  pub embedding: Vec<f64>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub metadata: Option<MetadataValue>,
  /// Only present when the page is the result of a similarity query.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub distance: Option<f64>,
}

fn null_as_empty<'de, D>(deserializer: D) -> std::result::Result<Vec<f64>, D::Error>
where
  D: Deserializer<'de>,
{
  Ok(Option::<Vec<f64>>::deserialize(deserializer)?.unwrap_or_default())
}

impl Record {
  pub fn new(id: impl Into<String>, document: impl Into<String>, embedding: Vec<f64>) -> Self {
    Self {
      id: id.into(),
      document: Some(document.into()),
      embedding,
      metadata: None,
      distance: None,
    }
  }

  pub fn with_metadata(mut self, metadata: MetadataValue) -> Self {
    self.metadata = Some(metadata);
    self
  }

  pub fn with_distance(mut self, distance: f64) -> Self {
    self.distance = Some(distance);
    self
  }
}

/// An ordered batch of records with unique ids.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RecordsPage {
  records: Vec<Record>,
}

impl RecordsPage {
  pub fn new(records: Vec<Record>) -> Result<Self> {
    let mut seen = HashSet::new();
    for record in &records {
      if !seen.insert(record.id.as_str()) {
        return Err(PrismError::DuplicateId { id: record.id.clone() });
      }
    }
    Ok(Self { records })
  }

  pub fn records(&self) -> &[Record] {
    &self.records
  }

  pub fn len(&self) -> usize {
    self.records.len()
  }

  pub fn is_empty(&self) -> bool {
    self.records.is_empty()
  }

  pub fn get(&self, id: &str) -> Option<&Record> {
    self.records.iter().find(|record| record.id == id)
  }

  /// Parse a page from JSON: either a bare array of records or `{"records": [...]}`.
  pub fn from_json_str(json: &str, source: &Path) -> Result<Self> {
    let value: serde_json::Value =
      serde_json::from_str(json).map_err(|e| PrismError::parse(source, e))?;

    let records_value = match value {
      serde_json::Value::Object(mut map) => {
        map.remove("records").unwrap_or(serde_json::Value::Null)
      }
      other => other,
    };

    let records: Vec<Record> =
      serde_json::from_value(records_value).map_err(|e| PrismError::parse(source, e))?;

    Self::new(records)
  }

  /// Load a page from a file, or from standard input when the path is `-`.
  pub fn load(path: &Path) -> Result<Self> {
    let content = if path == Path::new("-") {
      let mut buffer = String::new();
      std::io::stdin().read_to_string(&mut buffer).map_err(|e| PrismError::io(path, e))?;
      buffer
    } else {
      std::fs::read_to_string(path).map_err(|e| PrismError::io(path, e))?
    };

    let page = Self::from_json_str(&content, path)?;
    tracing::debug!(records = page.len(), path = %path.display(), "Loaded records page");
    Ok(page)
  }

  /// Whether this page looks like similarity-query output: non-empty and every
  /// record carries a distance.
  pub fn infer_with_query(&self) -> bool {
    let with_distance = self.records.iter().filter(|r| r.distance.is_some()).count();

    if with_distance > 0 && with_distance < self.records.len() {
      tracing::warn!(
        with_distance,
        total = self.records.len(),
        "Page mixes records with and without distance"
      );
    }

    !self.records.is_empty() && with_distance == self.records.len()
  }
}
