//! Free-text filtering over a page of records.

use std::ops::Range;

use crate::format::{format_distance, format_embedding};
use crate::model::Record;

/// Which record fields take part in matching.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchOptions {
  /// Include the stringified distance. Only meaningful for query pages.
  pub with_query: bool,
}

/// Whether the query leaves every record visible.
pub fn is_blank_query(query: &str) -> bool {
  query.trim().is_empty()
}

/// Indices of the records visible under `query`, in page order.
pub fn filter_indices(records: &[Record], query: &str, options: SearchOptions) -> Vec<usize> {
  if is_blank_query(query) {
    return (0..records.len()).collect();
  }

  let normalized_query = query.to_lowercase();

  records
    .iter()
    .enumerate()
    .filter(|(_, record)| matches_normalized(record, &normalized_query, options))
    .map(|(index, _)| index)
    .collect()
}

/// The records visible under `query`, in page order.
pub fn filter_records<'a>(
  records: &'a [Record],
  query: &str,
  options: SearchOptions,
) -> Vec<&'a Record> {
  filter_indices(records, query, options).into_iter().map(|index| &records[index]).collect()
}

pub fn record_matches(record: &Record, query: &str, options: SearchOptions) -> bool {
  is_blank_query(query) || matches_normalized(record, &query.to_lowercase(), options)
}

/// Byte ranges of `text` that `query` matches, compared the same way the
/// filter compares: lowercased, with the query taken as typed.
pub fn match_ranges(text: &str, query: &str) -> Vec<Range<usize>> {
  if is_blank_query(query) {
    return Vec::new();
  }

  let text_lower = text.to_lowercase();
  let query_lower = query.to_lowercase();

  // Lowercasing changed byte offsets; nothing maps back onto `text`.
  if text_lower.len() != text.len() {
    return Vec::new();
  }

  let mut ranges = Vec::new();
  let mut start = 0;
  while let Some(pos) = text_lower[start..].find(&query_lower) {
    let begin = start + pos;
    let end = begin + query_lower.len();
    if text.is_char_boundary(begin) && text.is_char_boundary(end) {
      ranges.push(begin..end);
    }
    start = end;
  }
  ranges
}

/// Fields are checked cheapest first and the scan stops at the first hit.
fn matches_normalized(record: &Record, query: &str, options: SearchOptions) -> bool {
  if record.id.to_lowercase().contains(query) {
    return true;
  }

  if let Some(document) = &record.document {
    if document.to_lowercase().contains(query) {
      return true;
    }
  }

  if options.with_query
    && record.distance.is_some()
    && format_distance(record.distance).contains(query)
  {
    return true;
  }

  if let Some(metadata) = &record.metadata {
    if metadata.to_json().to_lowercase().contains(query) {
      return true;
    }
  }

  format_embedding(&record.embedding).to_lowercase().contains(query)
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::model::MetadataValue;

  const PLAIN: SearchOptions = SearchOptions { with_query: false };
  const QUERY: SearchOptions = SearchOptions { with_query: true };

  fn sample_records() -> Vec<Record> {
    vec![
      Record::new("r1", "hello world", vec![0.1, 0.2]),
      Record::new("r2", "Rust Ownership", vec![0.75])
        .with_metadata(serde_json::from_str(r#"{"source": "Book", "page": 42}"#).unwrap())
        .with_distance(0.9125),
      Record::new("r3", "nothing special", vec![]).with_distance(0.5),
    ]
  }

  fn ids(records: &[&Record]) -> Vec<String> {
    records.iter().map(|r| r.id.clone()).collect()
  }

  #[test]
  fn test_empty_query_returns_everything() {
    let records = sample_records();
    assert_eq!(filter_records(&records, "", PLAIN).len(), records.len());
    assert_eq!(filter_records(&records, "   ", QUERY).len(), records.len());
  }

  #[test]
  fn test_document_match_is_case_insensitive() {
    let records = sample_records();
    assert_eq!(ids(&filter_records(&records, "OWNERSHIP", PLAIN)), vec!["r2"]);
    assert_eq!(ids(&filter_records(&records, "Hello", PLAIN)), vec!["r1"]);
  }

  #[test]
  fn test_id_match() {
    let records = sample_records();
    assert_eq!(ids(&filter_records(&records, "R3", PLAIN)), vec!["r3"]);
  }

  #[test]
  fn test_metadata_is_searched_as_serialized_text() {
    let records =
      vec![Record::new("x", "", vec![]).with_metadata(serde_json::from_str(r#"{"a":1}"#).unwrap())];
    assert_eq!(filter_records(&records, "a", PLAIN).len(), 1);
    assert_eq!(filter_records(&records, "\"a\":1", PLAIN).len(), 1);

    let records = sample_records();
    assert_eq!(ids(&filter_records(&records, "book", PLAIN)), vec!["r2"]);
  }

  #[test]
  fn test_embedding_is_searched_joined() {
    let records = sample_records();
    assert_eq!(ids(&filter_records(&records, "0.1, 0.2", PLAIN)), vec!["r1"]);
  }

  #[test]
  fn test_distance_only_searched_with_query() {
    let records = sample_records();
    assert!(filter_records(&records, "9125", PLAIN).is_empty());
    assert_eq!(ids(&filter_records(&records, "9125", QUERY)), vec!["r2"]);
  }

  #[test]
  fn test_absent_fields_never_match_or_fail() {
    let record = Record {
      id: "bare".to_string(),
      document: None,
      embedding: vec![],
      metadata: None,
      distance: None,
    };
    assert!(!record_matches(&record, "null", QUERY));
    assert!(record_matches(&record, "BA", QUERY));
  }

  #[test]
  fn test_null_metadata_value_is_searchable_text() {
    let record = Record::new("n", "", vec![]).with_metadata(MetadataValue::Null);
    assert!(record_matches(&record, "null", PLAIN));
  }

  #[test]
  fn test_filter_is_idempotent() {
    let records = sample_records();
    for query in ["", "r", "o", "0.", "book", "zzz", "  "] {
      for options in [PLAIN, QUERY] {
        let first: Vec<Record> =
          filter_records(&records, query, options).into_iter().cloned().collect();
        let second: Vec<Record> =
          filter_records(&first, query, options).into_iter().cloned().collect();
        assert_eq!(first, second, "query {query:?}");
      }
    }
  }

  #[test]
  fn test_embedding_matches_full_precision_values() {
    let page = crate::model::RecordsPage::from_json_str(
      r#"[{"id": "a", "embedding": [0.012345679104328156, 0.123456789]}]"#,
      std::path::Path::new("page.json"),
    )
    .unwrap();
    assert_eq!(filter_records(page.records(), "0.123456789", PLAIN).len(), 1);
    assert_eq!(filter_records(page.records(), "0.012345679104328156", PLAIN).len(), 1);
  }

  #[test]
  fn test_match_ranges_use_query_as_typed() {
    assert_eq!(match_ranges("The Fox ran", "fox"), vec![4..7]);
    assert_eq!(match_ranges("The fox ran", "fox "), vec![4..8]);
    assert!(match_ranges("The fox", "fox ").is_empty());
    assert!(match_ranges("The fox", "   ").is_empty());
    assert_eq!(match_ranges("aXa xa", "xA"), vec![1..3, 4..6]);
  }

  #[test]
  fn test_match_ranges_agree_with_filter() {
    let records = vec![Record::new("r", "The fox", vec![])];
    for query in ["fox", "fox ", " the", "FOX"] {
      let matched = !filter_records(&records, query, PLAIN).is_empty();
      assert_eq!(!match_ranges("The fox", query).is_empty(), matched, "query {query:?}");
    }
  }

  #[test]
  fn test_filter_preserves_page_order() {
    let records = sample_records();
    assert_eq!(filter_indices(&records, "r", PLAIN), vec![0, 1, 2]);
  }
}
