//! Text forms of record fields shared by the table, search and row actions.

use crate::model::Record;

/// Shortest text that reads back as `value`. Very small and very large
/// magnitudes switch to exponent form (`1e-7`, `1e+21`).
pub fn format_number(value: f64) -> String {
  let magnitude = value.abs();
  if value != 0.0 && magnitude.is_finite() && !(1e-6..1e21).contains(&magnitude) {
    let text = format!("{value:e}");
    return match text.split_once('e') {
      Some((mantissa, exponent)) if !exponent.starts_with('-') => format!("{mantissa}e+{exponent}"),
      _ => text,
    };
  }
  value.to_string()
}

/// Embedding components joined by `", "`.
pub fn format_embedding(embedding: &[f64]) -> String {
  embedding.iter().map(|value| format_number(*value)).collect::<Vec<_>>().join(", ")
}

pub fn format_distance(distance: Option<f64>) -> String {
  distance.map(format_number).unwrap_or_default()
}

/// Compact JSON of the metadata, empty when the record has none.
pub fn format_metadata(record: &Record) -> String {
  record.metadata.as_ref().map(|m| m.to_json()).unwrap_or_default()
}

pub fn format_document(record: &Record) -> &str {
  record.document.as_deref().unwrap_or_default()
}

/// Title handed to the detail collaborator when a row is opened.
pub fn detail_title(record: &Record) -> String {
  format!("ID: {}", record.id)
}

/// Wrap text to fit within a specified width
///
/// Words longer than the width are split across lines.
pub fn wrap_text(text: &str, width: usize) -> Vec<String> {
  let width = width.max(1);
  let mut lines = Vec::new();

  for paragraph in text.split('\n') {
    if paragraph.trim().is_empty() {
      lines.push(String::new());
      continue;
    }

    let mut current_line = String::new();
    let mut current_len = 0;

    for word in paragraph.split_whitespace() {
      let chars: Vec<char> = word.chars().collect();

      for piece in chars.chunks(width) {
        if current_len == 0 {
          current_line = piece.iter().collect();
          current_len = piece.len();
        } else if current_len + 1 + piece.len() <= width {
          current_line.push(' ');
          current_line.extend(piece);
          current_len += 1 + piece.len();
        } else {
          lines.push(std::mem::take(&mut current_line));
          current_line = piece.iter().collect();
          current_len = piece.len();
        }
      }
    }

    if current_len > 0 {
      lines.push(current_line);
    }
  }

  lines
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_format_embedding() {
    assert_eq!(format_embedding(&[0.1, 0.2, -3.0]), "0.1, 0.2, -3");
    assert_eq!(format_embedding(&[]), "");
  }

  #[test]
  fn test_format_embedding_keeps_source_precision() {
    assert_eq!(
      format_embedding(&[0.012345679104328156, 0.123456789]),
      "0.012345679104328156, 0.123456789"
    );
  }

  #[test]
  fn test_format_number_exponent_forms() {
    assert_eq!(format_number(0.000001), "0.000001");
    assert_eq!(format_number(1e-7), "1e-7");
    assert_eq!(format_number(-2.5e-8), "-2.5e-8");
    assert_eq!(format_number(1e21), "1e+21");
    assert_eq!(format_number(0.0), "0");
  }

  #[test]
  fn test_format_distance() {
    assert_eq!(format_distance(Some(0.4321)), "0.4321");
    assert_eq!(format_distance(None), "");
  }

  #[test]
  fn test_detail_title() {
    let record = Record::new("r1", "doc", vec![]);
    assert_eq!(detail_title(&record), "ID: r1");
  }

  #[test]
  fn test_wrap_text() {
    assert_eq!(wrap_text("one two three", 7), vec!["one two", "three"]);
    assert_eq!(wrap_text("a\n\nb", 10), vec!["a", "", "b"]);
  }

  #[test]
  fn test_wrap_text_splits_long_words() {
    assert_eq!(wrap_text("abcdefgh ij", 3), vec!["abc", "def", "gh", "ij"]);
    assert_eq!(wrap_text("xy", 0), vec!["x", "y"]);
  }
}
