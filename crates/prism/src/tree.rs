//! Collapsible tree rendering of record metadata.
//!
//! The tree is flattened into [`TreeLine`]s, each a sequence of typed tokens so
//! a front end can colour keys, strings, numbers and punctuation differently.
//! Containers nested at or below `collapse_depth` start collapsed and long
//! strings are shortened to `truncate_after` characters. Both defaults can be
//! flipped per node with [`MetadataTree::toggle`]. Type annotations and
//! container sizes are never emitted.

use std::collections::HashSet;

use crate::model::MetadataValue;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathSegment {
  Key(String),
  Index(usize),
}

/// Location of a node from the root value.
pub type NodePath = Vec<PathSegment>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
  Key,
  String,
  Number,
  Bool,
  Null,
  Punctuation,
  Ellipsis,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
  pub kind: TokenKind,
  pub text: String,
}

impl Token {
  fn new(kind: TokenKind, text: impl Into<String>) -> Self {
    Self { kind, text: text.into() }
  }
}

/// What toggling a line would change, and its current state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Toggle {
  Collapsed,
  Expanded,
  Truncated,
  Revealed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeLine {
  pub depth: usize,
  pub path: NodePath,
  pub tokens: Vec<Token>,
  pub toggle: Option<Toggle>,
}

impl TreeLine {
  pub fn text(&self) -> String {
    self.tokens.iter().map(|t| t.text.as_str()).collect()
  }

  /// Text indented two spaces per level.
  pub fn indented(&self) -> String {
    format!("{}{}", "  ".repeat(self.depth), self.text())
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TreeOptions {
  pub collapse_depth: usize,
  pub truncate_after: usize,
}

impl Default for TreeOptions {
  fn default() -> Self {
    Self { collapse_depth: 1, truncate_after: 60 }
  }
}

impl TreeOptions {
  /// Nothing collapsed, nothing shortened.
  pub fn expanded() -> Self {
    Self { collapse_depth: usize::MAX, truncate_after: usize::MAX }
  }
}

/// Expansion state of one metadata tree.
#[derive(Debug, Clone, Default)]
pub struct MetadataTree {
  options: TreeOptions,
  toggled: HashSet<NodePath>,
}

impl MetadataTree {
  pub fn new(options: TreeOptions) -> Self {
    Self { options, toggled: HashSet::new() }
  }

  pub fn options(&self) -> TreeOptions {
    self.options
  }

  /// Flip the node at `path` away from (or back to) its default state.
  pub fn toggle(&mut self, path: &NodePath) {
    if !self.toggled.remove(path) {
      self.toggled.insert(path.clone());
    }
  }

  pub fn lines(&self, value: &MetadataValue) -> Vec<TreeLine> {
    let mut lines = Vec::new();
    self.render_value(value, Vec::new(), Vec::new(), 0, &mut lines);
    lines
  }

  fn is_collapsed(&self, path: &NodePath, depth: usize) -> bool {
    (depth >= self.options.collapse_depth) != self.toggled.contains(path)
  }

  fn is_revealed(&self, path: &NodePath) -> bool {
    self.toggled.contains(path)
  }

  fn render_value(
    &self,
    value: &MetadataValue,
    label: Vec<Token>,
    path: NodePath,
    depth: usize,
    out: &mut Vec<TreeLine>,
  ) {
    match value {
      MetadataValue::List(items) => {
        let children = items
          .iter()
          .enumerate()
          .map(|(index, item)| (index_label(index), PathSegment::Index(index), item))
          .collect();
        self.render_container(("[", "]"), children, label, path, depth, out);
      }
      MetadataValue::Map(entries) => {
        let children = entries
          .iter()
          .map(|(key, item)| (key_label(key), PathSegment::Key(key.clone()), item))
          .collect();
        self.render_container(("{", "}"), children, label, path, depth, out);
      }
      scalar => {
        let (mut tokens, toggle) = self.scalar_tokens(scalar, &path);
        let mut line_tokens = label;
        line_tokens.append(&mut tokens);
        out.push(TreeLine { depth, path, tokens: line_tokens, toggle });
      }
    }
  }

  fn render_container(
    &self,
    (open, close): (&str, &str),
    children: Vec<(Vec<Token>, PathSegment, &MetadataValue)>,
    mut label: Vec<Token>,
    path: NodePath,
    depth: usize,
    out: &mut Vec<TreeLine>,
  ) {
    if children.is_empty() {
      label.push(Token::new(TokenKind::Punctuation, format!("{open}{close}")));
      out.push(TreeLine { depth, path, tokens: label, toggle: None });
      return;
    }

    if self.is_collapsed(&path, depth) {
      label.push(Token::new(TokenKind::Punctuation, open));
      label.push(Token::new(TokenKind::Ellipsis, "..."));
      label.push(Token::new(TokenKind::Punctuation, close));
      out.push(TreeLine { depth, path, tokens: label, toggle: Some(Toggle::Collapsed) });
      return;
    }

    label.push(Token::new(TokenKind::Punctuation, open));
    out.push(TreeLine { depth, path: path.clone(), tokens: label, toggle: Some(Toggle::Expanded) });

    for (child_label, segment, child) in children {
      let mut child_path = path.clone();
      child_path.push(segment);
      self.render_value(child, child_label, child_path, depth + 1, out);
    }

    out.push(TreeLine {
      depth,
      path,
      tokens: vec![Token::new(TokenKind::Punctuation, close)],
      toggle: None,
    });
  }

  fn scalar_tokens(&self, value: &MetadataValue, path: &NodePath) -> (Vec<Token>, Option<Toggle>) {
    match value {
      MetadataValue::Null => (vec![Token::new(TokenKind::Null, "null")], None),
      MetadataValue::Bool(b) => (vec![Token::new(TokenKind::Bool, b.to_string())], None),
      MetadataValue::Number(n) => (vec![Token::new(TokenKind::Number, n.to_string())], None),
      MetadataValue::String(s) => self.string_tokens(s, path),
      // Containers never reach here.
      MetadataValue::List(_) | MetadataValue::Map(_) => (Vec::new(), None),
    }
  }

  fn string_tokens(&self, s: &str, path: &NodePath) -> (Vec<Token>, Option<Toggle>) {
    let limit = self.options.truncate_after;
    if s.chars().count() <= limit {
      return (vec![Token::new(TokenKind::String, format!("\"{}\"", escape(s)))], None);
    }

    if self.is_revealed(path) {
      let tokens = vec![Token::new(TokenKind::String, format!("\"{}\"", escape(s)))];
      return (tokens, Some(Toggle::Revealed));
    }

    let prefix: String = s.chars().take(limit).collect();
    let tokens = vec![
      Token::new(TokenKind::String, format!("\"{}", escape(&prefix))),
      Token::new(TokenKind::Ellipsis, "..."),
      Token::new(TokenKind::String, "\""),
    ];
    (tokens, Some(Toggle::Truncated))
  }
}

fn key_label(key: &str) -> Vec<Token> {
  vec![
    Token::new(TokenKind::Key, format!("\"{}\"", escape(key))),
    Token::new(TokenKind::Punctuation, ": "),
  ]
}

fn index_label(index: usize) -> Vec<Token> {
  vec![Token::new(TokenKind::Key, index.to_string()), Token::new(TokenKind::Punctuation, ": ")]
}

/// JSON string escaping without the surrounding quotes.
fn escape(s: &str) -> String {
  let quoted = serde_json::to_string(s).unwrap_or_default();
  quoted.strip_prefix('"').and_then(|q| q.strip_suffix('"')).unwrap_or(&quoted).to_string()
}

#[cfg(test)]
mod tests {
  use super::*;

  fn value(json: &str) -> MetadataValue {
    serde_json::from_str(json).unwrap()
  }

  fn texts(lines: &[TreeLine]) -> Vec<String> {
    lines.iter().map(|l| l.indented()).collect()
  }

  #[test]
  fn test_first_level_expanded_nested_collapsed() {
    let tree = MetadataTree::new(TreeOptions::default());
    let lines = tree.lines(&value(r#"{"a": 1, "nested": {"b": true}, "tags": ["x"]}"#));

    assert_eq!(
      texts(&lines),
      vec!["{", "  \"a\": 1", "  \"nested\": {...}", "  \"tags\": [...]", "}"]
    );
    assert_eq!(lines[0].toggle, Some(Toggle::Expanded));
    assert_eq!(lines[2].toggle, Some(Toggle::Collapsed));
    assert_eq!(lines[2].path, vec![PathSegment::Key("nested".to_string())]);
  }

  #[test]
  fn test_toggle_expands_and_collapses() {
    let mut tree = MetadataTree::new(TreeOptions::default());
    let metadata = value(r#"{"nested": {"b": true, "c": null}}"#);
    let path = vec![PathSegment::Key("nested".to_string())];

    tree.toggle(&path);
    assert_eq!(
      texts(&tree.lines(&metadata)),
      vec!["{", "  \"nested\": {", "    \"b\": true", "    \"c\": null", "  }", "}"]
    );

    tree.toggle(&path);
    assert_eq!(texts(&tree.lines(&metadata)), vec!["{", "  \"nested\": {...}", "}"]);
  }

  #[test]
  fn test_root_can_be_collapsed() {
    let mut tree = MetadataTree::new(TreeOptions::default());
    tree.toggle(&Vec::new());
    assert_eq!(texts(&tree.lines(&value(r#"{"a": 1}"#))), vec!["{...}"]);
  }

  #[test]
  fn test_long_strings_truncate() {
    let tree = MetadataTree::new(TreeOptions { collapse_depth: 1, truncate_after: 5 });
    let lines = tree.lines(&value(r#"{"s": "abcdefgh", "t": "abcde"}"#));

    assert_eq!(lines[1].text(), "\"s\": \"abcde...\"");
    assert_eq!(lines[1].toggle, Some(Toggle::Truncated));
    assert_eq!(lines[2].text(), "\"t\": \"abcde\"");
    assert_eq!(lines[2].toggle, None);
  }

  #[test]
  fn test_truncated_string_can_be_revealed() {
    let mut tree = MetadataTree::new(TreeOptions { collapse_depth: 1, truncate_after: 3 });
    let metadata = value(r#"{"s": "abcdef"}"#);

    tree.toggle(&vec![PathSegment::Key("s".to_string())]);
    let lines = tree.lines(&metadata);
    assert_eq!(lines[1].text(), "\"s\": \"abcdef\"");
    assert_eq!(lines[1].toggle, Some(Toggle::Revealed));
  }

  #[test]
  fn test_truncation_counts_characters_not_bytes() {
    let tree = MetadataTree::new(TreeOptions { collapse_depth: 1, truncate_after: 2 });
    let lines = tree.lines(&value(r#"["héllo"]"#));
    assert_eq!(lines[1].text(), "0: \"hé...\"");
  }

  #[test]
  fn test_arrays_use_index_labels_and_empty_containers_inline() {
    let tree = MetadataTree::new(TreeOptions::expanded());
    let lines = tree.lines(&value(r#"{"list": [1, "two", {}], "empty": []}"#));

    assert_eq!(
      texts(&lines),
      vec![
        "{",
        "  \"empty\": []",
        "  \"list\": [",
        "    0: 1",
        "    1: \"two\"",
        "    2: {}",
        "  ]",
        "}"
      ]
    );
  }

  #[test]
  fn test_scalar_root() {
    let tree = MetadataTree::new(TreeOptions::default());
    assert_eq!(texts(&tree.lines(&value("42"))), vec!["42"]);
  }

  #[test]
  fn test_no_type_or_size_annotations() {
    let tree = MetadataTree::new(TreeOptions::default());
    let lines = tree.lines(&value(r#"{"n": 1.5, "list": [1, 2, 3]}"#));
    let all = texts(&lines).join("\n");

    assert!(!all.contains("float"));
    assert!(!all.contains("int"));
    assert!(!all.contains("3 items"));
  }

  #[test]
  fn test_token_kinds() {
    let tree = MetadataTree::new(TreeOptions::default());
    let lines = tree.lines(&value(r#"{"k": "v"}"#));
    let kinds: Vec<TokenKind> = lines[1].tokens.iter().map(|t| t.kind).collect();
    assert_eq!(kinds, vec![TokenKind::Key, TokenKind::Punctuation, TokenKind::String]);
  }

  #[test]
  fn test_escaping() {
    let tree = MetadataTree::new(TreeOptions::default());
    let lines = tree.lines(&value(r#"{"q": "say \"hi\""}"#));
    assert_eq!(lines[1].text(), r#""q": "say \"hi\"""#);
  }
}
