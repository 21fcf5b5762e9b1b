//! Line-level view of block-style YAML
//!
//! Locates sections, sequence items and keys by indentation so that edits
//! can be spliced into the original text. Anything outside plain block
//! style (flow collections, complex keys) is reported as unsupported by
//! returning `None`; the caller then falls back to re-rendering the one
//! node that holds the construct, or refuses the edit.

use docsync_core::EntityKind;

/// Scalars that parse to an empty/missing value when written inline
const EMPTY_INLINE_TOKENS: [&str; 9] = ["\"\"", "''", "null", "Null", "NULL", "~", "[]", "{}", ""];

/// Address of a mapping node inside a document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeRef {
    /// `<section>[index]`
    Entity { kind: EntityKind, index: usize },
    /// `<section>[index].columns[column]`
    Column {
        kind: EntityKind,
        index: usize,
        column: usize,
    },
}

impl NodeRef {
    pub fn entity(kind: EntityKind, index: usize) -> Self {
        NodeRef::Entity { kind, index }
    }

    pub fn column(kind: EntityKind, index: usize, column: usize) -> Self {
        NodeRef::Column {
            kind,
            index,
            column,
        }
    }

    pub fn kind(&self) -> EntityKind {
        match self {
            NodeRef::Entity { kind, .. } | NodeRef::Column { kind, .. } => *kind,
        }
    }

    pub fn entity_index(&self) -> usize {
        match self {
            NodeRef::Entity { index, .. } | NodeRef::Column { index, .. } => *index,
        }
    }
}

/// A `key:` line
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct KeyLine {
    pub line: usize,
    /// Byte column where the key starts
    pub col: usize,
    pub key: String,
    /// Byte offset just past the `:`
    pub value_offset: usize,
}

/// Mapping item of a block sequence
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ItemSpan {
    pub line: usize,
    /// Exclusive; one past the item's last content line
    pub end: usize,
    pub key_indent: usize,
    pub keys: Vec<KeyLine>,
}

impl ItemSpan {
    pub fn key(&self, key: &str) -> Option<&KeyLine> {
        self.keys.iter().find(|k| k.key == key)
    }
}

pub(crate) fn indent_of(line: &str) -> usize {
    line.len() - line.trim_start_matches(' ').len()
}

/// Blank, comment-only, or a document marker
pub(crate) fn is_ignorable(line: &str) -> bool {
    let trimmed = line.trim();
    trimmed.is_empty() || trimmed.starts_with('#') || trimmed == "---" || trimmed == "..."
}

/// Line carries a comment, conservatively: `#` after a space anywhere counts
pub(crate) fn has_comment(line: &str) -> bool {
    line.trim_start().starts_with('#') || line.contains(" #") || line.contains("\t#")
}

/// Inline value text opens a flow collection
pub(crate) fn is_flow_value(rest: &str) -> bool {
    let value = rest.trim_start();
    value.starts_with('[') || value.starts_with('{')
}

/// Sequence entry at `dash` whose item is written as a flow collection
pub(crate) fn is_flow_item(line: &str, dash: usize) -> bool {
    line.get(dash + 1..).is_some_and(is_flow_value)
}

fn is_seq_entry(line: &str, indent: usize) -> bool {
    let content = &line[indent..];
    content == "-" || content.starts_with("- ")
}

/// Split `content` into a key and the byte offset just past its `:`
pub(crate) fn parse_key(content: &str) -> Option<(String, usize)> {
    let first = content.chars().next()?;
    if first == '"' || first == '\'' {
        let close = content[1..].find(first)? + 1;
        let rest = &content[close + 1..];
        let after_colon = rest.strip_prefix(':')?;
        if after_colon.is_empty() || after_colon.starts_with(' ') {
            return Some((content[1..close].to_string(), close + 2));
        }
        return None;
    }
    if matches!(
        first,
        '-' | '[' | '{' | '#' | '?' | '&' | '*' | '!' | '|' | '>' | '%' | '@' | '`'
    ) {
        return None;
    }

    let bytes = content.as_bytes();
    for (i, b) in bytes.iter().enumerate() {
        match b {
            b':' if i + 1 == bytes.len() || bytes[i + 1] == b' ' => {
                return Some((content[..i].trim_end().to_string(), i + 1));
            }
            b'#' if i > 0 && bytes[i - 1] == b' ' => return None,
            _ => {}
        }
    }
    None
}

/// If the inline text after a `:` is an empty value, return the trailing
/// comment (with its leading whitespace), which may itself be empty
pub(crate) fn empty_inline(rest: &str) -> Option<&str> {
    let value = rest.trim_start();
    EMPTY_INLINE_TOKENS.iter().find_map(|token| {
        let after = value.strip_prefix(token)?;
        let tail = after.trim();
        if tail.is_empty() || (tail.starts_with('#') && (after.starts_with(' ') || token.is_empty())) {
            Some(if token.is_empty() { rest } else { after })
        } else {
            None
        }
    })
}

/// Inline text introduces a nested block (nothing but an optional comment)
fn opens_block(rest: &str) -> bool {
    let trimmed = rest.trim();
    trimmed.is_empty() || trimmed.starts_with('#')
}

/// One past the last content line owned by the line at `start`
///
/// Lines belong to the block while they are more indented than `indent`;
/// with `compact_seq`, `- ` entries at exactly `indent` belong too.
pub(crate) fn block_end(
    lines: &[String],
    start: usize,
    indent: usize,
    compact_seq: bool,
    limit: usize,
) -> usize {
    let mut end = start + 1;
    for (i, line) in lines.iter().enumerate().take(limit).skip(start + 1) {
        if is_ignorable(line) {
            continue;
        }
        let line_indent = indent_of(line);
        if line_indent > indent || (compact_seq && line_indent == indent && is_seq_entry(line, line_indent)) {
            end = i + 1;
        } else {
            break;
        }
    }
    end
}

/// Line of a top-level key
pub(crate) fn top_key(lines: &[String], key: &str) -> Option<usize> {
    lines.iter().position(|line| {
        !is_ignorable(line)
            && indent_of(line) == 0
            && parse_key(line).is_some_and(|(k, _)| k == key)
    })
}

/// Extent of a top-level section: `(key line, value offset, block end)`
pub(crate) fn section(lines: &[String], key: &str) -> Option<(usize, usize, usize)> {
    let line = top_key(lines, key)?;
    let (_, value_offset) = parse_key(&lines[line])?;
    let end = block_end(lines, line, 0, true, lines.len());
    Some((line, value_offset, end))
}

/// Entry lines of the block sequence owned by `(start, end)` and their dash indent
pub(crate) fn seq_items(lines: &[String], start: usize, end: usize) -> Option<(Vec<usize>, usize)> {
    let content: Vec<usize> = (start + 1..end).filter(|&i| !is_ignorable(&lines[i])).collect();
    let Some(&first) = content.first() else {
        return Some((Vec::new(), 0));
    };
    let dash = indent_of(&lines[first]);
    if !is_seq_entry(&lines[first], dash) {
        return None;
    }
    let mut items = Vec::new();
    for i in content {
        let indent = indent_of(&lines[i]);
        if indent < dash {
            return None;
        }
        if indent == dash {
            if !is_seq_entry(&lines[i], indent) {
                return None;
            }
            items.push(i);
        }
    }
    Some((items, dash))
}

/// Layout of the mapping item starting at `line`
pub(crate) fn item_span(lines: &[String], line: usize, dash: usize, limit: usize) -> Option<ItemSpan> {
    let end = block_end(lines, line, dash, false, limit);
    let after_dash = &lines[line][dash + 1..];
    let inline = after_dash.trim_start_matches(' ');

    let key_indent = if inline.is_empty() || inline.starts_with('#') {
        (line + 1..end)
            .find(|&i| !is_ignorable(&lines[i]))
            .map(|i| indent_of(&lines[i]))?
    } else {
        dash + 1 + (after_dash.len() - inline.len())
    };

    let mut keys = Vec::new();
    if !inline.is_empty() && !inline.starts_with('#') {
        let (key, offset) = parse_key(inline)?;
        keys.push(KeyLine {
            line,
            col: key_indent,
            key,
            value_offset: key_indent + offset,
        });
    }

    for i in line + 1..end {
        let text = &lines[i];
        // compact sequence entries at key indent belong to the previous key
        if is_ignorable(text) || indent_of(text) != key_indent || is_seq_entry(text, key_indent) {
            continue;
        }
        let (key, offset) = parse_key(&text[key_indent..])?;
        keys.push(KeyLine {
            line: i,
            col: key_indent,
            key,
            value_offset: key_indent + offset,
        });
    }

    Some(ItemSpan {
        line,
        end,
        key_indent,
        keys,
    })
}

/// One past the last content line of a key's value
pub(crate) fn key_block_end(lines: &[String], key: &KeyLine, key_indent: usize, limit: usize) -> usize {
    let compact = opens_block(&lines[key.line][key.value_offset..]);
    block_end(lines, key.line, key_indent, compact, limit)
}

/// Entry line, item limit and dash indent of the `index`-th item of a section
fn entity_entry(lines: &[String], kind: EntityKind, index: usize) -> Option<(usize, usize, usize)> {
    let (start, _, end) = section(lines, kind.section())?;
    let (items, dash) = seq_items(lines, start, end)?;
    let line = *items.get(index)?;
    let limit = items.get(index + 1).copied().unwrap_or(end);
    Some((line, limit, dash))
}

/// Entry line, item limit and dash indent of a column item of `entity`
fn column_entry(lines: &[String], entity: &ItemSpan, column: usize) -> Option<(usize, usize, usize)> {
    let columns_key = entity.key("columns")?;
    let columns_end = key_block_end(lines, columns_key, entity.key_indent, entity.end);
    let (items, dash) = seq_items(lines, columns_key.line, columns_end)?;
    let line = *items.get(column)?;
    let limit = items.get(column + 1).copied().unwrap_or(columns_end);
    Some((line, limit, dash))
}

/// Locate the mapping item addressed by `node`
pub(crate) fn locate(lines: &[String], node: NodeRef) -> Option<ItemSpan> {
    let (line, limit, dash) = entity_entry(lines, node.kind(), node.entity_index())?;
    let entity = item_span(lines, line, dash, limit)?;

    match node {
        NodeRef::Entity { .. } => Some(entity),
        NodeRef::Column { column, .. } => {
            let (line, limit, dash) = column_entry(lines, &entity, column)?;
            item_span(lines, line, dash, limit)
        }
    }
}

/// Line range and dash indent of the sequence item addressed by `node`
///
/// Unlike [`locate`] the item itself may be in any style; only the path to
/// it has to be block style.
pub(crate) fn item_range(lines: &[String], node: NodeRef) -> Option<(usize, usize, usize)> {
    let (line, limit, dash) = entity_entry(lines, node.kind(), node.entity_index())?;
    let (line, limit, dash) = match node {
        NodeRef::Entity { .. } => (line, limit, dash),
        NodeRef::Column { column, .. } => {
            let entity = item_span(lines, line, dash, limit)?;
            column_entry(lines, &entity, column)?
        }
    };
    Some((line, block_end(lines, line, dash, false, limit), dash))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(text: &str) -> Vec<String> {
        text.lines().map(str::to_string).collect()
    }

    const DOC: &str = "\
version: 2

models:
  # staging layer
  - name: stg_customers
    description: Staged customers
    columns:
      - name: customer_id
        tests:
          - unique
      - name: email

  - name: stg_orders
";

    #[test]
    fn test_parse_keys() {
        assert_eq!(parse_key("name: x"), Some(("name".to_string(), 5)));
        assert_eq!(parse_key("columns:"), Some(("columns".to_string(), 8)));
        assert_eq!(parse_key("\"odd key\": 1"), Some(("odd key".to_string(), 10)));
        assert_eq!(parse_key("url: http://x"), Some(("url".to_string(), 4)));
        assert_eq!(parse_key("- name: x"), None);
        assert_eq!(parse_key("plain scalar"), None);
    }

    #[test]
    fn test_empty_inline_values() {
        assert_eq!(empty_inline(""), Some(""));
        assert_eq!(empty_inline(" \"\""), Some(""));
        assert_eq!(empty_inline(" []  # fill me"), Some("  # fill me"));
        assert_eq!(empty_inline("  # fill me"), Some("  # fill me"));
        assert_eq!(empty_inline(" ~"), Some(""));
        assert_eq!(empty_inline(" nullable"), None);
        assert_eq!(empty_inline(" Some text"), None);
    }

    #[test]
    fn test_locate_entities_and_columns() {
        let lines = lines(DOC);

        let first = locate(&lines, NodeRef::entity(EntityKind::Model, 0)).unwrap();
        assert_eq!(first.line, 4);
        assert_eq!(first.key_indent, 4);
        let names: Vec<&str> = first.keys.iter().map(|k| k.key.as_str()).collect();
        assert_eq!(names, ["name", "description", "columns"]);
        assert_eq!(first.end, 11);

        let second = locate(&lines, NodeRef::entity(EntityKind::Model, 1)).unwrap();
        assert_eq!(second.line, 12);

        let column = locate(&lines, NodeRef::column(EntityKind::Model, 0, 0)).unwrap();
        assert_eq!(column.line, 7);
        assert_eq!(column.key_indent, 8);
        assert_eq!(column.end, 10);
        assert!(column.key("tests").is_some());

        assert!(locate(&lines, NodeRef::column(EntityKind::Model, 1, 0)).is_none());
        assert!(locate(&lines, NodeRef::entity(EntityKind::Source, 0)).is_none());
    }

    #[test]
    fn test_compact_sequences_at_key_indent() {
        let lines = lines("models:\n- name: a\n  tests:\n  - unique\n  description: x\n- name: b\n");
        let item = locate(&lines, NodeRef::entity(EntityKind::Model, 0)).unwrap();
        let names: Vec<&str> = item.keys.iter().map(|k| k.key.as_str()).collect();
        assert_eq!(names, ["name", "tests", "description"]);
        assert_eq!(item.end, 5);

        let tests = item.key("tests").unwrap();
        assert_eq!(key_block_end(&lines, tests, item.key_indent, item.end), 4);
    }

    #[test]
    fn test_flow_items_are_unsupported() {
        let lines = lines("models:\n  - {name: a, description: b}\n");
        assert!(locate(&lines, NodeRef::entity(EntityKind::Model, 0)).is_none());
    }

    #[test]
    fn test_item_range_covers_flow_items() {
        let lines = lines(
            "models:\n  - name: a\n    columns:\n      - {name: id,\n         tests: [unique]}\n      - name: email\n",
        );
        assert_eq!(
            item_range(&lines, NodeRef::column(EntityKind::Model, 0, 0)),
            Some((3, 5, 6))
        );
        assert_eq!(
            item_range(&lines, NodeRef::column(EntityKind::Model, 0, 1)),
            Some((5, 6, 6))
        );
        assert_eq!(
            item_range(&lines, NodeRef::entity(EntityKind::Model, 0)),
            Some((1, 6, 2))
        );
        assert!(is_flow_item(&lines[3], 6));
        assert!(!is_flow_item(&lines[5], 6));
    }

    #[test]
    fn test_comment_detection() {
        assert!(has_comment("  # note"));
        assert!(has_comment("  - name: a  # note"));
        assert!(!has_comment("  - {name: a}"));
        assert!(!has_comment("    url: http://x/#anchor"));
    }

    #[test]
    fn test_dash_on_its_own_line() {
        let lines = lines("models:\n  -\n    name: a\n    description: b\n");
        let item = locate(&lines, NodeRef::entity(EntityKind::Model, 0)).unwrap();
        assert_eq!(item.key_indent, 4);
        assert_eq!(item.keys.len(), 2);
    }
}
