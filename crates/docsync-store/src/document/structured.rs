//! Format-preserving YAML document
//!
//! A document keeps two views of one file: the original lines and the
//! parsed `serde_yaml::Value`. Edits go to both. Each edit tries a list of
//! text plans, narrowest first: a splice into block-style lines, then a
//! re-render of only the node holding a flow-style construct. A plan is
//! taken only if the edited lines re-parse to the edited value, and a
//! re-render never replaces lines that carry comments. When no plan holds,
//! the edit is refused with `Uneditable` and the document is unchanged.

use std::path::{Path, PathBuf};

use docsync_core::EntityKind;
use serde_yaml::{Mapping, Value};

use super::layout::{self, NodeRef};
use crate::errors::{io_error, parse_error, render_error, uneditable_error, Result};

/// Line terminator style detected on load
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineEnding {
    Lf,
    CrLf,
}

impl LineEnding {
    fn detect(text: &str) -> Self {
        match text.find('\n') {
            Some(i) if i > 0 && text.as_bytes()[i - 1] == b'\r' => LineEnding::CrLf,
            _ => LineEnding::Lf,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            LineEnding::Lf => "\n",
            LineEnding::CrLf => "\r\n",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentOrigin {
    /// Read from an existing file
    Loaded,
    /// Created in memory during this run
    Created,
}

/// Entity found in a document section
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityEntry {
    pub kind: EntityKind,
    pub index: usize,
    pub name: String,
}

#[derive(Debug, Clone)]
struct TextLayout {
    lines: Vec<String>,
    trailing_newline: bool,
}

struct Splice {
    start: usize,
    end: usize,
    replacement: Vec<String>,
    /// Replaces existing content lines rather than inserting next to them
    rewrite: bool,
}

#[derive(Debug, Clone)]
pub struct StructuredDocument {
    path: PathBuf,
    origin: DocumentOrigin,
    original: String,
    bom: bool,
    line_ending: LineEnding,
    layout: Option<TextLayout>,
    value: Value,
    edited: bool,
}

/// Whether a field value counts as missing: absent, null, `""`, `[]` or `{}`
pub fn is_missing(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.is_empty(),
        Some(Value::Sequence(seq)) => seq.is_empty(),
        Some(Value::Mapping(map)) => map.is_empty(),
        Some(_) => false,
    }
}

impl StructuredDocument {
    /// Parse document text
    ///
    /// # Errors
    ///
    /// Returns `Parse` for invalid YAML or a top-level value that is neither
    /// a mapping nor empty.
    pub fn parse(path: impl Into<PathBuf>, text: &str) -> Result<Self> {
        let path = path.into();
        let (bom, body) = match text.strip_prefix('\u{feff}') {
            Some(rest) => (true, rest),
            None => (false, text),
        };

        let value = if body.lines().all(layout::is_ignorable) {
            Value::Null
        } else {
            serde_yaml::from_str::<Value>(body).map_err(|e| parse_error(&path, e.to_string()))?
        };
        if !(value.is_null() || value.is_mapping()) {
            return Err(parse_error(&path, "top-level value must be a mapping"));
        }

        let line_ending = LineEnding::detect(body);
        let trailing_newline = body.ends_with('\n');
        let mut lines: Vec<String> = body
            .split('\n')
            .map(|l| l.strip_suffix('\r').unwrap_or(l).to_string())
            .collect();
        if trailing_newline || body.is_empty() {
            lines.pop();
        }

        Ok(Self {
            path,
            origin: DocumentOrigin::Loaded,
            original: text.to_string(),
            bom,
            line_ending,
            layout: Some(TextLayout {
                lines,
                trailing_newline,
            }),
            value,
            edited: false,
        })
    }

    /// Read and parse a file
    ///
    /// # Errors
    ///
    /// Returns `NotFound`/`Io` if the file cannot be read, `Parse` otherwise.
    pub fn read(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| io_error("read_document", path, e))?;
        Self::parse(path, &text)
    }

    /// New in-memory document: `version: 2` and an empty `models` section
    pub fn create(path: impl Into<PathBuf>) -> Self {
        let mut root = Mapping::new();
        root.insert(Value::String("version".to_string()), Value::Number(2.into()));
        root.insert(Value::String("models".to_string()), Value::Sequence(Vec::new()));
        Self {
            path: path.into(),
            origin: DocumentOrigin::Created,
            original: String::new(),
            bom: false,
            line_ending: LineEnding::Lf,
            layout: None,
            value: Value::Mapping(root),
            edited: true,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn origin(&self) -> DocumentOrigin {
        self.origin
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn line_ending(&self) -> LineEnding {
        self.line_ending
    }

    /// Document has no content (empty file or YAML null)
    pub fn is_empty(&self) -> bool {
        self.value.is_null()
    }

    /// Whether rendering still splices into the original text
    pub fn preserves_text(&self) -> bool {
        self.layout.is_some()
    }

    /// Whether any edit was applied since load
    pub fn is_edited(&self) -> bool {
        self.edited
    }

    /// Entities with a string `name` in every section, in document order
    pub fn entities(&self) -> Vec<EntityEntry> {
        let mut entries = Vec::new();
        for kind in EntityKind::ALL {
            let Some(Value::Sequence(items)) = self.value.get(kind.section()) else {
                continue;
            };
            for (index, item) in items.iter().enumerate() {
                if let Some(name) = item.get("name").and_then(Value::as_str) {
                    entries.push(EntityEntry {
                        kind,
                        index,
                        name: name.to_string(),
                    });
                }
            }
        }
        entries
    }

    /// Named columns of an entity as `(position, name)`
    pub fn columns(&self, kind: EntityKind, index: usize) -> Vec<(usize, String)> {
        let Some(Value::Sequence(columns)) = self
            .node(NodeRef::entity(kind, index))
            .and_then(|entity| entity.get("columns"))
        else {
            return Vec::new();
        };
        columns
            .iter()
            .enumerate()
            .filter_map(|(i, column)| {
                let name = column.as_mapping()?.get("name")?.as_str()?;
                Some((i, name.to_string()))
            })
            .collect()
    }

    pub fn node(&self, node: NodeRef) -> Option<&Mapping> {
        node_value(&self.value, node)?.as_mapping()
    }

    pub fn field(&self, node: NodeRef, key: &str) -> Option<&Value> {
        self.node(node)?.get(key)
    }

    pub fn is_field_missing(&self, node: NodeRef, key: &str) -> bool {
        is_missing(self.field(node, key))
    }

    /// Set `key` on a node; a new `description` goes right after `name`,
    /// any other new key after the node's last key
    ///
    /// # Errors
    ///
    /// Returns `Internal` if the node does not exist, `Serialization` if the
    /// value cannot be represented as YAML and `Uneditable` if the text
    /// around the node cannot take the edit; the document is unchanged then.
    pub fn set_field(&mut self, node: NodeRef, key: &str, value: &serde_json::Value) -> Result<()> {
        let yaml = to_yaml(&self.path, value)?;
        let mut updated = self.value.clone();
        let Some(mapping) = node_value_mut(&mut updated, node).and_then(Value::as_mapping_mut) else {
            return Err(node_missing(&self.path, node));
        };
        set_mapping_field(mapping, key, yaml.clone());

        let lines = match &self.layout {
            Some(layout) => {
                let plans = set_field_plans(&layout.lines, node, key, &yaml, &updated);
                Some(self.edited_lines(&layout.lines, plans, &updated, key)?)
            }
            None => None,
        };
        self.commit(updated, lines);
        Ok(())
    }

    /// Append an entity to its section, creating the section when absent
    ///
    /// Returns the entity's position within the section.
    ///
    /// # Errors
    ///
    /// Returns `Serialization` if the value cannot be represented as YAML or
    /// the section exists but is not a sequence, and `Uneditable` if the
    /// section's text cannot take the entity.
    pub fn append_entity(&mut self, kind: EntityKind, entity: &serde_json::Value) -> Result<usize> {
        let yaml = to_yaml(&self.path, entity)?;
        let mut updated = self.value.clone();
        let position =
            push_entity(&mut updated, kind, yaml.clone()).map_err(|reason| render_error(&self.path, reason))?;

        let lines = match &self.layout {
            Some(layout) => {
                let plans = vec![
                    plan_append_entity(&layout.lines, kind, &yaml),
                    plan_section_rewrite(&layout.lines, kind, &updated),
                ];
                Some(self.edited_lines(&layout.lines, plans, &updated, kind.section())?)
            }
            None => None,
        };
        self.commit(updated, lines);
        Ok(position)
    }

    /// Current document text
    ///
    /// Unedited documents reproduce the loaded bytes exactly.
    ///
    /// # Errors
    ///
    /// Returns `Serialization` if a re-render from the value fails.
    pub fn render(&self) -> Result<String> {
        if !self.edited {
            return Ok(self.original.clone());
        }
        let newline = self.line_ending.as_str();
        let body = match &self.layout {
            Some(layout) => {
                let mut text = layout.lines.join(newline);
                if layout.trailing_newline {
                    text.push_str(newline);
                }
                text
            }
            None => {
                let text = serde_yaml::to_string(&self.value)
                    .map_err(|e| render_error(&self.path, e.to_string()))?;
                match self.line_ending {
                    LineEnding::Lf => text,
                    LineEnding::CrLf => text.replace('\n', "\r\n"),
                }
            }
        };
        Ok(if self.bom {
            format!("\u{feff}{}", body)
        } else {
            body
        })
    }

    /// Lines after the first plan whose result re-parses to `updated`
    fn edited_lines(
        &self,
        lines: &[String],
        plans: Vec<Option<Splice>>,
        updated: &Value,
        what: &str,
    ) -> Result<Vec<String>> {
        for splice in plans.into_iter().flatten() {
            let rewrite = splice.rewrite;
            let mut candidate = lines.to_vec();
            candidate.splice(splice.start..splice.end, splice.replacement);
            if !reparses_to(&candidate, updated) {
                continue;
            }
            if rewrite {
                tracing::debug!(
                    path = %self.path.display(),
                    what,
                    "re-rendered the flow-style node around the edit"
                );
            }
            return Ok(candidate);
        }

        tracing::warn!(
            path = %self.path.display(),
            what,
            "edit refused; the document cannot take it without disturbing other lines"
        );
        Err(uneditable_error(
            &self.path,
            format!("'{}' cannot be edited without disturbing other lines", what),
        ))
    }

    fn commit(&mut self, value: Value, lines: Option<Vec<String>>) {
        if let (Some(layout), Some(lines)) = (self.layout.as_mut(), lines) {
            if layout.lines.is_empty() {
                layout.trailing_newline = true;
            }
            layout.lines = lines;
        }
        self.value = value;
        self.edited = true;
    }
}

fn reparses_to(lines: &[String], expected: &Value) -> bool {
    serde_yaml::from_str::<Value>(&lines.join("\n")).is_ok_and(|parsed| parsed == *expected)
}

fn node_value(root: &Value, node: NodeRef) -> Option<&Value> {
    let entity = root
        .get(node.kind().section())?
        .as_sequence()?
        .get(node.entity_index())?;
    match node {
        NodeRef::Entity { .. } => Some(entity),
        NodeRef::Column { column, .. } => entity.get("columns")?.as_sequence()?.get(column),
    }
}

fn node_value_mut(root: &mut Value, node: NodeRef) -> Option<&mut Value> {
    let entity = root
        .get_mut(node.kind().section())?
        .as_sequence_mut()?
        .get_mut(node.entity_index())?;
    match node {
        NodeRef::Entity { .. } => Some(entity),
        NodeRef::Column { column, .. } => entity
            .get_mut("columns")?
            .as_sequence_mut()?
            .get_mut(column),
    }
}

/// Push `entity` onto its section of `root`; returns its position
fn push_entity(root: &mut Value, kind: EntityKind, entity: Value) -> std::result::Result<usize, String> {
    if root.is_null() {
        *root = Value::Mapping(Mapping::new());
    }
    let Some(mapping) = root.as_mapping_mut() else {
        return Err("top-level value is not a mapping".to_string());
    };
    let slot = mapping
        .entry(Value::String(kind.section().to_string()))
        .or_insert(Value::Null);
    if slot.is_null() {
        *slot = Value::Sequence(Vec::new());
    }
    let Value::Sequence(items) = slot else {
        return Err(format!("section '{}' is not a sequence", kind.section()));
    };
    items.push(entity);
    Ok(items.len() - 1)
}

fn to_yaml(path: &Path, value: &serde_json::Value) -> Result<Value> {
    serde_yaml::to_value(value).map_err(|e| render_error(path, e.to_string()))
}

fn node_missing(path: &Path, node: NodeRef) -> docsync_core::ExError {
    docsync_core::ExError::new(docsync_core::ExErrorKind::Internal)
        .with_op("set_field")
        .with_path(path.display().to_string())
        .with_message(format!("node {:?} not found", node))
}

fn set_mapping_field(mapping: &mut Mapping, key: &str, value: Value) {
    if let Some(slot) = mapping.get_mut(key) {
        *slot = value;
        return;
    }
    let key = Value::String(key.to_string());
    if key.as_str() == Some("description") && mapping.contains_key("name") {
        let previous = std::mem::take(mapping);
        let mut pending = Some(value);
        for (k, v) in previous {
            let after_name = k.as_str() == Some("name");
            mapping.insert(k, v);
            if after_name {
                if let Some(value) = pending.take() {
                    mapping.insert(key.clone(), value);
                }
            }
        }
    } else {
        mapping.insert(key, value);
    }
}

fn yaml_lines(value: &impl serde::Serialize) -> Option<Vec<String>> {
    let text = serde_yaml::to_string(value).ok()?;
    Some(text.lines().map(str::to_string).collect())
}

fn indent_lines(lines: &[String], indent: usize) -> Vec<String> {
    let pad = " ".repeat(indent);
    lines
        .iter()
        .map(|l| {
            if l.is_empty() {
                String::new()
            } else {
                format!("{}{}", pad, l)
            }
        })
        .collect()
}

fn plan_set_field(lines: &[String], node: NodeRef, key: &str, value: &Value) -> Option<Splice> {
    let item = layout::locate(lines, node)?;
    let mut entry = Mapping::new();
    entry.insert(Value::String(key.to_string()), value.clone());
    let rendered = yaml_lines(&entry)?;

    if let Some(existing) = item.key(key) {
        if layout::key_block_end(lines, existing, item.key_indent, item.end) != existing.line + 1 {
            return None;
        }
        let line = &lines[existing.line];
        let comment = layout::empty_inline(&line[existing.value_offset..])?;
        let mut replacement = indent_lines(&rendered, item.key_indent);
        if let Some(first) = replacement.first_mut() {
            *first = format!("{}{}", &line[..existing.col], &first[item.key_indent..]);
            if !comment.trim().is_empty() {
                first.push_str(comment);
            }
        }
        return Some(Splice {
            start: existing.line,
            end: existing.line + 1,
            replacement,
            rewrite: false,
        });
    }

    let at = match (key, item.key("name")) {
        ("description", Some(name)) => layout::key_block_end(lines, name, item.key_indent, item.end),
        _ => item.end,
    };
    Some(Splice {
        start: at,
        end: at,
        replacement: indent_lines(&rendered, item.key_indent),
        rewrite: false,
    })
}

fn plan_append_entity(lines: &[String], kind: EntityKind, entity: &Value) -> Option<Splice> {
    let rendered = yaml_lines(&vec![entity.clone()])?;
    let section = kind.section();

    let Some((line, value_offset, end)) = layout::section(lines, section) else {
        let mut replacement = vec![format!("{}:", section)];
        replacement.extend(indent_lines(&rendered, 2));
        return Some(Splice {
            start: lines.len(),
            end: lines.len(),
            replacement,
            rewrite: false,
        });
    };

    let (items, dash) = layout::seq_items(lines, line, end)?;
    let inline = &lines[line][value_offset..];
    if items.is_empty() {
        let comment = layout::empty_inline(inline)?;
        let mut replacement = vec![format!("{}{}", &lines[line][..value_offset], comment)];
        replacement.extend(indent_lines(&rendered, 2));
        return Some(Splice {
            start: line,
            end: line + 1,
            replacement,
            rewrite: false,
        });
    }

    let trimmed = inline.trim();
    if !(trimmed.is_empty() || trimmed.starts_with('#')) {
        return None;
    }
    Some(Splice {
        start: end,
        end,
        replacement: indent_lines(&rendered, dash),
        rewrite: false,
    })
}

/// Plans for `set_field`: splice first, then re-render the edited item, then
/// the flow-style container the item sits in
fn set_field_plans(
    lines: &[String],
    node: NodeRef,
    key: &str,
    value: &Value,
    updated: &Value,
) -> Vec<Option<Splice>> {
    let mut plans = vec![
        plan_set_field(lines, node, key, value),
        plan_item_rewrite(lines, node, updated, false),
    ];
    if let NodeRef::Column { kind, index, .. } = node {
        let entity = NodeRef::entity(kind, index);
        plans.push(plan_columns_rewrite(lines, entity, updated));
        plans.push(plan_item_rewrite(lines, entity, updated, true));
    }
    plans.push(plan_section_rewrite(lines, node.kind(), updated));
    plans
}

/// Replace `lines[start..end]` with `value` rendered at `indent`, unless a
/// comment lives there
fn plan_rewrite(
    lines: &[String],
    start: usize,
    end: usize,
    indent: usize,
    value: &impl serde::Serialize,
) -> Option<Splice> {
    if lines.get(start..end)?.iter().any(|l| layout::has_comment(l)) {
        return None;
    }
    let rendered = yaml_lines(value)?;
    Some(Splice {
        start,
        end,
        replacement: indent_lines(&rendered, indent),
        rewrite: true,
    })
}

fn single_entry(key: &str, value: &Value) -> Mapping {
    let mut entry = Mapping::new();
    entry.insert(Value::String(key.to_string()), value.clone());
    entry
}

/// Re-render the sequence item of `node` in block style at its dash indent
fn plan_item_rewrite(lines: &[String], node: NodeRef, updated: &Value, flow_only: bool) -> Option<Splice> {
    let (start, end, dash) = layout::item_range(lines, node)?;
    if flow_only && !layout::is_flow_item(&lines[start], dash) {
        return None;
    }
    let item = node_value(updated, node)?;
    plan_rewrite(lines, start, end, dash, &vec![item])
}

/// Re-render an entity's `columns:` block when its value is a flow collection
fn plan_columns_rewrite(lines: &[String], entity: NodeRef, updated: &Value) -> Option<Splice> {
    let item = layout::locate(lines, entity)?;
    let columns = item.key("columns")?;
    if columns.line == item.line || !layout::is_flow_value(&lines[columns.line][columns.value_offset..]) {
        return None;
    }
    let end = layout::key_block_end(lines, columns, item.key_indent, item.end);
    let value = node_value(updated, entity)?.get("columns")?;
    plan_rewrite(lines, columns.line, end, item.key_indent, &single_entry("columns", value))
}

/// Re-render a top-level section when its value is a flow collection
fn plan_section_rewrite(lines: &[String], kind: EntityKind, updated: &Value) -> Option<Splice> {
    let (line, value_offset, end) = layout::section(lines, kind.section())?;
    if !layout::is_flow_value(&lines[line][value_offset..]) {
        return None;
    }
    let value = updated.get(kind.section())?;
    plan_rewrite(lines, line, end, 0, &single_entry(kind.section(), value))
}
