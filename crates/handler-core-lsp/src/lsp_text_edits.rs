//! Minimal helpers for exchanging edits as LSP `TextEdit` / `WorkspaceEdit` structures.
//!
//! This module avoids pulling in a full `lsp-types` dependency. It covers what a handler
//! insertion needs:
//! - converting an insertion plan into a `WorkspaceEdit` for `workspace/applyEdit`
//! - parsing `TextEdit`s back (for hosts that receive edits as JSON)
//! - applying them to plain text

use crate::lsp_sync::{LspCoordinateConverter, LspRange};
use handler_core::{InsertionPlan, LineIndex, TextEdit};
use serde_json::{Value, json};

#[derive(Debug, Clone, PartialEq, Eq)]
/// A minimal representation of an LSP `TextEdit`.
pub struct LspTextEdit {
    /// The range to replace (UTF-16 based line/character positions).
    pub range: LspRange,
    /// Replacement text (may contain newlines).
    pub new_text: String,
}

impl LspTextEdit {
    /// Parse a `TextEdit`-shaped JSON value.
    pub fn from_value(value: &Value) -> Option<Self> {
        let range = LspRange::from_value(value.get("range")?)?;
        let new_text = value
            .get("newText")
            .and_then(Value::as_str)
            .unwrap_or("")
            .to_string();
        Some(Self { range, new_text })
    }

    /// Serialize as a `TextEdit` JSON value.
    pub fn to_value(&self) -> Value {
        json!({ "range": self.range.to_value(), "newText": self.new_text })
    }

    /// Convert a character-offset edit against the document indexed by `line_index`.
    pub fn from_text_edit(line_index: &LineIndex, edit: &TextEdit) -> Self {
        Self {
            range: LspCoordinateConverter::span_to_lsp(line_index, edit.range),
            new_text: edit.text.clone(),
        }
    }

    /// Convert back to a character-offset edit.
    pub fn to_text_edit(&self, line_index: &LineIndex) -> TextEdit {
        TextEdit::replace(
            LspCoordinateConverter::lsp_to_span(line_index, self.range),
            self.new_text.clone(),
        )
    }
}

/// Parse a JSON array of `TextEdit` values.
pub fn text_edits_from_value(value: &Value) -> Vec<LspTextEdit> {
    value
        .as_array()
        .map(|arr| arr.iter().filter_map(LspTextEdit::from_value).collect())
        .unwrap_or_default()
}

/// Convert an insertion plan for the document `text` into LSP edits.
///
/// All ranges refer to the pre-edit document, as LSP requires for edits of one `TextEdit[]`.
pub fn plan_to_text_edits(text: &str, plan: &InsertionPlan) -> Vec<LspTextEdit> {
    let line_index = LineIndex::from_text(text);
    plan.edits()
        .into_iter()
        .map(|edit| LspTextEdit::from_text_edit(&line_index, edit))
        .collect()
}

/// Build a `WorkspaceEdit` (`{ changes: { uri: TextEdit[] } }`) applying `plan` to `uri`.
pub fn plan_to_workspace_edit(uri: &str, text: &str, plan: &InsertionPlan) -> Value {
    let edits = plan_to_text_edits(text, plan)
        .iter()
        .map(LspTextEdit::to_value)
        .collect::<Vec<_>>();
    let mut changes = serde_json::Map::new();
    changes.insert(uri.to_string(), Value::Array(edits));
    json!({ "changes": changes })
}

/// Apply LSP `TextEdit`s (all relative to `text`) and return the new text.
pub fn apply_text_edits(text: &str, edits: &[LspTextEdit]) -> String {
    let line_index = LineIndex::from_text(text);
    let mut resolved = edits
        .iter()
        .map(|edit| edit.to_text_edit(&line_index))
        .collect::<Vec<_>>();

    // Sort descending by start offset so earlier edits don't shift the later ones.
    resolved.sort_by_key(|edit| std::cmp::Reverse(edit.range.start));

    let mut chars = text.chars().collect::<Vec<_>>();
    for edit in resolved {
        let end = edit.range.end.min(chars.len());
        let start = edit.range.start.min(end);
        chars.splice(start..end, edit.text.chars());
    }
    chars.into_iter().collect()
}

/// Extract all `TextEdit`s in a `WorkspaceEdit` for the given `uri`.
///
/// Handles both:
/// - `workspaceEdit.changes[uri]`
/// - `workspaceEdit.documentChanges[]` containing `TextDocumentEdit`
pub fn workspace_edit_text_edits_for_uri(workspace_edit: &Value, uri: &str) -> Vec<LspTextEdit> {
    let mut out = Vec::new();

    if let Some(edits) = workspace_edit
        .get("changes")
        .and_then(|changes| changes.get(uri))
    {
        out.extend(text_edits_from_value(edits));
    }

    let document_changes = workspace_edit
        .get("documentChanges")
        .and_then(Value::as_array)
        .into_iter()
        .flatten();
    for change in document_changes {
        let change_uri = change
            .get("textDocument")
            .and_then(|doc| doc.get("uri"))
            .and_then(Value::as_str);
        if change_uri == Some(uri)
            && let Some(edits) = change.get("edits")
        {
            out.extend(text_edits_from_value(edits));
        }
    }

    out
}
