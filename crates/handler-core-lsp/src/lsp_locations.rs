//! Helpers for normalizing LSP "go to definition" results into [`DefinitionTarget`]s.
//!
//! Servers answer `textDocument/definition` with a `Location`, a `LocationLink`, an array of
//! either, or `null`. The normalized `(uri, range)` pairs still carry UTF-16 positions; converting
//! them to character spans needs the target document's text.

use crate::lsp_sync::{LspCoordinateConverter, LspPosition, LspRange};
use handler_core::{BufferId, DefinitionTarget, LineIndex};
use serde_json::{Value, json};

#[derive(Debug, Clone, PartialEq, Eq)]
/// A normalized LSP location (URI + range).
pub struct LspLocation {
    /// Target document URI (e.g. `file:///...`).
    pub uri: String,
    /// Target range within the document.
    pub range: LspRange,
}

impl LspLocation {
    /// Convert to a [`DefinitionTarget`], using `target_text` (the text of the target document)
    /// to map UTF-16 positions to character offsets.
    pub fn to_definition_target(&self, target_text: &str) -> DefinitionTarget {
        let line_index = LineIndex::from_text(target_text);
        DefinitionTarget::new(
            BufferId::new(self.uri.clone()),
            LspCoordinateConverter::lsp_to_span(&line_index, self.range),
        )
    }
}

fn location_from_value(value: &Value) -> Option<LspLocation> {
    // Location: { uri, range }
    if let (Some(uri), Some(range)) = (
        value.get("uri").and_then(Value::as_str),
        value.get("range").and_then(LspRange::from_value),
    ) {
        return Some(LspLocation {
            uri: uri.to_string(),
            range,
        });
    }

    // LocationLink: the selection range points at the declared name, which is where the member
    // declaration starts.
    let uri = value.get("targetUri").and_then(Value::as_str)?;
    let range = value
        .get("targetSelectionRange")
        .and_then(LspRange::from_value)
        .or_else(|| value.get("targetRange").and_then(LspRange::from_value))?;

    Some(LspLocation {
        uri: uri.to_string(),
        range,
    })
}

/// Normalize a definition result (Location | Location[] | LocationLink | LocationLink[] | null).
pub fn locations_from_value(value: &Value) -> Vec<LspLocation> {
    match value {
        Value::Null => Vec::new(),
        Value::Array(items) => items.iter().filter_map(location_from_value).collect(),
        other => location_from_value(other).into_iter().collect(),
    }
}

/// Build `textDocument/definition` request params for a character offset in `text`.
pub fn definition_params(uri: &str, text: &str, char_offset: usize) -> Value {
    let line_index = LineIndex::from_text(text);
    let LspPosition { line, character } =
        LspCoordinateConverter::char_offset_to_lsp(&line_index, char_offset);
    json!({
        "textDocument": { "uri": uri },
        "position": { "line": line, "character": character },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use handler_core::TextSpan;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_locations_from_location() {
        let v = json!({
            "uri": "file:///types.d.ts",
            "range": { "start": { "line": 1, "character": 2 }, "end": { "line": 1, "character": 9 } }
        });
        let locs = locations_from_value(&v);
        assert_eq!(locs.len(), 1);
        assert_eq!(locs[0].uri, "file:///types.d.ts");
        assert_eq!(locs[0].range.start.line, 1);
    }

    #[test]
    fn test_location_link_prefers_selection_range() {
        let v = json!([{
            "targetUri": "file:///types.d.ts",
            "targetRange": { "start": { "line": 0, "character": 0 }, "end": { "line": 9, "character": 0 } },
            "targetSelectionRange": { "start": { "line": 2, "character": 2 }, "end": { "line": 2, "character": 9 } }
        }]);
        let locs = locations_from_value(&v);
        assert_eq!(locs.len(), 1);
        assert_eq!(locs[0].range.start, LspPosition::new(2, 2));
    }

    #[test]
    fn test_null_result_has_no_locations() {
        assert!(locations_from_value(&Value::Null).is_empty());
        assert!(locations_from_value(&json!({ "unexpected": true })).is_empty());
    }

    #[test]
    fn test_location_to_definition_target() {
        let text = "interface P {\n  // 😀\n  onClick?: () => void;\n}\n";
        let loc = LspLocation {
            uri: "file:///p.ts".to_string(),
            range: LspRange::new(LspPosition::new(2, 2), LspPosition::new(2, 9)),
        };
        let target = loc.to_definition_target(text);
        let start = text.chars().count() - "onClick?: () => void;\n}\n".chars().count();
        assert_eq!(target.buffer, BufferId::new("file:///p.ts"));
        assert_eq!(target.span, TextSpan::new(start, start + 7));
    }

    #[test]
    fn test_definition_params() {
        let params = definition_params("file:///a.tsx", "ab\n😀 onClick", 5);
        assert_eq!(params["position"], json!({ "line": 1, "character": 3 }));
        assert_eq!(params["textDocument"]["uri"], "file:///a.tsx");
    }
}
