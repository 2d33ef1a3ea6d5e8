//! Editor command arguments.
//!
//! Editor extensions start an insertion through a command (`workspace/executeCommand` or an
//! extension-local command) whose single argument looks like:
//!
//! ```json
//! {
//!   "textDocument": { "uri": "file:///src/App.tsx" },
//!   "range": { "start": { "line": 4, "character": 19 }, "end": { "line": 4, "character": 20 } },
//!   "eventName": "onClick",
//!   "mode": "direct",
//!   "bindObject": "this."
//! }
//! ```
//!
//! `range` is the trigger span; `mode` and `bindObject` are optional.

use crate::lsp_sync::{LspCoordinateConverter, LspRange};
use handler_core::{BufferId, CursorTrigger, InsertionMode, LineIndex};
use serde_json::Value;

/// Why command arguments could not be turned into a trigger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    /// A required field is missing or has the wrong type.
    MissingField(&'static str),
    /// `mode` is not one of `direct`, `interactive`, `completion`.
    UnknownMode(String),
}

impl std::fmt::Display for CommandError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingField(field) => write!(f, "missing or invalid field `{field}`"),
            Self::UnknownMode(mode) => write!(f, "unknown insertion mode `{mode}`"),
        }
    }
}

impl std::error::Error for CommandError {}

/// Parse an insertion mode name.
pub fn parse_mode(name: &str) -> Result<InsertionMode, CommandError> {
    match name {
        "direct" => Ok(InsertionMode::Direct),
        "interactive" => Ok(InsertionMode::Interactive),
        "completion" => Ok(InsertionMode::Completion),
        other => Err(CommandError::UnknownMode(other.to_string())),
    }
}

/// Build a [`CursorTrigger`] from command arguments, given the text of the target document.
pub fn trigger_from_command(args: &Value, document_text: &str) -> Result<CursorTrigger, CommandError> {
    let uri = args
        .get("textDocument")
        .and_then(|doc| doc.get("uri"))
        .and_then(Value::as_str)
        .ok_or(CommandError::MissingField("textDocument.uri"))?;
    let range = args
        .get("range")
        .and_then(LspRange::from_value)
        .ok_or(CommandError::MissingField("range"))?;
    let event_name = args
        .get("eventName")
        .and_then(Value::as_str)
        .ok_or(CommandError::MissingField("eventName"))?;
    let mode = match args.get("mode") {
        None | Some(Value::Null) => InsertionMode::Direct,
        Some(value) => parse_mode(value.as_str().ok_or(CommandError::MissingField("mode"))?)?,
    };

    let line_index = LineIndex::from_text(document_text);
    let span = LspCoordinateConverter::lsp_to_span(&line_index, range);
    let trigger = CursorTrigger::new(BufferId::new(uri), span, event_name, mode);

    Ok(match args.get("bindObject").and_then(Value::as_str) {
        Some(bind_object) => trigger.with_bind_object(bind_object),
        None => trigger,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use handler_core::TextSpan;
    use serde_json::json;

    #[test]
    fn test_trigger_from_command() {
        let text = "const a = 1;\n  <b onClick! />\n";
        let args = json!({
            "textDocument": { "uri": "file:///a.tsx" },
            "range": { "start": { "line": 1, "character": 12 }, "end": { "line": 1, "character": 13 } },
            "eventName": "onClick",
            "mode": "interactive"
        });

        let trigger = trigger_from_command(&args, text).unwrap();
        assert_eq!(trigger.buffer(), &BufferId::new("file:///a.tsx"));
        assert_eq!(trigger.span(), TextSpan::new(25, 26));
        assert_eq!(trigger.attribute_offset(), 18);
        assert_eq!(trigger.mode(), InsertionMode::Interactive);
        assert_eq!(trigger.bind_object(), None);
    }

    #[test]
    fn test_command_errors() {
        let args = json!({
            "textDocument": { "uri": "file:///a.tsx" },
            "range": { "start": { "line": 0, "character": 0 }, "end": { "line": 0, "character": 0 } },
            "eventName": "onClick",
            "mode": "sideways"
        });
        assert_eq!(
            trigger_from_command(&args, ""),
            Err(CommandError::UnknownMode("sideways".to_string()))
        );
        assert_eq!(
            trigger_from_command(&json!({}), ""),
            Err(CommandError::MissingField("textDocument.uri"))
        );
    }
}
