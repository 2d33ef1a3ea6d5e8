//! LSP coordinates.
//!
//! LSP positions count UTF-16 code units within a line; `handler-core` uses character offsets
//! into the whole buffer. This module converts between the two.

use handler_core::{LineIndex, TextSpan};
use serde_json::{Value, json};

/// LSP Position (based on UTF-16 code units)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LspPosition {
    /// Line number (0-based)
    pub line: u32,
    /// Character offset (UTF-16 code units, 0-based)
    pub character: u32,
}

impl LspPosition {
    /// Create a new LSP position (UTF-16 based).
    pub fn new(line: u32, character: u32) -> Self {
        Self { line, character }
    }

    /// Parse a `{ line, character }` JSON value.
    pub fn from_value(value: &Value) -> Option<Self> {
        Some(Self {
            line: value.get("line")?.as_u64()? as u32,
            character: value.get("character")?.as_u64()? as u32,
        })
    }

    /// Serialize as a `{ line, character }` JSON value.
    pub fn to_value(self) -> Value {
        json!({ "line": self.line, "character": self.character })
    }
}

/// LSP Range
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LspRange {
    /// Range start position (inclusive).
    pub start: LspPosition,
    /// Range end position (exclusive).
    pub end: LspPosition,
}

impl LspRange {
    /// Create a new LSP range.
    pub fn new(start: LspPosition, end: LspPosition) -> Self {
        Self { start, end }
    }

    /// Parse a `{ start, end }` JSON value.
    pub fn from_value(value: &Value) -> Option<Self> {
        Some(Self {
            start: LspPosition::from_value(value.get("start")?)?,
            end: LspPosition::from_value(value.get("end")?)?,
        })
    }

    /// Serialize as a `{ start, end }` JSON value.
    pub fn to_value(self) -> Value {
        json!({ "start": self.start.to_value(), "end": self.end.to_value() })
    }
}

/// LSP coordinate converter
///
/// Handles conversions between character offsets and LSP positions (UTF-16).
pub struct LspCoordinateConverter;

impl LspCoordinateConverter {
    /// Convert character offset within a line to a UTF-16 code unit offset
    pub fn char_offset_to_utf16(line_text: &str, char_offset: usize) -> usize {
        line_text
            .chars()
            .take(char_offset)
            .map(char::len_utf16)
            .sum()
    }

    /// Convert UTF-16 code unit offset within a line to a character offset
    ///
    /// An offset that falls inside a surrogate pair maps past that character.
    pub fn utf16_to_char_offset(line_text: &str, utf16_offset: usize) -> usize {
        let mut units = 0;
        line_text
            .chars()
            .take_while(|ch| {
                if units >= utf16_offset {
                    return false;
                }
                units += ch.len_utf16();
                true
            })
            .count()
    }

    /// Convert a buffer character offset to an LSP position.
    pub fn char_offset_to_lsp(line_index: &LineIndex, char_offset: usize) -> LspPosition {
        let (line, column) = line_index.char_offset_to_position(char_offset);
        let line_text = line_index.get_line_text(line).unwrap_or_default();
        LspPosition::new(
            line as u32,
            Self::char_offset_to_utf16(&line_text, column) as u32,
        )
    }

    /// Convert an LSP position to a buffer character offset (clamped to the line end).
    pub fn lsp_to_char_offset(line_index: &LineIndex, position: LspPosition) -> usize {
        let line = position.line as usize;
        let line_text = line_index.get_line_text(line).unwrap_or_default();
        let column = Self::utf16_to_char_offset(&line_text, position.character as usize);
        line_index.position_to_char_offset(line, column)
    }

    /// Convert a character span to an LSP range.
    pub fn span_to_lsp(line_index: &LineIndex, span: TextSpan) -> LspRange {
        LspRange::new(
            Self::char_offset_to_lsp(line_index, span.start),
            Self::char_offset_to_lsp(line_index, span.end),
        )
    }

    /// Convert an LSP range to a character span (start and end ordered).
    pub fn lsp_to_span(line_index: &LineIndex, range: LspRange) -> TextSpan {
        let start = Self::lsp_to_char_offset(line_index, range.start);
        let end = Self::lsp_to_char_offset(line_index, range.end);
        TextSpan::new(start.min(end), start.max(end))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_char_offset_to_utf16() {
        let text = "a😀b";
        assert_eq!(LspCoordinateConverter::char_offset_to_utf16(text, 1), 1);
        assert_eq!(LspCoordinateConverter::char_offset_to_utf16(text, 2), 3);
        assert_eq!(LspCoordinateConverter::char_offset_to_utf16(text, 3), 4);
    }

    #[test]
    fn test_utf16_to_char_offset() {
        let text = "a😀b";
        assert_eq!(LspCoordinateConverter::utf16_to_char_offset(text, 0), 0);
        assert_eq!(LspCoordinateConverter::utf16_to_char_offset(text, 3), 2);
        assert_eq!(LspCoordinateConverter::utf16_to_char_offset(text, 2), 2);
        assert_eq!(LspCoordinateConverter::utf16_to_char_offset(text, 99), 3);
    }

    #[test]
    fn test_buffer_offsets_across_lines() {
        let index = LineIndex::from_text("const a = '😀';\n<div onClick />\n");
        let offset = index.position_to_char_offset(1, 5);

        let position = LspCoordinateConverter::char_offset_to_lsp(&index, offset);
        assert_eq!(position, LspPosition::new(1, 5));
        assert_eq!(
            LspCoordinateConverter::lsp_to_char_offset(&index, position),
            offset
        );

        // The emoji is two UTF-16 units but one character.
        let after_emoji = LspCoordinateConverter::lsp_to_char_offset(&index, LspPosition::new(0, 13));
        assert_eq!(after_emoji, 12);
    }

    #[test]
    fn test_range_json() {
        let value = json!({
            "start": { "line": 2, "character": 4 },
            "end": { "line": 2, "character": 9 }
        });
        let range = LspRange::from_value(&value).unwrap();
        assert_eq!(range.start, LspPosition::new(2, 4));
        assert_eq!(range.to_value(), value);
    }
}
