//! Logical line index
//!
//! Provides line/column and byte/char conversions for a buffer snapshot using a Rope, so the
//! analyzers can work in character offsets while parsers work in bytes.

use ropey::Rope;

/// Logical line index - implemented using Rope data structure
///
/// Rope provides O(log N) line access, which keeps per-session conversions cheap on large files.
pub struct LineIndex {
    rope: Rope,
}

impl LineIndex {
    /// Create an empty line index
    pub fn new() -> Self {
        Self { rope: Rope::new() }
    }

    /// Build line index from text
    pub fn from_text(text: &str) -> Self {
        Self {
            rope: Rope::from_str(text),
        }
    }

    /// Get total line count
    pub fn line_count(&self) -> usize {
        self.rope.len_lines()
    }

    /// Get total byte count
    pub fn byte_count(&self) -> usize {
        self.rope.len_bytes()
    }

    /// Get total character count
    pub fn char_count(&self) -> usize {
        self.rope.len_chars()
    }

    /// Get line number and offset within line from character offset
    pub fn char_offset_to_position(&self, char_offset: usize) -> (usize, usize) {
        let char_offset = char_offset.min(self.rope.len_chars());

        let line_idx = self.rope.char_to_line(char_offset);
        let line_start_char = self.rope.line_to_char(line_idx);
        let char_in_line = char_offset - line_start_char;

        (line_idx, char_in_line)
    }

    /// Get character offset from line number and column number
    pub fn position_to_char_offset(&self, line: usize, column: usize) -> usize {
        if line >= self.rope.len_lines() {
            return self.rope.len_chars();
        }

        let line_start_char = self.rope.line_to_char(line);
        let line_len = self
            .get_line_text(line)
            .map(|text| text.chars().count())
            .unwrap_or(0);

        line_start_char + column.min(line_len)
    }

    /// Character offset of the first character of `line` (clamped to the document end).
    pub fn line_start(&self, line: usize) -> usize {
        if line >= self.rope.len_lines() {
            return self.rope.len_chars();
        }
        self.rope.line_to_char(line)
    }

    /// Get the text of a line, without its trailing line terminator.
    pub fn get_line_text(&self, line_number: usize) -> Option<String> {
        if line_number >= self.rope.len_lines() {
            return None;
        }

        let mut text = self.rope.line(line_number).to_string();
        if text.ends_with('\n') {
            text.pop();
        }
        if text.ends_with('\r') {
            text.pop();
        }
        Some(text)
    }

    /// Get the text in the half-open character range `start..end` (clamped).
    pub fn slice(&self, start: usize, end: usize) -> String {
        let len = self.rope.len_chars();
        let start = start.min(len);
        let end = end.clamp(start, len);
        self.rope.slice(start..end).to_string()
    }

    /// Convert a character offset into a byte offset (clamped to the document end).
    pub fn char_offset_to_byte_offset(&self, char_offset: usize) -> usize {
        let char_offset = char_offset.min(self.rope.len_chars());
        self.rope.char_to_byte(char_offset)
    }

    /// Convert a byte offset into a character offset (clamped to the document end).
    ///
    /// A byte offset inside a multi-byte character maps to that character.
    pub fn byte_offset_to_char_offset(&self, byte_offset: usize) -> usize {
        let byte_offset = byte_offset.min(self.rope.len_bytes());
        self.rope.byte_to_char(byte_offset)
    }
}

impl Default for LineIndex {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_roundtrip() {
        let index = LineIndex::from_text("class A {\n  x = 1;\n}\n");
        assert_eq!(index.line_count(), 4);
        assert_eq!(index.char_offset_to_position(12), (1, 2));
        assert_eq!(index.position_to_char_offset(1, 2), 12);
        assert_eq!(index.position_to_char_offset(1, 100), 18);
        assert_eq!(index.line_start(2), 19);
    }

    #[test]
    fn test_get_line_text_strips_crlf() {
        let index = LineIndex::from_text("a\r\nb\r\n");
        assert_eq!(index.get_line_text(0).as_deref(), Some("a"));
        assert_eq!(index.get_line_text(1).as_deref(), Some("b"));
        assert_eq!(index.get_line_text(5), None);
    }

    #[test]
    fn test_byte_char_conversion_with_multibyte_text() {
        let index = LineIndex::from_text("const 名前 = 1;");
        // '名' and '前' are 3 bytes each.
        assert_eq!(index.char_offset_to_byte_offset(8), 12);
        assert_eq!(index.byte_offset_to_char_offset(12), 8);
        assert_eq!(index.slice(6, 8), "名前");
    }
}
