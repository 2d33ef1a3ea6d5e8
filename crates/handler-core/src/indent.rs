//! Indentation analysis for inserted code.
//!
//! The analyzer finds the *minimum* indentation among the non-blank lines of a construct body and
//! treats it as the canonical body level. Widths are measured in **indent units** of the buffer's
//! mode: columns when indenting with spaces, tab characters when indenting with tabs.
//!
//! Tabs and spaces are normalized with two deliberately different formulas (see
//! [`IndentNormalization`]). They are not inverses of each other; mixed-indentation files can
//! measure differently depending on the active mode.

use crate::construct::TextSpan;
use crate::line_index::LineIndex;

/// What the buffer inserts when indenting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IndentUnit {
    /// Indent with `'\t'`.
    Tab,
    /// Indent with spaces (one level = `tab_width` spaces).
    #[default]
    Spaces,
}

/// Indentation settings of the buffer being edited.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndentSettings {
    /// Visual width of a tab stop.
    pub tab_width: usize,
    /// Indentation unit inserted by the buffer.
    pub unit: IndentUnit,
}

impl Default for IndentSettings {
    fn default() -> Self {
        Self {
            tab_width: 4,
            unit: IndentUnit::Spaces,
        }
    }
}

impl IndentSettings {
    /// Space-indented buffer with the given tab width.
    pub fn spaces(tab_width: usize) -> Self {
        Self {
            tab_width: tab_width.max(1),
            unit: IndentUnit::Spaces,
        }
    }

    /// Tab-indented buffer with the given tab width.
    pub fn tabs(tab_width: usize) -> Self {
        Self {
            tab_width: tab_width.max(1),
            unit: IndentUnit::Tab,
        }
    }

    /// Width of one indentation level, in indent units.
    pub fn level_width(&self) -> usize {
        match self.unit {
            IndentUnit::Tab => 1,
            IndentUnit::Spaces => self.tab_width.max(1),
        }
    }

    /// The normalization strategy that matches this buffer's mode.
    pub fn normalization(&self) -> IndentNormalization {
        match self.unit {
            IndentUnit::Spaces => IndentNormalization::ExpandTabs {
                tab_width: self.tab_width.max(1),
            },
            IndentUnit::Tab => IndentNormalization::CountTabs,
        }
    }
}

/// How leading whitespace is converted into an indent width.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndentNormalization {
    /// Space mode: the leading-whitespace character count, plus `tab_width - 1` for every tab.
    ExpandTabs {
        /// Visual width of a tab stop.
        tab_width: usize,
    },
    /// Tab mode: the leading-whitespace character count minus the non-tab characters in it.
    CountTabs,
}

impl IndentNormalization {
    /// Measure the indentation of `line`. Returns `None` for blank lines.
    pub fn measure(&self, line: &str) -> Option<usize> {
        let mut raw = 0usize;
        let mut tabs = 0usize;
        for ch in line.chars() {
            match ch {
                '\t' => {
                    raw += 1;
                    tabs += 1;
                }
                c if c.is_whitespace() => raw += 1,
                _ => {
                    return Some(match *self {
                        Self::ExpandTabs { tab_width } => {
                            raw + tabs * tab_width.saturating_sub(1)
                        }
                        Self::CountTabs => {
                            let non_tabs = raw - tabs;
                            raw - non_tabs
                        }
                    });
                }
            }
        }
        None
    }
}

/// Compute the minimum indentation among `lines`, skipping blank lines.
///
/// Returns 0 when every line is blank; callers then fall back to a default single level.
pub fn compute_indent<'a, I>(lines: I, settings: &IndentSettings) -> usize
where
    I: IntoIterator<Item = &'a str>,
{
    let normalization = settings.normalization();
    lines
        .into_iter()
        .filter_map(|line| normalization.measure(line))
        .min()
        .unwrap_or(0)
}

/// Compute the body indentation of a braced span.
///
/// Scans the lines after the line holding the span start (the opening line) up to the line
/// holding the span end (the closing line). The closing line counts only when something precedes
/// the closing brace on it (`  x = 1; }`).
pub fn compute_body_indent(index: &LineIndex, body: TextSpan, settings: &IndentSettings) -> usize {
    let (open_line, _) = index.char_offset_to_position(body.start);
    let (close_line, close_column) = index.char_offset_to_position(body.end.saturating_sub(1));
    let brace_only = index
        .get_line_text(close_line)
        .is_none_or(|text| text.chars().take(close_column).all(char::is_whitespace));
    let last_line = if brace_only || close_line == open_line {
        close_line
    } else {
        close_line + 1
    };
    let lines = ((open_line + 1)..last_line)
        .filter_map(|line| index.get_line_text(line))
        .collect::<Vec<_>>();
    compute_indent(lines.iter().map(String::as_str), settings)
}

/// Indentation of the line containing `char_offset`, measured like body lines.
///
/// A blank line measures 0.
pub fn line_indent(index: &LineIndex, char_offset: usize, settings: &IndentSettings) -> usize {
    let (line, _) = index.char_offset_to_position(char_offset);
    index
        .get_line_text(line)
        .and_then(|text| settings.normalization().measure(&text))
        .unwrap_or(0)
}

/// Leading whitespace of the line containing `char_offset`, verbatim.
pub fn leading_whitespace(index: &LineIndex, char_offset: usize) -> String {
    let (line, _) = index.char_offset_to_position(char_offset);
    index
        .get_line_text(line)
        .map(|text| text.chars().take_while(|c| *c == ' ' || *c == '\t').collect())
        .unwrap_or_default()
}

/// Render an indent width (in indent units) as whitespace.
pub fn render_indent(width: usize, settings: &IndentSettings) -> String {
    match settings.unit {
        IndentUnit::Tab => "\t".repeat(width),
        IndentUnit::Spaces => " ".repeat(width),
    }
}
