use handler_core::construct::TextSpan;
use handler_core::line_index::LineIndex;
use handler_core::locate::SyntaxTree;
use tree_sitter::{Language, Node, Parser, Tree};

/// Errors produced by [`TsxSyntax`].
#[derive(Debug)]
pub enum TsxError {
    /// Setting the Tree-sitter language failed.
    Language(String),
    /// The parser produced no tree.
    Parse,
}

impl std::fmt::Display for TsxError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Language(msg) => write!(f, "tree-sitter language error: {msg}"),
            Self::Parse => write!(f, "tree-sitter produced no tree"),
        }
    }
}

impl std::error::Error for TsxError {}

/// Parser front end for TSX/JSX buffers.
#[derive(Debug, Clone)]
pub struct TsxSyntax {
    language: Language,
}

impl Default for TsxSyntax {
    fn default() -> Self {
        Self::new()
    }
}

impl TsxSyntax {
    /// The TSX grammar (also accepts plain JSX).
    pub fn new() -> Self {
        Self::with_language(tree_sitter_typescript::LANGUAGE_TSX.into())
    }

    /// Use a different (TSX-compatible) grammar.
    pub fn with_language(language: Language) -> Self {
        Self { language }
    }

    /// Parse `text` into a [`TsxTree`].
    ///
    /// Syntax errors do not fail the parse; Tree-sitter recovers and marks them in the tree.
    pub fn parse_text(&self, text: &str) -> Result<TsxTree, TsxError> {
        let mut parser = Parser::new();
        parser
            .set_language(&self.language)
            .map_err(|e| TsxError::Language(e.to_string()))?;
        let tree = parser.parse(text, None).ok_or(TsxError::Parse)?;

        Ok(TsxTree {
            tree,
            text: text.to_string(),
            line_index: LineIndex::from_text(text),
        })
    }
}

/// A parsed buffer together with its text.
pub struct TsxTree {
    tree: Tree,
    text: String,
    line_index: LineIndex,
}

impl TsxTree {
    /// Source text of the parsed buffer.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Source text of `node`.
    pub fn node_text<'a>(&'a self, node: Node<'a>) -> &'a str {
        self.text.get(node.start_byte()..node.end_byte()).unwrap_or("")
    }

    /// Character span of `node`.
    pub fn char_span(&self, node: Node<'_>) -> TextSpan {
        TextSpan::new(
            self.line_index.byte_offset_to_char_offset(node.start_byte()),
            self.line_index.byte_offset_to_char_offset(node.end_byte()),
        )
    }

    /// Whether the tree contains syntax errors.
    pub fn has_errors(&self) -> bool {
        self.tree.root_node().has_error()
    }
}

impl SyntaxTree for TsxTree {
    type Node<'a> = Node<'a>;

    fn root(&self) -> Node<'_> {
        self.tree.root_node()
    }

    fn node_at(&self, offset: usize) -> Option<Node<'_>> {
        if offset > self.line_index.char_count() {
            return None;
        }
        let byte = self.line_index.char_offset_to_byte_offset(offset);
        self.tree.root_node().descendant_for_byte_range(byte, byte)
    }

    fn parent<'a>(&'a self, node: Node<'a>) -> Option<Node<'a>> {
        node.parent()
    }

    fn children<'a>(&'a self, node: Node<'a>) -> Vec<Node<'a>> {
        let mut cursor = node.walk();
        node.children(&mut cursor).collect()
    }

    fn span<'a>(&'a self, node: Node<'a>) -> TextSpan {
        self.char_span(node)
    }
}
