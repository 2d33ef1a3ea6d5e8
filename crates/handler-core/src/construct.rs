//! Component construct data model.
//!
//! A construct is the syntactic unit a handler is inserted into (class form) or next to
//! (function form). Constructs are plain values copied out of a syntax tree; they stay valid for
//! the buffer snapshot they were located in.

/// A half-open character-offset range (`start..end`) in a buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct TextSpan {
    /// Range start offset (inclusive), in Unicode scalar values (`char`).
    pub start: usize,
    /// Range end offset (exclusive), in Unicode scalar values (`char`).
    pub end: usize,
}

impl TextSpan {
    /// Create a new span.
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// An empty span at `offset`.
    pub fn empty(offset: usize) -> Self {
        Self::new(offset, offset)
    }

    /// Length of the span in characters.
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// Returns `true` if the span covers no characters.
    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }

    /// Returns `true` if `offset` lies in `start..end`.
    pub fn contains(&self, offset: usize) -> bool {
        self.start <= offset && offset < self.end
    }
}

/// Capabilities shared by every located construct.
pub trait ConstructShape {
    /// Declared name, if the construct has one (`class Foo`, `const Foo = ...`).
    fn name(&self) -> Option<&str>;
    /// Span of the whole construct.
    fn span(&self) -> TextSpan;
    /// Span of the construct body. For braced bodies this includes both braces.
    fn body_span(&self) -> TextSpan;
}

/// A class whose supertype chain includes the framework's base component.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassConstruct {
    /// Class name (absent for anonymous class expressions).
    pub name: Option<String>,
    /// Span of the class declaration.
    pub span: TextSpan,
    /// Span of the class body, from `{` through `}`.
    pub body: TextSpan,
}

/// A function or variable declaration whose body returns markup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionConstruct {
    /// Declared component name.
    pub name: Option<String>,
    /// Span of the declaration itself.
    pub span: TextSpan,
    /// Span of the function body (a block or an expression body).
    pub body: TextSpan,
    /// Span of the outermost statement holding the declaration (e.g. including `export`).
    ///
    /// Handlers are inserted before this statement.
    pub anchor: TextSpan,
}

/// The two component shapes a handler can target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ComponentConstruct {
    /// Class-based component; handlers become members.
    Class(ClassConstruct),
    /// Function component; handlers become outer siblings.
    Function(FunctionConstruct),
}

/// Tag of a [`ComponentConstruct`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConstructKind {
    /// See [`ComponentConstruct::Class`].
    Class,
    /// See [`ComponentConstruct::Function`].
    Function,
}

impl ComponentConstruct {
    /// The construct's tag.
    pub fn kind(&self) -> ConstructKind {
        match self {
            Self::Class(_) => ConstructKind::Class,
            Self::Function(_) => ConstructKind::Function,
        }
    }

    /// The span handler insertion is positioned against.
    pub fn anchor_span(&self) -> TextSpan {
        match self {
            Self::Class(class) => class.span,
            Self::Function(function) => function.anchor,
        }
    }
}

impl ConstructShape for ClassConstruct {
    fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    fn span(&self) -> TextSpan {
        self.span
    }

    fn body_span(&self) -> TextSpan {
        self.body
    }
}

impl ConstructShape for FunctionConstruct {
    fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    fn span(&self) -> TextSpan {
        self.span
    }

    fn body_span(&self) -> TextSpan {
        self.body
    }
}

impl ConstructShape for ComponentConstruct {
    fn name(&self) -> Option<&str> {
        match self {
            Self::Class(class) => class.name(),
            Self::Function(function) => function.name(),
        }
    }

    fn span(&self) -> TextSpan {
        match self {
            Self::Class(class) => class.span(),
            Self::Function(function) => function.span(),
        }
    }

    fn body_span(&self) -> TextSpan {
        match self {
            Self::Class(class) => class.body_span(),
            Self::Function(function) => function.body_span(),
        }
    }
}
