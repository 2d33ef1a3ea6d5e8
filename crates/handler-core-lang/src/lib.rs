#![warn(missing_docs)]
//! `handler-core-lang` - data-driven framework configuration helpers for `handler-core`.
//!
//! This crate intentionally stays lightweight and does **not** depend on any parsing system. It
//! provides small structs that hosts can use to describe the UI framework being edited:
//!
//! - which supertypes mark a class as a UI component
//! - how handler names are derived from event prop names
//! - which shape generated stubs take
//!
//! Every struct derives `serde::Deserialize` with field defaults, so hosts can load a partial JSON
//! (or YAML, TOML, ...) document and only override what they need.

use serde::{Deserialize, Serialize};

/// Describes the UI framework the edited buffers are written against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FrameworkConfig {
    /// Supertype expressions that make a class a component (e.g. `React.Component`).
    ///
    /// Compared after stripping type arguments and whitespace, so `Component<Props, State>`
    /// matches `Component`.
    pub base_components: Vec<String>,
    /// Prefix prepended to the capitalized event name (`onChange` -> `handleOnChange`).
    pub handler_prefix: String,
    /// Receiver written in front of class handlers in the binding expression.
    pub class_bind_object: String,
}

impl Default for FrameworkConfig {
    fn default() -> Self {
        Self::react()
    }
}

impl FrameworkConfig {
    /// React class components (`Component` / `PureComponent`, bare or `React.`-qualified).
    pub fn react() -> Self {
        Self {
            base_components: vec![
                "Component".to_string(),
                "PureComponent".to_string(),
                "React.Component".to_string(),
                "React.PureComponent".to_string(),
            ],
            handler_prefix: "handle".to_string(),
            class_bind_object: "this.".to_string(),
        }
    }

    /// Replace the handler name prefix.
    pub fn with_handler_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.handler_prefix = prefix.into();
        self
    }

    /// Add a supertype expression that marks a class as a component.
    pub fn with_base_component(mut self, base: impl Into<String>) -> Self {
        self.base_components.push(base.into());
        self
    }

    /// Returns `true` if `supertype` (the text of an `extends` clause value) names a configured
    /// base component.
    pub fn is_base_component(&self, supertype: &str) -> bool {
        let normalized = normalize_supertype(supertype);
        !normalized.is_empty()
            && self
                .base_components
                .iter()
                .any(|base| normalize_supertype(base) == normalized)
    }

    /// Derive the default handler name for an event prop name.
    ///
    /// The first character of `event_name` is upper-cased and the prefix prepended. With an empty
    /// prefix the event name is returned unchanged.
    pub fn handler_name(&self, event_name: &str) -> String {
        if self.handler_prefix.is_empty() {
            return event_name.to_string();
        }

        let mut chars = event_name.chars();
        let mut out = self.handler_prefix.clone();
        if let Some(first) = chars.next() {
            out.extend(first.to_uppercase());
            out.push_str(chars.as_str());
        }
        out
    }
}

fn normalize_supertype(text: &str) -> String {
    let without_args = match text.find('<') {
        Some(idx) => &text[..idx],
        None => text,
    };
    without_args.chars().filter(|c| !c.is_whitespace()).collect()
}

/// Shape of a handler inserted into a class body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassStubStyle {
    /// `handleOnClick = (e: Event) => {};` (the receiver stays bound).
    #[default]
    ArrowProperty,
    /// `handleOnClick(e: Event) {}`
    Method,
}

/// Shape of a handler inserted before a function component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FunctionStubStyle {
    /// `const handleOnClick = (e: Event) => {};`
    #[default]
    ConstArrow,
    /// `function handleOnClick(e: Event) {}`
    Declaration,
}

/// How generated stubs are written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HandlerStyle {
    /// Stub shape for class components.
    pub class_stub: ClassStubStyle,
    /// Stub shape for function components.
    pub function_stub: FunctionStubStyle,
    /// Whether parameters carry their declared type labels (off for plain JavaScript).
    pub type_annotations: bool,
}

impl Default for HandlerStyle {
    fn default() -> Self {
        Self {
            class_stub: ClassStubStyle::default(),
            function_stub: FunctionStubStyle::default(),
            type_annotations: true,
        }
    }
}

impl HandlerStyle {
    /// Style for plain JavaScript buffers (no type annotations).
    pub fn javascript() -> Self {
        Self {
            type_annotations: false,
            ..Self::default()
        }
    }

    /// Set the class stub shape.
    pub fn with_class_stub(mut self, style: ClassStubStyle) -> Self {
        self.class_stub = style;
        self
    }

    /// Set the function stub shape.
    pub fn with_function_stub(mut self, style: FunctionStubStyle) -> Self {
        self.function_stub = style;
        self
    }
}

/// Returns `true` if `name` is a plain JavaScript identifier (ASCII letters, digits, `_`, `$`,
/// not starting with a digit).
pub fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' || c == '$' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}
