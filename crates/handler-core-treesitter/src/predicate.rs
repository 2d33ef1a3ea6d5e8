use crate::tree::{TsxSyntax, TsxTree};
use async_trait::async_trait;
use futures::FutureExt;
use futures::future::{LocalBoxFuture, join_all};
use handler_core::construct::{ClassConstruct, ComponentConstruct, FunctionConstruct};
use handler_core::host::{BufferId, Host};
use handler_core::locate::{ConstructPredicate, SyntaxTree};
use handler_core::session::SessionConfig;
use tracing::debug;
use tree_sitter::Node;

const CLASS_KINDS: &[&str] = &["class_declaration", "abstract_class_declaration", "class"];

const FUNCTION_KINDS: &[&str] = &[
    "function_declaration",
    "generator_function_declaration",
    "function_expression",
    "function",
    "arrow_function",
    "method_definition",
];

const JSX_KINDS: &[&str] = &[
    "jsx_element",
    "jsx_self_closing_element",
    "jsx_fragment",
    // left behind by error recovery around half-typed markup
    "jsx_opening_element",
];

/// Call wrappers whose first argument is the component function (`memo(() => ...)`).
const COMPONENT_WRAPPERS: &[&str] = &["memo", "React.memo", "forwardRef", "React.forwardRef"];

/// Recognizes UI components in a [`TsxTree`].
///
/// - class form: a class whose `extends` clause names a configured base component, either
///   directly or through a chain of superclasses resolved with the host's definition lookup
/// - function form: a function declaration, or a `const`/`let`/`var` initialized with a function
///   (optionally wrapped in `memo`/`forwardRef`), that returns JSX
pub struct ComponentPredicate<'a, H: ?Sized> {
    syntax: &'a TsxSyntax,
    host: &'a H,
    buffer: &'a BufferId,
    config: &'a SessionConfig,
}

impl<'a, H: Host + ?Sized> ComponentPredicate<'a, H> {
    /// Create a predicate evaluating nodes of `buffer`.
    pub fn new(
        syntax: &'a TsxSyntax,
        host: &'a H,
        buffer: &'a BufferId,
        config: &'a SessionConfig,
    ) -> Self {
        Self {
            syntax,
            host,
            buffer,
            config,
        }
    }

    async fn class_component(&self, tree: &TsxTree, node: Node<'_>) -> Option<ComponentConstruct> {
        let body = node.child_by_field_name("body")?;
        let supertype = superclass_value(node)?;

        let is_component = self
            .config
            .framework
            .is_base_component(tree.node_text(supertype))
            || self
                .extends_component(self.buffer.clone(), lookup_offset(tree, supertype), 0)
                .await;
        if !is_component {
            return None;
        }

        Some(ComponentConstruct::Class(ClassConstruct {
            name: node
                .child_by_field_name("name")
                .map(|name| tree.node_text(name).to_string()),
            span: tree.char_span(node),
            body: tree.char_span(body),
        }))
    }

    /// Follow the superclass at `offset` in `buffer` through its definitions until a base
    /// component is found or the hop limit is reached.
    fn extends_component<'s>(
        &'s self,
        buffer: BufferId,
        offset: usize,
        depth: usize,
    ) -> LocalBoxFuture<'s, bool> {
        async move {
            if depth >= self.config.max_superclass_depth {
                debug!(buffer = %buffer, depth, "superclass chain too deep");
                return false;
            }

            let targets = match self.host.find_definition(&buffer, offset).await {
                Ok(targets) => targets,
                Err(err) => {
                    debug!(buffer = %buffer, error = %err, "superclass definition lookup failed");
                    return false;
                }
            };
            let texts = join_all(targets.iter().map(|target| self.host.open_buffer(&target.buffer))).await;

            for (target, text) in targets.iter().zip(texts) {
                let Ok(text) = text else {
                    continue;
                };
                let Ok(tree) = self.syntax.parse_text(&text) else {
                    continue;
                };
                let Some(class) = enclosing_class(&tree, target.span.start) else {
                    continue;
                };
                let Some(supertype) = superclass_value(class) else {
                    continue;
                };

                if self
                    .config
                    .framework
                    .is_base_component(tree.node_text(supertype))
                {
                    return true;
                }
                let next_offset = lookup_offset(&tree, supertype);
                if self
                    .extends_component(target.buffer.clone(), next_offset, depth + 1)
                    .await
                {
                    return true;
                }
            }
            false
        }
        .boxed_local()
    }
}

#[async_trait(?Send)]
impl<'a, H: Host + ?Sized> ConstructPredicate<TsxTree> for ComponentPredicate<'a, H> {
    async fn evaluate<'t>(&mut self, tree: &'t TsxTree, node: Node<'t>) -> Option<ComponentConstruct> {
        match node.kind() {
            kind if CLASS_KINDS.contains(&kind) => self.class_component(tree, node).await,
            "function_declaration" => {
                let body = node.child_by_field_name("body")?;
                if !returns_jsx(body) {
                    return None;
                }
                Some(function_construct(tree, node, node, body))
            }
            "variable_declarator" => {
                let function = node
                    .child_by_field_name("value")
                    .and_then(|value| unwrap_component_value(tree, value))?;
                let body = function.child_by_field_name("body")?;
                if !returns_jsx(body) {
                    return None;
                }
                let statement = node.parent()?;
                Some(function_construct(tree, node, statement, body))
            }
            _ => None,
        }
    }
}

fn function_construct(
    tree: &TsxTree,
    declaration: Node<'_>,
    statement: Node<'_>,
    body: Node<'_>,
) -> ComponentConstruct {
    let anchor = match statement.parent() {
        Some(parent) if parent.kind() == "export_statement" => parent,
        _ => statement,
    };
    ComponentConstruct::Function(FunctionConstruct {
        name: declaration
            .child_by_field_name("name")
            .map(|name| tree.node_text(name).to_string()),
        span: tree.char_span(declaration),
        body: tree.char_span(body),
        anchor: tree.char_span(anchor),
    })
}

/// The `extends` value of a class node (`Component`, `React.Component`), without type arguments.
fn superclass_value(class: Node<'_>) -> Option<Node<'_>> {
    let mut cursor = class.walk();
    let heritage = class
        .children(&mut cursor)
        .find(|child| child.kind() == "class_heritage")?;

    let mut cursor = heritage.walk();
    let extends = heritage
        .children(&mut cursor)
        .find(|child| child.kind() == "extends_clause")?;
    extends.child_by_field_name("value")
}

/// Offset used to look up a superclass definition: the last segment of a member expression.
fn lookup_offset(tree: &TsxTree, supertype: Node<'_>) -> usize {
    let target = match supertype.kind() {
        "member_expression" => supertype.child_by_field_name("property").unwrap_or(supertype),
        _ => supertype,
    };
    tree.char_span(target).start
}

fn enclosing_class(tree: &TsxTree, offset: usize) -> Option<Node<'_>> {
    let mut current = tree.node_at(offset);
    while let Some(node) = current {
        if CLASS_KINDS.contains(&node.kind()) {
            return Some(node);
        }
        current = node.parent();
    }
    None
}

fn unwrap_component_value<'t>(tree: &'t TsxTree, value: Node<'t>) -> Option<Node<'t>> {
    match value.kind() {
        "arrow_function" | "function_expression" | "function" => Some(value),
        "parenthesized_expression" => value
            .named_child(0)
            .and_then(|inner| unwrap_component_value(tree, inner)),
        "call_expression" => {
            let callee = value.child_by_field_name("function")?;
            let callee = tree
                .node_text(callee)
                .split_whitespace()
                .collect::<String>();
            if !COMPONENT_WRAPPERS.contains(&callee.as_str()) {
                return None;
            }
            value
                .child_by_field_name("arguments")?
                .named_child(0)
                .and_then(|argument| unwrap_component_value(tree, argument))
        }
        _ => None,
    }
}

/// Whether a function body returns JSX, ignoring nested functions.
fn returns_jsx(body: Node<'_>) -> bool {
    if body.kind() != "statement_block" {
        return contains_jsx(body);
    }
    has_jsx_return(body)
}

fn has_jsx_return(node: Node<'_>) -> bool {
    let mut cursor = node.walk();
    let children = node.children(&mut cursor).collect::<Vec<_>>();
    children.into_iter().any(|child| {
        if FUNCTION_KINDS.contains(&child.kind()) || CLASS_KINDS.contains(&child.kind()) {
            false
        } else if child.kind() == "return_statement" || is_broken_return(child) {
            contains_jsx(child)
        } else {
            has_jsx_return(child)
        }
    })
}

/// An `ERROR` node holding a `return` keyword: what a return statement becomes when the markup
/// it returns does not parse.
fn is_broken_return(node: Node<'_>) -> bool {
    if !node.is_error() {
        return false;
    }
    let mut cursor = node.walk();
    let has_return = node.children(&mut cursor).any(|child| child.kind() == "return");
    has_return
}

fn contains_jsx(node: Node<'_>) -> bool {
    if JSX_KINDS.contains(&node.kind()) {
        return true;
    }
    if FUNCTION_KINDS.contains(&node.kind()) || CLASS_KINDS.contains(&node.kind()) {
        return false;
    }
    let mut cursor = node.walk();
    let children = node.children(&mut cursor).collect::<Vec<_>>();
    children.into_iter().any(contains_jsx)
}
