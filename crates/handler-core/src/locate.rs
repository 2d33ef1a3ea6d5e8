//! Scope locator.
//!
//! Finds the nearest construct around a cursor offset that satisfies a predicate. The locator is
//! generic over the syntax tree ([`SyntaxTree`]) and the predicate ([`ConstructPredicate`]); the
//! predicate decides what counts as a component and produces the tagged
//! [`ComponentConstruct`].

use crate::construct::{ComponentConstruct, TextSpan};
use async_trait::async_trait;
use serde::Deserialize;

/// Read-only view of a parsed buffer.
///
/// Spans are character offsets into the parsed text.
pub trait SyntaxTree {
    /// A cheap handle to a node, borrowing the tree.
    type Node<'a>: Copy
    where
        Self: 'a;

    /// The root node.
    fn root(&self) -> Self::Node<'_>;

    /// The smallest node containing `offset`, if any.
    fn node_at(&self, offset: usize) -> Option<Self::Node<'_>>;

    /// The parent of `node` (`None` for the root).
    fn parent<'a>(&'a self, node: Self::Node<'a>) -> Option<Self::Node<'a>>;

    /// The children of `node`, in source order.
    fn children<'a>(&'a self, node: Self::Node<'a>) -> Vec<Self::Node<'a>>;

    /// Span of `node`.
    fn span<'a>(&'a self, node: Self::Node<'a>) -> TextSpan;
}

/// Decides whether a node is a component construct.
///
/// Evaluation may suspend (for example to resolve a superclass in another buffer). The locator
/// awaits each evaluation before starting the next one and never evaluates concurrently.
#[async_trait(?Send)]
pub trait ConstructPredicate<T: SyntaxTree> {
    /// Returns the construct for `node`, or `None` if it does not match.
    async fn evaluate<'t>(&mut self, tree: &'t T, node: T::Node<'t>)
    -> Option<ComponentConstruct>;
}

/// Search order used by [`locate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchDirection {
    /// Walk from the node at the cursor up through its ancestors; the first match wins.
    #[default]
    Outward,
    /// Walk from the root down the chain of nodes containing the cursor; the innermost match
    /// wins.
    Inward,
}

/// Locate the construct around `offset` that satisfies `predicate`.
///
/// Returns `None` when no construct contains `offset` (for example a cursor at top level). That
/// is a normal outcome, not an error.
pub async fn locate<T, P>(
    tree: &T,
    offset: usize,
    predicate: &mut P,
    direction: SearchDirection,
) -> Option<ComponentConstruct>
where
    T: SyntaxTree,
    P: ConstructPredicate<T> + ?Sized,
{
    match direction {
        SearchDirection::Outward => {
            let mut current = tree.node_at(offset);
            while let Some(node) = current {
                if let Some(found) = predicate.evaluate(tree, node).await {
                    return Some(found);
                }
                current = tree.parent(node);
            }
            None
        }
        SearchDirection::Inward => {
            let mut best = None;
            let mut current = Some(tree.root());
            while let Some(node) = current {
                if let Some(found) = predicate.evaluate(tree, node).await {
                    best = Some(found);
                }
                current = tree
                    .children(node)
                    .into_iter()
                    .find(|child| tree.span(*child).contains(offset));
            }
            best
        }
    }
}
