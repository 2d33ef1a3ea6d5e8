#![warn(missing_docs)]
//! `handler-core-treesitter` - Tree-sitter integration for `handler-core`.
//!
//! This crate parses TSX/JSX buffers with the Tree-sitter TypeScript grammar and plugs them into
//! the insertion engine:
//!
//! - [`TsxTree`] implements `handler_core::SyntaxTree` with character-offset spans
//! - [`ComponentPredicate`] recognizes class and function components
//! - [`TsxSyntax`] ties both together as a `handler_core::ComponentSyntax`

mod predicate;
mod tree;

pub use predicate::ComponentPredicate;
pub use tree::{TsxError, TsxSyntax, TsxTree};

use handler_core::host::{BufferId, Host};
use handler_core::session::{ComponentSyntax, SessionConfig};
use tracing::debug;

impl<H: Host + ?Sized> ComponentSyntax<H> for TsxSyntax {
    type Tree = TsxTree;
    type Predicate<'a>
        = ComponentPredicate<'a, H>
    where
        Self: 'a,
        H: 'a;

    fn parse(&self, text: &str) -> Option<TsxTree> {
        match self.parse_text(text) {
            Ok(tree) => Some(tree),
            Err(err) => {
                debug!(error = %err, "buffer not parsed");
                None
            }
        }
    }

    fn predicate<'a>(
        &'a self,
        host: &'a H,
        buffer: &'a BufferId,
        config: &'a SessionConfig,
    ) -> ComponentPredicate<'a, H> {
        ComponentPredicate::new(self, host, buffer, config)
    }
}
