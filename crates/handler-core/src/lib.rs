#![warn(missing_docs)]
//! Handler Core - host-independent event-handler stub synthesis
//!
//! # Overview
//!
//! `handler-core` generates an event-handler stub for a UI component when the user types an event
//! prop in markup (`<Button onClick!`). It finds the enclosing component, resolves the callback
//! signature from the prop's declaration, writes a matching stub into the component (class form)
//! or right before it (function form), and replaces the trigger with the binding expression.
//!
//! The crate does not parse any language and does not talk to an editor. Parsing is provided by a
//! [`ComponentSyntax`] implementation (see `handler-core-treesitter`) and every environment service
//! goes through [`Host`].
//!
//! # Architecture Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │  Insertion Session (orchestration)          │  ← Public API
//! ├─────────────────────────────────────────────┤
//! │  Handler Synthesizer (stub + binding plan)  │  ← Edits
//! ├─────────────────────────────────────────────┤
//! │  Scope Locator / Signature Resolver         │  ← Analysis
//! ├─────────────────────────────────────────────┤
//! │  Indentation Analyzer                       │  ← Layout
//! ├─────────────────────────────────────────────┤
//! │  Line Index (Rope-based)                    │  ← Offsets
//! └─────────────────────────────────────────────┘
//! ```
//!
//! # Quick Start
//!
//! ```rust
//! use handler_core::{indent::compute_indent, IndentSettings};
//! use handler_core::signature::{render_params, resolve};
//!
//! let params = resolve("onChange?: (value: string, event: Event) => void;").unwrap();
//! assert_eq!(render_params(&params, true), "value: string, event: Event");
//!
//! let width = compute_indent(["    a", "      b", "    c"], &IndentSettings::spaces(4));
//! assert_eq!(width, 4);
//! ```
//!
//! # Module Description
//!
//! - [`line_index`] - Rope based line index with char/byte offset conversion
//! - [`indent`] - indentation measurement and rendering
//! - [`signature`] - callback signature resolution from declaration text
//! - [`construct`] - component construct model
//! - [`locate`] - syntax-tree search for the enclosing component
//! - [`synth`] - stub text and insertion planning
//! - [`host`] - services consumed from the editor
//! - [`session`] - end-to-end insertion sessions
//!
//! # Offsets
//!
//! Every public offset is a character offset (Unicode scalar values) into the buffer text.
//! Protocol coordinates (LSP UTF-16 positions) are converted by `handler-core-lsp`.

pub mod construct;
pub mod host;
pub mod indent;
pub mod line_index;
pub mod locate;
pub mod session;
pub mod signature;
pub mod synth;

pub use construct::{
    ClassConstruct, ComponentConstruct, ConstructKind, ConstructShape, FunctionConstruct, TextSpan,
};
pub use host::{BufferId, DefinitionTarget, Host, HostError, TextEdit};
pub use indent::{IndentNormalization, IndentSettings, IndentUnit};
pub use line_index::LineIndex;
pub use locate::{ConstructPredicate, SearchDirection, SyntaxTree, locate};
pub use session::{
    AbortReason, ComponentSyntax, CursorTrigger, InsertionMode, InsertionReport, InsertionSession,
    SessionConfig, SessionOutcome, SessionState, UnresolvedSignature, run_insertion_session,
};
pub use signature::{HandlerParam, declaration_slice, resolve};
pub use synth::{BindingSite, HandlerSynthesizer, InsertionPlan};

pub use handler_core_lang::{
    ClassStubStyle, FrameworkConfig, FunctionStubStyle, HandlerStyle, is_identifier,
};
