#![warn(missing_docs)]
//! `handler-core-lsp` - LSP integration for `handler-core`.
//!
//! This crate contains the protocol-facing adapters an editor extension or language-server
//! plugin needs around the insertion engine: UTF-16 coordinate conversion, definition result
//! normalization, `WorkspaceEdit` construction and command argument parsing.
//!
//! It does not run a language server; hosts forward requests and responses through these
//! helpers.

pub mod lsp_command;
pub mod lsp_locations;
pub mod lsp_sync;
pub mod lsp_text_edits;
pub mod lsp_uri;

pub use lsp_command::{CommandError, parse_mode, trigger_from_command};
pub use lsp_locations::{LspLocation, definition_params, locations_from_value};
pub use lsp_sync::{LspCoordinateConverter, LspPosition, LspRange};
pub use lsp_text_edits::{
    LspTextEdit, apply_text_edits, plan_to_text_edits, plan_to_workspace_edit,
    text_edits_from_value, workspace_edit_text_edits_for_uri,
};
pub use lsp_uri::{buffer_id_for_path, path_for_buffer_id, percent_decode_path, percent_encode_path};
