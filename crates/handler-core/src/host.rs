//! Services consumed from the hosting editor.
//!
//! The engine never touches files, the network or UI directly. Everything it needs from its
//! environment goes through [`Host`]: definition lookup, reading buffers, prompting the user and
//! applying edits.

use crate::construct::TextSpan;
use async_trait::async_trait;
use std::fmt;

/// Opaque identity of a buffer (typically a document URI).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BufferId(String);

impl BufferId {
    /// Wrap a host-defined buffer identity.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The identity as a string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BufferId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for BufferId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// A resolved definition: a buffer plus the span of the definition inside it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefinitionTarget {
    /// Buffer holding the definition.
    pub buffer: BufferId,
    /// Span of the definition (usually the declared identifier), in character offsets.
    pub span: TextSpan,
}

impl DefinitionTarget {
    /// Create a new definition target.
    pub fn new(buffer: BufferId, span: TextSpan) -> Self {
        Self { buffer, span }
    }
}

/// A single replacement in a buffer, expressed in character offsets of the pre-edit text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextEdit {
    /// Replaced range (empty for a pure insertion).
    pub range: TextSpan,
    /// Inserted text.
    pub text: String,
}

impl TextEdit {
    /// Insert `text` at `offset`.
    pub fn insert(offset: usize, text: impl Into<String>) -> Self {
        Self {
            range: TextSpan::empty(offset),
            text: text.into(),
        }
    }

    /// Replace `range` with `text`.
    pub fn replace(range: TextSpan, text: impl Into<String>) -> Self {
        Self {
            range,
            text: text.into(),
        }
    }
}

/// Failures of host-provided services.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HostError {
    /// The host has no buffer with this identity.
    #[error("buffer not found: {0}")]
    BufferNotFound(BufferId),
    /// Reading a buffer failed.
    #[error("failed to read {buffer}: {message}")]
    Io {
        /// Buffer being read.
        buffer: BufferId,
        /// Underlying error description.
        message: String,
    },
    /// The host refused or failed to apply an edit.
    #[error("edit rejected by {buffer}: {message}")]
    EditRejected {
        /// Buffer being edited.
        buffer: BufferId,
        /// Underlying error description.
        message: String,
    },
    /// Any other service failure.
    #[error("{0}")]
    Other(String),
}

/// Environment services used by an insertion session.
///
/// Asynchronous methods are suspension points of the session. Sessions run on a single task, so
/// the returned futures are not required to be `Send`.
#[async_trait(?Send)]
pub trait Host {
    /// Resolve the definition(s) of the symbol at `offset` in `buffer`. May return no targets.
    async fn find_definition(
        &self,
        buffer: &BufferId,
        offset: usize,
    ) -> Result<Vec<DefinitionTarget>, HostError>;

    /// Read the full text of `buffer`.
    async fn open_buffer(&self, buffer: &BufferId) -> Result<String, HostError>;

    /// Ask the user for a value, pre-filled with `default_value`. `Ok(None)` means cancelled.
    async fn prompt_user(&self, default_value: &str) -> Result<Option<String>, HostError>;

    /// Apply one edit to `buffer`. Must complete before the next edit is issued.
    fn apply_edit(&self, buffer: &BufferId, edit: &TextEdit) -> Result<(), HostError>;
}
