//! File-system host: buffers are files, definitions come from a plain-text search of the
//! declaration files, the prompt reads stdin.

use crate::error::CliError;
use async_trait::async_trait;
use handler_core::{BufferId, DefinitionTarget, Host, HostError, LineIndex, TextEdit, TextSpan};
use handler_core_lsp::{LspTextEdit, apply_text_edits, buffer_id_for_path, path_for_buffer_id};
use std::cell::RefCell;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::debug;

pub struct FsHost {
    main: BufferId,
    /// Buffers searched for definitions, in order.
    search_order: Vec<BufferId>,
    buffers: RefCell<HashMap<BufferId, String>>,
    dirty: RefCell<Vec<BufferId>>,
}

impl FsHost {
    /// Load the edited file and the declaration files.
    pub async fn load(file: &Path, declarations: &[PathBuf]) -> Result<Self, CliError> {
        let mut buffers = HashMap::new();
        let mut search_order = Vec::new();

        for path in declarations.iter().map(PathBuf::as_path).chain([file]) {
            let text = read_file(path).await?;
            let id = buffer_id_for_path(path);
            search_order.push(id.clone());
            buffers.insert(id, text);
        }

        Ok(Self {
            main: buffer_id_for_path(file),
            search_order,
            buffers: RefCell::new(buffers),
            dirty: RefCell::new(Vec::new()),
        })
    }

    pub fn main_buffer(&self) -> &BufferId {
        &self.main
    }

    pub fn text(&self, buffer: &BufferId) -> Option<String> {
        self.buffers.borrow().get(buffer).cloned()
    }

    /// Write every edited buffer back to disk.
    pub async fn write_back(&self) -> Result<(), CliError> {
        let dirty = self.dirty.borrow().clone();
        for buffer in dirty {
            let (Some(path), Some(text)) = (path_for_buffer_id(&buffer), self.text(&buffer)) else {
                continue;
            };
            tokio::fs::write(&path, text)
                .await
                .map_err(|source| CliError::Write { path, source })?;
        }
        Ok(())
    }
}

async fn read_file(path: &Path) -> Result<String, CliError> {
    tokio::fs::read_to_string(path)
        .await
        .map_err(|source| CliError::Read {
            path: path.to_path_buf(),
            source,
        })
}

fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '$'
}

/// The identifier starting at (or containing) `offset`.
fn identifier_at(text: &str, offset: usize) -> Option<String> {
    let chars = text.chars().collect::<Vec<_>>();
    let mut start = offset.min(chars.len());
    while start > 0 && is_ident_char(chars[start - 1]) {
        start -= 1;
    }
    let name = chars[start..]
        .iter()
        .take_while(|c| is_ident_char(**c))
        .collect::<String>();
    (!name.is_empty()).then_some(name)
}

/// Character offset of a declaration of `name` in `text`: a member (`name:`, `name?:`, `name(`)
/// or a class (`class name`).
pub fn find_declaration(text: &str, name: &str) -> Option<usize> {
    text.match_indices(name).find_map(|(byte, _)| {
        let before = text[..byte].chars().next_back();
        let after = &text[byte + name.len()..];
        if before.is_some_and(is_ident_char) || after.chars().next().is_some_and(is_ident_char) {
            return None;
        }

        let after = after.trim_start();
        let is_member = after.starts_with(':') || after.starts_with("?:") || after.starts_with('(');
        let is_class = text[..byte].trim_end().ends_with("class")
            && text[..byte].ends_with(char::is_whitespace);
        (is_member || is_class).then(|| text[..byte].chars().count())
    })
}

#[async_trait(?Send)]
impl Host for FsHost {
    async fn find_definition(
        &self,
        buffer: &BufferId,
        offset: usize,
    ) -> Result<Vec<DefinitionTarget>, HostError> {
        let text = self.open_buffer(buffer).await?;
        let Some(name) = identifier_at(&text, offset) else {
            return Ok(Vec::new());
        };

        let buffers = self.buffers.borrow();
        let targets = self
            .search_order
            .iter()
            .filter_map(|id| {
                let start = find_declaration(buffers.get(id)?, &name)?;
                let span = TextSpan::new(start, start + name.chars().count());
                Some(DefinitionTarget::new(id.clone(), span))
            })
            .collect::<Vec<_>>();
        debug!(identifier = %name, found = targets.len(), "definition search");
        Ok(targets)
    }

    async fn open_buffer(&self, buffer: &BufferId) -> Result<String, HostError> {
        if let Some(text) = self.text(buffer) {
            return Ok(text);
        }

        let path = path_for_buffer_id(buffer).ok_or_else(|| HostError::BufferNotFound(buffer.clone()))?;
        let text = tokio::fs::read_to_string(&path)
            .await
            .map_err(|err| HostError::Io {
                buffer: buffer.clone(),
                message: err.to_string(),
            })?;
        self.buffers
            .borrow_mut()
            .insert(buffer.clone(), text.clone());
        Ok(text)
    }

    async fn prompt_user(&self, default_value: &str) -> Result<Option<String>, HostError> {
        let io_error = |err: std::io::Error| HostError::Other(format!("prompt failed: {err}"));

        let mut stderr = tokio::io::stderr();
        stderr
            .write_all(format!("handler name [{default_value}]: ").as_bytes())
            .await
            .map_err(io_error)?;
        stderr.flush().await.map_err(io_error)?;

        let mut line = String::new();
        let read = BufReader::new(tokio::io::stdin())
            .read_line(&mut line)
            .await
            .map_err(io_error)?;
        // EOF cancels; an empty line keeps the default.
        Ok((read > 0).then(|| line.trim().to_string()))
    }

    fn apply_edit(&self, buffer: &BufferId, edit: &TextEdit) -> Result<(), HostError> {
        let mut buffers = self.buffers.borrow_mut();
        let text = buffers
            .get_mut(buffer)
            .ok_or_else(|| HostError::BufferNotFound(buffer.clone()))?;

        let line_index = LineIndex::from_text(text);
        if edit.range.end > line_index.char_count() {
            return Err(HostError::EditRejected {
                buffer: buffer.clone(),
                message: format!("range {}..{} is past the end", edit.range.start, edit.range.end),
            });
        }
        let lsp_edit = LspTextEdit::from_text_edit(&line_index, edit);
        *text = apply_text_edits(text, std::slice::from_ref(&lsp_edit));

        let mut dirty = self.dirty.borrow_mut();
        if !dirty.contains(buffer) {
            dirty.push(buffer.clone());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_member_declarations() {
        let text = "interface P {\n  onClickOutside?: () => void;\n  onClick?: (e: E) => void;\n  onOpen(): void;\n}\n";
        assert_eq!(find_declaration(text, "onClick"), Some(text.find("onClick?").unwrap()));
        assert_eq!(find_declaration(text, "onOpen"), Some(text.find("onOpen(").unwrap()));
        assert_eq!(find_declaration(text, "onClose"), None);
    }

    #[test]
    fn test_find_class_declaration() {
        let text = "import { Base } from './base';\nexport class Base extends Component {}\n";
        assert_eq!(find_declaration(text, "Base"), Some(text.find("Base extends").unwrap()));
    }

    #[test]
    fn test_identifier_at() {
        assert_eq!(identifier_at("<b onClick />", 3).as_deref(), Some("onClick"));
        assert_eq!(identifier_at("<b onClick />", 6).as_deref(), Some("onClick"));
        assert_eq!(identifier_at("<b  />", 3), None);
    }
}
