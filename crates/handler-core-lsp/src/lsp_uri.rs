//! `file://` URIs as buffer identities.
//!
//! Hosts backed by a language server identify buffers by document URI. These helpers convert
//! between local paths and such [`BufferId`]s.

use handler_core::BufferId;
use std::path::{Path, PathBuf};

const HEX: &[u8; 16] = b"0123456789ABCDEF";

fn is_unreserved(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || matches!(byte, b'-' | b'.' | b'_' | b'~' | b'/')
}

/// Percent-encode a URI path, keeping unreserved bytes and `/`.
pub fn percent_encode_path(path: &str) -> String {
    path.bytes().fold(String::with_capacity(path.len()), |mut out, byte| {
        if is_unreserved(byte) {
            out.push(byte as char);
        } else {
            out.push('%');
            out.push(HEX[usize::from(byte >> 4)] as char);
            out.push(HEX[usize::from(byte & 0x0f)] as char);
        }
        out
    })
}

/// Decode `%XX` escapes; malformed escapes are kept verbatim.
pub fn percent_decode_path(path: &str) -> String {
    let bytes = path.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        let escaped = (bytes[i] == b'%')
            .then(|| path.get(i + 1..i + 3))
            .flatten()
            .and_then(|hex| u8::from_str_radix(hex, 16).ok());
        match escaped {
            Some(byte) => {
                out.push(byte);
                i += 3;
            }
            None => {
                out.push(bytes[i]);
                i += 1;
            }
        }
    }
    String::from_utf8_lossy(&out).into_owned()
}

/// The `file://` buffer identity of a local path (made absolute when possible).
pub fn buffer_id_for_path(path: &Path) -> BufferId {
    let absolute = std::fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());
    let mut path = absolute.to_string_lossy().replace('\\', "/");
    if !path.starts_with('/') {
        path.insert(0, '/');
    }
    BufferId::new(format!("file://{}", percent_encode_path(&path)))
}

/// The local path of a `file://` buffer identity.
pub fn path_for_buffer_id(buffer: &BufferId) -> Option<PathBuf> {
    let rest = buffer.as_str().strip_prefix("file://")?;
    let rest = rest.strip_prefix("localhost").unwrap_or(rest);
    let mut path = percent_decode_path(rest);

    // `/C:/dir` -> `C:/dir`
    if cfg!(windows) && path.get(2..3) == Some(":") {
        path.remove(0);
    }
    Some(PathBuf::from(path))
}
