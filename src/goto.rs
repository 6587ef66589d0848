use std::path::Path;

use crate::index::SourceFile;
use crate::line_index::LineIndex;
use crate::resolve::{resolve_definition, Definition};

/// The identifier under a zero-based line/column caret, if any.
pub fn word_at(source: &str, line: usize, column: usize) -> Option<&str> {
    let offset = LineIndex::new(source).offset(line, column)?;
    word_at_offset(source, offset)
}

/// Extract the identifier word at the given byte offset in source.
fn word_at_offset(source: &str, offset: usize) -> Option<&str> {
    if offset >= source.len() {
        return None;
    }
    let bytes = source.as_bytes();
    if !is_ident_char(bytes[offset]) {
        return None;
    }
    let mut start = offset;
    while start > 0 && is_ident_char(bytes[start - 1]) {
        start -= 1;
    }
    let mut end = offset;
    while end < bytes.len() && is_ident_char(bytes[end]) {
        end += 1;
    }
    source.get(start..end)
}

fn is_ident_char(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

/// Go to the definition of the identifier under the caret in `path`.
pub fn definition_at(files: &[SourceFile], path: &Path, line: usize, column: usize) -> Option<Definition> {
    let file = files.iter().find(|f| f.path == path)?;
    let word = word_at(&file.text, line, column)?;
    resolve_definition(files, path, word)
}
