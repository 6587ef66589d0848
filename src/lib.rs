pub mod span;
pub mod line_index;
pub mod diagnostics;
pub mod lexer;
pub mod parser;
pub mod index;
pub mod depgraph;
pub mod resolve;
pub mod workspace;
pub mod goto;

use diagnostics::WorkspaceError;
use std::path::Path;

pub use index::{FileRecord, SourceFile};
pub use parser::ast::{ParseResult, Statement};
pub use parser::parse;
pub use resolve::{resolve_definition, Definition, ProjectIndex};

/// What to look up: a type name, or whatever identifier sits under a
/// zero-based caret in the requesting file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Query<'a> {
    Symbol(&'a str),
    Caret { line: usize, column: usize },
}

/// Load the project rooted at `root` and resolve `query` as seen from `file`
/// (read → parse → index → graph → lookup). Both paths are canonicalized so
/// `file` matches the paths found by walking the project.
pub fn find_definition(root: &Path, file: &Path, query: Query<'_>) -> Result<Option<Definition>, WorkspaceError> {
    if !root.is_dir() {
        return Err(WorkspaceError::missing_root(root));
    }
    let root = root.canonicalize().map_err(|e| WorkspaceError::io(root, e))?;
    let file = file.canonicalize().map_err(|e| WorkspaceError::io(file, e))?;
    let files = workspace::load_project(&root)?;

    Ok(match query {
        Query::Symbol(symbol) => resolve_definition(&files, &file, symbol),
        Query::Caret { line, column } => goto::definition_at(&files, &file, line, column),
    })
}

/// Load and index a whole project.
pub fn index_project(root: &Path) -> Result<ProjectIndex, WorkspaceError> {
    let files = workspace::load_project(root)?;
    Ok(ProjectIndex::build(&files))
}
