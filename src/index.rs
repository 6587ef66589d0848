//! Per-file symbol tables: the module a file declares, what it imports and
//! which types it defines.

use std::path::{Path, PathBuf};
use std::thread;

use crossbeam_channel::unbounded;
use serde::Serialize;

use crate::parser::{self, ast::{ImportDecl, ParseResult, Statement}};
use crate::span::Position;

/// A file's path and full text, as handed to the resolver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    pub path: PathBuf,
    pub text: String,
}

impl SourceFile {
    pub fn new(path: impl Into<PathBuf>, text: impl Into<String>) -> Self {
        Self { path: path.into(), text: text.into() }
    }
}

/// A `type` or `type alias` declared in a file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExposedType {
    pub name: String,
    pub position: Position,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FileRecord {
    pub path: PathBuf,
    /// Name from the first module header, if the file has one.
    pub module_name: Option<String>,
    pub imports: Vec<ImportDecl>,
    /// Every declared type in source order. Duplicates are kept.
    pub exposed_types: Vec<ExposedType>,
}

impl FileRecord {
    /// Build the record for a parsed file. A failed parse yields `None` and the
    /// file takes no part in resolution.
    pub fn from_parse(path: impl Into<PathBuf>, result: ParseResult) -> Option<Self> {
        let ParseResult::Parsed(statements) = result else {
            return None;
        };

        let mut record = FileRecord {
            path: path.into(),
            module_name: None,
            imports: Vec::new(),
            exposed_types: Vec::new(),
        };
        for stmt in statements {
            match stmt {
                Statement::Module(m) => {
                    if record.module_name.is_none() {
                        record.module_name = Some(m.name);
                    }
                }
                Statement::Import(import) => record.imports.push(import),
                Statement::Type(t) => record.exposed_types.push(ExposedType {
                    name: t.name,
                    position: t.position,
                }),
                Statement::TypeAlias(a) => record.exposed_types.push(ExposedType {
                    name: a.name,
                    position: a.position,
                }),
            }
        }
        Some(record)
    }

    pub fn from_source(file: &SourceFile) -> Option<Self> {
        Self::from_parse(&file.path, parser::parse(&file.text))
    }

    /// First declaration with this exact name.
    pub fn lookup(&self, name: &str) -> Option<&ExposedType> {
        self.exposed_types.iter().find(|t| t.name == name)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Parse every file on a pool of scoped worker threads. Files whose parse
/// fails are left out. The result is sorted by path.
pub fn index_files(files: &[SourceFile]) -> Vec<FileRecord> {
    if files.is_empty() {
        return Vec::new();
    }
    let workers = thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(4)
        .min(files.len());

    let (job_tx, job_rx) = unbounded::<&SourceFile>();
    let (result_tx, result_rx) = unbounded::<FileRecord>();
    for file in files {
        // Receiver is alive until the scope below ends
        let _ = job_tx.send(file);
    }
    drop(job_tx);

    thread::scope(|scope| {
        for _ in 0..workers {
            let jobs = job_rx.clone();
            let results = result_tx.clone();
            scope.spawn(move || {
                for file in jobs.iter() {
                    match FileRecord::from_source(file) {
                        Some(record) => {
                            let _ = results.send(record);
                        }
                        None => tracing::debug!(path = %file.path.display(), "parse failed, file excluded"),
                    }
                }
            });
        }
    });
    drop(result_tx);

    let mut records: Vec<FileRecord> = result_rx.iter().collect();
    records.sort_by(|a, b| a.path.cmp(&b.path));
    records
}
