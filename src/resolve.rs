use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::depgraph::DependencyGraph;
use crate::index::{self, FileRecord, SourceFile};
use crate::span::Position;

/// Where a type is declared.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Definition {
    pub path: PathBuf,
    pub name: String,
    pub position: Position,
}

/// A built dependency graph that can answer several lookups.
#[derive(Debug, Clone, Default)]
pub struct ProjectIndex {
    graph: DependencyGraph,
}

impl ProjectIndex {
    /// Parse and index every file, then build the graph.
    pub fn build(files: &[SourceFile]) -> Self {
        Self::from_records(index::index_files(files))
    }

    pub fn from_records(records: Vec<FileRecord>) -> Self {
        Self { graph: DependencyGraph::build(records) }
    }

    pub fn graph(&self) -> &DependencyGraph {
        &self.graph
    }

    /// Look `symbol` up from `requesting`: the file's own declarations first,
    /// then each direct import in import order. Imports of imports are not
    /// searched, and the symbol is matched by its exact text.
    pub fn resolve(&self, requesting: &Path, symbol: &str) -> Option<Definition> {
        let Some(node) = self.graph.node(requesting) else {
            tracing::debug!(path = %requesting.display(), "requesting file is not indexed");
            return None;
        };

        let found = |record: &FileRecord| {
            record.lookup(symbol).map(|ty| Definition {
                path: record.path.clone(),
                name: ty.name.clone(),
                position: ty.position,
            })
        };

        found(&node.record).or_else(|| {
            node.dependencies
                .iter()
                .filter_map(|dep| self.graph.node(dep))
                .find_map(|dep| found(&dep.record))
        })
    }
}

/// Index every file and resolve one symbol. Nothing is kept between calls.
pub fn resolve_definition(files: &[SourceFile], requesting: &Path, symbol: &str) -> Option<Definition> {
    ProjectIndex::build(files).resolve(requesting, symbol)
}
