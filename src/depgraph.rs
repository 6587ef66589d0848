//! File-level dependency graph, built from the import lists of the indexed
//! files. Edges are direct imports only; the graph is not transitively closed.

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::index::FileRecord;

/// One file and the files its imports resolve to.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphNode {
    pub record: FileRecord,
    /// Ordered by first import, de-duplicated, never the file itself.
    pub dependencies: Vec<PathBuf>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct DependencyGraph {
    nodes: BTreeMap<PathBuf, GraphNode>,
    /// Module name → owning file.
    modules: HashMap<String, PathBuf>,
    /// Module names declared by more than one file.
    ambiguous: Vec<String>,
}

impl DependencyGraph {
    /// Build the graph. Files are visited in path order, so when two files
    /// declare the same module the one with the greater path owns it.
    pub fn build(records: Vec<FileRecord>) -> Self {
        let mut records = records;
        records.sort_by(|a, b| a.path.cmp(&b.path));

        let mut graph = DependencyGraph::default();
        for record in &records {
            let Some(name) = &record.module_name else { continue };
            if let Some(previous) = graph.modules.insert(name.clone(), record.path.clone()) {
                tracing::warn!(
                    module = %name,
                    previous = %previous.display(),
                    winner = %record.path.display(),
                    "module declared by more than one file"
                );
                if !graph.ambiguous.contains(name) {
                    graph.ambiguous.push(name.clone());
                }
            }
        }

        for record in records {
            let path = record.path.clone();
            let imports: Vec<String> = record.imports.iter().map(|i| i.module.clone()).collect();
            graph.nodes.insert(path.clone(), GraphNode { record, dependencies: Vec::new() });
            for module in imports {
                match graph.modules.get(&module).cloned() {
                    Some(target) => graph.add_edge(&path, target),
                    None => tracing::debug!(
                        file = %path.display(),
                        module = %module,
                        "import does not resolve to a project file"
                    ),
                }
            }
        }
        graph
    }

    /// Add a dependency edge from `from` to `to`. Deduplicates; self-edges are
    /// ignored.
    fn add_edge(&mut self, from: &Path, to: PathBuf) {
        if from == to.as_path() {
            return;
        }
        if let Some(node) = self.nodes.get_mut(from) {
            if !node.dependencies.contains(&to) {
                node.dependencies.push(to);
            }
        }
    }

    pub fn node(&self, path: &Path) -> Option<&GraphNode> {
        self.nodes.get(path)
    }

    /// Direct dependencies of a file, or an empty slice for unknown files.
    pub fn dependencies_of(&self, path: &Path) -> &[PathBuf] {
        self.nodes.get(path).map(|n| n.dependencies.as_slice()).unwrap_or(&[])
    }

    /// The file owning a module name.
    pub fn module_path(&self, module: &str) -> Option<&Path> {
        self.modules.get(module).map(PathBuf::as_path)
    }

    pub fn ambiguous_modules(&self) -> &[String] {
        &self.ambiguous
    }

    /// All nodes in path order.
    pub fn files(&self) -> impl Iterator<Item = &GraphNode> {
        self.nodes.values()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
