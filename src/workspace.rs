//! Project discovery: which `.elm` files make up a project, and reading them.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use walkdir::{DirEntry, WalkDir};

use crate::diagnostics::WorkspaceError;
use crate::index::SourceFile;

pub const MANIFEST_FILE: &str = "elm.json";

/// Directories never searched for sources.
const SKIPPED_DIRS: &[&str] = &["elm-stuff", "node_modules"];

/// The parts of `elm.json` that matter for finding sources.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ElmManifest {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    #[serde(rename = "source-directories")]
    pub source_directories: Option<Vec<String>>,
}

impl ElmManifest {
    /// Source directories relative to the project root. Packages always keep
    /// their sources in `src`.
    pub fn source_dirs(&self) -> Vec<String> {
        match (&self.source_directories, self.kind.as_deref()) {
            (Some(dirs), _) => dirs.clone(),
            (None, Some("package")) => vec!["src".to_string()],
            (None, _) => Vec::new(),
        }
    }
}

/// Read `root/elm.json`. A missing manifest is not an error.
pub fn read_manifest(root: &Path) -> Result<Option<ElmManifest>, WorkspaceError> {
    let path = root.join(MANIFEST_FILE);
    if !path.is_file() {
        return Ok(None);
    }
    let content = fs::read_to_string(&path).map_err(|e| WorkspaceError::io(&path, e))?;
    let manifest = serde_json::from_str(&content)
        .map_err(|e| WorkspaceError::manifest(e.to_string(), path.clone()))?;
    Ok(Some(manifest))
}

/// Directories to walk for sources. Falls back to the root itself when there
/// is no usable manifest.
pub fn source_roots(root: &Path) -> Vec<PathBuf> {
    let dirs = match read_manifest(root) {
        Ok(Some(manifest)) => manifest.source_dirs(),
        Ok(None) => Vec::new(),
        Err(e) => {
            tracing::warn!(root = %root.display(), error = %e, "ignoring manifest, searching the whole project");
            Vec::new()
        }
    };
    if dirs.is_empty() {
        vec![root.to_path_buf()]
    } else {
        dirs.iter().map(|d| root.join(d)).collect()
    }
}

/// Every `.elm` file of the project rooted at `root`, sorted.
pub fn find_source_files(root: &Path) -> Result<Vec<PathBuf>, WorkspaceError> {
    if !root.is_dir() {
        return Err(WorkspaceError::missing_root(root));
    }

    let mut files = Vec::new();
    for dir in source_roots(root) {
        let walker = WalkDir::new(&dir).follow_links(true).into_iter();
        for entry in walker.filter_entry(|e| !is_skipped_dir(e)) {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    tracing::warn!(dir = %dir.display(), error = %e, "skipping unreadable directory entry");
                    continue;
                }
            };
            if entry.file_type().is_file() && entry.path().extension().and_then(|s| s.to_str()) == Some("elm") {
                files.push(entry.into_path());
            }
        }
    }
    files.sort();
    files.dedup();
    tracing::debug!(root = %root.display(), count = files.len(), "found source files");
    Ok(files)
}

fn is_skipped_dir(entry: &DirEntry) -> bool {
    if entry.depth() == 0 || !entry.file_type().is_dir() {
        return false;
    }
    let name = entry.file_name().to_string_lossy();
    name.starts_with('.') || SKIPPED_DIRS.iter().any(|d| *d == name)
}

pub fn read_source(path: &Path) -> Result<SourceFile, WorkspaceError> {
    let text = fs::read_to_string(path).map_err(|e| WorkspaceError::io(path, e))?;
    Ok(SourceFile::new(path, text))
}

/// Find and read every source file. Files that cannot be read are left out.
pub fn load_project(root: &Path) -> Result<Vec<SourceFile>, WorkspaceError> {
    let paths = find_source_files(root)?;
    let mut files = Vec::with_capacity(paths.len());
    for path in paths {
        match read_source(&path) {
            Ok(file) => files.push(file),
            Err(e) => tracing::warn!(error = %e, "excluding file"),
        }
    }
    Ok(files)
}

/// The nearest ancestor of `file` holding an `elm.json`, else the file's own
/// directory.
pub fn find_project_root(file: &Path) -> PathBuf {
    let dir = match file.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    dir.ancestors()
        .map(|d| if d.as_os_str().is_empty() { Path::new(".") } else { d })
        .find(|d| d.join(MANIFEST_FILE).is_file())
        .unwrap_or(dir)
        .to_path_buf()
}
