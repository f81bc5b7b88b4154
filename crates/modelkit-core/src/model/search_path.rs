//! Module search path for code bundled with models.
//!
//! Loading a model whose flavor ships code makes that code importable by
//! registering the model's code directory here. Entries are canonical paths,
//! kept in lookup order (most recently registered first), and are never
//! removed. A directory registered twice keeps its original position.

use crate::error::ModelkitResult;
use lazy_static::lazy_static;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

/// Ordered list of directories searched for modules.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchPath {
    entries: Vec<PathBuf>,
}

impl SearchPath {
    pub fn new() -> Self {
        Self::default()
    }

    /// Puts `dir` in front of every existing entry.
    ///
    /// Returns `false` without changing the order if the canonical path is
    /// already registered. Fails if `dir` cannot be canonicalized.
    pub fn prepend(&mut self, dir: impl AsRef<Path>) -> ModelkitResult<bool> {
        let canonical = fs::canonicalize(dir.as_ref())?;
        if self.entries.contains(&canonical) {
            return Ok(false);
        }
        self.entries.insert(0, canonical);
        Ok(true)
    }

    pub fn contains(&self, dir: impl AsRef<Path>) -> bool {
        fs::canonicalize(dir.as_ref())
            .map(|canonical| self.entries.contains(&canonical))
            .unwrap_or(false)
    }

    pub fn entries(&self) -> &[PathBuf] {
        &self.entries
    }

    /// Finds the file or package directory for a dotted module name such as
    /// `dummy_package.base`.
    ///
    /// Each entry is tried in order. Leading components must be directories
    /// under the entry; the last component matches a directory of that name
    /// or a file whose stem equals it, with directories taking precedence.
    pub fn resolve(&self, module: &str) -> Option<PathBuf> {
        let parts: Vec<&str> = module.split('.').collect();
        if parts.iter().any(|p| p.is_empty()) {
            return None;
        }
        let (last, parents) = parts.split_last()?;
        self.entries.iter().find_map(|entry| {
            let mut dir = entry.clone();
            for parent in parents {
                dir.push(parent);
                if !dir.is_dir() {
                    return None;
                }
            }
            find_module(&dir, last)
        })
    }
}

fn find_module(dir: &Path, name: &str) -> Option<PathBuf> {
    let package = dir.join(name);
    if package.is_dir() {
        return Some(package);
    }
    let mut files: Vec<PathBuf> = fs::read_dir(dir)
        .ok()?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.is_file() && path.file_stem().is_some_and(|stem| stem == name))
        .collect();
    files.sort();
    files.into_iter().next()
}

lazy_static! {
    static ref GLOBAL_SEARCH_PATH: Arc<Mutex<SearchPath>> = Arc::new(Mutex::new(SearchPath::new()));
}

fn global() -> MutexGuard<'static, SearchPath> {
    GLOBAL_SEARCH_PATH.lock().unwrap_or_else(|poisoned| {
        log::warn!("Search path lock was poisoned; recovering");
        poisoned.into_inner()
    })
}

/// Prepends `dir` to the process-wide search path.
pub fn global_prepend(dir: impl AsRef<Path>) -> ModelkitResult<bool> {
    global().prepend(dir)
}

/// Snapshot of the process-wide search path.
pub fn global_entries() -> Vec<PathBuf> {
    global().entries().to_vec()
}

pub fn global_contains(dir: impl AsRef<Path>) -> bool {
    global().contains(dir)
}

/// Resolves a dotted module name against the process-wide search path.
pub fn global_resolve(module: &str) -> Option<PathBuf> {
    global().resolve(module)
}
