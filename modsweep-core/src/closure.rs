//! Dependency closure: which modules the entry point can actually load.
//!
//! The reference graph is never built up front. It is discovered level by
//! level with a breadth-first walk that asks a [`MetadataReader`] for each
//! file's references and resolves each newly seen name to a file through a
//! [`ModuleIndex`].
//!
//! Performance characteristics:
//! - Each file is read at most once (visited set keyed by path)
//! - Reads within one BFS level run in parallel on Rayon's pool; results
//!   are merged in frontier order, so the used set is identical to a
//!   sequential walk

use rayon::prelude::*;
use serde::Serialize;
use std::collections::{BTreeSet, HashSet};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::metadata::MetadataReader;
use crate::model::ModuleName;
use crate::scan::ModuleIndex;

/// Names reachable from the entry module, entry included.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct UsedSet(BTreeSet<ModuleName>);

impl UsedSet {
    /// Returns true if the name was not present.
    pub fn insert(&mut self, name: ModuleName) -> bool {
        self.0.insert(name)
    }

    pub fn contains(&self, name: &ModuleName) -> bool {
        self.0.contains(name)
    }

    pub fn contains_str(&self, name: &str) -> bool {
        self.0.contains(&ModuleName::new(name))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Names in case-insensitive order.
    pub fn iter(&self) -> impl Iterator<Item = &ModuleName> {
        self.0.iter()
    }
}

impl FromIterator<ModuleName> for UsedSet {
    fn from_iter<I: IntoIterator<Item = ModuleName>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Outcome of one closure walk.
#[derive(Debug, Clone, Default)]
pub struct Closure {
    pub used: UsedSet,
    /// Files the reader could not parse; their branches were not expanded
    pub unreadable: Vec<PathBuf>,
    /// Referenced names with no matching file under the scan root
    pub unresolved: BTreeSet<ModuleName>,
}

/// Breadth-first walker over lazily discovered module references.
pub struct ClosureWalker<'a, R: MetadataReader + ?Sized> {
    reader: &'a R,
    index: &'a ModuleIndex,
}

impl<'a, R: MetadataReader + ?Sized> ClosureWalker<'a, R> {
    pub fn new(reader: &'a R, index: &'a ModuleIndex) -> Self {
        Self { reader, index }
    }

    /// Computes the closure of the module at `entry`.
    ///
    /// The entry's own name (file stem) is always in the result. A name is
    /// added when first referenced, whether or not its file resolves or
    /// reads; only successfully read files contribute further names.
    pub fn walk(&self, entry: &Path) -> Closure {
        let mut closure = Closure::default();
        let mut visited: HashSet<PathBuf> = HashSet::new();

        if let Some(name) = ModuleName::from_path(entry) {
            closure.used.insert(name);
        }

        let mut frontier = vec![entry.to_path_buf()];
        let mut depth = 0usize;

        while !frontier.is_empty() {
            frontier.retain(|path| visited.insert(path.clone()));

            let reads: Vec<_> = frontier
                .par_iter()
                .map(|path| (path, self.reader.read(path)))
                .collect();

            let mut next = Vec::new();
            for (path, read) in reads {
                let metadata = match read {
                    Ok(m) => m,
                    Err(e) => {
                        debug!(path = %path.display(), error = %e, "skipping unreadable module");
                        closure.unreadable.push(path.clone());
                        continue;
                    }
                };

                for reference in metadata.references {
                    let name = ModuleName::new(reference);
                    if !closure.used.insert(name.clone()) {
                        continue;
                    }
                    match self.index.resolve(&name) {
                        Some(file) => next.push(file.to_path_buf()),
                        None => {
                            closure.unresolved.insert(name);
                        }
                    }
                }
            }

            debug!(depth, discovered = next.len(), "closure level complete");
            frontier = next;
            depth += 1;
        }

        info!(
            entry = %entry.display(),
            used = closure.used.len(),
            unreadable = closure.unreadable.len(),
            unresolved = closure.unresolved.len(),
            "dependency closure computed"
        );
        closure
    }
}
