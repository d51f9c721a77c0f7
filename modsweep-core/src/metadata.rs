//! Metadata readers: the seam between the closure walker and binary formats.
//!
//! The walker only needs `path -> (name, references)`. The format-specific
//! parsing lives behind [`MetadataReader`] so the same walk runs over real
//! .NET assemblies ([`DotnetReader`]) or a synthetic graph ([`MapReader`]).

use std::collections::HashMap;
use std::path::Path;

use crate::error::{SweepError, SweepResult};
use crate::model::ModuleName;

/// Declared identity and outgoing references of one module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleMetadata {
    pub name: String,
    pub references: Vec<String>,
}

/// Reads a module's declared name and referenced module names.
///
/// Implementations must be `Sync`: the walker reads a BFS level in parallel.
/// A failure is local to the one file and never aborts a walk.
pub trait MetadataReader: Sync {
    fn read(&self, path: &Path) -> SweepResult<ModuleMetadata>;
}

/// Reads .NET assemblies via `dotscope` (Assembly and AssemblyRef tables).
#[cfg(feature = "dotnet")]
#[derive(Debug, Default, Clone, Copy)]
pub struct DotnetReader;

#[cfg(feature = "dotnet")]
impl MetadataReader for DotnetReader {
    fn read(&self, path: &Path) -> SweepResult<ModuleMetadata> {
        let object = dotscope::CilObject::from_file(path)
            .map_err(|e| SweepError::metadata(path, e.to_string()))?;

        let name = match object.assembly() {
            Some(assembly) => assembly.name.clone(),
            None => ModuleName::from_path(path)
                .map(|n| n.as_str().to_string())
                .unwrap_or_default(),
        };

        let references = object
            .refs_assembly()
            .iter()
            .map(|entry| entry.value().name.clone())
            .collect();

        Ok(ModuleMetadata { name, references })
    }
}

/// In-memory reader keyed by case-insensitive file stem.
///
/// Files whose stem is not registered fail to read, like a non-assembly
/// file would with a real reader.
#[derive(Debug, Default, Clone)]
pub struct MapReader {
    modules: HashMap<ModuleName, Vec<String>>,
}

impl MapReader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a module and the names it references.
    pub fn with_module(mut self, name: &str, references: &[&str]) -> Self {
        self.insert(name, references.iter().map(|r| r.to_string()).collect());
        self
    }

    pub fn insert(&mut self, name: &str, references: Vec<String>) {
        self.modules.insert(ModuleName::new(name), references);
    }
}

impl MetadataReader for MapReader {
    fn read(&self, path: &Path) -> SweepResult<ModuleMetadata> {
        let name = ModuleName::from_path(path)
            .ok_or_else(|| SweepError::metadata(path, "no file name"))?;

        match self.modules.get(&name) {
            Some(references) => Ok(ModuleMetadata {
                name: name.as_str().to_string(),
                references: references.clone(),
            }),
            None => Err(SweepError::metadata(path, "not a registered module")),
        }
    }
}
