use ahash::AHashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::engine::codegen;
use crate::helpers;

/// A template file matched by the include pattern, relative to the input dir.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct SourceFile {
    pub path: PathBuf,
    /// Path without its last extension, with `/` separators. Compiled units are
    /// exposed under this key.
    pub identifier: String,
}

impl SourceFile {
    pub fn new(path: PathBuf) -> Self {
        let identifier = helpers::path_to_identifier(&path);
        Self { path, identifier }
    }

    pub fn absolute_path(&self, input_dir: &Path) -> PathBuf {
        input_dir.join(&self.path)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledUnit {
    pub identifier: String,
    pub source: PathBuf,
    pub locale: String,
    pub expression: String,
}

impl CompiledUnit {
    /// `<namespace>["<identifier>"]`
    pub fn target(&self, namespace: &str) -> String {
        format!("{namespace}[{}]", codegen::string_literal(&self.identifier))
    }

    pub fn assignment(&self, namespace: &str) -> String {
        format!("{}={};", self.target(namespace), self.expression)
    }
}

/// All units produced by one pass, in production order.
///
/// Units sharing an identifier are all kept so serialization reproduces the
/// assignment sequence; lookups resolve to the last one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompiledModule {
    units: Vec<CompiledUnit>,
}

impl CompiledModule {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, unit: CompiledUnit) {
        self.units.push(unit);
    }

    pub fn units(&self) -> &[CompiledUnit] {
        &self.units
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    pub fn get(&self, identifier: &str) -> Option<&CompiledUnit> {
        self.units.iter().rev().find(|unit| unit.identifier == identifier)
    }

    /// Identifiers produced by more than one source file, with those files in
    /// production order.
    pub fn collisions(&self) -> Vec<(&str, Vec<&Path>)> {
        let mut by_identifier: AHashMap<&str, Vec<&Path>> = AHashMap::new();
        for unit in &self.units {
            by_identifier
                .entry(unit.identifier.as_str())
                .or_default()
                .push(unit.source.as_path());
        }
        let mut collisions: Vec<_> = by_identifier
            .into_iter()
            .filter(|(_, sources)| sources.len() > 1)
            .collect();
        collisions.sort_by(|a, b| a.0.cmp(b.0));
        collisions
    }
}

#[derive(Debug, Clone, Default)]
pub struct PassReport {
    pub discovered: usize,
    pub compiled: usize,
    pub skipped: usize,
    pub failed: usize,
    pub duration: Duration,
}
