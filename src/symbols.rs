//! Project-wide symbol index (first pass).
//!
//! Maps every class-like declaration name in the project, nested ones
//! included, to its declaring package. The index is only used as a
//! membership test for dependency detection, so a short name declared in two
//! packages keeps whichever file was indexed last.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::model::DEFAULT_PACKAGE;
use crate::parser::parse_source;
use crate::syntax::Node;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymbolIndex {
    entries: BTreeMap<String, String>,
}

impl SymbolIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read and parse every file, indexing the declarations of those that parse.
    ///
    /// Unreadable or unparsable files are logged and skipped.
    pub fn build<P: AsRef<Path>>(paths: &[P]) -> Self {
        let mut index = Self::new();
        let mut skipped = 0usize;

        for path in paths {
            let path = path.as_ref();
            let source = match fs::read_to_string(path) {
                Ok(source) => source,
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "skipping unreadable file");
                    skipped += 1;
                    continue;
                }
            };
            match parse_source(&source) {
                Ok(tree) => index.index_tree(&tree),
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "skipping file during indexing");
                    skipped += 1;
                }
            }
        }

        info!(
            symbols = index.len(),
            files = paths.len(),
            skipped,
            "project symbol index built"
        );
        index
    }

    /// Record every class-like declaration of one parsed file.
    pub fn index_tree(&mut self, tree: &Node) {
        let package = tree.package().unwrap_or(DEFAULT_PACKAGE);
        for (_, decl) in tree.type_declarations() {
            self.insert(&decl.name, package);
        }
    }

    /// Insert a name, returning the package it previously mapped to.
    pub fn insert(&mut self, name: &str, package: &str) -> Option<String> {
        let previous = self.entries.insert(name.to_string(), package.to_string());
        if let Some(old) = previous.as_deref() {
            if old != package {
                debug!(name, old, new = package, "symbol redeclared in another package");
            }
        }
        previous
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn package_of(&self, name: &str) -> Option<&str> {
        self.entries.get(name).map(String::as_str)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
