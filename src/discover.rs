//
//  discover.rs
//  Comprehender
//
//  Created by hak (tharun)
//

use ignore::WalkBuilder;
use regex::Regex;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::error::{ComprehendError, Result};

/// Directories that never hold project sources, even without .gitignore.
const BUILTIN_IGNORE: &[&str] = &[
    ".git",
    ".svn",
    ".hg",
    ".gradle",
    ".idea",
    "target",
    "build",
    "out",
    "node_modules",
];

/// Per-project ignore file, read with .gitignore syntax.
pub const IGNORE_FILE_NAME: &str = ".comprehenderignore";

/// Source files found under a root.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceSet {
    /// Every file with the wanted extension; all of them feed the symbol index.
    pub all: Vec<PathBuf>,
    /// The files left after applying the exclude patterns; these get extracted.
    pub selected: Vec<PathBuf>,
}

impl SourceSet {
    pub fn excluded_count(&self) -> usize {
        self.all.len() - self.selected.len()
    }
}

/// Compile `--exclude` style patterns.
pub fn compile_patterns<S: AsRef<str>>(patterns: &[S]) -> Result<Vec<Regex>> {
    patterns
        .iter()
        .map(|p| Regex::new(p.as_ref()).map_err(ComprehendError::from))
        .collect()
}

/// Forward-slash form of a path, the form exclude patterns are matched against.
pub fn slash_path(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

fn is_builtin_ignored(path: &Path) -> bool {
    path.components().any(|c| match c {
        std::path::Component::Normal(name) => BUILTIN_IGNORE.contains(&name.to_str().unwrap_or("")),
        _ => false,
    })
}

/// Walk `root` and collect files ending in `.{extension}`, sorted by path.
pub fn discover_sources(root: &Path, extension: &str, exclude: &[Regex]) -> Result<SourceSet> {
    if !root.is_dir() {
        return Err(ComprehendError::SourceDirMissing(root.to_path_buf()));
    }

    let mut all: Vec<PathBuf> = WalkBuilder::new(root)
        .hidden(true)
        .git_ignore(true)
        .git_global(true)
        .git_exclude(true)
        .add_custom_ignore_filename(IGNORE_FILE_NAME)
        .build()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_some_and(|ft| ft.is_file()))
        .filter(|entry| {
            let relative = entry.path().strip_prefix(root).unwrap_or(entry.path());
            !is_builtin_ignored(relative)
        })
        .filter(|entry| entry.path().extension().is_some_and(|ext| ext == extension))
        .map(|entry| entry.into_path())
        .collect();
    all.sort();

    let selected: Vec<PathBuf> = all
        .iter()
        .filter(|path| {
            let text = slash_path(path);
            let excluded = exclude.iter().any(|pattern| pattern.is_match(&text));
            if excluded {
                debug!(path = %text, "skipping excluded file");
            }
            !excluded
        })
        .cloned()
        .collect();

    info!(
        found = all.len(),
        selected = selected.len(),
        root = %root.display(),
        "discovered source files"
    );
    Ok(SourceSet { all, selected })
}
