//! Commented copies of source files.
//!
//! Each described entity or method gets its comment inserted directly above
//! its declaration line, indented like that line. The copy lands under the
//! output directory at its package path as `<Stem>_commented.<ext>`.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::describe::Describer;
use crate::error::{ComprehendError, Result};
use crate::model::{SourceUnit, DEFAULT_PACKAGE};

/// Comment text keyed by 1-based start line.
pub type CommentMap = BTreeMap<usize, String>;

/// Ask the describer for every entity and method of a unit.
///
/// Entries whose start line is unknown are skipped since they cannot be
/// placed.
pub fn collect_comments(unit: &SourceUnit, describer: &dyn Describer) -> CommentMap {
    let mut comments = CommentMap::new();
    for entity in &unit.types {
        if entity.start_line > 0 {
            comments.insert(
                entity.start_line,
                describer.describe(&entity.code_snippet, entity.kind.as_str()),
            );
        }
        for method in &entity.methods {
            if method.start_line > 0 {
                comments.insert(
                    method.start_line,
                    describer.describe(&method.code_snippet, "method"),
                );
            }
        }
    }
    debug!(path = %unit.path.display(), comments = comments.len(), "collected comments");
    comments
}

/// Interleave comments with the original lines.
pub fn render_commented<S: AsRef<str>>(lines: &[S], comments: &CommentMap) -> String {
    let mut output = String::new();
    for (i, line) in lines.iter().enumerate() {
        let line = line.as_ref();
        if let Some(comment) = comments.get(&(i + 1)) {
            let indent = &line[..line.len() - line.trim_start_matches(' ').len()];
            for comment_line in comment.split('\n') {
                output.push_str(indent);
                output.push_str(comment_line);
                output.push('\n');
            }
        }
        output.push_str(line);
    }
    output
}

/// Where the commented copy of `unit` is written.
pub fn commented_path(unit: &SourceUnit, output_dir: &Path) -> PathBuf {
    let mut dir = output_dir.to_path_buf();
    if unit.package != DEFAULT_PACKAGE {
        dir.extend(unit.package.split('.'));
    }
    let stem = unit
        .path
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| "unnamed".to_string());
    let file_name = match unit.path.extension() {
        Some(ext) => format!("{}_commented.{}", stem, ext.to_string_lossy()),
        None => format!("{}_commented", stem),
    };
    dir.join(file_name)
}

/// Write the commented copy, creating package directories as needed.
pub fn write_commented_file<S: AsRef<str>>(
    unit: &SourceUnit,
    lines: &[S],
    comments: &CommentMap,
    output_dir: &Path,
) -> Result<PathBuf> {
    let path = commented_path(unit, output_dir);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|source| ComprehendError::Write {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    fs::write(&path, render_commented(lines, comments)).map_err(|source| {
        ComprehendError::Write {
            path: path.clone(),
            source,
        }
    })?;
    debug!(path = %path.display(), "wrote commented file");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::describe::Placeholder;
    use crate::extract::extract_source;
    use crate::symbols::SymbolIndex;
    use crate::syntax::source_lines;
    use tempfile::tempdir;

    struct Echo;

    impl Describer for Echo {
        fn describe(&self, code: &str, role: &str) -> String {
            let first = code.lines().next().unwrap_or("").trim();
            format!("/** {role}: {first} */")
        }
    }

    const SOURCE: &str = "package com.shop;\n\
                          \n\
                          public class Cart {\n\
                          \x20   private int size;\n\
                          \n\
                          \x20   public int size() {\n\
                          \x20       return size;\n\
                          \x20   }\n\
                          }\n";

    fn unit() -> SourceUnit {
        extract_source(Path::new("src/Cart.java"), SOURCE, &SymbolIndex::new()).unwrap()
    }

    #[test]
    fn test_collect_comments_keys_by_line() {
        let comments = collect_comments(&unit(), &Echo);
        assert_eq!(comments.len(), 2);
        assert_eq!(comments[&3], "/** class: public class Cart { */");
        assert_eq!(comments[&6], "/** method: public int size() { */");
    }

    #[test]
    fn test_unknown_start_line_skipped() {
        let mut unit = unit();
        unit.types[0].start_line = 0;
        unit.types[0].methods[0].start_line = 0;
        assert!(collect_comments(&unit, &Placeholder).is_empty());
    }

    #[test]
    fn test_render_indents_comment_like_target_line() {
        let lines = source_lines("class A {\n    void m() {}\n}\n");
        let mut comments = CommentMap::new();
        comments.insert(2, "/**\n * Does m.\n */".to_string());
        comments.insert(9, "/** past the end */".to_string());

        assert_eq!(
            render_commented(&lines, &comments),
            "class A {\n    /**\n     * Does m.\n     */\n    void m() {}\n}\n"
        );
    }

    #[test]
    fn test_commented_path_follows_package() {
        let dir = Path::new("out");
        assert_eq!(
            commented_path(&unit(), dir),
            dir.join("com").join("shop").join("Cart_commented.java")
        );

        let mut loose = unit();
        loose.package = DEFAULT_PACKAGE.to_string();
        assert_eq!(commented_path(&loose, dir), dir.join("Cart_commented.java"));
    }

    #[test]
    fn test_write_commented_file() {
        let out = tempdir().unwrap();
        let unit = unit();
        let comments = collect_comments(&unit, &Echo);
        let lines = source_lines(SOURCE);

        let path = write_commented_file(&unit, &lines, &comments, out.path()).unwrap();
        let written = fs::read_to_string(&path).unwrap();
        assert!(path.ends_with("com/shop/Cart_commented.java"));
        assert!(written.contains("/** class: public class Cart { */\npublic class Cart {"));
        assert!(
            written.contains("    /** method: public int size() { */\n    public int size() {")
        );
        assert_eq!(written.lines().count(), SOURCE.lines().count() + 2);
    }
}
