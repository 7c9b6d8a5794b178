//! File structural extraction (second pass).
//!
//! Turns one file's syntax tree into a [`SourceUnit`]: every top-level
//! class-like declaration with its span, header, members and the project
//! types it depends on. Nested declarations are not emitted on their own, but
//! their members and references count towards the enclosing top-level type.

mod members;
pub mod references;

use std::collections::HashSet;
use std::path::Path;

use crate::error::{ComprehendError, Result};
use crate::model::{SourceUnit, TypeEntity, DEFAULT_PACKAGE};
use crate::parser::parse_source;
use crate::symbols::SymbolIndex;
use crate::syntax::{source_lines, Node, NodeKind, Span, TypeDecl};

pub use references::{dependencies, ReferenceCollector};

/// Extract the structure of an already parsed file.
pub fn extract_unit<S: AsRef<str>>(
    path: &Path,
    tree: &Node,
    lines: &[S],
    index: &SymbolIndex,
) -> Result<SourceUnit> {
    if !matches!(tree.kind, NodeKind::CompilationUnit { .. }) {
        return Err(ComprehendError::UnexpectedRoot {
            path: path.to_path_buf(),
        });
    }

    let mut seen = HashSet::new();
    let mut types = Vec::new();
    for (visit, decl) in tree.top_level_types() {
        if !seen.insert(decl.name.as_str()) {
            return Err(ComprehendError::DuplicateType {
                path: path.to_path_buf(),
                name: decl.name.clone(),
            });
        }
        types.push(entity(visit.node, decl, lines, index));
    }

    Ok(SourceUnit {
        path: path.to_path_buf(),
        package: tree.package().unwrap_or(DEFAULT_PACKAGE).to_string(),
        types,
    })
}

/// Parse and extract one file's source text.
pub fn extract_source(path: &Path, source: &str, index: &SymbolIndex) -> Result<SourceUnit> {
    let tree = parse_source(source).map_err(|e| ComprehendError::Parse {
        path: path.to_path_buf(),
        source: e,
    })?;
    extract_unit(path, &tree, &source_lines(source), index)
}

fn entity<S: AsRef<str>>(
    node: &Node,
    decl: &TypeDecl,
    lines: &[S],
    index: &SymbolIndex,
) -> TypeEntity {
    let span = Span::of(node);
    TypeEntity {
        name: decl.name.clone(),
        kind: decl.kind,
        start_line: span.start,
        extends: decl.extends.clone(),
        implements: decl.implements.clone(),
        annotations: decl.annotations.clone(),
        modifiers: decl.modifiers.clone(),
        methods: members::methods(node, lines),
        fields: members::fields(node),
        dependencies: dependencies(node, index),
        code_snippet: span.snippet(lines),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::TypeKind;
    use std::collections::BTreeSet;
    use std::path::PathBuf;

    fn set(items: &[&str]) -> BTreeSet<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn index(names: &[&str]) -> SymbolIndex {
        let mut index = SymbolIndex::new();
        for name in names {
            index.insert(name, "app");
        }
        index
    }

    #[test]
    fn test_single_class_with_field_and_method() {
        let source = "public class Counter {\n\
                      \x20   public int count;\n\
                      \x20   public int getCount() {\n\
                      \x20       int current = count;\n\
                      \x20       return current;\n\
                      \x20   }\n\
                      }\n";
        let unit = extract_source(Path::new("Counter.java"), source, &index(&["Counter"])).unwrap();

        assert_eq!(unit.package, "default");
        assert_eq!(unit.types.len(), 1);
        let counter = &unit.types[0];
        assert_eq!(counter.name, "Counter");
        assert_eq!(counter.start_line, 1);

        assert_eq!(counter.fields.len(), 1);
        assert_eq!(counter.fields[0].name, "count");
        assert_eq!(counter.fields[0].type_name, "int");
        assert_eq!(counter.fields[0].modifiers, set(&["public"]));

        assert_eq!(counter.methods.len(), 1);
        let method = &counter.methods[0];
        assert_eq!(method.name, "getCount");
        assert_eq!(method.modifiers, set(&["public"]));
        assert_eq!(method.start_line, 3);
        assert!(method.code_snippet.starts_with("    public int getCount() {"));
        assert!(method.code_snippet.ends_with("    }\n"));

        // Class snippet runs from the declaration through the method's closing line.
        let snippet_lines: Vec<_> = counter.code_snippet.lines().collect();
        assert_eq!(snippet_lines.first(), Some(&"public class Counter {"));
        assert_eq!(snippet_lines.last(), Some(&"    }"));
        assert_eq!(snippet_lines.len(), 6);
    }

    #[test]
    fn test_header_of_derived_class() {
        let source = "package app;\n\
                      class B extends A implements I1, I2 {\n\
                      \x20 void m() { Other.doX(); }\n\
                      }\n";
        let known = index(&["A", "B", "I1", "I2", "Other"]);
        let unit = extract_source(Path::new("B.java"), source, &known).unwrap();

        let b = &unit.types[0];
        assert_eq!(unit.package, "app");
        assert_eq!(b.extends.as_deref(), Some("A"));
        assert_eq!(b.implements, vec!["I1", "I2"]);
        assert!(b.dependencies.contains("Other"));
        assert!(b.dependencies.contains("A"));
    }

    #[test]
    fn test_nested_types_are_not_emitted() {
        let source = "class Outer {\n\
                      \x20 private Helper helper;\n\
                      \x20 static class Inner {\n\
                      \x20   void work() { Tool.use(); }\n\
                      \x20 }\n\
                      }\n\
                      interface Second {}\n";
        let known = index(&["Outer", "Inner", "Helper", "Tool", "Second"]);
        let unit = extract_source(Path::new("Outer.java"), source, &known).unwrap();

        let names: Vec<_> = unit.types.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["Outer", "Second"]);

        let outer = &unit.types[0];
        assert_eq!(outer.methods.len(), 1);
        assert_eq!(outer.methods[0].name, "work");
        assert_eq!(outer.dependencies, set(&["Helper", "Tool"]));

        assert_eq!(unit.types[1].kind, TypeKind::Interface);
        assert!(unit.types[1].is_interface());
    }

    #[test]
    fn test_multi_variable_field() {
        let source = "class P {\n\
                      \x20 private static final int X = 1, Y = 2;\n\
                      \x20 java.util.List<String> names;\n\
                      }\n";
        let unit = extract_source(Path::new("P.java"), source, &SymbolIndex::new()).unwrap();
        let fields = &unit.types[0].fields;
        assert_eq!(fields.len(), 3);
        assert_eq!(fields[0].name, "X");
        assert_eq!(fields[1].name, "Y");
        assert_eq!(fields[1].type_name, "int");
        assert_eq!(fields[1].modifiers, set(&["final", "private", "static"]));
        assert_eq!(fields[2].type_name, "List");
    }

    #[test]
    fn test_abstract_method_snippet_is_signature_line() {
        let source = "abstract class Shape {\n  abstract double area();\n  void noop() {}\n}\n";
        let unit = extract_source(Path::new("Shape.java"), source, &SymbolIndex::new()).unwrap();
        let methods = &unit.types[0].methods;
        assert_eq!(methods[0].code_snippet, "  abstract double area();\n");
        assert_eq!(methods[1].code_snippet, "  void noop() {}\n");
        assert!(unit.types[0].is_abstract());
    }

    #[test]
    fn test_syntax_error_is_reported_with_path() {
        let err = extract_source(
            Path::new("src/Broken.java"),
            "class Broken {\n  void m( {\n}\n",
            &SymbolIndex::new(),
        )
        .unwrap_err();
        assert!(err.is_syntax_error());
        assert!(err.to_string().contains("src/Broken.java"));
    }

    #[test]
    fn test_duplicate_top_level_names_rejected() {
        let err = extract_source(
            Path::new("Twice.java"),
            "class Twice {}\nclass Twice {}\n",
            &SymbolIndex::new(),
        )
        .unwrap_err();
        assert!(matches!(err, ComprehendError::DuplicateType { ref name, .. } if name == "Twice"));
    }

    #[test]
    fn test_non_unit_root_rejected() {
        let tree = Node::new(NodeKind::Statement);
        let err = extract_unit(
            &PathBuf::from("X.java"),
            &tree,
            &[] as &[&str],
            &SymbolIndex::new(),
        )
        .unwrap_err();
        assert!(matches!(err, ComprehendError::UnexpectedRoot { .. }));
    }
}
