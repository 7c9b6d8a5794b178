//
//  mod.rs
//  Comprehender
//
//  Created by hak (tharun)
//

mod helpers;
mod lower;

use tree_sitter::{Node as TsNode, Parser};

use self::helpers::{node_line, node_text};
use self::lower::Lowerer;
use crate::error::ParseError;
use crate::syntax::Node;

/// Parse Java source text into the typed syntax tree.
///
/// Any `ERROR` or `MISSING` node in the concrete tree is reported as
/// [`ParseError::Syntax`] with the line of the first offending node.
pub fn parse_source(source: &str) -> Result<Node, ParseError> {
    let mut parser = Parser::new();
    parser
        .set_language(&tree_sitter_java::LANGUAGE.into())
        .map_err(|e| ParseError::Parser(e.to_string()))?;

    let tree = parser
        .parse(source, None)
        .ok_or_else(|| ParseError::Parser("tree-sitter returned no tree".into()))?;

    let root = tree.root_node();
    if root.has_error() {
        return Err(syntax_error(root, source.as_bytes()));
    }

    Ok(Lowerer::new(source.as_bytes()).program(root))
}

fn syntax_error(root: TsNode, source: &[u8]) -> ParseError {
    match first_error(root) {
        Some(node) if node.is_missing() => ParseError::Syntax {
            line: node_line(&node),
            detail: format!("missing `{}`", node.kind()),
        },
        Some(node) => {
            let text = node_text(&node, source);
            let excerpt: String = text.chars().take(40).collect();
            ParseError::Syntax {
                line: node_line(&node),
                detail: format!("unexpected `{}`", excerpt.trim()),
            }
        }
        None => ParseError::Syntax {
            line: node_line(&root),
            detail: "malformed source".into(),
        },
    }
}

/// First `ERROR` or `MISSING` node in source order.
fn first_error(root: TsNode) -> Option<TsNode> {
    let mut cursor = root.walk();
    loop {
        let node = cursor.node();
        if node.is_error() || node.is_missing() {
            return Some(node);
        }
        if node.has_error() && cursor.goto_first_child() {
            continue;
        }
        while !cursor.goto_next_sibling() {
            if !cursor.goto_parent() {
                return None;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::{NodeKind, Qualifier, TypeKind};

    #[test]
    fn test_package_and_top_level_types() {
        let tree = parse_source(
            "package com.example.app;\n\
             import java.util.List;\n\
             public class Service {}\n\
             interface Port {}\n",
        )
        .unwrap();

        assert_eq!(tree.package(), Some("com.example.app"));
        let types: Vec<_> = tree
            .top_level_types()
            .map(|(visit, decl)| (decl.name.clone(), decl.kind, visit.node.line))
            .collect();
        assert_eq!(
            types,
            vec![
                ("Service".to_string(), TypeKind::Class, Some(3)),
                ("Port".to_string(), TypeKind::Interface, Some(4)),
            ]
        );
    }

    #[test]
    fn test_type_header() {
        let tree = parse_source(
            "@Entity\n\
             public abstract class Order extends Base<Long> implements Serializable, Comparable<Order> {}\n",
        )
        .unwrap();

        let (_, decl) = tree.top_level_types().next().unwrap();
        assert_eq!(decl.extends.as_deref(), Some("Base"));
        assert_eq!(decl.implements, vec!["Serializable", "Comparable"]);
        assert_eq!(decl.annotations, vec!["Entity"]);
        assert!(decl.modifiers.contains("public"));
        assert!(decl.modifiers.contains("abstract"));
    }

    #[test]
    fn test_interface_marker_and_super_interfaces() {
        let tree = parse_source("public interface Repo extends Reader, Writer {}\n").unwrap();
        let (_, decl) = tree.top_level_types().next().unwrap();
        assert!(decl.modifiers.contains("interface"));
        assert_eq!(decl.extends, None);
        assert_eq!(decl.implements, vec!["Reader", "Writer"]);
    }

    #[test]
    fn test_invocation_qualifiers() {
        let tree = parse_source(
            "class A {\n\
               void run() {\n\
                 Helper.assist();\n\
                 this.reset();\n\
                 a.b.call();\n\
               }\n\
             }\n",
        )
        .unwrap();

        let qualifiers: Vec<_> = tree
            .walk()
            .filter_map(|visit| match &visit.node.kind {
                NodeKind::MethodInvocation { qualifier, .. } => Some(qualifier.clone()),
                _ => None,
            })
            .collect();
        assert_eq!(
            qualifiers,
            vec![
                Some(Qualifier::Name("Helper".into())),
                Some(Qualifier::This),
                Some(Qualifier::Path("a.b".into())),
            ]
        );
    }

    #[test]
    fn test_statements_are_positioned() {
        let tree = parse_source(
            "class A {\n\
               int f() {\n\
                 int x = 1;\n\
                 return x;\n\
               }\n\
             }\n",
        )
        .unwrap();

        let lines: Vec<_> = tree
            .walk()
            .filter(|visit| {
                matches!(
                    visit.node.kind,
                    NodeKind::Statement | NodeKind::LocalVariable { .. }
                )
            })
            .filter_map(|visit| visit.node.line)
            .collect();
        assert_eq!(lines, vec![3, 4]);
    }

    #[test]
    fn test_syntax_error_is_reported() {
        let err = parse_source("class Broken {\n  void m( {\n}\n").unwrap_err();
        assert!(matches!(err, ParseError::Syntax { .. }));
    }

    #[test]
    fn test_empty_source_is_valid() {
        let tree = parse_source("").unwrap();
        assert_eq!(tree.package(), None);
        assert!(tree.children.is_empty());
    }
}
