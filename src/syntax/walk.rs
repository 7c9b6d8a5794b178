//! Depth-first traversal with an explicit nesting depth.

use super::{Node, NodeKind, TypeDecl};

/// A node reached during a walk, with its depth below the walk's root.
///
/// The root itself is depth 0; a top-level declaration in a compilation unit
/// is depth 1.
#[derive(Debug, Clone, Copy)]
pub struct Visit<'a> {
    pub node: &'a Node,
    pub depth: usize,
}

/// Pre-order iterator over a subtree, in source order.
pub struct Walk<'a> {
    stack: Vec<Visit<'a>>,
}

impl<'a> Iterator for Walk<'a> {
    type Item = Visit<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let visit = self.stack.pop()?;
        for child in visit.node.children.iter().rev() {
            self.stack.push(Visit {
                node: child,
                depth: visit.depth + 1,
            });
        }
        Some(visit)
    }
}

impl Node {
    /// Walk this node and all of its descendants.
    pub fn walk(&self) -> Walk<'_> {
        Walk {
            stack: vec![Visit {
                node: self,
                depth: 0,
            }],
        }
    }

    /// Walk the subtree, keeping only nodes whose kind matches.
    pub fn filter<'a, F>(&'a self, predicate: F) -> impl Iterator<Item = Visit<'a>>
    where
        F: Fn(&NodeKind) -> bool + 'a,
    {
        self.walk().filter(move |visit| predicate(&visit.node.kind))
    }

    /// Every class-like declaration in the subtree, nested ones included.
    pub fn type_declarations(&self) -> impl Iterator<Item = (Visit<'_>, &TypeDecl)> {
        self.walk()
            .filter_map(|visit| visit.node.as_type_decl().map(|decl| (visit, decl)))
    }

    /// Class-like declarations that are direct children of this node.
    pub fn top_level_types(&self) -> impl Iterator<Item = (Visit<'_>, &TypeDecl)> {
        self.type_declarations().filter(|(visit, _)| visit.depth == 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::{MethodDecl, TypeKind};

    fn class(name: &str) -> Node {
        Node::new(NodeKind::TypeDecl(TypeDecl::new(name, TypeKind::Class)))
    }

    fn unit(children: Vec<Node>) -> Node {
        Node::new(NodeKind::CompilationUnit { package: None }).with_children(children)
    }

    #[test]
    fn test_walk_is_preorder_in_source_order() {
        let tree = unit(vec![
            class("A").with_child(Node::new(NodeKind::Body).with_child(class("Inner"))),
            class("B"),
        ]);

        let names: Vec<_> = tree
            .type_declarations()
            .map(|(_, decl)| decl.name.as_str())
            .collect();
        assert_eq!(names, vec!["A", "Inner", "B"]);
    }

    #[test]
    fn test_top_level_excludes_nested() {
        let tree = unit(vec![
            class("Outer").with_child(Node::new(NodeKind::Body).with_child(class("Nested"))),
            class("Second"),
        ]);

        let names: Vec<_> = tree
            .top_level_types()
            .map(|(_, decl)| decl.name.as_str())
            .collect();
        assert_eq!(names, vec!["Outer", "Second"]);

        let nested = tree
            .type_declarations()
            .find(|(_, decl)| decl.name == "Nested")
            .map(|(visit, _)| visit.depth);
        assert_eq!(nested, Some(3));
    }

    #[test]
    fn test_filter_by_kind() {
        let tree = class("A").with_child(
            Node::new(NodeKind::Body)
                .with_child(Node::new(NodeKind::Method(MethodDecl::new("a"))))
                .with_child(Node::new(NodeKind::Method(MethodDecl::new("b")))),
        );

        let count = tree
            .filter(|kind| matches!(kind, NodeKind::Method(_)))
            .count();
        assert_eq!(count, 2);
    }
}
