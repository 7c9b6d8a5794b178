//! Dependency edge discovery.
//!
//! Candidate names come from five places: plain-name call qualifiers, plain-name
//! member-access qualifiers, declared field types, every reference type in the
//! subtree, and every generic type argument. A candidate survives only if the
//! symbol index knows it.
//!
//! Matching is by short name. Two project types sharing a name in different
//! packages are indistinguishable, and a project type whose name collides with
//! a library type is counted whenever the library type is used.

use std::collections::BTreeSet;

use crate::symbols::SymbolIndex;
use crate::syntax::{Node, NodeKind};

/// Accumulates candidate type names from a subtree.
#[derive(Debug, Default)]
pub struct ReferenceCollector {
    candidates: BTreeSet<String>,
}

impl ReferenceCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Visit every node under `root`, `root` included.
    pub fn collect(mut self, root: &Node) -> Self {
        for visit in root.walk() {
            self.visit(visit.node);
        }
        self
    }

    fn visit(&mut self, node: &Node) {
        match &node.kind {
            NodeKind::MethodInvocation { qualifier, .. }
            | NodeKind::MemberReference { qualifier, .. } => {
                if let Some(name) = qualifier.as_ref().and_then(|q| q.plain_name()) {
                    self.add(name);
                }
            }
            NodeKind::Field(field) => {
                if let Some(type_name) = &field.type_name {
                    self.add(type_name);
                }
            }
            NodeKind::ReferenceType { name } => self.add(name),
            NodeKind::TypeArgument => {
                for child in &node.children {
                    if let NodeKind::ReferenceType { name } = &child.kind {
                        self.add(name);
                    }
                }
            }
            _ => {}
        }
    }

    fn add(&mut self, name: &str) {
        if !name.is_empty() && !self.candidates.contains(name) {
            self.candidates.insert(name.to_string());
        }
    }

    pub fn candidates(&self) -> &BTreeSet<String> {
        &self.candidates
    }

    /// Keep only candidates that name project types.
    pub fn resolve(self, index: &SymbolIndex) -> BTreeSet<String> {
        self.candidates
            .into_iter()
            .filter(|name| index.contains(name))
            .collect()
    }
}

/// Project types referenced anywhere in a declaration's subtree.
pub fn dependencies(decl: &Node, index: &SymbolIndex) -> BTreeSet<String> {
    ReferenceCollector::new().collect(decl).resolve(index)
}
