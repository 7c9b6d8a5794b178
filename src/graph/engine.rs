//
//  engine.rs
//  Comprehender
//
//  Created by hak (tharun)
//

use petgraph::algo::tarjan_scc;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Direction;
use serde::Serialize;
use std::collections::{BTreeSet, HashMap};

use super::relations::{derive_relationships, RelationKind, Relationship};
use crate::model::SourceUnit;

/// A type known to the graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TypeNode {
    pub name: String,
    /// `None` for names that only appear as relation targets.
    pub package: Option<String>,
}

/// One neighbour of a type, as returned by the dependency queries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Neighbour {
    pub name: String,
    pub relation: RelationKind,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GraphStats {
    pub type_count: usize,
    pub relationship_count: usize,
    pub extends_count: usize,
    pub implements_count: usize,
    pub uses_count: usize,
    pub package_count: usize,
}

/// Type-level relationship graph over the whole project.
#[derive(Debug, Clone, Default)]
pub struct DependencyGraph {
    graph: DiGraph<TypeNode, RelationKind>,
    name_index: HashMap<String, NodeIndex>,
    relationships: BTreeSet<Relationship>,
}

impl DependencyGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the graph from extracted units and the relations they imply.
    pub fn from_units(units: &[SourceUnit]) -> Self {
        let mut graph = Self::new();
        for unit in units {
            for entity in &unit.types {
                graph.add_type(&entity.name, Some(&unit.package));
            }
        }
        for relationship in derive_relationships(units) {
            graph.add_relationship(relationship);
        }
        graph
    }

    // ─── Mutation ───────────────────────────────────────────────

    /// Add a type, or attach a package to one only seen as a target so far.
    pub fn add_type(&mut self, name: &str, package: Option<&str>) -> NodeIndex {
        if let Some(&idx) = self.name_index.get(name) {
            if let (Some(node), Some(pkg)) = (self.graph.node_weight_mut(idx), package) {
                node.package = Some(pkg.to_string());
            }
            return idx;
        }
        let idx = self.graph.add_node(TypeNode {
            name: name.to_string(),
            package: package.map(str::to_string),
        });
        self.name_index.insert(name.to_string(), idx);
        idx
    }

    /// Record a relation. Returns false when it was already present.
    pub fn add_relationship(&mut self, relationship: Relationship) -> bool {
        if self.relationships.contains(&relationship) {
            return false;
        }
        let from = self.add_type(&relationship.source, None);
        let to = self.add_type(&relationship.target, None);
        self.graph.add_edge(from, to, relationship.kind);
        self.relationships.insert(relationship);
        true
    }

    // ─── Queries ────────────────────────────────────────────────

    pub fn relationships(&self) -> &BTreeSet<Relationship> {
        &self.relationships
    }

    pub fn get(&self, name: &str) -> Option<&TypeNode> {
        self.name_index.get(name).map(|&idx| &self.graph[idx])
    }

    /// What `name` extends, implements or uses.
    pub fn dependencies_of(&self, name: &str) -> Vec<Neighbour> {
        self.neighbours(name, Direction::Outgoing)
    }

    /// Who extends, implements or uses `name`.
    pub fn dependents_of(&self, name: &str) -> Vec<Neighbour> {
        self.neighbours(name, Direction::Incoming)
    }

    fn neighbours(&self, name: &str, direction: Direction) -> Vec<Neighbour> {
        let Some(&idx) = self.name_index.get(name) else {
            return Vec::new();
        };
        let mut found: Vec<Neighbour> = self
            .graph
            .edges_directed(idx, direction)
            .map(|edge| {
                let other = match direction {
                    Direction::Outgoing => edge.target(),
                    Direction::Incoming => edge.source(),
                };
                Neighbour {
                    name: self.graph[other].name.clone(),
                    relation: *edge.weight(),
                }
            })
            .collect();
        found.sort_by(|a, b| (a.relation, &a.name).cmp(&(b.relation, &b.name)));
        found
    }

    /// Groups of types that depend on each other in a cycle, each sorted by name.
    pub fn cycles(&self) -> Vec<Vec<String>> {
        let mut cycles: Vec<Vec<String>> = tarjan_scc(&self.graph)
            .into_iter()
            .filter(|component| component.len() > 1)
            .map(|component| {
                let mut names: Vec<String> = component
                    .into_iter()
                    .map(|idx| self.graph[idx].name.clone())
                    .collect();
                names.sort();
                names
            })
            .collect();
        cycles.sort();
        cycles
    }

    pub fn stats(&self) -> GraphStats {
        let count = |kind| self.relationships.iter().filter(|r| r.kind == kind).count();
        let packages: BTreeSet<&str> = self
            .graph
            .node_weights()
            .filter_map(|node| node.package.as_deref())
            .collect();

        GraphStats {
            type_count: self.graph.node_count(),
            relationship_count: self.relationships.len(),
            extends_count: count(RelationKind::Extends),
            implements_count: count(RelationKind::Implements),
            uses_count: count(RelationKind::Uses),
            package_count: packages.len(),
        }
    }
}
