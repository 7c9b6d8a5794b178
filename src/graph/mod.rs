//! Project relationship graph.
//!
//! Relations between top-level types (`extends`, `implements`, `uses`) are
//! derived from the extracted units and kept both as a plain sorted set, which
//! the renderer consumes, and as a petgraph graph for dependency queries.

pub mod engine;
pub mod relations;

pub use engine::{DependencyGraph, GraphStats, Neighbour, TypeNode};
pub use relations::{derive_relationships, RelationKind, Relationship};
