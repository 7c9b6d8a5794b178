use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::model::SourceUnit;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationKind {
    Extends,
    Implements,
    Uses,
}

impl RelationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RelationKind::Extends => "extends",
            RelationKind::Implements => "implements",
            RelationKind::Uses => "uses",
        }
    }
}

impl fmt::Display for RelationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A directed relation between two named types.
///
/// `source` is always the declaring side: the child for `extends` and
/// `implements`, the user for `uses`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Relationship {
    pub kind: RelationKind,
    pub source: String,
    pub target: String,
}

impl Relationship {
    pub fn new(kind: RelationKind, source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            kind,
            source: source.into(),
            target: target.into(),
        }
    }
}

/// Derive every relation implied by the extracted units.
///
/// Self `uses` edges are dropped here; the per-entity dependency sets keep them.
pub fn derive_relationships<'a, I>(units: I) -> BTreeSet<Relationship>
where
    I: IntoIterator<Item = &'a SourceUnit>,
{
    let mut relationships = BTreeSet::new();
    for entity in units.into_iter().flat_map(|unit| unit.types.iter()) {
        if let Some(parent) = &entity.extends {
            relationships.insert(Relationship::new(RelationKind::Extends, &entity.name, parent));
        }
        for iface in &entity.implements {
            relationships.insert(Relationship::new(RelationKind::Implements, &entity.name, iface));
        }
        for dep in entity.external_dependencies() {
            relationships.insert(Relationship::new(RelationKind::Uses, &entity.name, dep));
        }
    }
    relationships
}
