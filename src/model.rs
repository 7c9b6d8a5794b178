//! Extracted project structure.
//!
//! These are plain values: built once per file by the extractor and handed,
//! unchanged, to the graph, renderer and annotation stages.

use std::collections::BTreeSet;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::syntax::TypeKind;

/// Package recorded for files without a package clause.
pub const DEFAULT_PACKAGE: &str = "default";

/// Field type recorded when the declaration carries no type information.
pub const OBJECT_TYPE: &str = "Object";

/// One successfully parsed source file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceUnit {
    pub path: PathBuf,
    pub package: String,
    pub types: Vec<TypeEntity>,
}

/// A top-level class-like declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeEntity {
    pub name: String,
    pub kind: TypeKind,
    /// 1-based; 0 when the tree carried no position.
    pub start_line: usize,
    pub extends: Option<String>,
    pub implements: Vec<String>,
    pub annotations: Vec<String>,
    pub modifiers: BTreeSet<String>,
    pub methods: Vec<MemberMethod>,
    pub fields: Vec<MemberField>,
    /// Project types referenced from the declaration. May include `name`.
    pub dependencies: BTreeSet<String>,
    pub code_snippet: String,
}

impl TypeEntity {
    pub fn is_interface(&self) -> bool {
        self.kind == TypeKind::Interface || self.modifiers.contains("interface")
    }

    pub fn is_abstract(&self) -> bool {
        !self.is_interface() && self.modifiers.contains("abstract")
    }

    /// Dependencies other than the entity itself.
    pub fn external_dependencies(&self) -> impl Iterator<Item = &str> {
        self.dependencies
            .iter()
            .map(String::as_str)
            .filter(move |dep| *dep != self.name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberMethod {
    pub name: String,
    pub start_line: usize,
    pub modifiers: BTreeSet<String>,
    pub code_snippet: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberField {
    pub name: String,
    #[serde(rename = "type")]
    pub type_name: String,
    pub modifiers: BTreeSet<String>,
}

/// UML-style visibility derived from a modifier set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Public,
    Protected,
    Private,
    Package,
}

impl Visibility {
    pub fn of(modifiers: &BTreeSet<String>) -> Self {
        if modifiers.contains("private") {
            Visibility::Private
        } else if modifiers.contains("protected") {
            Visibility::Protected
        } else if modifiers.contains("public") {
            Visibility::Public
        } else {
            Visibility::Package
        }
    }

    pub fn symbol(&self) -> char {
        match self {
            Visibility::Public => '+',
            Visibility::Protected => '#',
            Visibility::Private => '-',
            Visibility::Package => '~',
        }
    }
}
