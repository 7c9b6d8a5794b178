//! Typed syntax tree consumed by the extractor.
//!
//! The tree is a lowered view of the parser's concrete syntax tree. Nodes carry
//! only a start line (when known), never an end position; spans are
//! reconstructed from descendants (see [`span`]).
//!
//! Every node has a closed [`NodeKind`] tag. Optional facets such as a body,
//! modifiers or annotations are exposed through [`Capability`] accessors
//! instead of probing node internals.

pub mod span;
pub mod walk;

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

pub use span::{end_line, snippet, source_lines, start_line, Span};
pub use walk::{Visit, Walk};

/// Kind of class-like declaration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeKind {
    #[default]
    Class,
    Interface,
    Enum,
    Record,
    Annotation,
}

impl TypeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TypeKind::Class => "class",
            TypeKind::Interface => "interface",
            TypeKind::Enum => "enum",
            TypeKind::Record => "record",
            TypeKind::Annotation => "annotation",
        }
    }

    /// Marker added to the modifier set, if this kind has one.
    pub fn modifier_marker(&self) -> Option<&'static str> {
        match self {
            TypeKind::Class => None,
            other => Some(other.as_str()),
        }
    }
}

/// How a member access or call is qualified (`x.f()`, `a.b.f()`, `this.f()`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Qualifier {
    /// A single identifier: `Foo.bar()`, `foo.bar()`.
    Name(String),
    /// A dotted chain of identifiers: `a.b.bar()`.
    Path(String),
    This,
    Super,
    /// Anything else: `make().bar()`, `arr[0].bar()`.
    Expression,
}

impl Qualifier {
    pub fn plain_name(&self) -> Option<&str> {
        match self {
            Qualifier::Name(name) => Some(name),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TypeDecl {
    pub name: String,
    pub kind: TypeKind,
    pub modifiers: BTreeSet<String>,
    pub annotations: Vec<String>,
    pub extends: Option<String>,
    pub implements: Vec<String>,
}

impl TypeDecl {
    pub fn new(name: impl Into<String>, kind: TypeKind) -> Self {
        Self {
            name: name.into(),
            kind,
            ..Default::default()
        }
    }
}

/// Method or constructor header.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MethodDecl {
    pub name: String,
    pub modifiers: BTreeSet<String>,
    pub annotations: Vec<String>,
}

impl MethodDecl {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldDecl {
    pub modifiers: BTreeSet<String>,
    pub annotations: Vec<String>,
    /// Base name of the declared type (`List` for `List<Foo>`, `int` for `int[]`).
    pub type_name: Option<String>,
    /// One entry per declared variable.
    pub declarators: Vec<String>,
}

/// Closed set of node tags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    CompilationUnit { package: Option<String> },
    Import { path: String },
    TypeDecl(TypeDecl),
    /// Member list of a type, or statement list of a method.
    Body,
    Method(MethodDecl),
    Constructor(MethodDecl),
    Field(FieldDecl),
    EnumConstant { name: String },
    LocalVariable { names: Vec<String> },
    Parameter { name: String },
    Statement,
    MethodInvocation {
        qualifier: Option<Qualifier>,
        member: String,
    },
    /// Field access (`Foo.BAR`) or method reference (`Foo::bar`).
    MemberReference {
        qualifier: Option<Qualifier>,
        member: String,
    },
    Creation,
    ReferenceType { name: String },
    BasicType { name: String },
    /// One generic argument; its children are the argument's types.
    TypeArgument,
}

/// Optional facets a node may expose.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    Position,
    Body,
    Modifiers,
    Annotations,
}

#[derive(Debug, PartialEq, Eq)]
pub struct Node {
    pub kind: NodeKind,
    /// 1-based start line, when the parser recorded one.
    pub line: Option<usize>,
    pub children: Vec<Node>,
}

// Dropping a deep tree through the derived glue recurses once per level.
impl Drop for Node {
    fn drop(&mut self) {
        let mut pending = std::mem::take(&mut self.children);
        while let Some(mut node) = pending.pop() {
            pending.append(&mut node.children);
        }
    }
}

impl Node {
    pub fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            line: None,
            children: Vec::new(),
        }
    }

    pub fn at(mut self, line: usize) -> Self {
        self.line = Some(line);
        self
    }

    pub fn with_child(mut self, child: Node) -> Self {
        self.children.push(child);
        self
    }

    pub fn with_children(mut self, children: impl IntoIterator<Item = Node>) -> Self {
        self.children.extend(children);
        self
    }

    pub fn line(&self) -> Option<usize> {
        self.line
    }

    /// Children of the declaration's body, for types, methods and constructors.
    ///
    /// `None` means the declaration has no body at all (abstract or interface
    /// methods); an empty slice means an empty body.
    pub fn body(&self) -> Option<&[Node]> {
        match self.kind {
            NodeKind::TypeDecl(_) | NodeKind::Method(_) | NodeKind::Constructor(_) => self
                .children
                .iter()
                .find(|child| child.kind == NodeKind::Body)
                .map(|body| body.children.as_slice()),
            _ => None,
        }
    }

    pub fn modifiers(&self) -> Option<&BTreeSet<String>> {
        match &self.kind {
            NodeKind::TypeDecl(decl) => Some(&decl.modifiers),
            NodeKind::Method(decl) | NodeKind::Constructor(decl) => Some(&decl.modifiers),
            NodeKind::Field(decl) => Some(&decl.modifiers),
            _ => None,
        }
    }

    pub fn annotations(&self) -> Option<&[String]> {
        match &self.kind {
            NodeKind::TypeDecl(decl) => Some(&decl.annotations),
            NodeKind::Method(decl) | NodeKind::Constructor(decl) => Some(&decl.annotations),
            NodeKind::Field(decl) => Some(&decl.annotations),
            _ => None,
        }
    }

    pub fn has(&self, capability: Capability) -> bool {
        match capability {
            Capability::Position => self.line.is_some(),
            Capability::Body => self.body().is_some(),
            Capability::Modifiers => self.modifiers().is_some(),
            Capability::Annotations => self.annotations().is_some(),
        }
    }

    pub fn as_type_decl(&self) -> Option<&TypeDecl> {
        match &self.kind {
            NodeKind::TypeDecl(decl) => Some(decl),
            _ => None,
        }
    }

    /// Package named by the file's package clause, for compilation units.
    pub fn package(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::CompilationUnit { package } => package.as_deref(),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capabilities_follow_kind() {
        let method = Node::new(NodeKind::Method(MethodDecl::new("run")))
            .at(3)
            .with_child(Node::new(NodeKind::Body));
        assert!(method.has(Capability::Position));
        assert!(method.has(Capability::Body));
        assert!(method.has(Capability::Modifiers));
        assert_eq!(method.body().map(<[Node]>::len), Some(0));

        let statement = Node::new(NodeKind::Statement);
        assert!(!statement.has(Capability::Position));
        assert!(!statement.has(Capability::Body));
        assert!(!statement.has(Capability::Annotations));
    }

    #[test]
    fn test_abstract_method_has_no_body() {
        let method = Node::new(NodeKind::Method(MethodDecl::new("area"))).at(2);
        assert!(method.body().is_none());
    }

    #[test]
    fn test_deep_chain_drops() {
        let mut node = Node::new(NodeKind::Statement).at(1);
        for _ in 0..200_000 {
            node = Node::new(NodeKind::Creation).with_child(node);
        }
        assert_eq!(node.walk().count(), 200_001);
        drop(node);
    }

    #[test]
    fn test_modifier_marker() {
        assert_eq!(TypeKind::Class.modifier_marker(), None);
        assert_eq!(TypeKind::Interface.modifier_marker(), Some("interface"));
    }
}
