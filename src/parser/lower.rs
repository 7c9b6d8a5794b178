//! Lowering from the tree-sitter Java CST to the typed [`syntax`](crate::syntax) tree.
//!
//! Only constructs the extractor cares about become nodes; everything else is
//! transparent and its lowered descendants are attached to the nearest kept
//! ancestor. Start lines are recorded for declarations, statements, calls,
//! member references and object creations. Type nodes carry no position.
//!
//! The walk keeps its own frame stack, so nesting depth in the source (long
//! `+` chains, builder call chains) is bounded by heap, not by the thread stack.

use std::collections::BTreeSet;

use tree_sitter::Node as TsNode;

use super::helpers::{
    all_children, is_basic_type, is_statement, named_children, node_line, node_text, type_name,
};
use crate::syntax::{FieldDecl, MethodDecl, Node, NodeKind, Qualifier, TypeDecl, TypeKind};

/// Work item: a CST node still to lower, a node already built, or a shell
/// whose children are the lowered items.
enum Item<'t> {
    Cst(TsNode<'t>),
    Built(Node),
    Wrap(Node, Vec<Item<'t>>),
}

/// What one CST node lowers to.
enum Step<'t> {
    Done(Vec<Node>),
    /// The node becomes `shell`, with the items lowered as its children.
    Wrap(Node, Vec<Item<'t>>),
    /// The node is transparent; its items are lowered in its place.
    Splice(Vec<Item<'t>>),
}

struct Frame<'t> {
    shell: Option<Node>,
    pending: std::vec::IntoIter<Item<'t>>,
    out: Vec<Node>,
}

impl<'t> Frame<'t> {
    fn new(shell: Option<Node>, items: Vec<Item<'t>>) -> Self {
        Self {
            shell,
            pending: items.into_iter(),
            out: Vec::new(),
        }
    }

    fn finish(self) -> Vec<Node> {
        match self.shell {
            Some(shell) => vec![shell.with_children(self.out)],
            None => self.out,
        }
    }
}

fn cst_items<'t>(nodes: Vec<TsNode<'t>>) -> Vec<Item<'t>> {
    nodes.into_iter().map(Item::Cst).collect()
}

pub(super) struct Lowerer<'s> {
    source: &'s [u8],
}

impl<'s> Lowerer<'s> {
    pub(super) fn new(source: &'s [u8]) -> Self {
        Self { source }
    }

    pub(super) fn program(&self, root: TsNode) -> Node {
        let mut package = None;
        let mut items = Vec::new();

        for child in named_children(&root) {
            match child.kind() {
                "package_declaration" => {
                    package = named_children(&child)
                        .into_iter()
                        .find(|n| matches!(n.kind(), "identifier" | "scoped_identifier"))
                        .map(|n| node_text(&n, self.source));
                }
                "import_declaration" => {
                    let path = node_text(&child, self.source)
                        .trim_start_matches("import")
                        .trim_end_matches(';')
                        .trim()
                        .to_string();
                    items.push(Item::Built(
                        Node::new(NodeKind::Import { path }).at(node_line(&child)),
                    ));
                }
                _ => items.push(Item::Cst(child)),
            }
        }

        Node::new(NodeKind::CompilationUnit { package }).with_children(self.lower_items(items))
    }

    /// Lower a list of items depth-first, in source order.
    fn lower_items<'t>(&self, items: Vec<Item<'t>>) -> Vec<Node> {
        let mut stack = vec![Frame::new(None, items)];

        loop {
            let next = match stack.last_mut() {
                Some(frame) => frame.pending.next(),
                None => return Vec::new(),
            };

            match next {
                Some(Item::Cst(node)) => match self.step(node) {
                    Step::Done(nodes) => {
                        if let Some(frame) = stack.last_mut() {
                            frame.out.extend(nodes);
                        }
                    }
                    Step::Wrap(shell, items) => stack.push(Frame::new(Some(shell), items)),
                    Step::Splice(items) => stack.push(Frame::new(None, items)),
                },
                Some(Item::Built(node)) => {
                    if let Some(frame) = stack.last_mut() {
                        frame.out.push(node);
                    }
                }
                Some(Item::Wrap(shell, items)) => stack.push(Frame::new(Some(shell), items)),
                None => {
                    let Some(done) = stack.pop() else {
                        return Vec::new();
                    };
                    let nodes = done.finish();
                    match stack.last_mut() {
                        Some(parent) => parent.out.extend(nodes),
                        None => return nodes,
                    }
                }
            }
        }
    }

    fn step<'t>(&self, node: TsNode<'t>) -> Step<'t> {
        match node.kind() {
            "class_declaration" => self.type_declaration(node, TypeKind::Class),
            "interface_declaration" => self.type_declaration(node, TypeKind::Interface),
            "enum_declaration" => self.type_declaration(node, TypeKind::Enum),
            "record_declaration" => self.type_declaration(node, TypeKind::Record),
            "annotation_type_declaration" => self.type_declaration(node, TypeKind::Annotation),
            "method_declaration" | "annotation_type_element_declaration" => {
                self.method(node, false)
            }
            "constructor_declaration" | "compact_constructor_declaration" => {
                self.method(node, true)
            }
            "field_declaration" | "constant_declaration" => self.field(node),
            "local_variable_declaration" => {
                let names = self.declarator_names(node);
                positioned(NodeKind::LocalVariable { names }, node)
            }
            "formal_parameter" | "spread_parameter" | "catch_formal_parameter" => {
                let name = node
                    .child_by_field_name("name")
                    .or_else(|| {
                        named_children(&node)
                            .into_iter()
                            .rev()
                            .find(|n| n.kind() == "identifier")
                    })
                    .map(|n| node_text(&n, self.source))
                    .unwrap_or_default();
                positioned(NodeKind::Parameter { name }, node)
            }
            "enum_constant" => {
                let name = node
                    .child_by_field_name("name")
                    .map(|n| node_text(&n, self.source))
                    .unwrap_or_default();
                positioned(NodeKind::EnumConstant { name }, node)
            }
            "method_invocation" => {
                let qualifier = node
                    .child_by_field_name("object")
                    .map(|object| self.qualifier(object));
                let member = node
                    .child_by_field_name("name")
                    .map(|n| node_text(&n, self.source))
                    .unwrap_or_default();
                positioned(NodeKind::MethodInvocation { qualifier, member }, node)
            }
            "field_access" => {
                let qualifier = node
                    .child_by_field_name("object")
                    .map(|object| self.qualifier(object));
                let member = node
                    .child_by_field_name("field")
                    .map(|n| node_text(&n, self.source))
                    .unwrap_or_default();
                positioned(NodeKind::MemberReference { qualifier, member }, node)
            }
            "method_reference" => self.method_reference(node),
            "object_creation_expression" => positioned(NodeKind::Creation, node),
            // The parameter's own name (`T`) is not a type usage; its bounds are.
            "type_parameter" => Step::Splice(cst_items(
                named_children(&node)
                    .into_iter()
                    .filter(|n| n.kind() == "type_bound")
                    .collect(),
            )),
            "type_identifier" | "scoped_type_identifier" | "generic_type" => {
                self.reference_type(node)
            }
            "array_type" => Step::Splice(cst_items(
                node.child_by_field_name("element").into_iter().collect(),
            )),
            kind if is_basic_type(kind) => Step::Done(vec![Node::new(NodeKind::BasicType {
                name: node_text(&node, self.source),
            })]),
            "line_comment" | "block_comment" => Step::Done(Vec::new()),
            kind if is_statement(kind) => positioned(NodeKind::Statement, node),
            _ => Step::Splice(cst_items(named_children(&node))),
        }
    }

    /// Children of a declaration, with the body child wrapped in a `Body` node.
    fn declaration_items<'t>(&self, node: TsNode<'t>) -> Vec<Item<'t>> {
        let body_id = node.child_by_field_name("body").map(|b| b.id());
        named_children(&node)
            .into_iter()
            .map(|child| {
                if Some(child.id()) == body_id {
                    Item::Wrap(Node::new(NodeKind::Body), cst_items(named_children(&child)))
                } else {
                    Item::Cst(child)
                }
            })
            .collect()
    }

    fn type_declaration<'t>(&self, node: TsNode<'t>, kind: TypeKind) -> Step<'t> {
        let name = node
            .child_by_field_name("name")
            .map(|n| node_text(&n, self.source))
            .unwrap_or_default();
        let (mut modifiers, annotations) = self.modifiers(node);
        if let Some(marker) = kind.modifier_marker() {
            modifiers.insert(marker.to_string());
        }

        let mut extends = None;
        let mut implements = Vec::new();
        for child in named_children(&node) {
            match child.kind() {
                "superclass" => {
                    extends = named_children(&child)
                        .first()
                        .and_then(|t| type_name(t, self.source));
                }
                // Interfaces list their super-interfaces with `extends`.
                "super_interfaces" | "extends_interfaces" => {
                    implements.extend(self.type_list_names(child));
                }
                _ => {}
            }
        }

        let decl = TypeDecl {
            name,
            kind,
            modifiers,
            annotations,
            extends,
            implements,
        };
        Step::Wrap(
            Node::new(NodeKind::TypeDecl(decl)).at(node_line(&node)),
            self.declaration_items(node),
        )
    }

    fn method<'t>(&self, node: TsNode<'t>, constructor: bool) -> Step<'t> {
        let name = node
            .child_by_field_name("name")
            .map(|n| node_text(&n, self.source))
            .unwrap_or_default();
        let (modifiers, annotations) = self.modifiers(node);
        let decl = MethodDecl {
            name,
            modifiers,
            annotations,
        };

        let kind = if constructor {
            NodeKind::Constructor(decl)
        } else {
            NodeKind::Method(decl)
        };
        Step::Wrap(
            Node::new(kind).at(node_line(&node)),
            self.declaration_items(node),
        )
    }

    fn field<'t>(&self, node: TsNode<'t>) -> Step<'t> {
        let (modifiers, annotations) = self.modifiers(node);
        let decl = FieldDecl {
            modifiers,
            annotations,
            type_name: node
                .child_by_field_name("type")
                .and_then(|t| type_name(&t, self.source)),
            declarators: self.declarator_names(node),
        };
        positioned(NodeKind::Field(decl), node)
    }

    fn method_reference<'t>(&self, node: TsNode<'t>) -> Step<'t> {
        let children = named_children(&node);
        let qualifier = children.first().map(|target| match target.kind() {
            "type_identifier" => Qualifier::Name(node_text(target, self.source)),
            _ => self.qualifier(*target),
        });
        let member = all_children(&node)
            .into_iter()
            .rev()
            .find(|n| matches!(n.kind(), "identifier" | "new"))
            .map(|n| node_text(&n, self.source))
            .unwrap_or_default();
        positioned(NodeKind::MemberReference { qualifier, member }, node)
    }

    fn reference_type<'t>(&self, node: TsNode<'t>) -> Step<'t> {
        let name = type_name(&node, self.source).unwrap_or_default();
        let shell = Node::new(NodeKind::ReferenceType { name });
        match node.kind() {
            "generic_type" => Step::Wrap(
                shell,
                named_children(&node)
                    .into_iter()
                    .filter(|n| n.kind() == "type_arguments")
                    .flat_map(|args| named_children(&args))
                    .map(|arg| {
                        Item::Wrap(Node::new(NodeKind::TypeArgument), vec![Item::Cst(arg)])
                    })
                    .collect(),
            ),
            "scoped_type_identifier" => {
                // `Outer<A>.Inner`: keep generic arguments of the prefix.
                let mut segments = named_children(&node);
                segments.pop();
                Step::Wrap(shell, cst_items(segments))
            }
            _ => Step::Done(vec![shell]),
        }
    }

    fn qualifier(&self, object: TsNode) -> Qualifier {
        match object.kind() {
            "identifier" => Qualifier::Name(node_text(&object, self.source)),
            "this" => Qualifier::This,
            "super" => Qualifier::Super,
            "field_access" | "scoped_identifier" => {
                let text = node_text(&object, self.source);
                if text
                    .chars()
                    .all(|c| c.is_alphanumeric() || c == '_' || c == '$' || c == '.')
                {
                    Qualifier::Path(text)
                } else {
                    Qualifier::Expression
                }
            }
            _ => Qualifier::Expression,
        }
    }

    /// Keyword modifiers and annotation names from the node's `modifiers` child.
    fn modifiers(&self, node: TsNode) -> (BTreeSet<String>, Vec<String>) {
        let mut modifiers = BTreeSet::new();
        let mut annotations = Vec::new();

        let Some(list) = named_children(&node)
            .into_iter()
            .find(|n| n.kind() == "modifiers")
        else {
            return (modifiers, annotations);
        };

        for child in all_children(&list) {
            match child.kind() {
                "marker_annotation" | "annotation" => {
                    if let Some(name) = child.child_by_field_name("name") {
                        annotations.push(node_text(&name, self.source));
                    }
                }
                "line_comment" | "block_comment" => {}
                _ => {
                    modifiers.insert(node_text(&child, self.source));
                }
            }
        }
        (modifiers, annotations)
    }

    fn declarator_names(&self, node: TsNode) -> Vec<String> {
        let mut cursor = node.walk();
        node.children_by_field_name("declarator", &mut cursor)
            .filter_map(|declarator| declarator.child_by_field_name("name"))
            .map(|name| node_text(&name, self.source))
            .collect()
    }

    fn type_list_names(&self, clause: TsNode) -> Vec<String> {
        named_children(&clause)
            .into_iter()
            .filter(|n| n.kind() == "type_list")
            .flat_map(|list| named_children(&list))
            .filter_map(|t| type_name(&t, self.source))
            .collect()
    }
}

fn positioned<'t>(kind: NodeKind, node: TsNode<'t>) -> Step<'t> {
    Step::Wrap(
        Node::new(kind).at(node_line(&node)),
        cst_items(named_children(&node)),
    )
}
