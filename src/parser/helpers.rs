//
//  helpers.rs
//  Comprehender
//
//  Created by hak (tharun)
//

use tree_sitter::Node;

/// Get the full text of a node.
pub fn node_text(node: &Node, source: &[u8]) -> String {
    node.utf8_text(source).unwrap_or("").to_string()
}

/// 1-based line where a node starts.
pub fn node_line(node: &Node) -> usize {
    node.start_position().row + 1
}

/// Named children, collected so callers can recurse without holding a cursor.
pub fn named_children<'t>(node: &Node<'t>) -> Vec<Node<'t>> {
    let mut cursor = node.walk();
    node.named_children(&mut cursor).collect()
}

/// All children, anonymous tokens included.
pub fn all_children<'t>(node: &Node<'t>) -> Vec<Node<'t>> {
    let mut cursor = node.walk();
    node.children(&mut cursor).collect()
}

/// Base name of a type node: `List` for `java.util.List<Foo>`, `int` for `int[]`.
pub fn type_name(node: &Node, source: &[u8]) -> Option<String> {
    match node.kind() {
        "type_identifier" | "integral_type" | "floating_point_type" | "boolean_type"
        | "void_type" | "identifier" => Some(node_text(node, source)),
        "scoped_type_identifier" | "scoped_identifier" => named_children(node)
            .last()
            .and_then(|last| type_name(last, source)),
        "generic_type" => named_children(node)
            .first()
            .and_then(|base| type_name(base, source)),
        "array_type" => node
            .child_by_field_name("element")
            .and_then(|element| type_name(&element, source)),
        "annotated_type" => named_children(node)
            .last()
            .and_then(|inner| type_name(inner, source)),
        _ => None,
    }
}

/// True for the grammar's primitive type nodes.
pub fn is_basic_type(kind: &str) -> bool {
    matches!(
        kind,
        "integral_type" | "floating_point_type" | "boolean_type" | "void_type"
    )
}

/// True for statement nodes that get a recorded position.
pub fn is_statement(kind: &str) -> bool {
    kind.ends_with("_statement") || kind == "explicit_constructor_invocation"
}
