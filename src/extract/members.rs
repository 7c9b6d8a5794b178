use crate::model::{MemberField, MemberMethod, OBJECT_TYPE};
use crate::syntax::{Node, NodeKind, Span};

/// Every method declared within the type's subtree, in source order.
pub(crate) fn methods<S: AsRef<str>>(decl: &Node, lines: &[S]) -> Vec<MemberMethod> {
    decl.walk()
        .filter_map(|visit| match &visit.node.kind {
            NodeKind::Method(method) => {
                let span = Span::through_body(visit.node);
                Some(MemberMethod {
                    name: method.name.clone(),
                    start_line: span.start,
                    modifiers: method.modifiers.clone(),
                    code_snippet: span.snippet(lines),
                })
            }
            _ => None,
        })
        .collect()
}

/// One record per declared variable of every field declaration.
pub(crate) fn fields(decl: &Node) -> Vec<MemberField> {
    decl.walk()
        .filter_map(|visit| match &visit.node.kind {
            NodeKind::Field(field) => Some(field),
            _ => None,
        })
        .flat_map(|field| {
            let type_name = field
                .type_name
                .clone()
                .unwrap_or_else(|| OBJECT_TYPE.to_string());
            field.declarators.iter().map(move |name| MemberField {
                name: name.clone(),
                type_name: type_name.clone(),
                modifiers: field.modifiers.clone(),
            })
        })
        .collect()
}
