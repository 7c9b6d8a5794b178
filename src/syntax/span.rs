//! Line-span reconstruction.
//!
//! Nodes only record where they start. A construct's last line is inferred as
//! one past the last line touched by anything inside it, which lands on the
//! closing brace for ordinary brace-per-line layouts.

use super::Node;

/// Inclusive, 1-based line range. A zero bound means "position unknown".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn of(node: &Node) -> Self {
        Self {
            start: start_line(node),
            end: end_line(node),
        }
    }

    /// Span of a declaration measured through its body only.
    ///
    /// Used for methods: with no body, or an empty one, the span collapses to
    /// the start line.
    pub fn through_body(node: &Node) -> Self {
        let start = start_line(node);
        let end = node
            .body()
            .and_then(|body| body.iter().filter_map(max_line).max())
            .map_or(start, |line| line + 1);
        Self { start, end }
    }

    pub fn is_known(&self) -> bool {
        self.start != 0 && self.end != 0
    }

    pub fn snippet<S: AsRef<str>>(&self, lines: &[S]) -> String {
        snippet(lines, self.start, self.end)
    }
}

pub fn start_line(node: &Node) -> usize {
    node.line.unwrap_or(0)
}

pub fn end_line(node: &Node) -> usize {
    max_line(node).map_or_else(|| start_line(node), |line| line + 1)
}

/// Largest recorded line in the subtree rooted at `node`.
fn max_line(node: &Node) -> Option<usize> {
    node.walk().filter_map(|visit| visit.node.line).max()
}

/// Concatenate lines `start..=end` (1-based). Bounds of 0 yield an empty string;
/// bounds past the buffer are clamped.
pub fn snippet<S: AsRef<str>>(lines: &[S], start: usize, end: usize) -> String {
    if start == 0 || end == 0 {
        return String::new();
    }
    let end = end.min(lines.len());
    if start > end {
        return String::new();
    }
    lines[start - 1..end]
        .iter()
        .map(|line| line.as_ref())
        .collect()
}

/// Split source text into lines, keeping terminators so snippets round-trip.
pub fn source_lines(text: &str) -> Vec<&str> {
    text.split_inclusive('\n').collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::{MethodDecl, NodeKind};

    const LINES: [&str; 4] = ["line1\n", "line2\n", "line3\n", "line4\n"];

    #[test]
    fn test_snippet_inclusive_range() {
        assert_eq!(snippet(&LINES, 2, 4), "line2\nline3\nline4\n");
        assert_eq!(snippet(&LINES, 3, 3), "line3\n");
    }

    #[test]
    fn test_snippet_unknown_bounds() {
        assert_eq!(snippet(&LINES, 0, 3), "");
        assert_eq!(snippet(&LINES, 2, 0), "");
    }

    #[test]
    fn test_snippet_clamps_past_end() {
        assert_eq!(snippet(&LINES, 4, 9), "line4\n");
        assert_eq!(snippet(&LINES, 7, 9), "");
    }

    #[test]
    fn test_start_line_sentinel() {
        let node = Node::new(NodeKind::Statement).at(10);
        assert_eq!(start_line(&node), 10);
        assert_eq!(start_line(&Node::new(NodeKind::Statement)), 0);
    }

    #[test]
    fn test_end_line_uses_deepest_descendant() {
        let node = Node::new(NodeKind::Statement)
            .at(10)
            .with_child(Node::new(NodeKind::Statement).at(15))
            .with_child(
                Node::new(NodeKind::Creation).with_child(Node::new(NodeKind::Statement).at(20)),
            );
        assert_eq!(end_line(&node), 21);
    }

    #[test]
    fn test_end_line_without_positions() {
        let node = Node::new(NodeKind::Statement).with_child(Node::new(NodeKind::Creation));
        assert_eq!(end_line(&node), start_line(&node));
        assert_eq!(Span::of(&node), Span { start: 0, end: 0 });
        assert!(!Span::of(&node).is_known());
    }

    #[test]
    fn test_method_span_through_body() {
        let with_body = Node::new(NodeKind::Method(MethodDecl::new("run")))
            .at(3)
            .with_child(
                Node::new(NodeKind::Body)
                    .with_child(Node::new(NodeKind::Statement).at(4))
                    .with_child(Node::new(NodeKind::Statement).at(5)),
            );
        assert_eq!(Span::through_body(&with_body), Span { start: 3, end: 6 });

        let empty = Node::new(NodeKind::Method(MethodDecl::new("noop")))
            .at(8)
            .with_child(Node::new(NodeKind::Body));
        assert_eq!(Span::through_body(&empty), Span { start: 8, end: 8 });

        let abstract_method = Node::new(NodeKind::Method(MethodDecl::new("area"))).at(9);
        assert_eq!(Span::through_body(&abstract_method), Span { start: 9, end: 9 });
    }

    #[test]
    fn test_source_lines_keep_terminators() {
        assert_eq!(source_lines("a\nb\nc"), vec!["a\n", "b\n", "c"]);
        assert!(source_lines("").is_empty());
    }
}
