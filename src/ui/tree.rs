//! Syntax-tree projection: expand state and the flatten step.
//!
//! The displayed tree is a pure projection of the current [`SyntaxNode`]
//! root plus an [`ExpandState`]: [`flatten`] walks the node recursively and
//! emits the rows that are visible under the current expansion, top to
//! bottom. The AST pane styles those rows and moves a cursor over them; it
//! never walks the tree itself.
//!
//! Expand state is keyed by each node's *path* in the render tree (property
//! keys and sequence indices), not by object identity, so toggles survive
//! re-renders of the same tree and a wholesale tree replacement resets
//! everything by clearing the map.

use rustc_hash::FxHashMap;
use serde_json::Value;

use crate::model::{NodeValue, SyntaxNode};

/// Nodes shallower than this start out expanded.
pub const DEFAULT_OPEN_DEPTH: usize = 2;

/// Marker shown for an object property that should have been a node.
pub const INVALID_NODE_MARKER: &str = "Invalid ASTNode";

/// Per-node expand/collapse flags, keyed by render-tree path.
#[derive(Debug, Default)]
pub struct ExpandState {
    open: FxHashMap<String, bool>,
}

impl ExpandState {
    pub fn new() -> Self {
        ExpandState::default()
    }

    /// Whether the node at `path`/`depth` is open: an explicit toggle wins,
    /// otherwise nodes above [`DEFAULT_OPEN_DEPTH`] default open.
    pub fn is_open(&self, path: &str, depth: usize) -> bool {
        self.open
            .get(path)
            .copied()
            .unwrap_or(depth < DEFAULT_OPEN_DEPTH)
    }

    pub fn toggle(&mut self, path: &str, depth: usize) {
        let next = !self.is_open(path, depth);
        self.open.insert(path.to_string(), next);
    }

    /// Forget every toggle. Called when the tree is replaced wholesale.
    pub fn clear(&mut self) {
        self.open.clear();
    }
}

/// What one visible row shows.
#[derive(Debug)]
pub enum RowKind<'a> {
    /// A node header: expand affordance (when it has displayable
    /// properties), kind, optional location suffix.
    Node {
        node: &'a SyntaxNode,
        expandable: bool,
        open: bool,
        /// Node depth, needed to resolve the default expand state when the
        /// row is toggled.
        depth: usize,
    },
    /// `key: <scalar literal>`.
    Scalar { key: &'a str, value: &'a Value },
    /// `key:` introducing a nested node on the following rows.
    NodeKey { key: &'a str },
    /// `key:` introducing a sequence; `empty` shows the `[]` marker.
    SeqKey { key: &'a str, empty: bool },
    /// A scalar sequence element, shown as a quoted literal.
    SeqScalar { value: &'a Value },
    /// An object with no kind tag where a node was expected.
    Malformed { key: Option<&'a str> },
}

/// One visible row of the projected tree.
#[derive(Debug)]
pub struct TreeRow<'a> {
    /// Visual indent level.
    pub indent: usize,
    /// Position in the render tree; the toggle key for node rows.
    pub path: String,
    pub kind: RowKind<'a>,
}

impl TreeRow<'_> {
    /// The toggle target of this row, if it is an expandable node header.
    pub fn toggle_target(&self) -> Option<(&str, usize)> {
        match self.kind {
            RowKind::Node {
                expandable: true,
                depth,
                ..
            } => Some((self.path.as_str(), depth)),
            _ => None,
        }
    }
}

/// Project the tree into its visible rows under the given expand state.
///
/// Total over any decoded tree: unexpected shapes were already folded to
/// [`NodeValue::Malformed`] at decode time and come out as marker rows.
pub fn flatten<'a>(root: &'a SyntaxNode, expand: &ExpandState) -> Vec<TreeRow<'a>> {
    let mut rows = Vec::new();
    push_node(root, 0, 0, String::new(), expand, &mut rows);
    rows
}

fn push_node<'a>(
    node: &'a SyntaxNode,
    depth: usize,
    indent: usize,
    path: String,
    expand: &ExpandState,
    rows: &mut Vec<TreeRow<'a>>,
) {
    let expandable = !node.properties.is_empty();
    let open = expandable && expand.is_open(&path, depth);
    rows.push(TreeRow {
        indent,
        path: path.clone(),
        kind: RowKind::Node {
            node,
            expandable,
            open,
            depth,
        },
    });
    if !open {
        return;
    }

    for (key, value) in &node.properties {
        let child_path = format!("{}/{}", path, key);
        match value {
            NodeValue::Scalar(scalar) => rows.push(TreeRow {
                indent: indent + 1,
                path: child_path,
                kind: RowKind::Scalar { key, value: scalar },
            }),
            NodeValue::Node(child) => {
                rows.push(TreeRow {
                    indent: indent + 1,
                    path: child_path.clone(),
                    kind: RowKind::NodeKey { key },
                });
                push_node(child, depth + 1, indent + 2, child_path, expand, rows);
            }
            NodeValue::Sequence(items) => {
                rows.push(TreeRow {
                    indent: indent + 1,
                    path: child_path.clone(),
                    kind: RowKind::SeqKey {
                        key,
                        empty: items.is_empty(),
                    },
                });
                for (index, item) in items.iter().enumerate() {
                    let item_path = format!("{}[{}]", child_path, index);
                    match item {
                        NodeValue::Node(child) => {
                            push_node(child, depth + 1, indent + 2, item_path, expand, rows);
                        }
                        NodeValue::Scalar(scalar) => rows.push(TreeRow {
                            indent: indent + 2,
                            path: item_path,
                            kind: RowKind::SeqScalar { value: scalar },
                        }),
                        // Nested sequences and kind-less objects inside a
                        // sequence degrade to the marker rather than abort.
                        NodeValue::Sequence(_) | NodeValue::Malformed => rows.push(TreeRow {
                            indent: indent + 2,
                            path: item_path,
                            kind: RowKind::Malformed { key: None },
                        }),
                    }
                }
            }
            NodeValue::Malformed => rows.push(TreeRow {
                indent: indent + 1,
                path: child_path,
                kind: RowKind::Malformed { key: Some(key) },
            }),
        }
    }
}

/// The JSON literal for a scalar property value: strings quoted and escaped,
/// `null` as the literal text `null`.
pub fn scalar_literal(value: &Value) -> String {
    value.to_string()
}

/// Quoted rendering for scalar sequence elements.
pub fn quoted_scalar(value: &Value) -> String {
    match value {
        Value::String(text) => format!("\"{}\"", text),
        other => format!("\"{}\"", other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn expand_defaults_by_depth() {
        let state = ExpandState::new();
        assert!(state.is_open("", 0));
        assert!(state.is_open("/a", 1));
        assert!(!state.is_open("/a/b", 2));
    }

    #[test]
    fn toggle_overrides_default_and_clear_forgets() {
        let mut state = ExpandState::new();
        state.toggle("/a/b", 2);
        assert!(state.is_open("/a/b", 2));
        state.toggle("", 0);
        assert!(!state.is_open("", 0));
        state.clear();
        assert!(state.is_open("", 0));
        assert!(!state.is_open("/a/b", 2));
    }

    #[test]
    fn scalar_literals_match_json() {
        assert_eq!(scalar_literal(&json!(null)), "null");
        assert_eq!(scalar_literal(&json!("hola")), "\"hola\"");
        assert_eq!(scalar_literal(&json!(42)), "42");
        assert_eq!(scalar_literal(&json!(true)), "true");
    }

    #[test]
    fn sequence_scalars_are_quoted_raw() {
        assert_eq!(quoted_scalar(&json!("hola")), "\"hola\"");
        assert_eq!(quoted_scalar(&json!(5)), "\"5\"");
        assert_eq!(quoted_scalar(&json!(null)), "\"null\"");
    }
}
