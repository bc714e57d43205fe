//! Domain types shared by the session and the UI panes.
//!
//! Everything here is an immutable snapshot from the panes' point of view:
//! the [`session`](crate::session) owns the values and hands out references
//! each frame. Panes keep only transient local state (scroll offsets, expand
//! flags) that never flows back into these types.

use std::fmt;

use serde_json::Value;

/// Fallback message when the service reports a failure without one.
pub const FALLBACK_ERROR_MESSAGE: &str = "Unknown error";

/// Fixed message for any transport-level failure.
pub const CONNECTION_FAILURE_MESSAGE: &str = "Could not reach the interpretation service";

/// A line/column pair within the submitted source.
///
/// The wire carries `linea` and `columna` as independent optionals; a
/// `SourceLocation` exists only when both were present, so "both or neither"
/// holds by construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceLocation {
    pub line: u32,
    pub column: u32,
}

impl SourceLocation {
    /// Combine two optional halves into a location, requiring both.
    pub fn from_parts(line: Option<u32>, column: Option<u32>) -> Option<Self> {
        match (line, column) {
            (Some(line), Some(column)) => Some(SourceLocation { line, column }),
            _ => None,
        }
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(line {}, column {})", self.line, self.column)
    }
}

/// A successful interpretation.
///
/// Optional wire fields are normalized to empty strings when absent, so the
/// result pane never has to distinguish missing from empty.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ExecutionResult {
    pub value: String,
    pub value_kind: String,
    pub markup: String,
    pub stylesheet: String,
}

impl ExecutionResult {
    /// Whether this result carries generated markup/stylesheet output.
    ///
    /// When true, the result pane renders the isolated document surface
    /// instead of the plain value, regardless of `value`.
    pub fn has_document(&self) -> bool {
        !self.markup.is_empty() || !self.stylesheet.is_empty()
    }
}

/// A failed interpretation, or a transport failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionError {
    pub message: String,
    pub location: Option<SourceLocation>,
    /// Possibly large diagnostic trace, hidden by default in the error pane.
    pub trace: Option<String>,
}

impl ExecutionError {
    /// The fixed error shown for any transport-level failure: no location,
    /// no trace.
    pub fn connection_failure() -> Self {
        ExecutionError {
            message: CONNECTION_FAILURE_MESSAGE.to_string(),
            location: None,
            trace: None,
        }
    }
}

/// One node of the parsed syntax tree.
///
/// `properties` holds every named property except the node tag and the
/// location halves, in the order the service sent them.
#[derive(Debug, Clone, PartialEq)]
pub struct SyntaxNode {
    pub kind: String,
    pub location: Option<SourceLocation>,
    pub properties: Vec<(String, NodeValue)>,
}

/// The value of a named node property, resolved by shape at decode time.
///
/// Node kinds are open-ended, so no fixed schema per `kind` is assumed:
/// every property is one of these variants and the renderer matches on the
/// variant alone.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeValue {
    /// String, number, boolean, or null. Kept as the raw JSON scalar so the
    /// tree pane can show the exact literal.
    Scalar(Value),
    /// Ordered sequence whose elements are nodes, scalars, or malformed.
    Sequence(Vec<NodeValue>),
    /// A nested node.
    Node(Box<SyntaxNode>),
    /// An object that should have been a node but carries no kind tag.
    /// Rendered as a visible marker instead of being dropped.
    Malformed,
}

/// Which outcome view is currently shown in the output column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActiveTab {
    Result,
    Error,
    Ast,
}

impl ActiveTab {
    /// Cycle to the next tab (left to right, wrapping).
    pub fn next(self) -> Self {
        match self {
            ActiveTab::Result => ActiveTab::Error,
            ActiveTab::Error => ActiveTab::Ast,
            ActiveTab::Ast => ActiveTab::Result,
        }
    }

    /// Cycle to the previous tab.
    pub fn prev(self) -> Self {
        match self {
            ActiveTab::Result => ActiveTab::Ast,
            ActiveTab::Error => ActiveTab::Result,
            ActiveTab::Ast => ActiveTab::Error,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            ActiveTab::Result => "Results",
            ActiveTab::Error => "Errors",
            ActiveTab::Ast => "AST",
        }
    }
}

/// Outcome of one interpret request, as translated from the wire response.
#[derive(Debug, Clone, PartialEq)]
pub enum RunOutcome {
    Success(ExecutionResult),
    Failure(ExecutionError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn location_requires_both_halves() {
        assert_eq!(
            SourceLocation::from_parts(Some(3), Some(5)),
            Some(SourceLocation { line: 3, column: 5 })
        );
        assert_eq!(SourceLocation::from_parts(Some(3), None), None);
        assert_eq!(SourceLocation::from_parts(None, Some(5)), None);
        assert_eq!(SourceLocation::from_parts(None, None), None);
    }

    #[test]
    fn location_suffix_format() {
        let loc = SourceLocation { line: 3, column: 5 };
        assert_eq!(loc.to_string(), "(line 3, column 5)");
    }

    #[test]
    fn document_beats_plain_value() {
        let mut result = ExecutionResult {
            value: "Hola mundo".to_string(),
            ..Default::default()
        };
        assert!(!result.has_document());

        result.markup = "<h1>Hi</h1>".to_string();
        assert!(result.has_document());

        result.markup.clear();
        result.stylesheet = "h1{color:red}".to_string();
        assert!(result.has_document());
    }

    #[test]
    fn tab_cycle_is_closed() {
        let mut tab = ActiveTab::Result;
        for _ in 0..3 {
            tab = tab.next();
        }
        assert_eq!(tab, ActiveTab::Result);
        assert_eq!(ActiveTab::Result.prev(), ActiveTab::Ast);
    }
}
