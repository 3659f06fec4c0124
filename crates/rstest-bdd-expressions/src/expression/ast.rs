//! Expression tree produced by the parser and consumed by the rewriter.

/// One node of a parsed expression, with the byte span it covers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    /// What the node is, including its payload.
    pub kind: NodeKind,
    /// Zero-based byte offset where the node starts in the source.
    pub start: usize,
    /// Zero-based byte offset one past the node's last byte.
    pub end: usize,
}

/// Node kinds. Containers carry children; `Text` and `Parameter` carry text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    /// The root of a parsed expression.
    Expression(Vec<Node>),
    /// Literal text, already unescaped.
    Text(String),
    /// `( ... )`: matches its content or nothing.
    Optional(Vec<Node>),
    /// `a/b/c`: children are [`NodeKind::Alternative`] nodes.
    Alternation(Vec<Node>),
    /// One branch of an alternation.
    Alternative(Vec<Node>),
    /// `{name}`: the name of the parameter type.
    Parameter(String),
}

impl Node {
    /// Create a node spanning `start..end`.
    #[must_use]
    pub const fn new(kind: NodeKind, start: usize, end: usize) -> Self {
        Self { kind, start, end }
    }

    /// Child nodes; empty for `Text` and `Parameter`.
    #[must_use]
    pub fn children(&self) -> &[Self] {
        match &self.kind {
            NodeKind::Expression(children)
            | NodeKind::Optional(children)
            | NodeKind::Alternation(children)
            | NodeKind::Alternative(children) => children,
            NodeKind::Text(_) | NodeKind::Parameter(_) => &[],
        }
    }

    /// Text carried by `Text` and `Parameter` nodes.
    #[must_use]
    pub fn text(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::Text(text) | NodeKind::Parameter(text) => Some(text.as_str()),
            _ => None,
        }
    }

    /// Whether the node is literal text.
    #[must_use]
    pub const fn is_text(&self) -> bool {
        matches!(self.kind, NodeKind::Text(_))
    }

    /// Whether the node is a parameter placeholder.
    #[must_use]
    pub const fn is_parameter(&self) -> bool {
        matches!(self.kind, NodeKind::Parameter(_))
    }
}
