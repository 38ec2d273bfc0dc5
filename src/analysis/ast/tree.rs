//! Language-neutral syntax tree consumed by the analyzers.
//!
//! Parser front ends lower their concrete trees into these nodes. Only the
//! kinds the analyzers care about get their own variant; everything else is
//! kept as [`NodeKind::Other`] with the grammar's kind name so the shape of
//! the tree (and every nested node) survives lowering.
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum NodeKind {
    FunctionDefinition { name: String },
    If,
    For,
    While,
    BooleanAnd,
    BooleanOr,
    With,
    AsyncWith,
    ExceptionHandler,
    Other(String),
}

impl NodeKind {
    /// Decision points add one to the enclosing function's complexity.
    pub fn is_decision_point(&self) -> bool {
        match self {
            Self::If
            | Self::For
            | Self::While
            | Self::BooleanAnd
            | Self::BooleanOr
            | Self::With
            | Self::AsyncWith
            | Self::ExceptionHandler => true,
            Self::FunctionDefinition { .. } | Self::Other(_) => false,
        }
    }

    pub fn is_for(&self) -> bool {
        matches!(self, Self::For)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyntaxNode {
    pub kind: NodeKind,
    /// 1-based line where the node starts
    pub line: usize,
    /// Sub-nodes that are not part of the statement block, in source order
    pub children: Vec<SyntaxNode>,
    /// Statement block for block-bearing nodes (function definitions, loops)
    pub body: Option<Vec<SyntaxNode>>,
}

impl SyntaxNode {
    pub fn new(kind: NodeKind, line: usize) -> Self {
        Self {
            kind,
            line,
            children: Vec::new(),
            body: None,
        }
    }

    pub fn other(kind: impl Into<String>, line: usize) -> Self {
        Self::new(NodeKind::Other(kind.into()), line)
    }

    pub fn function(name: impl Into<String>, line: usize, body: Vec<SyntaxNode>) -> Self {
        Self::new(NodeKind::FunctionDefinition { name: name.into() }, line).with_body(body)
    }

    pub fn for_loop(line: usize, body: Vec<SyntaxNode>) -> Self {
        Self::new(NodeKind::For, line).with_body(body)
    }

    pub fn with_children(mut self, children: Vec<SyntaxNode>) -> Self {
        self.children = children;
        self
    }

    pub fn with_body(mut self, body: Vec<SyntaxNode>) -> Self {
        self.body = Some(body);
        self
    }

    pub fn body_statements(&self) -> &[SyntaxNode] {
        self.body.as_deref().unwrap_or(&[])
    }

    pub fn function_name(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::FunctionDefinition { name } => Some(name),
            _ => None,
        }
    }
}

/// One parsed source unit: its top-level statements.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyntaxTree {
    pub statements: Vec<SyntaxNode>,
}

impl SyntaxTree {
    pub fn new(statements: Vec<SyntaxNode>) -> Self {
        Self { statements }
    }

    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }
}
