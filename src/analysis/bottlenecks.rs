/// Nested-loop detection
use serde::Serialize;

use crate::analysis::ast::tree::SyntaxTree;
use crate::analysis::ast::walk::{walk, walk_tree};
use crate::analysis::findings::{Finding, Findings};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BottleneckFinding {
    pub line: usize,
    pub message: String,
}

impl BottleneckFinding {
    pub fn nested_loop(line: usize) -> Self {
        Self {
            line,
            message: format!("Potential performance bottleneck: Nested loop found at line {line}."),
        }
    }
}

impl Finding for BottleneckFinding {
    const CLEAN_MESSAGE: &'static str = "No obvious performance bottlenecks found.";

    fn message(&self) -> &str {
        &self.message
    }
}

/// Flag `for` loops whose first body statement contains another `for`.
///
/// Only the first statement is inspected: a nested loop further down the
/// body is not reported. One finding per outer loop, cited at the outer
/// loop's line.
pub fn find_bottlenecks(tree: &SyntaxTree) -> Findings<BottleneckFinding> {
    let mut findings = Vec::new();

    for node in walk_tree(tree).filter(|n| n.kind.is_for()) {
        let Some(first) = node.body_statements().first() else {
            tracing::trace!(line = node.line, "skipping loop without body");
            continue;
        };
        if walk(first).any(|n| n.kind.is_for()) {
            findings.push(BottleneckFinding::nested_loop(node.line));
        }
    }

    tracing::debug!(findings = findings.len(), "bottleneck analysis finished");
    Findings::from_vec(findings)
}
