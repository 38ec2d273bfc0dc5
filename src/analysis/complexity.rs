/// Per-function cyclomatic-style complexity
use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::analysis::ast::error::AnalysisError;
use crate::analysis::ast::tree::{SyntaxNode, SyntaxTree};
use crate::analysis::ast::walk::{walk, walk_tree};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionComplexity {
    pub name: String,
    pub complexity: u32,
}

/// Function name to complexity score, in first-insertion order.
///
/// Inserting a name that is already present replaces its score in place, so
/// when two functions share a name the one visited last wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ComplexityReport {
    entries: Vec<FunctionComplexity>,
}

impl ComplexityReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: &str, complexity: u32) {
        match self.entries.iter_mut().find(|e| e.name == name) {
            Some(entry) => entry.complexity = complexity,
            None => self.entries.push(FunctionComplexity {
                name: name.to_string(),
                complexity,
            }),
        }
    }

    pub fn get(&self, name: &str) -> Option<u32> {
        self.entries.iter().find(|e| e.name == name).map(|e| e.complexity)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FunctionComplexity> {
        self.entries.iter()
    }

    pub fn max(&self) -> Option<&FunctionComplexity> {
        self.entries.iter().max_by_key(|e| e.complexity)
    }
}

impl Serialize for ComplexityReport {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for entry in &self.entries {
            map.serialize_entry(&entry.name, &entry.complexity)?;
        }
        map.end()
    }
}

/// Score every function definition in the tree.
///
/// A function scores 1 plus the number of decision points anywhere in its
/// subtree, nested function definitions included, so an inner function's
/// branches count towards both the inner and the enclosing score.
pub fn analyze_complexity(tree: &SyntaxTree) -> Result<ComplexityReport, AnalysisError> {
    let mut report = ComplexityReport::new();

    for node in walk_tree(tree) {
        let Some(name) = node.function_name() else {
            continue;
        };
        if node.body.is_none() {
            return Err(AnalysisError::structural(
                node.line,
                format!("function definition '{name}' has no body"),
            ));
        }
        let score = function_complexity(node);
        tracing::trace!(function = name, line = node.line, score, "scored function");
        report.insert(name, score);
    }

    tracing::debug!(functions = report.len(), "complexity analysis finished");
    Ok(report)
}

fn function_complexity(function: &SyntaxNode) -> u32 {
    let decisions = walk(function).filter(|n| n.kind.is_decision_point()).count();
    u32::try_from(decisions).unwrap_or(u32::MAX).saturating_add(1)
}
