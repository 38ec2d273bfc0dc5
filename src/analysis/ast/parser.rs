use crate::analysis::ast::error::AnalysisError;
use crate::analysis::ast::tree::SyntaxTree;

/// Front end turning source text into a [`SyntaxTree`].
///
/// The analyzers never parse anything themselves; the coordinator is handed a
/// parser so tests can substitute hand-built trees and other grammars can be
/// plugged in without touching the analysis code.
pub trait SourceParser: Send + Sync {
    /// Human-readable grammar name used in errors and logs
    fn language(&self) -> &'static str;

    /// Fails with [`AnalysisError::ParseUnavailable`] on malformed input.
    fn parse(&self, source: &str) -> Result<SyntaxTree, AnalysisError>;
}

/// Limits applied by parser front ends before and during lowering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseLimits {
    pub max_source_bytes: usize,
    pub max_nesting_depth: usize,
}

impl Default for ParseLimits {
    fn default() -> Self {
        Self {
            max_source_bytes: 10_000_000,
            max_nesting_depth: 1000,
        }
    }
}
