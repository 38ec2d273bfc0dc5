//! Caller-facing coordinator over the parser and the three analyzers.
use rayon::prelude::*;
use serde::Serialize;
use std::sync::Arc;

use crate::analysis::ast::error::AnalysisError;
use crate::analysis::ast::parser::SourceParser;
use crate::analysis::ast::python::PythonParser;
use crate::analysis::ast::tree::SyntaxTree;
use crate::analysis::bottlenecks::{find_bottlenecks, BottleneckFinding};
use crate::analysis::complexity::{analyze_complexity, ComplexityReport};
use crate::analysis::findings::Findings;
use crate::analysis::timings::timed;
use crate::config::Config;
use crate::security::scanner::{scan_security, SecurityFinding};

/// Results of all three analyzers over one source unit
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnalysisReport {
    pub complexity: ComplexityReport,
    pub bottlenecks: Findings<BottleneckFinding>,
    pub security: Findings<SecurityFinding>,
}

/// Named analysis entry points, one per exposed tool
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tool {
    AnalyzeCodeComplexity,
    FindPerformanceBottlenecks,
    SuggestSecurityImprovements,
    All,
}

impl Tool {
    pub const ALL: [Tool; 4] = [
        Tool::AnalyzeCodeComplexity,
        Tool::FindPerformanceBottlenecks,
        Tool::SuggestSecurityImprovements,
        Tool::All,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::AnalyzeCodeComplexity => "analyze_code_complexity",
            Self::FindPerformanceBottlenecks => "find_performance_bottlenecks",
            Self::SuggestSecurityImprovements => "suggest_security_improvements",
            Self::All => "all",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.name() == name)
    }
}

impl std::fmt::Display for Tool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Tool output in the shape callers receive it: a name-to-score object for
/// complexity, a list of messages for the finding-based tools.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ToolOutput {
    Complexity(ComplexityReport),
    Messages(Vec<String>),
    Report(AnalysisReport),
}

#[derive(Clone)]
pub struct CodeOptimizer {
    parser: Arc<dyn SourceParser>,
}

impl Default for CodeOptimizer {
    fn default() -> Self {
        Self::new(PythonParser::default())
    }
}

impl CodeOptimizer {
    pub fn new(parser: impl SourceParser + 'static) -> Self {
        Self {
            parser: Arc::new(parser),
        }
    }

    /// Python front end configured with the limits from `cfg`
    pub fn from_config(cfg: &Config) -> Self {
        Self::new(PythonParser::new(cfg.parse_limits()))
    }

    pub fn language(&self) -> &'static str {
        self.parser.language()
    }

    pub fn parse(&self, code: &str) -> Result<SyntaxTree, AnalysisError> {
        self.parser.parse(code)
    }

    pub fn analyze_code_complexity(&self, code: &str) -> Result<ComplexityReport, AnalysisError> {
        let tree = self.parse(code)?;
        timed("analyze/complexity", || analyze_complexity(&tree))
    }

    pub fn find_performance_bottlenecks(&self, code: &str) -> Result<Findings<BottleneckFinding>, AnalysisError> {
        let tree = self.parse(code)?;
        Ok(timed("analyze/bottlenecks", || find_bottlenecks(&tree)))
    }

    /// Never fails: the scanner works on raw text and needs no parse.
    pub fn suggest_security_improvements(&self, code: &str) -> Findings<SecurityFinding> {
        timed("analyze/security", || scan_security(code))
    }

    /// Parse once and run every analyzer over the same tree.
    pub fn analyze(&self, code: &str) -> Result<AnalysisReport, AnalysisError> {
        let tree = self.parse(code)?;
        let complexity = timed("analyze/complexity", || analyze_complexity(&tree))?;
        let bottlenecks = timed("analyze/bottlenecks", || find_bottlenecks(&tree));
        let security = timed("analyze/security", || scan_security(code));
        tracing::debug!(
            language = self.language(),
            functions = complexity.len(),
            bottlenecks = bottlenecks.len(),
            security = security.len(),
            "analysis finished"
        );
        Ok(AnalysisReport {
            complexity,
            bottlenecks,
            security,
        })
    }

    pub fn invoke(&self, tool: Tool, code: &str) -> Result<ToolOutput, AnalysisError> {
        Ok(match tool {
            Tool::AnalyzeCodeComplexity => ToolOutput::Complexity(self.analyze_code_complexity(code)?),
            Tool::FindPerformanceBottlenecks => ToolOutput::Messages(self.find_performance_bottlenecks(code)?.messages()),
            Tool::SuggestSecurityImprovements => ToolOutput::Messages(self.suggest_security_improvements(code).messages()),
            Tool::All => ToolOutput::Report(self.analyze(code)?),
        })
    }

    /// Run `tool` over independent sources in parallel. Results keep the
    /// input order and carry the caller's label.
    pub fn invoke_concurrent<'a>(
        &self,
        tool: Tool,
        sources: &'a [(String, String)],
    ) -> Vec<(&'a str, Result<ToolOutput, AnalysisError>)> {
        sources
            .par_iter()
            .map(|(label, code)| (label.as_str(), self.invoke(tool, code)))
            .collect()
    }

    pub fn analyze_sources_concurrent<'a>(
        &self,
        sources: &'a [(String, String)],
    ) -> Vec<(&'a str, Result<AnalysisReport, AnalysisError>)> {
        sources
            .par_iter()
            .map(|(label, code)| (label.as_str(), self.analyze(code)))
            .collect()
    }
}
