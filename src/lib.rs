//! Static analysis of Python sources: per-function complexity, nested-loop
//! bottlenecks and known-dangerous API usage.

/// Complexity and bottleneck analysis over parsed syntax trees
pub mod analysis;

/// Text-level security pattern scanning
pub mod security;

/// Configuration from environment and config file
pub mod config;

// Re-export commonly used types for convenience
pub use analysis::ast::{AnalysisError, NodeKind, PythonParser, SourceParser, SyntaxNode, SyntaxTree};
pub use analysis::{
    analyze_complexity, find_bottlenecks, AnalysisReport, BottleneckFinding, CodeOptimizer, ComplexityReport,
    Findings, Tool, ToolOutput,
};
pub use config::{load_config, Config};
pub use security::{scan_security, SecurityFinding};
