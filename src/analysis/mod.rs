/// Tree-based analyzers and the coordinator that drives them
pub mod ast;
pub mod bottlenecks;
pub mod complexity;
pub mod engine;
pub mod files;
pub mod findings;
pub mod timings;

// Re-export commonly used types
pub use bottlenecks::{find_bottlenecks, BottleneckFinding};
pub use complexity::{analyze_complexity, ComplexityReport, FunctionComplexity};
pub use engine::{AnalysisReport, CodeOptimizer, Tool, ToolOutput};
pub use findings::{Finding, Findings};
