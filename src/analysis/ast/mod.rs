/// Syntax tree model, traversal and parser front ends
pub mod error;
pub mod parser;
pub mod python;
pub mod tree;
pub mod walk;

// Re-export main types for convenience
pub use error::AnalysisError;
pub use parser::{ParseLimits, SourceParser};
pub use python::PythonParser;
pub use tree::{NodeKind, SyntaxNode, SyntaxTree};
pub use walk::{walk, walk_tree, Walk};
