//! Tree-sitter based Python front end.
//!
//! Lowers tree-sitter's concrete syntax tree into [`SyntaxNode`]s, classifying
//! nodes the way Python's own `ast` module does: `elif` is an `If`, operator
//! chains like `a and b and c` are a single boolean operation, and the
//! `async` forms of `def` and `for` are distinct from their plain forms.
use once_cell::sync::Lazy;
use tree_sitter::{Language, Node, Parser};

use crate::analysis::ast::error::AnalysisError;
use crate::analysis::ast::parser::{ParseLimits, SourceParser};
use crate::analysis::ast::tree::{NodeKind, SyntaxNode, SyntaxTree};
use crate::analysis::timings;

const LANGUAGE_NAME: &str = "Python";

// Languages are expensive to create and can be shared between parsers
static PYTHON_LANGUAGE: Lazy<Language> = Lazy::new(|| tree_sitter_python::LANGUAGE.into());

#[derive(Debug, Clone, Default)]
pub struct PythonParser {
    limits: ParseLimits,
}

impl PythonParser {
    pub fn new(limits: ParseLimits) -> Self {
        Self { limits }
    }

    fn create_parser() -> Result<Parser, AnalysisError> {
        let mut parser = Parser::new();
        parser.set_language(&PYTHON_LANGUAGE).map_err(|e| {
            AnalysisError::parse_unavailable(LANGUAGE_NAME, format!("failed to set parser language: {e}"))
        })?;
        Ok(parser)
    }
}

impl SourceParser for PythonParser {
    fn language(&self) -> &'static str {
        LANGUAGE_NAME
    }

    fn parse(&self, source: &str) -> Result<SyntaxTree, AnalysisError> {
        if source.len() > self.limits.max_source_bytes {
            return Err(AnalysisError::SourceTooLarge {
                size: source.len(),
                limit: self.limits.max_source_bytes,
            });
        }

        let t0 = std::time::Instant::now();
        let mut parser = Self::create_parser()?;
        let tree = parser
            .parse(source, None)
            .ok_or_else(|| AnalysisError::parse_unavailable(LANGUAGE_NAME, "parser produced no tree"))?;

        let root = tree.root_node();
        if root.has_error() {
            let line = first_error_line(root).unwrap_or(1);
            tracing::warn!(line, "python source contains syntax errors");
            return Err(AnalysisError::parse_unavailable(
                LANGUAGE_NAME,
                format!("invalid syntax near line {line}"),
            ));
        }

        let lowering = Lowering {
            source: source.as_bytes(),
            max_depth: self.limits.max_nesting_depth,
        };
        let mut statements = Vec::new();
        lowering.lower_into(root, 0, &mut statements)?;

        timings::record("parse/python", t0.elapsed().as_millis());
        tracing::debug!(statements = statements.len(), bytes = source.len(), "parsed python source");
        Ok(SyntaxTree::new(statements))
    }
}

fn first_error_line(root: Node<'_>) -> Option<usize> {
    let mut stack = vec![root];
    while let Some(node) = stack.pop() {
        if node.is_error() || node.is_missing() {
            return Some(node.start_position().row + 1);
        }
        if !node.has_error() {
            continue;
        }
        let mut cursor = node.walk();
        let children: Vec<Node<'_>> = node.children(&mut cursor).collect();
        stack.extend(children.into_iter().rev());
    }
    None
}

fn line_of(node: Node<'_>) -> usize {
    node.start_position().row + 1
}

/// `async def`, `async for` and `async with` carry a leading `async` token
fn is_async(node: Node<'_>) -> bool {
    let mut cursor = node.walk();
    let first = node.children(&mut cursor).next();
    first.map(|child| child.kind() == "async").unwrap_or(false)
}

fn named_children(node: Node<'_>) -> Vec<Node<'_>> {
    let mut cursor = node.walk();
    node.named_children(&mut cursor)
        .filter(|child| child.kind() != "comment")
        .collect()
}

fn boolean_operator(node: Node<'_>) -> Option<NodeKind> {
    if node.kind() != "boolean_operator" {
        return None;
    }
    match node.child_by_field_name("operator")?.kind() {
        "and" => Some(NodeKind::BooleanAnd),
        "or" => Some(NodeKind::BooleanOr),
        _ => None,
    }
}

struct Lowering<'s> {
    source: &'s [u8],
    max_depth: usize,
}

impl<'s> Lowering<'s> {
    /// Lower `node` and append the result to `out`. Blocks dissolve into their
    /// statements so bodies read as plain statement sequences.
    fn lower_into(&self, node: Node<'_>, depth: usize, out: &mut Vec<SyntaxNode>) -> Result<(), AnalysisError> {
        if depth > self.max_depth {
            return Err(AnalysisError::NestingTooDeep {
                line: line_of(node),
                limit: self.max_depth,
            });
        }

        match node.kind() {
            "module" | "block" => {
                for child in named_children(node) {
                    self.lower_into(child, depth + 1, out)?;
                }
                Ok(())
            }
            _ => {
                out.push(self.lower_node(node, depth)?);
                Ok(())
            }
        }
    }

    fn lower_node(&self, node: Node<'_>, depth: usize) -> Result<SyntaxNode, AnalysisError> {
        let line = line_of(node);
        let kind = match node.kind() {
            "function_definition" if !is_async(node) => NodeKind::FunctionDefinition {
                name: self.function_name(node)?,
            },
            "if_statement" | "elif_clause" => NodeKind::If,
            "for_statement" if !is_async(node) => NodeKind::For,
            "while_statement" => NodeKind::While,
            "with_statement" if is_async(node) => NodeKind::AsyncWith,
            "with_statement" => NodeKind::With,
            "except_clause" | "except_group_clause" => NodeKind::ExceptionHandler,
            "decorated_definition" => return self.lower_decorated(node, depth),
            "boolean_operator" => match boolean_operator(node) {
                Some(kind) => return self.lower_boolean(node, kind, depth),
                None => NodeKind::Other("boolean_operator".to_string()),
            },
            other => NodeKind::Other(other.to_string()),
        };

        let splits_body = matches!(kind, NodeKind::FunctionDefinition { .. } | NodeKind::For);
        let body_node = if splits_body { node.child_by_field_name("body") } else { None };

        let mut lowered = SyntaxNode::new(kind, line);
        for child in named_children(node) {
            if Some(child) == body_node {
                let mut statements = Vec::new();
                self.lower_into(child, depth + 1, &mut statements)?;
                lowered.body = Some(statements);
            } else {
                self.lower_into(child, depth + 1, &mut lowered.children)?;
            }
        }
        Ok(lowered)
    }

    /// Decorators belong to the function they decorate, ahead of its
    /// parameters. Anything else keeps a wrapper node.
    fn lower_decorated(&self, node: Node<'_>, depth: usize) -> Result<SyntaxNode, AnalysisError> {
        let definition = node.child_by_field_name("definition");
        let mut decorators = Vec::new();
        for child in named_children(node) {
            if Some(child) != definition {
                self.lower_into(child, depth + 1, &mut decorators)?;
            }
        }

        let mut lowered = Vec::new();
        if let Some(definition) = definition {
            self.lower_into(definition, depth + 1, &mut lowered)?;
        }
        match lowered.pop() {
            Some(mut function) if lowered.is_empty() && function.function_name().is_some() => {
                decorators.append(&mut function.children);
                function.children = decorators;
                Ok(function)
            }
            rest => {
                let mut wrapper = SyntaxNode::new(NodeKind::Other("decorated_definition".to_string()), line_of(node));
                wrapper.children = decorators;
                wrapper.children.extend(lowered);
                wrapper.children.extend(rest);
                Ok(wrapper)
            }
        }
    }

    fn lower_boolean(&self, node: Node<'_>, kind: NodeKind, depth: usize) -> Result<SyntaxNode, AnalysisError> {
        let mut lowered = SyntaxNode::new(kind.clone(), line_of(node));
        // Explicit stack of operands; same-operator operands are spliced in
        // place, other operands are lowered as ordinary children.
        let mut pending: Vec<Node<'_>> = named_children(node).into_iter().rev().collect();
        while let Some(operand) = pending.pop() {
            if boolean_operator(operand).as_ref() == Some(&kind) {
                pending.extend(named_children(operand).into_iter().rev());
            } else {
                self.lower_into(operand, depth + 1, &mut lowered.children)?;
            }
        }
        Ok(lowered)
    }

    fn function_name(&self, node: Node<'_>) -> Result<String, AnalysisError> {
        let name = node.child_by_field_name("name").ok_or_else(|| {
            AnalysisError::parse_unavailable(
                LANGUAGE_NAME,
                format!("function definition without a name at line {}", line_of(node)),
            )
        })?;
        name.utf8_text(self.source)
            .map(str::to_string)
            .map_err(|e| AnalysisError::parse_unavailable(LANGUAGE_NAME, format!("function name is not UTF-8: {e}")))
    }
}
