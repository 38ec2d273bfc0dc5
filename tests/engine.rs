use code_optimizer::analysis::ast::{NodeKind, SyntaxNode, SyntaxTree};
use code_optimizer::{AnalysisError, CodeOptimizer, SourceParser, Tool, ToolOutput};

const SAMPLE: &str = "import pickle\n\ndef load_all(paths):\n    out = []\n    for p in paths:\n        for line in open(p):\n            if line and not line.startswith('#'):\n                out.append(pickle.loads(line))\n    return out\n";

/// Front end returning a fixed tree, for driving the coordinator without a grammar
struct FixedTree(SyntaxTree);

impl SourceParser for FixedTree {
    fn language(&self) -> &'static str {
        "fixed"
    }

    fn parse(&self, _source: &str) -> Result<SyntaxTree, AnalysisError> {
        Ok(self.0.clone())
    }
}

struct AlwaysFails;

impl SourceParser for AlwaysFails {
    fn language(&self) -> &'static str {
        "broken"
    }

    fn parse(&self, _source: &str) -> Result<SyntaxTree, AnalysisError> {
        Err(AnalysisError::parse_unavailable("broken", "no grammar"))
    }
}

#[test]
fn analyze_runs_all_three_analyzers() {
    let report = CodeOptimizer::default().analyze(SAMPLE).unwrap();
    // for, for, if, and
    assert_eq!(report.complexity.get("load_all"), Some(5));
    assert_eq!(report.bottlenecks.len(), 1);
    assert_eq!(report.bottlenecks.as_slice()[0].line, 5);
    assert_eq!(report.security.len(), 1);
}

#[test]
fn empty_code_gives_empty_report_and_sentinels() {
    let report = CodeOptimizer::default().analyze("").unwrap();
    assert!(report.complexity.is_empty());
    assert!(report.bottlenecks.is_clean());
    assert!(report.security.is_clean());
}

#[test]
fn tool_outputs_match_caller_facing_shapes() {
    let optimizer = CodeOptimizer::default();

    let complexity = optimizer.invoke(Tool::AnalyzeCodeComplexity, SAMPLE).unwrap();
    assert_eq!(serde_json::to_value(&complexity).unwrap(), serde_json::json!({"load_all": 5}));

    let bottlenecks = optimizer.invoke(Tool::FindPerformanceBottlenecks, SAMPLE).unwrap();
    assert_eq!(
        bottlenecks,
        ToolOutput::Messages(vec!["Potential performance bottleneck: Nested loop found at line 5.".to_string()])
    );

    let clean = optimizer.invoke(Tool::SuggestSecurityImprovements, "x = 1\n").unwrap();
    assert_eq!(
        serde_json::to_value(&clean).unwrap(),
        serde_json::json!(["No obvious security vulnerabilities found."])
    );
}

#[test]
fn full_report_serializes_with_status_tags() {
    let out = CodeOptimizer::default().invoke(Tool::All, "def f():\n    pass\n").unwrap();
    let v = serde_json::to_value(&out).unwrap();
    assert_eq!(v["complexity"]["f"], 1);
    assert_eq!(v["bottlenecks"]["status"], "clean");
    assert_eq!(v["security"]["status"], "clean");
}

#[test]
fn tool_names_round_trip() {
    for tool in Tool::ALL {
        assert_eq!(Tool::from_name(tool.name()), Some(tool));
    }
    assert_eq!(Tool::from_name("analyze_code_complexity"), Some(Tool::AnalyzeCodeComplexity));
    assert_eq!(Tool::from_name("nope"), None);
}

#[test]
fn parse_failure_propagates_unchanged() {
    let optimizer = CodeOptimizer::new(AlwaysFails);
    let expected = AnalysisError::parse_unavailable("broken", "no grammar");
    assert_eq!(optimizer.analyze_code_complexity("x").unwrap_err(), expected);
    assert_eq!(optimizer.find_performance_bottlenecks("x").unwrap_err(), expected);
    assert_eq!(optimizer.analyze("x").unwrap_err(), expected);
    // the text scanner does not depend on the parser
    assert!(optimizer.suggest_security_improvements("eval(x)").len() == 1);
}

#[test]
fn injected_parser_drives_tree_analyzers() {
    let tree = SyntaxTree::new(vec![SyntaxNode::function(
        "scan",
        1,
        vec![SyntaxNode::for_loop(2, vec![SyntaxNode::for_loop(3, vec![])])],
    )]);
    let optimizer = CodeOptimizer::new(FixedTree(tree));
    assert_eq!(optimizer.language(), "fixed");
    let report = optimizer.analyze("ignored").unwrap();
    assert_eq!(report.complexity.get("scan"), Some(3));
    assert_eq!(report.bottlenecks.as_slice()[0].line, 2);
}

#[test]
fn structural_error_aborts_full_analysis() {
    let tree = SyntaxTree::new(vec![SyntaxNode::new(
        NodeKind::FunctionDefinition { name: "f".into() },
        4,
    )]);
    let res = CodeOptimizer::new(FixedTree(tree)).analyze("");
    assert!(matches!(res, Err(AnalysisError::Structural { line: 4, .. })), "{res:?}");
}

#[test]
fn concurrent_invocations_keep_input_order() {
    let sources: Vec<(String, String)> = (0..16)
        .map(|i| {
            let code = if i % 2 == 0 {
                format!("def f{i}():\n    if x:\n        pass\n")
            } else {
                "def broken(:\n".to_string()
            };
            (format!("src{i}"), code)
        })
        .collect();

    let results = CodeOptimizer::default().invoke_concurrent(Tool::AnalyzeCodeComplexity, &sources);
    assert_eq!(results.len(), 16);
    for (i, (label, result)) in results.iter().enumerate() {
        assert_eq!(*label, format!("src{i}"));
        if i % 2 == 0 {
            match result {
                Ok(ToolOutput::Complexity(report)) => assert_eq!(report.get(&format!("f{i}")), Some(2)),
                other => panic!("unexpected {other:?}"),
            }
        } else {
            assert!(matches!(result, Err(AnalysisError::ParseUnavailable { .. })));
        }
    }
}

#[test]
fn batch_analysis_matches_single_analysis() {
    let optimizer = CodeOptimizer::default();
    let sources = vec![("a".to_string(), SAMPLE.to_string()), ("b".to_string(), String::new())];
    let batch = optimizer.analyze_sources_concurrent(&sources);
    assert_eq!(batch[0].1.as_ref().unwrap(), &optimizer.analyze(SAMPLE).unwrap());
    assert!(batch[1].1.as_ref().unwrap().complexity.is_empty());
}

#[test]
fn repeated_analysis_is_byte_identical() {
    let optimizer = CodeOptimizer::default();
    let a = serde_json::to_string(&optimizer.analyze(SAMPLE).unwrap()).unwrap();
    let b = serde_json::to_string(&optimizer.analyze(SAMPLE).unwrap()).unwrap();
    assert_eq!(a, b);
}
