//! Extraction feature tests
//!
//! Structural facts and advisory hints as seen through `SourceAnalyzer`.

#[path = "../common/mod.rs"]
mod common;

use codegraph_analysis::config::AnalysisConfig;
use codegraph_analysis::features::classification::ErrorCategory;
use codegraph_analysis::features::hints::{Condition, HintEngine, PatternRule};
use codegraph_analysis::shared::models::{ParameterKind, StructuralModel};
use codegraph_analysis::{AnalysisContext, AnalysisOutcome, ErrorClassifier, SourceAnalyzer};
use common::fixtures::*;
use pretty_assertions::assert_eq;

fn analyze_with(analyzer: &SourceAnalyzer, path: &str, source: &str) -> AnalysisOutcome {
    let mut classifier = ErrorClassifier::new();
    let mut ctx = AnalysisContext::new(&mut classifier, true);
    analyzer
        .analyze_source(path, source, &mut ctx)
        .expect("contained failures never return Err")
        .outcome
}

fn model(source: &str) -> StructuralModel {
    let analyzer = SourceAnalyzer::new(AnalysisConfig::default());
    match analyze_with(&analyzer, "module.py", source) {
        AnalysisOutcome::Success { model } => *model,
        other => panic!("expected success, got {:?}", other),
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Module-level facts
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn module_docstring_is_cleaned() {
    let m = model(FEATURE_RICH);
    assert_eq!(
        m.docstring.as_deref(),
        Some("Feature rich module.\n\nSecond paragraph.")
    );
    assert_eq!(m.file_path, "module.py");
    assert!(m.encoding.is_none());
    assert!(!m.truncated);
}

#[test]
fn imports_in_source_order() {
    let m = model(FEATURE_RICH);
    let modules: Vec<&str> = m.imports.iter().map(|i| i.module.as_str()).collect();
    assert_eq!(
        modules,
        vec![
            "__future__",
            "json",
            "os.path",
            "abc",
            "dataclasses",
            "models",
            "shared",
            "ujson"
        ]
    );

    let aliased = &m.imports[2];
    assert_eq!(aliased.imported_items[0].alias.as_deref(), Some("osp"));
    assert!(!aliased.is_from_style);

    let relative = &m.imports[5];
    assert_eq!(relative.relative_level, Some(1));
    let names: Vec<&str> = relative
        .imported_items
        .iter()
        .map(|i| i.name.as_str())
        .collect();
    assert_eq!(names, vec!["User", "Group"]);
    assert_eq!(relative.imported_items[0].alias.as_deref(), Some("Account"));

    let star = &m.imports[6];
    assert_eq!(star.relative_level, Some(2));
    assert!(star.is_star());
}

#[test]
fn globals_cover_module_level_blocks() {
    let m = model(FEATURE_RICH);
    let globals: Vec<&str> = m.global_variables.iter().map(String::as_str).collect();
    assert_eq!(
        globals,
        vec!["FAST_JSON", "MAX_RETRIES", "SEPARATOR", "counter", "first", "second"]
    );
}

#[test]
fn module_complexity_counts_every_decision_point() {
    let m = model(FEATURE_RICH);
    // for + if + `and` inside numbers(), plus the except clause
    assert_eq!(m.complexity, 5);
    assert!(m.uses_type_hints);
    assert_eq!(m.line_count, FEATURE_RICH.lines().count());
}

#[test]
fn untyped_module_has_no_type_hint_flag() {
    let m = model("def f(a, b=1):\n    return a\n");
    assert!(!m.uses_type_hints);
    assert_eq!(m.complexity, 1);
}

// ═══════════════════════════════════════════════════════════════════════════
// Functions
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn only_module_level_functions_are_listed() {
    let m = model(FEATURE_RICH);
    let names: Vec<&str> = m.functions.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(names, vec!["plain", "fetch", "numbers", "outer"]);
}

#[test]
fn parameters_keep_kinds_types_and_defaults() {
    let m = model(FEATURE_RICH);
    let f = m.function("plain").expect("plain");

    let names: Vec<&str> = f.parameter_names().collect();
    assert_eq!(names, vec!["a", "b", "args", "c", "kwargs"]);

    assert_eq!(f.parameters[1].default_value.as_deref(), Some("1"));
    assert_eq!(f.parameters[2].kind, ParameterKind::VarPositional);
    assert_eq!(f.parameters[3].type_annotation.as_deref(), Some("int"));
    assert_eq!(f.parameters[3].default_value.as_deref(), Some("2"));
    assert_eq!(f.parameters[4].kind, ParameterKind::VarKeyword);
    assert_eq!(f.return_type_hint.as_deref(), Some("dict"));
    assert_eq!(f.docstring.as_deref(), Some("Collects its arguments."));
    assert_eq!(f.complexity, 1);
}

#[test]
fn async_and_generator_markers() {
    let m = model(FEATURE_RICH);

    let fetch = m.function("fetch").expect("fetch");
    assert!(fetch.is_async);
    assert!(!fetch.is_generator);

    let numbers = m.function("numbers").expect("numbers");
    assert!(numbers.is_generator);
    assert!(!numbers.is_async);
    assert_eq!(numbers.complexity, 4);

    // yield-free outer function with a nested def
    let outer = m.function("outer").expect("outer");
    assert!(!outer.is_generator);
    assert_eq!(outer.complexity, 1);
}

#[test]
fn function_spans_are_one_based_lines() {
    let m = model("\n\ndef first():\n    pass\n\n\ndef second():\n    return 2\n");
    let first = m.function("first").expect("first");
    assert_eq!(first.span.start_line, 3);
    assert_eq!(first.span.end_line, 4);
    let second = m.function("second").expect("second");
    assert_eq!(second.span.start_line, 7);
}

// ═══════════════════════════════════════════════════════════════════════════
// Classes
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn dataclass_fields_are_class_attributes() {
    let m = model(FEATURE_RICH);
    let point = m.class("Point").expect("Point");
    assert!(point.is_dataclass);
    assert!(!point.is_abstract);
    assert!(point.has_decorator("dataclass"));

    let x = point.class_attribute("x").expect("x");
    assert_eq!(x.type_annotation.as_deref(), Some("int"));
    assert_eq!(x.default_value_text, None);
    let y = point.class_attribute("y").expect("y");
    assert_eq!(y.default_value_text.as_deref(), Some("0"));
    assert!(point.class_attribute("tags").is_some());
    assert!(point.has_pattern("Data Class"));
}

#[test]
fn abstract_base_with_decorated_methods() {
    let m = model(FEATURE_RICH);
    let shape = m.class("Shape").expect("Shape");
    assert!(shape.is_abstract);
    assert_eq!(shape.base_class_names, vec!["ABC"]);

    let methods: Vec<&str> = shape.methods.iter().map(|m| m.name.as_str()).collect();
    assert_eq!(methods, vec!["area", "name", "unit", "create_default"]);
    assert!(shape.method("name").map_or(false, |m| m.is_property));
    assert!(shape.method("unit").map_or(false, |m| m.is_static_or_class_method));
    assert!(shape
        .method("create_default")
        .map_or(false, |m| m.is_static_or_class_method));

    assert!(shape.has_pattern("Abstract Base Class"));
    assert!(shape.has_pattern("Factory"));
}

#[test]
fn init_assignments_become_instance_attributes() {
    let m = model(FEATURE_RICH);
    let square = m.class("Square").expect("Square");
    assert_eq!(square.base_class_names, vec!["Shape"]);
    assert!(!square.is_abstract);

    let attrs: Vec<(&str, bool, bool)> = square
        .attributes
        .iter()
        .map(|a| (a.name.as_str(), a.is_class_level, a.is_private))
        .collect();
    assert_eq!(
        attrs,
        vec![
            ("sides", true, false),
            ("size", false, false),
            ("_cache", false, true)
        ]
    );
    // first binding wins
    let size = square.attributes.iter().find(|a| a.name == "size").unwrap();
    assert_eq!(size.default_value_text.as_deref(), Some("size"));
}

// ═══════════════════════════════════════════════════════════════════════════
// Hints
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn context_manager_pattern_is_detected() {
    let m = model(CONTEXT_MANAGER);
    let class = m.class("ManagedResource").expect("class");
    assert!(class.has_pattern("Context Manager"));
    assert_eq!(class.docstring.as_deref(), Some("Opens on enter, closes on exit."));
}

#[test]
fn singleton_pattern_is_detected() {
    let m = model(SINGLETON);
    let class = m.class("Registry").expect("class");
    assert!(class.has_pattern("Singleton"));
    assert!(!class.has_pattern("Context Manager"));
}

#[test]
fn framework_hints_follow_imports() {
    assert!(model(DJANGO_VIEW).has_framework("Django"));
    assert!(model(FASTAPI_APP).has_framework("FastAPI"));
    assert!(model(SIMPLE_MODULE).framework_hints.is_empty());
}

#[test]
fn pytest_decorator_is_enough_for_a_framework_hint() {
    let source = "@pytest.fixture\ndef client():\n    return None\n";
    assert!(model(source).has_framework("Pytest"));
}

#[test]
fn custom_rule_table_replaces_builtins() {
    const REPOSITORY: PatternRule = PatternRule::new(
        "Repository",
        Condition::All(&[
            Condition::HasAnyMethod(&["find_by_id", "get_by_id"]),
            Condition::HasMethods(&["save"]),
        ]),
    );
    let analyzer = SourceAnalyzer::new(AnalysisConfig::default())
        .with_hint_engine(HintEngine::empty().with_pattern_rule(REPOSITORY));
    let source = r#"
class UserRepository:
    def find_by_id(self, user_id):
        return None

    def save(self, user):
        pass

    def __enter__(self):
        return self

    def __exit__(self, *exc):
        return False
"#;
    let outcome = analyze_with(&analyzer, "repo.py", source);
    let class = outcome.model().and_then(|m| m.class("UserRepository")).unwrap();
    assert_eq!(
        class
            .detected_patterns
            .iter()
            .map(|p| p.as_str())
            .collect::<Vec<_>>(),
        vec!["Repository"]
    );
}

#[test]
fn broken_hint_rule_leaves_the_file_intact() {
    const BROKEN: PatternRule = PatternRule::new("Broken", Condition::MethodNamePattern("(unclosed"));
    let analyzer = SourceAnalyzer::new(AnalysisConfig::default())
        .with_hint_engine(HintEngine::default().with_pattern_rule(BROKEN));

    let outcome = analyze_with(&analyzer, "cm.py", CONTEXT_MANAGER);
    assert!(outcome.is_success());
    let class = outcome.model().and_then(|m| m.class("ManagedResource")).unwrap();
    assert!(class.has_pattern("Context Manager"));
    assert!(!class.has_pattern("Broken"));
}

// ═══════════════════════════════════════════════════════════════════════════
// Partial and failed outcomes
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn mixed_file_is_partial_with_line_reasons() {
    let analyzer = SourceAnalyzer::new(AnalysisConfig::default());
    match analyze_with(&analyzer, "mixed.py", MIXED_VALID_INVALID) {
        AnalysisOutcome::Partial { model, reasons } => {
            assert!(model.function("ok").is_some());
            assert!(!model.parse_errors.is_empty());
            assert!(reasons.iter().all(|r| r.starts_with("line ")));
            assert_eq!(model.imports[0].module, "os");
        }
        other => panic!("expected partial, got {:?}", other),
    }
}

#[test]
fn tight_node_budget_truncates_instead_of_failing() {
    let config = AnalysisConfig {
        max_nodes: 50,
        ..AnalysisConfig::default()
    };
    let analyzer = SourceAnalyzer::new(config);
    let outcome = analyze_with(&analyzer, "many.py", &n_functions(200));
    match outcome {
        AnalysisOutcome::Partial { model, reasons } => {
            assert!(model.truncated);
            assert!(model.functions.len() < 200);
            assert!(reasons.iter().any(|r| r == "extraction budget exhausted"));
        }
        other => panic!("expected partial, got {:?}", other),
    }
}

#[test]
fn class_body_fanout_is_bounded() {
    let config = AnalysisConfig {
        max_children: 1,
        ..AnalysisConfig::default()
    };
    let analyzer = SourceAnalyzer::new(config);
    match analyze_with(&analyzer, "wide.py", &wide_class(2_000)) {
        AnalysisOutcome::Partial { model, reasons } => {
            assert!(model.truncated);
            let class = model.class("Wide").unwrap();
            assert_eq!(class.attributes.len(), 1);
            assert_eq!(class.attributes[0].name, "attr_0");
            assert!(reasons.iter().any(|r| r == "extraction budget exhausted"));
        }
        other => panic!("expected partial, got {:?}", other),
    }
}

#[test]
fn wide_class_within_budget_keeps_every_attribute() {
    let m = model(&wide_class(2_000));
    assert!(!m.truncated);
    assert_eq!(m.class("Wide").unwrap().attributes.len(), 2_000);
}

#[test]
fn single_class_with_broken_method_is_partial() {
    let analyzer = SourceAnalyzer::new(AnalysisConfig::default());
    match analyze_with(&analyzer, "service.py", CLASS_WITH_BROKEN_METHOD) {
        AnalysisOutcome::Partial { model, reasons } => {
            let class = model.class("Service").unwrap();
            assert!(class.method("ok").is_some());
            assert!(!reasons.is_empty());
        }
        other => panic!("expected partial, got {:?}", other),
    }
}

#[test]
fn unterminated_signature_is_a_syntax_failure() {
    let analyzer = SourceAnalyzer::new(AnalysisConfig::default());
    let mut classifier = ErrorClassifier::new();
    let outcome = {
        let mut ctx = AnalysisContext::new(&mut classifier, true);
        analyzer
            .analyze_source("broken.py", BROKEN_FUNCTION, &mut ctx)
            .unwrap()
            .outcome
    };
    assert_eq!(outcome.failure_category(), Some(ErrorCategory::SyntaxError));
    let record = &classifier.records()[0];
    assert_eq!(record.file_path, "broken.py");
    assert_eq!(record.context.line_count, Some(1));
}

#[test]
fn latin1_file_decodes_with_fallback() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("legacy.py");
    std::fs::write(&path, b"# caf\xe9\nNAME = 'caf\xe9'\n").unwrap();
    let file = codegraph_analysis::FileDescriptor::from_path(&path).unwrap();

    let analyzer = SourceAnalyzer::new(AnalysisConfig::default());
    let mut classifier = ErrorClassifier::new();
    let mut ctx = AnalysisContext::new(&mut classifier, true);
    let outcome = analyzer.analyze(&file, &mut ctx).unwrap();

    let model = outcome.model().expect("decoded");
    assert_eq!(model.encoding.as_deref(), Some("iso-8859-1"));
    assert!(model.global_variables.contains("NAME"));
}
