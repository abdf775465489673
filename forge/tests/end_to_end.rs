use forge::ast::{DebugPrintLimits, NodeKind};
use forge::backend::CodegenBackend;
use forge::diagnostics::{Message, MessageBuffer, MessageQuery, QuerySingleResult, Severity};
use forge::harness::eval::EvalValue;
use forge::harness::fake;
use forge::harness::substituter::Substituter;
use forge::parser;
use forge::source::Source;
use test_utils::{check_function_returns, check_unable_to_parse, check_unable_to_verify};

/// Scenario 1 — empty program (`spec.md` §8). The real backend's IR
/// text (`; ModuleID = 'forge' ...`) is out of this crate's scope
/// (`spec.md` §1 Non-goals); this asserts the in-scope half: the empty
/// AST shape and a clean diagnostic buffer.
#[test]
fn empty_program_parses_to_an_empty_declaration_block() {
    let source = Source::from_buffer("empty.forge", "");
    let mut buffer = MessageBuffer::new();
    let ast = parser::parse(&source, &mut buffer);

    assert!(!buffer.had_errors());
    assert_eq!(buffer.total(), 0);
    match ast.kind {
        NodeKind::DeclarationBlock { children } => assert!(children.is_empty()),
        other => panic!("expected a declaration-block, got {other:?}"),
    }
}

/// Scenario 2 — boolean literal debug-print/clone round trip.
#[test]
fn boolean_literal_debug_prints_and_clones_identically() {
    let node = forge::ast::Node::synthetic(NodeKind::ValueBool { value: true });
    assert_eq!(node.debug_print(DebugPrintLimits::default()), "[value-bool]\n  value = true");
    assert!(node.compare(&node.clone()));
}

/// Scenario 3 — an AST-debug mismatch report. The harness's own
/// AST-auxiliary check only requires a reflexive round trip (it has no
/// external "expected AST" fixture to diff against), so this exercises
/// the mismatch directly against `structural_eq`/`debug_print`, which
/// is what a real expected-vs-actual comparison is built from.
#[test]
fn mismatched_ast_debug_prints_differ() {
    let expected = forge::ast::Node::synthetic(NodeKind::ValueBool { value: false });
    let actual = forge::ast::Node::synthetic(NodeKind::ValueBool { value: true });
    assert_ne!(
        expected.debug_print(DebugPrintLimits::default()),
        actual.debug_print(DebugPrintLimits::default())
    );
    assert!(!expected.compare(&actual));
}

/// Scenario 4 — substitution grammar.
#[test]
fn substitution_grammar_matches_every_documented_case() {
    let mut s = Substituter::new();
    s.set("x", "123");
    s.set("asdf", "abc");
    s.set("empty", "");
    s.set("number", "5");

    assert_eq!(s.substitute("%(x)"), "123");
    assert_eq!(s.substitute("%%(x)"), "%(x)");
    assert_eq!(s.substitute("%(y)"), "");
    assert_eq!(s.substitute("a%(empty)b"), "ab");
    assert_eq!(s.substitute("a%(number)b"), "a5b");
    assert_eq!(s.substitute("%%"), "%");
    assert_eq!(s.substitute("%a"), "a");
}

/// Scenario 5 — message query exactness.
#[test]
fn message_query_distinguishes_none_single_and_multiple() {
    let mut buffer = MessageBuffer::new();
    buffer.emit(Message::new(Severity::Error, "Hi"));
    buffer.emit(Message::new(Severity::Error, "Bye"));

    let one = buffer.query(&MessageQuery::default().with_severity(Severity::Error).with_text("Hi"));
    assert_eq!(one.len(), 1);

    let both = buffer.query(&MessageQuery::default().with_severity(Severity::Error));
    assert_eq!(both.len(), 2);

    assert!(matches!(
        buffer.query_single(&MessageQuery::default()),
        QuerySingleResult::None
    ));
}

/// Scenario 6 — mismatched return type is reported and the offending
/// subtree is skipped, not aborting the whole pass.
#[test]
fn mismatched_return_type_is_reported_once() {
    let result = check_unable_to_verify(
        "return_mismatch.forge",
        "fn broken() -> i32 { return 1.0; }",
    );
    assert!(result.is_ok(), "{result:?}");
}

#[test]
fn malformed_source_is_rejected_during_parsing() {
    let result = check_unable_to_parse("malformed.forge", "fn ( @ { }");
    assert!(result.is_ok(), "{result:?}");
}

#[test]
fn unresolved_symbol_is_rejected_during_verification() {
    let result = check_unable_to_verify("unresolved.forge", "fn broken() -> i32 { return missing; }");
    assert!(result.is_ok(), "{result:?}");
}

#[test]
fn a_function_compiles_links_loads_and_returns_the_expected_value() {
    let result = check_function_returns(
        "arithmetic.forge",
        "fn answer() -> i32 { return 40 + 2; }",
        "answer",
        EvalValue::Int(42),
    );
    assert!(result.is_ok(), "{result:?}");
}

#[test]
fn fake_backend_prints_function_bodies_as_textual_ir() {
    let source = Source::from_buffer("print.forge", "fn answer() -> i32 { return 1; }");
    let mut buffer = MessageBuffer::new();
    let mut ast = parser::parse(&source, &mut buffer);
    forge::verifier::verify(&mut ast, &mut buffer);
    assert!(!buffer.had_errors());

    let (backend, _loader) = fake::new_pair();
    let module = backend.compile(&ast).expect("compiles");
    let mut text = String::new();
    backend.print(&module, &mut text).unwrap();
    assert!(text.contains("fn answer:"));
}
