mod common;

use common::RecordingEngine;
use kodiak_lang::core::ast::{CmpOp, Expr, Statement};
use kodiak_lang::core::dispatch::{dispatch, Dispatched};
use kodiak_lang::core::parser::Parser;

fn parse_one(src: &str) -> Statement {
    let mut p = Parser::new(src);
    let parsed = p.next_statement(false).expect("one statement").expect("parses");
    assert!(p.next_statement(false).is_none(), "more than one statement in {src:?}");
    parsed.statement
}

/// Dispatches a single statement and returns the engine calls it made.
fn calls(src: &str) -> Vec<String> {
    let mut engine = RecordingEngine::new();
    let outcome = dispatch(&parse_one(src), &mut engine).expect("dispatch");
    assert_eq!(outcome, Dispatched::Engine);
    engine.calls
}

#[test]
fn every_engine_statement_makes_exactly_one_call() {
    let cases = [
        ("var x in [0, 1]", "declare_variable x [0, 1] Variable"),
        ("param p in [-1, 1]", "declare_variable p [-1, 1] Parameter"),
        ("const c = -3", "declare_constant c -3"),
        ("define f = x * 2", "define f (x * 2)"),
        ("objfn x + 1", "set_objective (x + 1) env=0"),
        ("dfeq = x ^ 2", "set_differential (x ^ 2) env=0"),
        ("cnstr x <= 4", "add_constraint (x - 4) <= 0 env=0"),
        ("set precision = -2", "set_precision -2"),
        ("set resolution = 0.5", "set_resolution 0.5"),
        ("set resolution x = 0.25", "set_variable_resolution x 0.25"),
        ("set granularity = 2", "set_granularity 2"),
        ("set depth = 3", "set_depth 3"),
        ("set varselect = 2", "set_var_select 2"),
        ("set bp = true", "set_bp true"),
        ("set safe input = false", "set_safe_input false"),
        ("set debug = true", "set_debug true"),
        ("set name = box", "set_name box"),
        ("set output = result.txt", "set_output \"result.txt\""),
        ("reset output", "set_output \"\""),
        ("set paving mode = full", "set_paving_mode full"),
        ("pave", "pave"),
        ("bifurcation", "bifurcation false"),
        ("equilibrium", "bifurcation true"),
        ("min", "minmax Min"),
        ("max", "minmax Max"),
        ("minmax", "minmax Both"),
        ("reset", "reset_session"),
        ("save paving p1", "save_paving p1"),
        ("load paving p1", "load_paving p1"),
        ("plot p1 x y", "plot p1 x y"),
        ("plot p1 x y z", "plot p1 x y z"),
    ];
    for (src, expected) in cases {
        assert_eq!(calls(src), vec![expected.to_string()], "statement {src:?}");
    }
}

#[test]
fn keywords_are_case_insensitive() {
    assert_eq!(calls("PAVE"), vec!["pave"]);
    assert_eq!(calls("Set Safe Input = TRUE"), vec!["set_safe_input true"]);
}

#[test]
fn constraint_against_zero_is_not_folded() {
    match parse_one("cnstr = x + 2 = 0") {
        Statement::Constraint { constraint, .. } => {
            assert_eq!(constraint.op, CmpOp::Eq);
            assert_eq!(constraint.expr.to_string(), "(x + 2)");
        }
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn constraint_with_nonzero_rhs_folds_into_difference() {
    match parse_one("cnstr x > y * 2") {
        Statement::Constraint { constraint, .. } => {
            assert_eq!(constraint.op, CmpOp::Gt);
            assert_eq!(constraint.expr.to_string(), "(x - (y * 2))");
        }
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn let_chain_is_handed_to_the_engine() {
    let stmt = parse_one("objfn let a = x + 1, b = a * a in b - 1");
    match &stmt {
        Statement::Objective { bindings, expr } => {
            assert_eq!(bindings.len(), 2);
            assert_eq!(bindings[1].name, "b");
            assert_eq!(expr, &Expr::binary(
                kodiak_lang::core::ast::BinaryOp::Sub,
                Expr::ident("b"),
                Expr::int(1)
            ));
        }
        other => panic!("unexpected {other:?}"),
    }
    let mut engine = RecordingEngine::new();
    dispatch(&stmt, &mut engine).unwrap();
    assert_eq!(engine.calls, vec!["set_objective (b - 1) env=2"]);
}

#[test]
fn forall_is_echoed_without_engine_call() {
    let mut engine = RecordingEngine::new();
    let stmt = parse_one("forall x < 1 and y > 0 or x = y");
    let outcome = dispatch(&stmt, &mut engine).unwrap();
    assert_eq!(
        outcome,
        Dispatched::Echo("forall ((x < 1 and y > 0) or x = y)".into())
    );
    assert!(engine.calls.is_empty());
}

#[test]
fn session_control_is_left_to_the_caller() {
    for src in ["file models/box.kdk", "quit", "exit", "help"] {
        let mut engine = RecordingEngine::new();
        assert_eq!(dispatch(&parse_one(src), &mut engine).unwrap(), Dispatched::Control);
        assert!(engine.calls.is_empty());
    }
}

#[test]
fn engine_failure_surfaces_as_domain_error() {
    let mut engine = RecordingEngine {
        fail_on: Some("pave"),
        ..RecordingEngine::new()
    };
    let err = dispatch(&parse_one("pave"), &mut engine).unwrap_err();
    assert_eq!(err.message, "pave rejected");
}

#[test]
fn malformed_statements_are_syntax_errors() {
    for src in [
        "var x [0, 1]",
        "var x in [0 1]",
        "const c = x",
        "set resolution = -1",
        "set paving mode = fast",
        "plot p1 x",
        "file notes.txt",
        "frobnicate",
        "cnstr x < 1 < 2",
        "forall x",
    ] {
        let mut p = Parser::new(src);
        let err = p.next_statement(true).unwrap().unwrap_err();
        assert_eq!(
            err.kind(),
            kodiak_lang::core::error::ErrorKind::Syntax,
            "{src:?} gave {err}"
        );
    }
}

#[test]
fn zero_rhs_and_negative_rhs_normalize_to_the_same_shape() {
    let constraint = |src: &str| match parse_one(src) {
        Statement::Constraint { constraint, .. } => constraint,
        other => panic!("unexpected {other:?}"),
    };
    let unfolded = constraint("cnstr = x+2 = 0");
    let folded = constraint("cnstr = x = -2");
    assert_eq!(unfolded.op, folded.op);
    assert_eq!(unfolded.expr.to_string(), "(x + 2)");
    assert_eq!(folded.expr.to_string(), "(x - -2)");
}

#[test]
fn let_names_belong_to_their_statement() {
    let mut p = Parser::new("objfn = let x=5+y in x+y; objfn x");
    match p.next_statement(true).unwrap().unwrap().statement {
        Statement::Objective { bindings, expr } => {
            assert_eq!(bindings[0].name, "x");
            assert_eq!(bindings[0].expr.to_string(), "(5 + y)");
            assert_eq!(expr.to_string(), "(x + y)");
        }
        other => panic!("unexpected {other:?}"),
    }
    match p.next_statement(true).unwrap().unwrap().statement {
        Statement::Objective { bindings, .. } => assert!(bindings.is_empty()),
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn compound_chain_dispatches_in_source_order() {
    let mut engine = RecordingEngine::new();
    let mut p = Parser::new("var x in [4,5]; var y in [3,5];");
    while let Some(parsed) = p.next_statement(true) {
        dispatch(&parsed.unwrap().statement, &mut engine).unwrap();
    }
    assert_eq!(
        engine.calls,
        vec!["declare_variable x [4, 5] Variable", "declare_variable y [3, 5] Variable"]
    );
}

#[test]
fn interval_bounds_are_expressions() {
    match parse_one("var x in [(4+2)*4, 2+4*2]") {
        Statement::Declare { interval, .. } => {
            assert_eq!(interval.to_string(), "[((4 + 2) * 4), (2 + (4 * 2))]");
        }
        other => panic!("unexpected {other:?}"),
    }
}
