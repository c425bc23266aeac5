use kodiak_lang::core::ast::{BinaryOp, Expr};
use kodiak_lang::core::error::ErrorKind;
use kodiak_lang::core::parser::{Parser, MAX_NESTING};

fn canonical(src: &str) -> String {
    Parser::new(src).parse_expression().unwrap().to_string()
}

#[test]
fn mixed_chain_serializes_fully_parenthesized() {
    assert_eq!(
        canonical("-(x+4)*5*x^3 - 2*(5+y)"),
        "(((-(x + 4) * 5) * (x ^ 3)) - (2 * (5 + y)))"
    );
}

#[test]
fn product_binds_tighter_than_sum() {
    insta::assert_snapshot!(canonical("1 + 2 * 3"), @"(1 + (2 * 3))");
    insta::assert_snapshot!(canonical("1 * 2 + 3"), @"((1 * 2) + 3)");
}

#[test]
fn same_level_operators_associate_left() {
    insta::assert_snapshot!(canonical("a - b - c"), @"((a - b) - c)");
    insta::assert_snapshot!(canonical("a / b * c"), @"((a / b) * c)");
    insta::assert_snapshot!(canonical("2 ^ 3 ^ 2"), @"((2 ^ 3) ^ 2)");
}

#[test]
fn unary_minus_binds_tighter_than_power() {
    let e = Parser::new("-x^2").parse_expression().unwrap();
    assert_eq!(e, Expr::binary(BinaryOp::Pow, Expr::neg(Expr::ident("x")), Expr::int(2)));
    insta::assert_snapshot!(e.to_string(), @"(-x ^ 2)");
}

#[test]
fn grouping_parentheses_leave_no_trace() {
    assert_eq!(
        Parser::new("((x))").parse_expression().unwrap(),
        Expr::ident("x")
    );
}

#[test]
fn function_application() {
    insta::assert_snapshot!(canonical("sin(x) * sqrt(y + 1)"), @"(sin(x) * sqrt((y + 1)))");
    insta::assert_snapshot!(canonical("-exp(-x)"), @"-exp(-x)");
}

#[test]
fn function_needs_parenthesized_argument() {
    assert!(Parser::new("sin x").parse_expression().is_err());
}

#[test]
fn literal_forms_inside_expressions() {
    insta::assert_snapshot!(canonical("rat(1, 3) * dec(15, -1) + 0x1p-1"), @"((rat(1, 3) * dec(15, -1)) + 0.5)");
}

fn rejected_then_recovers(src: &str) {
    let mut p = Parser::new(src);
    let err = p.next_statement(true).unwrap().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Syntax);
    assert!(err.to_string().contains("nested too deeply"), "{err}");
    assert_eq!(p.next_statement(true).unwrap().unwrap().text, "pave");
}

#[test]
fn runaway_nesting_is_a_syntax_error() {
    rejected_then_recovers(&format!("objfn {}x; pave", "-".repeat(5000)));
    rejected_then_recovers(&format!("objfn {}x{}; pave", "(".repeat(20_000), ")".repeat(20_000)));
    rejected_then_recovers(&format!("objfn {}x{}; pave", "sin(".repeat(20_000), ")".repeat(20_000)));
    rejected_then_recovers(&format!(
        "forall {}x < 1{}; pave",
        "(".repeat(20_000),
        ")".repeat(20_000)
    ));
}

#[test]
fn nesting_below_the_limit_still_parses() {
    let depth = MAX_NESTING / 2;
    let signs = Parser::new(&format!("{}x", "-".repeat(depth))).parse_expression().unwrap();
    let mut inner = &signs;
    for _ in 0..depth {
        match inner {
            Expr::Neg(operand) => inner = &**operand,
            other => panic!("expected negation, got {other:?}"),
        }
    }
    assert_eq!(inner, &Expr::ident("x"));
    assert_eq!(
        canonical(&format!("{}x + 1{}", "(".repeat(depth), ")".repeat(depth))),
        "(x + 1)"
    );
}
