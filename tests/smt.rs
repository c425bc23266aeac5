use kodiak_lang::core::ast::BinaryOp;
use kodiak_lang::core::dialect::{Ast, Dialect, KodiakDialect, SmtDialect};
use kodiak_lang::core::error::ErrorKind;
use kodiak_lang::core::number::NumberLiteral;
use kodiak_lang::core::smt::{parse_smt, SmtCommand};

#[test]
fn commands_in_sequence() {
    let cmds = parse_smt("(var x [0, 1])\n(* 2 -3)\n(check-sat)").unwrap();
    assert_eq!(
        cmds,
        vec![
            SmtCommand::Var {
                name: "x".into(),
                lower: NumberLiteral::Integer(0),
                upper: NumberLiteral::Integer(1),
            },
            SmtCommand::Apply {
                op: BinaryOp::Mul,
                lhs: NumberLiteral::Integer(2),
                rhs: NumberLiteral::Integer(-3),
            },
            SmtCommand::CheckSat,
        ]
    );
}

#[test]
fn minus_is_an_operator_in_head_position() {
    let cmds = parse_smt("(- 1 -1)").unwrap();
    assert_eq!(
        cmds,
        vec![SmtCommand::Apply {
            op: BinaryOp::Sub,
            lhs: NumberLiteral::Integer(1),
            rhs: NumberLiteral::Integer(-1),
        }]
    );
}

#[test]
fn errors_use_the_shared_classification() {
    assert_eq!(parse_smt("(var x [0 1])").unwrap_err().kind(), ErrorKind::Syntax);
    assert_eq!(parse_smt("(+ 1 2").unwrap_err().kind(), ErrorKind::Syntax);
    assert_eq!(parse_smt("(+ 1 $)").unwrap_err().kind(), ErrorKind::Lexical);
    assert_eq!(parse_smt("(+ 1 4294967296)").unwrap_err().kind(), ErrorKind::NumericOverflow);
}

#[test]
fn both_dialects_share_one_interface() {
    let dialects: Vec<Box<dyn Dialect>> = vec![Box::new(KodiakDialect::default()), Box::new(SmtDialect)];
    let inputs = ["var x in [0, 1]; pave", "(var x [0, 1]) (check-sat)"];
    for (dialect, input) in dialects.iter().zip(inputs) {
        let ast = dialect.parse(input).unwrap();
        assert_eq!(ast.len(), 2, "{}", dialect.name());
    }
    assert!(matches!(
        SmtDialect.parse("(check-sat)").unwrap()[0],
        Ast::Smt(SmtCommand::CheckSat)
    ));
}

#[test]
fn kodiak_dialect_stops_at_first_error() {
    let err = KodiakDialect::default().parse("pave; $; pave").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Lexical);
    let err = KodiakDialect::default().parse("var x in [0, 1]; pave pave").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Syntax);
}
