//! Canonical text form of the AST.
//!
//! Every binary node is wrapped in parentheses, so the output spells out the
//! grouping the parser chose: `-(x+4)*5*x^3 - 2*(5+y)` prints as
//! `(((-(x + 4) * 5) * (x ^ 3)) - (2 * (5 + y)))`.

use std::fmt::{self, Display, Formatter, Write as _};

use crate::core::ast::{
    BoolExpr, Constraint, Expr, Interval, LetBinding, PlotAxes, Setting, Statement, VarKind,
};
use crate::core::number::Numeral;

impl Display for Numeral {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Numeral::Literal(n) => write!(f, "{}", n),
            Numeral::Approx(inner) => write!(f, "approx({})", inner),
            Numeral::Dec(a, b) => write!(f, "dec({}, {})", a, b),
            Numeral::Rat(a, b) => write!(f, "rat({}, {})", a, b),
        }
    }
}

impl Display for Expr {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Number(n) => write!(f, "{}", n),
            Expr::Ident(name) => f.write_str(name),
            Expr::Binary { op, lhs, rhs } => write!(f, "({} {} {})", lhs, op.symbol(), rhs),
            Expr::Neg(inner) => write!(f, "-{}", inner),
            Expr::Call { func, arg } => write!(f, "{}({})", func.name(), arg),
        }
    }
}

impl Display for BoolExpr {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            BoolExpr::Compare { op, lhs, rhs } => write!(f, "{} {} {}", lhs, op.symbol(), rhs),
            BoolExpr::And(a, b) => write!(f, "({} and {})", a, b),
            BoolExpr::Or(a, b) => write!(f, "({} or {})", a, b),
        }
    }
}

impl Display for Interval {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.lower, self.upper)
    }
}

impl Display for Constraint {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} 0", self.expr, self.op.symbol())
    }
}

fn write_let(f: &mut Formatter<'_>, bindings: &[LetBinding]) -> fmt::Result {
    if bindings.is_empty() {
        return Ok(());
    }
    f.write_str("let ")?;
    for (i, b) in bindings.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{} = {}", b.name, b.expr)?;
    }
    f.write_str(" in ")
}

impl Display for Setting {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Setting::Precision(n) => write!(f, "precision = {}", n),
            Setting::Resolution(n) => write!(f, "resolution = {}", n),
            Setting::VariableResolution { name, value } => write!(f, "resolution {} = {}", name, value),
            Setting::Granularity(n) => write!(f, "granularity = {}", n),
            Setting::Depth(n) => write!(f, "depth = {}", n),
            Setting::VarSelect(n) => write!(f, "varselect = {}", n),
            Setting::Bp(b) => write!(f, "bp = {}", b),
            Setting::SafeInput(b) => write!(f, "safe input = {}", b),
            Setting::Debug(b) => write!(f, "debug = {}", b),
            Setting::Name(name) => write!(f, "name = {}", name),
            Setting::Output(file) => write!(f, "output = {}", file),
            Setting::PavingMode(mode) => write!(f, "paving mode = {}", mode.name()),
        }
    }
}

impl Display for Statement {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Statement::Declare { name, interval, kind } => {
                let kw = match kind {
                    VarKind::Variable => "var",
                    VarKind::Parameter => "param",
                };
                write!(f, "{} {} in {}", kw, name, interval)
            }
            Statement::Const { name, value } => write!(f, "const {} = {}", name, value),
            Statement::Objective { bindings, expr } => {
                f.write_str("objfn ")?;
                write_let(f, bindings)?;
                write!(f, "{}", expr)
            }
            Statement::Differential { bindings, expr } => {
                f.write_str("dfeq ")?;
                write_let(f, bindings)?;
                write!(f, "{}", expr)
            }
            Statement::Constraint { bindings, constraint } => {
                f.write_str("cnstr ")?;
                write_let(f, bindings)?;
                write!(f, "{}", constraint)
            }
            Statement::Define { name, expr } => write!(f, "define {} = {}", name, expr),
            Statement::Set(setting) => write!(f, "set {}", setting),
            Statement::ResetOutput => f.write_str("reset output"),
            Statement::Action(action) => f.write_str(action.keyword()),
            Statement::SavePaving(name) => write!(f, "save paving {}", name),
            Statement::LoadPaving(name) => write!(f, "load paving {}", name),
            Statement::Plot { name, axes } => {
                write!(f, "plot {}", name)?;
                match axes {
                    PlotAxes::Two(a, b) => write!(f, " {} {}", a, b),
                    PlotAxes::Three(a, b, c) => write!(f, " {} {} {}", a, b, c),
                }
            }
            Statement::Forall(expr) => write!(f, "forall {}", expr),
            Statement::ReadFile(file) => write!(f, "file {}", file),
            Statement::Quit => f.write_str("quit"),
            Statement::Help => f.write_str("help"),
        }
    }
}

/// Renders statements one per line, each terminated by `;`.
pub fn format_statements(statements: &[Statement]) -> String {
    let mut out = String::new();
    for s in statements {
        let _ = writeln!(out, "{};", s);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ast::{BinaryOp, CmpOp};
    use crate::core::number::NumberLiteral;

    #[test]
    fn neg_of_group_keeps_parens() {
        let e = Expr::neg(Expr::binary(BinaryOp::Add, Expr::ident("x"), Expr::int(4)));
        assert_eq!(e.to_string(), "-(x + 4)");
    }

    #[test]
    fn constraint_reads_against_zero() {
        let c = Constraint::normalize(Expr::ident("x"), CmpOp::Ge, Expr::int(1));
        assert_eq!(c.to_string(), "(x - 1) >= 0");
    }

    #[test]
    fn numeral_forms() {
        let n = Numeral::Rat(Box::new(NumberLiteral::Integer(1).into()), NumberLiteral::Integer(3));
        assert_eq!(n.to_string(), "rat(1, 3)");
        assert_eq!(Numeral::Literal(NumberLiteral::Real(5.0)).to_string(), "5.0");
    }

    #[test]
    fn statements_are_terminated() {
        let text = format_statements(&[Statement::Quit, Statement::Help]);
        assert_eq!(text, "quit;\nhelp;\n");
    }
}
