// src/core/ast.rs
//! Abstract Syntax Tree (AST) definitions for the Kodiak input language.
//! One closed sum type per node category; every variant has named fields.

use serde::Serialize;

use crate::core::number::{NumberLiteral, Numeral};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Pow,
}

impl BinaryOp {
    pub fn symbol(&self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Pow => "^",
        }
    }
}

/// Unary functions; application always takes exactly one parenthesized argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Function {
    Sin,
    Cos,
    Tan,
    Asin,
    Acos,
    Atan,
    Abs,
    Sqrt,
    Ln,
    Exp,
    Sq,
}

impl Function {
    pub fn name(&self) -> &'static str {
        match self {
            Function::Sin => "sin",
            Function::Cos => "cos",
            Function::Tan => "tan",
            Function::Asin => "asin",
            Function::Acos => "acos",
            Function::Atan => "atan",
            Function::Abs => "abs",
            Function::Sqrt => "sqrt",
            Function::Ln => "ln",
            Function::Exp => "exp",
            Function::Sq => "sq",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CmpOp {
    Lt,
    Gt,
    Le,
    Ge,
    Eq,
}

impl CmpOp {
    pub fn symbol(&self) -> &'static str {
        match self {
            CmpOp::Lt => "<",
            CmpOp::Gt => ">",
            CmpOp::Le => "<=",
            CmpOp::Ge => ">=",
            CmpOp::Eq => "=",
        }
    }
}

/// Arithmetic expression. Grouping parentheses do not survive into the tree.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Expr {
    Number(Numeral),
    Ident(String),
    Binary {
        op: BinaryOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
    Neg(Box<Expr>),
    Call {
        func: Function,
        arg: Box<Expr>,
    },
}

impl Expr {
    pub fn binary(op: BinaryOp, lhs: Expr, rhs: Expr) -> Self {
        Expr::Binary {
            op,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        }
    }

    pub fn neg(expr: Expr) -> Self {
        Expr::Neg(Box::new(expr))
    }

    pub fn ident(name: &str) -> Self {
        Expr::Ident(name.to_string())
    }

    pub fn int(value: i64) -> Self {
        Expr::Number(Numeral::Literal(NumberLiteral::Integer(value)))
    }

    /// Value of a plain literal, looking through unary minus.
    pub fn literal_value(&self) -> Option<f64> {
        match self {
            Expr::Number(Numeral::Literal(n)) => Some(n.as_f64()),
            Expr::Neg(inner) => inner.literal_value().map(|v| -v),
            _ => None,
        }
    }

    pub fn is_zero_literal(&self) -> bool {
        self.literal_value() == Some(0.0)
    }

    /// Every identifier referenced, in source order (duplicates kept).
    pub fn identifiers(&self) -> Vec<&str> {
        let mut out = Vec::new();
        self.collect_identifiers(&mut out);
        out
    }

    fn collect_identifiers<'a>(&'a self, out: &mut Vec<&'a str>) {
        match self {
            Expr::Number(_) => {}
            Expr::Ident(name) => out.push(name),
            Expr::Binary { lhs, rhs, .. } => {
                lhs.collect_identifiers(out);
                rhs.collect_identifiers(out);
            }
            Expr::Neg(inner) | Expr::Call { arg: inner, .. } => inner.collect_identifiers(out),
        }
    }

}

/// Comparisons joined by `and` / `or`; `and` binds tighter than `or`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BoolExpr {
    Compare { op: CmpOp, lhs: Expr, rhs: Expr },
    And(Box<BoolExpr>, Box<BoolExpr>),
    Or(Box<BoolExpr>, Box<BoolExpr>),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Interval {
    pub lower: Expr,
    pub upper: Expr,
}

/// One `name = expr` link of a statement-scoped `let` chain.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LetBinding {
    pub name: String,
    pub expr: Expr,
}

/// A constraint in single-operand form: `expr op 0`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Constraint {
    pub op: CmpOp,
    pub expr: Expr,
}

impl Constraint {
    /// `lhs op rhs` becomes `(op, lhs - rhs)`, unless `rhs` is the literal zero.
    pub fn normalize(lhs: Expr, op: CmpOp, rhs: Expr) -> Self {
        if rhs.is_zero_literal() {
            Constraint { op, expr: lhs }
        } else {
            Constraint {
                op,
                expr: Expr::binary(BinaryOp::Sub, lhs, rhs),
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum VarKind {
    Variable,
    Parameter,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, serde::Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PavingMode {
    #[default]
    Std,
    First,
    Full,
}

impl PavingMode {
    pub fn name(&self) -> &'static str {
        match self {
            PavingMode::Std => "std",
            PavingMode::First => "first",
            PavingMode::Full => "full",
        }
    }
}

/// `set <key> = <value>`; one variant per engine setter.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Setting {
    Precision(Numeral),
    Resolution(NumberLiteral),
    VariableResolution { name: String, value: NumberLiteral },
    Granularity(NumberLiteral),
    Depth(NumberLiteral),
    VarSelect(NumberLiteral),
    Bp(bool),
    SafeInput(bool),
    Debug(bool),
    Name(String),
    Output(String),
    PavingMode(PavingMode),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MinMaxMode {
    Min,
    Max,
    Both,
}

/// Zero-argument engine actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SolverAction {
    Pave,
    Bifurcation,
    Equilibrium,
    Min,
    Max,
    MinMax,
    Reset,
}

impl SolverAction {
    pub fn keyword(&self) -> &'static str {
        match self {
            SolverAction::Pave => "pave",
            SolverAction::Bifurcation => "bifurcation",
            SolverAction::Equilibrium => "equilibrium",
            SolverAction::Min => "min",
            SolverAction::Max => "max",
            SolverAction::MinMax => "minmax",
            SolverAction::Reset => "reset",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PlotAxes {
    Two(String, String),
    Three(String, String, String),
}

impl PlotAxes {
    pub fn names(&self) -> Vec<&str> {
        match self {
            PlotAxes::Two(a, b) => vec![a, b],
            PlotAxes::Three(a, b, c) => vec![a, b, c],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Statement {
    Declare {
        name: String,
        interval: Interval,
        kind: VarKind,
    },
    Const {
        name: String,
        value: Numeral,
    },
    Objective {
        bindings: Vec<LetBinding>,
        expr: Expr,
    },
    Differential {
        bindings: Vec<LetBinding>,
        expr: Expr,
    },
    Constraint {
        bindings: Vec<LetBinding>,
        constraint: Constraint,
    },
    Define {
        name: String,
        expr: Expr,
    },
    Set(Setting),
    ResetOutput,
    Action(SolverAction),
    SavePaving(String),
    LoadPaving(String),
    Plot {
        name: String,
        axes: PlotAxes,
    },
    /// Parsed but not evaluated; dispatch only echoes it.
    Forall(BoolExpr),
    ReadFile(String),
    Quit,
    Help,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_folds_nonzero_rhs() {
        let c = Constraint::normalize(Expr::ident("x"), CmpOp::Eq, Expr::neg(Expr::int(2)));
        assert_eq!(
            c.expr,
            Expr::binary(BinaryOp::Sub, Expr::ident("x"), Expr::neg(Expr::int(2)))
        );
    }

    #[test]
    fn normalize_keeps_lhs_against_zero() {
        let lhs = Expr::binary(BinaryOp::Add, Expr::ident("x"), Expr::int(2));
        let c = Constraint::normalize(lhs.clone(), CmpOp::Le, Expr::int(0));
        assert_eq!(c, Constraint { op: CmpOp::Le, expr: lhs });
    }

    #[test]
    fn identifiers_in_order() {
        let e = Expr::binary(
            BinaryOp::Mul,
            Expr::ident("a"),
            Expr::Call {
                func: Function::Sin,
                arg: Box::new(Expr::ident("b")),
            },
        );
        assert_eq!(e.identifiers(), vec!["a", "b"]);
    }
}
