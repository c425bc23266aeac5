// src/core/token.rs
use crate::core::number::NumberLiteral;

#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    // Identifiers and literals
    Identifier(String),
    Number(NumberLiteral),
    HexFloat(f64),
    InputFileName(String),
    OutputFileName(String),

    // Operators
    Plus,         // +
    Minus,        // -
    Star,         // *
    Slash,        // /
    Caret,        // ^
    Equals,       // =
    LessThan,     // <
    LessEqual,    // <=
    GreaterThan,  // >
    GreaterEqual, // >=

    // Delimiters
    OpenParen,    // (
    CloseParen,   // )
    OpenBracket,  // [
    CloseBracket, // ]
    Comma,        // ,
    Semicolon,    // ;

    // Declarations
    Var,
    Param,
    Const,
    In,
    Define,
    Let,

    // Problem statements
    Objfn,
    Dfeq,
    Cnstr,
    Forall,

    // Configuration
    Set,
    Precision,
    Resolution,
    Granularity,
    Depth,
    VarSelect,
    Bp,
    Safe,
    Input,
    Debug,
    Name,
    Output,
    Mode,
    Paving,
    Std,
    First,
    Full,
    Eval,
    True,
    False,

    // Solver actions
    Pave,
    Bifurcation,
    Equilibrium,
    Min,
    Max,
    MinMax,
    Reset,

    // Literal constructors
    Approx,
    Dec,
    Rat,

    // Functions
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

    // Boolean connectives
    And,
    Or,

    // Session control
    File,
    Save,
    Load,
    Plot,
    Quit,
    Exit,
    Help,

    // A numeric literal past the overflow bound; the parser turns it into
    // a NumericOverflow error for the statement that contains it.
    Overflow,

    // Special
    EOF,
}

impl TokenKind {
    /// Reserved-word lookup. Matching is case-insensitive and only ever applied
    /// to a complete identifier.
    pub fn keyword(ident: &str) -> Option<TokenKind> {
        let kind = match ident.to_ascii_lowercase().as_str() {
            "var" => TokenKind::Var,
            "param" => TokenKind::Param,
            "const" => TokenKind::Const,
            "in" => TokenKind::In,
            "define" => TokenKind::Define,
            "let" => TokenKind::Let,
            "objfn" => TokenKind::Objfn,
            "dfeq" => TokenKind::Dfeq,
            "cnstr" => TokenKind::Cnstr,
            "forall" => TokenKind::Forall,
            "set" => TokenKind::Set,
            "precision" => TokenKind::Precision,
            "resolution" => TokenKind::Resolution,
            "granularity" => TokenKind::Granularity,
            "depth" => TokenKind::Depth,
            "varselect" => TokenKind::VarSelect,
            "bp" => TokenKind::Bp,
            "safe" => TokenKind::Safe,
            "input" => TokenKind::Input,
            "debug" => TokenKind::Debug,
            "name" => TokenKind::Name,
            "output" => TokenKind::Output,
            "mode" => TokenKind::Mode,
            "paving" => TokenKind::Paving,
            "std" => TokenKind::Std,
            "first" => TokenKind::First,
            "full" => TokenKind::Full,
            "eval" => TokenKind::Eval,
            "true" => TokenKind::True,
            "false" => TokenKind::False,
            "pave" => TokenKind::Pave,
            "bifurcation" => TokenKind::Bifurcation,
            "equilibrium" => TokenKind::Equilibrium,
            "min" => TokenKind::Min,
            "max" => TokenKind::Max,
            "minmax" => TokenKind::MinMax,
            "reset" => TokenKind::Reset,
            "approx" => TokenKind::Approx,
            "dec" => TokenKind::Dec,
            "rat" => TokenKind::Rat,
            "sin" => TokenKind::Sin,
            "cos" => TokenKind::Cos,
            "tan" => TokenKind::Tan,
            "asin" => TokenKind::Asin,
            "acos" => TokenKind::Acos,
            "atan" => TokenKind::Atan,
            "abs" => TokenKind::Abs,
            "sqrt" => TokenKind::Sqrt,
            "ln" => TokenKind::Ln,
            "exp" => TokenKind::Exp,
            "sq" => TokenKind::Sq,
            "and" => TokenKind::And,
            "or" => TokenKind::Or,
            "file" => TokenKind::File,
            "save" => TokenKind::Save,
            "load" => TokenKind::Load,
            "plot" => TokenKind::Plot,
            "quit" => TokenKind::Quit,
            "exit" => TokenKind::Exit,
            "help" => TokenKind::Help,
            _ => return None,
        };
        Some(kind)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub lexeme: String,
    pub line: usize,
    pub column: usize,
    /// Byte offset of the lexeme in the (normalized) source.
    pub offset: usize,
}

impl Token {
    pub fn new(kind: TokenKind, lexeme: String, line: usize, column: usize, offset: usize) -> Self {
        Self {
            kind,
            lexeme,
            line,
            column,
            offset,
        }
    }

    pub fn end(&self) -> usize {
        self.offset + self.lexeme.len()
    }
}

// Implement Display for TokenKind for better error messages
impl std::fmt::Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            TokenKind::Identifier(_) => "identifier",
            TokenKind::Number(_) => "number",
            TokenKind::HexFloat(_) => "hexadecimal number",
            TokenKind::InputFileName(_) => "input file name",
            TokenKind::OutputFileName(_) => "output file name",
            TokenKind::Plus => "+",
            TokenKind::Minus => "-",
            TokenKind::Star => "*",
            TokenKind::Slash => "/",
            TokenKind::Caret => "^",
            TokenKind::Equals => "=",
            TokenKind::LessThan => "<",
            TokenKind::LessEqual => "<=",
            TokenKind::GreaterThan => ">",
            TokenKind::GreaterEqual => ">=",
            TokenKind::OpenParen => "(",
            TokenKind::CloseParen => ")",
            TokenKind::OpenBracket => "[",
            TokenKind::CloseBracket => "]",
            TokenKind::Comma => ",",
            TokenKind::Semicolon => ";",
            TokenKind::Overflow => "number (overflow)",
            TokenKind::EOF => "end of input",
            TokenKind::Var => "var",
            TokenKind::Param => "param",
            TokenKind::Const => "const",
            TokenKind::In => "in",
            TokenKind::Define => "define",
            TokenKind::Let => "let",
            TokenKind::Objfn => "objfn",
            TokenKind::Dfeq => "dfeq",
            TokenKind::Cnstr => "cnstr",
            TokenKind::Forall => "forall",
            TokenKind::Set => "set",
            TokenKind::Precision => "precision",
            TokenKind::Resolution => "resolution",
            TokenKind::Granularity => "granularity",
            TokenKind::Depth => "depth",
            TokenKind::VarSelect => "varselect",
            TokenKind::Bp => "bp",
            TokenKind::Safe => "safe",
            TokenKind::Input => "input",
            TokenKind::Debug => "debug",
            TokenKind::Name => "name",
            TokenKind::Output => "output",
            TokenKind::Mode => "mode",
            TokenKind::Paving => "paving",
            TokenKind::Std => "std",
            TokenKind::First => "first",
            TokenKind::Full => "full",
            TokenKind::Eval => "eval",
            TokenKind::True => "true",
            TokenKind::False => "false",
            TokenKind::Pave => "pave",
            TokenKind::Bifurcation => "bifurcation",
            TokenKind::Equilibrium => "equilibrium",
            TokenKind::Min => "min",
            TokenKind::Max => "max",
            TokenKind::MinMax => "minmax",
            TokenKind::Reset => "reset",
            TokenKind::Approx => "approx",
            TokenKind::Dec => "dec",
            TokenKind::Rat => "rat",
            TokenKind::Sin => "sin",
            TokenKind::Cos => "cos",
            TokenKind::Tan => "tan",
            TokenKind::Asin => "asin",
            TokenKind::Acos => "acos",
            TokenKind::Atan => "atan",
            TokenKind::Abs => "abs",
            TokenKind::Sqrt => "sqrt",
            TokenKind::Ln => "ln",
            TokenKind::Exp => "exp",
            TokenKind::Sq => "sq",
            TokenKind::And => "and",
            TokenKind::Or => "or",
            TokenKind::File => "file",
            TokenKind::Save => "save",
            TokenKind::Load => "load",
            TokenKind::Plot => "plot",
            TokenKind::Quit => "quit",
            TokenKind::Exit => "exit",
            TokenKind::Help => "help",
        };
        write!(f, "{}", name)
    }
}

// Implement Display for full Token (kind plus optional lexeme snippet)
impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.kind {
            TokenKind::Identifier(name) => write!(f, "Identifier('{}') @{}:{}", name, self.line, self.column),
            TokenKind::Number(n) => write!(f, "Number({}) @{}:{}", n, self.line, self.column),
            TokenKind::HexFloat(v) => write!(f, "Hex({} = {}) @{}:{}", self.lexeme, v, self.line, self.column),
            TokenKind::InputFileName(s) => write!(f, "InputFile(\"{}\") @{}:{}", s, self.line, self.column),
            TokenKind::OutputFileName(s) => write!(f, "OutputFile(\"{}\") @{}:{}", s, self.line, self.column),
            TokenKind::Overflow => write!(f, "Overflow('{}') @{}:{}", self.lexeme, self.line, self.column),
            other => write!(f, "{} @{}:{}", other, self.line, self.column),
        }
    }
}
