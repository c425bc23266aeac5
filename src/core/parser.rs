//! Parser for the Kodiak language: recursive descent for statements,
//! precedence climbing for expressions, statement-level error recovery.

use thiserror::Error;

use crate::core::ast::{
    BinaryOp, BoolExpr, CmpOp, Constraint, Expr, Function, Interval, LetBinding, PavingMode, PlotAxes,
    Setting, SolverAction, Statement, VarKind,
};
use crate::core::error::KodiakError;
use crate::core::lexer::{Lexer, LexerError};
use crate::core::number::{NumberLiteral, Numeral};
use crate::core::token::{Token, TokenKind};

/// Groups, calls, `approx`/`dec`/`rat` arguments and leading minus signs
/// deeper than this are rejected.
pub const MAX_NESTING: usize = 128;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message} {}", location(.found, .line, .column))]
pub struct ParserError {
    pub message: String,
    /// Offending token text; empty at end of input.
    pub found: String,
    pub line: usize,
    pub column: usize,
}

fn location(found: &str, line: &usize, column: &usize) -> String {
    if found.is_empty() {
        format!("at end of input ({}:{})", line, column)
    } else {
        format!("on input '{}' at {}:{}", found, line, column)
    }
}

/// A statement together with the source text it was parsed from.
#[derive(Debug, Clone, PartialEq)]
pub struct Parsed {
    pub statement: Statement,
    pub text: String,
    /// An illegal character was skipped somewhere inside the statement.
    pub skipped_chars: bool,
}

type PResult<T> = Result<T, KodiakError>;

pub struct Parser {
    source: String,
    tokens: Vec<Token>,
    lexer_errors: Vec<LexerError>,
    // Byte offsets of the skipped illegal characters.
    skipped: Vec<usize>,
    pos: usize,
    depth: usize,
    safe_input: bool,
}

impl Parser {
    pub fn new(input: &str) -> Self {
        let mut lexer = Lexer::new(input);
        let (tokens, lexer_errors) = lexer.tokenize();
        let source = lexer.source().to_string();
        let skipped = lexer_errors
            .iter()
            .filter_map(|e| match e {
                LexerError::IllegalCharacter { line, column, .. } => byte_offset(&source, *line, *column),
                LexerError::NumericOverflow { .. } => None,
            })
            .collect();
        Parser {
            source,
            tokens,
            lexer_errors,
            skipped,
            pos: 0,
            depth: 0,
            safe_input: true,
        }
    }

    /// Illegal characters met while lexing. Drained on each call.
    pub fn take_lexer_errors(&mut self) -> Vec<LexerError> {
        std::mem::take(&mut self.lexer_errors)
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// Parses the next statement of the chain, honouring `safe_input` for any
    /// `approx(..)` literal in it. Empty statements are skipped. On error the
    /// parser has already resynchronised past the next `;`.
    pub fn next_statement(&mut self, safe_input: bool) -> Option<PResult<Parsed>> {
        self.safe_input = safe_input;
        while self.match_token(&[TokenKind::Semicolon]) {}
        if self.is_at_end() {
            return None;
        }

        let region_start = if self.pos == 0 { 0 } else { self.previous().end() };
        let start = self.peek().offset;
        self.depth = 0;
        let result = self.parse_statement().and_then(|statement| {
            if !self.check(&TokenKind::Semicolon) && !self.is_at_end() {
                return Err(self.unexpected("Expected ';' after statement"));
            }
            let end = self.previous().end();
            let region_end = self.peek().offset;
            Ok(Parsed {
                statement,
                text: self.source[start..end].trim().to_string(),
                skipped_chars: self
                    .skipped
                    .iter()
                    .any(|&at| at >= region_start && at < region_end),
            })
        });
        match result {
            Ok(parsed) => {
                self.match_token(&[TokenKind::Semicolon]);
                Some(Ok(parsed))
            }
            Err(e) => {
                self.synchronize();
                Some(Err(e))
            }
        }
    }

    /// Parses the whole input, failing on the first error of any kind.
    pub fn parse_all(&mut self, safe_input: bool) -> PResult<Vec<Statement>> {
        if let Some(e) = self.lexer_errors.first() {
            return Err(e.clone().into());
        }
        let mut statements = Vec::new();
        while let Some(parsed) = self.next_statement(safe_input) {
            statements.push(parsed?.statement);
        }
        Ok(statements)
    }

    fn synchronize(&mut self) {
        while !self.is_at_end() && !self.check(&TokenKind::Semicolon) {
            self.advance();
        }
        self.match_token(&[TokenKind::Semicolon]);
        debug_log!("[parser] resynchronised at token {}", self.pos);
    }

    /* ── Statements ──────────────────────────────────────── */
    fn parse_statement(&mut self) -> PResult<Statement> {
        let tok = self.advance().clone();
        match tok.kind {
            TokenKind::Var => self.parse_declaration(VarKind::Variable),
            TokenKind::Param => self.parse_declaration(VarKind::Parameter),
            TokenKind::Const => {
                let name = self.consume_identifier("Expected constant name")?;
                self.consume(TokenKind::Equals, "Expected '=' after constant name")?;
                let value = self.parse_number()?;
                Ok(Statement::Const { name, value })
            }
            TokenKind::Objfn => {
                self.match_token(&[TokenKind::Equals]);
                let bindings = self.parse_optional_let()?;
                let expr = self.parse_expression()?;
                Ok(Statement::Objective { bindings, expr })
            }
            TokenKind::Dfeq => {
                self.match_token(&[TokenKind::Equals]);
                let bindings = self.parse_optional_let()?;
                let expr = self.parse_expression()?;
                Ok(Statement::Differential { bindings, expr })
            }
            TokenKind::Cnstr => {
                self.match_token(&[TokenKind::Equals]);
                let bindings = self.parse_optional_let()?;
                let lhs = self.parse_expression()?;
                let op = self.parse_cmp_op()?;
                let rhs = self.parse_expression()?;
                Ok(Statement::Constraint {
                    bindings,
                    constraint: Constraint::normalize(lhs, op, rhs),
                })
            }
            TokenKind::Define => {
                let name = self.consume_identifier("Expected definition name")?;
                self.consume(TokenKind::Equals, "Expected '=' after definition name")?;
                let expr = self.parse_expression()?;
                Ok(Statement::Define { name, expr })
            }
            TokenKind::Set => self.parse_setting().map(Statement::Set),
            TokenKind::Reset => {
                if self.match_token(&[TokenKind::Output]) {
                    Ok(Statement::ResetOutput)
                } else {
                    Ok(Statement::Action(SolverAction::Reset))
                }
            }
            TokenKind::Pave => Ok(Statement::Action(SolverAction::Pave)),
            TokenKind::Bifurcation => Ok(Statement::Action(SolverAction::Bifurcation)),
            TokenKind::Equilibrium => Ok(Statement::Action(SolverAction::Equilibrium)),
            TokenKind::Min => Ok(Statement::Action(SolverAction::Min)),
            TokenKind::Max => Ok(Statement::Action(SolverAction::Max)),
            TokenKind::MinMax => Ok(Statement::Action(SolverAction::MinMax)),
            TokenKind::Save => {
                self.consume(TokenKind::Paving, "Expected 'paving' after 'save'")?;
                let name = self.consume_identifier("Expected paving name")?;
                Ok(Statement::SavePaving(name))
            }
            TokenKind::Load => {
                self.consume(TokenKind::Paving, "Expected 'paving' after 'load'")?;
                let name = self.consume_identifier("Expected paving name")?;
                Ok(Statement::LoadPaving(name))
            }
            TokenKind::Plot => {
                let name = self.consume_identifier("Expected paving name to plot")?;
                let x = self.consume_identifier("Expected first axis variable")?;
                let y = self.consume_identifier("Expected second axis variable")?;
                let axes = if matches!(self.peek().kind, TokenKind::Identifier(_)) {
                    let z = self.consume_identifier("Expected third axis variable")?;
                    PlotAxes::Three(x, y, z)
                } else {
                    PlotAxes::Two(x, y)
                };
                Ok(Statement::Plot { name, axes })
            }
            TokenKind::Forall => self.parse_bool_expr().map(Statement::Forall),
            TokenKind::File => match self.peek().kind.clone() {
                TokenKind::InputFileName(name) => {
                    self.advance();
                    Ok(Statement::ReadFile(name))
                }
                _ => Err(self.unexpected("Expected input file name ending in .kdk")),
            },
            TokenKind::Quit | TokenKind::Exit => Ok(Statement::Quit),
            TokenKind::Help => Ok(Statement::Help),
            TokenKind::Overflow => Err(LexerError::overflow(&tok).into()),
            _ => Err(self.error_at(&tok, "Invalid statement")),
        }
    }

    fn parse_declaration(&mut self, kind: VarKind) -> PResult<Statement> {
        let name = self.consume_identifier("Expected variable name")?;
        self.consume(TokenKind::In, "Expected 'in' after variable name")?;
        let interval = self.parse_interval()?;
        Ok(Statement::Declare { name, interval, kind })
    }

    fn parse_interval(&mut self) -> PResult<Interval> {
        self.consume(TokenKind::OpenBracket, "Expected '[' to start interval")?;
        let lower = self.parse_expression()?;
        self.consume(TokenKind::Comma, "Expected ',' between interval bounds")?;
        let upper = self.parse_expression()?;
        self.consume(TokenKind::CloseBracket, "Expected ']' to close interval")?;
        Ok(Interval { lower, upper })
    }

    fn parse_optional_let(&mut self) -> PResult<Vec<LetBinding>> {
        if !self.match_token(&[TokenKind::Let]) {
            return Ok(Vec::new());
        }
        let mut bindings = Vec::new();
        loop {
            let name = self.consume_identifier("Expected name in let binding")?;
            self.consume(TokenKind::Equals, "Expected '=' in let binding")?;
            let expr = self.parse_expression()?;
            bindings.push(LetBinding { name, expr });
            if !self.match_token(&[TokenKind::Comma]) {
                break;
            }
        }
        self.consume(TokenKind::In, "Expected 'in' after let bindings")?;
        Ok(bindings)
    }

    fn parse_setting(&mut self) -> PResult<Setting> {
        let key = self.advance().clone();
        let setting = match key.kind {
            TokenKind::Precision => {
                self.expect_equals()?;
                Setting::Precision(self.parse_number()?)
            }
            TokenKind::Resolution => {
                if let TokenKind::Identifier(name) = self.peek().kind.clone() {
                    self.advance();
                    self.expect_equals()?;
                    Setting::VariableResolution {
                        name,
                        value: self.parse_plain_number()?,
                    }
                } else {
                    self.expect_equals()?;
                    Setting::Resolution(self.parse_plain_number()?)
                }
            }
            TokenKind::Granularity => {
                self.expect_equals()?;
                Setting::Granularity(self.parse_plain_number()?)
            }
            TokenKind::Depth => {
                self.expect_equals()?;
                Setting::Depth(self.parse_plain_number()?)
            }
            TokenKind::VarSelect => {
                self.expect_equals()?;
                Setting::VarSelect(self.parse_plain_number()?)
            }
            TokenKind::Bp => {
                self.expect_equals()?;
                Setting::Bp(self.parse_bool()?)
            }
            TokenKind::Safe => {
                self.consume(TokenKind::Input, "Expected 'input' after 'safe'")?;
                self.expect_equals()?;
                Setting::SafeInput(self.parse_bool()?)
            }
            TokenKind::Debug => {
                self.expect_equals()?;
                Setting::Debug(self.parse_bool()?)
            }
            TokenKind::Name => {
                self.expect_equals()?;
                Setting::Name(self.consume_identifier("Expected problem name")?)
            }
            TokenKind::Output => {
                self.expect_equals()?;
                match self.peek().kind.clone() {
                    TokenKind::OutputFileName(file) | TokenKind::InputFileName(file) => {
                        self.advance();
                        Setting::Output(file)
                    }
                    _ => return Err(self.unexpected("Expected output file name")),
                }
            }
            TokenKind::Paving => {
                self.consume(TokenKind::Mode, "Expected 'mode' after 'paving'")?;
                self.expect_equals()?;
                let mode = match self.advance().kind.clone() {
                    TokenKind::Std => PavingMode::Std,
                    TokenKind::First => PavingMode::First,
                    TokenKind::Full => PavingMode::Full,
                    _ => {
                        let tok = self.previous().clone();
                        return Err(self.error_at(&tok, "Expected paving mode std, first or full"));
                    }
                };
                Setting::PavingMode(mode)
            }
            _ => return Err(self.error_at(&key, "Unknown setting")),
        };
        Ok(setting)
    }

    fn expect_equals(&mut self) -> PResult<()> {
        self.consume(TokenKind::Equals, "Expected '='").map(|_| ())
    }

    fn parse_bool(&mut self) -> PResult<bool> {
        if self.match_token(&[TokenKind::True]) {
            Ok(true)
        } else if self.match_token(&[TokenKind::False]) {
            Ok(false)
        } else {
            Err(self.unexpected("Expected 'true' or 'false'"))
        }
    }

    /* ── Numbers ─────────────────────────────────────────── */

    /// `NUMBER`: a bare unsigned decimal literal.
    fn parse_plain_number(&mut self) -> PResult<NumberLiteral> {
        match self.peek().kind.clone() {
            TokenKind::Number(n) => {
                self.advance();
                Ok(n)
            }
            _ => Err(self.unexpected("Expected a number")),
        }
    }

    /// `number`: signed literal, hex float, or one of approx/dec/rat.
    pub fn parse_number(&mut self) -> PResult<Numeral> {
        let tok = self.peek().clone();
        match tok.kind {
            TokenKind::Minus => {
                self.advance();
                match self.peek().kind.clone() {
                    TokenKind::Number(n) => {
                        self.advance();
                        Ok(Numeral::Literal(n.negate()))
                    }
                    TokenKind::HexFloat(v) => {
                        self.advance();
                        Ok(Numeral::Literal(NumberLiteral::HexFloat(-v)))
                    }
                    _ => Err(self.unexpected("Expected a number after '-'")),
                }
            }
            TokenKind::Number(n) => {
                self.advance();
                Ok(Numeral::Literal(n))
            }
            TokenKind::HexFloat(v) => {
                self.advance();
                Ok(Numeral::Literal(NumberLiteral::HexFloat(v)))
            }
            TokenKind::Approx => {
                self.advance();
                self.consume(TokenKind::OpenParen, "Expected '(' after approx")?;
                let inner = self.nested(Self::parse_number)?;
                self.consume(TokenKind::CloseParen, "Expected ')' after approx argument")?;
                if self.safe_input {
                    return Err(KodiakError::domain(
                        "Approximate inputs not allowed when safe input is true, input ignored",
                    ));
                }
                Ok(Numeral::Approx(Box::new(inner)))
            }
            TokenKind::Dec => {
                self.advance();
                self.consume(TokenKind::OpenParen, "Expected '(' after dec")?;
                let a = self.nested(Self::parse_number)?;
                self.consume(TokenKind::Comma, "Expected ',' in dec")?;
                let b = self.nested(Self::parse_number)?;
                self.consume(TokenKind::CloseParen, "Expected ')' after dec arguments")?;
                Ok(Numeral::Dec(Box::new(a), Box::new(b)))
            }
            TokenKind::Rat => {
                self.advance();
                self.consume(TokenKind::OpenParen, "Expected '(' after rat")?;
                let a = self.nested(Self::parse_number)?;
                self.consume(TokenKind::Comma, "Expected ',' in rat")?;
                let b = self.parse_plain_number()?;
                self.consume(TokenKind::CloseParen, "Expected ')' after rat arguments")?;
                Ok(Numeral::Rat(Box::new(a), b))
            }
            _ => Err(self.unexpected("Expected a number")),
        }
    }

    /* ── Precedence ───────────────────────────────────────── */
    pub fn parse_expression(&mut self) -> PResult<Expr> {
        self.parse_additive()
    }

    fn parse_additive(&mut self) -> PResult<Expr> {
        let mut expr = self.parse_multiplicative()?;
        loop {
            let op = match self.peek().kind {
                TokenKind::Plus => BinaryOp::Add,
                TokenKind::Minus => BinaryOp::Sub,
                _ => break,
            };
            self.advance();
            let right = self.parse_multiplicative()?;
            expr = Expr::binary(op, expr, right);
        }
        Ok(expr)
    }

    fn parse_multiplicative(&mut self) -> PResult<Expr> {
        let mut expr = self.parse_power()?;
        loop {
            let op = match self.peek().kind {
                TokenKind::Star => BinaryOp::Mul,
                TokenKind::Slash => BinaryOp::Div,
                _ => break,
            };
            self.advance();
            let right = self.parse_power()?;
            expr = Expr::binary(op, expr, right);
        }
        Ok(expr)
    }

    // Left-associative like the other binary operators.
    fn parse_power(&mut self) -> PResult<Expr> {
        let mut expr = self.parse_unary()?;
        while self.match_token(&[TokenKind::Caret]) {
            let right = self.parse_unary()?;
            expr = Expr::binary(BinaryOp::Pow, expr, right);
        }
        Ok(expr)
    }

    // Unary minus binds tightest. Each sign counts as one level of nesting.
    fn parse_unary(&mut self) -> PResult<Expr> {
        let mut signs = 0;
        while self.match_token(&[TokenKind::Minus]) {
            signs += 1;
            if self.depth + signs > MAX_NESTING {
                return Err(self.unexpected("Expression nested too deeply"));
            }
        }
        self.depth += signs;
        let operand = self.parse_primary();
        self.depth -= signs;
        let mut expr = operand?;
        for _ in 0..signs {
            expr = Expr::neg(expr);
        }
        Ok(expr)
    }

    fn parse_primary(&mut self) -> PResult<Expr> {
        let tok = self.peek().clone();
        match tok.kind {
            TokenKind::Number(_)
            | TokenKind::HexFloat(_)
            | TokenKind::Approx
            | TokenKind::Dec
            | TokenKind::Rat => self.parse_number().map(Expr::Number),
            TokenKind::Identifier(name) => {
                self.advance();
                Ok(Expr::Ident(name))
            }
            TokenKind::OpenParen => {
                self.advance();
                let expr = self.nested(Self::parse_expression)?;
                self.consume(TokenKind::CloseParen, "Expected ')'")?;
                Ok(expr)
            }
            ref kind => match function_for(kind) {
                Some(func) => {
                    self.advance();
                    self.consume(TokenKind::OpenParen, "Expected '(' after function name")?;
                    let arg = self.nested(Self::parse_expression)?;
                    self.consume(TokenKind::CloseParen, "Expected ')' after function argument")?;
                    Ok(Expr::Call {
                        func,
                        arg: Box::new(arg),
                    })
                }
                None => Err(self.unexpected("Expected an expression")),
            },
        }
    }

    /* ── Boolean expressions ─────────────────────────────── */
    pub fn parse_bool_expr(&mut self) -> PResult<BoolExpr> {
        let mut expr = self.parse_bool_and()?;
        while self.match_token(&[TokenKind::Or]) {
            let right = self.parse_bool_and()?;
            expr = BoolExpr::Or(Box::new(expr), Box::new(right));
        }
        Ok(expr)
    }

    fn parse_bool_and(&mut self) -> PResult<BoolExpr> {
        let mut expr = self.parse_bool_atom()?;
        while self.match_token(&[TokenKind::And]) {
            let right = self.parse_bool_atom()?;
            expr = BoolExpr::And(Box::new(expr), Box::new(right));
        }
        Ok(expr)
    }

    // `(` may open either an arithmetic group (`(x+1) < 2`) or a boolean
    // group (`(x < 1 or y > 2)`); the comparison reading is tried first.
    fn parse_bool_atom(&mut self) -> PResult<BoolExpr> {
        let start = self.pos;
        match self.parse_comparison() {
            Ok(cmp) => Ok(cmp),
            Err(KodiakError::Syntax(first)) if self.tokens[start].kind == TokenKind::OpenParen => {
                self.pos = start + 1;
                let inner = self.nested(Self::parse_bool_expr).map_err(|e| match e {
                    KodiakError::Syntax(_) => KodiakError::Syntax(first.clone()),
                    other => other,
                })?;
                self.consume(TokenKind::CloseParen, "Expected ')' after boolean expression")?;
                Ok(inner)
            }
            Err(e) => Err(e),
        }
    }

    fn parse_comparison(&mut self) -> PResult<BoolExpr> {
        let lhs = self.parse_expression()?;
        let op = self.parse_cmp_op()?;
        let rhs = self.parse_expression()?;
        if cmp_op_for(&self.peek().kind).is_some() {
            return Err(self.unexpected("Comparison operators cannot be chained"));
        }
        Ok(BoolExpr::Compare { op, lhs, rhs })
    }

    fn parse_cmp_op(&mut self) -> PResult<CmpOp> {
        match cmp_op_for(&self.peek().kind) {
            Some(op) => {
                self.advance();
                Ok(op)
            }
            None => Err(self.unexpected("Expected comparison operator")),
        }
    }

    /* ── Token utils ─────────────────────────────────────── */
    fn nested<T>(&mut self, parse: fn(&mut Self) -> PResult<T>) -> PResult<T> {
        if self.depth >= MAX_NESTING {
            return Err(self.unexpected("Expression nested too deeply"));
        }
        self.depth += 1;
        let result = parse(self);
        self.depth -= 1;
        result
    }

    fn advance(&mut self) -> &Token {
        if !self.is_at_end() {
            self.pos += 1;
        }
        self.previous()
    }

    fn previous(&self) -> &Token {
        if self.pos == 0 {
            &self.tokens[0]
        } else {
            &self.tokens[self.pos - 1]
        }
    }

    fn peek(&self) -> &Token {
        // The lexer always ends the stream with EOF
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    fn check(&self, kind: &TokenKind) -> bool {
        !self.is_at_end() && &self.peek().kind == kind
    }

    fn match_token(&mut self, kinds: &[TokenKind]) -> bool {
        for kind in kinds {
            if self.check(kind) {
                self.advance();
                return true;
            }
        }
        false
    }

    fn consume(&mut self, kind: TokenKind, msg: &str) -> PResult<&Token> {
        if self.check(&kind) {
            Ok(self.advance())
        } else {
            Err(self.unexpected(msg))
        }
    }

    fn consume_identifier(&mut self, msg: &str) -> PResult<String> {
        if let TokenKind::Identifier(name) = self.peek().kind.clone() {
            self.advance();
            Ok(name)
        } else {
            Err(self.unexpected(msg))
        }
    }

    fn is_at_end(&self) -> bool {
        matches!(self.peek().kind, TokenKind::EOF)
    }

    fn unexpected(&self, msg: &str) -> KodiakError {
        let tok = self.peek().clone();
        self.error_at(&tok, msg)
    }

    fn error_at(&self, tok: &Token, msg: &str) -> KodiakError {
        if tok.kind == TokenKind::Overflow {
            return LexerError::overflow(tok).into();
        }
        KodiakError::Syntax(ParserError {
            message: msg.into(),
            found: tok.lexeme.clone(),
            line: tok.line,
            column: tok.column,
        })
    }
}

/// Byte offset of a 1-based line/column (in chars) position.
fn byte_offset(source: &str, line: usize, column: usize) -> Option<usize> {
    let mut start = 0;
    for _ in 1..line {
        start += source[start..].find('\n')? + 1;
    }
    source[start..]
        .char_indices()
        .nth(column.checked_sub(1)?)
        .map(|(i, _)| start + i)
}

fn function_for(kind: &TokenKind) -> Option<Function> {
    let func = match kind {
        TokenKind::Sin => Function::Sin,
        TokenKind::Cos => Function::Cos,
        TokenKind::Tan => Function::Tan,
        TokenKind::Asin => Function::Asin,
        TokenKind::Acos => Function::Acos,
        TokenKind::Atan => Function::Atan,
        TokenKind::Abs => Function::Abs,
        TokenKind::Sqrt => Function::Sqrt,
        TokenKind::Ln => Function::Ln,
        TokenKind::Exp => Function::Exp,
        TokenKind::Sq => Function::Sq,
        _ => return None,
    };
    Some(func)
}

fn cmp_op_for(kind: &TokenKind) -> Option<CmpOp> {
    let op = match kind {
        TokenKind::LessThan => CmpOp::Lt,
        TokenKind::GreaterThan => CmpOp::Gt,
        TokenKind::LessEqual => CmpOp::Le,
        TokenKind::GreaterEqual => CmpOp::Ge,
        TokenKind::Equals => CmpOp::Eq,
        _ => return None,
    };
    Some(op)
}
