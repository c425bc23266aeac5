//! SMT-style prefix dialect: `(var x [0, 1])`, `(+ 1 2)`, `(check-sat)`.
//!
//! Shares the number rules and error types with the main grammar, nothing
//! else. Commands are parsed only; nothing is sent to an engine.

use serde::Serialize;

use crate::core::ast::BinaryOp;
use crate::core::error::KodiakError;
use crate::core::lexer::LexerError;
use crate::core::number::{parse_decimal, parse_hex_float, NumberLiteral};
use crate::core::parser::ParserError;

#[derive(Debug, Clone, PartialEq)]
pub enum SmtTokenKind {
    OpenParen,
    CloseParen,
    OpenBracket,
    CloseBracket,
    Comma,
    Minus,
    Operator(BinaryOp),
    Var,
    CheckSat,
    Identifier(String),
    Number(NumberLiteral),
    Overflow,
    EOF,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SmtToken {
    pub kind: SmtTokenKind,
    pub lexeme: String,
    pub line: usize,
    pub column: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SmtCommand {
    Var {
        name: String,
        lower: NumberLiteral,
        upper: NumberLiteral,
    },
    Apply {
        op: BinaryOp,
        lhs: NumberLiteral,
        rhs: NumberLiteral,
    },
    CheckSat,
}

/// Tokenizes SMT input. Illegal characters are skipped and reported.
pub fn tokenize(src: &str) -> (Vec<SmtToken>, Vec<LexerError>) {
    let chars: Vec<char> = src.chars().collect();
    let mut tokens = Vec::new();
    let mut errors = Vec::new();
    let (mut i, mut line, mut col) = (0usize, 1usize, 1usize);

    while i < chars.len() {
        let c = chars[i];
        let (start, start_col) = (i, col);
        let kind = match c {
            '\n' => {
                i += 1;
                line += 1;
                col = 1;
                continue;
            }
            ' ' | '\t' | '\r' => {
                i += 1;
                col += 1;
                continue;
            }
            '#' => {
                while i < chars.len() && chars[i] != '\n' {
                    i += 1;
                }
                continue;
            }
            '(' => SmtTokenKind::OpenParen,
            ')' => SmtTokenKind::CloseParen,
            '[' => SmtTokenKind::OpenBracket,
            ']' => SmtTokenKind::CloseBracket,
            ',' => SmtTokenKind::Comma,
            '-' => SmtTokenKind::Minus,
            '+' => SmtTokenKind::Operator(BinaryOp::Add),
            '*' => SmtTokenKind::Operator(BinaryOp::Mul),
            '/' => SmtTokenKind::Operator(BinaryOp::Div),
            '^' => SmtTokenKind::Operator(BinaryOp::Pow),
            c if c.is_ascii_digit() => {
                let hex = c == '0' && matches!(chars.get(i + 1), Some('x') | Some('X'));
                let mut j = i + 1;
                if hex {
                    j += 1;
                    while j < chars.len() && (chars[j].is_ascii_hexdigit() || matches!(chars[j], '.' | 'p' | 'P'))
                        || (j < chars.len() && chars[j] == '-' && matches!(chars[j - 1], 'p' | 'P'))
                    {
                        j += 1;
                    }
                } else {
                    while j < chars.len() && (chars[j].is_ascii_digit() || chars[j] == '.') {
                        j += 1;
                    }
                }
                let text: String = chars[i..j].iter().collect();
                let parsed = if hex { parse_hex_float(&text) } else { parse_decimal(&text) };
                i = j - 1;
                match parsed {
                    Ok(n) => SmtTokenKind::Number(n),
                    Err(_) => SmtTokenKind::Overflow,
                }
            }
            c if c.is_ascii_alphabetic() || c == '_' => {
                let mut j = i + 1;
                while j < chars.len() && (chars[j].is_ascii_alphanumeric() || matches!(chars[j], '_' | '-')) {
                    j += 1;
                }
                let word: String = chars[i..j].iter().collect();
                i = j - 1;
                match word.to_ascii_lowercase().as_str() {
                    "var" => SmtTokenKind::Var,
                    "check-sat" => SmtTokenKind::CheckSat,
                    _ => SmtTokenKind::Identifier(word),
                }
            }
            other => {
                errors.push(LexerError::IllegalCharacter { ch: other, line, column: col });
                i += 1;
                col += 1;
                continue;
            }
        };
        i += 1;
        col += i - start;
        tokens.push(SmtToken {
            kind,
            lexeme: chars[start..i].iter().collect(),
            line,
            column: start_col,
        });
    }
    tokens.push(SmtToken {
        kind: SmtTokenKind::EOF,
        lexeme: String::new(),
        line,
        column: col,
    });
    (tokens, errors)
}

pub struct SmtParser {
    tokens: Vec<SmtToken>,
    pos: usize,
}

impl SmtParser {
    pub fn new(tokens: Vec<SmtToken>) -> Self {
        Self { tokens, pos: 0 }
    }

    /// Parses `'(' command ')'` repeatedly until end of input.
    pub fn parse(&mut self) -> Result<Vec<SmtCommand>, KodiakError> {
        let mut out = Vec::new();
        while self.peek().kind != SmtTokenKind::EOF {
            self.expect(SmtTokenKind::OpenParen, "Expected '('")?;
            out.push(self.command()?);
            self.expect(SmtTokenKind::CloseParen, "Expected ')'")?;
        }
        Ok(out)
    }

    fn command(&mut self) -> Result<SmtCommand, KodiakError> {
        let tok = self.advance();
        match tok.kind {
            SmtTokenKind::Var => {
                let name = match self.advance() {
                    SmtToken { kind: SmtTokenKind::Identifier(name), .. } => name,
                    other => return Err(error_at(&other, "Expected variable name")),
                };
                self.expect(SmtTokenKind::OpenBracket, "Expected '['")?;
                let lower = self.number()?;
                self.expect(SmtTokenKind::Comma, "Expected ','")?;
                let upper = self.number()?;
                self.expect(SmtTokenKind::CloseBracket, "Expected ']'")?;
                Ok(SmtCommand::Var { name, lower, upper })
            }
            SmtTokenKind::Operator(op) => self.apply(op),
            SmtTokenKind::Minus => self.apply(BinaryOp::Sub),
            SmtTokenKind::CheckSat => Ok(SmtCommand::CheckSat),
            _ => Err(error_at(&tok, "Expected command")),
        }
    }

    fn apply(&mut self, op: BinaryOp) -> Result<SmtCommand, KodiakError> {
        let lhs = self.number()?;
        let rhs = self.number()?;
        Ok(SmtCommand::Apply { op, lhs, rhs })
    }

    fn number(&mut self) -> Result<NumberLiteral, KodiakError> {
        let negative = self.peek().kind == SmtTokenKind::Minus;
        if negative {
            self.advance();
        }
        let tok = self.advance();
        match tok.kind {
            SmtTokenKind::Number(n) if negative => Ok(n.negate()),
            SmtTokenKind::Number(n) => Ok(n),
            _ => Err(error_at(&tok, "Expected a number")),
        }
    }

    fn expect(&mut self, kind: SmtTokenKind, msg: &str) -> Result<(), KodiakError> {
        if self.peek().kind == kind {
            self.advance();
            Ok(())
        } else {
            Err(error_at(self.peek(), msg))
        }
    }

    fn peek(&self) -> &SmtToken {
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    fn advance(&mut self) -> SmtToken {
        let tok = self.peek().clone();
        if tok.kind != SmtTokenKind::EOF {
            self.pos += 1;
        }
        tok
    }
}

fn error_at(tok: &SmtToken, msg: &str) -> KodiakError {
    if tok.kind == SmtTokenKind::Overflow {
        return LexerError::NumericOverflow {
            literal: tok.lexeme.clone(),
            line: tok.line,
            column: tok.column,
        }
        .into();
    }
    KodiakError::Syntax(ParserError {
        message: msg.into(),
        found: tok.lexeme.clone(),
        line: tok.line,
        column: tok.column,
    })
}

/// Lexes and parses, failing on the first error of any kind.
pub fn parse_smt(src: &str) -> Result<Vec<SmtCommand>, KodiakError> {
    let (tokens, errors) = tokenize(src);
    if let Some(e) = errors.into_iter().next() {
        return Err(e.into());
    }
    SmtParser::new(tokens).parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn check_sat_is_one_token() {
        let (tokens, errors) = tokenize("(check-sat)");
        assert!(errors.is_empty());
        assert_eq!(tokens[1].kind, SmtTokenKind::CheckSat);
    }

    #[test]
    fn negative_bounds() {
        let cmds = parse_smt("(var x [-2, 0x10])").unwrap();
        assert_eq!(
            cmds,
            vec![SmtCommand::Var {
                name: "x".into(),
                lower: NumberLiteral::Integer(-2),
                upper: NumberLiteral::HexFloat(16.0)
            }]
        );
    }
}
