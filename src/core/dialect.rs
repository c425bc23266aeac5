//! Common `parse` capability over the two input grammars.

use serde::Serialize;

use crate::core::ast::Statement;
use crate::core::error::KodiakError;
use crate::core::parser::Parser;
use crate::core::smt::{parse_smt, SmtCommand};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Ast {
    Kodiak(Statement),
    Smt(SmtCommand),
}

pub trait Dialect {
    fn name(&self) -> &'static str;
    fn parse(&self, text: &str) -> Result<Vec<Ast>, KodiakError>;
}

/// The statement language. `approx` is accepted only when `safe_input` is off.
#[derive(Debug, Clone, Copy)]
pub struct KodiakDialect {
    pub safe_input: bool,
}

impl Default for KodiakDialect {
    fn default() -> Self {
        KodiakDialect { safe_input: true }
    }
}

impl Dialect for KodiakDialect {
    fn name(&self) -> &'static str {
        "kodiak"
    }

    fn parse(&self, text: &str) -> Result<Vec<Ast>, KodiakError> {
        let statements = Parser::new(text).parse_all(self.safe_input)?;
        Ok(statements.into_iter().map(Ast::Kodiak).collect())
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SmtDialect;

impl Dialect for SmtDialect {
    fn name(&self) -> &'static str {
        "smt"
    }

    fn parse(&self, text: &str) -> Result<Vec<Ast>, KodiakError> {
        Ok(parse_smt(text)?.into_iter().map(Ast::Smt).collect())
    }
}
