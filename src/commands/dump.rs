//! Debug views of input files: tokens, JSON AST, canonical text.

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

use crate::cli::DialectKind;
use crate::core::dialect::{Ast, Dialect, KodiakDialect, SmtDialect};
use crate::core::diagnostics::report_error;
use crate::core::error::KodiakError;
use crate::core::formatter::format_statements;
use crate::core::lexer::Lexer;

fn read(input: &Path) -> Result<String> {
    fs::read_to_string(input).with_context(|| format!("Read input {}", input.display()))
}

pub fn tokens(input: &Path, pretty: bool) -> Result<bool> {
    let source = read(input)?;
    let (tokens, errors) = Lexer::new(&source).tokenize();
    println!("=== Tokens ===");
    for token in &tokens {
        println!("{}", token);
    }
    for e in &errors {
        report_error(&input.display().to_string(), &source, &KodiakError::from(e.clone()), pretty);
    }
    Ok(errors.is_empty())
}

fn parse(input: &Path, source: &str, dialect: DialectKind, safe_input: bool, pretty: bool) -> Option<Vec<Ast>> {
    let result = match dialect {
        DialectKind::Kodiak => KodiakDialect { safe_input }.parse(source),
        DialectKind::Smt => SmtDialect.parse(source),
    };
    match result {
        Ok(ast) => Some(ast),
        Err(e) => {
            report_error(&input.display().to_string(), source, &e, pretty);
            None
        }
    }
}

pub fn ast(input: &Path, dialect: DialectKind, safe_input: bool, pretty: bool) -> Result<bool> {
    let source = read(input)?;
    let Some(ast) = parse(input, &source, dialect, safe_input, pretty) else {
        return Ok(false);
    };
    println!("{}", serde_json::to_string_pretty(&ast)?);
    Ok(true)
}

pub fn format(input: &Path, safe_input: bool, pretty: bool) -> Result<bool> {
    let source = read(input)?;
    let Some(ast) = parse(input, &source, DialectKind::Kodiak, safe_input, pretty) else {
        return Ok(false);
    };
    let statements: Vec<_> = ast
        .into_iter()
        .filter_map(|a| match a {
            Ast::Kodiak(s) => Some(s),
            Ast::Smt(_) => None,
        })
        .collect();
    print!("{}", format_statements(&statements));
    Ok(true)
}
