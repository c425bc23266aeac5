// src/core/diagnostics.rs
//! Pretty, colored, file+line diagnostics.

use colored::Colorize;

use crate::core::error::KodiakError;
use crate::core::lexer::LexerError;

pub struct Span {
    pub line: usize,
    pub col: usize,
    pub len: usize, // underline length (use 1 if unknown)
}

impl Span {
    pub fn single(line: usize, col: usize) -> Self {
        Self { line, col, len: 1 }
    }

    /// Underlines the offending text, when the error carries a position.
    pub fn of(error: &KodiakError) -> Option<Self> {
        let (line, col) = error.position()?;
        let len = match error {
            KodiakError::Syntax(e) => e.found.chars().count(),
            KodiakError::Lexical(LexerError::NumericOverflow { literal, .. }) => literal.chars().count(),
            _ => 1,
        };
        Some(Self { line, col, len: len.max(1) })
    }
}

pub fn print_error(filename: &str, source: &str, title: &str, span: Span) {
    eprintln!("{} {}", "error:".bright_red().bold(), title.bright_white());
    let (ln, col) = (span.line, span.col);
    let line_text = nth_line(source, ln).unwrap_or_default();

    // line number gutter
    let ln_str = format!("{:>4}", ln);
    eprintln!("{} {}", "-->".bright_blue(), format!("{}:{}:{}", filename, ln, col).bright_white());
    eprintln!(" {} {}", ln_str.dimmed(), "|".dimmed());
    eprintln!("{} {} {}", ln_str.dimmed(), "|".dimmed(), line_text);

    // underline with ^^^^^
    let underline = " ".repeat(col.saturating_sub(1)) + &"^".repeat(span.len.max(1));
    eprintln!(
        " {} {} {}",
        " ".repeat(ln_str.len()).dimmed(),
        "|".dimmed(),
        underline.bright_red()
    );
    eprintln!();
}

/// Prints one statement failure: the span form when `pretty` and the error
/// has a position, a single line otherwise.
pub fn report_error(filename: &str, source: &str, error: &KodiakError, pretty: bool) {
    match Span::of(error) {
        Some(span) if pretty => print_error(filename, source, &error.to_string(), span),
        _ => eprintln!("{} {}", "error:".bright_red(), error),
    }
}

fn nth_line(src: &str, n: usize) -> Option<String> {
    src.lines().nth(n.saturating_sub(1)).map(|s| s.to_string())
}
