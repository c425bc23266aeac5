use thiserror::Error;

use crate::core::lexer::LexerError;
use crate::core::parser::ParserError;

/// Semantic failure raised by the engine or by a literal constructor.
/// Always followed by a full session reset.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct DomainError {
    pub message: String,
}

impl DomainError {
    pub fn new(message: impl Into<String>) -> Self {
        DomainError {
            message: message.into(),
        }
    }
}

/// Error class of a failed statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Lexical,
    NumericOverflow,
    Syntax,
    Domain,
}

/// Per-statement classification boundary: whatever went wrong while lexing,
/// parsing or dispatching one statement ends up as exactly one of these.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum KodiakError {
    #[error("Lexical Error: {0}")]
    Lexical(#[from] LexerError),
    #[error("Syntax Error: {0}")]
    Syntax(#[from] ParserError),
    #[error("Error: {0}")]
    Domain(#[from] DomainError),
}

impl KodiakError {
    pub fn domain(message: impl Into<String>) -> Self {
        KodiakError::Domain(DomainError::new(message))
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            KodiakError::Lexical(LexerError::IllegalCharacter { .. }) => ErrorKind::Lexical,
            KodiakError::Lexical(LexerError::NumericOverflow { .. }) => ErrorKind::NumericOverflow,
            KodiakError::Syntax(_) => ErrorKind::Syntax,
            KodiakError::Domain(_) => ErrorKind::Domain,
        }
    }

    /// Source position, when the error has one.
    pub fn position(&self) -> Option<(usize, usize)> {
        match self {
            KodiakError::Lexical(e) => Some(e.position()),
            KodiakError::Syntax(e) => Some((e.line, e.column)),
            KodiakError::Domain(_) => None,
        }
    }

    /// Domain errors roll the engine back to its defaults.
    pub fn resets_session(&self) -> bool {
        matches!(self, KodiakError::Domain(_))
    }
}
