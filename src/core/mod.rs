//! Core module tree for the Kodiak front end.
//! Only declare modules that exist in the src/core/ directory.

#[macro_use]
pub mod debug; // gated debug logging (KODIAK_DEBUG=1) provides debug_log! macro
pub mod ast;
pub mod diagnostics;
pub mod dialect;
pub mod dispatch;
pub mod engine;
pub mod error;
pub mod formatter;
pub mod lexer;
pub mod number;
pub mod parser;
pub mod problem;
pub mod session;
pub mod smt;
pub mod token;
pub use token::TokenKind;
