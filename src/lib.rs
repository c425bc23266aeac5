//! Kodiak language front end: lexer, parser, AST and engine dispatch, plus
//! the CLI pieces the `kodiak` binary is built from.
pub mod cli;
pub mod commands;
pub mod config;
pub mod core;
pub mod io;
pub mod shell;

pub use crate::core::dialect::{Dialect, KodiakDialect, SmtDialect};
pub use crate::core::engine::Engine;
pub use crate::core::error::KodiakError;
pub use crate::core::problem::Problem;
pub use crate::core::session::{Report, Session, SessionHooks};
