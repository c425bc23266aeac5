//! Statement-by-statement execution of Kodiak input against an engine.
//!
//! Every statement is parsed, then dispatched, inside its own error boundary:
//! a failure is recorded in the [`Report`] and execution carries on with the
//! next statement. Domain errors additionally reset the engine.

use std::io;

use crate::core::ast::Statement;
use crate::core::dispatch::{dispatch, Dispatched};
use crate::core::engine::Engine;
use crate::core::error::KodiakError;
use crate::core::parser::{Parsed, Parser};

/// Nested `file` statements deeper than this fail instead of recursing.
pub const MAX_FILE_DEPTH: usize = 16;

/// Side effects of session-control statements, supplied by the embedder.
pub trait SessionHooks {
    fn read_file(&mut self, path: &str) -> io::Result<String>;

    /// Called with the text of a script just before it runs.
    fn file_loaded(&mut self, _path: &str, _text: &str) {}

    fn help(&mut self) {}
}

/// Reads scripts from the file system and does nothing else.
#[derive(Debug, Default, Clone, Copy)]
pub struct FsHooks;

impl SessionHooks for FsHooks {
    fn read_file(&mut self, path: &str) -> io::Result<String> {
        std::fs::read_to_string(path)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Failure {
    /// Script the statement came from; `None` for the text given to `execute`.
    pub file: Option<String>,
    pub error: KodiakError,
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct Report {
    /// Statements that parsed and dispatched without error.
    pub succeeded: usize,
    pub failures: Vec<Failure>,
    /// Canonical text of statements the engine does not evaluate (`forall`).
    pub echoes: Vec<String>,
}

impl Report {
    pub fn is_ok(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn errors(&self) -> impl Iterator<Item = &KodiakError> {
        self.failures.iter().map(|f| &f.error)
    }
}

pub struct Session<E: Engine, H: SessionHooks = FsHooks> {
    engine: E,
    hooks: H,
    history: Vec<String>,
    files: Vec<String>,
    quit_requested: bool,
}

impl<E: Engine> Session<E, FsHooks> {
    pub fn new(engine: E) -> Self {
        Session::with_hooks(engine, FsHooks)
    }
}

impl<E: Engine, H: SessionHooks> Session<E, H> {
    pub fn with_hooks(engine: E, hooks: H) -> Self {
        Session {
            engine,
            hooks,
            history: Vec::new(),
            files: Vec::new(),
            quit_requested: false,
        }
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn hooks_mut(&mut self) -> &mut H {
        &mut self.hooks
    }

    /// Source text of every statement that parsed and dispatched cleanly, in order.
    pub fn history(&self) -> &[String] {
        &self.history
    }

    /// The retained statements as a replayable script, one per line.
    pub fn history_script(&self) -> String {
        self.history.iter().map(|s| format!("{};\n", s)).collect()
    }

    pub fn quit_requested(&self) -> bool {
        self.quit_requested
    }

    pub fn execute(&mut self, text: &str) -> Report {
        let mut report = Report::default();
        self.run(text, &mut report);
        report
    }

    fn run(&mut self, text: &str, report: &mut Report) {
        let mut parser = Parser::new(text);
        for e in parser.take_lexer_errors() {
            self.fail(e.into(), report);
        }
        while !self.quit_requested {
            let Some(next) = parser.next_statement(self.engine.is_safe_input()) else {
                break;
            };
            match next {
                Ok(parsed) => self.apply(parsed, report),
                Err(e) => self.fail(e, report),
            }
        }
    }

    fn apply(&mut self, parsed: Parsed, report: &mut Report) {
        match &parsed.statement {
            Statement::ReadFile(path) => self.read_file(path, report),
            Statement::Quit => {
                debug_log!("[session] quit requested");
                self.quit_requested = true;
            }
            Statement::Help => {
                self.hooks.help();
                report.succeeded += 1;
            }
            statement => match dispatch(statement, &mut self.engine) {
                Ok(outcome) => {
                    debug_log!("[session] dispatched: {}", parsed.text);
                    if let Dispatched::Echo(text) = outcome {
                        report.echoes.push(text);
                    }
                    report.succeeded += 1;
                    // the skipped character is already in the report
                    if !parsed.skipped_chars {
                        self.history.push(parsed.text);
                    }
                }
                Err(e) => self.fail(e.into(), report),
            },
        }
    }

    fn read_file(&mut self, path: &str, report: &mut Report) {
        if self.files.len() >= MAX_FILE_DEPTH {
            let msg = format!("file '{}' nested more than {} levels deep", path, MAX_FILE_DEPTH);
            self.fail(KodiakError::domain(msg), report);
            return;
        }
        let text = match self.hooks.read_file(path) {
            Ok(text) => text,
            Err(e) => {
                self.fail(KodiakError::domain(format!("cannot read file '{}': {}", path, e)), report);
                return;
            }
        };
        self.hooks.file_loaded(path, &text);
        self.files.push(path.to_string());
        self.run(&text, report);
        self.files.pop();
        if !self.quit_requested {
            report.succeeded += 1;
        }
    }

    fn fail(&mut self, error: KodiakError, report: &mut Report) {
        debug_log!("[session] {}", error);
        if error.resets_session() {
            debug_log!("[session] resetting engine");
            self.engine.reset_session();
        }
        report.failures.push(Failure {
            file: self.files.last().cloned(),
            error,
        });
    }
}
