use clap::{ArgAction, Parser, ValueEnum};
use std::path::PathBuf;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum DialectKind {
    #[default]
    Kodiak,
    Smt,
}

#[derive(Debug, Parser)]
#[command(
    name = "kodiak",
    about = "Kodiak: interval-constraint problem language front end",
    version
)]
pub struct KodiakCli {
    /// Scripts to execute, in order
    #[arg(value_name = "INPUT_FILES")]
    pub inputs: Vec<PathBuf>,

    /// Send engine output to FILE (same as `set output = FILE`)
    #[arg(short = 'o', long = "output-file", value_name = "FILE")]
    pub output_file: Option<String>,

    /// Accept approximate literals (safe input off)
    #[arg(short = 'u', long = "unsafe", action = ArgAction::SetTrue)]
    pub unsafe_input: bool,

    /// Engine debug mode
    #[arg(short = 'd', long = "debug", action = ArgAction::SetTrue)]
    pub debug: bool,

    /// Continue into the interactive shell after running the input files
    #[arg(short = 'c', long = "cont", action = ArgAction::SetTrue)]
    pub cont: bool,

    /// On exit, append every accepted statement to FILE
    #[arg(short = 's', long = "save-file", value_name = "FILE")]
    pub save_file: Option<PathBuf>,

    /// No banner, no script echo
    #[arg(short = 'q', long = "quiet", action = ArgAction::SetTrue)]
    pub quiet: bool,

    /// Dump tokens of each input file instead of executing it
    #[arg(long = "tokens", action = ArgAction::SetTrue)]
    pub tokens: bool,

    /// Dump the JSON AST of each input file instead of executing it
    #[arg(long = "ast", action = ArgAction::SetTrue)]
    pub ast: bool,

    /// Print each input file in canonical form instead of executing it
    #[arg(long = "format", action = ArgAction::SetTrue)]
    pub format: bool,

    /// Grammar used by --ast
    #[arg(long = "dialect", value_enum, default_value_t = DialectKind::Kodiak)]
    pub dialect: DialectKind,

    /// Pretty diagnostics
    #[arg(long = "pretty-errors", action = ArgAction::SetTrue)]
    pub pretty_errors: bool,

    /// Path to config (TOML); default: ~/.kodiak/config.toml
    #[arg(long = "config", value_name = "FILE")]
    pub config: Option<PathBuf>,
}

impl KodiakCli {
    pub fn is_dump(&self) -> bool {
        self.tokens || self.ast || self.format
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_flags_match_the_driver() {
        let cli = KodiakCli::try_parse_from(["kodiak", "-u", "-q", "-s", "save.kdk", "a.kdk", "b.kdk"]).unwrap();
        assert!(cli.unsafe_input && cli.quiet && !cli.cont);
        assert_eq!(cli.save_file, Some(PathBuf::from("save.kdk")));
        assert_eq!(cli.inputs.len(), 2);
    }

    #[test]
    fn dialect_defaults_to_kodiak() {
        let cli = KodiakCli::try_parse_from(["kodiak", "--ast", "--dialect", "smt", "x.smt"]).unwrap();
        assert_eq!(cli.dialect, DialectKind::Smt);
        let cli = KodiakCli::try_parse_from(["kodiak"]).unwrap();
        assert_eq!(cli.dialect, DialectKind::Kodiak);
    }
}
