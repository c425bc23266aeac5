use colored::Colorize;
use std::io::{self, BufRead, Write};

use crate::commands::run::print_report;
use crate::core::engine::Engine;
use crate::core::session::{Session, SessionHooks};

/// Session hooks for the terminal: scripts come from disk and are echoed
/// unless quiet, `help` prints the statement reference.
#[derive(Debug, Default, Clone, Copy)]
pub struct ShellHooks {
    pub quiet: bool,
}

impl SessionHooks for ShellHooks {
    fn read_file(&mut self, path: &str) -> io::Result<String> {
        std::fs::read_to_string(path)
    }

    fn file_loaded(&mut self, path: &str, text: &str) {
        if !self.quiet {
            println!("{} {}", "file:".truecolor(130, 0, 200), path);
            print!("{}", text);
            if !text.ends_with('\n') {
                println!();
            }
        }
    }

    fn help(&mut self) {
        print_help();
    }
}

pub fn start<E: Engine, H: SessionHooks>(session: &mut Session<E, H>, quiet: bool, pretty: bool) -> anyhow::Result<()> {
    if !quiet {
        banner();
    }
    ctrlc::set_handler(|| {
        println!("\nGoodbye!");
        std::process::exit(0);
    })?;

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        print!("{} ", "Kodiak>".bold().truecolor(0, 180, 255));
        io::stdout().flush().ok();

        let Some(line) = lines.next() else {
            println!();
            break;
        };
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let report = session.execute(&line);
        print_report(&report, "<stdin>", &line, pretty);
        if session.quit_requested() {
            break;
        }
    }
    println!("Goodbye!");
    Ok(())
}

fn banner() {
    println!(
        "{}  {}",
        "Kodiak".bold().truecolor(0, 180, 255),
        "type 'help;' for statements, 'quit;' to leave".truecolor(130, 0, 200)
    );
}

fn print_help() {
    println!(
        "{}\n\
         {}\n  var x in [lo, hi]          # declare variable\n  param p in [lo, hi]        # declare parameter\n  const c = number           # named constant\n  define f = expr            # named expression\n\
         {}\n  objfn [let a = e in] expr  # objective (replaces)\n  dfeq [let a = e in] expr   # differential equation (appends)\n  cnstr [let a = e in] e1 op e2\n  forall boolexpr            # echoed, not evaluated\n\
         {}\n  set precision|resolution|granularity|depth|varselect = n\n  set resolution x = n       # per-variable resolution\n  set bp|debug|safe input = true|false\n  set name = id; set output = file.ext; reset output\n  set paving mode = std|first|full\n\
         {}\n  pave; bifurcation; equilibrium; min; max; minmax; reset\n  save paving id; load paving id; plot id x y [z]\n\
         {}\n  file name.kdk; help; quit\n",
        "Kodiak statements (separate with ';')".bold().truecolor(0, 180, 255),
        "Declarations:".truecolor(130, 0, 200),
        "Problem:".truecolor(130, 0, 200),
        "Settings:".truecolor(130, 0, 200),
        "Actions:".truecolor(130, 0, 200),
        "Session:".truecolor(130, 0, 200),
    );
}
