/// Kodiak driver: runs scripts, dumps debug views or opens the shell.
use anyhow::Context;
use clap::Parser; // trait import enables KodiakCli::parse()
use std::process::exit;

use kodiak_lang::cli::KodiakCli;
use kodiak_lang::commands::{dump, run};
use kodiak_lang::config::{load_settings, resolve_config_path};
use kodiak_lang::io::atomic::atomic_append;
use kodiak_lang::shell::{self, ShellHooks};
use kodiak_lang::{Problem, Session};

fn main() -> anyhow::Result<()> {
    let args = KodiakCli::parse();

    let cfg_path = resolve_config_path(&args.config);
    let mut settings = load_settings(cfg_path.as_deref())?;
    if args.unsafe_input {
        settings.safe_input = false;
    }
    if args.debug {
        settings.debug = true;
    }
    if let Some(out) = &args.output_file {
        settings.output = out.clone();
    }

    if args.is_dump() {
        let mut ok = true;
        for input in &args.inputs {
            ok &= if args.tokens {
                dump::tokens(input, args.pretty_errors)?
            } else if args.ast {
                dump::ast(input, args.dialect, settings.safe_input, args.pretty_errors)?
            } else {
                dump::format(input, settings.safe_input, args.pretty_errors)?
            };
        }
        if !ok {
            exit(1);
        }
        return Ok(());
    }

    let hooks = ShellHooks { quiet: args.quiet };
    let mut session = Session::with_hooks(Problem::new(settings), hooks);

    let ok = run::run_files(&mut session, &args.inputs, args.pretty_errors)?;
    if (args.inputs.is_empty() || args.cont) && !session.quit_requested() {
        shell::start(&mut session, args.quiet, args.pretty_errors)?;
    }

    if let Some(save) = &args.save_file {
        atomic_append(save, &session.history_script())
            .with_context(|| format!("Write save file {}", save.display()))?;
    }

    if !ok {
        exit(1);
    }
    Ok(())
}
