//! `deskutil` binary entry point.
use anyhow::Result;
use clap::Parser;

use deskutil_cli::cli::{Cli, Command};
use deskutil_cli::commands;
use deskutil_cli::logging::{self, Logger};

fn main() -> Result<()> {
    let _ = enable_ansi_support::enable_ansi_support();
    let args = Cli::parse();
    let name = args.command.log_name();
    logging::init_subscriber(args.verbose, name);
    let log = Logger::new(name);
    let global = &args.global;

    let result = match args.command {
        Command::Pass(opts) => commands::pass::run(global, &opts, &log),
        Command::Tempmail(cmd) => commands::tempmail::run(global, &cmd, &log),
        Command::Toggle(opts) => commands::toggle::run(global, &opts, &log),
        Command::Autoclick(opts) => commands::autoclick::run(global, &opts, &log),
        Command::Dictation(cmd) => commands::dictation::run(global, cmd, &log),
        Command::Volume(cmd) => commands::volume::run(global, cmd, &log),
        Command::Wallpaper(opts) => commands::wallpaper::run(global, &opts, &log),
        Command::Tools => commands::tools::run(global, &log),
        Command::Completions(opts) => {
            commands::completions::run(&opts, &mut std::io::stdout().lock());
            Ok(())
        }
        Command::Version => commands::version::run(&mut std::io::stdout().lock()),
    };
    if let Err(e) = &result {
        log.debug(&format!("failed: {e:#}"));
    }
    result
}
