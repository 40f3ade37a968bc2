//! Command: start or stop a background helper.
use std::io::Write;

use anyhow::Result;

use crate::cli::{GlobalOpts, ToggleOpts};
use crate::commands::CommandSetup;
use crate::exec::{Executor, SystemExecutor};
use crate::logging::Logger;
use crate::notify;
use crate::toggle::{self, ToggleDaemon, Toggled};

/// Run the `toggle` command.
///
/// # Errors
///
/// Returns an error if the daemon is unknown or cannot be started or
/// stopped.
pub fn run(global: &GlobalOpts, opts: &ToggleOpts, log: &Logger) -> Result<()> {
    let setup = CommandSetup::init(global, log)?;
    let executor = SystemExecutor;
    let command = toggle::command_for(&opts.name, &setup.config.toggle_commands())?;
    let daemon = ToggleDaemon::new(&opts.name, command, toggle::default_state_dir(), &executor)?;
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    run_with(&daemon, &executor, opts.status, log, &mut out)
}

/// Toggle `daemon`, or print its status when `status_only` is set.
///
/// # Errors
///
/// Returns an error if the state directory or the process cannot be
/// managed.
pub fn run_with(
    daemon: &ToggleDaemon<'_>,
    executor: &dyn Executor,
    status_only: bool,
    log: &Logger,
    out: &mut dyn Write,
) -> Result<()> {
    let name = daemon.name();
    if status_only {
        writeln!(out, "{name}: {}", daemon.status())?;
        return Ok(());
    }
    log.stage(&format!("Toggling {name}"));
    let state = match daemon.toggle()? {
        Toggled::Started(_) => "started",
        Toggled::Stopped => "stopped",
    };
    writeln!(out, "{name}: {state}")?;
    notify::send_replacing(executor, name, name, state);
    Ok(())
}
