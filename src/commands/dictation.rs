//! Command: talk to the dictation daemon.
use std::io::Write;
use std::path::Path;

use anyhow::Result;

use crate::cli::{DictationCommand, GlobalOpts};
use crate::commands::CommandSetup;
use crate::dictation;
use crate::logging::Logger;

/// Run the `dictation` command.
///
/// # Errors
///
/// Returns an error if the daemon cannot be reached or its status file
/// cannot be read.
pub fn run(global: &GlobalOpts, cmd: DictationCommand, log: &Logger) -> Result<()> {
    let setup = CommandSetup::init(global, log)?;
    let config = &setup.config.dictation;
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    run_with(cmd, &config.socket, &config.status_file, log, &mut out)
}

/// Send `cmd` to the daemon at `socket`, or print the status file.
///
/// # Errors
///
/// Same as [`run`].
pub fn run_with(
    cmd: DictationCommand,
    socket: &Path,
    status_file: &Path,
    log: &Logger,
    out: &mut dyn Write,
) -> Result<()> {
    let request = match cmd {
        DictationCommand::Start => dictation::DictationCommand::Start,
        DictationCommand::Stop => dictation::DictationCommand::Stop,
        DictationCommand::Toggle => dictation::DictationCommand::Toggle,
        DictationCommand::Status => {
            let status = dictation::status(status_file)?;
            writeln!(out, "{}", serde_json::to_string(&status)?)?;
            return Ok(());
        }
    };
    dictation::send(socket, request)?;
    log.info(&format!("sent {request}"));
    Ok(())
}
